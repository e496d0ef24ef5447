//! CLI command for exporting records
//!
//! Writes the signed-in user's records to a JSON, CSV or YAML file that the
//! import command can read back (YAML is for reading only).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use clap::Args;

use crate::backend::RecordBackend;
use crate::error::{LedgerError, LedgerResult};
use crate::export::{export_records, ExportFormat};
use crate::services::RecordStore;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file path
    pub output: PathBuf,

    /// json, csv or yaml (default: from the file extension)
    #[arg(short, long)]
    pub format: Option<ExportFormat>,
}

pub fn handle_export_command<B: RecordBackend>(
    store: &RecordStore<B>,
    args: ExportArgs,
) -> LedgerResult<()> {
    if !store.session().is_signed_in() {
        return Err(LedgerError::NotSignedIn);
    }

    let format = match args.format {
        Some(format) => format,
        None => ExportFormat::from_path(&args.output)?,
    };

    let file = File::create(&args.output).map_err(|e| {
        LedgerError::Export(format!("Failed to create {}: {}", args.output.display(), e))
    })?;
    let mut writer = BufWriter::new(file);
    export_records(store.records(), format, &mut writer)?;
    writer.flush()?;

    tracing::debug!(path = %args.output.display(), count = store.records().len(), "export written");
    println!(
        "Exported {} record(s) to {}",
        store.records().len(),
        args.output.display()
    );
    Ok(())
}
