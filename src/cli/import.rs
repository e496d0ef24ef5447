//! CLI command for importing records
//!
//! Reads a JSON or CSV export, skips entries already on file and stores the
//! rest in one batch.

use std::path::PathBuf;

use clap::Args;

use crate::backend::RecordBackend;
use crate::error::{LedgerError, LedgerResult};
use crate::services::{parse_records, ImportFormat, RecordStore};

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// File to import
    pub file: PathBuf,

    /// json or csv (default: from the file extension)
    #[arg(short, long)]
    pub format: Option<ImportFormat>,
}

pub fn handle_import_command<B: RecordBackend>(
    store: &mut RecordStore<B>,
    args: ImportArgs,
) -> LedgerResult<()> {
    if !store.session().is_signed_in() {
        return Err(LedgerError::NotSignedIn);
    }

    let path = &args.file;
    if !path.exists() {
        return Err(LedgerError::Import(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let format = match args.format {
        Some(format) => format,
        None => ImportFormat::from_path(path)?,
    };

    let content = std::fs::read_to_string(path)
        .map_err(|e| LedgerError::Import(format!("Failed to read file: {}", e)))?;
    let candidates = parse_records(&content, format)?;

    let summary = store.import_records(candidates)?;

    println!("Imported {} record(s)", summary.imported);
    if summary.skipped > 0 {
        println!("Skipped {} record(s) already on file", summary.skipped);
    }
    Ok(())
}
