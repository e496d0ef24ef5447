//! Export module for mimi-ledger
//!
//! - CSV: spreadsheet-compatible, re-importable
//! - JSON: full records, re-importable
//! - YAML: the JSON document in human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionRecord;

pub use self::csv::{export_records_csv, CSV_HEADER};
pub use self::json::{export_records_json, ExportedRecord};
pub use self::yaml::export_records_yaml;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Yaml,
}

impl ExportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> LedgerResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            _ => Err(LedgerError::Export(format!(
                "Cannot tell the format of {}; pass --format json, csv or yaml",
                path.display()
            ))),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(format!("Unsupported export format: '{}'", other)),
        }
    }
}

/// Write `records` in `format`
pub fn export_records<W: Write>(
    records: &[TransactionRecord],
    format: ExportFormat,
    writer: &mut W,
) -> LedgerResult<()> {
    match format {
        ExportFormat::Json => export_records_json(records, writer),
        ExportFormat::Csv => export_records_csv(records, writer),
        ExportFormat::Yaml => export_records_yaml(records, writer),
    }
}
