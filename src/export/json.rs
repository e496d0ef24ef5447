//! JSON export
//!
//! Writes records as a plain JSON array in camelCase, the same shape the JSON
//! importer reads back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{DocumentStatus, RecordType, TransactionRecord};

/// One exported record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedRecord {
    pub id: String,
    pub name: String,
    /// Decimal amount, e.g. `1200.5`
    pub amount: f64,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    /// RFC 3339 UTC with milliseconds
    pub date: String,
    pub is_converted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converted_at: Option<String>,
    pub contract_status: DocumentStatus,
    pub third_party_status: DocumentStatus,
    pub invoice_status: DocumentStatus,
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-03-01T08:00:00.000Z`
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl From<&TransactionRecord> for ExportedRecord {
    fn from(record: &TransactionRecord) -> Self {
        Self {
            id: record.id.as_uuid().to_string(),
            name: record.name.clone(),
            amount: record.amount.to_f64(),
            record_type: record.record_type,
            date: format_timestamp(&record.date),
            is_converted: record.is_converted,
            converted_at: record.converted_at.as_ref().map(format_timestamp),
            contract_status: record.contract_status,
            third_party_status: record.third_party_status,
            invoice_status: record.invoice_status,
        }
    }
}

pub fn exported_records(records: &[TransactionRecord]) -> Vec<ExportedRecord> {
    records.iter().map(ExportedRecord::from).collect()
}

/// Export records as a pretty-printed JSON array
pub fn export_records_json<W: Write>(
    records: &[TransactionRecord],
    writer: &mut W,
) -> LedgerResult<()> {
    serde_json::to_writer_pretty(&mut *writer, &exported_records(records))
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;
    Ok(())
}
