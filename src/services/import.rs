//! Import of records from JSON and CSV files
//!
//! Parsing is lenient per field: an unreadable amount becomes zero, an
//! unreadable date becomes "now", an unknown type becomes expense. Only the
//! file structure itself (JSON root, CSV row shape) can reject an import.
//! Candidates are then checked against stored records by [`DedupKey`].

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Value};

use crate::error::{LedgerError, LedgerResult};
use crate::models::{DocumentStatus, Money, RecordId, RecordType, TransactionRecord};

/// Marker for "converted" in the CSV dialect
pub const CONVERTED_YES: &str = "是";
pub const CONVERTED_NO: &str = "否";

/// File formats understood by import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> LedgerResult<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Ok(Self::Json),
            Some("csv") => Ok(Self::Csv),
            _ => Err(LedgerError::Import(format!(
                "Cannot tell the format of {}; pass --format json or --format csv",
                path.display()
            ))),
        }
    }
}

impl FromStr for ImportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("Unsupported import format: '{}'", other)),
        }
    }
}

/// Parse file contents into candidate records
pub fn parse_records(content: &str, format: ImportFormat) -> LedgerResult<Vec<TransactionRecord>> {
    match format {
        ImportFormat::Json => parse_json(content),
        ImportFormat::Csv => parse_csv(content),
    }
}

/// Parse a JSON array of records
///
/// Keys are read in the exported camelCase form, with snake_case accepted as
/// a fallback.
pub fn parse_json(content: &str) -> LedgerResult<Vec<TransactionRecord>> {
    let root: Value = serde_json::from_str(content.trim_start_matches('\u{feff}'))
        .map_err(|e| LedgerError::Validation(format!("File could not be parsed as JSON: {}", e)))?;

    let Value::Array(items) = root else {
        return Err(LedgerError::Validation(
            "Unexpected file layout: the JSON root must be an array of records".into(),
        ));
    };

    let empty = Map::new();
    let now = Utc::now();
    Ok(items
        .iter()
        .map(|item| json_candidate(item.as_object().unwrap_or(&empty), now))
        .collect())
}

fn field<'v>(obj: &'v Map<String, Value>, keys: &[&str]) -> Option<&'v Value> {
    keys.iter()
        .filter_map(|key| obj.get(*key))
        .find(|value| !value.is_null())
}

fn json_candidate(obj: &Map<String, Value>, now: DateTime<Utc>) -> TransactionRecord {
    let id = field(obj, &["id"])
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<RecordId>().ok())
        .unwrap_or_default();

    let name = match field(obj, &["name"]) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };

    let amount = match field(obj, &["amount"]) {
        Some(Value::Number(n)) => n.as_f64().map(Money::from_f64).unwrap_or_default(),
        Some(Value::String(s)) => Money::parse_lenient(s),
        _ => Money::zero(),
    }
    .abs();

    let record_type = field(obj, &["type", "record_type"])
        .and_then(Value::as_str)
        .and_then(RecordType::from_label)
        .unwrap_or(RecordType::Expense);

    let date = field(obj, &["date", "created_at"])
        .and_then(json_timestamp)
        .unwrap_or(now);

    let marked_converted = field(obj, &["isConverted", "is_converted"])
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let converted_at = field(obj, &["convertedAt", "converted_at"]).and_then(json_timestamp);

    let status = |keys: &[&str]| {
        field(obj, keys)
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<DocumentStatus>().ok())
            .unwrap_or_default()
    };

    let mut record = TransactionRecord::with_date(name, amount, record_type, date);
    record.id = id;
    record.contract_status = status(&["contractStatus", "contract_status"]);
    record.third_party_status = status(&["thirdPartyStatus", "third_party_status"]);
    record.invoice_status = status(&["invoiceStatus", "invoice_status"]);
    mark_converted(&mut record, marked_converted, converted_at);
    record
}

fn json_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

/// Keep the converted flag only where it can hold: on actual types
fn mark_converted(
    record: &mut TransactionRecord,
    marked: bool,
    converted_at: Option<DateTime<Utc>>,
) {
    if marked && record.record_type.is_actual() {
        record.is_converted = true;
        record.converted_at = Some(converted_at.unwrap_or(record.date));
    } else {
        record.is_converted = false;
        record.converted_at = None;
    }
}

/// Parse a timestamp in the formats found in exported and hand-edited files
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }

    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Some(date.and_time(chrono::NaiveTime::MIN).and_utc());
        }
    }

    None
}

/// Parse the CSV dialect written by the CSV exporter
///
/// Columns: name, amount, type label, date, converted flag (optional).
/// The first row is a header and is skipped.
pub fn parse_csv(content: &str) -> LedgerResult<Vec<TransactionRecord>> {
    let content = content.trim_start_matches('\u{feff}');
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut rows: Vec<StringRecord> = Vec::new();
    for result in reader.records() {
        let row = result
            .map_err(|e| LedgerError::Validation(format!("CSV file could not be read: {}", e)))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        rows.push(row);
    }

    if rows.len() < 2 {
        return Err(LedgerError::Validation(
            "CSV file needs a header row and at least one data row".into(),
        ));
    }

    let now = Utc::now();
    rows.iter()
        .enumerate()
        .skip(1)
        .map(|(index, row)| csv_candidate(row, index, now))
        .collect()
}

fn csv_candidate(
    row: &StringRecord,
    index: usize,
    now: DateTime<Utc>,
) -> LedgerResult<TransactionRecord> {
    if row.len() < 4 {
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);
        return Err(LedgerError::Validation(format!(
            "Line {} is incomplete: expected at least 4 columns, found {}",
            line,
            row.len()
        )));
    }

    let name = row.get(0).unwrap_or_default().to_string();
    let amount = Money::parse_lenient(row.get(1).unwrap_or_default()).abs();
    let record_type = row
        .get(2)
        .and_then(RecordType::from_label)
        .unwrap_or(RecordType::Expense);
    let date = row.get(3).and_then(parse_timestamp).unwrap_or(now);
    let marked_converted = row.get(4).map(str::trim) == Some(CONVERTED_YES);

    let mut record = TransactionRecord::with_date(name, amount, record_type, date);
    mark_converted(&mut record, marked_converted, None);
    Ok(record)
}

/// Identity of a record for duplicate detection: name, amount, type and UTC day
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    pub name: String,
    pub amount: Money,
    pub record_type: RecordType,
    pub day: NaiveDate,
}

impl DedupKey {
    pub fn of(record: &TransactionRecord) -> Self {
        Self {
            name: record.name.clone(),
            amount: record.amount,
            record_type: record.record_type,
            day: record.date.date_naive(),
        }
    }
}

/// Candidates split into those to insert and a count of those skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition {
    pub fresh: Vec<TransactionRecord>,
    pub skipped: usize,
}

/// Drop candidates whose key matches a stored record
///
/// Candidates are compared against `existing` only, never against each other.
pub fn partition_new(existing: &[TransactionRecord], candidates: Vec<TransactionRecord>) -> Partition {
    let stored: HashSet<DedupKey> = existing.iter().map(DedupKey::of).collect();
    let mut partition = Partition::default();

    for candidate in candidates {
        if stored.contains(&DedupKey::of(&candidate)) {
            tracing::warn!(
                name = %candidate.name,
                amount = %candidate.amount,
                record_type = candidate.record_type.as_key(),
                "skipping duplicate import candidate"
            );
            partition.skipped += 1;
        } else {
            partition.fresh.push(candidate);
        }
    }

    partition
}
