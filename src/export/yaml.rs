//! YAML export
//!
//! Same document as the JSON export, for reading by eye.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionRecord;

use super::json::exported_records;

pub fn export_records_yaml<W: Write>(
    records: &[TransactionRecord],
    writer: &mut W,
) -> LedgerResult<()> {
    let header = format!("# mimi-ledger record export\n# Records: {}\n\n", records.len());
    writer
        .write_all(header.as_bytes())
        .map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &exported_records(records))
        .map_err(|e| LedgerError::Export(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::json::ExportedRecord;
    use crate::models::{Money, RecordType};

    #[test]
    fn test_yaml_export_parses_back() {
        let records = vec![
            TransactionRecord::new("Rent", Money::from_cents(120000), RecordType::Expense),
            TransactionRecord::new("房租", Money::from_cents(5), RecordType::EstimatedExpense),
        ];

        let mut buffer = Vec::new();
        export_records_yaml(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("# mimi-ledger record export"));

        let parsed: Vec<ExportedRecord> = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[1].name, "房租");
        assert_eq!(parsed[1].record_type, RecordType::EstimatedExpense);
        assert_eq!(parsed[1].amount, 0.05);
    }
}
