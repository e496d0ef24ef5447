//! CSV export
//!
//! Spreadsheet-friendly dialect: UTF-8 BOM, localized header and type labels,
//! the name column always quoted.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::models::TransactionRecord;
use crate::services::import::{CONVERTED_NO, CONVERTED_YES};

use super::json::format_timestamp;

pub const CSV_HEADER: &str = "项目名称,金额,类型,创建日期,是否已转换";

const BOM: &str = "\u{feff}";

/// Export records to CSV
pub fn export_records_csv<W: Write>(
    records: &[TransactionRecord],
    writer: &mut W,
) -> LedgerResult<()> {
    writeln!(writer, "{}{}", BOM, CSV_HEADER).map_err(|e| LedgerError::Export(e.to_string()))?;

    for record in records {
        writeln!(
            writer,
            "{},{},{},{},{}",
            quote(&record.name),
            record.amount.to_decimal_string(),
            record.record_type.label(),
            format_timestamp(&record.date),
            if record.is_converted {
                CONVERTED_YES
            } else {
                CONVERTED_NO
            }
        )
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    }

    Ok(())
}

/// Quote a field unconditionally, doubling embedded quotes
fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, RecordType};
    use crate::services::import::parse_csv;
    use chrono::{TimeZone, Utc};

    fn export(records: &[TransactionRecord]) -> String {
        let mut buffer = Vec::new();
        export_records_csv(records, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_header_and_row_layout() {
        let record = TransactionRecord::with_date(
            "Rent",
            Money::from_cents(120000),
            RecordType::Expense,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        );
        let output = export(&[record]);
        let mut lines = output.lines();

        assert_eq!(lines.next(), Some("\u{feff}项目名称,金额,类型,创建日期,是否已转换"));
        assert_eq!(
            lines.next(),
            Some("\"Rent\",1200.00,支出,2024-03-01T09:00:00.000Z,否")
        );
    }

    #[test]
    fn test_quote_doubles_embedded_quotes() {
        assert_eq!(quote("Say \"hi\""), "\"Say \"\"hi\"\"\"");
        assert_eq!(quote("plain"), "\"plain\"");
    }

    #[test]
    fn test_name_with_comma_round_trips() {
        let record = TransactionRecord::with_date(
            "Client, Inc.",
            Money::from_cents(500000),
            RecordType::EstimatedIncome,
            Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap(),
        );

        let parsed = parse_csv(&export(std::slice::from_ref(&record))).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].name, "Client, Inc.");
        assert_eq!(parsed[0].amount, record.amount);
        assert_eq!(parsed[0].record_type, record.record_type);
        assert_eq!(parsed[0].date, record.date);
    }
}
