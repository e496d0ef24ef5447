//! Record display formatting
//!
//! Listings are rendered with `tabled`; single-record detail views are plain
//! aligned text.

use chrono::{DateTime, FixedOffset, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{DocumentStatus, TransactionRecord};

/// Shared formatting options taken from the settings
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub date_format: String,
    /// Offset in which timestamps are shown
    pub offset: FixedOffset,
}

impl DisplayOptions {
    fn date(&self, at: &DateTime<Utc>) -> String {
        at.with_timezone(&self.offset)
            .format(&self.date_format)
            .to_string()
    }
}

#[derive(Tabled)]
struct RecordRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    record_type: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Docs")]
    documents: String,
}

fn status_mark(status: DocumentStatus) -> char {
    match status {
        DocumentStatus::Incomplete => '✗',
        DocumentStatus::NotNeeded => '-',
        DocumentStatus::Completed => '✓',
    }
}

/// Compact paperwork summary: contract, third party, invoice
pub fn format_documents(record: &TransactionRecord) -> String {
    format!(
        "C{} T{} I{}",
        status_mark(record.contract_status),
        status_mark(record.third_party_status),
        status_mark(record.invoice_status)
    )
}

/// Format records as a table
pub fn format_record_table(records: &[&TransactionRecord], options: &DisplayOptions) -> String {
    if records.is_empty() {
        return "No records found.\n".to_string();
    }

    let rows = records.iter().map(|record| RecordRow {
        id: record.id.to_string(),
        date: options.date(&record.effective_date()),
        record_type: if record.is_converted {
            format!("{} ↻", record.record_type.label())
        } else {
            record.record_type.label().to_string()
        },
        name: record.name.clone(),
        amount: record.amount.format_with_symbol(&options.currency_symbol),
        documents: format_documents(record),
    });

    let mut table = Table::new(rows);
    table.with(Style::modern());
    format!("{}\n{} record(s)\n", table, records.len())
}

/// Format a single record in full
pub fn format_record_details(record: &TransactionRecord, options: &DisplayOptions) -> String {
    let mut output = String::new();

    output.push_str(&format!("Record:      {}\n", record.id));
    output.push_str(&format!("Name:        {}\n", record.name));
    output.push_str(&format!(
        "Amount:      {}\n",
        record.amount.format_with_symbol(&options.currency_symbol)
    ));
    output.push_str(&format!(
        "Type:        {} ({})\n",
        record.record_type.label(),
        record.record_type.as_key()
    ));
    output.push_str(&format!("Created:     {}\n", options.date(&record.date)));

    if let Some(at) = &record.converted_at {
        output.push_str(&format!("Converted:   {}\n", options.date(at)));
    }

    output.push_str(&format!("Contract:    {}\n", record.contract_status));
    output.push_str(&format!("Third party: {}\n", record.third_party_status));
    output.push_str(&format!("Invoice:     {}\n", record.invoice_status));
    output.push_str(&format!("ID:          {}\n", record.id.as_uuid()));

    output
}
