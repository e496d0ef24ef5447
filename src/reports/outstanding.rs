//! Outstanding payments
//!
//! Ranks every estimated income by amount, with each entry's share of the
//! largest one, so the biggest receivables stand out.

use crate::models::{Money, RecordType, TransactionRecord};

#[derive(Debug, Clone)]
pub struct OutstandingEntry {
    pub record: TransactionRecord,
    /// Amount as a percentage of the largest outstanding amount
    pub share_of_largest: f64,
}

#[derive(Debug, Clone, Default)]
pub struct OutstandingReport {
    /// Largest amount first
    pub entries: Vec<OutstandingEntry>,
    /// Sum over all entries; equals the unpaid statistic
    pub total: Money,
}

impl OutstandingReport {
    pub fn generate(records: &[TransactionRecord]) -> Self {
        let mut pending: Vec<&TransactionRecord> = records
            .iter()
            .filter(|r| r.record_type == RecordType::EstimatedIncome)
            .collect();
        pending.sort_by(|a, b| b.amount.cmp(&a.amount));

        let largest = pending.first().map(|r| r.amount).unwrap_or_default();
        let total = pending.iter().map(|r| r.amount).sum();

        let entries = pending
            .into_iter()
            .map(|record| OutstandingEntry {
                share_of_largest: if largest.is_zero() {
                    0.0
                } else {
                    record.amount.cents() as f64 / largest.cents() as f64 * 100.0
                },
                record: record.clone(),
            })
            .collect();

        Self { entries, total }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the ranking with a proportional bar per entry
    pub fn format_terminal(&self, symbol: &str) -> String {
        const BAR_WIDTH: usize = 20;

        let mut output = String::from("Outstanding Payments\n");
        output.push_str(&"=".repeat(72));
        output.push('\n');

        if self.entries.is_empty() {
            output.push_str("No outstanding estimated income.\n");
            return output;
        }

        for (rank, entry) in self.entries.iter().enumerate() {
            let filled = ((entry.share_of_largest / 100.0) * BAR_WIDTH as f64).round() as usize;
            let bar = format!(
                "{}{}",
                "█".repeat(filled.min(BAR_WIDTH)),
                "░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH))
            );
            output.push_str(&format!(
                "{:>2}. {:<24} {:>14} {} {:>5.1}%\n",
                rank + 1,
                truncate(&entry.record.name, 24),
                entry.record.amount.format_with_symbol(symbol),
                bar,
                entry.share_of_largest
            ));
        }

        output.push_str(&"-".repeat(72));
        output.push('\n');
        output.push_str(&format!(
            "{} records, total {}\n",
            self.entries.len(),
            self.total.format_with_symbol(symbol)
        ));
        output
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::MonthlyStats;
    use chrono::Utc;

    fn estimated(name: &str, cents: i64) -> TransactionRecord {
        TransactionRecord::new(name, Money::from_cents(cents), RecordType::EstimatedIncome)
    }

    #[test]
    fn test_sorted_by_amount_with_shares() {
        let records = vec![
            estimated("Small", 2500),
            TransactionRecord::new("Salary", Money::from_cents(900000), RecordType::Income),
            estimated("Large", 10000),
            estimated("Medium", 5000),
        ];

        let report = OutstandingReport::generate(&records);
        let names: Vec<_> = report.entries.iter().map(|e| e.record.name.as_str()).collect();
        assert_eq!(names, vec!["Large", "Medium", "Small"]);
        assert_eq!(report.entries[0].share_of_largest, 100.0);
        assert_eq!(report.entries[1].share_of_largest, 50.0);
        assert_eq!(report.entries[2].share_of_largest, 25.0);
        assert_eq!(report.total, Money::from_cents(17500));
    }

    #[test]
    fn test_total_matches_unpaid_statistic() {
        let records = vec![estimated("A", 1234), estimated("B", 4321)];
        let report = OutstandingReport::generate(&records);
        let stats = MonthlyStats::compute(&records, &Utc::now());
        assert_eq!(report.total, stats.unpaid_amount);
    }

    #[test]
    fn test_zero_amounts_do_not_divide_by_zero() {
        let report = OutstandingReport::generate(&[estimated("Nothing", 0)]);
        assert_eq!(report.entries[0].share_of_largest, 0.0);
    }

    #[test]
    fn test_format_terminal() {
        let empty = OutstandingReport::generate(&[]);
        assert!(empty.is_empty());
        assert!(empty.format_terminal("¥").contains("No outstanding"));

        let report = OutstandingReport::generate(&[estimated("Client, Inc.", 500000)]);
        let output = report.format_terminal("¥");
        assert!(output.contains("Client, Inc."));
        assert!(output.contains("¥5000.00"));
        assert!(output.contains("100.0%"));
    }
}
