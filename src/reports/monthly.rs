//! Monthly statistics
//!
//! Headline figures for the calendar month containing a reference instant.
//! Everything is recomputed from the record list on each call.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::models::{Money, RecordType, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyStats {
    /// Income this month, dated by conversion time when realized
    pub total_income: Money,
    /// Expense this month, dated by conversion time when realized
    pub total_expense: Money,
    /// `total_income - total_expense`; may be negative
    pub balance: Money,
    /// Estimated income created this month
    pub monthly_estimated_income: Money,
    /// Estimated expense created this month
    pub monthly_estimated_expense: Money,
    /// All estimated income, whatever its date
    pub unpaid_amount: Money,
}

impl MonthlyStats {
    /// Aggregate `records` for the month containing `now`, in `now`'s time zone
    pub fn compute<Tz: TimeZone>(records: &[TransactionRecord], now: &DateTime<Tz>) -> Self {
        let tz = now.timezone();
        let local = now.naive_local();
        let in_month = |at: DateTime<Utc>| {
            let at = at.with_timezone(&tz).naive_local();
            at.year() == local.year() && at.month() == local.month()
        };

        let mut stats = Self::default();
        for record in records {
            match record.record_type {
                RecordType::Income if in_month(record.effective_date()) => {
                    stats.total_income += record.amount;
                }
                RecordType::Expense if in_month(record.effective_date()) => {
                    stats.total_expense += record.amount;
                }
                RecordType::EstimatedIncome => {
                    stats.unpaid_amount += record.amount;
                    if in_month(record.date) {
                        stats.monthly_estimated_income += record.amount;
                    }
                }
                RecordType::EstimatedExpense if in_month(record.date) => {
                    stats.monthly_estimated_expense += record.amount;
                }
                _ => {}
            }
        }

        stats.balance = stats.total_income - stats.total_expense;
        stats
    }

    /// Render the statistics card for the terminal
    pub fn format_terminal(&self, month_label: &str, symbol: &str) -> String {
        let rows = [
            ("Income", self.total_income),
            ("Expense", self.total_expense),
            ("Balance", self.balance),
            ("Estimated income", self.monthly_estimated_income),
            ("Estimated expense", self.monthly_estimated_expense),
            ("Unpaid (all time)", self.unpaid_amount),
        ];

        let mut output = format!("Statistics for {}\n", month_label);
        output.push_str(&"=".repeat(40));
        output.push('\n');
        for (label, amount) in rows {
            output.push_str(&format!(
                "{:<20} {:>19}\n",
                label,
                amount.format_with_symbol(symbol)
            ));
        }
        output
    }
}
