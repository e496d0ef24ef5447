//! CLI commands for reports

use chrono::{DateTime, FixedOffset};
use clap::Subcommand;

use crate::backend::RecordBackend;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::OutstandingReport;
use crate::services::RecordStore;

#[derive(Subcommand)]
pub enum ReportCommands {
    /// Totals for the current month
    Stats,
    /// Estimated income not yet received, largest first
    Outstanding,
}

pub fn handle_report_command<B: RecordBackend>(
    store: &RecordStore<B>,
    now: &DateTime<FixedOffset>,
    currency_symbol: &str,
    cmd: ReportCommands,
) -> LedgerResult<()> {
    if !store.session().is_signed_in() {
        return Err(LedgerError::NotSignedIn);
    }

    match cmd {
        ReportCommands::Stats => {
            let stats = store.stats(now);
            let label = now.format("%Y-%m").to_string();
            print!("{}", stats.format_terminal(&label, currency_symbol));
        }

        ReportCommands::Outstanding => {
            let report = OutstandingReport::generate(store.records());
            if report.is_empty() {
                println!("No outstanding payments.");
            } else {
                print!("{}", report.format_terminal(currency_symbol));
            }
        }
    }

    Ok(())
}
