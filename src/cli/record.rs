//! Record CLI commands
//!
//! Add, list, inspect, edit, convert and delete records of the signed-in
//! user.

use chrono::NaiveDate;
use clap::Subcommand;

use crate::backend::RecordBackend;
use crate::display::{format_record_details, format_record_table, DisplayOptions};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Conversion, DocumentStatus, DocumentUpdate, Money, RecordType, TransactionRecord};
use crate::services::{CategoryFilter, RecordFilter, RecordStore, StatKind};

#[derive(Subcommand)]
pub enum RecordCommands {
    /// Add a record
    Add {
        /// Name of the record
        name: String,
        /// Amount, e.g. "1200" or "35.50"
        amount: String,
        /// income, expense, estimated_income or estimated_expense (labels like 预估收入 work too)
        #[arg(short = 't', long = "type", default_value = "expense")]
        record_type: RecordType,
    },
    /// List records, newest first
    List {
        /// Case-insensitive text to look for in names
        #[arg(short, long)]
        search: Option<String>,
        /// all, a record type, or incomplete_documents
        #[arg(short, long)]
        category: Option<CategoryFilter>,
        /// Smallest amount to include
        #[arg(long)]
        min: Option<String>,
        /// Largest amount to include
        #[arg(long)]
        max: Option<String>,
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Start from a statistic: income, expense, balance, estimated_income, estimated_expense, unpaid
        #[arg(long)]
        stat: Option<StatKind>,
    },
    /// Show record details
    Show {
        /// Record ID
        id: String,
    },
    /// Change name and/or amount
    Edit {
        /// Record ID
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
    },
    /// Turn an estimated record into actual income/expense
    Realize {
        /// Record ID
        id: String,
    },
    /// Turn actual income/expense back into an estimate
    Revert {
        /// Record ID
        id: String,
    },
    /// Update paperwork status (incomplete, not_needed, completed)
    Docs {
        /// Record ID
        id: String,
        #[arg(long)]
        contract: Option<DocumentStatus>,
        #[arg(long)]
        third_party: Option<DocumentStatus>,
        #[arg(long)]
        invoice: Option<DocumentStatus>,
    },
    /// Delete a record
    Delete {
        /// Record ID
        id: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Turn a store outcome into a CLI result
///
/// The user is known to be signed in here, so `None` means the backend
/// refused the change and the failure has already been logged.
fn saved(outcome: Option<TransactionRecord>) -> LedgerResult<TransactionRecord> {
    outcome.ok_or_else(|| LedgerError::Backend("The change was not saved".into()))
}

fn parse_amount(raw: &str) -> LedgerResult<Money> {
    Money::parse(raw).map_err(|e| LedgerError::Validation(e.to_string()))
}

pub fn handle_record_command<B: RecordBackend>(
    store: &mut RecordStore<B>,
    options: &DisplayOptions,
    cmd: RecordCommands,
) -> LedgerResult<()> {
    if !store.session().is_signed_in() {
        return Err(LedgerError::NotSignedIn);
    }

    match cmd {
        RecordCommands::Add {
            name,
            amount,
            record_type,
        } => {
            let amount = parse_amount(&amount)?;
            let record = saved(store.add(&name, amount, record_type)?)?;
            println!("Added {}:", record.id);
            print!("{}", format_record_details(&record, options));
        }

        RecordCommands::List {
            search,
            category,
            min,
            max,
            from,
            to,
            stat,
        } => {
            let today = chrono::Utc::now().with_timezone(&options.offset).date_naive();
            let mut filter = match stat {
                Some(kind) => RecordFilter::for_stat(kind, today),
                None => RecordFilter::new(),
            }
            .in_offset(options.offset);

            if let Some(term) = search {
                filter = filter.search(term);
            }
            if let Some(category) = category {
                filter = filter.category(category);
            }
            if let Some(min) = min {
                filter = filter.min_amount(parse_amount(&min)?);
            }
            if let Some(max) = max {
                filter = filter.max_amount(parse_amount(&max)?);
            }
            if let Some(from) = from {
                filter = filter.start_date(from);
            }
            if let Some(to) = to {
                filter = filter.end_date(to);
            }

            let records = store.filtered(&filter);
            print!("{}", format_record_table(&records, options));
            if filter.is_active() {
                println!("Filtered from {} record(s)", store.records().len());
            }
        }

        RecordCommands::Show { id } => {
            let record = store.find(&id)?;
            print!("{}", format_record_details(record, options));
        }

        RecordCommands::Edit { id, name, amount } => {
            let record_id = store.find(&id)?.id;
            let amount = amount.as_deref().map(parse_amount).transpose()?;
            let record = saved(store.update(record_id, name.as_deref(), amount)?)?;
            println!("Updated {}:", record.id);
            print!("{}", format_record_details(&record, options));
        }

        RecordCommands::Realize { id } => {
            let record_id = store.find(&id)?.id;
            let record = saved(store.convert(record_id, Conversion::Realize)?)?;
            println!(
                "Realized {} as {} ({})",
                record.id,
                record.record_type.label(),
                record.amount.format_with_symbol(&options.currency_symbol)
            );
        }

        RecordCommands::Revert { id } => {
            let record_id = store.find(&id)?.id;
            let record = saved(store.convert(record_id, Conversion::Revert)?)?;
            println!(
                "Reverted {} to {} ({})",
                record.id,
                record.record_type.label(),
                record.amount.format_with_symbol(&options.currency_symbol)
            );
        }

        RecordCommands::Docs {
            id,
            contract,
            third_party,
            invoice,
        } => {
            let record_id = store.find(&id)?.id;
            let update = DocumentUpdate {
                contract,
                third_party,
                invoice,
            };
            let record = saved(store.update_documents(record_id, update)?)?;
            println!("Contract:    {}", record.contract_status);
            println!("Third party: {}", record.third_party_status);
            println!("Invoice:     {}", record.invoice_status);
        }

        RecordCommands::Delete { id, force } => {
            let record = store.find(&id)?.clone();

            if !force {
                println!("About to delete record:");
                print!("{}", format_record_details(&record, options));
                println!();
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = saved(store.delete(record.id)?)?;
            println!("Deleted record: {} ({})", deleted.id, deleted.name);
        }
    }

    Ok(())
}
