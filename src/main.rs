use std::path::PathBuf;

use anyhow::Result;
use chrono::{Local, Offset};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use mimi_ledger::audit::AuditLogger;
use mimi_ledger::cli::{
    handle_auth_command, handle_export_command, handle_import_command, handle_record_command,
    handle_report_command, AuthCommands, ExportArgs, ImportArgs, RecordCommands, ReportCommands,
};
use mimi_ledger::config::paths::{LedgerPaths, DATA_DIR_ENV};
use mimi_ledger::config::settings::Settings;
use mimi_ledger::display::DisplayOptions;
use mimi_ledger::services::RecordStore;
use mimi_ledger::session::Session;
use mimi_ledger::storage::{open_backend, JsonFileBackend};

/// Environment variable holding a `tracing` filter directive
const LOG_ENV: &str = "MIMI_LEDGER_LOG";

#[derive(Parser)]
#[command(
    name = "mimi",
    version,
    about = "米米记账 - personal bookkeeping from the command line",
    long_about = "Track income and expenses, including estimated entries that are \
                  later realized, along with the contract, third-party and invoice \
                  paperwork of each record."
)]
struct Cli {
    /// Directory holding settings, session and records
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Auth(AuthCommands),

    #[command(flatten)]
    Record(RecordCommands),

    #[command(flatten)]
    Report(ReportCommands),

    /// Export records to a file
    Export(ExportArgs),

    /// Import records from a JSON or CSV export
    Import(ImportArgs),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Change a setting (currency_symbol, date_format, log_filter)
    Set { key: String, value: String },
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store(paths: &LedgerPaths) -> Result<RecordStore<JsonFileBackend>> {
    let session = Session::load(paths)?;
    let store = RecordStore::new(open_backend(paths)?, session)
        .with_audit(AuditLogger::new(paths.audit_log()));
    Ok(store)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => LedgerPaths::with_base_dir(dir),
        None => LedgerPaths::new()?,
    };
    paths.ensure_directories()?;
    let mut settings = Settings::load_or_create(&paths)?;
    init_tracing(&settings);

    let local = Local::now();
    let offset = local.offset().fix();
    let now = local.with_timezone(&offset);
    let options = DisplayOptions {
        currency_symbol: settings.currency_symbol.clone(),
        date_format: settings.date_format.clone(),
        offset,
    };

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("米米记账 - personal bookkeeping");
            println!();
            println!("Run 'mimi --help' for usage information.");
            println!("Run 'mimi login <user>' to get started.");
            return Ok(());
        }
    };

    match command {
        Commands::Auth(cmd) => handle_auth_command(&paths, cmd)?,

        Commands::Config { action } => match action {
            Some(ConfigAction::Set { key, value }) => {
                settings.set(&key, &value)?;
                settings.save(&paths)?;
                println!("Set {} = {}", key, value);
            }
            None => {
                println!("mimi-ledger Configuration");
                println!("=========================");
                println!("Base directory:  {}", paths.base_dir().display());
                println!("Records file:    {}", paths.records_file().display());
                println!("Audit log:       {}", paths.audit_log().display());
                println!();
                println!("Settings:");
                println!("  currency_symbol: {}", settings.currency_symbol);
                println!("  date_format:     {}", settings.date_format);
                println!("  log_filter:      {}", settings.log_filter);
            }
        },

        Commands::Audit { limit } => {
            let entries = AuditLogger::new(paths.audit_log()).read_recent(limit)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }

        Commands::Record(cmd) => {
            let mut store = open_store(&paths)?;
            handle_record_command(&mut store, &options, cmd)?;
        }
        Commands::Report(cmd) => {
            let store = open_store(&paths)?;
            handle_report_command(&store, &now, &options.currency_symbol, cmd)?;
        }
        Commands::Export(args) => handle_export_command(&open_store(&paths)?, args)?,
        Commands::Import(args) => handle_import_command(&mut open_store(&paths)?, args)?,
    }

    Ok(())
}
