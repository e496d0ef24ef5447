//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the record store.

pub mod auth;
pub mod export;
pub mod import;
pub mod record;
pub mod report;

pub use auth::{handle_auth_command, AuthCommands};
pub use export::{handle_export_command, ExportArgs};
pub use import::{handle_import_command, ImportArgs};
pub use record::{handle_record_command, RecordCommands};
pub use report::{handle_report_command, ReportCommands};
