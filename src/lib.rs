//! mimi-ledger - personal bookkeeping (米米记账)
//!
//! Records income and expenses for a signed-in user. Estimated entries can
//! later be realized into actual ones (and reverted), and each record tracks
//! the state of its contract, third-party and invoice paperwork.
//!
//! # Architecture
//!
//! - `models`: records, money and identifiers
//! - `backend`: the record backend trait and its row types
//! - `storage`: JSON file backend
//! - `session`: who is signed in
//! - `services`: the record store, filtering and import parsing
//! - `reports`: monthly statistics and outstanding payments
//! - `export`: JSON, CSV and YAML writers
//! - `audit`: append-only change log
//! - `display` and `cli`: terminal front end
//!
//! # Example
//!
//! ```rust,ignore
//! use mimi_ledger::config::paths::LedgerPaths;
//! use mimi_ledger::services::RecordStore;
//! use mimi_ledger::session::Session;
//! use mimi_ledger::storage::open_backend;
//!
//! let paths = LedgerPaths::new()?;
//! let store = RecordStore::new(open_backend(&paths)?, Session::load(&paths)?);
//! let stats = store.stats(&chrono::Local::now());
//! ```

pub mod audit;
pub mod backend;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod session;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
