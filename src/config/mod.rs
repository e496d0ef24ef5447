//! Configuration module for mimi-ledger
//!
//! Path resolution and persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
