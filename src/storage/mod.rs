//! Local persistence for mimi-ledger
//!
//! JSON files with atomic writes: the record table behind
//! [`JsonFileBackend`] plus helpers shared by the session and settings files.

pub mod file_io;
pub mod records;

pub use file_io::{read_json, remove_if_exists, write_json_atomic};
pub use records::JsonFileBackend;

use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Open the local record table under `paths`, creating directories as needed
pub fn open_backend(paths: &LedgerPaths) -> Result<JsonFileBackend, LedgerError> {
    paths.ensure_directories()?;
    JsonFileBackend::open(paths.records_file())
}
