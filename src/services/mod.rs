//! Business logic for mimi-ledger
//!
//! The record store owns the in-memory list; filtering and import parsing are
//! pure functions over it.

pub mod filter;
pub mod import;
pub mod store;

pub use filter::{month_bounds, CategoryFilter, RecordFilter, StatKind};
pub use import::{parse_records, partition_new, DedupKey, ImportFormat, Partition};
pub use store::{ImportSummary, RecordStore};
