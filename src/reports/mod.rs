//! Reports module for mimi-ledger
//!
//! Monthly statistics and the outstanding payments ranking.

pub mod monthly;
pub mod outstanding;

pub use monthly::MonthlyStats;
pub use outstanding::{OutstandingEntry, OutstandingReport};
