//! Audit trail of record mutations
//!
//! Every create, update, delete and import is appended to `audit.log` as one
//! JSON line with before/after snapshots. Audit writes never fail the
//! mutation that triggered them; the record store only logs the failure.

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, Operation};
pub use logger::AuditLogger;
