//! Core data models for mimi-ledger

pub mod ids;
pub mod money;
pub mod record;

pub use ids::{RecordId, UserId};
pub use money::{Money, MoneyParseError};
pub use record::{
    Conversion, DocumentStatus, DocumentUpdate, RecordType, RecordValidationError,
    TransactionRecord,
};
