//! Row shapes exchanged with the record backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{DocumentStatus, Money, RecordId, RecordType, TransactionRecord, UserId};

/// A stored row, including the server-assigned id and timestamps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: RecordId,
    pub user_id: UserId,
    pub name: String,
    pub amount: Money,
    #[serde(rename = "type")]
    pub record_type: RecordType,
    #[serde(default)]
    pub is_converted: bool,
    #[serde(default)]
    pub converted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contract_status: DocumentStatus,
    #[serde(default)]
    pub third_party_status: DocumentStatus,
    #[serde(default)]
    pub invoice_status: DocumentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<RecordRow> for TransactionRecord {
    fn from(row: RecordRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            amount: row.amount,
            record_type: row.record_type,
            date: row.created_at,
            is_converted: row.is_converted,
            converted_at: row.converted_at,
            contract_status: row.contract_status,
            third_party_status: row.third_party_status,
            invoice_status: row.invoice_status,
        }
    }
}

/// Insert payload; the backend assigns id and `updated_at`
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub user_id: UserId,
    pub name: String,
    pub amount: Money,
    pub record_type: RecordType,
    pub is_converted: bool,
    pub converted_at: Option<DateTime<Utc>>,
    pub contract_status: DocumentStatus,
    pub third_party_status: DocumentStatus,
    pub invoice_status: DocumentStatus,
    /// Supplied for imported rows; `None` means "now"
    pub created_at: Option<DateTime<Utc>>,
}

impl NewRecord {
    /// Fresh entry typed in by the user
    pub fn entered(user_id: UserId, name: String, amount: Money, record_type: RecordType) -> Self {
        Self {
            user_id,
            name,
            amount,
            record_type,
            is_converted: false,
            converted_at: None,
            contract_status: DocumentStatus::default(),
            third_party_status: DocumentStatus::default(),
            invoice_status: DocumentStatus::default(),
            created_at: None,
        }
    }

    /// Insert payload carrying every field of an imported candidate
    pub fn imported(user_id: UserId, record: &TransactionRecord) -> Self {
        Self {
            user_id,
            name: record.name.clone(),
            amount: record.amount,
            record_type: record.record_type,
            is_converted: record.is_converted,
            converted_at: record.converted_at,
            contract_status: record.contract_status,
            third_party_status: record.third_party_status,
            invoice_status: record.invoice_status,
            created_at: Some(record.date),
        }
    }
}

/// Partial update of a row; `None` leaves a column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub record_type: Option<RecordType>,
    pub is_converted: Option<bool>,
    /// `Some(None)` clears the column
    pub converted_at: Option<Option<DateTime<Utc>>>,
    pub contract_status: Option<DocumentStatus>,
    pub third_party_status: Option<DocumentStatus>,
    pub invoice_status: Option<DocumentStatus>,
}

impl RecordPatch {
    /// Patch that moves a row to the state of `record` after a conversion
    pub fn conversion_of(record: &TransactionRecord) -> Self {
        Self {
            record_type: Some(record.record_type),
            is_converted: Some(record.is_converted),
            converted_at: Some(record.converted_at),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the patch to a stored row
    pub fn apply_to(&self, row: &mut RecordRow) {
        if let Some(name) = &self.name {
            row.name = name.clone();
        }
        if let Some(amount) = self.amount {
            row.amount = amount;
        }
        if let Some(record_type) = self.record_type {
            row.record_type = record_type;
        }
        if let Some(is_converted) = self.is_converted {
            row.is_converted = is_converted;
        }
        if let Some(converted_at) = self.converted_at {
            row.converted_at = converted_at;
        }
        if let Some(status) = self.contract_status {
            row.contract_status = status;
        }
        if let Some(status) = self.third_party_status {
            row.third_party_status = status;
        }
        if let Some(status) = self.invoice_status {
            row.invoice_status = status;
        }
    }
}
