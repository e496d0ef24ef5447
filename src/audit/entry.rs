//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::TransactionRecord;

use super::diff::generate_diff;

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Create,
    Update,
    Delete,
    /// Row inserted by a file import
    Import,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
            Operation::Import => write!(f, "IMPORT"),
        }
    }
}

/// A single audit log entry
///
/// Records one operation on a record with before/after snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    /// Owner of the record
    pub user: String,

    /// Short record id, e.g. `rec-1a2b3c4d`
    pub record_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,

    /// Human-readable diff summary
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_summary: Option<String>,
}

impl AuditEntry {
    fn new(operation: Operation, user: &str, record: &TransactionRecord) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            user: user.to_string(),
            record_id: record.id.to_string(),
            record_name: Some(record.name.clone()),
            before: None,
            after: None,
            diff_summary: None,
        }
    }

    pub fn create(user: &str, record: &TransactionRecord) -> Self {
        Self {
            after: serde_json::to_value(record).ok(),
            ..Self::new(Operation::Create, user, record)
        }
    }

    pub fn import(user: &str, record: &TransactionRecord) -> Self {
        Self {
            after: serde_json::to_value(record).ok(),
            ..Self::new(Operation::Import, user, record)
        }
    }

    /// Update entry with a diff of the two snapshots
    pub fn update(user: &str, before: &TransactionRecord, after: &TransactionRecord) -> Self {
        let before_json = serde_json::to_value(before).ok();
        let after_json = serde_json::to_value(after).ok();
        let diff_summary = match (&before_json, &after_json) {
            (Some(b), Some(a)) => generate_diff(b, a),
            _ => None,
        };

        Self {
            before: before_json,
            after: after_json,
            diff_summary,
            ..Self::new(Operation::Update, user, after)
        }
    }

    pub fn delete(user: &str, record: &TransactionRecord) -> Self {
        Self {
            before: serde_json::to_value(record).ok(),
            ..Self::new(Operation::Delete, user, record)
        }
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} by {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.record_id,
            self.user
        );

        if let Some(name) = &self.record_name {
            output.push_str(&format!(" ({})", name));
        }

        if let Some(diff) = &self.diff_summary {
            output.push_str(&format!("\n  Changes: {}", diff));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Conversion, Money, RecordType};

    fn sample() -> TransactionRecord {
        TransactionRecord::new("Consulting", Money::from_cents(500000), RecordType::EstimatedIncome)
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Import.to_string(), "IMPORT");
    }

    #[test]
    fn test_create_entry_has_after_only() {
        let record = sample();
        let entry = AuditEntry::create("alice", &record);

        assert_eq!(entry.operation, Operation::Create);
        assert_eq!(entry.record_id, record.id.to_string());
        assert!(entry.before.is_none());
        assert_eq!(entry.after.as_ref().unwrap()["name"], "Consulting");
    }

    #[test]
    fn test_update_entry_records_conversion() {
        let before = sample();
        let mut after = before.clone();
        after
            .apply_conversion(Conversion::Realize, Utc::now())
            .unwrap();

        let entry = AuditEntry::update("alice", &before, &after);
        let diff = entry.diff_summary.unwrap();
        assert!(diff.contains("type: \"estimated_income\" -> \"income\""));
        assert!(diff.contains("is_converted: false -> true"));
    }

    #[test]
    fn test_delete_entry_has_before_only() {
        let entry = AuditEntry::delete("alice", &sample());
        assert!(entry.before.is_some());
        assert!(entry.after.is_none());
    }

    #[test]
    fn test_format_human_readable() {
        let record = sample();
        let entry = AuditEntry::create("alice", &record);
        let output = entry.format_human_readable();

        assert!(output.contains("CREATE"));
        assert!(output.contains(&record.id.to_string()));
        assert!(output.contains("by alice"));
        assert!(output.contains("(Consulting)"));
    }
}
