//! Strongly-typed identifiers
//!
//! Record identifiers are UUIDs assigned by the backend. User handles are
//! opaque strings handed out by the authentication collaborator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const RECORD_PREFIX: &str = "rec-";

/// Identifier of a stored transaction record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new random ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short form shown in listings, e.g. `rec-1a2b3c4d`
    pub fn short(&self) -> String {
        format!("{}{}", RECORD_PREFIX, &self.0.to_string()[..8])
    }

    /// Check whether a user-typed identifier refers to this record
    ///
    /// Accepts the full UUID, the short display form, or its bare 8-char prefix.
    pub fn matches(&self, identifier: &str) -> bool {
        let identifier = identifier.trim().to_ascii_lowercase();
        let bare = identifier
            .strip_prefix(RECORD_PREFIX)
            .unwrap_or(&identifier);
        let full = self.0.to_string();
        if bare.len() < 8 {
            return false;
        }
        full == bare || full.starts_with(bare)
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short())
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix(RECORD_PREFIX).unwrap_or(s);
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Handle of the signed-in user, as issued by the auth collaborator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_display() {
        let id = RecordId::new();
        let display = id.to_string();
        assert!(display.starts_with("rec-"));
        assert_eq!(display.len(), 12);
    }

    #[test]
    fn test_record_id_parse_with_and_without_prefix() {
        let uuid_str = "550e8400-e29b-41d4-a716-446655440000";
        let plain: RecordId = uuid_str.parse().unwrap();
        let prefixed: RecordId = format!("rec-{}", uuid_str).parse().unwrap();
        assert_eq!(plain, prefixed);
        assert_eq!(plain.as_uuid().to_string(), uuid_str);
    }

    #[test]
    fn test_record_id_matches_short_forms() {
        let id: RecordId = "550e8400-e29b-41d4-a716-446655440000".parse().unwrap();
        assert!(id.matches("rec-550e8400"));
        assert!(id.matches("550E8400"));
        assert!(id.matches("550e8400-e29b-41d4-a716-446655440000"));
        assert!(!id.matches("550e"));
        assert!(!id.matches("rec-deadbeef"));
    }

    #[test]
    fn test_record_id_serialization() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let back: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }

    #[test]
    fn test_user_id_is_transparent() {
        let user = UserId::new("alice");
        assert_eq!(serde_json::to_string(&user).unwrap(), "\"alice\"");
        assert_eq!(user.to_string(), "alice");
    }
}
