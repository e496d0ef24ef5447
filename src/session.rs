//! Current-user handle
//!
//! Stands in for the authentication collaborator: it only answers "who is
//! signed in, if anyone". The CLI persists it in `session.json`; library
//! callers construct it directly and pass it to the record store.

use serde::{Deserialize, Serialize};

use crate::config::paths::LedgerPaths;
use crate::error::LedgerResult;
use crate::models::UserId;
use crate::storage::{read_json, remove_if_exists, write_json_atomic};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    user: Option<UserId>,
}

impl Session {
    pub fn signed_in(user: UserId) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    /// Read the persisted session; a missing file means nobody is signed in
    pub fn load(paths: &LedgerPaths) -> LedgerResult<Self> {
        read_json(paths.session_file())
    }

    pub fn save(&self, paths: &LedgerPaths) -> LedgerResult<()> {
        write_json_atomic(paths.session_file(), self)
    }

    /// Forget the persisted session
    pub fn clear(paths: &LedgerPaths) -> LedgerResult<()> {
        remove_if_exists(paths.session_file())
    }
}
