//! Contract with the record backend
//!
//! The backend owns the table of records and assigns ids and timestamps. The
//! record store talks to it only through [`RecordBackend`], so the hosted
//! service and the local [`JsonFileBackend`](crate::storage::JsonFileBackend)
//! are interchangeable.

pub mod row;

pub use row::{NewRecord, RecordPatch, RecordRow};

use crate::error::LedgerResult;
use crate::models::{RecordId, UserId};

/// Table of record rows keyed by id and owned by a user
pub trait RecordBackend {
    /// All rows owned by `user`, newest first
    fn list(&self, user: &UserId) -> LedgerResult<Vec<RecordRow>>;

    /// Insert one row and return it as stored
    fn insert(&self, record: NewRecord) -> LedgerResult<RecordRow>;

    /// Insert several rows in one request; all or nothing
    fn insert_batch(&self, records: Vec<NewRecord>) -> LedgerResult<Vec<RecordRow>>;

    /// Update one row owned by `user` and return it as stored
    fn update(&self, user: &UserId, id: RecordId, patch: RecordPatch) -> LedgerResult<RecordRow>;

    /// Delete one row owned by `user`
    fn delete(&self, user: &UserId, id: RecordId) -> LedgerResult<()>;
}

impl<B: RecordBackend + ?Sized> RecordBackend for &B {
    fn list(&self, user: &UserId) -> LedgerResult<Vec<RecordRow>> {
        (**self).list(user)
    }

    fn insert(&self, record: NewRecord) -> LedgerResult<RecordRow> {
        (**self).insert(record)
    }

    fn insert_batch(&self, records: Vec<NewRecord>) -> LedgerResult<Vec<RecordRow>> {
        (**self).insert_batch(records)
    }

    fn update(&self, user: &UserId, id: RecordId, patch: RecordPatch) -> LedgerResult<RecordRow> {
        (**self).update(user, id, patch)
    }

    fn delete(&self, user: &UserId, id: RecordId) -> LedgerResult<()> {
        (**self).delete(user, id)
    }
}
