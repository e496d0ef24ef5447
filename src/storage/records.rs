//! Local record table stored as `records.json`
//!
//! Implements [`RecordBackend`] on top of a JSON file so the ledger works
//! without a hosted service. Every write is persisted atomically before it
//! returns; a failed write leaves the in-memory table as it was.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::backend::{NewRecord, RecordBackend, RecordPatch, RecordRow};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{RecordId, UserId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RecordTable {
    records: Vec<RecordRow>,
}

/// Record backend persisted to a single JSON file
pub struct JsonFileBackend {
    path: PathBuf,
    data: RwLock<HashMap<RecordId, RecordRow>>,
}

impl JsonFileBackend {
    /// Create an empty backend for `path` without touching the disk
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Create a backend and load whatever is already stored at `path`
    pub fn open(path: PathBuf) -> LedgerResult<Self> {
        let backend = Self::new(path);
        backend.load()?;
        Ok(backend)
    }

    pub fn load(&self) -> LedgerResult<()> {
        let table: RecordTable = read_json(&self.path)?;
        let mut data = self.write_lock()?;
        data.clear();
        for row in table.records {
            data.insert(row.id, row);
        }
        tracing::debug!(rows = data.len(), path = %self.path.display(), "loaded record table");
        Ok(())
    }

    /// Number of rows across all users
    pub fn count(&self) -> LedgerResult<usize> {
        Ok(self.read_lock()?.len())
    }

    fn read_lock(&self) -> LedgerResult<RwLockReadGuard<'_, HashMap<RecordId, RecordRow>>> {
        self.data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write_lock(&self) -> LedgerResult<RwLockWriteGuard<'_, HashMap<RecordId, RecordRow>>> {
        self.data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    fn persist(&self, data: &HashMap<RecordId, RecordRow>) -> LedgerResult<()> {
        let table = RecordTable {
            records: newest_first(data.values().cloned().collect()),
        };
        write_json_atomic(&self.path, &table)
            .map_err(|e| LedgerError::Backend(format!("Failed to persist records: {}", e)))
    }

    fn row_to_store(record: NewRecord) -> RecordRow {
        let now = Utc::now();
        RecordRow {
            id: RecordId::new(),
            user_id: record.user_id,
            name: record.name,
            amount: record.amount,
            record_type: record.record_type,
            is_converted: record.is_converted,
            converted_at: record.converted_at,
            contract_status: record.contract_status,
            third_party_status: record.third_party_status,
            invoice_status: record.invoice_status,
            created_at: record.created_at.unwrap_or(now),
            updated_at: now,
        }
    }
}

fn newest_first(mut rows: Vec<RecordRow>) -> Vec<RecordRow> {
    rows.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
    });
    rows
}

fn missing_row(user: &UserId, id: RecordId) -> LedgerError {
    LedgerError::Backend(format!("No record {} owned by {}", id, user))
}

impl RecordBackend for JsonFileBackend {
    fn list(&self, user: &UserId) -> LedgerResult<Vec<RecordRow>> {
        let data = self.read_lock()?;
        let rows = data
            .values()
            .filter(|row| &row.user_id == user)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    fn insert(&self, record: NewRecord) -> LedgerResult<RecordRow> {
        self.insert_batch(vec![record])?
            .pop()
            .ok_or_else(|| LedgerError::Backend("Insert returned no row".into()))
    }

    fn insert_batch(&self, records: Vec<NewRecord>) -> LedgerResult<Vec<RecordRow>> {
        let mut data = self.write_lock()?;
        let rows: Vec<RecordRow> = records.into_iter().map(Self::row_to_store).collect();

        for row in &rows {
            data.insert(row.id, row.clone());
        }

        if let Err(e) = self.persist(&data) {
            for row in &rows {
                data.remove(&row.id);
            }
            return Err(e);
        }

        Ok(rows)
    }

    fn update(&self, user: &UserId, id: RecordId, patch: RecordPatch) -> LedgerResult<RecordRow> {
        let mut data = self.write_lock()?;
        let previous = match data.get(&id) {
            Some(row) if &row.user_id == user => row.clone(),
            _ => return Err(missing_row(user, id)),
        };
        if patch.is_empty() {
            return Ok(previous);
        }

        let mut updated = previous.clone();
        patch.apply_to(&mut updated);
        updated.updated_at = Utc::now();
        data.insert(id, updated.clone());

        if let Err(e) = self.persist(&data) {
            data.insert(id, previous);
            return Err(e);
        }

        Ok(updated)
    }

    fn delete(&self, user: &UserId, id: RecordId) -> LedgerResult<()> {
        let mut data = self.write_lock()?;
        if !data.get(&id).is_some_and(|row| &row.user_id == user) {
            return Err(missing_row(user, id));
        }
        let Some(removed) = data.remove(&id) else {
            return Err(missing_row(user, id));
        };

        if let Err(e) = self.persist(&data) {
            data.insert(id, removed);
            return Err(e);
        }

        Ok(())
    }
}
