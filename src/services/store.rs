//! Record store
//!
//! Holds the signed-in user's records in memory and mirrors every mutation to
//! the backend. The local list changes only after the backend accepted the
//! change. Without a signed-in user the list is empty and every mutation is a
//! no-op.
//!
//! Backend failures during add, edit, convert, paperwork updates and delete
//! are logged and reported as `Ok(None)`, leaving local state untouched.
//! Import is the exception: a failed batch insert is returned to the caller.

use chrono::{DateTime, TimeZone, Utc};

use crate::audit::{AuditEntry, AuditLogger};
use crate::backend::{NewRecord, RecordBackend, RecordPatch};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    Conversion, DocumentUpdate, Money, RecordId, RecordType, TransactionRecord, UserId,
};
use crate::reports::MonthlyStats;
use crate::session::Session;

use super::filter::RecordFilter;
use super::import::partition_new;

/// Outcome of a completed import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Candidates matching a stored record
    pub skipped: usize,
}

pub struct RecordStore<B: RecordBackend> {
    backend: B,
    session: Session,
    records: Vec<TransactionRecord>,
    audit: Option<AuditLogger>,
}

impl<B: RecordBackend> RecordStore<B> {
    /// Create a store and load the session user's records
    pub fn new(backend: B, session: Session) -> Self {
        let mut store = Self {
            backend,
            session,
            records: Vec::new(),
            audit: None,
        };
        store.refresh();
        store
    }

    /// Append every accepted mutation to `logger`
    pub fn with_audit(mut self, logger: AuditLogger) -> Self {
        self.audit = Some(logger);
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Switch users and reload
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
        self.refresh();
    }

    /// Reload the list from the backend
    ///
    /// Signed out, the list becomes empty. A backend failure is logged and the
    /// current list is kept.
    pub fn refresh(&mut self) {
        let Some(user) = self.session.user().cloned() else {
            self.records.clear();
            return;
        };

        match self.backend.list(&user) {
            Ok(rows) => {
                self.records = rows.into_iter().map(TransactionRecord::from).collect();
                tracing::debug!(user = %user, count = self.records.len(), "refreshed records");
            }
            Err(e) => tracing::error!(user = %user, error = %e, "failed to load records"),
        }
    }

    /// Current records, newest first
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&TransactionRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Resolve a user-typed identifier (full id, `rec-` short form or prefix)
    pub fn find(&self, identifier: &str) -> LedgerResult<&TransactionRecord> {
        let mut matches = self.records.iter().filter(|r| r.id.matches(identifier));
        match (matches.next(), matches.next()) {
            (Some(record), None) => Ok(record),
            (Some(_), Some(_)) => Err(LedgerError::Validation(format!(
                "Identifier '{}' matches more than one record; use more characters",
                identifier
            ))),
            (None, _) => Err(LedgerError::record_not_found(identifier)),
        }
    }

    /// Records passing `filter`, in list order
    pub fn filtered(&self, filter: &RecordFilter) -> Vec<&TransactionRecord> {
        filter.apply(&self.records)
    }

    pub fn stats<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> MonthlyStats {
        MonthlyStats::compute(&self.records, now)
    }

    /// Create a record and put it at the top of the list
    pub fn add(
        &mut self,
        name: &str,
        amount: Money,
        record_type: RecordType,
    ) -> LedgerResult<Option<TransactionRecord>> {
        let name = validate_name(name)?;
        validate_amount(amount)?;

        let Some(user) = self.session.user().cloned() else {
            return Ok(None);
        };

        let row = match self
            .backend
            .insert(NewRecord::entered(user.clone(), name, amount, record_type))
        {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(user = %user, error = %e, "failed to add record");
                return Ok(None);
            }
        };

        let record = TransactionRecord::from(row);
        self.records.insert(0, record.clone());
        self.audit(&user, &[AuditEntry::create(user.as_str(), &record)]);
        Ok(Some(record))
    }

    /// Realize an estimated record or revert an actual one
    pub fn convert(
        &mut self,
        id: RecordId,
        conversion: Conversion,
    ) -> LedgerResult<Option<TransactionRecord>> {
        let Some(user) = self.session.user().cloned() else {
            return Ok(None);
        };
        let current = self.local(id)?;

        let mut next = current.clone();
        next.apply_conversion(conversion, Utc::now())
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.apply_patch(&user, current, RecordPatch::conversion_of(&next), "convert")
    }

    /// Rename and/or re-price a record
    pub fn update(
        &mut self,
        id: RecordId,
        name: Option<&str>,
        amount: Option<Money>,
    ) -> LedgerResult<Option<TransactionRecord>> {
        let name = name.map(validate_name).transpose()?;
        if let Some(amount) = amount {
            validate_amount(amount)?;
        }
        if name.is_none() && amount.is_none() {
            return Err(LedgerError::Validation("Nothing to update".into()));
        }

        let Some(user) = self.session.user().cloned() else {
            return Ok(None);
        };
        let current = self.local(id)?;

        let patch = RecordPatch {
            name,
            amount,
            ..RecordPatch::default()
        };
        self.apply_patch(&user, current, patch, "update")
    }

    /// Set any of the three paperwork statuses
    pub fn update_documents(
        &mut self,
        id: RecordId,
        update: DocumentUpdate,
    ) -> LedgerResult<Option<TransactionRecord>> {
        if update.is_empty() {
            return Err(LedgerError::Validation("Nothing to update".into()));
        }

        let Some(user) = self.session.user().cloned() else {
            return Ok(None);
        };
        let current = self.local(id)?;

        let patch = RecordPatch {
            contract_status: update.contract,
            third_party_status: update.third_party,
            invoice_status: update.invoice,
            ..RecordPatch::default()
        };
        self.apply_patch(&user, current, patch, "update documents of")
    }

    /// Remove a record; returns what was removed
    pub fn delete(&mut self, id: RecordId) -> LedgerResult<Option<TransactionRecord>> {
        let Some(user) = self.session.user().cloned() else {
            return Ok(None);
        };
        let current = self.local(id)?;

        if let Err(e) = self.backend.delete(&user, id) {
            tracing::error!(user = %user, record = %id, error = %e, "failed to delete record");
            return Ok(None);
        }

        self.records.retain(|r| r.id != id);
        self.audit(&user, &[AuditEntry::delete(user.as_str(), &current)]);
        Ok(Some(current))
    }

    /// Insert the candidates that are not already stored, as one batch
    ///
    /// Fails with [`LedgerError::NothingToImport`] when every candidate is a
    /// duplicate. Backend failures are returned, not swallowed.
    pub fn import_records(
        &mut self,
        candidates: Vec<TransactionRecord>,
    ) -> LedgerResult<ImportSummary> {
        let Some(user) = self.session.user().cloned() else {
            return Ok(ImportSummary::default());
        };

        let partition = partition_new(&self.records, candidates);
        if partition.fresh.is_empty() {
            return Err(LedgerError::NothingToImport {
                skipped: partition.skipped,
            });
        }

        let batch = partition
            .fresh
            .iter()
            .map(|record| NewRecord::imported(user.clone(), record))
            .collect();
        let rows = self.backend.insert_batch(batch).map_err(|e| {
            tracing::error!(user = %user, error = %e, "failed to import records");
            e
        })?;

        let mut inserted: Vec<TransactionRecord> =
            rows.into_iter().map(TransactionRecord::from).collect();
        let entries: Vec<AuditEntry> = inserted
            .iter()
            .map(|r| AuditEntry::import(user.as_str(), r))
            .collect();

        let summary = ImportSummary {
            imported: inserted.len(),
            skipped: partition.skipped,
        };

        inserted.append(&mut self.records);
        self.records = inserted;
        self.audit(&user, &entries);

        tracing::debug!(
            user = %user,
            imported = summary.imported,
            skipped = summary.skipped,
            "import finished"
        );
        Ok(summary)
    }

    fn local(&self, id: RecordId) -> LedgerResult<TransactionRecord> {
        self.get(id)
            .cloned()
            .ok_or_else(|| LedgerError::record_not_found(id.to_string()))
    }

    fn apply_patch(
        &mut self,
        user: &UserId,
        current: TransactionRecord,
        patch: RecordPatch,
        action: &str,
    ) -> LedgerResult<Option<TransactionRecord>> {
        let row = match self.backend.update(user, current.id, patch) {
            Ok(row) => row,
            Err(e) => {
                tracing::error!(
                    user = %user,
                    record = %current.id,
                    error = %e,
                    "failed to {} record",
                    action
                );
                return Ok(None);
            }
        };

        let updated = TransactionRecord::from(row);
        if let Some(slot) = self.records.iter_mut().find(|r| r.id == updated.id) {
            *slot = updated.clone();
        }
        self.audit(user, &[AuditEntry::update(user.as_str(), &current, &updated)]);
        Ok(Some(updated))
    }

    fn audit(&self, user: &UserId, entries: &[AuditEntry]) {
        if let Some(logger) = &self.audit {
            if let Err(e) = logger.log_batch(entries) {
                tracing::warn!(user = %user, error = %e, "failed to write audit log");
            }
        }
    }
}

fn validate_name(name: &str) -> LedgerResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::Validation("Name cannot be empty".into()));
    }
    Ok(name.to_string())
}

fn validate_amount(amount: Money) -> LedgerResult<()> {
    if amount.is_negative() {
        return Err(LedgerError::Validation(format!(
            "Amount must not be negative (got {})",
            amount
        )));
    }
    if !amount.is_within_limit() {
        return Err(LedgerError::Validation(format!(
            "Amount {} exceeds the limit of {}",
            amount,
            Money::MAX
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RecordRow;
    use crate::models::DocumentStatus;
    use crate::storage::JsonFileBackend;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, RecordStore<JsonFileBackend>) {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::open(temp_dir.path().join("records.json")).unwrap();
        let store = RecordStore::new(backend, Session::signed_in(UserId::new("alice")));
        (temp_dir, store)
    }

    /// Backend whose every call fails, as when the service is unreachable
    struct UnreachableBackend;

    impl RecordBackend for UnreachableBackend {
        fn list(&self, _user: &UserId) -> LedgerResult<Vec<RecordRow>> {
            Err(LedgerError::Backend("connection refused".into()))
        }

        fn insert(&self, _record: NewRecord) -> LedgerResult<RecordRow> {
            Err(LedgerError::Backend("connection refused".into()))
        }

        fn insert_batch(&self, _records: Vec<NewRecord>) -> LedgerResult<Vec<RecordRow>> {
            Err(LedgerError::Backend("connection refused".into()))
        }

        fn update(&self, _user: &UserId, _id: RecordId, _patch: RecordPatch) -> LedgerResult<RecordRow> {
            Err(LedgerError::Backend("connection refused".into()))
        }

        fn delete(&self, _user: &UserId, _id: RecordId) -> LedgerResult<()> {
            Err(LedgerError::Backend("connection refused".into()))
        }
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let (temp_dir, mut store) = create_test_store();

        store
            .add("Salary", Money::from_cents(10000), RecordType::Income)
            .unwrap()
            .unwrap();
        let rent = store
            .add("  Rent ", Money::from_cents(4000), RecordType::Expense)
            .unwrap()
            .unwrap();

        assert_eq!(rent.name, "Rent");
        assert_eq!(store.records()[0].id, rent.id);
        assert_eq!(store.records().len(), 2);

        let backend = JsonFileBackend::open(temp_dir.path().join("records.json")).unwrap();
        let reopened = RecordStore::new(backend, Session::signed_in(UserId::new("alice")));
        assert_eq!(reopened.records().len(), 2);
    }

    #[test]
    fn test_add_validation() {
        let (_temp_dir, mut store) = create_test_store();

        let err = store
            .add("   ", Money::from_cents(100), RecordType::Expense)
            .unwrap_err();
        assert!(err.is_validation());

        let err = store
            .add("Refund", Money::from_cents(-100), RecordType::Expense)
            .unwrap_err();
        assert!(err.is_validation());

        let err = store
            .add("Windfall", Money::MAX + Money::from_cents(1), RecordType::Income)
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_scenario_income_and_expense_stats() {
        let (_temp_dir, mut store) = create_test_store();
        store
            .add("Salary", Money::from_cents(10000), RecordType::Income)
            .unwrap();
        store
            .add("Groceries", Money::from_cents(4000), RecordType::Expense)
            .unwrap();

        let stats = store.stats(&Utc::now());
        assert_eq!(stats.total_income, Money::from_cents(10000));
        assert_eq!(stats.total_expense, Money::from_cents(4000));
        assert_eq!(stats.balance, Money::from_cents(6000));
    }

    #[test]
    fn test_convert_round_trip() {
        let (_temp_dir, mut store) = create_test_store();
        let deal = store
            .add("Consulting", Money::from_cents(500000), RecordType::EstimatedIncome)
            .unwrap()
            .unwrap();

        let realized = store
            .convert(deal.id, Conversion::Realize)
            .unwrap()
            .unwrap();
        assert_eq!(realized.record_type, RecordType::Income);
        assert!(realized.is_converted);
        assert!(realized.converted_at.is_some());
        assert_eq!(realized.date, deal.date);

        let reverted = store.convert(deal.id, Conversion::Revert).unwrap().unwrap();
        assert_eq!(reverted.record_type, RecordType::EstimatedIncome);
        assert!(!reverted.is_converted);
        assert!(reverted.converted_at.is_none());
        assert_eq!(store.get(deal.id), Some(&reverted));
    }

    #[test]
    fn test_forbidden_conversion_is_validation_error() {
        let (_temp_dir, mut store) = create_test_store();
        let salary = store
            .add("Salary", Money::from_cents(100), RecordType::Income)
            .unwrap()
            .unwrap();

        let err = store.convert(salary.id, Conversion::Realize).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(store.get(salary.id).unwrap().record_type, RecordType::Income);
    }

    #[test]
    fn test_update_and_documents() {
        let (_temp_dir, mut store) = create_test_store();
        let deal = store
            .add("Deal", Money::from_cents(100), RecordType::EstimatedIncome)
            .unwrap()
            .unwrap();

        let renamed = store
            .update(deal.id, Some("Big deal"), Some(Money::from_cents(250)))
            .unwrap()
            .unwrap();
        assert_eq!(renamed.name, "Big deal");
        assert_eq!(renamed.amount, Money::from_cents(250));

        let documented = store
            .update_documents(
                deal.id,
                DocumentUpdate {
                    invoice: Some(DocumentStatus::Completed),
                    ..DocumentUpdate::default()
                },
            )
            .unwrap()
            .unwrap();
        assert_eq!(documented.invoice_status, DocumentStatus::Completed);
        assert_eq!(documented.contract_status, DocumentStatus::Incomplete);

        assert!(store.update(deal.id, None, None).unwrap_err().is_validation());
    }

    #[test]
    fn test_delete_and_unknown_ids() {
        let (_temp_dir, mut store) = create_test_store();
        let rent = store
            .add("Rent", Money::from_cents(100), RecordType::Expense)
            .unwrap()
            .unwrap();

        let removed = store.delete(rent.id).unwrap().unwrap();
        assert_eq!(removed.id, rent.id);
        assert!(store.records().is_empty());

        let err = store.delete(rent.id).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, mut store) = create_test_store();
        let rent = store
            .add("Rent", Money::from_cents(100), RecordType::Expense)
            .unwrap()
            .unwrap();

        assert_eq!(store.find(&rent.id.to_string()).unwrap().id, rent.id);
        assert!(store.find("rec-zzzzzzzz").unwrap_err().is_not_found());
    }

    #[test]
    fn test_signed_out_store_is_empty_and_inert() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::open(temp_dir.path().join("records.json")).unwrap();
        let mut store = RecordStore::new(&backend, Session::signed_in(UserId::new("alice")));
        store
            .add("Rent", Money::from_cents(100), RecordType::Expense)
            .unwrap();

        store.set_session(Session::anonymous());
        assert!(store.records().is_empty());
        assert_eq!(
            store
                .add("Lunch", Money::from_cents(100), RecordType::Expense)
                .unwrap(),
            None
        );
        assert_eq!(
            store.import_records(Vec::new()).unwrap(),
            ImportSummary::default()
        );
        assert_eq!(backend.count().unwrap(), 1);
    }

    #[test]
    fn test_records_are_scoped_to_user() {
        let temp_dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::open(temp_dir.path().join("records.json")).unwrap();
        let mut store = RecordStore::new(&backend, Session::signed_in(UserId::new("alice")));
        store
            .add("Rent", Money::from_cents(100), RecordType::Expense)
            .unwrap();

        store.set_session(Session::signed_in(UserId::new("bob")));
        assert!(store.records().is_empty());

        store.set_session(Session::signed_in(UserId::new("alice")));
        assert_eq!(store.records().len(), 1);
    }

    #[test]
    fn test_backend_failure_is_silent_for_mutations() {
        let mut store = RecordStore::new(UnreachableBackend, Session::signed_in(UserId::new("alice")));

        let added = store
            .add("Rent", Money::from_cents(100), RecordType::Expense)
            .unwrap();
        assert_eq!(added, None);
        assert!(store.records().is_empty());
    }

    #[test]
    fn test_backend_failure_propagates_for_import() {
        let mut store = RecordStore::new(UnreachableBackend, Session::signed_in(UserId::new("alice")));
        let candidate = TransactionRecord::new("Rent", Money::from_cents(100), RecordType::Expense);

        let err = store.import_records(vec![candidate]).unwrap_err();
        assert!(matches!(err, LedgerError::Backend(_)));
        assert!(!err.is_nothing_to_import());
    }

    #[test]
    fn test_import_skips_duplicates() {
        let (_temp_dir, mut store) = create_test_store();
        let march_first = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let rent = TransactionRecord::with_date(
            "Rent",
            Money::from_cents(120000),
            RecordType::Expense,
            march_first,
        );

        let first = store.import_records(vec![rent.clone()]).unwrap();
        assert_eq!(first, ImportSummary { imported: 1, skipped: 0 });
        assert_eq!(store.records()[0].date, march_first);

        let mut later_same_day = rent.clone();
        later_same_day.date = Utc.with_ymd_and_hms(2024, 3, 1, 22, 30, 0).unwrap();
        let mut dearer = rent.clone();
        dearer.amount = Money::from_cents(120100);

        let second = store.import_records(vec![later_same_day, dearer]).unwrap();
        assert_eq!(second, ImportSummary { imported: 1, skipped: 1 });
        assert_eq!(store.records().len(), 2);
    }

    #[test]
    fn test_import_of_only_duplicates_stores_nothing() {
        let (temp_dir, mut store) = create_test_store();
        let rent = TransactionRecord::new("Rent", Money::from_cents(120000), RecordType::Expense);
        store.import_records(vec![rent.clone()]).unwrap();

        let err = store.import_records(vec![rent]).unwrap_err();
        assert!(err.is_nothing_to_import());
        assert!(matches!(err, LedgerError::NothingToImport { skipped: 1 }));

        let backend = JsonFileBackend::open(temp_dir.path().join("records.json")).unwrap();
        assert_eq!(backend.count().unwrap(), 1);
    }

    #[test]
    fn test_mutations_are_audited() {
        let (temp_dir, store) = create_test_store();
        let log_path = temp_dir.path().join("audit.log");
        let mut store = store.with_audit(AuditLogger::new(log_path.clone()));

        let rent = store
            .add("Rent", Money::from_cents(100), RecordType::Expense)
            .unwrap()
            .unwrap();
        store
            .update(rent.id, None, Some(Money::from_cents(200)))
            .unwrap();
        store.delete(rent.id).unwrap();

        let entries = AuditLogger::new(log_path).read_all().unwrap();
        assert_eq!(entries.len(), 3);
        assert!(entries[1]
            .diff_summary
            .as_deref()
            .unwrap()
            .contains("amount: 100 -> 200"));
    }
}
