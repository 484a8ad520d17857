//! In-memory status store
//!
//! Holds every record behind one mutex, so each operation is atomic the way a
//! single server-side statement is. Failure injection and call counting let
//! tests assert retry and no-write behaviour.

use super::traits::{StatusStore, StoreResult};
use crate::domain::{
    CollectionName, CollectionStatus, CollectionStatusRecord, RunId, StoreError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Stored attributes; `None` stands for a missing attribute
#[derive(Debug, Clone, Default)]
struct Row {
    status: Option<String>,
    files_exported: Option<u64>,
    files_sent: Option<u64>,
}

impl Row {
    fn status(&self) -> CollectionStatus {
        self.status
            .as_deref()
            .map(CollectionStatus::from_stored)
            .unwrap_or_default()
    }
}

/// Status store kept in process memory
#[derive(Debug, Default)]
pub struct InMemoryStatusStore {
    rows: Mutex<HashMap<(RunId, CollectionName), Row>>,
    pending_failures: AtomicUsize,
    exporting_unknown: AtomicBool,
    pending_unknown: AtomicBool,
    calls: AtomicUsize,
    writes: AtomicUsize,
}

impl InMemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record
    pub fn insert(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
        status: CollectionStatus,
        files_exported: u64,
        files_sent: u64,
    ) {
        self.insert_raw(
            run_id,
            collection,
            Some(status.as_str()),
            Some(files_exported),
            Some(files_sent),
        );
    }

    /// Insert a record with possibly missing attributes
    pub fn insert_raw(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
        status: Option<&str>,
        files_exported: Option<u64>,
        files_sent: Option<u64>,
    ) {
        self.lock().insert(
            (run_id.clone(), collection.clone()),
            Row {
                status: status.map(str::to_string),
                files_exported,
                files_sent,
            },
        );
    }

    /// Snapshot of one record, `None` if absent
    pub fn record(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> Option<CollectionStatusRecord> {
        self.lock()
            .get(&(run_id.clone(), collection.clone()))
            .map(|row| to_record(run_id, collection, row))
    }

    /// Make the next `n` calls fail with a transient error
    pub fn fail_next(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    /// Make the count queries report an unknown count
    pub fn set_counts_unknown(&self, exporting: bool, pending_send: bool) {
        self.exporting_unknown.store(exporting, Ordering::SeqCst);
        self.pending_unknown.store(pending_send, Ordering::SeqCst);
    }

    /// Calls received, including failed ones
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Successful increments and status assignments
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(RunId, CollectionName), Row>> {
        self.rows.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn begin(&self, operation: &str) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::ConnectionFailed(format!(
                "injected failure during {operation}"
            )));
        }
        Ok(())
    }

    fn count_where(&self, run_id: &RunId, predicate: impl Fn(&Row) -> bool) -> u64 {
        self.lock()
            .iter()
            .filter(|((run, _), row)| run == run_id && predicate(row))
            .count() as u64
    }
}

fn to_record(run_id: &RunId, collection: &CollectionName, row: &Row) -> CollectionStatusRecord {
    CollectionStatusRecord {
        run_id: run_id.clone(),
        collection: collection.clone(),
        status: row.status(),
        files_exported: row.files_exported.unwrap_or(0),
        files_sent: row.files_sent.unwrap_or(0),
    }
}

fn not_found(run_id: &RunId, collection: &CollectionName) -> StoreError {
    StoreError::RecordNotFound {
        run_id: run_id.to_string(),
        collection: collection.to_string(),
    }
}

#[async_trait]
impl StatusStore for InMemoryStatusStore {
    async fn get(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<CollectionStatusRecord> {
        self.begin("get")?;
        Ok(self.record(run_id, collection).unwrap_or_else(|| {
            CollectionStatusRecord::empty(run_id.clone(), collection.clone())
        }))
    }

    async fn count_exporting(&self, run_id: &RunId) -> StoreResult<Option<u64>> {
        self.begin("count_exporting")?;
        if self.exporting_unknown.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(self.count_where(run_id, |row| {
            row.status() == CollectionStatus::Exporting
        })))
    }

    async fn count_pending_send(&self, run_id: &RunId) -> StoreResult<Option<u64>> {
        self.begin("count_pending_send")?;
        if self.pending_unknown.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(Some(self.count_where(run_id, |row| {
            row.status() == CollectionStatus::Exported && row.files_exported.unwrap_or(0) > 0
        })))
    }

    async fn increment_files_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<u64> {
        self.begin("increment_files_sent")?;
        let mut rows = self.lock();
        let row = rows
            .get_mut(&(run_id.clone(), collection.clone()))
            .ok_or_else(|| not_found(run_id, collection))?;
        let sent = row.files_sent.unwrap_or(0) + 1;
        row.files_sent = Some(sent);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(sent)
    }

    async fn set_status_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<()> {
        self.begin("set_status_sent")?;
        let mut rows = self.lock();
        let row = rows
            .get_mut(&(run_id.clone(), collection.clone()))
            .ok_or_else(|| not_found(run_id, collection))?;
        row.status = Some(CollectionStatus::Sent.as_str().to_string());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
