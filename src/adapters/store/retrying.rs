//! Retry decorator for status stores

use super::traits::{StatusStore, StoreResult};
use crate::core::retry::RetryExecutor;
use crate::domain::{CollectionName, CollectionStatusRecord, RunId, StoreError};
use async_trait::async_trait;

/// Wraps every call of an inner store in a [`RetryExecutor`]
///
/// Exhausted retries surface as [`StoreError::Unavailable`] carrying the last
/// underlying failure.
pub struct RetryingStatusStore<S> {
    inner: S,
    executor: RetryExecutor,
}

impl<S: StatusStore> RetryingStatusStore<S> {
    pub fn new(inner: S, executor: RetryExecutor) -> Self {
        Self { inner, executor }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    fn exhausted(&self, operation: &'static str, error: StoreError) -> StoreError {
        StoreError::Unavailable {
            operation,
            attempts: self.executor.policy().max_attempts,
            last_error: error.to_string(),
        }
    }
}

#[async_trait]
impl<S: StatusStore> StatusStore for RetryingStatusStore<S> {
    async fn get(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<CollectionStatusRecord> {
        self.executor
            .run("get", || self.inner.get(run_id, collection))
            .await
            .map_err(|e| self.exhausted("get", e))
    }

    async fn count_exporting(&self, run_id: &RunId) -> StoreResult<Option<u64>> {
        self.executor
            .run("count_exporting", || self.inner.count_exporting(run_id))
            .await
            .map_err(|e| self.exhausted("count_exporting", e))
    }

    async fn count_pending_send(&self, run_id: &RunId) -> StoreResult<Option<u64>> {
        self.executor
            .run("count_pending_send", || self.inner.count_pending_send(run_id))
            .await
            .map_err(|e| self.exhausted("count_pending_send", e))
    }

    async fn increment_files_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<u64> {
        self.executor
            .run("increment_files_sent", || {
                self.inner.increment_files_sent(run_id, collection)
            })
            .await
            .map_err(|e| self.exhausted("increment_files_sent", e))
    }

    async fn set_status_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<()> {
        self.executor
            .run("set_status_sent", || self.inner.set_status_sent(run_id, collection))
            .await
            .map_err(|e| self.exhausted("set_status_sent", e))
    }

    async fn test_connection(&self) -> StoreResult<()> {
        self.executor
            .run("test_connection", || self.inner.test_connection())
            .await
            .map_err(|e| self.exhausted("test_connection", e))
    }

    async fn ensure_schema(&self) -> StoreResult<()> {
        self.executor
            .run("ensure_schema", || self.inner.ensure_schema())
            .await
            .map_err(|e| self.exhausted("ensure_schema", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::memory::InMemoryStatusStore;
    use crate::core::retry::RetryPolicy;
    use crate::domain::CollectionStatus;
    use std::time::Duration;

    fn policy(max_attempts: usize) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_delay: Duration::from_millis(1),
            multiplier: 2.0,
            max_delay: Duration::from_millis(5),
        }
    }

    fn key() -> (RunId, CollectionName) {
        (
            RunId::new("123").unwrap(),
            CollectionName::new("db.core.toDo").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_transient_failures_are_hidden() {
        let (run_id, collection) = key();
        let memory = InMemoryStatusStore::new();
        memory.insert(&run_id, &collection, CollectionStatus::Exported, 2, 2);
        memory.fail_next(2);

        let store = RetryingStatusStore::new(memory, RetryExecutor::new(policy(5)));
        let record = store.get(&run_id, &collection).await.unwrap();

        assert_eq!(record.status, CollectionStatus::Exported);
        assert_eq!(store.inner().calls(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_surfaces_unavailable() {
        let (run_id, collection) = key();
        let memory = InMemoryStatusStore::new();
        memory.insert(&run_id, &collection, CollectionStatus::Exported, 2, 1);
        memory.fail_next(10);

        let store = RetryingStatusStore::new(memory, RetryExecutor::new(policy(3)));
        let err = store
            .increment_files_sent(&run_id, &collection)
            .await
            .unwrap_err();

        match err {
            StoreError::Unavailable {
                operation,
                attempts,
                ..
            } => {
                assert_eq!(operation, "increment_files_sent");
                assert_eq!(attempts, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(store.inner().calls(), 3);
        assert_eq!(store.inner().record(&run_id, &collection).unwrap().files_sent, 1);
    }
}
