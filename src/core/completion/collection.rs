//! Per-collection completion
//!
//! One consistent read decides whether the collection has delivered every
//! exported file. The `Sent` write that follows is unconditional and
//! idempotent, which is what makes read-then-write safe without a
//! compare-and-swap.

use crate::adapters::store::StatusStore;
use crate::domain::{CollectionName, CollectionStatus, Result, RunId};
use crate::log_collection_status;
use std::sync::Arc;

/// Decides whether one collection is fully sent
pub struct CollectionCompletionEvaluator {
    store: Arc<dyn StatusStore + Send + Sync>,
}

impl CollectionCompletionEvaluator {
    pub fn new(store: Arc<dyn StatusStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Move the collection to `Sent` if it is eligible
    ///
    /// Returns whether the write was issued. Ineligible records are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn try_mark_sent(&self, run_id: &RunId, collection: &CollectionName) -> Result<bool> {
        let record = self.store.get(run_id, collection).await?;
        let eligible = record.is_eligible_for_sent();

        tracing::info!(
            run_id = %run_id,
            collection = %collection,
            current_status = %record.status,
            files_exported = record.files_exported,
            files_sent = record.files_sent,
            is_complete = eligible,
            "Collection status"
        );

        if eligible {
            self.store.set_status_sent(run_id, collection).await?;
        }

        Ok(eligible)
    }

    /// Settle the collection's status and report it
    ///
    /// - eligible: writes `Sent` and returns `Sent`
    /// - `Exported` with no files: returns `NoFilesExported`, nothing written
    /// - otherwise: returns the stored status, nothing written
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn set_collection_status(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> Result<CollectionStatus> {
        Ok(self.settle(run_id, collection).await?.status)
    }

    /// Same as [`Self::set_collection_status`], also reporting whether this
    /// call issued the `Sent` write
    ///
    /// A record that was already `Sent` reports `Sent` with `marked_sent` false.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn settle(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> Result<CollectionSettlement> {
        let record = self.store.get(run_id, collection).await?;

        let settlement = if record.is_eligible_for_sent() {
            self.store.set_status_sent(run_id, collection).await?;
            CollectionSettlement {
                status: CollectionStatus::Sent,
                marked_sent: true,
            }
        } else if record.exported_nothing() {
            CollectionSettlement {
                status: CollectionStatus::NoFilesExported,
                marked_sent: false,
            }
        } else {
            tracing::info!(
                current_status = %record.status,
                files_exported = record.files_exported,
                files_sent = record.files_sent,
                "Collection not ready to be marked sent"
            );
            CollectionSettlement {
                status: record.status,
                marked_sent: false,
            }
        };

        log_collection_status!(run_id, collection, settlement.status);
        Ok(settlement)
    }
}

/// Result of settling one collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSettlement {
    /// Status after this call
    pub status: CollectionStatus,
    /// Whether this call moved the collection to `Sent`
    pub marked_sent: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::store::InMemoryStatusStore;
    use test_case::test_case;

    fn key() -> (RunId, CollectionName) {
        (
            RunId::new("123").unwrap(),
            CollectionName::new("db.core.toDo").unwrap(),
        )
    }

    fn seeded(status: &str, exported: u64, sent: u64) -> Arc<InMemoryStatusStore> {
        let (run_id, collection) = key();
        let store = Arc::new(InMemoryStatusStore::new());
        store.insert_raw(&run_id, &collection, Some(status), Some(exported), Some(sent));
        store
    }

    #[test_case("Exported", 10, 10, true ; "exported and all sent")]
    #[test_case("Exported", 11, 10, false ; "files still sending")]
    #[test_case("Exported", 0, 0, false ; "nothing exported")]
    #[test_case("Exporting", 10, 10, false ; "still exporting")]
    #[test_case("Sent", 10, 10, false ; "already sent")]
    #[test_case("", 0, 0, false ; "missing status")]
    #[tokio::test]
    async fn test_try_mark_sent(status: &str, exported: u64, sent: u64, expected: bool) {
        let (run_id, collection) = key();
        let store = seeded(status, exported, sent);
        let evaluator = CollectionCompletionEvaluator::new(store.clone());

        let marked = evaluator.try_mark_sent(&run_id, &collection).await.unwrap();

        assert_eq!(marked, expected);
        assert_eq!(store.writes(), usize::from(expected));
        if expected {
            let record = store.record(&run_id, &collection).unwrap();
            assert_eq!(record.status, CollectionStatus::Sent);
        }
    }

    #[tokio::test]
    async fn test_set_collection_status_sent() {
        let (run_id, collection) = key();
        let store = seeded("Exported", 3, 3);
        let evaluator = CollectionCompletionEvaluator::new(store.clone());

        let status = evaluator.set_collection_status(&run_id, &collection).await.unwrap();

        assert_eq!(status, CollectionStatus::Sent);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_set_collection_status_no_files() {
        let (run_id, collection) = key();
        let store = seeded("Exported", 0, 0);
        let evaluator = CollectionCompletionEvaluator::new(store.clone());

        let status = evaluator.set_collection_status(&run_id, &collection).await.unwrap();

        assert_eq!(status, CollectionStatus::NoFilesExported);
        assert_eq!(store.writes(), 0);
        assert_eq!(
            store.record(&run_id, &collection).unwrap().status,
            CollectionStatus::Exported
        );
    }

    #[tokio::test]
    async fn test_set_collection_status_in_flight() {
        let (run_id, collection) = key();
        let store = seeded("Exported", 5, 2);
        let evaluator = CollectionCompletionEvaluator::new(store.clone());

        let status = evaluator.set_collection_status(&run_id, &collection).await.unwrap();

        assert_eq!(status, CollectionStatus::Exported);
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_settle_reports_transition_once() {
        let (run_id, collection) = key();
        let store = seeded("Exported", 2, 2);
        let evaluator = CollectionCompletionEvaluator::new(store.clone());

        let first = evaluator.settle(&run_id, &collection).await.unwrap();
        let second = evaluator.settle(&run_id, &collection).await.unwrap();

        assert_eq!(first.status, CollectionStatus::Sent);
        assert!(first.marked_sent);
        assert_eq!(second.status, CollectionStatus::Sent);
        assert!(!second.marked_sent);
        assert_eq!(store.writes(), 1);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let (run_id, collection) = key();
        let store = seeded("Exported", 1, 1);
        store.fail_next(1);
        let evaluator = CollectionCompletionEvaluator::new(store.clone());

        assert!(evaluator.try_mark_sent(&run_id, &collection).await.is_err());
        assert_eq!(store.writes(), 0);
    }
}
