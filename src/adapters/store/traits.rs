//! Status store abstraction
//!
//! This module defines the trait that status store backends implement. The
//! store is keyed by `(run_id, collection_name)` and exposes a point read, two
//! run-wide counts, an atomic counter and a status assignment.

use crate::domain::{CollectionName, CollectionStatusRecord, RunId, StoreError};
use async_trait::async_trait;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Status store trait
///
/// Implementations must make [`StatusStore::increment_files_sent`] a single
/// server-side atomic add, and [`StatusStore::get`] a strongly consistent read.
#[async_trait]
pub trait StatusStore: Send + Sync {
    /// Read the record for one collection
    ///
    /// A missing row, or missing attributes, read as an empty status and zero
    /// counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn get(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<CollectionStatusRecord>;

    /// Number of collections in the run still `Exporting`
    ///
    /// `None` means the count could not be determined.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn count_exporting(&self, run_id: &RunId) -> StoreResult<Option<u64>>;

    /// Number of collections in the run `Exported` with at least one file
    ///
    /// `None` means the count could not be determined.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be queried.
    async fn count_pending_send(&self, run_id: &RunId) -> StoreResult<Option<u64>>;

    /// Atomically add one to `FilesSent` and return the new value
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] if the record does not exist.
    async fn increment_files_sent(
        &self,
        run_id: &RunId,
        collection: &CollectionName,
    ) -> StoreResult<u64>;

    /// Assign `Status = Sent`; repeating the call is harmless
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RecordNotFound`] if the record does not exist.
    async fn set_status_sent(&self, run_id: &RunId, collection: &CollectionName)
        -> StoreResult<()>;

    /// Check the store is reachable
    async fn test_connection(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Create the status table and index if they don't exist
    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }
}
