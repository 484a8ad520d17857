//! Run-wide completion
//!
//! Two count queries answer whether any collection of the run is still in
//! flight. The exporting check runs first; the pending-send check only runs
//! once no collection is exporting. An unknown count never reads as zero.

use crate::adapters::store::StatusStore;
use crate::domain::{Result, RunId, SendingCompletionStatus};
use std::sync::Arc;

/// Decides whether every collection of a run has exported and sent
pub struct RunCompletionEvaluator {
    store: Arc<dyn StatusStore + Send + Sync>,
}

impl RunCompletionEvaluator {
    pub fn new(store: Arc<dyn StatusStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Whether no collection in the run is exporting or has files left to send
    ///
    /// # Errors
    ///
    /// Propagates store failures. An unknown count is not an error: it makes
    /// the run incomplete.
    pub async fn run_is_complete(&self, run_id: &RunId) -> Result<bool> {
        match self.store.count_exporting(run_id).await? {
            None => {
                tracing::warn!(
                    run_id = %run_id,
                    "Could not check current exporting collections count"
                );
                return Ok(false);
            }
            Some(exporting) if exporting > 0 => {
                tracing::info!(
                    run_id = %run_id,
                    exporting_count = exporting,
                    "Collections still exporting so full run has not finished"
                );
                return Ok(false);
            }
            Some(_) => {
                tracing::info!(run_id = %run_id, "No collections currently still exporting");
            }
        }

        match self.store.count_pending_send(run_id).await? {
            None => {
                tracing::warn!(
                    run_id = %run_id,
                    "Could not check count of exported collections with files to send"
                );
                Ok(false)
            }
            Some(pending) if pending > 0 => {
                tracing::info!(
                    run_id = %run_id,
                    exported_count = pending,
                    "Collections with exported files are still sending so full run has not finished"
                );
                Ok(false)
            }
            Some(_) => {
                tracing::info!(run_id = %run_id, "No collections with exported files still sending");
                Ok(true)
            }
        }
    }

    /// Run completeness as a monitoring status
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn sending_completion_status(
        &self,
        run_id: &RunId,
    ) -> Result<SendingCompletionStatus> {
        let complete = self.run_is_complete(run_id).await?;
        Ok(SendingCompletionStatus::from_run_complete(complete))
    }
}
