//! Job-lifecycle hook
//!
//! Runs once after the batch job's last work unit. On success it settles the
//! collection, evaluates the run and routes the outcome to the sinks. The
//! metrics flush runs on every path and never replaces the outcome.

use super::{CollectionCompletionEvaluator, JobExitStatus, RunCompletionEvaluator, RunContext};
use crate::adapters::notify::{Delivery, SignalKind, Sinks};
use crate::adapters::store::StatusStore;
use crate::core::metrics::CompletionMetrics;
use crate::domain::{CollectionStatus, Result, SendingCompletionStatus};
use crate::log_error_with_context;
use std::sync::Arc;

/// What one invocation observed and emitted
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionOutcome {
    /// Status settled for this collection, `None` if not evaluated
    pub collection_status: Option<CollectionStatus>,
    /// Run-level status sent to monitoring, `None` if not evaluated
    pub sending_status: Option<SendingCompletionStatus>,
    /// Success signals actually posted, in order
    pub signals: Vec<SignalKind>,
}

/// Routes completion decisions to the outbound sinks
pub struct CompletionOrchestrator {
    store: Arc<dyn StatusStore + Send + Sync>,
    collections: CollectionCompletionEvaluator,
    run: RunCompletionEvaluator,
    sinks: Sinks,
    metrics: Arc<CompletionMetrics>,
    legacy_success_indicator: bool,
}

impl CompletionOrchestrator {
    pub fn new(
        store: Arc<dyn StatusStore + Send + Sync>,
        sinks: Sinks,
        metrics: Arc<CompletionMetrics>,
    ) -> Self {
        Self {
            collections: CollectionCompletionEvaluator::new(store.clone()),
            run: RunCompletionEvaluator::new(store.clone()),
            store,
            sinks,
            metrics,
            legacy_success_indicator: false,
        }
    }

    /// Post the full-run signal on job success without consulting the store
    pub fn with_legacy_success_indicator(mut self, enabled: bool) -> Self {
        self.legacy_success_indicator = enabled;
        self
    }

    /// Handle the end of the batch job
    ///
    /// # Errors
    ///
    /// Store and sink failures propagate after being logged and after the
    /// metrics flush.
    pub async fn on_job_finished(
        &self,
        job_status: JobExitStatus,
        context: &RunContext,
    ) -> Result<CompletionOutcome> {
        let mut outcome = CompletionOutcome::default();
        let result = self.handle(job_status, context, &mut outcome).await;

        if let Err(e) = &result {
            tracing::error!(
                run_id = %context.run_id,
                collection = %context.collection,
                collection_status = ?outcome.collection_status,
                signals_posted = outcome.signals.len(),
                "Completion handling failed"
            );
            log_error_with_context!(e, "on_job_finished");
        }

        self.flush_metrics(context).await;
        result.map(|()| outcome)
    }

    /// Record one delivered file for this collection
    ///
    /// Returns the new `FilesSent` value.
    ///
    /// # Errors
    ///
    /// Propagates store failures after the metrics flush.
    pub async fn record_file_sent(&self, context: &RunContext, file_name: &str) -> Result<u64> {
        let result = self
            .store
            .increment_files_sent(&context.run_id, &context.collection)
            .await;

        let result = match result {
            Ok(files_sent) => {
                self.metrics.record_file_sent();
                tracing::info!(
                    file_sent = %file_name,
                    files_sent,
                    collection = %context.collection,
                    "Incremented files sent"
                );
                Ok(files_sent)
            }
            Err(e) => {
                log_error_with_context!(&e, "increment_files_sent");
                Err(e.into())
            }
        };

        self.flush_metrics(context).await;
        result
    }

    async fn handle(
        &self,
        job_status: JobExitStatus,
        context: &RunContext,
        outcome: &mut CompletionOutcome,
    ) -> Result<()> {
        if job_status == JobExitStatus::Failed {
            tracing::error!(
                job_exit_status = ?job_status,
                run_id = %context.run_id,
                collection = %context.collection,
                "Not setting status or sending success indicator"
            );
            return Ok(());
        }

        if self.legacy_success_indicator {
            tracing::info!("Legacy success indicator enabled, posting full run success signal");
            return self.post(SignalKind::FullRun, context, outcome).await;
        }

        let settlement = self
            .collections
            .settle(&context.run_id, &context.collection)
            .await?;
        outcome.collection_status = Some(settlement.status.clone());

        // Only the invocation that wrote Sent announces the collection
        if settlement.marked_sent {
            self.metrics.record_collection_marked_sent();
            self.post(SignalKind::Collection, context, outcome).await?;
        }

        let complete = self.run.run_is_complete(&context.run_id).await?;
        if complete {
            if settlement.status == CollectionStatus::NoFilesExported {
                tracing::info!(
                    collection = %context.collection,
                    "Collection exported no files and run is complete"
                );
            }
            self.post(SignalKind::FullRun, context, outcome).await?;
        }

        let sending_status = SendingCompletionStatus::from_run_complete(complete);
        outcome.sending_status = Some(sending_status);

        let delivery = self
            .sinks
            .monitoring
            .publish_monitoring_message(sending_status, context)
            .await?;
        if delivery == Delivery::Posted {
            self.metrics.record_monitoring_message(sending_status);
        }

        Ok(())
    }

    async fn post(
        &self,
        kind: SignalKind,
        context: &RunContext,
        outcome: &mut CompletionOutcome,
    ) -> Result<()> {
        let delivery = self.sinks.success.post_success_signal(kind, context).await?;
        if delivery == Delivery::Posted {
            self.metrics.record_success_signal(kind);
            outcome.signals.push(kind);
        }
        Ok(())
    }

    async fn flush_metrics(&self, context: &RunContext) {
        if let Err(e) = self.sinks.metrics.push(context, &self.metrics).await {
            tracing::warn!(error = %e, run_id = %context.run_id, "Failed to push final metrics");
        }
    }
}
