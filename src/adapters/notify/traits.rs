//! Outbound signal traits
//!
//! The orchestrator talks to three sinks: the success sink receiving sentinel
//! files, the monitoring topic and the metrics gateway.

use crate::core::completion::RunContext;
use crate::core::metrics::CompletionMetrics;
use crate::domain::{SendingCompletionStatus, SinkError};
use async_trait::async_trait;

/// Result type for sink operations
pub type SinkResult<T> = std::result::Result<T, SinkError>;

/// Which success sentinel to post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    /// This collection's files are all delivered
    Collection,
    /// Every collection in the run is delivered
    FullRun,
}

impl SignalKind {
    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            SignalKind::Collection => "collection",
            SignalKind::FullRun => "full_run",
        }
    }
}

/// Whether a sink call reached its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Posted,
    /// Nothing configured or nothing to send
    Skipped,
}

/// Receives success sentinel files
#[async_trait]
pub trait SuccessSink: Send + Sync {
    /// Post the sentinel for `kind`
    ///
    /// A collection signal is skipped when the topic name carries no database
    /// and collection segments.
    ///
    /// # Errors
    ///
    /// Returns an error once the retry budget is spent.
    async fn post_success_signal(&self, kind: SignalKind, context: &RunContext)
        -> SinkResult<Delivery>;
}

/// Publishes the run-level alert
#[async_trait]
pub trait MonitoringPublisher: Send + Sync {
    /// Publish the monitoring message for `status`
    ///
    /// # Errors
    ///
    /// Returns an error once the retry budget is spent.
    async fn publish_monitoring_message(
        &self,
        status: SendingCompletionStatus,
        context: &RunContext,
    ) -> SinkResult<Delivery>;
}

/// Flushes the invocation's counters
#[async_trait]
pub trait MetricsPusher: Send + Sync {
    /// Push every counter in `metrics`, grouped under the run
    ///
    /// # Errors
    ///
    /// Returns an error if the gateway rejects the push.
    async fn push(&self, context: &RunContext, metrics: &CompletionMetrics)
        -> SinkResult<Delivery>;
}
