//! Per-invocation counters
//!
//! Collected in memory while the completion hook runs and flushed once at the
//! end, in Prometheus text exposition format.

use crate::adapters::notify::SignalKind;
use crate::domain::SendingCompletionStatus;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// Counters gathered during one invocation
#[derive(Debug, Default)]
pub struct CompletionMetrics {
    retries: Mutex<BTreeMap<&'static str, u64>>,
    collection_signals: AtomicU64,
    full_run_signals: AtomicU64,
    monitoring_success: AtomicU64,
    monitoring_failure: AtomicU64,
    collections_marked_sent: AtomicU64,
    files_sent_recorded: AtomicU64,
}

impl CompletionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_retry(&self, operation: &'static str) {
        let mut retries = self.retries.lock().unwrap_or_else(|e| e.into_inner());
        *retries.entry(operation).or_insert(0) += 1;
    }

    pub fn record_success_signal(&self, kind: SignalKind) {
        let counter = match kind {
            SignalKind::Collection => &self.collection_signals,
            SignalKind::FullRun => &self.full_run_signals,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_monitoring_message(&self, status: SendingCompletionStatus) {
        let counter = match status {
            SendingCompletionStatus::CompletedSuccessfully => &self.monitoring_success,
            SendingCompletionStatus::CompletedUnsuccessfully => &self.monitoring_failure,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_collection_marked_sent(&self) {
        self.collections_marked_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_file_sent(&self) {
        self.files_sent_recorded.fetch_add(1, Ordering::Relaxed);
    }

    /// Retries recorded for one operation
    pub fn retries_for(&self, operation: &str) -> u64 {
        let retries = self.retries.lock().unwrap_or_else(|e| e.into_inner());
        retries.get(operation).copied().unwrap_or(0)
    }

    /// Success signals posted of the given kind
    pub fn success_signals(&self, kind: SignalKind) -> u64 {
        match kind {
            SignalKind::Collection => self.collection_signals.load(Ordering::Relaxed),
            SignalKind::FullRun => self.full_run_signals.load(Ordering::Relaxed),
        }
    }

    /// Monitoring messages published with the given status
    pub fn monitoring_messages(&self, status: SendingCompletionStatus) -> u64 {
        match status {
            SendingCompletionStatus::CompletedSuccessfully => {
                self.monitoring_success.load(Ordering::Relaxed)
            }
            SendingCompletionStatus::CompletedUnsuccessfully => {
                self.monitoring_failure.load(Ordering::Relaxed)
            }
        }
    }

    pub fn collections_marked_sent(&self) -> u64 {
        self.collections_marked_sent.load(Ordering::Relaxed)
    }

    pub fn files_sent_recorded(&self) -> u64 {
        self.files_sent_recorded.load(Ordering::Relaxed)
    }

    /// Renders every counter in Prometheus text exposition format
    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push_str("# HELP tallyman_retries_total Retried remote calls by operation\n");
        out.push_str("# TYPE tallyman_retries_total counter\n");
        {
            let retries = self.retries.lock().unwrap_or_else(|e| e.into_inner());
            for (operation, count) in retries.iter() {
                let _ = writeln!(out, "tallyman_retries_total{{operation=\"{operation}\"}} {count}");
            }
        }

        out.push_str("# HELP tallyman_success_signals_total Success sentinels posted\n");
        out.push_str("# TYPE tallyman_success_signals_total counter\n");
        for kind in [SignalKind::Collection, SignalKind::FullRun] {
            let _ = writeln!(
                out,
                "tallyman_success_signals_total{{kind=\"{}\"}} {}",
                kind.label(),
                self.success_signals(kind)
            );
        }

        out.push_str("# HELP tallyman_monitoring_messages_total Monitoring messages published\n");
        out.push_str("# TYPE tallyman_monitoring_messages_total counter\n");
        for status in [
            SendingCompletionStatus::CompletedSuccessfully,
            SendingCompletionStatus::CompletedUnsuccessfully,
        ] {
            let _ = writeln!(
                out,
                "tallyman_monitoring_messages_total{{status=\"{}\"}} {}",
                status.label(),
                self.monitoring_messages(status)
            );
        }

        out.push_str("# HELP tallyman_collections_marked_sent_total Collections moved to Sent\n");
        out.push_str("# TYPE tallyman_collections_marked_sent_total counter\n");
        let _ = writeln!(
            out,
            "tallyman_collections_marked_sent_total {}",
            self.collections_marked_sent()
        );

        out.push_str("# HELP tallyman_files_sent_total Delivered files recorded\n");
        out.push_str("# TYPE tallyman_files_sent_total counter\n");
        let _ = writeln!(out, "tallyman_files_sent_total {}", self.files_sent_recorded());

        out
    }
}
