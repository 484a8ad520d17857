//! Bounded exponential-backoff retry
//!
//! Every store and sink call goes through [`RetryExecutor::run`]. The caller sees
//! one logical call: intermediate failures are logged and counted, and only the
//! last failure is returned once `max_attempts` calls have failed.

use crate::config::RetryConfig;
use crate::core::metrics::CompletionMetrics;
use crate::log_retry_attempt;
use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Retry schedule
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total calls, including the first
    pub max_attempts: usize,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Growth factor between consecutive delays
    pub multiplier: f64,
    /// Upper bound for a single delay
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Store calls: 5 attempts, 1s, doubling
    pub fn store_default() -> Self {
        Self::from(&RetryConfig::default())
    }

    /// Sink calls: 10 attempts, 1s, doubling
    pub fn sink_default() -> Self {
        Self {
            max_attempts: 10,
            ..Self::store_default()
        }
    }

    /// Single attempt, no waiting
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            multiplier: 1.0,
            max_delay: Duration::ZERO,
        }
    }

    /// Delay slept before retry `n` (1-based): `initial × multiplier^(n-1)`, capped
    pub fn delay_for_retry(&self, n: usize) -> Duration {
        let exponent = n.saturating_sub(1) as i32;
        let millis = self.initial_delay.as_millis() as f64 * self.multiplier.powi(exponent);
        let capped = millis.min(self.max_delay.as_millis() as f64);
        Duration::from_millis(capped as u64)
    }

    /// Sum of every delay slept when all attempts fail
    pub fn total_backoff(&self) -> Duration {
        (1..self.max_attempts).map(|n| self.delay_for_retry(n)).sum()
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            multiplier: config.backoff_multiplier,
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Runs fallible async operations under a [`RetryPolicy`]
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
    metrics: Option<Arc<CompletionMetrics>>,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self {
            policy,
            metrics: None,
        }
    }

    /// Count every retry in `metrics`
    pub fn with_metrics(mut self, metrics: Arc<CompletionMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Calls `op` until it succeeds or `max_attempts` calls have failed
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt. Any error from `op` is retried.
    pub async fn run<F, Fut, T, E>(&self, operation: &'static str, mut op: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match op().await {
                Ok(value) => {
                    if attempt > 1 {
                        tracing::debug!(operation, attempt, "Operation succeeded after retry");
                    }
                    return Ok(value);
                }
                Err(e) => {
                    if attempt >= max_attempts {
                        tracing::error!(
                            operation,
                            attempts = attempt,
                            error = %e,
                            "Operation failed, retries exhausted"
                        );
                        return Err(e);
                    }

                    let delay = self.policy.delay_for_retry(attempt);
                    log_retry_attempt!(operation, attempt, max_attempts, e);
                    tracing::debug!(
                        operation,
                        delay_ms = delay.as_millis() as u64,
                        "Backing off before retry"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.record_retry(operation);
                    }

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
