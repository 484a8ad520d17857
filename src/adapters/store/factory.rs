//! Status store factory
//!
//! Builds the configured backend and wraps it in the retry decorator.

use super::retrying::RetryingStatusStore;
use super::traits::StatusStore;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::config::StoreConfig;
use crate::core::metrics::CompletionMetrics;
use crate::core::retry::{RetryExecutor, RetryPolicy};
use crate::domain::Result;
use std::sync::Arc;

/// Create the status store described by `config`
///
/// Every operation of the returned store is retried under `config.retry`, and
/// each retry is counted in `metrics`.
///
/// # Errors
///
/// Returns an error if the PostgreSQL client cannot be created.
pub fn create_status_store(
    config: &StoreConfig,
    metrics: Arc<CompletionMetrics>,
) -> Result<Arc<dyn StatusStore + Send + Sync>> {
    tracing::info!(table = %config.table_name, "Creating PostgreSQL status store");
    let client = PostgreSQLClient::new(config.postgresql.clone(), config.table_name.clone())?;
    let adapter = PostgreSQLAdapter::new(client);

    Ok(wrap_with_retry(adapter, RetryPolicy::from(&config.retry), metrics))
}

/// Wrap any store in the retry decorator
pub fn wrap_with_retry<S>(
    store: S,
    policy: RetryPolicy,
    metrics: Arc<CompletionMetrics>,
) -> Arc<dyn StatusStore + Send + Sync>
where
    S: StatusStore + 'static,
{
    let executor = RetryExecutor::new(policy).with_metrics(metrics);
    Arc::new(RetryingStatusStore::new(store, executor))
}
