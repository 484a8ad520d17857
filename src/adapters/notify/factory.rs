//! Sink factories

use super::monitoring::HttpMonitoringPublisher;
use super::pushgateway::PushGatewayClient;
use super::success::HttpSuccessSink;
use super::traits::{MetricsPusher, MonitoringPublisher, SuccessSink};
use crate::config::TallymanConfig;
use crate::core::metrics::CompletionMetrics;
use crate::core::retry::{RetryExecutor, RetryPolicy};
use crate::domain::Result;
use std::sync::Arc;

/// The three outbound sinks of an invocation
#[derive(Clone)]
pub struct Sinks {
    pub success: Arc<dyn SuccessSink + Send + Sync>,
    pub monitoring: Arc<dyn MonitoringPublisher + Send + Sync>,
    pub metrics: Arc<dyn MetricsPusher + Send + Sync>,
}

/// Build every sink from configuration
///
/// Success and monitoring retries are counted in `metrics`.
///
/// # Errors
///
/// Returns an error if an HTTP client or credential cannot be created.
pub fn create_sinks(config: &TallymanConfig, metrics: Arc<CompletionMetrics>) -> Result<Sinks> {
    let success_executor =
        RetryExecutor::new(RetryPolicy::from(&config.success.retry)).with_metrics(metrics.clone());
    let monitoring_executor =
        RetryExecutor::new(RetryPolicy::from(&config.monitoring.retry)).with_metrics(metrics);

    Ok(Sinks {
        success: Arc::new(HttpSuccessSink::new(&config.success, success_executor)?),
        monitoring: Arc::new(HttpMonitoringPublisher::new(
            &config.monitoring,
            monitoring_executor,
        )?),
        metrics: Arc::new(PushGatewayClient::new(&config.metrics)?),
    })
}
