//! Metrics push gateway client

use super::traits::{Delivery, MetricsPusher, SinkResult};
use crate::config::MetricsConfig;
use crate::core::completion::RunContext;
use crate::core::metrics::CompletionMetrics;
use crate::domain::{Result, SinkError, TallyError};
use async_trait::async_trait;
use std::time::Duration;

/// Pushes counters to a Prometheus push gateway
///
/// Counters are grouped by job and correlation id, so each run replaces only
/// its own series.
pub struct PushGatewayClient {
    client: reqwest::Client,
    base_url: Option<String>,
    job_name: String,
}

impl PushGatewayClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &MetricsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                TallyError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: config
                .pushgateway_url
                .as_deref()
                .map(|url| url.trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty()),
            job_name: config.job_name.clone(),
        })
    }

    /// Grouping URL for `context`, `None` when no gateway is configured
    pub fn grouping_url(&self, context: &RunContext) -> Option<String> {
        self.base_url.as_ref().map(|base| {
            format!(
                "{}/metrics/job/{}/correlation_id/{}",
                base, self.job_name, context.run_id
            )
        })
    }
}

#[async_trait]
impl MetricsPusher for PushGatewayClient {
    async fn push(
        &self,
        context: &RunContext,
        metrics: &CompletionMetrics,
    ) -> SinkResult<Delivery> {
        let Some(url) = self.grouping_url(context) else {
            tracing::debug!("No push gateway configured, metrics not pushed");
            return Ok(Delivery::Skipped);
        };

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "text/plain; version=0.0.4")
            .body(metrics.render())
            .send()
            .await
            .map_err(|e| SinkError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                what: "metrics push".to_string(),
                status: status.as_u16(),
            });
        }

        tracing::info!(url = %url, "Pushed metrics");
        Ok(Delivery::Posted)
    }
}
