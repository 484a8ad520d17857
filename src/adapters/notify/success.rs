//! HTTP success sink
//!
//! Posts a zero-length gzip file whose headers tell the receiver which
//! collection, or which whole run, finished delivering.

use super::traits::{Delivery, SignalKind, SinkResult, SuccessSink};
use crate::config::SuccessConfig;
use crate::core::completion::RunContext;
use crate::core::retry::{RetryExecutor, RetryPolicy};
use crate::domain::{Result, SinkError, TallyError};
use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::time::Duration;

/// Header value used by the full-run sentinel for per-collection fields
pub const NOT_APPLICABLE: &str = "NOT_APPLICABLE";

/// Headers describing one sentinel file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentinel {
    pub filename: String,
    pub database: String,
    pub collection: String,
    pub topic: String,
}

impl Sentinel {
    /// Sentinel for `kind`, or `None` when the topic can't be split
    pub fn for_signal(kind: SignalKind, context: &RunContext) -> Option<Self> {
        match kind {
            SignalKind::Collection => {
                let parts = context.collection.topic_parts()?;
                Some(Self {
                    filename: format!("_{}_{}_successful.gz", parts.database, parts.collection),
                    database: parts.database,
                    collection: parts.collection,
                    topic: context.collection.to_string(),
                })
            }
            SignalKind::FullRun => Some(Self {
                filename: format!("_{}_successful.gz", context.run_id),
                database: NOT_APPLICABLE.to_string(),
                collection: NOT_APPLICABLE.to_string(),
                topic: NOT_APPLICABLE.to_string(),
            }),
        }
    }
}

/// Gzip stream wrapping no bytes at all
pub fn empty_gzip() -> std::io::Result<Vec<u8>> {
    GzEncoder::new(Vec::new(), Compression::default()).finish()
}

/// Success sink posting sentinels over HTTP
pub struct HttpSuccessSink {
    client: reqwest::Client,
    url: String,
    executor: RetryExecutor,
}

impl HttpSuccessSink {
    /// Create a sink for `config.url`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &SuccessConfig, executor: RetryExecutor) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                TallyError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            url: config.url.clone(),
            executor,
        })
    }

    /// Sink without retries, for tests against a mock server
    pub fn with_policy(config: &SuccessConfig, policy: RetryPolicy) -> Result<Self> {
        Self::new(config, RetryExecutor::new(policy))
    }

    async fn post_once(
        &self,
        sentinel: &Sentinel,
        context: &RunContext,
        body: Vec<u8>,
    ) -> SinkResult<()> {
        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .header("filename", &sentinel.filename)
            .header("environment", &context.environment)
            .header("export_date", &context.export_date)
            .header("database", &sentinel.database)
            .header("collection", &sentinel.collection)
            .header("topic", &sentinel.topic)
            .body(body)
            .send()
            .await
            .map_err(|e| SinkError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                file_name = %sentinel.filename,
                status = status.as_u16(),
                url = %self.url,
                "Success sink rejected sentinel"
            );
            return Err(SinkError::Rejected {
                what: sentinel.filename.clone(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl SuccessSink for HttpSuccessSink {
    async fn post_success_signal(
        &self,
        kind: SignalKind,
        context: &RunContext,
    ) -> SinkResult<Delivery> {
        let Some(sentinel) = Sentinel::for_signal(kind, context) else {
            tracing::warn!(
                topic = %context.collection,
                "Topic name has no database and collection segments, skipping collection success signal"
            );
            return Ok(Delivery::Skipped);
        };

        let body = empty_gzip().map_err(|e| SinkError::InvalidPayload(e.to_string()))?;
        let operation = match kind {
            SignalKind::Collection => "post_collection_success",
            SignalKind::FullRun => "post_full_run_success",
        };

        tracing::info!(file_name = %sentinel.filename, kind = kind.label(), "Posting success sentinel");

        self.executor
            .run(operation, || self.post_once(&sentinel, context, body.clone()))
            .await
            .map_err(|e| SinkError::Unavailable {
                operation,
                attempts: self.executor.policy().max_attempts,
                last_error: e.to_string(),
            })?;

        tracing::info!(file_name = %sentinel.filename, url = %self.url, "Posted success sentinel");
        Ok(Delivery::Posted)
    }
}
