//! Monitoring topic publisher
//!
//! Publishes one JSON alert per invocation describing whether every file of
//! the run has been sent. Publishing is a no-op when no topic is configured.

use super::traits::{Delivery, MonitoringPublisher, SinkResult};
use crate::config::MonitoringConfig;
use crate::core::completion::RunContext;
use crate::core::retry::RetryExecutor;
use crate::domain::{Result, SendingCompletionStatus, SinkError, TallyError};
use async_trait::async_trait;
use azure_core::credentials::TokenCredential;
use azure_identity::ClientSecretCredential;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// One key/value line of the alert body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomElement {
    pub key: String,
    pub value: String,
}

/// Alert payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringMessage {
    pub severity: String,
    pub notification_type: String,
    pub slack_username: String,
    pub title_text: String,
    pub custom_elements: Vec<CustomElement>,
}

impl MonitoringMessage {
    pub fn new(
        status: SendingCompletionStatus,
        context: &RunContext,
        slack_username: &str,
    ) -> Self {
        let (severity, notification_type, outcome) = match status {
            SendingCompletionStatus::CompletedSuccessfully => ("Critical", "Information", "success"),
            SendingCompletionStatus::CompletedUnsuccessfully => ("High", "Error", "failed"),
        };

        Self {
            severity: severity.to_string(),
            notification_type: notification_type.to_string(),
            slack_username: slack_username.to_string(),
            title_text: format!("{} - All files sent - {}", context.snapshot_label(), outcome),
            custom_elements: vec![
                CustomElement {
                    key: "Export date".to_string(),
                    value: context.export_date.clone(),
                },
                CustomElement {
                    key: "Correlation Id".to_string(),
                    value: context.run_id.to_string(),
                },
            ],
        }
    }
}

/// Publisher posting alerts to an HTTP topic endpoint
pub struct HttpMonitoringPublisher {
    client: reqwest::Client,
    endpoint: Option<String>,
    slack_username: String,
    credential: Option<Arc<ClientSecretCredential>>,
    scope: String,
    executor: RetryExecutor,
}

impl HttpMonitoringPublisher {
    /// Create a publisher from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or the Azure AD credential cannot
    /// be created.
    pub fn new(config: &MonitoringConfig, executor: RetryExecutor) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                TallyError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        let credential = match (
            &config.azure_tenant_id,
            &config.azure_client_id,
            &config.azure_client_secret,
        ) {
            (Some(tenant_id), Some(client_id), Some(client_secret)) => {
                let secret =
                    azure_core::credentials::Secret::new(client_secret.expose_secret().as_ref().to_owned());
                let credential = ClientSecretCredential::new(tenant_id, client_id.clone(), secret, None)
                    .map_err(|e| {
                        TallyError::Configuration(format!(
                            "Failed to create Azure AD credential: {}",
                            e
                        ))
                    })?;
                Some(credential)
            }
            _ => None,
        };

        let endpoint = config.endpoint().map(str::to_string);
        if endpoint.is_none() {
            tracing::info!("No monitoring topic configured, monitoring messages will be skipped");
        }

        Ok(Self {
            client,
            endpoint,
            slack_username: config.slack_username.clone(),
            credential,
            scope: config.azure_scope.clone(),
            executor,
        })
    }

    async fn access_token(&self) -> SinkResult<Option<String>> {
        let Some(credential) = &self.credential else {
            return Ok(None);
        };

        let token = TokenCredential::get_token(&**credential, &[self.scope.as_str()], None)
            .await
            .map_err(|e| {
                SinkError::AuthenticationFailed(format!("Failed to acquire Azure AD token: {}", e))
            })?;

        Ok(Some(token.token.secret().to_string()))
    }

    async fn publish_once(&self, endpoint: &str, message: &MonitoringMessage) -> SinkResult<()> {
        let mut request = self.client.post(endpoint).json(message);
        if let Some(token) = self.access_token().await? {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SinkError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                what: "monitoring message".to_string(),
                status: status.as_u16(),
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MonitoringPublisher for HttpMonitoringPublisher {
    async fn publish_monitoring_message(
        &self,
        status: SendingCompletionStatus,
        context: &RunContext,
    ) -> SinkResult<Delivery> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            tracing::debug!(status = status.label(), "Monitoring topic not set, not publishing");
            return Ok(Delivery::Skipped);
        };

        let message = MonitoringMessage::new(status, context, &self.slack_username);
        tracing::info!(
            title = %message.title_text,
            severity = %message.severity,
            run_id = %context.run_id,
            "Publishing monitoring message"
        );

        self.executor
            .run("publish_monitoring_message", || self.publish_once(endpoint, &message))
            .await
            .map_err(|e| SinkError::Unavailable {
                operation: "publish_monitoring_message",
                attempts: self.executor.policy().max_attempts,
                last_error: e.to_string(),
            })?;

        Ok(Delivery::Posted)
    }
}
