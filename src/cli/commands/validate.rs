//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Tallyman configuration file without touching the store or the sinks.

use crate::cli::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, RetryConfig};
use crate::core::completion::RunContext;
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

fn describe_retry(retry: &RetryConfig) -> String {
    format!(
        "{} attempts, {}ms initial, x{}, {}ms cap",
        retry.max_attempts, retry.initial_delay_ms, retry.backoff_multiplier, retry.max_delay_ms
    )
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        let context = match RunContext::from_config(&config) {
            Ok(ctx) => ctx,
            Err(e) => {
                println!("❌ Run identity is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Environment: {}", config.application.environment);
        println!("  Log Level: {}", config.application.log_level);
        println!("  Run: {}", context.run_id);
        println!("  Collection: {}", context.collection);
        println!("  Export Date: {}", context.export_date);
        println!("  Snapshot Type: {}", context.snapshot_label());
        println!(
            "  Legacy Success Indicator: {}",
            config.run.send_success_indicator
        );
        println!(
            "  Status Store: {} ({})",
            config.store.postgresql.connection_string.expose_secret().redacted(),
            config.store.table_name
        );
        println!("  Store Retry: {}", describe_retry(&config.store.retry));
        println!("  Success Sink: {}", config.success.url);
        println!("  Success Retry: {}", describe_retry(&config.success.retry));
        match config.monitoring.endpoint() {
            Some(endpoint) => println!(
                "  Monitoring: {} (azure auth: {})",
                endpoint,
                config.monitoring.azure_auth_enabled()
            ),
            None => println!("  Monitoring: disabled"),
        }
        match &config.metrics.pushgateway_url {
            Some(url) => println!("  Pushgateway: {} (job {})", url, config.metrics.job_name),
            None => println!("  Pushgateway: disabled"),
        }
        println!();
        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[tokio::test]
    async fn test_validate_missing_file() {
        let code = ValidateArgs {}.execute("nonexistent.toml").await.unwrap();
        assert_eq!(code, EXIT_CONFIG);
    }

    #[tokio::test]
    async fn test_validate_generated_template() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(super::super::init::InitArgs::generate_minimal_config().as_bytes())
            .unwrap();
        file.flush().unwrap();

        let code = ValidateArgs {}
            .execute(file.path().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, EXIT_OK);
    }

    #[test]
    fn test_describe_retry() {
        let retry = RetryConfig::default();
        assert_eq!(
            describe_retry(&retry),
            "5 attempts, 1000ms initial, x2, 300000ms cap"
        );
    }
}
