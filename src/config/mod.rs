//! Configuration management for Tallyman.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `TALLYMAN_*` environment
//! overrides and per-section validation.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use tallyman::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tallyman.toml")?;
//!
//! println!("Run: {}", config.run.correlation_id);
//! println!("Collection: {}", config.run.topic_name);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and deployment environment
//! - [`RunConfig`] - Run identifiers, export date, legacy mode flag
//! - [`StoreConfig`] - Status table, PostgreSQL connection, store retry policy
//! - [`SuccessConfig`] - Success sink endpoint and retry policy
//! - [`MonitoringConfig`] - Monitoring topic endpoint and credentials
//! - [`MetricsConfig`] - Metrics push gateway
//! - [`LoggingConfig`] - Local file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! environment = "production"
//!
//! [run]
//! correlation_id = "${TALLYMAN_RUN_CORRELATION_ID}"
//! topic_name = "db.core.toDo"
//! export_date = "2024-06-01"
//! snapshot_type = "full"
//!
//! [store.postgresql]
//! connection_string = "${TALLYMAN_STORE_DSN}"
//!
//! [success]
//! url = "https://ingest.example.com/upload"
//!
//! [monitoring]
//! topic_endpoint = "https://alerts.example.com/api/events"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, parse_config};
pub use schema::{
    ApplicationConfig, LoggingConfig, MetricsConfig, MonitoringConfig, PostgreSQLConfig,
    RetryConfig, RunConfig, StoreConfig, SuccessConfig, TallymanConfig,
};
pub use secret::{
    redact_connection_string, secret_string, secret_string_opt, SecretString, SecretValue,
};
