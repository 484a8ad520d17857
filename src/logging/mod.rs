//! Logging and observability
//!
//! Structured logging on `tracing`, plus a few macros that keep field names
//! consistent across the store, the sinks and the orchestrator.
//!
//! # Example
//!
//! ```no_run
//! use tallyman::logging::init_logging;
//! use tallyman::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(run_id = "123", "Completion started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a retry attempt
///
/// # Example
///
/// ```no_run
/// use tallyman::log_retry_attempt;
///
/// log_retry_attempt!("increment_files_sent", 2, 5, "Connection timeout");
/// ```
#[macro_export]
macro_rules! log_retry_attempt {
    ($operation:expr, $attempt:expr, $max_attempts:expr, $reason:expr) => {
        tracing::warn!(
            operation = $operation,
            attempt = $attempt,
            max_attempts = $max_attempts,
            reason = %$reason,
            "Retrying operation"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use tallyman::log_error_with_context;
/// use tallyman::domain::TallyError;
///
/// let error = TallyError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log a collection status decision
///
/// # Example
///
/// ```no_run
/// use tallyman::log_collection_status;
/// use tallyman::domain::{CollectionName, CollectionStatus, RunId};
///
/// let run_id = RunId::new("123").unwrap();
/// let collection = CollectionName::new("db.core.toDo").unwrap();
/// log_collection_status!(&run_id, &collection, CollectionStatus::Sent);
/// ```
#[macro_export]
macro_rules! log_collection_status {
    ($run_id:expr, $collection:expr, $status:expr) => {
        tracing::info!(
            run_id = %$run_id,
            collection = %$collection,
            status = %$status,
            "Collection status evaluated"
        );
    };
}
