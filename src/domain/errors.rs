//! Domain error types
//!
//! This module defines the error hierarchy for Tallyman. Errors are domain-specific
//! and don't expose third-party types (database driver, HTTP client).

use thiserror::Error;

/// Main Tallyman error type
///
/// This is the primary error type used throughout the application.
/// It wraps the store and sink error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum TallyError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Status store errors
    #[error("Status store error: {0}")]
    Store(#[from] StoreError),

    /// Success sink and monitoring sink errors
    #[error("Sink error: {0}")]
    Sink(#[from] SinkError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Metrics push errors
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Status store errors
///
/// Errors that occur when reading or updating collection status records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to connect to the store
    #[error("Failed to connect to status store: {0}")]
    ConnectionFailed(String),

    /// Point read or count query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Increment or assignment failed
    #[error("Update failed: {0}")]
    UpdateFailed(String),

    /// The record to update does not exist
    #[error("Status record not found: {run_id}/{collection}")]
    RecordNotFound { run_id: String, collection: String },

    /// Schema bootstrap failed
    #[error("Schema initialization failed: {0}")]
    SchemaFailed(String),

    /// Retry budget exhausted
    #[error("Status store unavailable after {attempts} attempts ({operation}): {last_error}")]
    Unavailable {
        operation: &'static str,
        attempts: usize,
        last_error: String,
    },
}

/// Sink errors
///
/// Errors that occur when posting success signals or publishing monitoring messages.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Failed to reach the sink
    #[error("Failed to connect to sink: {0}")]
    ConnectionFailed(String),

    /// Sink answered with a non-success status
    #[error("Sink rejected {what}: HTTP {status}")]
    Rejected { what: String, status: u16 },

    /// Authentication against the sink failed
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Payload could not be built
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Retry budget exhausted
    #[error("Sink unavailable after {attempts} attempts ({operation}): {last_error}")]
    Unavailable {
        operation: &'static str,
        attempts: usize,
        last_error: String,
    },
}

impl StoreError {
    /// Whether this error came from an exhausted retry budget
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable { .. })
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for TallyError {
    fn from(err: std::io::Error) -> Self {
        TallyError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for TallyError {
    fn from(err: serde_json::Error) -> Self {
        TallyError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for TallyError {
    fn from(err: toml::de::Error) -> Self {
        TallyError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tally_error_display() {
        let err = TallyError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_store_error_conversion() {
        let store_err = StoreError::QueryFailed("timeout".to_string());
        let err: TallyError = store_err.into();
        assert!(matches!(err, TallyError::Store(_)));
    }

    #[test]
    fn test_sink_error_conversion() {
        let sink_err = SinkError::Rejected {
            what: "_db_col_successful.gz".to_string(),
            status: 503,
        };
        let err: TallyError = sink_err.into();
        assert!(matches!(err, TallyError::Sink(_)));
        assert!(err.to_string().contains("HTTP 503"));
    }

    #[test]
    fn test_unavailable_display() {
        let err = StoreError::Unavailable {
            operation: "count_exporting",
            attempts: 5,
            last_error: "connection reset".to_string(),
        };
        assert!(err.is_unavailable());
        assert_eq!(
            err.to_string(),
            "Status store unavailable after 5 attempts (count_exporting): connection reset"
        );
    }

    #[test]
    fn test_record_not_found_display() {
        let err = StoreError::RecordNotFound {
            run_id: "123".to_string(),
            collection: "db.core.toDo".to_string(),
        };
        assert!(!err.is_unavailable());
        assert_eq!(err.to_string(), "Status record not found: 123/db.core.toDo");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: TallyError = io_err.into();
        assert!(matches!(err, TallyError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: TallyError = json_err.into();
        assert!(matches!(err, TallyError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: TallyError = toml_err.into();
        assert!(matches!(err, TallyError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &TallyError::Validation("x".to_string());
        let _: &dyn std::error::Error = &StoreError::QueryFailed("x".to_string());
        let _: &dyn std::error::Error = &SinkError::ConnectionFailed("x".to_string());
    }
}
