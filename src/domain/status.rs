//! Collection status model
//!
//! This module defines the status record tracked per {run_id, collection_name}
//! and the run-level sending outcome reported to monitoring.

use crate::domain::ids::{CollectionName, RunId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of one collection within a run
///
/// Producers create records as `Exporting` and move them to `Exported`; this
/// crate only ever moves `Exported` to `Sent`. Values that are not recognised
/// (including a missing attribute, read as the empty string) are kept verbatim
/// in `Unknown` so they are never mistaken for a real state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionStatus {
    /// Producer is still writing files
    Exporting,
    /// All files written, delivery in progress
    Exported,
    /// All exported files delivered
    Sent,
    /// Export finished without producing any file
    NoFilesExported,
    /// Unrecognised or missing stored value
    Unknown(String),
}

impl CollectionStatus {
    /// Stored representation
    pub fn as_str(&self) -> &str {
        match self {
            CollectionStatus::Exporting => "Exporting",
            CollectionStatus::Exported => "Exported",
            CollectionStatus::Sent => "Sent",
            CollectionStatus::NoFilesExported => "No_Files_Exported",
            CollectionStatus::Unknown(raw) => raw,
        }
    }

    /// Parse a stored value, never failing
    pub fn from_stored(value: &str) -> Self {
        match value {
            "Exporting" => CollectionStatus::Exporting,
            "Exported" => CollectionStatus::Exported,
            "Sent" => CollectionStatus::Sent,
            "No_Files_Exported" => CollectionStatus::NoFilesExported,
            other => CollectionStatus::Unknown(other.to_string()),
        }
    }
}

impl Default for CollectionStatus {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl fmt::Display for CollectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status record for one {run_id, collection_name}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionStatusRecord {
    /// Run this record belongs to
    pub run_id: RunId,

    /// Collection this record tracks
    pub collection: CollectionName,

    /// Current status
    pub status: CollectionStatus,

    /// Files written by the producer
    pub files_exported: u64,

    /// Files delivered downstream
    pub files_sent: u64,
}

impl CollectionStatusRecord {
    /// Record with defaults for every attribute, used when the row is absent
    pub fn empty(run_id: RunId, collection: CollectionName) -> Self {
        Self {
            run_id,
            collection,
            status: CollectionStatus::default(),
            files_exported: 0,
            files_sent: 0,
        }
    }

    /// Whether the collection may transition to `Sent`
    ///
    /// `Exported`, every exported file sent, and at least one file exported.
    pub fn is_eligible_for_sent(&self) -> bool {
        self.status == CollectionStatus::Exported
            && self.files_exported == self.files_sent
            && self.files_exported > 0
    }

    /// Whether the collection finished exporting with zero files
    pub fn exported_nothing(&self) -> bool {
        self.status == CollectionStatus::Exported && self.files_exported == 0
    }
}

/// Run-level outcome carried by the monitoring message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SendingCompletionStatus {
    /// Every collection in the run exported and sent
    CompletedSuccessfully,
    /// Some collection is still in flight, or the state could not be read
    CompletedUnsuccessfully,
}

impl SendingCompletionStatus {
    /// Map a run completeness decision to a status
    pub fn from_run_complete(complete: bool) -> Self {
        if complete {
            Self::CompletedSuccessfully
        } else {
            Self::CompletedUnsuccessfully
        }
    }

    /// Metric label
    pub fn label(&self) -> &'static str {
        match self {
            Self::CompletedSuccessfully => "completed_successfully",
            Self::CompletedUnsuccessfully => "completed_unsuccessfully",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(status: &str, exported: u64, sent: u64) -> CollectionStatusRecord {
        CollectionStatusRecord {
            run_id: RunId::from_str("123").unwrap(),
            collection: CollectionName::from_str("db.core.toDo").unwrap(),
            status: CollectionStatus::from_stored(status),
            files_exported: exported,
            files_sent: sent,
        }
    }

    #[test]
    fn test_status_round_trip_known_values() {
        for status in [
            CollectionStatus::Exporting,
            CollectionStatus::Exported,
            CollectionStatus::Sent,
            CollectionStatus::NoFilesExported,
        ] {
            assert_eq!(CollectionStatus::from_stored(status.as_str()), status);
        }
    }

    #[test]
    fn test_unknown_status_kept_verbatim() {
        let status = CollectionStatus::from_stored("Received");
        assert_eq!(status, CollectionStatus::Unknown("Received".to_string()));
        assert_eq!(status.to_string(), "Received");
    }

    #[test]
    fn test_missing_status_defaults_to_empty() {
        assert_eq!(CollectionStatus::default().as_str(), "");
    }

    #[test]
    fn test_eligibility() {
        assert!(record("Exported", 10, 10).is_eligible_for_sent());
        assert!(!record("Exported", 11, 10).is_eligible_for_sent());
        assert!(!record("Exporting", 10, 10).is_eligible_for_sent());
        assert!(!record("Exported", 0, 0).is_eligible_for_sent());
        assert!(!record("Sent", 10, 10).is_eligible_for_sent());
    }

    #[test]
    fn test_exported_nothing() {
        assert!(record("Exported", 0, 0).exported_nothing());
        assert!(!record("Exporting", 0, 0).exported_nothing());
        assert!(!record("Exported", 1, 0).exported_nothing());
    }

    #[test]
    fn test_empty_record() {
        let rec = CollectionStatusRecord::empty(
            RunId::from_str("123").unwrap(),
            CollectionName::from_str("topic").unwrap(),
        );
        assert_eq!(rec.status, CollectionStatus::Unknown(String::new()));
        assert_eq!(rec.files_exported, 0);
        assert_eq!(rec.files_sent, 0);
        assert!(!rec.is_eligible_for_sent());
    }

    #[test]
    fn test_sending_completion_status_mapping() {
        assert_eq!(
            SendingCompletionStatus::from_run_complete(true),
            SendingCompletionStatus::CompletedSuccessfully
        );
        assert_eq!(
            SendingCompletionStatus::from_run_complete(false),
            SendingCompletionStatus::CompletedUnsuccessfully
        );
    }
}
