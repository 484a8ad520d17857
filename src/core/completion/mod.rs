//! Run completion decision engine
//!
//! - [`collection`] - Is this collection fully sent? Moves it to `Sent`.
//! - [`run`] - Is any collection in the run still in flight?
//! - [`orchestrator`] - Job-lifecycle hook routing decisions to the sinks.
//!
//! The identifiers of the invocation travel explicitly in a [`RunContext`].

pub mod collection;
pub mod orchestrator;
pub mod run;

pub use collection::{CollectionCompletionEvaluator, CollectionSettlement};
pub use orchestrator::{CompletionOrchestrator, CompletionOutcome};
pub use run::RunCompletionEvaluator;

use crate::config::TallymanConfig;
use crate::domain::{CollectionName, Result, RunId, TallyError};

/// Identifiers of one invocation, read once from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// Correlation id shared by the whole run
    pub run_id: RunId,
    /// Collection handled by this process
    pub collection: CollectionName,
    /// Export date (YYYY-MM-DD)
    pub export_date: String,
    /// Snapshot type (full or incremental)
    pub snapshot_type: String,
    /// Deployment environment
    pub environment: String,
}

impl RunContext {
    /// Build the context from a validated configuration
    ///
    /// # Errors
    ///
    /// Returns [`TallyError::Validation`] if the run id or topic name is blank.
    pub fn from_config(config: &TallymanConfig) -> Result<Self> {
        Ok(Self {
            run_id: RunId::new(config.run.correlation_id.clone()).map_err(TallyError::Validation)?,
            collection: CollectionName::new(config.run.topic_name.clone())
                .map_err(TallyError::Validation)?,
            export_date: config.run.export_date.clone(),
            snapshot_type: config.run.snapshot_type.clone(),
            environment: config.application.environment.clone(),
        })
    }

    /// Snapshot type with a leading capital, as shown in alert titles
    pub fn snapshot_label(&self) -> String {
        let mut chars = self.snapshot_type.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

/// How the batch job ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum JobExitStatus {
    Completed,
    Failed,
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn context(snapshot_type: &str) -> RunContext {
        RunContext {
            run_id: RunId::new("correlation.id").unwrap(),
            collection: CollectionName::new("db.core.toDo").unwrap(),
            export_date: "2020-01-01".to_string(),
            snapshot_type: snapshot_type.to_string(),
            environment: "test".to_string(),
        }
    }

    #[test]
    fn test_snapshot_label() {
        assert_eq!(context("full").snapshot_label(), "Full");
        assert_eq!(context("incremental").snapshot_label(), "Incremental");
        assert_eq!(context("").snapshot_label(), "");
    }

    #[test]
    fn test_from_config() {
        let config = crate::config::parse_config(
            r#"
[application]
environment = "qa"

[run]
correlation_id = "abc"
topic_name = "db.core.toDo"
export_date = "2020-01-01"
snapshot_type = "incremental"

[store.postgresql]
connection_string = "postgresql://u:p@localhost/status"

[success]
url = "http://localhost:8080/upload"
"#,
        )
        .unwrap();

        let ctx = RunContext::from_config(&config).unwrap();
        assert_eq!(ctx.run_id.as_str(), "abc");
        assert_eq!(ctx.collection.as_str(), "db.core.toDo");
        assert_eq!(ctx.environment, "qa");
        assert_eq!(ctx.snapshot_label(), "Incremental");
    }
}
