//! Complete command implementation
//!
//! Invoked once by the batch job's wrapper after the job ends.

use super::build_runtime;
use crate::cli::{exit_code_for, EXIT_OK};
use crate::core::completion::JobExitStatus;
use clap::Args;

/// Arguments for the complete command
#[derive(Args, Debug)]
pub struct CompleteArgs {
    /// How the batch job ended
    #[arg(long, value_enum)]
    pub job_status: JobExitStatus,

    /// Post only the full-run success signal (overrides run.send_success_indicator)
    #[arg(long)]
    pub send_success_indicator: bool,
}

impl CompleteArgs {
    /// Execute the complete command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let runtime = match build_runtime(config_path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to initialize: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        let orchestrator = if self.send_success_indicator {
            runtime.orchestrator.with_legacy_success_indicator(true)
        } else {
            runtime.orchestrator
        };

        tracing::info!(
            run_id = %runtime.context.run_id,
            collection = %runtime.context.collection,
            job_status = ?self.job_status,
            "Running completion hook"
        );

        match orchestrator
            .on_job_finished(self.job_status, &runtime.context)
            .await
        {
            Ok(outcome) => {
                tracing::info!(
                    collection_status = ?outcome.collection_status,
                    sending_status = ?outcome.sending_status,
                    signals = ?outcome.signals,
                    "Completion hook finished"
                );
                Ok(EXIT_OK)
            }
            Err(e) => {
                eprintln!("Completion hook failed: {e}");
                Ok(exit_code_for(&e))
            }
        }
    }
}
