//! Record-sent command implementation
//!
//! Called by the sender once per delivered file.

use super::build_runtime;
use crate::cli::{exit_code_for, EXIT_OK};
use clap::Args;

/// Arguments for the record-sent command
#[derive(Args, Debug)]
pub struct RecordSentArgs {
    /// Name of the delivered file, for the log
    #[arg(long)]
    pub file: String,
}

impl RecordSentArgs {
    /// Execute the record-sent command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let runtime = match build_runtime(config_path) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Failed to initialize: {e}");
                return Ok(exit_code_for(&e));
            }
        };

        match runtime
            .orchestrator
            .record_file_sent(&runtime.context, &self.file)
            .await
        {
            Ok(files_sent) => {
                println!("{} files sent for {}", files_sent, runtime.context.collection);
                Ok(EXIT_OK)
            }
            Err(e) => {
                eprintln!("Failed to record sent file {}: {e}", self.file);
                Ok(exit_code_for(&e))
            }
        }
    }
}
