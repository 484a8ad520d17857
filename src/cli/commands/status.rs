//! Status command implementation
//!
//! Shows this collection's record and the run's two in-flight counts.

use super::build_runtime;
use crate::cli::{exit_code_for, EXIT_OK};
use crate::domain::SendingCompletionStatus;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Create the status table and index first if they don't exist
    #[arg(long)]
    pub init_schema: bool,
}

fn show_count(count: Option<u64>) -> String {
    count.map_or_else(|| "unknown".to_string(), |c| c.to_string())
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Checking collection status");

        let runtime = match build_runtime(config_path) {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to initialize");
                println!("   Error: {}", e);
                return Ok(exit_code_for(&e));
            }
        };
        let store = &runtime.store;
        let ctx = &runtime.context;

        if let Err(e) = store.test_connection().await {
            println!("❌ Status store unreachable");
            println!("   Error: {}", e);
            return Ok(exit_code_for(&e.into()));
        }

        if self.init_schema {
            if let Err(e) = store.ensure_schema().await {
                println!("❌ Failed to initialize schema in {}", runtime.config.store.table_name);
                println!("   Error: {}", e);
                return Ok(exit_code_for(&e.into()));
            }
            println!("✅ Schema ready: {}", runtime.config.store.table_name);
        }

        let snapshot = async {
            let record = store.get(&ctx.run_id, &ctx.collection).await?;
            let exporting = store.count_exporting(&ctx.run_id).await?;
            let pending = store.count_pending_send(&ctx.run_id).await?;
            Ok::<_, crate::domain::StoreError>((record, exporting, pending))
        };

        let (record, exporting, pending) = match snapshot.await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to read status");
                println!("   Error: {}", e);
                return Ok(exit_code_for(&e.into()));
            }
        };

        let complete = exporting == Some(0) && pending == Some(0);

        println!("📊 Collection Status");
        println!();
        println!("  Run:             {}", ctx.run_id);
        println!("  Collection:      {}", ctx.collection);
        println!("  Status:          {}", record.status);
        println!("  Files exported:  {}", record.files_exported);
        println!("  Files sent:      {}", record.files_sent);
        println!("  Ready for Sent:  {}", record.is_eligible_for_sent());
        println!();
        println!("📦 Run");
        println!();
        println!("  Still exporting:      {}", show_count(exporting));
        println!("  Still sending:        {}", show_count(pending));
        println!(
            "  Sending status:       {}",
            SendingCompletionStatus::from_run_complete(complete).label()
        );

        Ok(EXIT_OK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_count() {
        assert_eq!(show_count(Some(3)), "3");
        assert_eq!(show_count(None), "unknown");
    }
}
