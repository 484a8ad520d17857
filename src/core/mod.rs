//! Core business logic for Tallyman.
//!
//! # Modules
//!
//! - [`completion`] - Collection and run completion evaluators and the job-lifecycle hook
//! - [`retry`] - Bounded exponential-backoff retry applied to every remote call
//! - [`metrics`] - Counters flushed at the end of each invocation
//!
//! # Completion Workflow
//!
//! 1. **Settle the collection**: read its record, move it to `Sent` if every exported file was sent
//! 2. **Signal the collection**: post its success sentinel when this invocation moved it to `Sent`
//! 3. **Evaluate the run**: count collections still exporting, then those still sending
//! 4. **Signal the run**: post the full-run sentinel once nothing in the run is exporting or sending
//! 5. **Alert**: publish the run's sending status to monitoring
//! 6. **Flush**: push metrics, whatever happened above
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tallyman::adapters::notify::create_sinks;
//! use tallyman::adapters::store::create_status_store;
//! use tallyman::config::load_config;
//! use tallyman::core::completion::{CompletionOrchestrator, JobExitStatus, RunContext};
//! use tallyman::core::metrics::CompletionMetrics;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("tallyman.toml")?;
//! let context = RunContext::from_config(&config)?;
//! let metrics = Arc::new(CompletionMetrics::new());
//!
//! let store = create_status_store(&config.store, metrics.clone())?;
//! let sinks = create_sinks(&config, metrics.clone())?;
//!
//! let outcome = CompletionOrchestrator::new(store, sinks, metrics)
//!     .with_legacy_success_indicator(config.run.send_success_indicator)
//!     .on_job_finished(JobExitStatus::Completed, &context)
//!     .await?;
//!
//! println!("Signals posted: {:?}", outcome.signals);
//! # Ok(())
//! # }
//! ```

pub mod completion;
pub mod metrics;
pub mod retry;
