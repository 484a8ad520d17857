//! CLI command implementations
//!
//! This module contains all CLI command implementations.

pub mod complete;
pub mod init;
pub mod record_sent;
pub mod status;
pub mod validate;

use crate::adapters::notify::create_sinks;
use crate::adapters::store::{create_status_store, StatusStore};
use crate::config::{load_config, TallymanConfig};
use crate::core::completion::{CompletionOrchestrator, RunContext};
use crate::core::metrics::CompletionMetrics;
use crate::domain::Result;
use std::sync::Arc;

/// Everything a command needs to talk to the store and the sinks
pub(crate) struct Runtime {
    pub config: TallymanConfig,
    pub context: RunContext,
    pub store: Arc<dyn StatusStore + Send + Sync>,
    pub orchestrator: CompletionOrchestrator,
}

/// Load configuration and wire the orchestrator
pub(crate) fn build_runtime(config_path: &str) -> Result<Runtime> {
    let config = load_config(config_path)?;
    let context = RunContext::from_config(&config)?;
    let metrics = Arc::new(CompletionMetrics::new());

    let store = create_status_store(&config.store, metrics.clone())?;
    let sinks = create_sinks(&config, metrics.clone())?;
    let orchestrator = CompletionOrchestrator::new(store.clone(), sinks, metrics)
        .with_legacy_success_indicator(config.run.send_success_indicator);

    Ok(Runtime {
        config,
        context,
        store,
        orchestrator,
    })
}
