// Tallyman - Export run completion tracker
// Copyright (c) 2025 Tallyman Contributors
// Licensed under the MIT License

//! # Tallyman - export run completion tracker
//!
//! A batch export runs as one job per collection. Each job writes files, a
//! sender delivers them, and a shared status table records how far every
//! collection got. Tallyman is the hook that runs when a job ends: it decides
//! whether the collection and the whole run are finished, and says so.
//!
//! ## Overview
//!
//! - **Settling** a collection: `Exported` with every file sent becomes `Sent`
//! - **Signalling** success: an empty gzip sentinel posted to the success sink
//! - **Evaluating** the run: nothing still exporting, nothing still sending
//! - **Alerting**: a monitoring message carrying the run's sending status
//! - **Counting** delivered files as the sender reports them
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Completion evaluators, the orchestrator, retry and metrics
//! - [`adapters`] - Status store (PostgreSQL, in-memory) and HTTP sinks
//! - [`domain`] - Identifiers, status model and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tallyman::adapters::store::{InMemoryStatusStore, StatusStore};
//! use tallyman::core::completion::CollectionCompletionEvaluator;
//! use tallyman::domain::{CollectionName, RunId};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStatusStore::new());
//! let evaluator = CollectionCompletionEvaluator::new(store);
//!
//! let run_id = RunId::new("123")?;
//! let collection = CollectionName::new("db.core.toDo")?;
//! let status = evaluator.set_collection_status(&run_id, &collection).await?;
//! println!("{collection} is now {status}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`domain::Result`], whose error is
//! [`domain::TallyError`]. Store and sink failures keep their own variants so
//! the CLI can map them to distinct exit codes.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
