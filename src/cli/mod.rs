//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Tallyman using clap.

pub mod commands;

use crate::domain::TallyError;
use clap::{Parser, Subcommand};

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: configuration error
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: store or sink unreachable
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code: anything else
pub const EXIT_FATAL: i32 = 5;

/// Tallyman - export run completion tracker
#[derive(Parser, Debug)]
#[command(name = "tallyman")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "tallyman.toml", env = "TALLYMAN_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "TALLYMAN_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the completion hook after the batch job finished
    Complete(commands::complete::CompleteArgs),

    /// Record one delivered file for this collection
    RecordSent(commands::record_sent::RecordSentArgs),

    /// Show this collection's record and the run's in-flight counts
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Map an error to the process exit code
pub fn exit_code_for(error: &TallyError) -> i32 {
    match error {
        TallyError::Configuration(_) | TallyError::Validation(_) => EXIT_CONFIG,
        TallyError::Store(_) | TallyError::Sink(_) => EXIT_CONNECTION,
        _ => EXIT_FATAL,
    }
}
