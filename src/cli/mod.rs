//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for Clinisync using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// Clinisync - SQL to FHIR clinical record sync
#[derive(Parser, Debug)]
#[command(name = "clinisync")]
#[command(version, about, long_about = None)]
#[command(author = "Clinisync Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "clinisync.toml", env = "CLINISYNC_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "CLINISYNC_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Mirror patients, encounters and observations to the FHIR server
    Sync(commands::sync::SyncArgs),

    /// Show a patient's visit timeline read back from the FHIR server
    Timeline(commands::timeline::TimelineArgs),

    /// Show a patient's observation history read back from the FHIR server
    History(commands::history::HistoryArgs),

    /// Check connectivity to the FHIR server and the database
    Check(commands::check::CheckArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
