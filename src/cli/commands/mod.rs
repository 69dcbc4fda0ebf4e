//! CLI command implementations
//!
//! Every command returns a process exit code:
//! 0 success, 2 configuration error, 3 partial sync failure,
//! 4 connection error, 5 fatal error.

pub mod check;
pub mod history;
pub mod init;
pub mod sync;
pub mod timeline;
pub mod validate;

use crate::config::{config_from_env, load_config, ClinisyncConfig};
use crate::domain::{ClinisyncError, DocumentNumber, Result};
use std::path::Path;

/// Exit code for success
pub const EXIT_OK: i32 = 0;
/// Exit code for configuration errors
pub const EXIT_CONFIG: i32 = 2;
/// Exit code when some resources failed to sync
pub const EXIT_PARTIAL: i32 = 3;
/// Exit code for connection errors
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code for fatal errors
pub const EXIT_FATAL: i32 = 5;

/// Load the configuration file, or build one from the environment when the
/// file does not exist
///
/// # Errors
///
/// Returns a configuration error if the file is invalid or the environment
/// yields an invalid configuration.
pub fn load_runtime_config(config_path: &str) -> Result<ClinisyncConfig> {
    if Path::new(config_path).exists() {
        load_config(config_path)
    } else {
        tracing::info!(
            config_path = %config_path,
            "Configuration file not found, using defaults and environment"
        );
        config_from_env()
    }
}

/// Parse a document number given on the command line
///
/// # Errors
///
/// Returns a validation error for blank or malformed input.
pub fn parse_document(raw: &str) -> Result<DocumentNumber> {
    DocumentNumber::new(raw.trim()).map_err(ClinisyncError::Validation)
}
