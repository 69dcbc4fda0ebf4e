//! Configuration management for Clinisync.
//!
//! Clinisync uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `CLINISYNC_*` overrides and the legacy `FHIR_HOST` / `FHIR_PORT` pair
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [application]
//! log_level = "info"
//!
//! [fhir]
//! base_url = "https://hapi.hospital.example/fhir"
//! timeout_seconds = 5
//! username = "sync"
//! password = "${CLINISYNC_FHIR_PASSWORD}"
//!
//! [postgresql]
//! connection_string = "${CLINISYNC_POSTGRESQL_CONNECTION_STRING}"
//!
//! [sync]
//! max_concurrency = 4
//! include_clinical = true
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use clinisync::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("clinisync.toml")?;
//! println!("FHIR server: {}", config.fhir.base_url);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{config_from_env, load_config};
pub use schema::{
    ApplicationConfig, ClinisyncConfig, Environment, FhirConfig, LoggingConfig,
    PostgreSQLConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
