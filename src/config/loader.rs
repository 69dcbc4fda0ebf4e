//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{ClinisyncConfig, FhirConfig, PostgreSQLConfig};
use super::secret::secret_string;
use crate::domain::errors::ClinisyncError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (`${VAR}` syntax)
/// 3. Parses the TOML into [`ClinisyncConfig`]
/// 4. Applies environment variable overrides (`CLINISYNC_*`, `FHIR_HOST`/`FHIR_PORT`)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsing fails, a referenced
/// variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use clinisync::config::loader::load_config;
///
/// let config = load_config("clinisync.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<ClinisyncConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ClinisyncError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        ClinisyncError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: ClinisyncConfig = toml::from_str(&contents)
        .map_err(|e| ClinisyncError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        ClinisyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Builds a configuration from defaults plus environment overrides only
///
/// Used when no configuration file exists, matching deployments that only
/// set `FHIR_HOST`/`FHIR_PORT`.
///
/// # Errors
///
/// Returns an error if the resulting configuration is invalid
pub fn config_from_env() -> Result<ClinisyncConfig> {
    let mut config = ClinisyncConfig::default();
    apply_env_overrides(&mut config);
    config.validate().map_err(|e| {
        ClinisyncError::Configuration(format!("Configuration validation failed: {}", e))
    })?;
    Ok(config)
}

/// Substitutes environment variables in the format `${VAR_NAME}`
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| ClinisyncError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(ClinisyncError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides
///
/// Variables follow the pattern `CLINISYNC_<SECTION>_<KEY>`. The legacy
/// `FHIR_HOST` / `FHIR_PORT` pair is also honoured; an explicit
/// `CLINISYNC_FHIR_BASE_URL` wins over it.
fn apply_env_overrides(config: &mut ClinisyncConfig) {
    if let Ok(val) = std::env::var("CLINISYNC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Legacy host/port pair
    let host = std::env::var("FHIR_HOST").ok();
    let port = std::env::var("FHIR_PORT").ok();
    if host.is_some() || port.is_some() {
        config.fhir.base_url = FhirConfig::base_url_from_host(
            host.as_deref().unwrap_or("localhost"),
            port.as_deref().unwrap_or("8080"),
        );
    }

    if let Ok(val) = std::env::var("CLINISYNC_FHIR_BASE_URL") {
        config.fhir.base_url = val;
    }
    if let Ok(val) = std::env::var("CLINISYNC_FHIR_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.fhir.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("CLINISYNC_FHIR_USERNAME") {
        config.fhir.username = Some(val);
    }
    if let Ok(val) = std::env::var("CLINISYNC_FHIR_PASSWORD") {
        config.fhir.password = Some(secret_string(val));
    }
    if let Ok(val) = std::env::var("CLINISYNC_FHIR_SEND_ENCOUNTER_PERIOD") {
        config.fhir.send_encounter_period = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLINISYNC_FHIR_TLS_VERIFY") {
        config.fhir.tls_verify = val.parse().unwrap_or(true);
    }

    // A connection string in the environment creates the section if absent
    if let Ok(val) = std::env::var("CLINISYNC_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql {
            Some(ref mut pg) => pg.connection_string = secret_string(val),
            None => {
                config.postgresql = Some(PostgreSQLConfig {
                    connection_string: secret_string(val),
                    max_connections: 10,
                    connection_timeout_seconds: 30,
                    statement_timeout_seconds: 60,
                })
            }
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("CLINISYNC_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg.max_connections = max;
            }
        }
    }

    if let Ok(val) = std::env::var("CLINISYNC_SYNC_MAX_CONCURRENCY") {
        if let Ok(concurrency) = val.parse() {
            config.sync.max_concurrency = concurrency;
        }
    }
    if let Ok(val) = std::env::var("CLINISYNC_SYNC_INCLUDE_CLINICAL") {
        config.sync.include_clinical = val.parse().unwrap_or(true);
    }

    if let Ok(val) = std::env::var("CLINISYNC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("CLINISYNC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
