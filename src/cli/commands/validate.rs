//! Validate config command implementation

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, ClinisyncConfig};
use clap::Args;
use secrecy::ExposeSecret;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// Loading already validates; the summary only prints what was accepted.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        print!("{}", config_summary(&config));
        Ok(EXIT_OK)
    }
}

/// Human-readable summary with credentials redacted
pub fn config_summary(config: &ClinisyncConfig) -> String {
    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Environment: {:?}", config.environment),
        format!("  Log Level: {}", config.application.log_level),
        format!("  FHIR Server: {}", config.fhir.base_url),
        format!("  FHIR Timeout: {}s", config.fhir.timeout_seconds),
        format!(
            "  FHIR Auth: {}",
            match config.fhir.username {
                Some(ref user) => format!("basic ({user})"),
                None => "none".to_string(),
            }
        ),
        format!("  Encounter Period: {}", config.fhir.send_encounter_period),
    ];

    match config.postgresql {
        Some(ref pg) => {
            lines.push(format!(
                "  PostgreSQL: {}",
                pg.connection_string.expose_secret().redacted_host()
            ));
            lines.push(format!("  PostgreSQL Pool: {}", pg.max_connections));
        }
        None => lines.push("  PostgreSQL: not configured (sync unavailable)".to_string()),
    }

    lines.push(format!("  Sync Concurrency: {}", config.sync.max_concurrency));
    lines.push(format!("  Sync Clinical: {}", config.sync.include_clinical));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
