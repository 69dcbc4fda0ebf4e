//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "clinisync.toml")]
    pub output: String,

    /// Include the optional sections with explanatory comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let content = if self.with_examples {
            config_with_examples()
        } else {
            minimal_config()
        };

        if let Err(e) = fs::write(&self.output, content) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(EXIT_FATAL);
        }

        println!("✅ Configuration file created: {}", self.output);
        println!();
        println!("Next steps:");
        println!("  1. Point [fhir].base_url at your FHIR server");
        println!("  2. Export CLINISYNC_POSTGRESQL_CONNECTION_STRING for the clinic database");
        println!("  3. Validate configuration: clinisync validate-config");
        println!("  4. Check connectivity: clinisync check");
        println!("  5. Mirror records: clinisync sync");
        Ok(EXIT_OK)
    }
}

fn minimal_config() -> String {
    r#"# Clinisync configuration

[fhir]
base_url = "http://localhost:8080/fhir"
timeout_seconds = 5

[postgresql]
connection_string = "${CLINISYNC_POSTGRESQL_CONNECTION_STRING}"
"#
    .to_string()
}

fn config_with_examples() -> String {
    r#"# Clinisync configuration
#
# Values of the form ${VAR} are read from the environment at load time.
# CLINISYNC_<SECTION>_<KEY> variables override individual settings.

# development | staging | production
# Production refuses tls_verify = false.
environment = "development"

[application]
log_level = "info"

[fhir]
base_url = "http://localhost:8080/fhir"

# Per-request timeout in seconds
timeout_seconds = 5

# Namespace for Patient identifiers
identifier_system_base = "http://hospital-universidad.com/identificacion"

# Write Encounter.period.start from the recorded date so the timeline
# shows the clinical date instead of the server's lastUpdated
send_encounter_period = false

# Basic authentication (optional, both or neither)
# username = "sync"
# password = "${CLINISYNC_FHIR_PASSWORD}"

tls_verify = true

[postgresql]
connection_string = "${CLINISYNC_POSTGRESQL_CONNECTION_STRING}"
max_connections = 10
connection_timeout_seconds = 30
statement_timeout_seconds = 60

[sync]
# Patients mirrored concurrently by a bulk sync
max_concurrency = 4

# Also mirror encounters and observations
include_clinical = true

[logging]
local_enabled = false
local_path = "./logs"
# hourly | daily
local_rotation = "daily"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClinisyncConfig;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "clinisync.toml".to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.output, "clinisync.toml");
        assert!(!args.force);
    }

    #[test]
    fn test_templates_parse_as_config() {
        for template in [minimal_config(), config_with_examples()] {
            let text = template.replace(
                "${CLINISYNC_POSTGRESQL_CONNECTION_STRING}",
                "postgresql://clinic@localhost/clinic",
            );
            let config: ClinisyncConfig = toml::from_str(&text).unwrap();
            assert!(config.validate().is_ok());
            assert!(config.postgresql.is_some());
        }
    }

    #[tokio::test]
    async fn test_init_refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinisync.toml");
        std::fs::write(&path, "existing").unwrap();

        let args = InitArgs {
            output: path.to_str().unwrap().to_string(),
            with_examples: false,
            force: false,
        };
        assert_eq!(args.execute().await.unwrap(), EXIT_CONFIG);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing");

        let args = InitArgs { force: true, ..args };
        assert_eq!(args.execute().await.unwrap(), EXIT_OK);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[fhir]"));
    }
}
