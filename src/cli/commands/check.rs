//! Check command implementation
//!
//! Verifies connectivity to the FHIR server and, when configured, to
//! PostgreSQL.

use super::{load_runtime_config, EXIT_CONFIG, EXIT_CONNECTION, EXIT_OK};
use crate::adapters::database::create_record_source;
use crate::adapters::fhir::HttpFhirStore;
use clap::Args;

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Skip the PostgreSQL check
    #[arg(long)]
    pub fhir_only: bool,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let mut healthy = true;

        let store = HttpFhirStore::new(&config.fhir)?;
        match store.check().await {
            Ok(()) => println!("✅ FHIR server reachable: {}", store.base_url()),
            Err(e) => {
                println!("❌ FHIR server unreachable: {}", store.base_url());
                println!("   Error: {e}");
                healthy = false;
            }
        }

        if !self.fhir_only && config.postgresql.is_some() {
            match create_record_source(&config).await {
                Ok(source) => match source.test_connection().await {
                    Ok(()) => println!("✅ PostgreSQL reachable"),
                    Err(e) => {
                        println!("❌ PostgreSQL unreachable");
                        println!("   Error: {e}");
                        healthy = false;
                    }
                },
                Err(e) => {
                    println!("❌ Invalid PostgreSQL settings");
                    println!("   Error: {e}");
                    return Ok(EXIT_CONFIG);
                }
            }
        }

        Ok(if healthy { EXIT_OK } else { EXIT_CONNECTION })
    }
}
