//! History command implementation

use super::{load_runtime_config, parse_document, EXIT_CONFIG, EXIT_OK};
use crate::adapters::fhir::HttpFhirStore;
use crate::core::history::observation_history;
use clap::Args;

/// Arguments for the history command
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Patient document number
    #[arg(short, long)]
    pub document: String,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

impl HistoryArgs {
    /// Execute the history command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let document = match parse_document(&self.document) {
            Ok(d) => d,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let store = HttpFhirStore::new(&config.fhir)?;
        let history = observation_history(&store, &document).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&history)?);
            return Ok(EXIT_OK);
        }

        if history.is_empty() {
            println!("No observations found.");
            return Ok(EXIT_OK);
        }

        println!("{:<12} {:<30} {:<12} {:<10}", "Fecha", "Tipo", "Valor", "Unidad");
        println!("{}", "-".repeat(66));
        for entry in &history {
            println!(
                "{:<12} {:<30} {:<12} {:<10}",
                entry.date, entry.kind, entry.value, entry.unit
            );
        }

        Ok(EXIT_OK)
    }
}
