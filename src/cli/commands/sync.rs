//! Sync command implementation
//!
//! This module implements the `sync` command, which mirrors patients (and
//! optionally their encounters and observations) from PostgreSQL to the
//! FHIR server.

use super::{
    load_runtime_config, parse_document, EXIT_CONFIG, EXIT_CONNECTION, EXIT_FATAL, EXIT_OK,
    EXIT_PARTIAL,
};
use crate::adapters::database::create_record_source;
use crate::core::sync::{SyncService, SyncSummary};
use clap::Args;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Only sync the patient with this document number
    #[arg(short, long)]
    pub document: Option<String>,

    /// Sync patients only, without encounters and observations
    #[arg(long)]
    pub patients_only: bool,

    /// Override the number of patients synced concurrently
    #[arg(long)]
    pub max_concurrency: Option<usize>,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting sync command");

        let mut config = match load_runtime_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        if let Some(max_concurrency) = self.max_concurrency {
            tracing::info!(max_concurrency, "Overriding sync concurrency from CLI");
            config.sync.max_concurrency = max_concurrency;
        }
        let include_clinical = config.sync.include_clinical && !self.patients_only;

        let document = match self.document.as_deref().map(parse_document).transpose() {
            Ok(d) => d,
            Err(e) => {
                println!("❌ {e}");
                return Ok(EXIT_CONFIG);
            }
        };

        let source = match create_record_source(&config).await {
            Ok(s) => s,
            Err(e) => {
                println!("❌ Failed to create record source");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG);
            }
        };
        if let Err(e) = source.test_connection().await {
            println!("❌ Failed to connect to PostgreSQL");
            println!("   Error: {e}");
            return Ok(EXIT_CONNECTION);
        }

        let service = SyncService::from_config(&config)?;

        println!("🔄 Syncing to {}", config.fhir.base_url);

        let summary = match document {
            Some(ref document) => {
                match service
                    .sync_document(source.as_ref(), document, include_clinical)
                    .await
                {
                    Ok(Some(summary)) => summary,
                    Ok(None) => {
                        println!("⚠️  Patient {document} not found");
                        return Ok(EXIT_FATAL);
                    }
                    Err(e) => {
                        println!("❌ Failed to read patient {document}");
                        println!("   Error: {e}");
                        return Ok(EXIT_CONNECTION);
                    }
                }
            }
            None => match service.sync_all(source.as_ref(), include_clinical).await {
                Ok(summary) => summary,
                Err(e) => {
                    println!("❌ Failed to list patients");
                    println!("   Error: {e}");
                    return Ok(EXIT_CONNECTION);
                }
            },
        };

        print_summary(&summary);

        if summary.is_successful() {
            Ok(EXIT_OK)
        } else {
            Ok(EXIT_PARTIAL)
        }
    }
}

fn print_summary(summary: &SyncSummary) {
    println!();
    println!("{:<14} {:>10} {:>10} {:>10}", "Resource", "Attempted", "Synced", "Failed");
    println!("{}", "-".repeat(47));
    for (label, counts) in [
        ("Patient", &summary.patients),
        ("Encounter", &summary.encounters),
        ("Observation", &summary.observations),
    ] {
        println!(
            "{:<14} {:>10} {:>10} {:>10}",
            label, counts.attempted, counts.synced, counts.failed
        );
    }
    println!();
    for error in &summary.errors {
        println!("⚠️  {error}");
    }
    if summary.is_successful() {
        println!("✅ Sync completed in {:.2}s", summary.duration.as_secs_f64());
    } else {
        println!(
            "⚠️  Sync completed with {} failure(s); local records are unchanged",
            summary.total_failed() + summary.errors.len()
        );
    }
}
