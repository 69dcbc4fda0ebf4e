//! Timeline command implementation
//!
//! Prints a patient's visits as mirrored on the FHIR server, newest first.

use super::{load_runtime_config, parse_document, EXIT_CONFIG, EXIT_OK};
use crate::adapters::fhir::HttpFhirStore;
use crate::core::timeline::build_timeline;
use crate::domain::VisitSummary;
use clap::Args;

/// Arguments for the timeline command
#[derive(Args, Debug)]
pub struct TimelineArgs {
    /// Patient document number
    #[arg(short, long)]
    pub document: String,

    /// Print JSON instead of a text listing
    #[arg(long)]
    pub json: bool,
}

impl TimelineArgs {
    /// Execute the timeline command
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
        let visits = build_timeline(&store, &document).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&visits)?);
        } else {
            print!("{}", render_visits(&visits));
        }

        Ok(EXIT_OK)
    }
}

/// Render visits as an indented text listing
pub fn render_visits(visits: &[VisitSummary]) -> String {
    if visits.is_empty() {
        return "No visits found.\n".to_string();
    }

    let mut out = String::new();
    for visit in visits {
        out.push_str(&format!("📅 {}  {}\n", visit.date, visit.diagnosis));
        out.push_str(&format!("   Tratamiento: {}\n", visit.treatment));
        if !visit.notes.is_empty() {
            out.push_str(&format!("   Observaciones: {}\n", visit.notes));
        }
        for observation in &visit.observations {
            out.push_str(&format!("   • {}\n", observation.trim_end()));
        }
    }
    out
}
