//! External system integrations for Clinisync.
//!
//! - [`fhir`] - FHIR R4 server gateway (HTTP, trait-based)
//! - [`database`] - Relational record source abstraction
//! - [`postgresql`] - PostgreSQL implementation of the record source
//!
//! # Design Pattern
//!
//! Adapters isolate external systems behind traits ([`fhir::FhirStore`],
//! [`database::RecordSource`]) so the core can be exercised with in-memory
//! doubles.
//!
//! ```rust,no_run
//! use clinisync::adapters::fhir::HttpFhirStore;
//! use clinisync::config::{secret_string, FhirConfig};
//!
//! # fn example() -> clinisync::domain::Result<()> {
//! let config = FhirConfig {
//!     base_url: "https://hapi.hospital.example/fhir".to_string(),
//!     username: Some("sync".to_string()),
//!     password: Some(secret_string("pass".to_string())),
//!     ..Default::default()
//! };
//!
//! let store = HttpFhirStore::new(&config)?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod fhir;
pub mod postgresql;
