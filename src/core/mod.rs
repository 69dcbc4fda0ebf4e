//! Core business logic for Clinisync.
//!
//! # Modules
//!
//! - [`codec`] - packing of diagnosis, treatment and notes into one string
//! - [`mapping`] - relational records to FHIR documents and back
//! - [`sync`] - write path: mirror records to the FHIR server
//! - [`timeline`] - read path: reconcile encounters and observations into visits
//! - [`history`] - read path: flat observation history
//!
//! # Data Flow
//!
//! Write: relational record → [`mapping::encode`] → [`crate::adapters::fhir::FhirStore::upsert`].
//!
//! Read: [`crate::adapters::fhir::FhirStore::query`] → [`mapping::decode`] →
//! [`codec::unpack`] → [`timeline::reconcile`] → visits, newest first.
//!
//! # Example
//!
//! ```rust,no_run
//! use clinisync::adapters::fhir::HttpFhirStore;
//! use clinisync::config::load_config;
//! use clinisync::core::timeline::build_timeline;
//! use clinisync::domain::DocumentNumber;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("clinisync.toml")?;
//! let store = HttpFhirStore::new(&config.fhir)?;
//! let document = DocumentNumber::new("3003")?;
//!
//! for visit in build_timeline(&store, &document).await {
//!     println!("{}: {} ({})", visit.date, visit.diagnosis, visit.treatment);
//! }
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod history;
pub mod mapping;
pub mod sync;
pub mod timeline;
