//! FHIR server integration
//!
//! - [`store`] - the [`FhirStore`] trait (explicit and legacy surfaces)
//! - [`client`] - [`HttpFhirStore`], the reqwest implementation
//! - [`models`] - typed wire structures and coding constants

pub mod client;
pub mod models;
pub mod store;

pub use client::HttpFhirStore;
pub use store::FhirStore;
