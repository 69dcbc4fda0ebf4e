//! Synchronization of relational records to the FHIR server
//!
//! - [`service`] - [`SyncService`]: single-resource, registration and bulk sync
//! - [`summary`] - outcome and summary types

pub mod service;
pub mod summary;

pub use service::SyncService;
pub use summary::{RegistrationOutcome, ResourceCounts, SyncSummary};
