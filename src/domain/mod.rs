//! Domain models and types for Clinisync.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Identifiers** ([`DocumentNumber`], [`EncounterId`], [`ObservationId`]) and the
//!   deterministic FHIR id derivation ([`ResourceId`])
//! - **Relational records** ([`Patient`], [`Encounter`], [`Observation`])
//! - **Read models** ([`VisitSummary`], [`ObservationHistoryEntry`])
//! - **Error types** ([`ClinisyncError`], [`GatewayError`]) and the [`Result`] alias
//!
//! # Example
//!
//! ```rust
//! use clinisync::domain::{DocumentNumber, ResourceId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let doc = DocumentNumber::new("1020304050")?;
//! assert_eq!(ResourceId::patient(&doc).reference(), "Patient/pac-1020304050");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;
pub mod visit;

// Re-export commonly used types for convenience
pub use errors::{ClinisyncError, GatewayError};
pub use ids::{DocumentNumber, EncounterId, ObservationId, ResourceId, ResourceType};
pub use records::{Encounter, Gender, Observation, Patient, PatientBuilder};
pub use result::Result;
pub use visit::{ObservationHistoryEntry, VisitSummary};
