//! Relational record source trait
//!
//! This module defines the read interface over the authoritative relational
//! store. The sync service only depends on this trait.

use crate::domain::{DocumentNumber, Encounter, EncounterId, Observation, Patient, Result};
use async_trait::async_trait;

/// Read access to patients, encounters and observations
///
/// Implementations skip rows that cannot be turned into domain records
/// (for example a document number with characters not allowed in a FHIR
/// id) and log them, rather than failing the whole listing.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Test the connection to the store
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable.
    async fn test_connection(&self) -> Result<()>;

    /// All patients, ordered by document number
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn list_patients(&self) -> Result<Vec<Patient>>;

    /// The patient with the given document number, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn find_patient(&self, document: &DocumentNumber) -> Result<Option<Patient>>;

    /// Encounters of one patient, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn encounters_for_patient(&self, document: &DocumentNumber) -> Result<Vec<Encounter>>;

    /// Observations recorded during one encounter, in insertion order
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    async fn observations_for_encounter(&self, encounter_id: EncounterId)
        -> Result<Vec<Observation>>;
}
