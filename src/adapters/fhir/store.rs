//! FHIR store trait definition
//!
//! [`FhirStore`] abstracts the two REST interactions Clinisync needs from a
//! FHIR server: replace-by-id and search-by-subject. The reconciler and the
//! sync service depend on this trait only, so they run unchanged against the
//! HTTP implementation or an in-memory double.

use crate::domain::{DocumentNumber, GatewayError, ResourceType};
use async_trait::async_trait;
use serde_json::Value;

/// Access to a FHIR server's resource collections
///
/// Implementors provide the explicit surface (`try_upsert`, `try_query`).
/// The legacy surface (`upsert`, `query`) is derived from it and never fails:
/// every error is logged and collapsed into `false` or an empty list.
///
/// # Example
///
/// ```no_run
/// use clinisync::adapters::fhir::{FhirStore, HttpFhirStore};
/// use clinisync::config::FhirConfig;
/// use clinisync::domain::{DocumentNumber, ResourceType};
///
/// # async fn example() -> clinisync::domain::Result<()> {
/// let store = HttpFhirStore::new(&FhirConfig::default())?;
/// let document = DocumentNumber::new("1020304050").map_err(clinisync::domain::ClinisyncError::Validation)?;
/// let encounters = store.query(ResourceType::Encounter, &document).await;
/// println!("{} encounters", encounters.len());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait FhirStore: Send + Sync {
    /// Create or replace `{resource_type}/{id}` with `document`
    ///
    /// Returns the HTTP status on 200 or 201.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for transport faults and any other status.
    async fn try_upsert(
        &self,
        resource_type: ResourceType,
        id: &str,
        document: &Value,
    ) -> Result<u16, GatewayError>;

    /// Search `resource_type` for resources whose subject is the patient
    /// identified by `document`
    ///
    /// Returns the bundle's `entry` array, empty when absent.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] for transport faults, non-200 statuses and
    /// undecodable bodies.
    async fn try_query(
        &self,
        resource_type: ResourceType,
        document: &DocumentNumber,
    ) -> Result<Vec<Value>, GatewayError>;

    /// Legacy upsert: `true` on success, `false` on any failure
    async fn upsert(&self, resource_type: ResourceType, id: &str, document: &Value) -> bool {
        match self.try_upsert(resource_type, id, document).await {
            Ok(status) => {
                tracing::debug!(
                    resource_type = %resource_type,
                    id = %id,
                    status = status,
                    "Upsert accepted"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    resource_type = %resource_type,
                    id = %id,
                    failure = e.kind(),
                    error = %e,
                    "Upsert failed"
                );
                false
            }
        }
    }

    /// Legacy query: the bundle entries, or empty on any failure
    async fn query(&self, resource_type: ResourceType, document: &DocumentNumber) -> Vec<Value> {
        match self.try_query(resource_type, document).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    resource_type = %resource_type,
                    document = %document,
                    failure = e.kind(),
                    error = %e,
                    "Query failed; treating as no results"
                );
                Vec::new()
            }
        }
    }
}
