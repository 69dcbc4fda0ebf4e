//! Write-path orchestration
//!
//! Mirrors relational records to the FHIR server. A rejected upsert is
//! reported in the returned outcome and never undoes or blocks the
//! relational write that triggered it.

use super::summary::{RegistrationOutcome, SyncSummary};
use crate::adapters::database::RecordSource;
use crate::adapters::fhir::{FhirStore, HttpFhirStore};
use crate::config::ClinisyncConfig;
use crate::core::mapping::encode::{
    encode_encounter, encode_observation, encode_patient, MapperSettings,
};
use crate::domain::{DocumentNumber, Encounter, Observation, Patient, ResourceId, Result};
use crate::log_sync_result;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

/// Mirrors patients, encounters and observations to a [`FhirStore`]
///
/// # Example
///
/// ```no_run
/// use clinisync::config::load_config;
/// use clinisync::core::sync::SyncService;
///
/// # async fn example() -> clinisync::domain::Result<()> {
/// let config = load_config("clinisync.toml")?;
/// let service = SyncService::from_config(&config)?;
/// # Ok(())
/// # }
/// ```
pub struct SyncService {
    store: Arc<dyn FhirStore>,
    settings: MapperSettings,
    max_concurrency: usize,
}

impl SyncService {
    /// Create a service over any store
    pub fn new(store: Arc<dyn FhirStore>, settings: MapperSettings) -> Self {
        Self {
            store,
            settings,
            max_concurrency: 1,
        }
    }

    /// Create a service talking HTTP to the configured FHIR server
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClinisyncConfig) -> Result<Self> {
        let store = HttpFhirStore::new(&config.fhir)?;
        Ok(Self::new(Arc::new(store), MapperSettings::from(&config.fhir))
            .with_max_concurrency(config.sync.max_concurrency))
    }

    /// Number of patients synchronized concurrently by [`Self::sync_all`]
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// The store this service writes to
    pub fn store(&self) -> &Arc<dyn FhirStore> {
        &self.store
    }

    async fn push(&self, id: ResourceId, document: Result<Value>) -> bool {
        let ok = match document {
            Ok(document) => {
                self.store
                    .upsert(id.resource_type(), id.as_str(), &document)
                    .await
            }
            Err(e) => {
                tracing::error!(id = %id, error = %e, "Failed to encode resource");
                false
            }
        };
        log_sync_result!(id.resource_type(), id, ok);
        ok
    }

    /// Mirror one patient
    pub async fn sync_patient(&self, patient: &Patient) -> bool {
        self.push(
            ResourceId::patient(&patient.document_number),
            encode_patient(patient, &self.settings),
        )
        .await
    }

    /// Mirror one encounter
    pub async fn sync_encounter(&self, encounter: &Encounter) -> bool {
        self.push(
            ResourceId::encounter(encounter.id),
            encode_encounter(encounter, &self.settings),
        )
        .await
    }

    /// Mirror one observation of the given patient
    pub async fn sync_observation(
        &self,
        observation: &Observation,
        patient_document: &DocumentNumber,
    ) -> bool {
        self.push(
            ResourceId::observation(observation.id),
            encode_observation(observation, patient_document),
        )
        .await
    }

    /// Mirror a clinical registration
    ///
    /// The encounter upsert completes before the first observation upsert
    /// starts, and observations go out one at a time in the given order.
    pub async fn sync_registration(
        &self,
        patient_document: &DocumentNumber,
        encounter: &Encounter,
        observations: &[Observation],
    ) -> RegistrationOutcome {
        let encounter_synced = self.sync_encounter(encounter).await;

        let mut results = Vec::with_capacity(observations.len());
        for observation in observations {
            let ok = self.sync_observation(observation, patient_document).await;
            results.push((observation.id, ok));
        }

        let outcome = RegistrationOutcome {
            encounter_id: encounter.id,
            encounter_synced,
            observations: results,
        };

        if !outcome.is_fully_synced() {
            tracing::warn!(
                encounter_id = %encounter.id,
                encounter_synced = outcome.encounter_synced,
                observations_failed = outcome.observations_failed(),
                "Registration saved locally but not fully mirrored"
            );
        }

        outcome
    }

    async fn sync_patient_records(
        &self,
        source: &dyn RecordSource,
        patient: Patient,
        include_clinical: bool,
    ) -> SyncSummary {
        let mut summary = SyncSummary::new();
        summary.patients.record(self.sync_patient(&patient).await);

        if !include_clinical {
            return summary;
        }

        let document = &patient.document_number;
        let encounters = match source.encounters_for_patient(document).await {
            Ok(encounters) => encounters,
            Err(e) => {
                summary
                    .errors
                    .push(format!("Encounters of patient {document}: {e}"));
                return summary;
            }
        };

        for encounter in &encounters {
            let observations = match source.observations_for_encounter(encounter.id).await {
                Ok(observations) => observations,
                Err(e) => {
                    summary
                        .errors
                        .push(format!("Observations of encounter {}: {e}", encounter.id));
                    Vec::new()
                }
            };
            let outcome = self
                .sync_registration(document, encounter, &observations)
                .await;
            summary.record_registration(&outcome);
        }

        summary
    }

    /// Mirror one patient of `source`, looked up by document number
    ///
    /// Returns `None` when the patient does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error only if the patient lookup fails.
    pub async fn sync_document(
        &self,
        source: &dyn RecordSource,
        document: &DocumentNumber,
        include_clinical: bool,
    ) -> Result<Option<SyncSummary>> {
        let start_time = Instant::now();
        let Some(patient) = source.find_patient(document).await? else {
            tracing::warn!(document = %document, "Patient not found in relational store");
            return Ok(None);
        };

        let summary = self
            .sync_patient_records(source, patient, include_clinical)
            .await
            .with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(Some(summary))
    }

    /// Mirror every patient in `source`
    ///
    /// With `include_clinical`, each patient's encounters and observations
    /// follow the patient, sequenced per patient. Up to the configured number
    /// of patients run concurrently. Individual failures are counted, not
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns an error only if the patient list cannot be read.
    pub async fn sync_all(
        &self,
        source: &dyn RecordSource,
        include_clinical: bool,
    ) -> Result<SyncSummary> {
        let start_time = Instant::now();
        let patients = source.list_patients().await?;

        tracing::info!(
            patients = patients.len(),
            include_clinical = include_clinical,
            max_concurrency = self.max_concurrency,
            "Starting bulk sync"
        );

        let results: Vec<SyncSummary> = stream::iter(patients)
            .map(|patient| self.sync_patient_records(source, patient, include_clinical))
            .buffer_unordered(self.max_concurrency)
            .collect()
            .await;

        let mut summary = SyncSummary::new();
        for result in results {
            summary.merge(result);
        }
        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Settings used to encode documents
    pub fn settings(&self) -> &MapperSettings {
        &self.settings
    }
}

impl std::fmt::Debug for SyncService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncService")
            .field("settings", &self.settings)
            .field("max_concurrency", &self.max_concurrency)
            .finish()
    }
}
