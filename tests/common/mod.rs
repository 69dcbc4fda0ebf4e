//! In-memory doubles shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use clinisync::adapters::database::RecordSource;
use clinisync::adapters::fhir::FhirStore;
use clinisync::domain::{
    ClinisyncError, DocumentNumber, Encounter, EncounterId, GatewayError, Observation, Patient,
    ResourceId, ResourceType, Result,
};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

/// FHIR server double
///
/// Stores documents by `{type}/{id}` and stamps `meta.lastUpdated` the way a
/// server would, so read-path code sees realistic entries.
#[derive(Default)]
pub struct InMemoryFhirStore {
    resources: Mutex<BTreeMap<String, Value>>,
    rejected: Mutex<HashSet<String>>,
    writes: Mutex<Vec<String>>,
    clock: AtomicU64,
    pub unreachable: bool,
}

impl InMemoryFhirStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Make every upsert of `{type}/{id}` fail with 422
    pub fn reject(&self, key: &str) {
        self.rejected.lock().unwrap().insert(key.to_string());
    }

    /// Store a raw document with an explicit `lastUpdated`
    pub fn seed(&self, resource_type: ResourceType, mut document: Value, last_updated: &str) {
        let id = document["id"].as_str().unwrap().to_string();
        document["meta"] = json!({"lastUpdated": last_updated});
        self.resources
            .lock()
            .unwrap()
            .insert(format!("{resource_type}/{id}"), document);
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.resources.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.resources.lock().unwrap().len()
    }

    /// Keys of accepted and rejected upserts, in call order
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }

    fn next_timestamp(&self) -> String {
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        format!("2024-05-{:02}T09:00:00.000+00:00", (tick % 28) + 1)
    }
}

#[async_trait]
impl FhirStore for InMemoryFhirStore {
    async fn try_upsert(
        &self,
        resource_type: ResourceType,
        id: &str,
        document: &Value,
    ) -> std::result::Result<u16, GatewayError> {
        if self.unreachable {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }

        let key = format!("{resource_type}/{id}");
        self.writes.lock().unwrap().push(key.clone());
        if self.rejected.lock().unwrap().contains(&key) {
            return Err(GatewayError::BadStatus {
                status: 422,
                body: "Unprocessable Entity".to_string(),
            });
        }

        let mut stored = document.clone();
        stored["meta"] = json!({"lastUpdated": self.next_timestamp()});
        let existed = self.resources.lock().unwrap().insert(key, stored).is_some();
        Ok(if existed { 200 } else { 201 })
    }

    async fn try_query(
        &self,
        resource_type: ResourceType,
        document: &DocumentNumber,
    ) -> std::result::Result<Vec<Value>, GatewayError> {
        if self.unreachable {
            return Err(GatewayError::Transport("connection refused".to_string()));
        }

        let subject = ResourceId::patient(document).reference();
        let prefix = format!("{resource_type}/");
        Ok(self
            .resources
            .lock()
            .unwrap()
            .iter()
            .filter(|(key, doc)| {
                key.starts_with(&prefix) && doc["subject"]["reference"] == subject.as_str()
            })
            .map(|(_, doc)| json!({"resource": doc}))
            .collect())
    }
}

/// Relational store double
#[derive(Default)]
pub struct InMemorySource {
    pub patients: Vec<Patient>,
    pub encounters: Vec<Encounter>,
    pub observations: Vec<Observation>,
    pub broken_encounter_reads: bool,
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let mut patients = self.patients.clone();
        patients.sort_by(|a, b| a.document_number.as_str().cmp(b.document_number.as_str()));
        Ok(patients)
    }

    async fn find_patient(&self, document: &DocumentNumber) -> Result<Option<Patient>> {
        Ok(self
            .patients
            .iter()
            .find(|p| &p.document_number == document)
            .cloned())
    }

    async fn encounters_for_patient(&self, document: &DocumentNumber) -> Result<Vec<Encounter>> {
        if self.broken_encounter_reads {
            return Err(ClinisyncError::Database("relation does not exist".to_string()));
        }
        Ok(self
            .encounters
            .iter()
            .filter(|e| &e.patient_document == document)
            .cloned()
            .collect())
    }

    async fn observations_for_encounter(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Vec<Observation>> {
        Ok(self
            .observations
            .iter()
            .filter(|o| o.encounter_id == encounter_id)
            .cloned()
            .collect())
    }
}

pub fn doc(value: &str) -> DocumentNumber {
    DocumentNumber::new(value).unwrap()
}
