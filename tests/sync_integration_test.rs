//! Integration tests for the write path against in-memory stores

mod common;

use chrono::{TimeZone, Utc};
use clinisync::core::codec::pack;
use clinisync::core::mapping::encode::MapperSettings;
use clinisync::core::sync::SyncService;
use clinisync::domain::{
    Encounter, EncounterId, Observation, ObservationId, Patient, PatientBuilder,
};
use common::{doc, InMemoryFhirStore, InMemorySource};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use std::sync::Arc;

fn fake_patient(document: &str) -> Patient {
    PatientBuilder::new()
        .document_type_prefix("CC")
        .document_number(document)
        .unwrap()
        .given_names(FirstName().fake::<String>())
        .family_names(LastName().fake::<String>())
        .gender_code(if (0..2).fake::<u8>() == 0 { "M" } else { "F" })
        .build()
        .unwrap()
}

fn clinic(patient_count: usize) -> InMemorySource {
    let mut source = InMemorySource::default();
    let mut next_observation = 1;
    for i in 0..patient_count {
        let document = format!("{}", 1000 + i);
        source.patients.push(fake_patient(&document));

        let encounter_id = EncounterId(i as i64 + 1);
        source.encounters.push(
            Encounter::new(
                encounter_id,
                doc(&document),
                pack("Gripe", "Reposo", Some("Control en 8 días")),
            )
            .with_recorded_at(Utc.with_ymd_and_hms(2024, 1, 10, 8, 30, 0).unwrap()),
        );
        for (description, value, unit) in [("Temperatura", "38.5", "C"), ("Estado", "Estable", "")]
        {
            let mut observation = Observation::new(
                ObservationId(next_observation),
                encounter_id,
                description,
                value,
            );
            if !unit.is_empty() {
                observation = observation.with_unit(unit);
            }
            source.observations.push(observation);
            next_observation += 1;
        }
    }
    source
}

fn service(store: Arc<InMemoryFhirStore>, max_concurrency: usize) -> SyncService {
    SyncService::new(store, MapperSettings::default()).with_max_concurrency(max_concurrency)
}

#[tokio::test]
async fn test_sync_all_mirrors_every_record() {
    let store = Arc::new(InMemoryFhirStore::new());
    let source = clinic(5);

    let summary = service(store.clone(), 3)
        .sync_all(&source, true)
        .await
        .unwrap();

    assert!(summary.is_successful());
    assert_eq!(summary.patients.synced, 5);
    assert_eq!(summary.encounters.synced, 5);
    assert_eq!(summary.observations.synced, 10);
    assert_eq!(summary.total_attempted(), 20);
    assert_eq!(store.len(), 20);

    let patient = store.get("Patient/pac-1000").unwrap();
    assert_eq!(patient["identifier"][0]["value"], "1000");
    assert_eq!(
        store.get("Observation/obs-1").unwrap()["encounter"]["reference"],
        "Encounter/enc-1"
    );
}

#[tokio::test]
async fn test_sync_all_patients_only() {
    let store = Arc::new(InMemoryFhirStore::new());
    let source = clinic(3);

    let summary = service(store.clone(), 2)
        .sync_all(&source, false)
        .await
        .unwrap();

    assert_eq!(summary.patients.synced, 3);
    assert_eq!(summary.encounters.attempted, 0);
    assert_eq!(store.len(), 3);
}

#[tokio::test]
async fn test_rejections_are_counted_not_raised() {
    let store = Arc::new(InMemoryFhirStore::new());
    store.reject("Encounter/enc-2");
    store.reject("Observation/obs-1");
    let source = clinic(2);

    let summary = service(store.clone(), 1)
        .sync_all(&source, true)
        .await
        .unwrap();

    assert!(!summary.is_successful());
    assert_eq!(summary.encounters.failed, 1);
    assert_eq!(summary.observations.failed, 1);
    assert_eq!(summary.total_failed(), 2);
    // Observations of a rejected encounter are still attempted
    assert!(store.get("Observation/obs-3").is_some());
    assert!(store.get("Observation/obs-4").is_some());
}

#[tokio::test]
async fn test_registration_writes_encounter_first() {
    let store = Arc::new(InMemoryFhirStore::new());
    let source = clinic(1);

    let outcome = service(store.clone(), 1)
        .sync_registration(&doc("1000"), &source.encounters[0], &source.observations)
        .await;

    assert!(outcome.is_fully_synced());
    assert_eq!(
        store.writes(),
        vec![
            "Encounter/enc-1".to_string(),
            "Observation/obs-1".to_string(),
            "Observation/obs-2".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_server_fails_softly() {
    let store = Arc::new(InMemoryFhirStore::unreachable());
    let source = clinic(2);

    let summary = service(store, 2).sync_all(&source, true).await.unwrap();

    assert_eq!(summary.total_attempted(), 8);
    assert_eq!(summary.total_failed(), 8);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn test_sync_document() {
    let store = Arc::new(InMemoryFhirStore::new());
    let source = clinic(3);
    let svc = service(store.clone(), 1);

    let summary = svc.sync_document(&source, &doc("1001"), true).await.unwrap();
    let summary = summary.expect("patient exists");
    assert_eq!(summary.patients.synced, 1);
    assert_eq!(summary.observations.synced, 2);
    assert!(store.get("Patient/pac-1001").is_some());
    assert!(store.get("Patient/pac-1000").is_none());

    let missing = svc.sync_document(&source, &doc("9999"), true).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_encounter_read_errors_are_reported() {
    let store = Arc::new(InMemoryFhirStore::new());
    let mut source = clinic(2);
    source.broken_encounter_reads = true;

    let summary = service(store, 1).sync_all(&source, true).await.unwrap();

    assert_eq!(summary.patients.synced, 2);
    assert_eq!(summary.errors.len(), 2);
    assert!(!summary.is_successful());
}

#[tokio::test]
async fn test_resync_is_idempotent() {
    let store = Arc::new(InMemoryFhirStore::new());
    let source = clinic(2);
    let svc = service(store.clone(), 2);

    svc.sync_all(&source, true).await.unwrap();
    let before = store.len();
    let summary = svc.sync_all(&source, true).await.unwrap();

    assert!(summary.is_successful());
    assert_eq!(store.len(), before);
}
