//! Clinical timeline reconciliation
//!
//! Joins a patient's Encounters and Observations, as mirrored on the FHIR
//! server, into one visit per encounter, newest first.
//!
//! The two searches are independent and not snapshot-consistent: an
//! observation written between them may be missing from its visit until the
//! next read.

use crate::adapters::fhir::FhirStore;
use crate::core::codec::unpack;
use crate::core::mapping::decode::{
    decode_encounter, decode_observation, fallback, DecodedObservation,
};
use crate::domain::{DocumentNumber, ResourceType, VisitSummary};
use serde_json::Value;

/// Fetch and reconcile the visit history of one patient
///
/// Gateway failures surface as missing data, never as an error: an
/// unreachable server yields an empty timeline.
///
/// # Example
///
/// ```no_run
/// use clinisync::adapters::fhir::HttpFhirStore;
/// use clinisync::config::FhirConfig;
/// use clinisync::core::timeline::build_timeline;
/// use clinisync::domain::DocumentNumber;
///
/// # async fn example() -> clinisync::domain::Result<()> {
/// let store = HttpFhirStore::new(&FhirConfig::default())?;
/// let document = DocumentNumber::new("3003").map_err(clinisync::domain::ClinisyncError::Validation)?;
/// for visit in build_timeline(&store, &document).await {
///     println!("{} {}", visit.date, visit.diagnosis);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn build_timeline<S>(store: &S, document: &DocumentNumber) -> Vec<VisitSummary>
where
    S: FhirStore + ?Sized,
{
    let (observations, encounters) = tokio::join!(
        store.query(ResourceType::Observation, document),
        store.query(ResourceType::Encounter, document),
    );

    let visits = reconcile(&encounters, &observations);

    tracing::info!(
        document = %document,
        encounters = encounters.len(),
        observations = observations.len(),
        visits = visits.len(),
        "Timeline built"
    );

    visits
}

/// Group observation entries under their encounter entries
///
/// Observations whose `encounter.reference` matches no encounter are left
/// out. Matching is a linear scan per encounter.
pub fn reconcile(encounters: &[Value], observations: &[Value]) -> Vec<VisitSummary> {
    let decoded_observations: Vec<DecodedObservation> =
        observations.iter().map(decode_observation).collect();

    let mut visits: Vec<VisitSummary> = encounters
        .iter()
        .map(|entry| {
            let encounter = decode_encounter(entry);
            let note = unpack(&encounter.reason);

            let observations = match encounter.reference() {
                Some(reference) => decoded_observations
                    .iter()
                    .filter(|obs| obs.encounter_reference.as_deref() == Some(reference.as_str()))
                    .map(format_observation)
                    .collect(),
                None => Vec::new(),
            };

            VisitSummary {
                date: encounter.date,
                diagnosis: note.diagnosis,
                treatment: note.treatment,
                notes: note.notes,
                observations,
            }
        })
        .collect();

    // Stable: visits sharing a date keep server order
    visits.sort_by(|a, b| b.date.cmp(&a.date));
    visits
}

fn format_observation(observation: &DecodedObservation) -> String {
    format!(
        "{}: {} {}",
        observation
            .description
            .as_deref()
            .unwrap_or(fallback::OBSERVATION_NAME),
        observation.value.as_deref().unwrap_or_default(),
        observation.unit
    )
}
