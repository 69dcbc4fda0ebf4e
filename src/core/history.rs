//! Flat observation history
//!
//! One row per Observation mirrored for a patient, in server order.

use crate::adapters::fhir::FhirStore;
use crate::core::mapping::decode::{decode_observation, fallback};
use crate::domain::{DocumentNumber, ObservationHistoryEntry, ResourceType};
use serde_json::Value;

/// Fetch the observation history of one patient
///
/// An unreachable server yields an empty history.
pub async fn observation_history<S>(
    store: &S,
    document: &DocumentNumber,
) -> Vec<ObservationHistoryEntry>
where
    S: FhirStore + ?Sized,
{
    let entries = store.query(ResourceType::Observation, document).await;
    let history = history_entries(&entries);

    tracing::info!(
        document = %document,
        entries = history.len(),
        "Observation history built"
    );

    history
}

/// Convert Observation bundle entries into history rows
pub fn history_entries(entries: &[Value]) -> Vec<ObservationHistoryEntry> {
    entries
        .iter()
        .map(decode_observation)
        .map(|obs| ObservationHistoryEntry {
            date: obs.date,
            kind: obs
                .description
                .unwrap_or_else(|| fallback::HISTORY_KIND.to_string()),
            value: obs
                .value
                .unwrap_or_else(|| fallback::HISTORY_VALUE.to_string()),
            unit: obs.unit,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_history_entries() {
        let entries = vec![
            json!({"resource": {
                "meta": {"lastUpdated": "2024-05-02T11:00:00.000+00:00"},
                "code": {"coding": [{"display": "Glucosa"}]},
                "valueQuantity": {"value": 95, "unit": "mg/dL"}
            }}),
            json!({"resource": {"meta": {"lastUpdated": "2024"}}}),
        ];

        let history = history_entries(&entries);
        assert_eq!(
            history[0],
            ObservationHistoryEntry {
                date: "2024-05-02".to_string(),
                kind: "Glucosa".to_string(),
                value: "95".to_string(),
                unit: "mg/dL".to_string(),
            }
        );
        assert_eq!(history[1].date, "2024");
        assert_eq!(history[1].kind, "Observación");
        assert_eq!(history[1].value, "N/A");
        assert_eq!(history[1].unit, "");
    }

    #[test]
    fn test_history_without_meta() {
        let history = history_entries(&[json!({"resource": {"valueString": "negativo"}})]);
        assert_eq!(history[0].date, "N/A");
        assert_eq!(history[0].value, "negativo");
    }
}
