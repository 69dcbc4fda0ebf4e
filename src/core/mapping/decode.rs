//! FHIR bundle entries to read models
//!
//! Server documents are read through optional paths. Any missing or
//! mistyped level resolves to the value in [`fallback`], so a malformed
//! entry degrades field by field and never affects its siblings.

use serde_json::Value;

/// Defaults substituted for absent fields
pub mod fallback {
    /// Encounter without a reason display
    pub const DIAGNOSIS: &str = "Sin Diagnóstico";
    /// Observation without a code display, inside a visit
    pub const OBSERVATION_NAME: &str = "Obs";
    /// Observation without a code display, in the flat history
    pub const HISTORY_KIND: &str = "Observación";
    /// Observation without a value, in the flat history
    pub const HISTORY_VALUE: &str = "N/A";
    /// Resource without usable date metadata
    pub const DATE: &str = "N/A";
}

/// Number of characters of an ISO-8601 timestamp that form the calendar day
const DAY_LEN: usize = 10;

/// Fields read from one Encounter entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEncounter {
    /// Logical id, e.g. `enc-42`
    pub id: Option<String>,
    /// Calendar day or [`fallback::DATE`]
    pub date: String,
    /// Packed reason text or [`fallback::DIAGNOSIS`]
    pub reason: String,
}

impl DecodedEncounter {
    /// Reference observations use to point at this encounter
    pub fn reference(&self) -> Option<String> {
        self.id.as_ref().map(|id| format!("Encounter/{id}"))
    }
}

/// Fields read from one Observation entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedObservation {
    /// `encounter.reference`, e.g. `Encounter/enc-42`
    pub encounter_reference: Option<String>,
    /// `code.coding[0].display`
    pub description: Option<String>,
    /// Quantity value rendered as text, else `valueString`
    pub value: Option<String>,
    /// Quantity unit, empty when absent
    pub unit: String,
    /// Calendar day from `meta.lastUpdated` or [`fallback::DATE`]
    pub date: String,
}

fn resource(entry: &Value) -> Option<&Value> {
    entry.get("resource")
}

fn string_at<'a>(value: Option<&'a Value>, pointer: &str) -> Option<&'a str> {
    value?.pointer(pointer)?.as_str()
}

/// First ten characters of a timestamp, or all of it when shorter
pub fn calendar_day(timestamp: &str) -> String {
    timestamp.chars().take(DAY_LEN).collect()
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Decode an Encounter bundle entry
///
/// The date prefers `period.start` and falls back to `meta.lastUpdated`.
pub fn decode_encounter(entry: &Value) -> DecodedEncounter {
    let res = resource(entry);

    let date = string_at(res, "/period/start")
        .or_else(|| string_at(res, "/meta/lastUpdated"))
        .map(calendar_day)
        .unwrap_or_else(|| fallback::DATE.to_string());

    let reason = string_at(res, "/reasonCode/0/coding/0/display")
        .unwrap_or(fallback::DIAGNOSIS)
        .to_string();

    DecodedEncounter {
        id: string_at(res, "/id").map(str::to_string),
        date,
        reason,
    }
}

/// Decode an Observation bundle entry
pub fn decode_observation(entry: &Value) -> DecodedObservation {
    let res = resource(entry);

    let value = res
        .and_then(|r| r.pointer("/valueQuantity/value"))
        .and_then(render_scalar)
        .or_else(|| string_at(res, "/valueString").map(str::to_string));

    DecodedObservation {
        encounter_reference: string_at(res, "/encounter/reference").map(str::to_string),
        description: string_at(res, "/code/coding/0/display").map(str::to_string),
        value,
        unit: string_at(res, "/valueQuantity/unit")
            .unwrap_or_default()
            .to_string(),
        date: string_at(res, "/meta/lastUpdated")
            .map(calendar_day)
            .unwrap_or_else(|| fallback::DATE.to_string()),
    }
}
