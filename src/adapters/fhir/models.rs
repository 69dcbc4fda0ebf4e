//! FHIR R4 wire structures
//!
//! Only the subset of each resource that Clinisync writes is modelled.
//! Read-side decoding works on raw [`serde_json::Value`] entries instead
//! (see [`crate::core::mapping::decode`]) so that one malformed field never
//! fails a whole entry.

use serde::{Deserialize, Serialize};

/// Coding systems used on the wire
pub mod system {
    /// HL7 v3 ActCode, used for `Encounter.class`
    pub const V3_ACT_CODE: &str = "http://terminology.hl7.org/CodeSystem/v3-ActCode";
    /// SNOMED CT
    pub const SNOMED: &str = "http://snomed.info/sct";
    /// LOINC
    pub const LOINC: &str = "http://loinc.org";
    /// UCUM units of measure
    pub const UCUM: &str = "http://unitsofmeasure.org";
}

/// Fixed codes stamped on every resource of a kind
pub mod code {
    /// `Encounter.class` code for ambulatory visits
    pub const AMBULATORY: &str = "AMB";
    /// Display for [`AMBULATORY`]
    pub const AMBULATORY_DISPLAY: &str = "ambulatory";
    /// SNOMED code carried on every encounter reason
    pub const ENCOUNTER_REASON: &str = "390906004";
    /// LOINC code carried on every observation
    pub const OBSERVATION: &str = "8867-4";
}

/// Media type for request and response bodies
pub const FHIR_JSON: &str = "application/fhir+json";

/// `Reference` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
        }
    }
}

/// `Coding` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coding {
    pub system: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

/// `CodeableConcept` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeableConcept {
    pub coding: Vec<Coding>,
}

/// `Identifier` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub system: String,
    pub value: String,
}

/// `Reference` by business identifier, for actors not mirrored as resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentifierReference {
    pub identifier: Identifier,
}

/// `Encounter.participant` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterParticipant {
    pub individual: IdentifierReference,
}

/// `CodeableConcept` carrying free text only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextConcept {
    pub text: String,
}

/// `HumanName` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(rename = "use")]
    pub name_use: String,
    pub family: String,
    pub given: Vec<String>,
}

/// `ContactPoint` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub system: String,
    pub value: String,
}

/// `Period` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Period {
    pub start: String,
}

/// `Quantity` datatype
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub system: String,
}

/// Patient resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientResource {
    pub resource_type: String,
    pub id: String,
    pub identifier: Vec<Identifier>,
    pub name: Vec<HumanName>,
    pub gender: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub telecom: Vec<ContactPoint>,
}

/// Encounter resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncounterResource {
    pub resource_type: String,
    pub id: String,
    pub status: String,
    pub class: Coding,
    pub subject: Reference,
    pub reason_code: Vec<CodeableConcept>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<Period>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub participant: Vec<EncounterParticipant>,
}

/// Either arm of `Observation.value[x]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObservationValue {
    #[serde(rename = "valueQuantity")]
    Quantity(Quantity),
    #[serde(rename = "valueString")]
    Text(String),
}

/// Observation resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationResource {
    pub resource_type: String,
    pub id: String,
    pub status: String,
    pub code: CodeableConcept,
    pub subject: Reference,
    pub encounter: Reference,
    #[serde(flatten)]
    pub value: ObservationValue,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interpretation: Vec<TextConcept>,
}

/// Search result envelope
///
/// Entries stay raw; a missing `entry` array means no matches.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Bundle {
    #[serde(default)]
    pub entry: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_observation_value_flattens_to_value_x() {
        let quantity = ObservationResource {
            resource_type: "Observation".to_string(),
            id: "obs-1".to_string(),
            status: "final".to_string(),
            code: CodeableConcept { coding: vec![] },
            subject: Reference::new("Patient/pac-1"),
            encounter: Reference::new("Encounter/enc-1"),
            value: ObservationValue::Quantity(Quantity {
                value: 72.0,
                unit: Some("lpm".to_string()),
                system: system::UCUM.to_string(),
            }),
            interpretation: vec![],
        };
        let json = serde_json::to_value(&quantity).unwrap();
        assert_eq!(json["valueQuantity"]["value"], json!(72.0));
        assert!(json.get("valueString").is_none());

        let text = ObservationResource {
            value: ObservationValue::Text("positivo".to_string()),
            ..quantity
        };
        let json = serde_json::to_value(&text).unwrap();
        assert_eq!(json["valueString"], json!("positivo"));
        assert!(json.get("valueQuantity").is_none());
    }

    #[test]
    fn test_bundle_without_entries() {
        let bundle: Bundle =
            serde_json::from_value(json!({"resourceType": "Bundle", "total": 0})).unwrap();
        assert!(bundle.entry.is_empty());
    }

    #[test]
    fn test_human_name_use_keyword() {
        let name = HumanName {
            name_use: "official".to_string(),
            family: "Pérez".to_string(),
            given: vec!["Ana".to_string()],
        };
        let json = serde_json::to_value(&name).unwrap();
        assert_eq!(json["use"], json!("official"));
    }
}
