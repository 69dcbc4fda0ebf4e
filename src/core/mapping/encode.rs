//! Relational records to FHIR resource documents
//!
//! Every function here is pure: the same record and settings always produce
//! the same document, and resource ids are derived from local keys only.

use crate::adapters::fhir::models::{
    code, system, CodeableConcept, Coding, ContactPoint, EncounterParticipant, EncounterResource,
    HumanName, Identifier, IdentifierReference, ObservationResource, ObservationValue,
    PatientResource, Period, Quantity, Reference, TextConcept,
};
use crate::config::FhirConfig;
use crate::domain::{DocumentNumber, Encounter, Observation, Patient, ResourceId, Result};
use chrono::SecondsFormat;
use serde_json::Value;

/// Settings that shape encoded documents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperSettings {
    /// Base of the Patient identifier system
    pub identifier_system_base: String,

    /// Emit `Encounter.period.start` from the local timestamp
    pub send_encounter_period: bool,
}

impl Default for MapperSettings {
    fn default() -> Self {
        Self::from(&FhirConfig::default())
    }
}

impl From<&FhirConfig> for MapperSettings {
    fn from(config: &FhirConfig) -> Self {
        Self {
            identifier_system_base: config
                .identifier_system_base
                .trim_end_matches('/')
                .to_string(),
            send_encounter_period: config.send_encounter_period,
        }
    }
}

/// Build the Patient resource for a relational patient
pub fn patient_resource(patient: &Patient, settings: &MapperSettings) -> PatientResource {
    let mut telecom = Vec::new();
    if let Some(ref phone) = patient.phone {
        telecom.push(ContactPoint {
            system: "phone".to_string(),
            value: phone.clone(),
        });
    }
    if let Some(ref email) = patient.email {
        telecom.push(ContactPoint {
            system: "email".to_string(),
            value: email.clone(),
        });
    }

    PatientResource {
        resource_type: "Patient".to_string(),
        id: ResourceId::patient(&patient.document_number).as_str().to_string(),
        identifier: vec![Identifier {
            system: format!(
                "{}/{}",
                settings.identifier_system_base, patient.document_type_prefix
            ),
            value: patient.document_number.as_str().to_string(),
        }],
        name: vec![HumanName {
            name_use: "official".to_string(),
            family: patient.family_names.clone(),
            given: vec![patient.given_names.clone()],
        }],
        gender: patient.gender.as_fhir().to_string(),
        birth_date: patient
            .birth_date
            .map(|d| d.format("%Y-%m-%d").to_string()),
        telecom,
    }
}

/// Last segment of the identifier system used for attending clinicians
pub const CLINICIAN_SYSTEM_SUFFIX: &str = "medico";

/// Build the Encounter resource for a relational encounter
///
/// `period.start` is only written when enabled in `settings` and the record
/// carries a timestamp. The attending clinician becomes a participant
/// referenced by identifier, since practitioners are not mirrored.
pub fn encounter_resource(encounter: &Encounter, settings: &MapperSettings) -> EncounterResource {
    let period = encounter
        .recorded_at
        .filter(|_| settings.send_encounter_period)
        .map(|at| Period {
            start: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        });

    let participant = encounter
        .clinician_id
        .map(|clinician| EncounterParticipant {
            individual: IdentifierReference {
                identifier: Identifier {
                    system: format!(
                        "{}/{}",
                        settings.identifier_system_base, CLINICIAN_SYSTEM_SUFFIX
                    ),
                    value: clinician.to_string(),
                },
            },
        })
        .into_iter()
        .collect();

    EncounterResource {
        resource_type: "Encounter".to_string(),
        id: ResourceId::encounter(encounter.id).as_str().to_string(),
        status: "finished".to_string(),
        class: Coding {
            system: system::V3_ACT_CODE.to_string(),
            code: code::AMBULATORY.to_string(),
            display: Some(code::AMBULATORY_DISPLAY.to_string()),
        },
        subject: Reference::new(ResourceId::patient(&encounter.patient_document).reference()),
        reason_code: vec![CodeableConcept {
            coding: vec![Coding {
                system: system::SNOMED.to_string(),
                code: code::ENCOUNTER_REASON.to_string(),
                display: Some(encounter.reason.clone()),
            }],
        }],
        period,
        participant,
    }
}

/// Parse a stored value as a finite number
///
/// Surrounding whitespace is ignored. `NaN` and infinities are rejected
/// because JSON cannot carry them.
pub fn numeric_value(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Build the Observation resource for a relational observation
///
/// The value becomes `valueQuantity` when it parses as a finite number and
/// `valueString` otherwise.
pub fn observation_resource(
    observation: &Observation,
    patient_document: &DocumentNumber,
) -> ObservationResource {
    let value = match numeric_value(&observation.value) {
        Some(number) => ObservationValue::Quantity(Quantity {
            value: number,
            unit: observation.unit.clone(),
            system: system::UCUM.to_string(),
        }),
        None => ObservationValue::Text(observation.value.clone()),
    };

    ObservationResource {
        resource_type: "Observation".to_string(),
        id: ResourceId::observation(observation.id).as_str().to_string(),
        status: "final".to_string(),
        code: CodeableConcept {
            coding: vec![Coding {
                system: system::LOINC.to_string(),
                code: code::OBSERVATION.to_string(),
                display: Some(observation.description.clone()),
            }],
        },
        subject: Reference::new(ResourceId::patient(patient_document).reference()),
        encounter: Reference::new(ResourceId::encounter(observation.encounter_id).reference()),
        value,
        interpretation: observation
            .interpretation
            .iter()
            .filter(|text| !text.trim().is_empty())
            .map(|text| TextConcept { text: text.clone() })
            .collect(),
    }
}

/// Encode a patient as a JSON document
///
/// # Errors
///
/// Returns a serialization error if the document cannot be rendered.
pub fn encode_patient(patient: &Patient, settings: &MapperSettings) -> Result<Value> {
    Ok(serde_json::to_value(patient_resource(patient, settings))?)
}

/// Encode an encounter as a JSON document
///
/// # Errors
///
/// Returns a serialization error if the document cannot be rendered.
pub fn encode_encounter(encounter: &Encounter, settings: &MapperSettings) -> Result<Value> {
    Ok(serde_json::to_value(encounter_resource(encounter, settings))?)
}

/// Encode an observation as a JSON document
///
/// # Errors
///
/// Returns a serialization error if the document cannot be rendered.
pub fn encode_observation(
    observation: &Observation,
    patient_document: &DocumentNumber,
) -> Result<Value> {
    Ok(serde_json::to_value(observation_resource(
        observation,
        patient_document,
    ))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EncounterId, ObservationId};
    use chrono::{NaiveDate, TimeZone, Utc};
    use serde_json::json;
    use test_case::test_case;

    fn doc(value: &str) -> DocumentNumber {
        DocumentNumber::new(value).unwrap()
    }

    fn patient() -> Patient {
        Patient::builder()
            .document_type_prefix("CC")
            .document_number("123")
            .unwrap()
            .given_names("Ana María")
            .family_names("Pérez Gómez")
            .gender_code("F")
            .birth_date(NaiveDate::from_ymd_opt(1990, 1, 5).unwrap())
            .build()
            .unwrap()
    }

    #[test]
    fn test_encode_patient() {
        let json = encode_patient(&patient(), &MapperSettings::default()).unwrap();
        assert_eq!(
            json,
            json!({
                "resourceType": "Patient",
                "id": "pac-123",
                "identifier": [{
                    "system": "http://hospital-universidad.com/identificacion/CC",
                    "value": "123"
                }],
                "name": [{"use": "official", "family": "Pérez Gómez", "given": ["Ana María"]}],
                "gender": "female",
                "birthDate": "1990-01-05"
            })
        );
    }

    #[test]
    fn test_encode_patient_without_birth_date_with_telecom() {
        let mut patient = patient();
        patient.birth_date = None;
        patient.phone = Some("3001234567".to_string());
        patient.email = Some("ana@hce.com".to_string());

        let json = encode_patient(&patient, &MapperSettings::default()).unwrap();
        assert!(json.get("birthDate").is_none());
        assert_eq!(
            json["telecom"],
            json!([
                {"system": "phone", "value": "3001234567"},
                {"system": "email", "value": "ana@hce.com"}
            ])
        );
    }

    #[test]
    fn test_encode_patient_male() {
        let mut patient = patient();
        patient.gender = crate::domain::Gender::from_code("M");
        let json = encode_patient(&patient, &MapperSettings::default()).unwrap();
        assert_eq!(json["gender"], json!("male"));
    }

    #[test]
    fn test_encode_encounter() {
        let encounter = Encounter::new(EncounterId(42), doc("123"), "Gripe | Tx: Reposo");
        let json = encode_encounter(&encounter, &MapperSettings::default()).unwrap();
        assert_eq!(
            json,
            json!({
                "resourceType": "Encounter",
                "id": "enc-42",
                "status": "finished",
                "class": {
                    "system": "http://terminology.hl7.org/CodeSystem/v3-ActCode",
                    "code": "AMB",
                    "display": "ambulatory"
                },
                "subject": {"reference": "Patient/pac-123"},
                "reasonCode": [{"coding": [{
                    "system": "http://snomed.info/sct",
                    "code": "390906004",
                    "display": "Gripe | Tx: Reposo"
                }]}]
            })
        );
    }

    #[test]
    fn test_encounter_period_is_opt_in() {
        let at = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();
        let encounter = Encounter::new(EncounterId(1), doc("123"), "Gripe").with_recorded_at(at);

        let legacy = encode_encounter(&encounter, &MapperSettings::default()).unwrap();
        assert!(legacy.get("period").is_none());

        let settings = MapperSettings {
            send_encounter_period: true,
            ..Default::default()
        };
        let json = encode_encounter(&encounter, &settings).unwrap();
        assert_eq!(json["period"]["start"], json!("2024-02-01T09:30:00Z"));
    }

    #[test]
    fn test_encode_observation_numeric() {
        let observation = Observation::new(ObservationId(7), EncounterId(42), "Frecuencia Cardiaca", "72")
            .with_unit("lpm");
        let json = encode_observation(&observation, &doc("123")).unwrap();
        assert_eq!(json["id"], json!("obs-7"));
        assert_eq!(json["status"], json!("final"));
        assert_eq!(json["code"]["coding"][0]["code"], json!("8867-4"));
        assert_eq!(json["code"]["coding"][0]["display"], json!("Frecuencia Cardiaca"));
        assert_eq!(json["subject"]["reference"], json!("Patient/pac-123"));
        assert_eq!(json["encounter"]["reference"], json!("Encounter/enc-42"));
        assert_eq!(
            json["valueQuantity"],
            json!({"value": 72.0, "unit": "lpm", "system": "http://unitsofmeasure.org"})
        );
        assert!(json.get("valueString").is_none());
    }

    #[test]
    fn test_encode_observation_text() {
        let observation = Observation::new(ObservationId(8), EncounterId(42), "Prueba COVID", "positivo");
        let json = encode_observation(&observation, &doc("123")).unwrap();
        assert_eq!(json["valueString"], json!("positivo"));
        assert!(json.get("valueQuantity").is_none());
    }

    #[test]
    fn test_encounter_clinician_becomes_participant() {
        let encounter = Encounter::new(EncounterId(5), doc("123"), "Gripe").with_clinician(2);
        let json = encode_encounter(&encounter, &MapperSettings::default()).unwrap();
        assert_eq!(
            json["participant"],
            json!([{"individual": {"identifier": {
                "system": "http://hospital-universidad.com/identificacion/medico",
                "value": "2"
            }}}])
        );
    }

    #[test]
    fn test_observation_interpretation_text() {
        let observation = Observation::new(ObservationId(8), EncounterId(5), "Glucosa", "180")
            .with_unit("mg/dL")
            .with_interpretation("Alto");
        let json = encode_observation(&observation, &doc("123")).unwrap();
        assert_eq!(json["interpretation"], json!([{"text": "Alto"}]));

        let blank = observation.with_interpretation("  ");
        let json = encode_observation(&blank, &doc("123")).unwrap();
        assert!(json.get("interpretation").is_none());
    }

    #[test_case("72", Some(72.0); "integer")]
    #[test_case(" 36.5 ", Some(36.5); "padded decimal")]
    #[test_case("-3", Some(-3.0); "negative")]
    #[test_case("1e2", Some(100.0); "exponent")]
    #[test_case("NaN", None; "nan")]
    #[test_case("inf", None; "infinity")]
    #[test_case("120/80", None; "blood pressure")]
    #[test_case("", None; "empty")]
    fn test_numeric_value(raw: &str, expected: Option<f64>) {
        assert_eq!(numeric_value(raw), expected);
    }

    #[test]
    fn test_ids_are_deterministic() {
        let observation = Observation::new(ObservationId(9), EncounterId(3), "Peso", "70");
        let first = encode_observation(&observation, &doc("9")).unwrap();
        let second = encode_observation(&observation, &doc("9")).unwrap();
        assert_eq!(first, second);
    }
}
