//! Row models for the clinical tables
//!
//! Each struct mirrors the columns selected by [`super::source`] and converts
//! into the matching domain record. Conversion fails only when a value cannot
//! become a valid FHIR id.

use crate::domain::{
    DocumentNumber, Encounter, EncounterId, Observation, ObservationId, Patient,
};
use chrono::{DateTime, NaiveDate, Utc};
use tokio_postgres::Row;

/// `usuarios` joined with `tipos_documento`
#[derive(Debug, Clone)]
pub struct PatientRow {
    pub document_type_prefix: String,
    pub document_number: String,
    pub given_names: String,
    pub family_names: String,
    pub gender: String,
    pub birth_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl PatientRow {
    /// Read the row produced by the patient queries
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            document_type_prefix: row.try_get("prefijo")?,
            document_number: row.try_get("numero_documento")?,
            given_names: row.try_get("nombres")?,
            family_names: row.try_get("apellidos")?,
            gender: row.try_get("genero")?,
            birth_date: row.try_get("fecha_nacimiento")?,
            phone: row.try_get("telefono")?,
            email: row.try_get("email")?,
        })
    }

    /// Convert into a domain patient
    pub fn into_domain(self) -> Result<Patient, String> {
        let mut builder = Patient::builder()
            .document_type_prefix(self.document_type_prefix)
            .document_number(self.document_number)?
            .given_names(self.given_names)
            .family_names(self.family_names)
            .gender_code(&self.gender);

        if let Some(birth_date) = self.birth_date {
            builder = builder.birth_date(birth_date);
        }
        if let Some(phone) = self.phone.filter(|p| !p.trim().is_empty()) {
            builder = builder.phone(phone);
        }
        if let Some(email) = self.email.filter(|e| !e.trim().is_empty()) {
            builder = builder.email(email);
        }

        builder.build()
    }
}

/// `encuentros_medicos` joined with the patient's document number
#[derive(Debug, Clone)]
pub struct EncounterRow {
    pub id: i32,
    pub patient_document: String,
    pub clinician_id: Option<i32>,
    pub reason: String,
    pub recorded_at: Option<DateTime<Utc>>,
}

impl EncounterRow {
    /// Read the row produced by the encounter query
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            patient_document: row.try_get("numero_documento")?,
            clinician_id: row.try_get("medico_id")?,
            reason: row.try_get("diagnostico")?,
            recorded_at: row.try_get("fecha")?,
        })
    }

    /// Convert into a domain encounter
    pub fn into_domain(self) -> Result<Encounter, String> {
        let document = DocumentNumber::new(self.patient_document)?;
        let mut encounter = Encounter::new(EncounterId(i64::from(self.id)), document, self.reason);
        if let Some(clinician_id) = self.clinician_id {
            encounter = encounter.with_clinician(i64::from(clinician_id));
        }
        if let Some(recorded_at) = self.recorded_at {
            encounter = encounter.with_recorded_at(recorded_at);
        }
        Ok(encounter)
    }
}

/// `observaciones_clinicas`
#[derive(Debug, Clone)]
pub struct ObservationRow {
    pub id: i32,
    pub encounter_id: i32,
    pub description: String,
    pub value: String,
    pub unit: Option<String>,
    pub interpretation: Option<String>,
}

impl ObservationRow {
    /// Read the row produced by the observation query
    pub fn from_row(row: &Row) -> Result<Self, tokio_postgres::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            encounter_id: row.try_get("encuentro_id")?,
            description: row.try_get("descripcion")?,
            value: row.try_get("valor")?,
            unit: row.try_get("unidad")?,
            interpretation: row.try_get("interpretacion")?,
        })
    }

    /// Convert into a domain observation
    pub fn into_domain(self) -> Observation {
        let mut observation = Observation::new(
            ObservationId(i64::from(self.id)),
            EncounterId(i64::from(self.encounter_id)),
            self.description,
            self.value,
        );
        if let Some(unit) = self.unit {
            observation = observation.with_unit(unit);
        }
        if let Some(interpretation) = self.interpretation {
            observation = observation.with_interpretation(interpretation);
        }
        observation
    }
}
