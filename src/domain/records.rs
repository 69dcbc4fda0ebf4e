//! Relational clinical records
//!
//! These are the authoritative rows owned by the relational store. The FHIR
//! server only ever holds a mirrored copy derived from them.

use super::ids::{DocumentNumber, EncounterId, ObservationId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Administrative gender as stored in the relational store
///
/// Only a binary code is stored: `"M"` is male and every other code maps to
/// female. This is a known limitation of the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Maps the stored one-letter code
    pub fn from_code(code: &str) -> Self {
        if code == "M" {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// FHIR `AdministrativeGender` code
    pub fn as_fhir(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// A registered patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    /// Prefix of the identity document type (CC, TI, RC, ...)
    pub document_type_prefix: String,

    /// Identity document number, unique per patient
    pub document_number: DocumentNumber,

    /// Given names
    pub given_names: String,

    /// Family names
    pub family_names: String,

    /// Administrative gender
    pub gender: Gender,

    /// Date of birth
    pub birth_date: Option<NaiveDate>,

    /// Contact phone
    pub phone: Option<String>,

    /// Contact email
    pub email: Option<String>,
}

impl Patient {
    /// Returns a builder for constructing a patient
    pub fn builder() -> PatientBuilder {
        PatientBuilder::default()
    }

    /// Full display name, given names first
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names, self.family_names)
    }
}

/// Builder for [`Patient`]
#[derive(Debug, Default)]
pub struct PatientBuilder {
    document_type_prefix: Option<String>,
    document_number: Option<DocumentNumber>,
    given_names: Option<String>,
    family_names: Option<String>,
    gender: Option<Gender>,
    birth_date: Option<NaiveDate>,
    phone: Option<String>,
    email: Option<String>,
}

impl PatientBuilder {
    /// Creates a new PatientBuilder
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the document type prefix
    pub fn document_type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.document_type_prefix = Some(prefix.into());
        self
    }

    /// Sets the document number
    ///
    /// # Errors
    ///
    /// Returns an error if the document number is invalid
    pub fn document_number(mut self, document: impl Into<String>) -> Result<Self, String> {
        self.document_number = Some(DocumentNumber::new(document)?);
        Ok(self)
    }

    /// Sets the given names
    pub fn given_names(mut self, names: impl Into<String>) -> Self {
        self.given_names = Some(names.into());
        self
    }

    /// Sets the family names
    pub fn family_names(mut self, names: impl Into<String>) -> Self {
        self.family_names = Some(names.into());
        self
    }

    /// Sets the gender from its stored one-letter code
    pub fn gender_code(mut self, code: &str) -> Self {
        self.gender = Some(Gender::from_code(code));
        self
    }

    /// Sets the date of birth
    pub fn birth_date(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// Sets the contact phone
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    /// Sets the contact email
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builds the patient
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing
    pub fn build(self) -> Result<Patient, String> {
        Ok(Patient {
            document_type_prefix: self
                .document_type_prefix
                .ok_or("document_type_prefix is required")?,
            document_number: self.document_number.ok_or("document_number is required")?,
            given_names: self.given_names.ok_or("given_names is required")?,
            family_names: self.family_names.ok_or("family_names is required")?,
            gender: self.gender.ok_or("gender is required")?,
            birth_date: self.birth_date,
            phone: self.phone,
            email: self.email,
        })
    }
}

/// One clinical visit
///
/// `reason` carries the packed diagnosis/treatment/notes text produced by
/// [`crate::core::codec::pack`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Encounter {
    /// Local primary key
    pub id: EncounterId,

    /// Document number of the owning patient
    pub patient_document: DocumentNumber,

    /// Local id of the attending clinician
    pub clinician_id: Option<i64>,

    /// Packed free text
    pub reason: String,

    /// Local creation timestamp
    pub recorded_at: Option<DateTime<Utc>>,
}

impl Encounter {
    /// Creates an encounter with no clinician or timestamp
    pub fn new(id: EncounterId, patient_document: DocumentNumber, reason: impl Into<String>) -> Self {
        Self {
            id,
            patient_document,
            clinician_id: None,
            reason: reason.into(),
            recorded_at: None,
        }
    }

    /// Sets the attending clinician
    pub fn with_clinician(mut self, clinician_id: i64) -> Self {
        self.clinician_id = Some(clinician_id);
        self
    }

    /// Sets the local creation timestamp
    pub fn with_recorded_at(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = Some(recorded_at);
        self
    }
}

/// One measurement taken during an encounter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Local primary key
    pub id: ObservationId,

    /// Owning encounter
    pub encounter_id: EncounterId,

    /// Human readable description, e.g. "Frecuencia Cardiaca"
    pub description: String,

    /// Stored value; may or may not be numeric
    pub value: String,

    /// Unit of measure
    pub unit: Option<String>,

    /// Clinical interpretation (Normal, Alto, ...)
    pub interpretation: Option<String>,
}

impl Observation {
    /// Creates an observation with no unit or interpretation
    pub fn new(
        id: ObservationId,
        encounter_id: EncounterId,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            id,
            encounter_id,
            description: description.into(),
            value: value.into(),
            unit: None,
            interpretation: None,
        }
    }

    /// Sets the unit of measure
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Sets the interpretation
    pub fn with_interpretation(mut self, interpretation: impl Into<String>) -> Self {
        self.interpretation = Some(interpretation.into());
        self
    }
}
