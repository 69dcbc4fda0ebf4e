//! Identifier types and the local-to-FHIR id derivation
//!
//! Every FHIR resource id is a pure function of a local relational key:
//!
//! | Local key          | FHIR id           |
//! |--------------------|-------------------|
//! | document number    | `pac-{document}`  |
//! | encounter id       | `enc-{id}`        |
//! | observation id     | `obs-{id}`        |
//!
//! Re-running a sync therefore overwrites the same resource instead of
//! creating a duplicate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Patient document number newtype wrapper
///
/// The document number is the patient's unique identity in the relational
/// store and the seed of the FHIR Patient id.
///
/// # Examples
///
/// ```
/// use clinisync::domain::ids::DocumentNumber;
///
/// let doc = DocumentNumber::new("1020304050").unwrap();
/// assert_eq!(doc.as_str(), "1020304050");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentNumber(String);

/// FHIR logical ids are at most 64 characters
pub const MAX_FHIR_ID_LEN: usize = 64;

/// Longest document number whose `pac-` id still fits in a FHIR id
pub const MAX_DOCUMENT_LEN: usize = MAX_FHIR_ID_LEN - "pac-".len();

impl DocumentNumber {
    /// Creates a new DocumentNumber
    ///
    /// Returns `Err` if the value is blank, longer than
    /// [`MAX_DOCUMENT_LEN`], or contains characters that are not allowed in
    /// a FHIR logical id (`[A-Za-z0-9\-\.]`).
    pub fn new(value: impl Into<String>) -> Result<Self, String> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err("Document number cannot be empty".to_string());
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        {
            return Err(format!(
                "Document number '{value}' contains characters not allowed in a FHIR id"
            ));
        }
        if value.len() > MAX_DOCUMENT_LEN {
            return Err(format!(
                "Document number is {} characters; at most {MAX_DOCUMENT_LEN} fit in a FHIR id",
                value.len()
            ));
        }
        Ok(Self(value))
    }

    /// Returns the document number as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Local encounter primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EncounterId(pub i64);

impl fmt::Display for EncounterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local observation primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObservationId(pub i64);

impl fmt::Display for ObservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// FHIR resource types mirrored by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceType {
    Patient,
    Encounter,
    Observation,
}

impl ResourceType {
    /// Name used in the REST path and in `resourceType`
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Patient => "Patient",
            ResourceType::Encounter => "Encounter",
            ResourceType::Observation => "Observation",
        }
    }

    /// Prefix prepended to the local key to build the FHIR id
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ResourceType::Patient => "pac-",
            ResourceType::Encounter => "enc-",
            ResourceType::Observation => "obs-",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deterministic FHIR logical id of a mirrored resource
///
/// # Examples
///
/// ```
/// use clinisync::domain::ids::{DocumentNumber, EncounterId, ResourceId};
///
/// let doc = DocumentNumber::new("123").unwrap();
/// assert_eq!(ResourceId::patient(&doc).as_str(), "pac-123");
/// assert_eq!(ResourceId::encounter(EncounterId(7)).reference(), "Encounter/enc-7");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId {
    resource_type: ResourceType,
    id: String,
}

impl ResourceId {
    /// FHIR id of the Patient mirroring this document number
    pub fn patient(document: &DocumentNumber) -> Self {
        Self::derive(ResourceType::Patient, document.as_str())
    }

    /// FHIR id of the Encounter mirroring this local encounter
    pub fn encounter(id: EncounterId) -> Self {
        Self::derive(ResourceType::Encounter, &id.to_string())
    }

    /// FHIR id of the Observation mirroring this local observation
    pub fn observation(id: ObservationId) -> Self {
        Self::derive(ResourceType::Observation, &id.to_string())
    }

    fn derive(resource_type: ResourceType, local_key: &str) -> Self {
        Self {
            resource_type,
            id: format!("{}{}", resource_type.id_prefix(), local_key),
        }
    }

    /// The logical id, e.g. `enc-42`
    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// The resource type this id belongs to
    pub fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Relative reference, e.g. `Encounter/enc-42`
    pub fn reference(&self) -> String {
        format!("{}/{}", self.resource_type.as_str(), self.id)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}
