//! Resource mappers
//!
//! - [`encode`] - relational records to FHIR documents (write path)
//! - [`decode`] - FHIR bundle entries to read models (read path)

pub mod decode;
pub mod encode;

pub use decode::{decode_encounter, decode_observation, DecodedEncounter, DecodedObservation};
pub use encode::{
    encode_encounter, encode_observation, encode_patient, numeric_value, MapperSettings,
};
