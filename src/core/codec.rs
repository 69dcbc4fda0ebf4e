//! Packed clinical text
//!
//! Diagnosis, treatment and general notes travel in a single FHIR string
//! (`Encounter.reasonCode[0].coding[0].display`) using the layout
//!
//! ```text
//! {diagnosis} | Tx: {treatment}[ | Obs: {notes}]
//! ```
//!
//! Inputs that themselves contain `" | "`, `"Tx: "` or `"Obs: "` do not
//! round-trip. The format is shared with existing server data, so the
//! collision is accepted rather than escaped.

use serde::{Deserialize, Serialize};

/// Segment separator
pub const DELIMITER: &str = " | ";

/// Prefix of the treatment segment
pub const TREATMENT_PREFIX: &str = "Tx: ";

/// Prefix of the notes segment
pub const NOTES_PREFIX: &str = "Obs: ";

/// Treatment reported when the packed text carries none
pub const UNSPECIFIED_TREATMENT: &str = "No especificado";

/// The three fields carried by a packed string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedNote {
    pub diagnosis: String,
    pub treatment: String,
    pub notes: String,
}

/// Pack diagnosis, treatment and optional notes
///
/// The notes segment is emitted only when `notes` is non-empty.
///
/// # Examples
///
/// ```
/// use clinisync::core::codec::pack;
///
/// assert_eq!(pack("Gripe", "Reposo", Some("Fiebre")), "Gripe | Tx: Reposo | Obs: Fiebre");
/// assert_eq!(pack("Gripe", "Reposo", None), "Gripe | Tx: Reposo");
/// ```
pub fn pack(diagnosis: &str, treatment: &str, notes: Option<&str>) -> String {
    let mut packed = format!("{diagnosis}{DELIMITER}{TREATMENT_PREFIX}{treatment}");
    if let Some(notes) = notes.filter(|n| !n.is_empty()) {
        packed.push_str(DELIMITER);
        packed.push_str(NOTES_PREFIX);
        packed.push_str(notes);
    }
    packed
}

/// Split a packed string back into its fields
///
/// Never fails. Text without a delimiter is all diagnosis. Unknown segments
/// are dropped; when a prefix repeats, the last segment wins.
///
/// # Examples
///
/// ```
/// use clinisync::core::codec::unpack;
///
/// let note = unpack("Gripe | Tx: Reposo");
/// assert_eq!(note.diagnosis, "Gripe");
/// assert_eq!(note.treatment, "Reposo");
/// assert_eq!(note.notes, "");
///
/// let legacy = unpack("Control anual");
/// assert_eq!(legacy.treatment, "No especificado");
/// ```
pub fn unpack(packed: &str) -> PackedNote {
    let mut segments = packed.split(DELIMITER);
    let diagnosis = segments.next().unwrap_or_default().to_string();

    let mut note = PackedNote {
        diagnosis,
        treatment: UNSPECIFIED_TREATMENT.to_string(),
        notes: String::new(),
    };

    for segment in segments {
        if let Some(treatment) = segment.strip_prefix(TREATMENT_PREFIX) {
            note.treatment = treatment.to_string();
        } else if let Some(notes) = segment.strip_prefix(NOTES_PREFIX) {
            note.notes = notes.to_string();
        }
    }

    note
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Gripe", "Reposo", Some("Fiebre alta"), "Gripe | Tx: Reposo | Obs: Fiebre alta"; "with notes")]
    #[test_case("Gripe", "Reposo", None, "Gripe | Tx: Reposo"; "without notes")]
    #[test_case("Gripe", "Reposo", Some(""), "Gripe | Tx: Reposo"; "empty notes omitted")]
    #[test_case("", "", None, " | Tx: "; "all empty")]
    fn test_pack(diagnosis: &str, treatment: &str, notes: Option<&str>, expected: &str) {
        assert_eq!(pack(diagnosis, treatment, notes), expected);
    }

    #[test_case("Gripe | Tx: Reposo | Obs: Fiebre", "Gripe", "Reposo", "Fiebre"; "full")]
    #[test_case("Gripe | Tx: Reposo", "Gripe", "Reposo", ""; "no notes")]
    #[test_case("Gripe", "Gripe", "No especificado", ""; "legacy free text")]
    #[test_case("Gripe | Obs: Fiebre", "Gripe", "No especificado", "Fiebre"; "notes without treatment")]
    #[test_case("Gripe | basura | Tx: Reposo", "Gripe", "Reposo", ""; "unknown segment dropped")]
    #[test_case("Gripe | Tx: A | Tx: B", "Gripe", "B", ""; "last treatment wins")]
    #[test_case("", "", "No especificado", ""; "empty input")]
    fn test_unpack(packed: &str, diagnosis: &str, treatment: &str, notes: &str) {
        let note = unpack(packed);
        assert_eq!(note.diagnosis, diagnosis);
        assert_eq!(note.treatment, treatment);
        assert_eq!(note.notes, notes);
    }

    #[test]
    fn test_round_trip_clean_inputs() {
        let note = unpack(&pack("Hipertensión", "Losartán 50mg", Some("Control en 1 mes")));
        assert_eq!(
            note,
            PackedNote {
                diagnosis: "Hipertensión".to_string(),
                treatment: "Losartán 50mg".to_string(),
                notes: "Control en 1 mes".to_string(),
            }
        );
    }

    #[test]
    fn test_delimiter_in_diagnosis_collides() {
        let note = unpack(&pack("A | B", "Reposo", None));
        assert_eq!(note.diagnosis, "A");
        assert_eq!(note.treatment, "Reposo");
    }
}
