//! Display-ready read models produced from the FHIR mirror

use serde::{Deserialize, Serialize};

/// One reconciled encounter with its observations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitSummary {
    /// Calendar day of the visit (`YYYY-MM-DD`), or `N/A`
    pub date: String,

    /// Diagnosis segment of the packed text
    pub diagnosis: String,

    /// Treatment segment of the packed text
    pub treatment: String,

    /// General notes segment of the packed text
    pub notes: String,

    /// Observations formatted as `"{description}: {value} {unit}"`
    pub observations: Vec<String>,
}

/// One row of the flat observation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationHistoryEntry {
    /// Calendar day from the server's last-modified metadata
    pub date: String,

    /// What was measured
    pub kind: String,

    /// Measured value rendered as text
    pub value: String,

    /// Unit of measure, empty when absent
    pub unit: String,
}
