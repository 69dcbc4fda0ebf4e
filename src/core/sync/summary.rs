//! Sync outcome and summary types

use crate::domain::{EncounterId, ObservationId};
use std::time::Duration;

/// Result of mirroring one clinical registration
///
/// The encounter is always attempted first; every observation is attempted
/// afterwards whether or not the encounter was accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutcome {
    /// Encounter that was mirrored
    pub encounter_id: EncounterId,

    /// Whether the server accepted the encounter
    pub encounter_synced: bool,

    /// Per-observation result, in submission order
    pub observations: Vec<(ObservationId, bool)>,
}

impl RegistrationOutcome {
    /// Every resource of the registration was accepted
    pub fn is_fully_synced(&self) -> bool {
        self.encounter_synced && self.observations.iter().all(|(_, ok)| *ok)
    }

    /// Number of observations the server accepted
    pub fn observations_synced(&self) -> usize {
        self.observations.iter().filter(|(_, ok)| *ok).count()
    }

    /// Number of observations the server rejected
    pub fn observations_failed(&self) -> usize {
        self.observations.len() - self.observations_synced()
    }
}

/// Attempted / synced / failed counters for one resource type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceCounts {
    pub attempted: usize,
    pub synced: usize,
    pub failed: usize,
}

impl ResourceCounts {
    /// Count one attempt
    pub fn record(&mut self, ok: bool) {
        self.attempted += 1;
        if ok {
            self.synced += 1;
        } else {
            self.failed += 1;
        }
    }

    /// Add another set of counters
    pub fn merge(&mut self, other: &ResourceCounts) {
        self.attempted += other.attempted;
        self.synced += other.synced;
        self.failed += other.failed;
    }
}

/// Summary of a bulk synchronization run
#[derive(Debug, Clone, Default)]
pub struct SyncSummary {
    /// Patient upserts
    pub patients: ResourceCounts,

    /// Encounter upserts
    pub encounters: ResourceCounts,

    /// Observation upserts
    pub observations: ResourceCounts,

    /// Errors reading from the relational store
    pub errors: Vec<String>,

    /// Duration of the run
    pub duration: Duration,
}

impl SyncSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Count a registration outcome
    pub fn record_registration(&mut self, outcome: &RegistrationOutcome) {
        self.encounters.record(outcome.encounter_synced);
        for (_, ok) in &outcome.observations {
            self.observations.record(*ok);
        }
    }

    /// Fold another summary into this one
    pub fn merge(&mut self, other: SyncSummary) {
        self.patients.merge(&other.patients);
        self.encounters.merge(&other.encounters);
        self.observations.merge(&other.observations);
        self.errors.extend(other.errors);
    }

    /// Total upserts attempted across resource types
    pub fn total_attempted(&self) -> usize {
        self.patients.attempted + self.encounters.attempted + self.observations.attempted
    }

    /// Total upserts rejected across resource types
    pub fn total_failed(&self) -> usize {
        self.patients.failed + self.encounters.failed + self.observations.failed
    }

    /// No rejected upserts and no read errors
    pub fn is_successful(&self) -> bool {
        self.total_failed() == 0 && self.errors.is_empty()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            patients_synced = self.patients.synced,
            patients_failed = self.patients.failed,
            encounters_synced = self.encounters.synced,
            encounters_failed = self.encounters.failed,
            observations_synced = self.observations.synced,
            observations_failed = self.observations.failed,
            duration_ms = self.duration.as_millis() as u64,
            "Sync completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Sync completed with errors");
            for error in &self.errors {
                tracing::warn!(message = %error, "Sync error");
            }
        }
    }
}
