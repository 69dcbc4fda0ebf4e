//! PostgreSQL implementation of [`RecordSource`]

use super::client::PostgreSQLClient;
use super::models::{EncounterRow, ObservationRow, PatientRow};
use crate::adapters::database::traits::RecordSource;
use crate::domain::{
    ClinisyncError, DocumentNumber, Encounter, EncounterId, Observation, Patient, Result,
};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_postgres::Row;

const PATIENT_COLUMNS: &str = "SELECT td.prefijo, u.numero_documento, u.nombres, u.apellidos, \
     u.genero, u.fecha_nacimiento, u.telefono, u.email \
     FROM usuarios u \
     JOIN tipos_documento td ON td.id = u.tipo_documento_id";

const ENCOUNTERS_FOR_PATIENT: &str = "SELECT e.id, p.numero_documento, e.medico_id, \
     e.diagnostico, e.fecha \
     FROM encuentros_medicos e \
     JOIN usuarios p ON p.id = e.paciente_id \
     WHERE p.numero_documento = $1 \
     ORDER BY e.fecha ASC, e.id ASC";

const OBSERVATIONS_FOR_ENCOUNTER: &str = "SELECT id, encuentro_id, descripcion, valor, \
     unidad, interpretacion \
     FROM observaciones_clinicas \
     WHERE encuentro_id = $1 \
     ORDER BY id ASC";

/// Reads clinical records from the existing relational schema
pub struct PostgreSQLRecordSource {
    client: Arc<PostgreSQLClient>,
}

impl PostgreSQLRecordSource {
    /// Create a new source over a client
    pub fn new(client: PostgreSQLClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    /// Get a reference to the underlying client
    pub fn client(&self) -> &Arc<PostgreSQLClient> {
        &self.client
    }
}

fn row_error(table: &str, e: tokio_postgres::Error) -> ClinisyncError {
    ClinisyncError::Database(format!("Unexpected row shape in {table}: {e}"))
}

fn patients_from_rows(rows: &[Row]) -> Result<Vec<Patient>> {
    let mut patients = Vec::with_capacity(rows.len());
    for row in rows {
        let patient_row = PatientRow::from_row(row).map_err(|e| row_error("usuarios", e))?;
        let document = patient_row.document_number.clone();
        match patient_row.into_domain() {
            Ok(patient) => patients.push(patient),
            Err(e) => {
                tracing::warn!(document = %document, error = %e, "Skipping invalid patient row");
            }
        }
    }
    Ok(patients)
}

#[async_trait]
impl RecordSource for PostgreSQLRecordSource {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let query = format!("{PATIENT_COLUMNS} ORDER BY u.numero_documento");
        let rows = self.client.query(&query, &[]).await?;
        let patients = patients_from_rows(&rows)?;

        tracing::info!(
            rows = rows.len(),
            patients = patients.len(),
            "Loaded patients from PostgreSQL"
        );
        Ok(patients)
    }

    async fn find_patient(&self, document: &DocumentNumber) -> Result<Option<Patient>> {
        let query = format!("{PATIENT_COLUMNS} WHERE u.numero_documento = $1");
        let rows = self.client.query(&query, &[&document.as_str()]).await?;
        Ok(patients_from_rows(&rows)?.into_iter().next())
    }

    async fn encounters_for_patient(&self, document: &DocumentNumber) -> Result<Vec<Encounter>> {
        let rows = self
            .client
            .query(ENCOUNTERS_FOR_PATIENT, &[&document.as_str()])
            .await?;

        let mut encounters = Vec::with_capacity(rows.len());
        for row in &rows {
            let encounter_row =
                EncounterRow::from_row(row).map_err(|e| row_error("encuentros_medicos", e))?;
            let id = encounter_row.id;
            match encounter_row.into_domain() {
                Ok(encounter) => encounters.push(encounter),
                Err(e) => {
                    tracing::warn!(encounter_id = id, error = %e, "Skipping invalid encounter row");
                }
            }
        }

        tracing::debug!(
            document = %document,
            count = encounters.len(),
            "Loaded encounters"
        );
        Ok(encounters)
    }

    async fn observations_for_encounter(
        &self,
        encounter_id: EncounterId,
    ) -> Result<Vec<Observation>> {
        let id = i32::try_from(encounter_id.0).map_err(|_| {
            ClinisyncError::Validation(format!("Encounter id {encounter_id} out of range"))
        })?;
        let rows = self.client.query(OBSERVATIONS_FOR_ENCOUNTER, &[&id]).await?;

        rows.iter()
            .map(|row| {
                ObservationRow::from_row(row)
                    .map(ObservationRow::into_domain)
                    .map_err(|e| row_error("observaciones_clinicas", e))
            })
            .collect()
    }
}
