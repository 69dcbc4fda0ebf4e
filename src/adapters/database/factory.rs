//! Record source factory
//!
//! Builds the configured relational source.

use crate::adapters::database::traits::RecordSource;
use crate::adapters::postgresql::{PostgreSQLClient, PostgreSQLRecordSource};
use crate::config::ClinisyncConfig;
use crate::domain::{ClinisyncError, Result};
use std::sync::Arc;

/// Create the record source described by `config.postgresql`
///
/// # Errors
///
/// Returns a configuration error if the `[postgresql]` section is missing,
/// or a database error if the pool cannot be created.
pub async fn create_record_source(config: &ClinisyncConfig) -> Result<Arc<dyn RecordSource>> {
    let pg_config = config.postgresql.as_ref().ok_or_else(|| {
        ClinisyncError::Configuration(
            "A [postgresql] section (or CLINISYNC_POSTGRESQL_CONNECTION_STRING) is required"
                .to_string(),
        )
    })?;

    tracing::info!("Creating PostgreSQL record source");
    let client = PostgreSQLClient::new(pg_config.clone()).await?;
    Ok(Arc::new(PostgreSQLRecordSource::new(client)))
}
