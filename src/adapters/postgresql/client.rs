//! PostgreSQL client implementation
//!
//! Pooled read-only access to the clinical tables.

use crate::config::PostgreSQLConfig;
use crate::domain::{ClinisyncError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{NoTls, Row};

/// PostgreSQL client for Clinisync
///
/// Connections are created lazily by the pool; constructing a client does
/// not touch the network.
pub struct PostgreSQLClient {
    /// Connection pool
    pool: Pool,

    /// Configuration
    config: PostgreSQLConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed or the pool
    /// cannot be built.
    pub async fn new(config: PostgreSQLConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                ClinisyncError::Configuration(format!("Invalid PostgreSQL connection string: {e}"))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Duration::from_secs(config.connection_timeout_seconds);
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(timeout))
            .create_timeout(Some(timeout))
            .recycle_timeout(Some(timeout))
            .runtime(deadpool_postgres::Runtime::Tokio1)
            .build()
            .map_err(|e| ClinisyncError::Database(format!("Failed to create connection pool: {e}")))?;

        tracing::debug!(
            target_db = %config.connection_string.expose_secret().redacted_host(),
            max_connections = config.max_connections,
            "PostgreSQL pool created"
        );

        Ok(Self { pool, config })
    }

    /// Test the connection to PostgreSQL
    ///
    /// # Errors
    ///
    /// Returns an error if no connection can be obtained or `SELECT 1` fails.
    pub async fn test_connection(&self) -> Result<()> {
        self.query("SELECT 1", &[]).await?;
        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| ClinisyncError::Database(format!("Failed to get connection from pool: {e}")))
    }

    /// Execute a query under the configured statement timeout and return rows
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn query(&self, query: &str, params: &[&(dyn ToSql + Sync)]) -> Result<Vec<Row>> {
        let client = self.get_connection().await?;

        let timeout_query = format!(
            "SET statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        );
        client
            .batch_execute(&timeout_query)
            .await
            .map_err(|e| ClinisyncError::Database(format!("Failed to set statement timeout: {e}")))?;

        client
            .query(query, params)
            .await
            .map_err(|e| ClinisyncError::Database(format!("Query failed: {e}")))
    }

    /// Connection target with credentials redacted
    pub fn connection_string_safe(&self) -> String {
        format!(
            "postgresql://{}",
            self.config.connection_string.expose_secret().redacted_host()
        )
    }

    /// Get the pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}
