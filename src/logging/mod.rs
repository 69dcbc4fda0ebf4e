//! Logging and observability
//!
//! Structured logging with:
//! - Human-readable console output
//! - Optional JSON rolling-file output
//! - Helper macros for the sync and gateway events that every component emits
//!
//! # Example
//!
//! ```no_run
//! use clinisync::logging::init_logging;
//! use clinisync::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(document = "1020304050", "Building timeline");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the outcome of one resource upsert
///
/// # Example
///
/// ```no_run
/// use clinisync::log_sync_result;
///
/// log_sync_result!("Patient", "pac-123", true);
/// ```
#[macro_export]
macro_rules! log_sync_result {
    ($resource_type:expr, $id:expr, $ok:expr) => {
        if $ok {
            tracing::info!(
                resource_type = %$resource_type,
                id = %$id,
                "Resource synchronized"
            );
        } else {
            tracing::warn!(
                resource_type = %$resource_type,
                id = %$id,
                "Resource not synchronized; local record kept"
            );
        }
    };
}

/// Log a failed call against the FHIR server
///
/// # Example
///
/// ```no_run
/// use clinisync::log_gateway_failure;
/// use clinisync::domain::GatewayError;
///
/// let err = GatewayError::Transport("connection refused".to_string());
/// log_gateway_failure!("PUT", "http://localhost:8080/fhir/Patient/pac-1", &err);
/// ```
#[macro_export]
macro_rules! log_gateway_failure {
    ($method:expr, $url:expr, $error:expr) => {
        tracing::error!(
            method = $method,
            url = %$url,
            failure = $error.kind(),
            status = ?$error.status(),
            error = %$error,
            "FHIR request failed"
        );
    };
}
