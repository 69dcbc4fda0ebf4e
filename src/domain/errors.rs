//! Domain error types
//!
//! This module defines the error hierarchy for Clinisync. Errors are
//! domain-specific and don't expose third-party types.

use thiserror::Error;

/// Main Clinisync error type
///
/// This is the primary error type used throughout the application.
/// It wraps specific error types and provides context for error handling.
#[derive(Debug, Error)]
pub enum ClinisyncError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// FHIR server errors
    #[error("FHIR error: {0}")]
    Fhir(#[from] GatewayError),

    /// Relational store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Typed failure reason for a call against the FHIR server
///
/// The legacy surface of the gateway collapses all of these into `false`
/// or an empty result. The explicit surface returns them so callers can
/// tell "no data" apart from "unreachable".
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (timeout, refused, DNS, TLS)
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The server answered with a status other than the accepted ones
    #[error("Unexpected status {status}: {body}")]
    BadStatus { status: u16, body: String },

    /// The response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Short machine-friendly label, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Transport(_) => "transport_error",
            GatewayError::BadStatus { .. } => "bad_status",
            GatewayError::Decode(_) => "decode_error",
        }
    }

    /// HTTP status if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::BadStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ClinisyncError {
    fn from(err: std::io::Error) -> Self {
        ClinisyncError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ClinisyncError {
    fn from(err: serde_json::Error) -> Self {
        ClinisyncError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ClinisyncError {
    fn from(err: toml::de::Error) -> Self {
        ClinisyncError::Configuration(format!("TOML parse error: {err}"))
    }
}
