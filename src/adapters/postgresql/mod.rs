//! PostgreSQL relational store integration
//!
//! Reads patients, encounters and observations from the clinical tables
//! (`usuarios`, `tipos_documento`, `encuentros_medicos`,
//! `observaciones_clinicas`).

pub mod client;
pub mod models;
pub mod source;

pub use client::PostgreSQLClient;
pub use source::PostgreSQLRecordSource;
