// Clinisync - SQL to FHIR Clinical Record Sync
// Copyright (c) 2025 Clinisync Contributors
// Licensed under the MIT License

//! # Clinisync - SQL to FHIR Clinical Record Sync
//!
//! Clinisync mirrors a clinic's relational records (patients, encounters and
//! observations) onto a FHIR R4 server and reads them back as a
//! reverse-chronological visit timeline.
//!
//! ## Overview
//!
//! - **Mapping** relational rows to Patient, Encounter and Observation
//!   documents with deterministic ids (`pac-`, `enc-`, `obs-`)
//! - **Packing** diagnosis, treatment and notes into the single encounter
//!   reason text, and unpacking them on the way back
//! - **Writing** documents with idempotent PUTs through a gateway that never
//!   raises on transport failure
//! - **Reconciling** encounters and observations into visits, newest first
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Codec, mappers, sync service, timeline and history
//! - [`adapters`] - FHIR server gateway and PostgreSQL record source
//! - [`domain`] - Identifiers, records, read models and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clinisync::config::load_config;
//! use clinisync::core::sync::SyncService;
//! use clinisync::domain::PatientBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("clinisync.toml")?;
//! let service = SyncService::from_config(&config)?;
//!
//! let patient = PatientBuilder::new()
//!     .document_type_prefix("CC")
//!     .document_number("3003")?
//!     .given_names("Ana")
//!     .family_names("Pérez")
//!     .gender_code("F")
//!     .build()?;
//!
//! if !service.sync_patient(&patient).await {
//!     eprintln!("FHIR server rejected the patient; the local record is unchanged");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Fallible operations return [`domain::Result`] with a
//! [`domain::ClinisyncError`]. Remote store failures are reported as `false`
//! or an empty list on the legacy gateway surface, and as a typed
//! [`domain::GatewayError`] on the explicit one.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
