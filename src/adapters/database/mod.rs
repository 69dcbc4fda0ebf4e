//! Relational store abstraction
//!
//! This module provides a trait-based abstraction over the authoritative
//! relational records, so the sync service can run against PostgreSQL or an
//! in-memory source in tests.

pub mod factory;
pub mod traits;

pub use factory::create_record_source;
pub use traits::RecordSource;
