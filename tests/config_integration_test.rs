//! Integration tests for configuration loading and validation
//!
//! Tests that touch environment variables hold `ENV_MUTEX` so they do not
//! interfere with each other.

use clinisync::config::{config_from_env, load_config, Environment};
use clinisync::domain::ClinisyncError;
use secrecy::ExposeSecret;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ENV_VARS: &[&str] = &[
    "FHIR_HOST",
    "FHIR_PORT",
    "CLINISYNC_FHIR_BASE_URL",
    "CLINISYNC_FHIR_TIMEOUT_SECONDS",
    "CLINISYNC_FHIR_PASSWORD",
    "CLINISYNC_POSTGRESQL_CONNECTION_STRING",
    "CLINISYNC_SYNC_MAX_CONCURRENCY",
    "TEST_CLINIC_DB",
];

fn cleanup_env_vars() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_complete_config() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
environment = "staging"

[application]
log_level = "debug"

[fhir]
base_url = "https://hapi.hospital.example/fhir/"
timeout_seconds = 10
identifier_system_base = "http://hospital.example/id"
send_encounter_period = true
username = "sync"
password = "pw"

[postgresql]
connection_string = "postgresql://clinic:pw@db:5432/clinic"
max_connections = 4

[sync]
max_concurrency = 8
include_clinical = false

[logging]
local_enabled = true
local_path = "/tmp/clinisync"
local_rotation = "hourly"
"#,
    );

    let config = load_config(file.path()).unwrap();
    assert_eq!(config.environment, Environment::Staging);
    assert_eq!(config.application.log_level, "debug");
    assert_eq!(config.fhir.timeout_seconds, 10);
    assert!(config.fhir.send_encounter_period);
    assert_eq!(config.fhir.username.as_deref(), Some("sync"));
    let pg = config.postgresql.as_ref().unwrap();
    assert_eq!(pg.max_connections, 4);
    assert_eq!(pg.statement_timeout_seconds, 60);
    assert_eq!(config.sync.max_concurrency, 8);
    assert!(!config.sync.include_clinical);
    assert_eq!(config.logging.local_rotation, "hourly");
}

#[test]
fn test_env_substitution_in_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("TEST_CLINIC_DB", "postgresql://clinic:secret@db/clinic");

    let file = write_config(
        r#"
[postgresql]
connection_string = "${TEST_CLINIC_DB}"
"#,
    );

    let config = load_config(file.path()).unwrap();
    let pg = config.postgresql.unwrap();
    assert_eq!(
        pg.connection_string.expose_secret().as_ref(),
        "postgresql://clinic:secret@db/clinic"
    );
    cleanup_env_vars();
}

#[test]
fn test_missing_env_var_is_reported() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config("[postgresql]\nconnection_string = \"${TEST_CLINIC_DB}\"\n");

    match load_config(file.path()) {
        Err(ClinisyncError::Configuration(msg)) => assert!(msg.contains("TEST_CLINIC_DB")),
        other => panic!("expected configuration error, got {other:?}"),
    }
}

#[test]
fn test_legacy_host_port_override() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("FHIR_HOST", "hapi");
    std::env::set_var("FHIR_PORT", "9090");

    let config = config_from_env().unwrap();
    assert_eq!(config.fhir.base_url, "http://hapi:9090/fhir");

    std::env::set_var("CLINISYNC_FHIR_BASE_URL", "https://fhir.example/r4");
    let config = config_from_env().unwrap();
    assert_eq!(config.fhir.base_url, "https://fhir.example/r4");

    cleanup_env_vars();
}

#[test]
fn test_env_overrides_file_values() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();
    std::env::set_var("CLINISYNC_FHIR_TIMEOUT_SECONDS", "30");
    std::env::set_var("CLINISYNC_SYNC_MAX_CONCURRENCY", "2");
    std::env::set_var(
        "CLINISYNC_POSTGRESQL_CONNECTION_STRING",
        "postgres://clinic@localhost/clinic",
    );

    let file = write_config("[fhir]\ntimeout_seconds = 5\n");
    let config = load_config(file.path()).unwrap();

    assert_eq!(config.fhir.timeout_seconds, 30);
    assert_eq!(config.sync.max_concurrency, 2);
    assert!(config.postgresql.is_some());

    cleanup_env_vars();
}

#[test]
fn test_production_requires_tls_verification() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let file = write_config(
        r#"
environment = "production"

[fhir]
base_url = "https://hapi.hospital.example/fhir"
tls_verify = false
"#,
    );

    assert!(matches!(
        load_config(file.path()),
        Err(ClinisyncError::Configuration(_))
    ));
}

#[test]
fn test_defaults_without_file() {
    let _lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    cleanup_env_vars();

    let config = config_from_env().unwrap();
    assert_eq!(config.fhir.base_url, "http://localhost:8080/fhir");
    assert_eq!(config.fhir.timeout_seconds, 5);
    assert!(config.postgresql.is_none());
    assert!(config.sync.include_clinical);
}
