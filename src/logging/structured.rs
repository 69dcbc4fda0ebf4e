//! Subscriber setup for the `clinisync` binary
//!
//! Events from this crate are shown at the requested level; dependencies
//! (reqwest, tokio-postgres, hyper) only surface warnings. Console output is
//! always on and a JSON rolling-file layer follows `logging.local_enabled`.

use crate::config::LoggingConfig;
use crate::domain::{ClinisyncError, Result};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::Registry;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Name of the rolling log file inside `logging.local_path`
pub const LOG_FILE_NAME: &str = "clinisync.log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Keeps the non-blocking file writer alive
///
/// Dropping it flushes buffered file output, so hold it until exit.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Install the global subscriber
///
/// `RUST_LOG`, when set, replaces the default filter entirely.
///
/// # Errors
///
/// Returns a configuration error if the level is unknown, the log directory
/// cannot be created, or a global subscriber is already installed.
///
/// # Example
///
/// ```no_run
/// use clinisync::logging::init_logging;
/// use clinisync::config::LoggingConfig;
///
/// let _guard = init_logging("debug", &LoggingConfig::default()).expect("logger");
/// ```
pub fn init_logging(log_level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level)?;

    let mut layers: Vec<BoxedLayer> = vec![tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_filter(event_filter(level))
        .boxed()];

    let file_guard = if config.local_enabled {
        let (layer, guard) = json_file_layer(config, level)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(layers)
        .try_init()
        .map_err(|e| ClinisyncError::Configuration(format!("Failed to install logger: {e}")))?;

    tracing::debug!(
        level = %level,
        local_enabled = config.local_enabled,
        local_path = %config.local_path,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

fn event_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,clinisync={level}")))
}

fn json_file_layer(config: &LoggingConfig, level: Level) -> Result<(BoxedLayer, WorkerGuard)> {
    std::fs::create_dir_all(&config.local_path).map_err(|e| {
        ClinisyncError::Configuration(format!(
            "Failed to create log directory {}: {e}",
            config.local_path
        ))
    })?;

    let rotation = match config.local_rotation.as_str() {
        "hourly" => Rotation::HOURLY,
        _ => Rotation::DAILY,
    };
    let appender = RollingFileAppender::new(rotation, &config.local_path, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(false)
        .with_writer(writer)
        .with_filter(event_filter(level))
        .boxed();

    Ok((layer, guard))
}

/// `trace`, `debug`, `info`, `warn` or `error`, in any case
fn parse_log_level(raw: &str) -> Result<Level> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(invalid_level(raw));
    }
    Level::from_str(trimmed).map_err(|_| invalid_level(raw))
}

fn invalid_level(raw: &str) -> ClinisyncError {
    ClinisyncError::Configuration(format!(
        "Invalid log level '{raw}'; expected trace, debug, info, warn or error"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("trace", Level::TRACE)]
    #[test_case("Debug", Level::DEBUG)]
    #[test_case(" info ", Level::INFO)]
    #[test_case("WARN", Level::WARN)]
    #[test_case("error", Level::ERROR)]
    fn test_parse_log_level(raw: &str, expected: Level) {
        assert_eq!(parse_log_level(raw).unwrap(), expected);
    }

    #[test_case(""; "empty")]
    #[test_case("verbose"; "unknown word")]
    #[test_case("3"; "numeric")]
    fn test_parse_log_level_rejects(raw: &str) {
        assert!(matches!(
            parse_log_level(raw),
            Err(ClinisyncError::Configuration(_))
        ));
    }

    #[test]
    fn test_init_logging_rejects_bad_level() {
        assert!(init_logging("loud", &LoggingConfig::default()).is_err());
    }
}
