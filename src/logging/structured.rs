//! Structured logging setup using tracing
//!
//! Human-readable events go to stderr so command output on stdout (a token
//! data URI, a summary) can be piped. With file logging enabled the same
//! events are also appended as JSON lines to a rolling `lanyard.log`.

use crate::config::LoggingConfig;
use crate::domain::{LanyardError, Result};
use std::path::Path;
use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const LOG_FILE_NAME: &str = "lanyard.log";

/// HTTP client internals only surface at warn unless `RUST_LOG` says otherwise
const QUIET_DEPENDENCIES: [&str; 3] = ["hyper=warn", "reqwest=warn", "rustls=warn"];

/// Keeps the file writer's background thread alive; drop it last
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initialize the global subscriber
///
/// `RUST_LOG` takes precedence over `log_level` when set.
///
/// # Errors
///
/// Returns `Configuration` for an unknown level or an unusable log directory.
pub fn init_logging(log_level: &str, config: &LoggingConfig) -> Result<LoggingGuard> {
    let level = parse_log_level(log_level)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(level));

    let console: BoxedLayer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter.clone())
        .boxed();
    let mut layers = vec![console];

    let file_guard = if config.local_enabled {
        let (layer, guard) = json_file_layer(config, filter)?;
        layers.push(layer);
        Some(guard)
    } else {
        None
    };

    tracing_subscriber::registry().with(layers).init();

    tracing::debug!(
        level = %level,
        file_logging = config.local_enabled,
        "Logging initialized"
    );

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

type BoxedLayer = Box<dyn Layer<tracing_subscriber::Registry> + Send + Sync>;

fn json_file_layer(config: &LoggingConfig, filter: EnvFilter) -> Result<(BoxedLayer, WorkerGuard)> {
    let dir = Path::new(&config.local_path);
    std::fs::create_dir_all(dir).map_err(|e| {
        LanyardError::Configuration(format!(
            "Failed to create log directory {}: {}",
            dir.display(),
            e
        ))
    })?;

    let appender = RollingFileAppender::new(parse_rotation(&config.local_rotation), dir, LOG_FILE_NAME);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_writer(writer)
        .with_filter(filter)
        .boxed();

    Ok((layer, guard))
}

fn default_filter(level: Level) -> EnvFilter {
    let mut directives = vec![format!("lanyard={level}")];
    directives.extend(QUIET_DEPENDENCIES.iter().map(|d| d.to_string()));
    EnvFilter::new(directives.join(","))
}

fn parse_rotation(rotation: &str) -> Rotation {
    match rotation {
        "hourly" => Rotation::HOURLY,
        "never" => Rotation::NEVER,
        _ => Rotation::DAILY,
    }
}

fn parse_log_level(level: &str) -> Result<Level> {
    level.trim().parse::<Level>().map_err(|_| {
        LanyardError::Configuration(format!(
            "Invalid log level: {level}. Must be one of: trace, debug, info, warn, error"
        ))
    })
}
