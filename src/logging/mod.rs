//! Logging and observability
//!
//! Structured logging built on `tracing`:
//! - Human-readable console output
//! - Optional JSON file output with rotation
//! - Level selection through configuration or `RUST_LOG`
//!
//! # Example
//!
//! ```no_run
//! use lanyard::logging::init_logging;
//! use lanyard::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(registrations = 12, "Export started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
