//! Configuration management for Lanyard.
//!
//! Lanyard reads a TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LANYARD_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use lanyard::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("lanyard.toml")?;
//!
//! println!("Mail endpoint: {}", config.mail.endpoint);
//! println!("Output directory: {}", config.output.directory);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level
//! - [`MailConfig`] - mail endpoint, API key, subject, concurrency
//! - [`OutputConfig`] - output directory and file naming
//! - [`LayoutConfig`] - token, card and page geometry
//! - [`ProgressConfig`] - how long completion/failure messages stay visible
//! - [`LoggingConfig`] - file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [mail]
//! endpoint = "https://project.functions.example.com/send-qr-email"
//! api_key = "${LANYARD_MAIL_API_KEY}"
//! subject = "Your QR code for {name}"
//!
//! [output]
//! directory = "cards"
//! token_prefix = "qr"
//!
//! [layout]
//! cards_per_row = 2
//! rows_per_page = 3
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::{load_config, load_config_or_default};
pub use schema::{
    ApplicationConfig, LanyardConfig, LayoutConfig, LoggingConfig, MailConfig, OutputConfig,
    ProgressConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
