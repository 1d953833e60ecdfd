//! Configuration schema types
//!
//! This module defines the configuration structure for Lanyard.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main Lanyard configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file yields a usable
/// configuration for export and single-token output. Distribution additionally
/// needs `mail.endpoint`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LanyardConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Outbound mail service
    #[serde(default)]
    pub mail: MailConfig,

    /// Where artifacts are written
    #[serde(default)]
    pub output: OutputConfig,

    /// Token, card and page geometry
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Progress display timing
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LanyardConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.mail.validate()?;
        self.output.validate()?;
        self.layout.validate()?;
        self.progress.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Parses configuration from a TOML string without touching the environment
    pub fn from_toml_str(contents: &str) -> crate::domain::Result<Self> {
        let config: LanyardConfig = toml::from_str(contents)?;
        config
            .validate()
            .map_err(crate::domain::LanyardError::Configuration)?;
        Ok(config)
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Mail transport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// HTTP endpoint accepting send requests (empty = distribution disabled)
    #[serde(default)]
    pub endpoint: String,

    /// Bearer token sent with each request
    /// Stored securely in memory and automatically zeroized on drop
    #[serde(default)]
    pub api_key: Option<SecretString>,

    /// Subject template; `{name}` and `{code}` are substituted per recipient
    #[serde(default = "default_subject")]
    pub subject: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// TLS certificate verification
    ///
    /// **SECURITY WARNING**: only disable against a local development relay.
    #[serde(default = "default_true")]
    pub tls_verify: bool,

    /// Number of messages allowed in flight at once (1 = strictly sequential)
    #[serde(default = "default_max_concurrent_sends")]
    pub max_concurrent_sends: usize,
}

impl MailConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.endpoint.is_empty() {
            let url = url::Url::parse(&self.endpoint)
                .map_err(|e| format!("mail.endpoint is not a valid URL: {e}"))?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err("mail.endpoint must start with http:// or https://".to_string());
            }
        }

        if self.subject.trim().is_empty() {
            return Err("mail.subject cannot be empty".to_string());
        }

        if self.timeout_seconds == 0 {
            return Err("mail.timeout_seconds must be > 0".to_string());
        }

        if !(1..=16).contains(&self.max_concurrent_sends) {
            return Err(format!(
                "mail.max_concurrent_sends must be between 1 and 16, got {}",
                self.max_concurrent_sends
            ));
        }

        Ok(())
    }

    /// Whether a mail endpoint has been configured
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_key: None,
            subject: default_subject(),
            timeout_seconds: default_timeout_seconds(),
            tls_verify: true,
            max_concurrent_sends: default_max_concurrent_sends(),
        }
    }
}

/// Output location configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving exported sheets and saved tokens
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// File name prefix for saved tokens (`<prefix>_<code>.<ext>`)
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,

    /// File extension for saved tokens
    #[serde(default = "default_token_extension")]
    pub token_extension: String,

    /// Base name of exported documents
    #[serde(default = "default_document_name")]
    pub document_name: String,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.directory.trim().is_empty() {
            return Err("output.directory cannot be empty".to_string());
        }

        for (field, value) in [
            ("output.token_prefix", &self.token_prefix),
            ("output.token_extension", &self.token_extension),
            ("output.document_name", &self.document_name),
        ] {
            if value.is_empty() {
                return Err(format!("{field} cannot be empty"));
            }
            if value.contains(['/', '\\']) {
                return Err(format!("{field} cannot contain path separators"));
            }
        }

        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            token_prefix: default_token_prefix(),
            token_extension: default_token_extension(),
            document_name: default_document_name(),
        }
    }
}

const MIN_CARD_SIDE_PX: u32 = 200;
const MAX_CARD_SIDE_PX: u32 = 4000;
const MAX_CARDS_PER_SIDE: u32 = 16;
const MAX_PAGE_SIDE_PX: u64 = 8_000;

/// Token, card and page geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Pixels per QR module
    #[serde(default = "default_token_module_px")]
    pub token_module_px: u32,

    /// Card width in pixels
    #[serde(default = "default_card_width_px")]
    pub card_width_px: u32,

    /// Card height in pixels
    #[serde(default = "default_card_height_px")]
    pub card_height_px: u32,

    /// Cards per row on an export page
    #[serde(default = "default_cards_per_row")]
    pub cards_per_row: u32,

    /// Rows of cards on an export page
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: u32,
}

impl LayoutConfig {
    fn validate(&self) -> Result<(), String> {
        if !(2..=32).contains(&self.token_module_px) {
            return Err(format!(
                "layout.token_module_px must be between 2 and 32, got {}",
                self.token_module_px
            ));
        }

        for (field, value) in [
            ("layout.card_width_px", self.card_width_px),
            ("layout.card_height_px", self.card_height_px),
        ] {
            if !(MIN_CARD_SIDE_PX..=MAX_CARD_SIDE_PX).contains(&value) {
                return Err(format!(
                    "{field} must be between {MIN_CARD_SIDE_PX} and {MAX_CARD_SIDE_PX}, got {value}"
                ));
            }
        }

        for (field, value) in [
            ("layout.cards_per_row", self.cards_per_row),
            ("layout.rows_per_page", self.rows_per_page),
        ] {
            if !(1..=MAX_CARDS_PER_SIDE).contains(&value) {
                return Err(format!(
                    "{field} must be between 1 and {MAX_CARDS_PER_SIDE}, got {value}"
                ));
            }
        }

        // Pages are allocated as one RGBA buffer
        let page_width = u64::from(self.cards_per_row) * u64::from(self.card_width_px);
        let grid_height = u64::from(self.rows_per_page) * u64::from(self.card_height_px);
        if page_width > MAX_PAGE_SIDE_PX || grid_height > MAX_PAGE_SIDE_PX {
            return Err(format!(
                "layout page grid is {page_width}x{grid_height}px, each side must be <= {MAX_PAGE_SIDE_PX}px"
            ));
        }

        Ok(())
    }

    /// Number of cards that fit on one export page
    pub fn cards_per_page(&self) -> usize {
        self.cards_per_row as usize * self.rows_per_page as usize
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            token_module_px: default_token_module_px(),
            card_width_px: default_card_width_px(),
            card_height_px: default_card_height_px(),
            cards_per_row: default_cards_per_row(),
            rows_per_page: default_rows_per_page(),
        }
    }
}

/// Progress display timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressConfig {
    /// How long a completion message stays visible, in milliseconds
    #[serde(default = "default_success_reset_ms")]
    pub success_reset_ms: u64,

    /// How long a failure message stays visible, in milliseconds
    #[serde(default = "default_failure_reset_ms")]
    pub failure_reset_ms: u64,
}

impl ProgressConfig {
    fn validate(&self) -> Result<(), String> {
        if self.success_reset_ms > 60_000 || self.failure_reset_ms > 60_000 {
            return Err("progress reset delays must be <= 60000 ms".to_string());
        }
        Ok(())
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            success_reset_ms: default_success_reset_ms(),
            failure_reset_ms: default_failure_reset_ms(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when file logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_subject() -> String {
    "Your camp registration QR code".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_max_concurrent_sends() -> usize {
    1
}

fn default_output_directory() -> String {
    "lanyard-output".to_string()
}

fn default_token_prefix() -> String {
    "qr".to_string()
}

fn default_token_extension() -> String {
    "png".to_string()
}

fn default_document_name() -> String {
    "registration-cards".to_string()
}

fn default_token_module_px() -> u32 {
    8
}

fn default_card_width_px() -> u32 {
    560
}

fn default_card_height_px() -> u32 {
    760
}

fn default_cards_per_row() -> u32 {
    2
}

fn default_rows_per_page() -> u32 {
    2
}

fn default_success_reset_ms() -> u64 {
    2000
}

fn default_failure_reset_ms() -> u64 {
    3000
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
