//! Domain error types
//!
//! This module defines the error hierarchy for Lanyard. Pipeline errors map
//! one-to-one onto the failure kinds a caller can observe; third-party error
//! types are flattened into messages so they never leak through the API.

use thiserror::Error;

/// Main Lanyard error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum LanyardError {
    /// No registrations were selected
    #[error("No registrations selected")]
    EmptySelection,

    /// Every selected registration lacks a usable email address
    #[error("None of the selected registrations has an email address")]
    NoDeliverableRecipients,

    /// An export is already running on this coordinator
    #[error("An export is already in progress")]
    Busy,

    /// Card artifact generation failed for one registration
    #[error("Render error: {0}")]
    Render(String),

    /// The mail transport rejected or failed to deliver a message
    #[error("Delivery error: {0}")]
    Delivery(#[from] TransportError),

    /// Token generation failed for a single-item retrieval
    #[error("Token generation error: {0}")]
    Generation(String),

    /// The document assembler failed during export
    #[error("Export error: {0}")]
    Export(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl LanyardError {
    /// Message without the category prefix
    ///
    /// Per-item failures recorded in a distribution result use this so that
    /// render and delivery errors read the same way.
    pub fn detail(&self) -> String {
        match self {
            LanyardError::Render(msg)
            | LanyardError::Generation(msg)
            | LanyardError::Export(msg) => msg.clone(),
            LanyardError::Delivery(err) => err.to_string(),
            other => other.to_string(),
        }
    }

    /// Whether this error was raised before any work was performed
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            LanyardError::EmptySelection | LanyardError::NoDeliverableRecipients | LanyardError::Busy
        )
    }
}

/// Mail transport errors
///
/// Errors that occur when handing a message to the outbound mail service.
/// These errors don't expose the HTTP client's types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The mail service could not be reached
    #[error("Failed to reach mail service: {0}")]
    ConnectionFailed(String),

    /// The request timed out
    #[error("Mail service request timed out: {0}")]
    Timeout(String),

    /// The mail service answered with a non-success status
    #[error("Mail service returned {status}: {message}")]
    Rejected { status: u16, message: String },

    /// The mail service accepted the request but reported a failure
    #[error("{0}")]
    Failed(String),

    /// The response body could not be understood
    #[error("Invalid response from mail service: {0}")]
    InvalidResponse(String),
}

impl From<std::io::Error> for LanyardError {
    fn from(err: std::io::Error) -> Self {
        LanyardError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LanyardError {
    fn from(err: serde_json::Error) -> Self {
        LanyardError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for LanyardError {
    fn from(err: toml::de::Error) -> Self {
        LanyardError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<image::ImageError> for LanyardError {
    fn from(err: image::ImageError) -> Self {
        LanyardError::Render(err.to_string())
    }
}
