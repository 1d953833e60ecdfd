//! Domain models and types for Lanyard.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RegistrationId`])
//! - **Domain models** ([`Registration`], [`ImageArtifact`])
//! - **Error types** ([`LanyardError`], [`TransportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LanyardError>`]:
//!
//! ```rust
//! use lanyard::domain::{LanyardError, Result};
//!
//! fn first_selected(selection: &[String]) -> Result<&String> {
//!     selection.first().ok_or(LanyardError::EmptySelection)
//! }
//! ```

pub mod artifact;
pub mod errors;
pub mod ids;
pub mod registration;
pub mod result;

pub use artifact::{strip_data_uri_prefix, ImageArtifact, PNG_MEDIA_TYPE};
pub use errors::{LanyardError, TransportError};
pub use ids::RegistrationId;
pub use registration::{Registration, RegistrationBuilder};
pub use result::Result;
