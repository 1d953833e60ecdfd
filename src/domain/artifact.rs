//! Encoded image artifacts
//!
//! Token images and card images travel through the pipeline as
//! [`ImageArtifact`]s: raw encoded bytes tagged with their media type.

use super::errors::LanyardError;
use super::result::Result;
use base64::{engine::general_purpose, Engine as _};

/// Media type of PNG artifacts
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// An encoded image plus its media type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    media_type: String,
    bytes: Vec<u8>,
}

impl ImageArtifact {
    /// Wraps already-encoded bytes
    pub fn new(media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            media_type: media_type.into(),
            bytes,
        }
    }

    /// Wraps PNG-encoded bytes
    pub fn png(bytes: Vec<u8>) -> Self {
        Self::new(PNG_MEDIA_TYPE, bytes)
    }

    /// Parses a `data:<media>;base64,<payload>` URI
    ///
    /// A bare base64 string without a prefix is accepted and assumed to be PNG.
    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let uri = uri.trim();
        let media_type = match uri.strip_prefix("data:") {
            Some(rest) => rest
                .split(|c: char| c == ';' || c == ',')
                .next()
                .filter(|media| !media.is_empty())
                .unwrap_or(PNG_MEDIA_TYPE)
                .to_string(),
            None => PNG_MEDIA_TYPE.to_string(),
        };

        let bytes = general_purpose::STANDARD
            .decode(strip_data_uri_prefix(uri))
            .map_err(|e| LanyardError::Serialization(format!("Invalid base64 payload: {e}")))?;

        Ok(Self { media_type, bytes })
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Size of the encoded payload in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Renders the artifact as a data URI
    pub fn to_data_uri(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.media_type,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// The raw base64 payload handed to the mail transport, with no media prefix
    pub fn transport_payload(&self) -> String {
        general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// Returns the payload part of a data URI (everything after the first comma)
///
/// Strings without a `data:` prefix are returned unchanged.
pub fn strip_data_uri_prefix(value: &str) -> &str {
    if !value.starts_with("data:") {
        return value;
    }
    match value.split_once(',') {
        Some((_, payload)) => payload,
        None => "",
    }
}
