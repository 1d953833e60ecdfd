//! Artifact generation capabilities
//!
//! The batch coordinator only talks to these traits, so tests can swap in
//! deterministic doubles and deployments can replace the default backends.
//!
//! Default implementations:
//! - [`QrTokenEncoder`] - QR code over a signed JSON payload
//! - [`BadgeCardRenderer`] - badge with header band, token and name lines
//! - [`SheetAssembler`] - PNG page sheets plus a JSON manifest

pub mod card;
pub mod glyphs;
pub mod sheet;
pub mod token;

pub use card::BadgeCardRenderer;
pub use sheet::{ExportManifest, SheetAssembler};
pub use token::QrTokenEncoder;

use crate::domain::{ImageArtifact, Registration, Result};
use async_trait::async_trait;
use std::path::PathBuf;

/// Turns a registration's identifying fields into a scannable token image
#[async_trait]
pub trait TokenEncoder: Send + Sync {
    /// Encode one registration; the same registration always yields the
    /// same bytes
    async fn encode(&self, registration: &Registration) -> Result<ImageArtifact>;
}

/// Composes a token and registration metadata into a card image
#[async_trait]
pub trait CardRenderer: Send + Sync {
    async fn render(&self, registration: &Registration) -> Result<ImageArtifact>;
}

/// Packs many cards into a paginated document
#[async_trait]
pub trait DocumentAssembler: Send + Sync {
    /// Number of pages `count` registrations will occupy
    fn estimate_pages(&self, count: usize) -> usize;

    /// Produce the document; registrations keep their input order across pages
    async fn assemble(&self, registrations: &[Registration]) -> Result<ExportedDocument>;
}

/// Where an assembled document ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedDocument {
    /// Document base name
    pub name: String,

    /// Directory or file holding the document
    pub location: PathBuf,

    /// Pages actually produced
    pub page_count: usize,

    /// Registrations placed in the document
    pub registration_count: usize,
}
