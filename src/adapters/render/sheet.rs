//! Page sheet document assembler
//!
//! An exported document is a directory:
//!
//! ```text
//! <output>/<document_name>/
//!   page-001.png
//!   page-002.png
//!   manifest.json
//! ```
//!
//! Pages are A4-proportioned PNG sheets holding `cards_per_row × rows_per_page`
//! cards, filled left to right and top to bottom in input order.

use super::{BadgeCardRenderer, CardRenderer, DocumentAssembler, ExportedDocument};
use crate::config::{LayoutConfig, OutputConfig};
use crate::domain::{LanyardError, Registration, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use image::imageops::overlay;
use image::{ImageFormat, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

const PAGE_BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const MANIFEST_FILE: &str = "manifest.json";
const PAGE_FILE_PREFIX: &str = "page-";

/// A4 height over width
const A4_RATIO: f64 = 297.0 / 210.0;

/// Index written next to the page images
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportManifest {
    pub name: String,
    pub generated_at: DateTime<Utc>,
    pub page_count: usize,
    pub registration_count: usize,
    pub pages: Vec<ManifestPage>,
}

/// One page entry in the manifest
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManifestPage {
    pub file: String,
    pub registrations: Vec<String>,
}

/// Lays cards out on page sheets and writes them to the output directory
pub struct SheetAssembler {
    renderer: Arc<dyn CardRenderer>,
    layout: LayoutConfig,
    directory: PathBuf,
    document_name: String,
}

impl SheetAssembler {
    pub fn new(
        renderer: Arc<dyn CardRenderer>,
        layout: LayoutConfig,
        directory: impl Into<PathBuf>,
        document_name: impl Into<String>,
    ) -> Self {
        Self {
            renderer,
            layout,
            directory: directory.into(),
            document_name: document_name.into(),
        }
    }

    /// Assembler using the default badge renderer and configured output location
    pub fn from_config(layout: &LayoutConfig, output: &OutputConfig) -> Self {
        Self::new(
            Arc::new(BadgeCardRenderer::from_layout(layout)),
            layout.clone(),
            &output.directory,
            &output.document_name,
        )
    }

    /// Directory the document is written to
    pub fn document_dir(&self) -> PathBuf {
        self.directory.join(&self.document_name)
    }

    fn page_dimensions(&self) -> (u32, u32, u32) {
        let layout = &self.layout;
        let gutter = (layout.card_width_px / 16).max(8);
        let width = layout.cards_per_row * layout.card_width_px + (layout.cards_per_row + 1) * gutter;
        let grid_height =
            layout.rows_per_page * layout.card_height_px + (layout.rows_per_page + 1) * gutter;
        let height = grid_height.max((width as f64 * A4_RATIO).round() as u32);
        (width, height, gutter)
    }

    fn compose_page(&self, cards: &[RgbaImage]) -> RgbaImage {
        let (width, height, gutter) = self.page_dimensions();
        let mut page = RgbaImage::from_pixel(width, height, PAGE_BACKGROUND);

        for (slot, card) in cards.iter().enumerate() {
            let col = slot as u32 % self.layout.cards_per_row;
            let row = slot as u32 / self.layout.cards_per_row;
            let x = gutter + col * (self.layout.card_width_px + gutter);
            let y = gutter + row * (self.layout.card_height_px + gutter);
            overlay(&mut page, card, x as i64, y as i64);
        }

        page
    }
}

#[async_trait]
impl DocumentAssembler for SheetAssembler {
    fn estimate_pages(&self, count: usize) -> usize {
        count.div_ceil(self.layout.cards_per_page().max(1))
    }

    async fn assemble(&self, registrations: &[Registration]) -> Result<ExportedDocument> {
        let per_page = self.layout.cards_per_page().max(1);

        let mut cards = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let artifact = self.renderer.render(registration).await?;
            cards.push(image::load_from_memory(artifact.bytes())?.to_rgba8());
        }

        let dir = self.document_dir();
        prepare_document_dir(&dir)?;

        let mut pages = Vec::new();
        for (index, (page_cards, page_registrations)) in cards
            .chunks(per_page)
            .zip(registrations.chunks(per_page))
            .enumerate()
        {
            let file = format!("{}{:03}.png", PAGE_FILE_PREFIX, index + 1);
            let page = self.compose_page(page_cards);
            page.save_with_format(dir.join(&file), ImageFormat::Png)?;

            tracing::debug!(page = index + 1, cards = page_cards.len(), file = %file, "Wrote page");

            pages.push(ManifestPage {
                file,
                registrations: page_registrations
                    .iter()
                    .map(|r| r.id.to_string())
                    .collect(),
            });
        }

        let manifest = ExportManifest {
            name: self.document_name.clone(),
            generated_at: Utc::now(),
            page_count: pages.len(),
            registration_count: registrations.len(),
            pages,
        };
        fs::write(dir.join(MANIFEST_FILE), serde_json::to_vec_pretty(&manifest)?)?;

        tracing::info!(
            document = %self.document_name,
            location = %dir.display(),
            pages = manifest.page_count,
            registrations = manifest.registration_count,
            "Document assembled"
        );

        Ok(ExportedDocument {
            name: self.document_name.clone(),
            location: dir,
            page_count: manifest.page_count,
            registration_count: manifest.registration_count,
        })
    }
}

/// Creates the document directory and clears pages left by an earlier export
fn prepare_document_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| {
        LanyardError::Io(format!("Failed to create {}: {}", dir.display(), e))
    })?;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if (name.starts_with(PAGE_FILE_PREFIX) && name.ends_with(".png")) || name == MANIFEST_FILE {
            fs::remove_file(entry.path())?;
        }
    }

    Ok(())
}

/// Reads the manifest of an exported document
pub fn read_manifest(dir: &Path) -> Result<ExportManifest> {
    let contents = fs::read(dir.join(MANIFEST_FILE))?;
    Ok(serde_json::from_slice(&contents)?)
}
