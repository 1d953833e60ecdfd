//! QR token encoder
//!
//! The token carries a compact JSON payload:
//!
//! ```json
//! {"id":"reg-1","code":"CAMP-001","sig":"3f2a9c0d11be"}
//! ```
//!
//! `sig` is the first 12 hex characters of SHA-256 over `id|code`, which lets
//! a scanner reject hand-edited codes without a round trip.

use super::TokenEncoder;
use crate::config::LayoutConfig;
use crate::domain::{ImageArtifact, LanyardError, Registration, Result};
use async_trait::async_trait;
use image::{GrayImage, ImageFormat, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use qrcode::{Color, EcLevel, QrCode};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Cursor;

/// Light modules around the symbol, as required by the QR specification
const QUIET_ZONE_MODULES: u32 = 4;

const SIGNATURE_LEN: usize = 12;

#[derive(Debug, Serialize)]
struct TokenPayload<'a> {
    id: &'a str,
    code: &'a str,
    sig: String,
}

/// Encodes registrations as QR code PNGs
#[derive(Debug, Clone)]
pub struct QrTokenEncoder {
    module_px: u32,
}

impl QrTokenEncoder {
    /// Creates an encoder drawing each QR module as `module_px` square pixels
    pub fn new(module_px: u32) -> Self {
        Self {
            module_px: module_px.max(1),
        }
    }

    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self::new(layout.token_module_px)
    }

    /// The text embedded in the QR symbol for `registration`
    pub fn payload(registration: &Registration) -> Result<String> {
        let id = registration.id.as_str();
        let code = registration.code();
        let payload = TokenPayload {
            id,
            code,
            sig: signature(id, code),
        };
        Ok(serde_json::to_string(&payload)?)
    }

    /// Synchronous encoding used by the trait impl and the card renderer
    pub fn encode_sync(&self, registration: &Registration) -> Result<ImageArtifact> {
        let payload = Self::payload(registration)?;

        let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| {
                LanyardError::Generation(format!(
                    "Failed to encode token for {}: {}",
                    registration.id, e
                ))
            })?;

        let image = self.draw(code.width() as u32, &code.to_colors());

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| {
                LanyardError::Generation(format!(
                    "Failed to write token image for {}: {}",
                    registration.id, e
                ))
            })?;

        tracing::trace!(
            registration_id = %registration.id,
            modules = code.width(),
            bytes = bytes.len(),
            "Encoded token"
        );

        Ok(ImageArtifact::png(bytes))
    }

    fn draw(&self, modules: u32, colors: &[Color]) -> GrayImage {
        let side = (modules + 2 * QUIET_ZONE_MODULES) * self.module_px;
        let mut image = GrayImage::from_pixel(side, side, Luma([255]));

        for (index, color) in colors.iter().enumerate() {
            if !matches!(color, Color::Dark) {
                continue;
            }
            let col = index as u32 % modules;
            let row = index as u32 / modules;
            let x = (col + QUIET_ZONE_MODULES) * self.module_px;
            let y = (row + QUIET_ZONE_MODULES) * self.module_px;
            draw_filled_rect_mut(
                &mut image,
                Rect::at(x as i32, y as i32).of_size(self.module_px, self.module_px),
                Luma([0]),
            );
        }

        image
    }
}

impl Default for QrTokenEncoder {
    fn default() -> Self {
        Self::from_layout(&LayoutConfig::default())
    }
}

#[async_trait]
impl TokenEncoder for QrTokenEncoder {
    async fn encode(&self, registration: &Registration) -> Result<ImageArtifact> {
        self.encode_sync(registration)
    }
}

/// Short hex signature over `id|code`
pub fn signature(id: &str, code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(id.as_bytes());
    hasher.update(b"|");
    hasher.update(code.as_bytes());
    let result = hasher.finalize();
    let mut hex = format!("{result:x}");
    hex.truncate(SIGNATURE_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(id: &str, code: Option<&str>) -> Registration {
        let mut builder = Registration::builder().id(id).unwrap().first_name("Ada");
        if let Some(code) = code {
            builder = builder.camper_code(code);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_signature_is_stable_and_short() {
        let sig = signature("reg-1", "CAMP-001");
        assert_eq!(sig.len(), 12);
        assert_eq!(sig, signature("reg-1", "CAMP-001"));
        assert_ne!(sig, signature("reg-1", "CAMP-002"));
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_payload_falls_back_to_id() {
        let payload = QrTokenEncoder::payload(&registration("reg-7", None)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["id"], "reg-7");
        assert_eq!(value["code"], "reg-7");
        assert_eq!(value["sig"], signature("reg-7", "reg-7"));
    }

    #[test]
    fn test_encode_produces_png_with_quiet_zone() {
        let encoder = QrTokenEncoder::new(4);
        let artifact = encoder
            .encode_sync(&registration("reg-1", Some("CAMP-001")))
            .unwrap();

        assert_eq!(artifact.media_type(), "image/png");
        let image = image::load_from_memory(artifact.bytes()).unwrap().to_luma8();
        assert_eq!(image.width(), image.height());
        assert_eq!(image.width() % 4, 0);
        // Top-left corner sits in the quiet zone
        assert_eq!(image.get_pixel(0, 0).0[0], 255);
        // First module of the finder pattern is dark
        let finder = QUIET_ZONE_MODULES * 4;
        assert_eq!(image.get_pixel(finder, finder).0[0], 0);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = QrTokenEncoder::default();
        let reg = registration("reg-2", Some("CAMP-002"));
        assert_eq!(
            encoder.encode_sync(&reg).unwrap(),
            encoder.encode_sync(&reg).unwrap()
        );
    }

    #[tokio::test]
    async fn test_distinct_registrations_get_distinct_tokens() {
        let encoder = QrTokenEncoder::default();
        let a = encoder.encode(&registration("reg-a", None)).await.unwrap();
        let b = encoder.encode(&registration("reg-b", None)).await.unwrap();
        assert_ne!(a, b);
    }
}
