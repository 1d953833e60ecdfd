//! Badge card renderer

use super::glyphs::{draw_text_centered, fit_scale, truncate_to_width, GLYPH_HEIGHT};
use super::{CardRenderer, QrTokenEncoder, TokenEncoder};
use crate::config::LayoutConfig;
use crate::domain::{ImageArtifact, LanyardError, Registration, Result};
use async_trait::async_trait;
use image::imageops::{overlay, resize, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use std::io::Cursor;
use std::sync::Arc;

const BACKGROUND: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const HEADER: Rgba<u8> = Rgba([0x1f, 0x5f, 0x5b, 0xff]);
const HEADER_TEXT: Rgba<u8> = Rgba([0xff, 0xff, 0xff, 0xff]);
const TEXT: Rgba<u8> = Rgba([0x1b, 0x1b, 0x1b, 0xff]);
const ACCENT: Rgba<u8> = Rgba([0x1f, 0x5f, 0x5b, 0xff]);
const MUTED: Rgba<u8> = Rgba([0x6b, 0x6b, 0x6b, 0xff]);
const BORDER: Rgba<u8> = Rgba([0xb8, 0xb8, 0xb8, 0xff]);

const DEFAULT_HEADER: &str = "REGISTRATION";

/// Renders a card: header band, token, display name, code and group
///
/// # Example
///
/// ```no_run
/// use lanyard::adapters::render::{BadgeCardRenderer, CardRenderer};
/// use lanyard::config::LayoutConfig;
/// use lanyard::domain::Registration;
///
/// # async fn example(registration: Registration) -> lanyard::domain::Result<()> {
/// let renderer = BadgeCardRenderer::from_layout(&LayoutConfig::default());
/// let card = renderer.render(&registration).await?;
/// println!("{} bytes", card.len());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BadgeCardRenderer {
    encoder: Arc<dyn TokenEncoder>,
    width: u32,
    height: u32,
}

impl BadgeCardRenderer {
    pub fn new(encoder: Arc<dyn TokenEncoder>, width: u32, height: u32) -> Self {
        Self {
            encoder,
            width,
            height,
        }
    }

    /// Renderer backed by the default QR encoder at the configured sizes
    pub fn from_layout(layout: &LayoutConfig) -> Self {
        Self::new(
            Arc::new(QrTokenEncoder::from_layout(layout)),
            layout.card_width_px,
            layout.card_height_px,
        )
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn compose(&self, registration: &Registration, token: &ImageArtifact) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        let margin = (width / 20).max(8);
        let text_width = width.saturating_sub(2 * margin);

        let mut card = RgbaImage::from_pixel(width, height, BACKGROUND);

        let header_height = height * 14 / 100;
        draw_filled_rect_mut(
            &mut card,
            Rect::at(0, 0).of_size(width, header_height.max(1)),
            HEADER,
        );
        let header_text = registration
            .event_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_HEADER);
        let (header_text, scale) = fitted(header_text, text_width, 4);
        let header_y = (header_height as i32 - (GLYPH_HEIGHT * scale) as i32) / 2;
        draw_text_centered(&mut card, width, header_y, &header_text, HEADER_TEXT, scale);

        let token_image = image::load_from_memory(token.bytes())?.to_rgba8();
        let side = text_width.min(height * 55 / 100);
        let token_image = resize(&token_image, side, side, FilterType::Nearest);
        let token_x = (width - side) / 2;
        let token_y = header_height + margin / 2;
        overlay(&mut card, &token_image, token_x as i64, token_y as i64);

        let mut y = (token_y + side + margin) as i32;
        let lines = [
            (registration.display_name(), TEXT, 4),
            (registration.code().to_string(), ACCENT, 3),
            (registration.group.clone().unwrap_or_default(), MUTED, 2),
        ];
        for (text, color, preferred) in lines {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            let (text, scale) = fitted(text, text_width, preferred);
            draw_text_centered(&mut card, width, y, &text, color, scale);
            y += ((GLYPH_HEIGHT + 4) * scale) as i32;
        }

        draw_hollow_rect_mut(&mut card, Rect::at(0, 0).of_size(width, height), BORDER);

        Ok(card)
    }
}

#[async_trait]
impl CardRenderer for BadgeCardRenderer {
    async fn render(&self, registration: &Registration) -> Result<ImageArtifact> {
        let token = self.encoder.encode(registration).await.map_err(|e| {
            LanyardError::Render(format!("Token generation failed: {}", e.detail()))
        })?;

        let card = self.compose(registration, &token)?;

        let mut bytes = Vec::new();
        card.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        tracing::debug!(
            registration_id = %registration.id,
            bytes = bytes.len(),
            "Rendered card"
        );

        Ok(ImageArtifact::png(bytes))
    }
}

/// Text and scale that fit `max_width`, truncating when even scale 1 is too wide
fn fitted(text: &str, max_width: u32, preferred: u32) -> (String, u32) {
    match fit_scale(text, max_width, preferred) {
        Some(scale) => (text.to_string(), scale),
        None => (truncate_to_width(text, max_width, 1), 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenEncoder;

    #[async_trait]
    impl TokenEncoder for BrokenEncoder {
        async fn encode(&self, _registration: &Registration) -> Result<ImageArtifact> {
            Err(LanyardError::Generation("payload too large".to_string()))
        }
    }

    fn registration() -> Registration {
        Registration::builder()
            .id("reg-1")
            .unwrap()
            .camper_code("CAMP-001")
            .first_name("Ada")
            .last_name("Lovelace")
            .event_name("Summer Camp 2026")
            .group("Cabin 4")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_render_produces_card_of_configured_size() {
        let layout = LayoutConfig::default();
        let renderer = BadgeCardRenderer::from_layout(&layout);
        let card = renderer.render(&registration()).await.unwrap();

        let image = image::load_from_memory(card.bytes()).unwrap();
        assert_eq!(image.width(), layout.card_width_px);
        assert_eq!(image.height(), layout.card_height_px);
    }

    #[tokio::test]
    async fn test_render_is_deterministic() {
        let renderer = BadgeCardRenderer::from_layout(&LayoutConfig::default());
        let first = renderer.render(&registration()).await.unwrap();
        let second = renderer.render(&registration()).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_encoder_failure_becomes_render_error() {
        let renderer = BadgeCardRenderer::new(Arc::new(BrokenEncoder), 300, 400);
        let err = renderer.render(&registration()).await.unwrap_err();
        match err {
            LanyardError::Render(msg) => assert!(msg.contains("payload too large")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_fitted_truncates_long_text() {
        let (text, scale) = fitted("AN EXTREMELY LONG NAME THAT WILL NOT FIT", 60, 3);
        assert_eq!(scale, 1);
        assert!(text.ends_with("..."));
    }
}
