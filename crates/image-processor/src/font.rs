//! Font loading for the stamp text.
//!
//! A font is resolved and parsed exactly once per batch so a bad path is
//! reported before any image is touched.

use std::fmt;
use std::path::PathBuf;

use ab_glyph::{Font, FontVec, PxScale};
use tracing::info;

use crate::error::{Result, StampError};

/// Font shipped with the crate, used when no font file is configured.
pub const BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/DejaVuSans-Bold.ttf");

/// Largest accepted font size, in pixels per em. Glyphs are rasterized
/// whole before clipping, so the coverage buffer grows with the square of
/// the size.
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Where the stamp font comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FontSource {
    #[default]
    Bundled,
    File(PathBuf),
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::Bundled => f.write_str("<bundled DejaVu Sans Bold>"),
            FontSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// A parsed font paired with the pixel scale for the configured size.
pub struct StampFont {
    font: FontVec,
    scale: PxScale,
}

impl StampFont {
    /// Read and parse `source`. `size` is pixels per em, between 1 and
    /// [`MAX_FONT_SIZE`].
    pub fn load(source: &FontSource, size: f32) -> Result<Self> {
        let fail = |reason: String| StampError::FontLoad {
            source_name: source.to_string(),
            reason,
        };

        if !(1.0..=MAX_FONT_SIZE).contains(&size) {
            return Err(fail(format!(
                "font size must be between 1 and {MAX_FONT_SIZE} (got {size})"
            )));
        }

        let data = match source {
            FontSource::Bundled => BUNDLED_FONT.to_vec(),
            FontSource::File(path) => std::fs::read(path).map_err(|e| fail(e.to_string()))?,
        };
        let font = FontVec::try_from_vec(data)
            .map_err(|e| fail(format!("not a usable TTF/OTF font ({e})")))?;
        let scale = em_to_px_scale(&font, size);

        info!(font = %source, size, "Loaded stamp font");
        Ok(Self { font, scale })
    }

    pub fn font(&self) -> &FontVec {
        &self.font
    }

    pub fn scale(&self) -> PxScale {
        self.scale
    }
}

/// Convert a pixels-per-em size into ab_glyph's ascent-to-descent scale.
fn em_to_px_scale(font: &impl Font, size: f32) -> PxScale {
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
        _ => PxScale::from(size),
    }
}
