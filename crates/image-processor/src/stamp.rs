//! Crop-and-timestamp transform over an ordered batch of images.
//!
//! Per image: decode, trim to `min(max_width, width)` x `height - crop_height`
//! from the top-left, burn the synthetic capture time into the bottom-right
//! corner, re-encode. The font is loaded once by [`Stamper::new`] before any
//! image is decoded.

use std::borrow::Borrow;

use chrono::{NaiveDate, NaiveDateTime};
use image::{DynamicImage, ImageFormat, Rgba};
use tracing::{debug, info};

use crate::clock;
use crate::crop;
use crate::encode::{self, OutputFormat};
use crate::error::{Result, StampError};
use crate::font::{FontSource, StampFont};
use crate::text::{self, STAMP_MARGIN};

/// Default cap on output width, in pixels.
pub const DEFAULT_MAX_WIDTH: u32 = 1054;
/// Default band removed from the bottom, in pixels.
pub const DEFAULT_CROP_HEIGHT: u32 = 76;
/// Default font size, in pixels per em.
pub const DEFAULT_FONT_SIZE: f32 = 48.0;

/// Capture time of the first image when nothing else is configured.
pub fn default_start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 14)
        .and_then(|d| d.and_hms_opt(10, 24, 59))
        .unwrap_or_default()
}

/// Immutable parameters for one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct StampConfig {
    pub max_width: u32,
    pub crop_height: u32,
    pub start: NaiveDateTime,
    pub font: FontSource,
    pub font_size: f32,
    pub text_color: Rgba<u8>,
    pub output_format: OutputFormat,
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            crop_height: DEFAULT_CROP_HEIGHT,
            start: default_start(),
            font: FontSource::Bundled,
            font_size: DEFAULT_FONT_SIZE,
            text_color: Rgba([255, 255, 255, 255]),
            output_format: OutputFormat::MatchInput,
        }
    }
}

/// An encoded input image and the name it arrived under.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl SourceImage {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Result of stamping one image.
#[derive(Debug, Clone)]
pub struct StampedImage {
    /// Base file name of the input.
    pub name: String,
    pub bytes: Vec<u8>,
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
    pub timestamp: NaiveDateTime,
    pub stamp_text: String,
}

/// Holds the loaded font and the batch parameters.
pub struct Stamper {
    config: StampConfig,
    font: StampFont,
}

impl Stamper {
    /// Load the configured font and check that the one-hour window fits
    /// the calendar. Fails before any image is processed.
    pub fn new(config: &StampConfig) -> Result<Self> {
        let font = StampFont::load(&config.font, config.font_size)?;
        clock::window_end(config.start)?;
        Ok(Self {
            config: config.clone(),
            font,
        })
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    /// Stamp the image at `index` of a batch of `total`.
    ///
    /// The decoded pixel buffer lives only for the duration of this call.
    pub fn stamp(&self, index: usize, total: usize, source: &SourceImage) -> Result<StampedImage> {
        let name = encode::output_name(&source.name);
        let input_format = image::guess_format(&source.bytes).ok();
        let decoded = image::load_from_memory(&source.bytes).map_err(|e| StampError::ImageDecode {
            name: source.name.clone(),
            reason: e.to_string(),
        })?;

        let (width, height) = crop::crop_geometry(
            &name,
            decoded.width(),
            decoded.height(),
            self.config.max_width,
            self.config.crop_height,
        )?;
        let mut canvas = crop::crop_top_left(decoded, width, height).into_rgba8();

        let timestamp = clock::timestamp_for(self.config.start, index, total)?;
        let stamp_text = clock::format_stamp(timestamp);

        let metrics = text::measure_text(self.font.font(), self.font.scale(), &stamp_text);
        let anchor = text::bottom_right_anchor(width, height, metrics, STAMP_MARGIN);
        debug!(
            name = %name,
            width,
            height,
            text_width = metrics.width,
            text_height = metrics.height,
            x = anchor.0,
            y = anchor.1,
            "Placing stamp"
        );
        text::draw_text_at(
            &mut canvas,
            self.font.font(),
            self.font.scale(),
            metrics,
            anchor,
            &stamp_text,
            self.config.text_color,
        );

        let format = self.config.output_format.resolve(input_format);
        let bytes = encode::encode_image(&name, &DynamicImage::ImageRgba8(canvas), format)?;

        info!(name = %name, stamp = %stamp_text, "Stamped image");
        Ok(StampedImage {
            name,
            bytes,
            format,
            width,
            height,
            timestamp,
            stamp_text,
        })
    }

    /// Stamp a whole batch in order, one image at a time.
    ///
    /// `sources` is pulled lazily and each result goes to `sink` before the
    /// next source is read, so at most one input and one output are held at
    /// once. Callers plug their own I/O and cancellation errors in through
    /// `E`. Returns the number of images stamped.
    pub fn stamp_each<S, E, I, F>(&self, sources: I, mut sink: F) -> std::result::Result<usize, E>
    where
        S: Borrow<SourceImage>,
        E: From<StampError>,
        I: IntoIterator<Item = std::result::Result<S, E>>,
        I::IntoIter: ExactSizeIterator,
        F: FnMut(StampedImage) -> std::result::Result<(), E>,
    {
        let sources = sources.into_iter();
        let total = sources.len();
        if total == 0 {
            return Err(StampError::EmptyBatch.into());
        }
        for (index, source) in sources.enumerate() {
            let stamped = self.stamp(index, total, source?.borrow())?;
            sink(stamped)?;
        }
        Ok(total)
    }
}

/// Stamp every image of `images` in order.
///
/// Aborts on the first failure: an empty batch, an unusable font or start
/// time, or an image that cannot be decoded, cropped, or encoded.
pub fn process_batch(images: &[SourceImage], config: &StampConfig) -> Result<Vec<StampedImage>> {
    if images.is_empty() {
        return Err(StampError::EmptyBatch);
    }
    let stamper = Stamper::new(config)?;
    let mut stamped = Vec::with_capacity(images.len());
    stamper.stamp_each(images.iter().map(Ok::<_, StampError>), |image| {
        stamped.push(image);
        Ok(())
    })?;
    Ok(stamped)
}
