//! Output encoding and naming.

use std::io::Cursor;
use std::str::FromStr;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};

use crate::error::{Result, StampError};

/// JPEG quality used for every JPEG output.
pub const JPEG_QUALITY: u8 = 90;

/// Encoding policy for stamped images.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JPEG stays JPEG, everything else is written as PNG.
    #[default]
    MatchInput,
    Jpeg,
    Png,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "match" | "match-input" | "original" => Ok(Self::MatchInput),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            other => Err(format!("unknown output format '{other}' (expected match, jpeg or png)")),
        }
    }
}

impl OutputFormat {
    /// Concrete format for an input that decoded as `input`.
    pub fn resolve(self, input: Option<ImageFormat>) -> ImageFormat {
        match self {
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
            Self::MatchInput => match input {
                Some(ImageFormat::Jpeg) => ImageFormat::Jpeg,
                _ => ImageFormat::Png,
            },
        }
    }
}

/// Encode `img` as `format`. JPEG output has its alpha channel dropped.
pub fn encode_image(name: &str, img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let fail = |e: image::ImageError| StampError::Encode {
        name: name.to_string(),
        reason: e.to_string(),
    };

    let mut buf = Vec::new();
    match format {
        ImageFormat::Jpeg => {
            let rgb = img.to_rgb8();
            rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY))
                .map_err(fail)?;
        }
        other => {
            img.write_to(&mut Cursor::new(&mut buf), other)
                .map_err(fail)?;
        }
    }
    Ok(buf)
}

/// Base file name of an upload or path, with any directory part removed.
///
/// Both separators are stripped since browsers on Windows may send
/// backslash paths.
pub fn output_name(original: &str) -> String {
    original
        .rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("image")
        .to_string()
}
