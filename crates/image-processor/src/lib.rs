//! Batch photo stamping: trim a bottom band, cap the width, and burn an
//! evenly spaced synthetic timestamp into the bottom-right corner.
//!
//! [`stamp::process_batch`] is the whole transform; the other modules are
//! its stages and can be used on their own.

pub mod clock;
pub mod color;
pub mod crop;
pub mod encode;
pub mod error;
pub mod font;
pub mod stamp;
pub mod text;

pub use color::parse_color;
pub use encode::OutputFormat;
pub use error::StampError;
pub use font::{FontSource, MAX_FONT_SIZE};
pub use stamp::{SourceImage, StampConfig, StampedImage, Stamper, process_batch};
