//! Error type shared by every stage of the stamping pipeline.

/// Failure modes of a stamping run.
#[derive(Debug, thiserror::Error)]
pub enum StampError {
    #[error("no input images provided")]
    EmptyBatch,
    #[error("failed to load font {source_name}: {reason}")]
    FontLoad { source_name: String, reason: String },
    #[error("failed to decode image {name}: {reason}")]
    ImageDecode { name: String, reason: String },
    #[error("crop height {crop_height}px leaves nothing of {name} ({image_height}px tall)")]
    InvalidCrop {
        name: String,
        crop_height: u32,
        image_height: u32,
    },
    #[error("start time {start} is too close to the end of the calendar for a one-hour batch")]
    TimestampOutOfRange { start: chrono::NaiveDateTime },
    #[error("invalid text color '{0}'")]
    InvalidColor(String),
    #[error("failed to encode {name}: {reason}")]
    Encode { name: String, reason: String },
    #[error("batch cancelled after {completed} of {total} images")]
    Cancelled { completed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, StampError>;
