//! In-memory ZIP packaging for the upload form.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use image_processor::{SourceImage, StampConfig, StampError, Stamper};
use tokio_util::sync::CancellationToken;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// File name offered for download.
pub const ARCHIVE_NAME: &str = "edited_photos.zip";

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Stamp(#[from] StampError),
    #[error("failed to build archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("failed to build archive: {0}")]
    Io(#[from] std::io::Error),
}

/// Collects stamped images into a ZIP held in memory.
pub struct ZipArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    used_names: HashSet<String>,
}

impl Default for ZipArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ZipArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            used_names: HashSet::new(),
        }
    }

    /// Add one entry. Returns the entry name actually used.
    pub fn add(&mut self, name: &str, data: &[u8]) -> Result<String, ArchiveError> {
        let entry = unique_name(&self.used_names, name);
        // Stamped photos are already compressed.
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        self.writer.start_file(entry.as_str(), options)?;
        self.writer.write_all(data)?;
        self.used_names.insert(entry.clone());
        Ok(entry)
    }

    pub fn len(&self) -> usize {
        self.used_names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used_names.is_empty()
    }

    pub fn finish(self) -> Result<Vec<u8>, ArchiveError> {
        Ok(self.writer.finish()?.into_inner())
    }
}

/// `name`, or `stem (2).ext`, `stem (3).ext`, ... if already taken.
fn unique_name(used: &HashSet<String>, name: &str) -> String {
    if !used.contains(name) {
        return name.to_string();
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > 0 => (&name[..dot], &name[dot..]),
        _ => (name, ""),
    };
    (2..)
        .map(|n| format!("{stem} ({n}){ext}"))
        .find(|candidate| !used.contains(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// Stamp `uploads` in order and pack the results into a ZIP.
///
/// Each upload is released as soon as its entry is written. `cancel` is
/// checked between images.
pub fn stamp_to_archive(
    uploads: Vec<SourceImage>,
    config: &StampConfig,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, ArchiveError> {
    if uploads.is_empty() {
        return Err(StampError::EmptyBatch.into());
    }
    let stamper = Stamper::new(config)?;
    let total = uploads.len();
    let mut archive = ZipArchiveBuilder::new();

    let sources = uploads.into_iter().enumerate().map(|(index, upload)| {
        if cancel.is_cancelled() {
            tracing::warn!(completed = index, total, "Archive batch cancelled");
            return Err(ArchiveError::from(StampError::Cancelled {
                completed: index,
                total,
            }));
        }
        Ok(upload)
    });
    stamper.stamp_each(sources, |stamped| {
        let entry = archive.add(&stamped.name, &stamped.bytes)?;
        tracing::debug!(entry = %entry, bytes = stamped.bytes.len(), "Archived stamped image");
        Ok(())
    })?;

    tracing::info!(entries = archive.len(), "Archive built");
    archive.finish()
}
