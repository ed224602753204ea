//! Batch-folder mode: stamp every image in a directory into another one.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use image_processor::{SourceImage, StampConfig, StampedImage, Stamper};

/// File name suffixes picked up from the input folder (case-insensitive).
const SUPPORTED_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png"];

/// Outcome of a folder run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderReport {
    /// The input folder held no supported images; nothing was written.
    NoImages { input_dir: PathBuf },
    Completed {
        output_dir: PathBuf,
        written: Vec<PathBuf>,
    },
}

pub fn is_supported_image(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Supported image files directly inside `dir`, sorted by file name.
pub fn list_images(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if is_supported_image(&entry.file_name().to_string_lossy()) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

/// Stamp every supported image in `input_dir` into `output_dir`.
///
/// Files are processed one at a time and written under their original
/// name; `on_written` is called after each one. The font is loaded before
/// the output folder is created, so a font error leaves no trace on disk.
pub fn run_folder_batch(
    input_dir: &Path,
    output_dir: &Path,
    config: &StampConfig,
    mut on_written: impl FnMut(&StampedImage, &Path),
) -> anyhow::Result<FolderReport> {
    let files = list_images(input_dir)?;
    if files.is_empty() {
        tracing::info!(dir = %input_dir.display(), "No images found");
        return Ok(FolderReport::NoImages {
            input_dir: input_dir.to_path_buf(),
        });
    }

    let stamper = Stamper::new(config)?;
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory {}", output_dir.display()))?;

    let sources = files.iter().map(|path| -> anyhow::Result<SourceImage> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
        Ok(SourceImage::new(name, bytes))
    });

    let mut written = Vec::with_capacity(files.len());
    let total = stamper.stamp_each(sources, |stamped| {
        let out_path = output_dir.join(&stamped.name);
        fs::write(&out_path, &stamped.bytes)
            .with_context(|| format!("failed to write {}", out_path.display()))?;
        on_written(&stamped, &out_path);
        written.push(out_path);
        Ok(())
    })?;

    tracing::info!(count = total, dir = %output_dir.display(), "Folder batch complete");
    Ok(FolderReport::Completed {
        output_dir: output_dir.to_path_buf(),
        written,
    })
}
