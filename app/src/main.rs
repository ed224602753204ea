//! Batch-folder mode: crop and timestamp every photo in a folder.

use std::path::PathBuf;

use clap::Parser;

use photo_stamper_lib::config::{self, AppConfig};
use photo_stamper_lib::services::folder::{self, FolderReport};

#[derive(Parser)]
#[command(
    name = "photo-stamper",
    version,
    about = "Crop the bottom band off every photo in a folder and stamp evenly spaced timestamps"
)]
struct Cli {
    /// Folder to read photos from (default: input_photos)
    #[arg(long, short)]
    input: Option<PathBuf>,

    /// Folder to write stamped photos to (default: output_photos)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Maximum output width in pixels
    #[arg(long)]
    max_width: Option<String>,

    /// Pixels to crop from the bottom
    #[arg(long)]
    crop: Option<String>,

    /// Capture time of the first photo, e.g. 2024-02-14T10:24:59
    #[arg(long)]
    start: Option<String>,

    /// TTF/OTF font file (default: bundled font)
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels per em
    #[arg(long)]
    font_size: Option<String>,

    /// Stamp color: a name or #rrggbb
    #[arg(long)]
    color: Option<String>,

    /// Output encoding: match, jpeg or png
    #[arg(long)]
    format: Option<String>,
}

impl Cli {
    /// Setting overrides given on the command line.
    fn overrides(&self) -> Vec<(&'static str, String)> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        [
            ("STAMPER_INPUT_DIR", path(&self.input)),
            ("STAMPER_OUTPUT_DIR", path(&self.output)),
            ("STAMPER_MAX_WIDTH", self.max_width.clone()),
            ("STAMPER_CROP_PX", self.crop.clone()),
            ("STAMPER_START", self.start.clone()),
            ("STAMPER_FONT_PATH", path(&self.font)),
            ("STAMPER_FONT_SIZE", self.font_size.clone()),
            ("STAMPER_TEXT_COLOR", self.color.clone()),
            ("STAMPER_OUTPUT_FORMAT", self.format.clone()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect()
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    photo_stamper_lib::init_tracing();
    config::load_dotenv();

    let mut app_config = AppConfig::load()?;
    for (key, value) in cli.overrides() {
        app_config.set(key, &value)?;
    }
    let stamp_config = app_config.stamp_config()?;

    let report = folder::run_folder_batch(
        &app_config.input_dir,
        &app_config.output_dir,
        &stamp_config,
        |stamped, path| println!("✅ {} → {}", stamped.name, path.display()),
    )?;

    match report {
        FolderReport::NoImages { input_dir } => {
            println!("❌ No images found in {}", input_dir.display());
        }
        FolderReport::Completed {
            output_dir,
            written,
        } => {
            println!(
                "\n🎉 Done! {} images in '{}'.",
                written.len(),
                output_dir.display()
            );
        }
    }
    Ok(())
}
