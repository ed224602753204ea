//! Every setting key with its default value and a short description.

use std::collections::HashMap;
use std::sync::LazyLock;

type DefTuple = (&'static str, &'static str, &'static str);

const DEFS: &[DefTuple] = &[
    ("STAMPER_MAX_WIDTH", "1054", "Maximum output width in pixels (never upscales)"),
    ("STAMPER_CROP_PX", "76", "Pixels removed from the bottom of every image"),
    ("STAMPER_START", "2024-02-14T10:24:59", "Capture time of the first image"),
    ("STAMPER_FONT_PATH", "", "TTF/OTF font file; empty uses the bundled font"),
    ("STAMPER_FONT_SIZE", "48", "Stamp font size in pixels per em"),
    ("STAMPER_TEXT_COLOR", "white", "Stamp color: a name or #rgb/#rrggbb/#rrggbbaa"),
    ("STAMPER_INPUT_DIR", "input_photos", "Folder scanned in batch-folder mode"),
    ("STAMPER_OUTPUT_DIR", "output_photos", "Folder written in batch-folder mode"),
    ("STAMPER_OUTPUT_FORMAT", "match", "Folder output encoding: match, jpeg or png"),
    ("STAMPER_ARCHIVE_FORMAT", "jpeg", "ZIP entry encoding: match, jpeg or png"),
    ("SERVER_PORT", "8080", "Port of the upload form server"),
    ("STAMPER_MAX_UPLOAD_MB", "200", "Largest accepted upload request in MiB"),
];

/// A single setting definition.
#[derive(Debug, Clone)]
pub struct SettingDef {
    pub key: &'static str,
    pub default: &'static str,
    pub description: &'static str,
}

/// Setting definitions indexed by key.
pub static DEFAULT_SETTINGS: LazyLock<HashMap<&'static str, SettingDef>> = LazyLock::new(|| {
    DEFS.iter()
        .map(|&(key, default, description)| {
            (
                key,
                SettingDef {
                    key,
                    default,
                    description,
                },
            )
        })
        .collect()
});

/// Setting keys in declaration order.
pub fn keys() -> impl Iterator<Item = &'static str> {
    DEFS.iter().map(|&(key, _, _)| key)
}

/// Get the default value for a setting key, or `None` if not defined.
pub fn get_default(key: &str) -> Option<&'static str> {
    DEFAULT_SETTINGS.get(key).map(|d| d.default)
}
