//! Runtime configuration: built-in defaults overridden by the environment.

use std::path::PathBuf;

use anyhow::{Context, anyhow};
use chrono::NaiveDateTime;
use image_processor::{FontSource, OutputFormat, StampConfig, parse_color};

use super::defaults;
use super::validation::{self, parse_datetime, parse_font_size, parse_u32};

/// Runtime configuration shared by both entry points.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub max_width: u32,
    pub crop_height: u32,
    pub start: NaiveDateTime,
    pub font_path: Option<PathBuf>,
    pub font_size: f32,
    pub text_color: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub output_format: OutputFormat,
    pub archive_format: OutputFormat,
    pub server_port: u16,
    pub max_upload_mb: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let mut config = Self {
            max_width: 0,
            crop_height: 0,
            start: NaiveDateTime::default(),
            font_path: None,
            font_size: 0.0,
            text_color: String::new(),
            input_dir: PathBuf::new(),
            output_dir: PathBuf::new(),
            output_format: OutputFormat::MatchInput,
            archive_format: OutputFormat::Jpeg,
            server_port: 0,
            max_upload_mb: 0,
        };
        for key in defaults::keys() {
            if let Some(value) = defaults::get_default(key) {
                // Defaults are covered by a validation test.
                let _ = config.set(key, value);
            }
        }
        config
    }
}

impl AppConfig {
    /// Defaults overridden by process environment variables.
    pub fn load() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each known key.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mut config = Self::default();
        for key in defaults::keys() {
            if let Some(value) = lookup(key) {
                config
                    .set(key, &value)
                    .with_context(|| format!("invalid environment variable {key}"))?;
            }
        }
        Ok(config)
    }

    /// Validate and apply a single setting.
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        validation::validate_setting(key, value).map_err(|e| anyhow!("{key}: {e}"))?;
        let bad = |e: String| anyhow!("{key}: {e}");

        match key {
            "STAMPER_MAX_WIDTH" => self.max_width = parse_u32(value).map_err(bad)?,
            "STAMPER_CROP_PX" => self.crop_height = parse_u32(value).map_err(bad)?,
            "STAMPER_START" => self.start = parse_datetime(value).map_err(bad)?,
            "STAMPER_FONT_PATH" => {
                let trimmed = value.trim();
                self.font_path = (!trimmed.is_empty()).then(|| PathBuf::from(trimmed));
            }
            "STAMPER_FONT_SIZE" => self.font_size = parse_font_size(value).map_err(bad)?,
            "STAMPER_TEXT_COLOR" => self.text_color = value.trim().to_string(),
            "STAMPER_INPUT_DIR" => self.input_dir = PathBuf::from(value.trim()),
            "STAMPER_OUTPUT_DIR" => self.output_dir = PathBuf::from(value.trim()),
            "STAMPER_OUTPUT_FORMAT" => self.output_format = value.parse().map_err(bad)?,
            "STAMPER_ARCHIVE_FORMAT" => self.archive_format = value.parse().map_err(bad)?,
            "SERVER_PORT" => {
                self.server_port = value
                    .trim()
                    .parse()
                    .map_err(|_| anyhow!("{key}: must be a port number"))?
            }
            "STAMPER_MAX_UPLOAD_MB" => self.max_upload_mb = parse_u32(value).map_err(bad)?,
            other => return Err(anyhow!("unknown setting {other}")),
        }
        Ok(())
    }

    pub fn font_source(&self) -> FontSource {
        match &self.font_path {
            Some(path) => FontSource::File(path.clone()),
            None => FontSource::Bundled,
        }
    }

    /// Stamp parameters for batch-folder runs.
    pub fn stamp_config(&self) -> anyhow::Result<StampConfig> {
        Ok(StampConfig {
            max_width: self.max_width,
            crop_height: self.crop_height,
            start: self.start,
            font: self.font_source(),
            font_size: self.font_size,
            text_color: parse_color(&self.text_color)?,
            output_format: self.output_format,
        })
    }

    /// Largest accepted request body, in bytes.
    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb as usize * 1024 * 1024
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_reference_constants() {
        let config = AppConfig::default();
        assert_eq!(config.max_width, 1054);
        assert_eq!(config.crop_height, 76);
        assert_eq!(config.start.to_string(), "2024-02-14 10:24:59");
        assert_eq!(config.font_size, 48.0);
        assert_eq!(config.text_color, "white");
        assert_eq!(config.font_path, None);
        assert_eq!(config.input_dir, PathBuf::from("input_photos"));
        assert_eq!(config.output_dir, PathBuf::from("output_photos"));
        assert_eq!(config.output_format, OutputFormat::MatchInput);
        assert_eq!(config.archive_format, OutputFormat::Jpeg);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.max_upload_bytes(), 200 * 1024 * 1024);
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("STAMPER_MAX_WIDTH", "500"),
            ("STAMPER_CROP_PX", "0"),
            ("STAMPER_FONT_PATH", "/fonts/arialbd.ttf"),
            ("SERVER_PORT", "9000"),
        ]))
        .unwrap();
        assert_eq!(config.max_width, 500);
        assert_eq!(config.crop_height, 0);
        assert_eq!(config.font_source(), FontSource::File("/fonts/arialbd.ttf".into()));
        assert_eq!(config.server_port, 9000);
    }

    #[test]
    fn invalid_environment_value_names_the_key() {
        let err = AppConfig::from_lookup(lookup(&[("STAMPER_MAX_WIDTH", "0")])).unwrap_err();
        assert!(format!("{err:#}").contains("STAMPER_MAX_WIDTH"));
    }

    #[test]
    fn empty_font_path_means_bundled() {
        let config = AppConfig::from_lookup(lookup(&[("STAMPER_FONT_PATH", "  ")])).unwrap();
        assert_eq!(config.font_source(), FontSource::Bundled);
    }

    #[test]
    fn stamp_config_carries_parsed_color() {
        let mut config = AppConfig::default();
        config.set("STAMPER_TEXT_COLOR", "#ff0000").unwrap();
        let stamp = config.stamp_config().unwrap();
        assert_eq!(stamp.text_color, image_processor::color::parse_color("red").unwrap());
        assert_eq!(stamp.max_width, 1054);
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(AppConfig::default().set("NOT_A_SETTING", "1").is_err());
    }
}
