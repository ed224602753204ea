//! Upload-and-download endpoint for the stamp form.

use std::collections::HashMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use image_processor::{SourceImage, StampConfig, StampError, parse_color};
use serde_json::Value;

use super::err_json;
use crate::app::SharedState;
use crate::config::AppConfig;
use crate::config::validation::{self, parse_date, parse_font_size, parse_time, parse_u32};
use crate::services::archive::{self, ARCHIVE_NAME, ArchiveError};
use crate::services::folder::is_supported_image;

/// Message shown when the form is submitted without photos.
pub const NO_IMAGES_MESSAGE: &str = "Please upload at least one image.";

type ApiError = (StatusCode, Json<Value>);

/// Fields collected from one multipart submission.
#[derive(Debug, Default)]
pub struct StampForm {
    pub uploads: Vec<SourceImage>,
    fields: HashMap<String, String>,
}

impl StampForm {
    pub fn set_field(&mut self, name: &str, value: String) {
        self.fields.insert(name.to_string(), value);
    }

    /// Queue an uploaded photo. Empty parts (no file chosen) are ignored.
    pub fn add_upload(&mut self, filename: &str, data: Vec<u8>) -> Result<(), String> {
        if filename.is_empty() && data.is_empty() {
            return Ok(());
        }
        if !is_supported_image(filename) {
            return Err(format!("{filename}: only JPG/PNG photos are accepted"));
        }
        self.uploads.push(SourceImage::new(filename, data));
        Ok(())
    }

    fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// Build stamp parameters, falling back to `defaults` for missing fields.
    pub fn stamp_config(&self, defaults: &AppConfig) -> Result<StampConfig, String> {
        let label = |name: &str, e: String| format!("{name}: {e}");

        let max_width = match self.field("max_width") {
            Some(v) => {
                validation::validate_setting("STAMPER_MAX_WIDTH", v)
                    .map_err(|e| label("Max width", e))?;
                parse_u32(v).map_err(|e| label("Max width", e))?
            }
            None => defaults.max_width,
        };
        let crop_height = match self.field("crop_px") {
            Some(v) => parse_u32(v).map_err(|e| label("Crop pixels", e))?,
            None => defaults.crop_height,
        };
        let date = match self.field("start_date") {
            Some(v) => parse_date(v).map_err(|e| label("Start date", e))?,
            None => defaults.start.date(),
        };
        let time = match self.field("start_time") {
            Some(v) => parse_time(v).map_err(|e| label("Start time", e))?,
            None => defaults.start.time(),
        };
        let font = if self.fields.contains_key("font_path") {
            match self.field("font_path") {
                Some(path) => image_processor::FontSource::File(path.into()),
                None => image_processor::FontSource::Bundled,
            }
        } else {
            defaults.font_source()
        };
        let font_size = match self.field("font_size") {
            Some(v) => parse_font_size(v).map_err(|e| label("Font size", e))?,
            None => defaults.font_size,
        };
        let start =
            validation::check_start(date.and_time(time)).map_err(|e| label("Start date", e))?;
        let color = self.field("text_color").unwrap_or(defaults.text_color.as_str());
        let text_color = parse_color(color).map_err(|e| label("Text color", e.to_string()))?;

        Ok(StampConfig {
            max_width,
            crop_height,
            start,
            font,
            font_size,
            text_color,
            output_format: defaults.archive_format,
        })
    }
}

/// Map a failed batch to an HTTP error.
fn archive_error_response(e: &ArchiveError) -> ApiError {
    let status = match e {
        ArchiveError::Stamp(StampError::EmptyBatch) => 400,
        ArchiveError::Stamp(StampError::Cancelled { .. }) => 503,
        ArchiveError::Stamp(_) => 422,
        ArchiveError::Zip(_) | ArchiveError::Io(_) => 500,
    };
    err_json(status, &e.to_string())
}

/// POST /api/stamp – Stamp uploaded photos and return them as a ZIP
pub async fn stamp_upload(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<Response, ApiError> {
    let mut form = StampForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| err_json(400, &e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name == "photos" {
            let filename = field.file_name().unwrap_or("").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| err_json(400, &e.to_string()))?;
            form.add_upload(&filename, data.to_vec())
                .map_err(|e| err_json(400, &e))?;
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| err_json(400, &e.to_string()))?;
            form.set_field(&name, value);
        }
    }

    if form.uploads.is_empty() {
        return Err(err_json(400, NO_IMAGES_MESSAGE));
    }

    let config = form
        .stamp_config(state.config())
        .map_err(|e| err_json(422, &e))?;
    let count = form.uploads.len();
    tracing::info!(count, "Stamping uploaded photos");

    // Dropping the guard (client went away, or shutdown) cancels the batch.
    let token = state.shutdown_token().child_token();
    let _guard = token.clone().drop_guard();
    let uploads = std::mem::take(&mut form.uploads);
    let zip = tokio::task::spawn_blocking(move || archive::stamp_to_archive(uploads, &config, &token))
        .await
        .map_err(|e| err_json(500, &e.to_string()))?
        .map_err(|e| {
            tracing::warn!("Stamp request failed: {e}");
            archive_error_response(&e)
        })?;

    Response::builder()
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{ARCHIVE_NAME}\""),
        )
        .body(Body::from(zip))
        .map_err(|e| err_json(500, &e.to_string()))
}
