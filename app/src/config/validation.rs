//! Setting value validation.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use image_processor::{MAX_FONT_SIZE, OutputFormat, parse_color};

/// Accepted spellings of a start time.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    match key {
        "STAMPER_MAX_WIDTH" => validate_u32_min(value, 1)?,
        "STAMPER_CROP_PX" => validate_u32_min(value, 0)?,
        "STAMPER_FONT_SIZE" => {
            parse_font_size(value)?;
        }
        "STAMPER_START" => {
            parse_datetime(value)?;
        }
        "STAMPER_TEXT_COLOR" => {
            parse_color(value).map_err(|e| e.to_string())?;
        }
        "STAMPER_OUTPUT_FORMAT" | "STAMPER_ARCHIVE_FORMAT" => {
            value.parse::<OutputFormat>()?;
        }
        "STAMPER_INPUT_DIR" | "STAMPER_OUTPUT_DIR" => {
            if value.trim().is_empty() {
                return Err("directory must not be empty".into());
            }
        }
        "SERVER_PORT" => {
            let v: u16 = value.trim().parse().map_err(|_| "must be a port number")?;
            if v == 0 {
                return Err("must be between 1 and 65535".into());
            }
        }
        "STAMPER_MAX_UPLOAD_MB" => {
            let v = parse_u32(value)?;
            if !(1..=4096).contains(&v) {
                return Err("must be between 1 and 4096".into());
            }
        }
        _ => {}
    }
    Ok(())
}

pub fn parse_u32(value: &str) -> Result<u32, String> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| "must be a non-negative integer".to_string())
}

fn validate_u32_min(value: &str, min: u32) -> Result<(), String> {
    let v = parse_u32(value)?;
    if v < min {
        return Err(format!("must be at least {min}"));
    }
    Ok(())
}

/// Parse a font size in pixels per em, between 1 and [`MAX_FONT_SIZE`].
pub fn parse_font_size(value: &str) -> Result<f32, String> {
    let v: f32 = value.trim().parse().map_err(|_| "must be a number")?;
    if !(1.0..=MAX_FONT_SIZE).contains(&v) {
        return Err(format!("must be between 1 and {MAX_FONT_SIZE}"));
    }
    Ok(v)
}

/// Parse `YYYY-MM-DDTHH:MM:SS` (a space also separates date and time).
///
/// The last image is stamped one hour after the start, so that moment
/// must still be a representable date.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, String> {
    let trimmed = value.trim();
    let start = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| "must look like 2024-02-14T10:24:59".to_string())?;
    check_start(start)
}

/// Reject a start whose one-hour window runs past the end of the calendar.
pub fn check_start(start: NaiveDateTime) -> Result<NaiveDateTime, String> {
    image_processor::clock::window_end(start).map_err(|e| e.to_string())?;
    Ok(start)
}

/// Parse a form date (`YYYY-MM-DD`).
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| "must look like 2024-02-14".into())
}

/// Parse a form time (`HH:MM` or `HH:MM:SS`).
pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| "must look like 10:24:59".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn width_must_be_positive() {
        assert!(validate_setting("STAMPER_MAX_WIDTH", "1").is_ok());
        assert!(validate_setting("STAMPER_MAX_WIDTH", "0").is_err());
        assert!(validate_setting("STAMPER_MAX_WIDTH", "-5").is_err());
        assert!(validate_setting("STAMPER_MAX_WIDTH", "wide").is_err());
    }

    #[test]
    fn crop_may_be_zero() {
        assert!(validate_setting("STAMPER_CROP_PX", "0").is_ok());
        assert!(validate_setting("STAMPER_CROP_PX", "-1").is_err());
    }

    #[test]
    fn font_size_minimum_is_one() {
        assert_eq!(parse_font_size("48").unwrap(), 48.0);
        assert_eq!(parse_font_size("1").unwrap(), 1.0);
        assert!(parse_font_size("0.5").is_err());
        assert!(parse_font_size("inf").is_err());
    }

    #[test]
    fn font_size_is_capped() {
        assert_eq!(parse_font_size("1000").unwrap(), MAX_FONT_SIZE);
        assert!(parse_font_size("1001").is_err());
        assert!(parse_font_size("100000000").is_err());
        assert!(validate_setting("STAMPER_FONT_SIZE", "1e8").is_err());
    }

    #[test]
    fn datetime_accepts_t_or_space() {
        let a = parse_datetime("2024-02-14T10:24:59").unwrap();
        let b = parse_datetime("2024-02-14 10:24:59").unwrap();
        assert_eq!(a, b);
        assert!(parse_datetime("14/02/2024").is_err());
    }

    #[test]
    fn datetime_needs_room_for_the_hour() {
        let spelled = |ts: NaiveDateTime| ts.format("%Y-%m-%dT%H:%M:%S").to_string();
        let last_ok = spelled(NaiveDateTime::MAX - TimeDelta::minutes(61));
        let too_late = spelled(NaiveDateTime::MAX - TimeDelta::minutes(30));

        assert!(parse_datetime(&last_ok).is_ok());
        let err = parse_datetime(&too_late).unwrap_err();
        assert!(err.contains("end of the calendar"), "{err}");
        assert!(validate_setting("STAMPER_START", &too_late).is_err());
    }

    #[test]
    fn form_time_allows_missing_seconds() {
        assert_eq!(parse_time("10:24").unwrap(), NaiveTime::from_hms_opt(10, 24, 0).unwrap());
        assert_eq!(parse_time("10:24:59").unwrap(), NaiveTime::from_hms_opt(10, 24, 59).unwrap());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn color_and_format_are_checked() {
        assert!(validate_setting("STAMPER_TEXT_COLOR", "#ffcc00").is_ok());
        assert!(validate_setting("STAMPER_TEXT_COLOR", "sparkly").is_err());
        assert!(validate_setting("STAMPER_OUTPUT_FORMAT", "png").is_ok());
        assert!(validate_setting("STAMPER_ARCHIVE_FORMAT", "tiff").is_err());
    }

    #[test]
    fn port_and_upload_limits() {
        assert!(validate_setting("SERVER_PORT", "0").is_err());
        assert!(validate_setting("SERVER_PORT", "70000").is_err());
        assert!(validate_setting("STAMPER_MAX_UPLOAD_MB", "0").is_err());
        assert!(validate_setting("STAMPER_MAX_UPLOAD_MB", "512").is_ok());
    }

    #[test]
    fn unknown_keys_pass_through() {
        assert!(validate_setting("SOMETHING_ELSE", "anything").is_ok());
    }
}
