//! Stamp color parsing.

use std::sync::LazyLock;

use image::Rgba;
use regex::Regex;

use crate::error::{Result, StampError};

static RE_HEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#([0-9A-Fa-f]{3}|[0-9A-Fa-f]{6}|[0-9A-Fa-f]{8})$").expect("valid hex regex")
});

const NAMED: &[(&str, [u8; 4])] = &[
    ("white", [255, 255, 255, 255]),
    ("black", [0, 0, 0, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("orange", [255, 165, 0, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("cyan", [0, 255, 255, 255]),
    ("magenta", [255, 0, 255, 255]),
];

/// Parse a color name (`white`) or hex literal (`#fff`, `#ffffff`, `#ffffffff`).
pub fn parse_color(value: &str) -> Result<Rgba<u8>> {
    let trimmed = value.trim();
    let lower = trimmed.to_ascii_lowercase();

    if let Some((_, rgba)) = NAMED.iter().find(|(name, _)| *name == lower) {
        return Ok(Rgba(*rgba));
    }

    let caps = RE_HEX
        .captures(trimmed)
        .ok_or_else(|| StampError::InvalidColor(value.to_string()))?;
    let hex = &caps[1];
    let channel = |s: &str| {
        u8::from_str_radix(s, 16).map_err(|_| StampError::InvalidColor(value.to_string()))
    };

    match hex.len() {
        3 => {
            let mut out = [255u8; 4];
            for (i, c) in hex.chars().enumerate() {
                out[i] = channel(&format!("{c}{c}"))?;
            }
            Ok(Rgba(out))
        }
        _ => {
            let mut out = [255u8; 4];
            for i in 0..hex.len() / 2 {
                out[i] = channel(&hex[i * 2..i * 2 + 2])?;
            }
            Ok(Rgba(out))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color(" White ").unwrap(), Rgba([255, 255, 255, 255]));
        assert_eq!(parse_color("GREY").unwrap(), parse_color("gray").unwrap());
    }

    #[test]
    fn short_hex_expands() {
        assert_eq!(parse_color("#f80").unwrap(), Rgba([255, 136, 0, 255]));
    }

    #[test]
    fn long_hex_with_and_without_alpha() {
        assert_eq!(parse_color("#102030").unwrap(), Rgba([16, 32, 48, 255]));
        assert_eq!(parse_color("#10203080").unwrap(), Rgba([16, 32, 48, 128]));
    }

    #[test]
    fn rejects_unknown_values() {
        assert!(matches!(
            parse_color("chartreuse-ish"),
            Err(StampError::InvalidColor(_))
        ));
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("").is_err());
    }
}
