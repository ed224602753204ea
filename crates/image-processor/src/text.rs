//! Stamp text measurement and placement.
//!
//! Glyphs are laid out the same way `imageproc::drawing::draw_text_mut`
//! lays them out, so the measured ink box is exactly where pixels land.

use ab_glyph::{Font, GlyphId, PxScale, ScaleFont, point};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;

/// Gap between the stamp and the bottom-right corner of the image.
pub const STAMP_MARGIN: u32 = 10;

/// Ink bounding box of a rendered string.
///
/// `offset_x`/`offset_y` locate the box relative to the origin passed to
/// `draw_text_mut`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextMetrics {
    pub width: u32,
    pub height: u32,
    pub offset_x: i32,
    pub offset_y: i32,
}

/// Measure the ink bounds of `text` at the given font and scale.
pub fn measure_text(font: &impl Font, scale: PxScale, text: &str) -> TextMetrics {
    let scaled = font.as_scaled(scale);
    let mut caret = 0.0f32;
    let mut last: Option<GlyphId> = None;
    let mut bounds: Option<(f32, f32, f32, f32)> = None;

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(glyph_id);
        let Some(outlined) = scaled.outline_glyph(glyph) else {
            continue;
        };
        if let Some(prev) = last {
            caret += scaled.kern(glyph_id, prev);
        }
        last = Some(glyph_id);

        let bb = outlined.px_bounds();
        bounds = Some(match bounds {
            None => (bb.min.x, bb.min.y, bb.max.x, bb.max.y),
            Some((x0, y0, x1, y1)) => (
                x0.min(bb.min.x),
                y0.min(bb.min.y),
                x1.max(bb.max.x),
                y1.max(bb.max.y),
            ),
        });
    }

    match bounds {
        Some((x0, y0, x1, y1)) => TextMetrics {
            width: (x1 - x0).round().max(0.0) as u32,
            height: (y1 - y0).round().max(0.0) as u32,
            offset_x: x0.round() as i32,
            offset_y: y0.round() as i32,
        },
        None => TextMetrics::default(),
    }
}

/// Top-left corner of the ink box so it sits `margin` pixels inside the
/// bottom-right corner of a `width` x `height` image.
///
/// May go negative when the text is wider or taller than the image; the
/// overflowing glyph pixels are clipped.
pub fn bottom_right_anchor(
    width: u32,
    height: u32,
    metrics: TextMetrics,
    margin: u32,
) -> (i32, i32) {
    let x = width as i64 - i64::from(metrics.width) - i64::from(margin);
    let y = height as i64 - i64::from(metrics.height) - i64::from(margin);
    (x as i32, y as i32)
}

/// Draw `text` with its ink box's top-left corner at `(x, y)`.
///
/// Plain glyph fill: no background box, no outline.
pub fn draw_text_at(
    img: &mut RgbaImage,
    font: &impl Font,
    scale: PxScale,
    metrics: TextMetrics,
    (x, y): (i32, i32),
    text: &str,
    color: Rgba<u8>,
) {
    draw_text_mut(
        img,
        color,
        x - metrics.offset_x,
        y - metrics.offset_y,
        scale,
        font,
        text,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::{FontSource, StampFont};

    fn font() -> StampFont {
        StampFont::load(&FontSource::Bundled, 48.0).unwrap()
    }

    #[test]
    fn empty_text_has_no_extent() {
        let f = font();
        assert_eq!(measure_text(f.font(), f.scale(), ""), TextMetrics::default());
        assert_eq!(measure_text(f.font(), f.scale(), "   ").width, 0);
    }

    #[test]
    fn measurement_is_deterministic() {
        let f = font();
        let a = measure_text(f.font(), f.scale(), "14 Feb 2024, 10:24:59");
        let b = measure_text(f.font(), f.scale(), "14 Feb 2024, 10:24:59");
        assert_eq!(a, b);
        assert!(a.width > a.height);
        assert!(a.height > 0);
    }

    #[test]
    fn longer_text_is_wider() {
        let f = font();
        let short = measure_text(f.font(), f.scale(), "10:24");
        let long = measure_text(f.font(), f.scale(), "10:24:59");
        assert!(long.width > short.width);
    }

    #[test]
    fn anchor_respects_margin() {
        let metrics = TextMetrics {
            width: 100,
            height: 20,
            offset_x: 0,
            offset_y: 0,
        };
        assert_eq!(bottom_right_anchor(500, 300, metrics, STAMP_MARGIN), (390, 270));
    }

    #[test]
    fn anchor_goes_negative_for_oversized_text() {
        let metrics = TextMetrics {
            width: 100,
            height: 20,
            ..TextMetrics::default()
        };
        assert_eq!(bottom_right_anchor(50, 15, metrics, STAMP_MARGIN), (-60, -15));
    }

    #[test]
    fn drawn_ink_stays_inside_measured_box() {
        let f = font();
        let text = "14 Feb 2024, 10:24:59";
        let metrics = measure_text(f.font(), f.scale(), text);
        let (w, h) = (metrics.width + 40, metrics.height + 40);
        let mut img = RgbaImage::from_pixel(w, h, Rgba([0, 0, 0, 255]));
        let anchor = bottom_right_anchor(w, h, metrics, STAMP_MARGIN);
        draw_text_at(
            &mut img,
            f.font(),
            f.scale(),
            metrics,
            anchor,
            text,
            Rgba([255, 255, 255, 255]),
        );

        let mut lit = 0;
        for (px, py, p) in img.enumerate_pixels() {
            if p.0[0] > 0 {
                lit += 1;
                assert!(px as i32 >= anchor.0 && px < w - STAMP_MARGIN, "x={px}");
                assert!(py as i32 >= anchor.1 && py < h - STAMP_MARGIN, "y={py}");
            }
        }
        assert!(lit > 0, "no glyph pixels drawn");
    }
}
