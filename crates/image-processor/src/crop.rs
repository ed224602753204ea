//! Bottom-band crop with a width cap.
//!
//! The top-left origin is always preserved: width is trimmed from the right
//! edge and the crop band is removed from the bottom edge. Images are never
//! upscaled.

use image::DynamicImage;
use tracing::debug;

use crate::error::{Result, StampError};

/// Output dimensions for an image of `orig_w` x `orig_h`.
///
/// Rejects a crop band that would consume the whole image.
pub fn crop_geometry(
    name: &str,
    orig_w: u32,
    orig_h: u32,
    max_width: u32,
    crop_height: u32,
) -> Result<(u32, u32)> {
    if crop_height >= orig_h {
        return Err(StampError::InvalidCrop {
            name: name.to_string(),
            crop_height,
            image_height: orig_h,
        });
    }

    let new_w = max_width.min(orig_w);
    let new_h = orig_h - crop_height;
    debug!(orig_w, orig_h, new_w, new_h, "Computed crop geometry");
    Ok((new_w, new_h))
}

/// Keep the `width` x `height` region anchored at the top-left corner.
///
/// Takes ownership so an image that needs no trimming passes through
/// without a copy.
pub fn crop_top_left(img: DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img;
    }
    img.crop_imm(0, 0, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Image whose pixel value encodes its row, so crops can be checked.
    fn create_row_image(width: u32, height: u32) -> DynamicImage {
        let gray = GrayImage::from_fn(width, height, |_, y| Luma([(y % 256) as u8]));
        DynamicImage::ImageLuma8(gray)
    }

    #[test]
    fn test_geometry_caps_width() {
        assert_eq!(crop_geometry("a", 800, 600, 500, 76).unwrap(), (500, 524));
    }

    #[test]
    fn test_geometry_never_upscales() {
        assert_eq!(crop_geometry("a", 300, 600, 500, 76).unwrap(), (300, 524));
    }

    #[test]
    fn test_geometry_zero_crop_keeps_height() {
        assert_eq!(crop_geometry("a", 100, 80, 1054, 0).unwrap(), (100, 80));
    }

    #[test]
    fn test_geometry_rejects_crop_equal_to_height() {
        let err = crop_geometry("tall.jpg", 100, 76, 1054, 76).unwrap_err();
        assert!(matches!(
            err,
            StampError::InvalidCrop {
                crop_height: 76,
                image_height: 76,
                ..
            }
        ));
    }

    #[test]
    fn test_geometry_rejects_crop_beyond_height() {
        assert!(crop_geometry("a", 100, 50, 1054, 76).is_err());
    }

    #[test]
    fn test_geometry_one_pixel_left() {
        assert_eq!(crop_geometry("a", 10, 77, 1054, 76).unwrap(), (10, 1));
    }

    #[test]
    fn test_crop_keeps_top_rows() {
        let img = create_row_image(20, 30);
        let result = crop_top_left(img, 10, 25);
        assert_eq!((result.width(), result.height()), (10, 25));
        let luma = result.to_luma8();
        assert_eq!(luma.get_pixel(0, 0).0[0], 0);
        assert_eq!(luma.get_pixel(9, 24).0[0], 24);
    }

    #[test]
    fn test_crop_same_size_is_identity() {
        let img = create_row_image(8, 8);
        let expected = img.to_luma8();
        let result = crop_top_left(img, 8, 8);
        assert!(matches!(result, DynamicImage::ImageLuma8(_)));
        assert_eq!(result.to_luma8().as_raw(), expected.as_raw());
    }
}
