//! Blank-page detection: is every pixel identical?
//!
//! Teletext slots without content come back as a solid single-colour
//! frame. Comparing each pixel against the first one finds those; the
//! first mismatch proves the page has content, so the scan exits early
//! on real pages and only pays the full O(pixels) cost for blanks.

use image::DynamicImage;

/// `true` when every pixel of `img` equals the first pixel.
///
/// The comparison runs over the RGBA expansion so it is independent of the
/// source colour type (palette GIFs and grayscale PNGs compare the same
/// way as RGB).
pub fn is_uniform(img: &DynamicImage) -> bool {
    let rgba = img.to_rgba8();
    let mut pixels = rgba.pixels();
    let first = match pixels.next() {
        Some(p) => p,
        // Zero-pixel image: trivially uniform, nothing to show.
        None => return true,
    };
    pixels.all(|p| p == first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(w: u32, h: u32, px: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(px)))
    }

    #[test]
    fn solid_image_is_uniform() {
        assert!(is_uniform(&solid(40, 25, [128, 128, 128, 255])));
    }

    #[test]
    fn solid_black_is_uniform() {
        assert!(is_uniform(&solid(8, 8, [0, 0, 0, 255])));
    }

    #[test]
    fn single_pixel_is_uniform() {
        assert!(is_uniform(&solid(1, 1, [7, 7, 7, 255])));
    }

    #[test]
    fn one_differing_pixel_is_not_uniform() {
        let mut img = RgbaImage::from_pixel(40, 25, Rgba([128, 128, 128, 255]));
        img.put_pixel(39, 24, Rgba([129, 128, 128, 255]));
        assert!(!is_uniform(&DynamicImage::ImageRgba8(img)));
    }

    #[test]
    fn first_pixel_differing_is_not_uniform() {
        let mut img = RgbaImage::from_pixel(40, 25, Rgba([128, 128, 128, 255]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        assert!(!is_uniform(&DynamicImage::ImageRgba8(img)));
    }

    #[test]
    fn grayscale_source_compares_like_rgb() {
        let gray = image::GrayImage::from_pixel(16, 16, image::Luma([200]));
        assert!(is_uniform(&DynamicImage::ImageLuma8(gray)));
    }
}
