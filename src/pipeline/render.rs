//! Page rendering: the fixed visual transform applied to every kept page.
//!
//! Teletext frames arrive as low-resolution colour images designed for a
//! CRT. E-reader displays want the opposite: high-contrast black-on-white.
//! The transform is a fixed four-step sequence — grayscale, binarise,
//! invert, stamp — with no configuration beyond the threshold and footer
//! height, and it is fully deterministic: the same input image yields
//! byte-identical output on every run.

use crate::error::CaptureError;
use crate::pipeline::font::FooterFont;
use image::{DynamicImage, GrayImage, Luma};
use std::path::Path;
use tracing::debug;

/// Binarise in place: luminance *strictly greater* than `threshold`
/// becomes white (255), everything else black (0).
pub fn binarize(img: &mut GrayImage, threshold: u8) {
    for px in img.pixels_mut() {
        px.0[0] = if px.0[0] > threshold { 255 } else { 0 };
    }
}

/// Apply the full transform to a decoded page.
///
/// Steps, in order:
/// 1. collapse to single-channel luminance
/// 2. binarise at `threshold` ([`binarize`])
/// 3. invert polarity (broadcast teletext is light-on-dark; e-readers
///    read better dark-on-light)
/// 4. extend the canvas by `footer_height` white pixels at the bottom
/// 5. stamp `"Page {page}"` in black, centered horizontally across the
///    canvas and vertically within the strip
pub fn render_page(
    img: &DynamicImage,
    page: u32,
    threshold: u8,
    footer_height: u32,
    font: &FooterFont,
) -> GrayImage {
    let mut gray = img.to_luma8();
    binarize(&mut gray, threshold);
    image::imageops::invert(&mut gray);

    let (w, h) = gray.dimensions();
    let mut canvas = GrayImage::from_pixel(w, h + footer_height, Luma([255]));
    image::imageops::replace(&mut canvas, &gray, 0, 0);

    let label = format!("Page {page}");
    let (text_w, text_h) = font.measure(&label);
    let x = (w.saturating_sub(text_w) / 2) as i32;
    let y = (h + footer_height.saturating_sub(text_h) / 2) as i32;
    font.draw(&mut canvas, x, y, &label);

    debug!("Rendered page {} → {}x{} px", page, w, h + footer_height);
    canvas
}

/// Write a rendered page to disk as PNG.
pub fn write_png(img: &GrayImage, path: &Path) -> Result<(), CaptureError> {
    img.save(path).map_err(|e| CaptureError::PageWrite {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}
