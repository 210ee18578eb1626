//! Footer font: a small system TrueType face when one exists, a built-in
//! 5×7 bitmap face otherwise.
//!
//! The page label must render on every machine the capture runs on —
//! headless containers included — so font loading is infallible by
//! construction: [`FooterFont::load`] probes a fixed list of common system
//! font paths and silently falls back to the bitmap face when none of
//! them yields a parseable font. The bitmap face covers exactly the
//! characters the `"Page {N}"` label can contain.

use ab_glyph::{FontVec, PxScale};
use image::{GrayImage, Luma};
use tracing::debug;

/// Pixel height the TrueType face is rasterised at. Fits, with margin,
/// inside the 20 px footer strip.
const TTF_SCALE: f32 = 14.0;

/// Integer upscale factor for the 5×7 bitmap face (10×14 px rendered).
const BITMAP_SCALE: u32 = 2;

/// Fixed candidate paths for a small sans-serif system face.
///
/// Order matters only in that the first parseable file wins; all of these
/// render the label equally well.
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
];

/// The face used to stamp the `"Page {N}"` footer label.
pub enum FooterFont {
    /// A system TrueType face, rasterised via `ab_glyph`.
    Truetype(FontVec),
    /// The built-in 5×7 face; always available.
    Bitmap,
}

impl FooterFont {
    /// Load the preferred system face, falling back to the bitmap face.
    ///
    /// Never fails; a missing or corrupt font file just means the bitmap
    /// face is used.
    pub fn load() -> Self {
        for candidate in SYSTEM_FONT_CANDIDATES {
            if let Ok(bytes) = std::fs::read(candidate) {
                if let Ok(font) = FontVec::try_from_vec(bytes) {
                    debug!("Footer font: {}", candidate);
                    return FooterFont::Truetype(font);
                }
            }
        }
        debug!("Footer font: built-in bitmap face");
        FooterFont::Bitmap
    }

    /// Rendered size of `text` in pixels.
    pub fn measure(&self, text: &str) -> (u32, u32) {
        match self {
            FooterFont::Truetype(font) => {
                imageproc::drawing::text_size(PxScale::from(TTF_SCALE), font, text)
            }
            FooterFont::Bitmap => {
                let chars = text.chars().count() as u32;
                if chars == 0 {
                    return (0, 7 * BITMAP_SCALE);
                }
                // 5 px glyph + 1 px gap per character, no trailing gap.
                (chars * 6 * BITMAP_SCALE - BITMAP_SCALE, 7 * BITMAP_SCALE)
            }
        }
    }

    /// Draw `text` in black with its top-left corner at `(x, y)`.
    ///
    /// Pixels falling outside the canvas are clipped.
    pub fn draw(&self, canvas: &mut GrayImage, x: i32, y: i32, text: &str) {
        match self {
            FooterFont::Truetype(font) => {
                imageproc::drawing::draw_text_mut(
                    canvas,
                    Luma([0u8]),
                    x,
                    y,
                    PxScale::from(TTF_SCALE),
                    font,
                    text,
                );
            }
            FooterFont::Bitmap => draw_bitmap_text(canvas, x, y, text),
        }
    }
}

// ── Built-in 5×7 face ────────────────────────────────────────────────────

/// Glyph rows, low 5 bits per row, top row first.
///
/// Covers the label alphabet: `P a g e`, space, and the digits.
fn bitmap_glyph(c: char) -> Option<[u8; 7]> {
    let rows = match c {
        ' ' => [0, 0, 0, 0, 0, 0, 0],
        'P' => [
            0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000,
        ],
        'a' => [
            0b00000, 0b00000, 0b01110, 0b00001, 0b01111, 0b10001, 0b01111,
        ],
        'g' => [
            0b00000, 0b01111, 0b10001, 0b10001, 0b01111, 0b00001, 0b01110,
        ],
        'e' => [
            0b00000, 0b00000, 0b01110, 0b10001, 0b11111, 0b10000, 0b01110,
        ],
        '0' => [
            0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110,
        ],
        '1' => [
            0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110,
        ],
        '2' => [
            0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111,
        ],
        '3' => [
            0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110,
        ],
        '4' => [
            0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010,
        ],
        '5' => [
            0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110,
        ],
        '6' => [
            0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110,
        ],
        '7' => [
            0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000,
        ],
        '8' => [
            0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110,
        ],
        '9' => [
            0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100,
        ],
        _ => return None,
    };
    Some(rows)
}

fn draw_bitmap_text(canvas: &mut GrayImage, x: i32, y: i32, text: &str) {
    let mut pen_x = x;
    let advance = (6 * BITMAP_SCALE) as i32;

    for c in text.chars() {
        // Unknown characters advance the pen but draw nothing; the label
        // alphabet is closed, so this only matters for misuse.
        if let Some(rows) = bitmap_glyph(c) {
            for (row_idx, row) in rows.iter().enumerate() {
                for col in 0..5u32 {
                    if row & (1 << (4 - col)) == 0 {
                        continue;
                    }
                    for dy in 0..BITMAP_SCALE {
                        for dx in 0..BITMAP_SCALE {
                            let px = pen_x + (col * BITMAP_SCALE + dx) as i32;
                            let py = y + (row_idx as u32 * BITMAP_SCALE + dy) as i32;
                            if px >= 0
                                && py >= 0
                                && (px as u32) < canvas.width()
                                && (py as u32) < canvas.height()
                            {
                                canvas.put_pixel(px as u32, py as u32, Luma([0u8]));
                            }
                        }
                    }
                }
            }
        }
        pen_x += advance;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_never_panics() {
        // On machines without any candidate font this exercises the
        // fallback; with one it exercises the TTF path. Either way it
        // must return a usable face.
        let font = FooterFont::load();
        let (w, h) = font.measure("Page 102");
        assert!(w > 0);
        assert!(h > 0);
    }

    #[test]
    fn bitmap_measure_is_linear_in_length() {
        let font = FooterFont::Bitmap;
        let (w1, h1) = font.measure("1");
        let (w3, h3) = font.measure("123");
        assert_eq!(h1, h3);
        assert_eq!(w3, w1 + 2 * 6 * BITMAP_SCALE);
    }

    #[test]
    fn bitmap_fits_default_footer_strip() {
        let (_, h) = FooterFont::Bitmap.measure("Page 169");
        assert!(h <= 20, "bitmap face must fit the 20 px strip, got {h}");
    }

    #[test]
    fn bitmap_covers_label_alphabet() {
        for c in "Page 0123456789".chars() {
            assert!(bitmap_glyph(c).is_some(), "missing glyph for {c:?}");
        }
    }

    #[test]
    fn bitmap_draw_marks_pixels_black() {
        let mut canvas = GrayImage::from_pixel(60, 20, Luma([255]));
        FooterFont::Bitmap.draw(&mut canvas, 2, 3, "42");
        assert!(canvas.pixels().any(|p| p.0[0] == 0));
    }

    #[test]
    fn bitmap_draw_clips_out_of_bounds() {
        let mut canvas = GrayImage::from_pixel(4, 4, Luma([255]));
        // Way off-canvas on all sides; must not panic.
        FooterFont::Bitmap.draw(&mut canvas, -30, -30, "Page 100");
        FooterFont::Bitmap.draw(&mut canvas, 100, 100, "Page 100");
    }
}
