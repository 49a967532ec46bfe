//! # Built-in Bitmap Font
//!
//! The last entry in every fallback chain. A 5×8 column-major bitmap font on
//! a 6-pixel advance covering printable ASCII plus the diagram glyphs, scaled
//! by a whole-pixel factor. It needs no font files, so resolution can always
//! end here.

use image::RgbImage;

use super::{fill_rect, TextBounds};
use crate::style::Rgb;

/// Rows per glyph cell. Bit 0 of a column byte is the top row.
const CELL_HEIGHT: u32 = 8;
/// Columns per glyph cell, including the one-column gap.
const CELL_ADVANCE: u32 = 6;

type Glyph = [u8; CELL_ADVANCE as usize];

const NOTDEF: Glyph = [0x7F, 0x41, 0x41, 0x41, 0x7F, 0x00];

// Printable ASCII, 0x20..=0x7E, five columns each.
#[rustfmt::skip]
const ASCII: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], [0x00, 0x00, 0x5F, 0x00, 0x00], [0x00, 0x07, 0x00, 0x07, 0x00],
    [0x14, 0x7F, 0x14, 0x7F, 0x14], [0x24, 0x2A, 0x7F, 0x2A, 0x12], [0x23, 0x13, 0x08, 0x64, 0x62],
    [0x36, 0x49, 0x56, 0x20, 0x50], [0x00, 0x08, 0x07, 0x03, 0x00], [0x00, 0x1C, 0x22, 0x41, 0x00],
    [0x00, 0x41, 0x22, 0x1C, 0x00], [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], [0x08, 0x08, 0x3E, 0x08, 0x08],
    [0x00, 0x80, 0x70, 0x30, 0x00], [0x08, 0x08, 0x08, 0x08, 0x08], [0x00, 0x00, 0x60, 0x60, 0x00],
    [0x20, 0x10, 0x08, 0x04, 0x02], [0x3E, 0x51, 0x49, 0x45, 0x3E], [0x00, 0x42, 0x7F, 0x40, 0x00],
    [0x72, 0x49, 0x49, 0x49, 0x46], [0x21, 0x41, 0x49, 0x4D, 0x33], [0x18, 0x14, 0x12, 0x7F, 0x10],
    [0x27, 0x45, 0x45, 0x45, 0x39], [0x3C, 0x4A, 0x49, 0x49, 0x31], [0x41, 0x21, 0x11, 0x09, 0x07],
    [0x36, 0x49, 0x49, 0x49, 0x36], [0x46, 0x49, 0x49, 0x29, 0x1E], [0x00, 0x00, 0x14, 0x00, 0x00],
    [0x00, 0x40, 0x34, 0x00, 0x00], [0x00, 0x08, 0x14, 0x22, 0x41], [0x14, 0x14, 0x14, 0x14, 0x14],
    [0x00, 0x41, 0x22, 0x14, 0x08], [0x02, 0x01, 0x59, 0x09, 0x06], [0x3E, 0x41, 0x5D, 0x59, 0x4E],
    [0x7C, 0x12, 0x11, 0x12, 0x7C], [0x7F, 0x49, 0x49, 0x49, 0x36], [0x3E, 0x41, 0x41, 0x41, 0x22],
    [0x7F, 0x41, 0x41, 0x41, 0x3E], [0x7F, 0x49, 0x49, 0x49, 0x41], [0x7F, 0x09, 0x09, 0x09, 0x01],
    [0x3E, 0x41, 0x41, 0x51, 0x73], [0x7F, 0x08, 0x08, 0x08, 0x7F], [0x00, 0x41, 0x7F, 0x41, 0x00],
    [0x20, 0x40, 0x41, 0x3F, 0x01], [0x7F, 0x08, 0x14, 0x22, 0x41], [0x7F, 0x40, 0x40, 0x40, 0x40],
    [0x7F, 0x02, 0x1C, 0x02, 0x7F], [0x7F, 0x04, 0x08, 0x10, 0x7F], [0x3E, 0x41, 0x41, 0x41, 0x3E],
    [0x7F, 0x09, 0x09, 0x09, 0x06], [0x3E, 0x41, 0x51, 0x21, 0x5E], [0x7F, 0x09, 0x19, 0x29, 0x46],
    [0x26, 0x49, 0x49, 0x49, 0x32], [0x03, 0x01, 0x7F, 0x01, 0x03], [0x3F, 0x40, 0x40, 0x40, 0x3F],
    [0x1F, 0x20, 0x40, 0x20, 0x1F], [0x3F, 0x40, 0x38, 0x40, 0x3F], [0x63, 0x14, 0x08, 0x14, 0x63],
    [0x03, 0x04, 0x78, 0x04, 0x03], [0x61, 0x59, 0x49, 0x4D, 0x43], [0x00, 0x7F, 0x41, 0x41, 0x41],
    [0x02, 0x04, 0x08, 0x10, 0x20], [0x00, 0x41, 0x41, 0x41, 0x7F], [0x04, 0x02, 0x01, 0x02, 0x04],
    [0x40, 0x40, 0x40, 0x40, 0x40], [0x00, 0x03, 0x07, 0x08, 0x00], [0x20, 0x54, 0x54, 0x78, 0x40],
    [0x7F, 0x28, 0x44, 0x44, 0x38], [0x38, 0x44, 0x44, 0x44, 0x28], [0x38, 0x44, 0x44, 0x28, 0x7F],
    [0x38, 0x54, 0x54, 0x54, 0x18], [0x00, 0x08, 0x7E, 0x09, 0x02], [0x18, 0xA4, 0xA4, 0x9C, 0x78],
    [0x7F, 0x08, 0x04, 0x04, 0x78], [0x00, 0x44, 0x7D, 0x40, 0x00], [0x20, 0x40, 0x40, 0x3D, 0x00],
    [0x7F, 0x10, 0x28, 0x44, 0x00], [0x00, 0x41, 0x7F, 0x40, 0x00], [0x7C, 0x04, 0x78, 0x04, 0x78],
    [0x7C, 0x08, 0x04, 0x04, 0x78], [0x38, 0x44, 0x44, 0x44, 0x38], [0xFC, 0x18, 0x24, 0x24, 0x18],
    [0x18, 0x24, 0x24, 0x18, 0xFC], [0x7C, 0x08, 0x04, 0x04, 0x08], [0x48, 0x54, 0x54, 0x54, 0x24],
    [0x04, 0x04, 0x3F, 0x44, 0x24], [0x3C, 0x40, 0x40, 0x20, 0x7C], [0x1C, 0x20, 0x40, 0x20, 0x1C],
    [0x3C, 0x40, 0x30, 0x40, 0x3C], [0x44, 0x28, 0x10, 0x28, 0x44], [0x4C, 0x90, 0x90, 0x90, 0x7C],
    [0x44, 0x64, 0x54, 0x4C, 0x44], [0x00, 0x08, 0x36, 0x41, 0x00], [0x00, 0x00, 0x77, 0x00, 0x00],
    [0x00, 0x41, 0x36, 0x08, 0x00], [0x02, 0x01, 0x02, 0x04, 0x02],
];

fn glyph(ch: char) -> Glyph {
    match ch {
        ' '..='~' => {
            let cols = ASCII[ch as usize - 0x20];
            [cols[0], cols[1], cols[2], cols[3], cols[4], 0x00]
        }
        // Box glyphs fill the whole advance so borders join up.
        '─' => [0x08; 6],
        '│' => [0x00, 0x00, 0xFF, 0x00, 0x00, 0x00],
        '┌' => [0x00, 0x00, 0xF8, 0x08, 0x08, 0x08],
        '└' => [0x00, 0x00, 0x0F, 0x08, 0x08, 0x08],
        '↓' => [0x10, 0x20, 0x7F, 0x20, 0x10, 0x00],
        '•' => [0x00, 0x1C, 0x1C, 0x1C, 0x00, 0x00],
        _ => NOTDEF,
    }
}

/// The bitmap font at one integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinFont {
    scale: u32,
}

impl BuiltinFont {
    /// Pick the whole-pixel scale closest to `size` for an 8-row cell.
    pub fn for_size(size: f32) -> Self {
        let scale = (size / CELL_HEIGHT as f32).round().max(1.0) as u32;
        Self { scale }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn advance(&self) -> u32 {
        CELL_ADVANCE * self.scale
    }

    /// Ink bounds of `text` with the pen at x = 0 and the cell top at y = 0.
    pub fn measure(&self, text: &str) -> TextBounds {
        let s = self.scale as f32;
        let mut bounds = TextBounds::empty();
        let mut pen = 0.0;
        for ch in text.chars() {
            let g = glyph(ch);
            for (col, bits) in g.iter().enumerate() {
                if *bits == 0 {
                    continue;
                }
                let first = bits.trailing_zeros() as f32;
                let last = (7 - bits.leading_zeros()) as f32;
                let x = pen + col as f32 * s;
                bounds.include(x, first * s, x + s, (last + 1.0) * s);
            }
            pen += self.advance() as f32;
        }
        bounds.with_advance(pen)
    }

    /// Draw `text` with the cell top-left at (x, y).
    pub fn draw(&self, canvas: &mut RgbImage, x: f32, y: f32, text: &str, color: Rgb) {
        let x0 = x.round() as i64;
        let y0 = y.round() as i64;
        let s = self.scale as i64;
        for (i, ch) in text.chars().enumerate() {
            let cell_x = x0 + i as i64 * self.advance() as i64;
            for (col, bits) in glyph(ch).iter().enumerate() {
                for row in 0..CELL_HEIGHT as i64 {
                    if bits & (1 << row) != 0 {
                        fill_rect(canvas, cell_x + col as i64 * s, y0 + row * s, s, s, color);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_from_size() {
        assert_eq!(BuiltinFont::for_size(18.0).scale(), 2);
        assert_eq!(BuiltinFont::for_size(22.0).scale(), 3);
        assert_eq!(BuiltinFont::for_size(1.0).scale(), 1);
    }

    #[test]
    fn test_every_ascii_char_has_a_glyph() {
        for ch in '!'..='~' {
            assert_ne!(glyph(ch), NOTDEF, "missing glyph for {:?}", ch);
            assert!(glyph(ch).iter().any(|c| *c != 0), "blank glyph for {:?}", ch);
        }
        assert!(glyph(' ').iter().all(|c| *c == 0));
    }

    #[test]
    fn test_unknown_char_is_notdef() {
        assert_eq!(glyph('漢'), NOTDEF);
    }

    #[test]
    fn test_space_has_width_but_no_height() {
        let font = BuiltinFont::for_size(8.0);
        let bounds = font.measure("   ");
        assert_eq!(bounds.width(), 18);
        assert_eq!(bounds.height(), 0);
    }

    #[test]
    fn test_border_spans_full_advance() {
        let font = BuiltinFont::for_size(8.0);
        let bounds = font.measure("┌──");
        assert_eq!(bounds.width(), 18);
        assert_eq!(bounds.height(), 5);
    }

    #[test]
    fn test_padded_glyph_measures_from_pen_origin() {
        let font = BuiltinFont::for_size(8.0);
        // Three cells of padding either side of the arrow.
        let bounds = font.measure("   ↓   ");
        assert_eq!(bounds.width(), 7 * 6);
        assert_eq!(bounds.width(), font.measure("───────").width());
    }

    #[test]
    fn test_measure_scales() {
        let small = BuiltinFont::for_size(8.0).measure("Hi");
        let large = BuiltinFont::for_size(16.0).measure("Hi");
        assert_eq!(large.width(), small.width() * 2);
        assert_eq!(large.height(), small.height() * 2);
    }

    #[test]
    fn test_draw_sets_pixels() {
        let font = BuiltinFont::for_size(8.0);
        let mut canvas = RgbImage::new(12, 8);
        font.draw(&mut canvas, 0.0, 0.0, "│", Rgb::new(255, 0, 0));
        // Vertical bar is column 2, all eight rows.
        for row in 0..8 {
            assert_eq!(canvas.get_pixel(2, row).0, [255, 0, 0]);
        }
        assert_eq!(canvas.get_pixel(0, 0).0, [0, 0, 0]);
    }
}
