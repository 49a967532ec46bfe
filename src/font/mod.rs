//! # Font Management
//!
//! Font handles, text measurement and glyph drawing for the raster renderer.
//!
//! A [`Font`] is font data at a pixel size. The data is either a TrueType or
//! OpenType face ([`CustomFont`], measured with ttf-parser and rasterized with
//! swash) or the [`BuiltinFont`] bitmap face that every fallback chain ends
//! with. Both measure the same way: the pen starts at x = 0 on a line whose
//! top is the font's ascender. Horizontally the box runs from the pen origin
//! to the final pen position (wider if ink overhangs); vertically it is the
//! ink extent.

pub mod builtin;
pub mod resolve;

use std::sync::Arc;

use image::RgbImage;
use swash::scale::{image::Content, Render, ScaleContext, Source};
use swash::zeno::{Format, Vector};

pub use builtin::BuiltinFont;
pub use resolve::{resolve_fonts, resolve_with, FontSource, ResolvedFonts};

use crate::style::Rgb;

/// Ink extents of a line relative to its anchor (pen start, ascender line).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    has_ink: bool,
}

impl TextBounds {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Grow to cover an ink rectangle.
    pub fn include(&mut self, left: f32, top: f32, right: f32, bottom: f32) {
        if self.has_ink {
            self.left = self.left.min(left);
            self.top = self.top.min(top);
            self.right = self.right.max(right);
            self.bottom = self.bottom.max(bottom);
        } else {
            *self = Self {
                left,
                top,
                right,
                bottom,
                has_ink: true,
            };
        }
    }

    /// Span the pen origin through the final pen position, so leading and
    /// trailing spaces both count toward width. A line without ink has zero
    /// height.
    pub fn with_advance(mut self, advance: f32) -> Self {
        self.left = if self.has_ink { self.left.min(0.0) } else { 0.0 };
        self.right = self.right.max(advance);
        self
    }

    pub fn has_ink(&self) -> bool {
        self.has_ink
    }

    /// Width in whole pixels.
    pub fn width(&self) -> u32 {
        (self.right - self.left).max(0.0).ceil() as u32
    }

    /// Height in whole pixels.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0.0).ceil() as u32
    }
}

/// A parsed TrueType/OpenType face. Cheap to clone.
#[derive(Clone)]
pub struct CustomFont {
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: u16,
    ascender: i16,
}

impl std::fmt::Debug for CustomFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomFont")
            .field("data_len", &self.data.len())
            .field("index", &self.index)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

impl CustomFont {
    /// Parse face `index` of `data`. `None` if either ttf-parser or swash
    /// rejects it.
    pub fn from_bytes(data: Vec<u8>, index: u32) -> Option<Self> {
        let (units_per_em, ascender) = {
            let face = ttf_parser::Face::parse(&data, index).ok()?;
            (face.units_per_em(), face.ascender())
        };
        swash::FontRef::from_index(&data, index as usize)?;
        if units_per_em == 0 {
            return None;
        }
        Some(Self {
            data: Arc::new(data),
            index,
            units_per_em,
            ascender,
        })
    }

    fn scale(&self, size: f32) -> f32 {
        size / self.units_per_em as f32
    }

    /// Glyph IDs with their pen offsets, plus the final pen position.
    fn place_glyphs(
        &self,
        face: &ttf_parser::Face<'_>,
        text: &str,
        size: f32,
    ) -> (Vec<(u16, f32)>, f32) {
        let scale = self.scale(size);
        let mut pen = 0.0;
        let mut placed = Vec::with_capacity(text.len());
        for ch in text.chars() {
            let glyph_id = face.glyph_index(ch).unwrap_or(ttf_parser::GlyphId(0));
            placed.push((glyph_id.0, pen));
            pen += face.glyph_hor_advance(glyph_id).unwrap_or(0) as f32 * scale;
        }
        (placed, pen)
    }

    pub fn measure(&self, text: &str, size: f32) -> TextBounds {
        let Ok(face) = ttf_parser::Face::parse(&self.data, self.index) else {
            return TextBounds::empty();
        };
        let scale = self.scale(size);
        let ascender = self.ascender as f32;
        let (placed, advance) = self.place_glyphs(&face, text, size);

        let mut bounds = TextBounds::empty();
        for (glyph_id, pen) in placed {
            if let Some(rect) = face.glyph_bounding_box(ttf_parser::GlyphId(glyph_id)) {
                bounds.include(
                    pen + rect.x_min as f32 * scale,
                    (ascender - rect.y_max as f32) * scale,
                    pen + rect.x_max as f32 * scale,
                    (ascender - rect.y_min as f32) * scale,
                );
            }
        }
        bounds.with_advance(advance)
    }

    /// Draw `text` with the pen starting at x and the ascender line at y.
    pub fn draw(
        &self,
        canvas: &mut RgbImage,
        x: f32,
        y: f32,
        text: &str,
        size: f32,
        color: Rgb,
    ) {
        let Ok(face) = ttf_parser::Face::parse(&self.data, self.index) else {
            return;
        };
        let Some(font_ref) = swash::FontRef::from_index(&self.data, self.index as usize) else {
            return;
        };
        let baseline = (y + self.ascender as f32 * self.scale(size)).round() as i64;
        let (placed, _) = self.place_glyphs(&face, text, size);

        let mut context = ScaleContext::new();
        let mut scaler = context.builder(font_ref).size(size).hint(true).build();

        for (glyph_id, pen) in placed {
            let origin = x + pen;
            let whole = origin.floor();
            let Some(image) = Render::new(&[Source::Outline])
                .format(Format::Alpha)
                .offset(Vector::new(origin - whole, 0.0))
                .render(&mut scaler, glyph_id)
            else {
                continue;
            };
            if !matches!(image.content, Content::Mask) {
                continue;
            }

            let left = whole as i64 + image.placement.left as i64;
            let top = baseline - image.placement.top as i64;
            let width = image.placement.width as usize;
            for (i, coverage) in image.data.iter().enumerate() {
                if *coverage == 0 || width == 0 {
                    continue;
                }
                let px = left + (i % width) as i64;
                let py = top + (i / width) as i64;
                blend(canvas, px, py, *coverage, color);
            }
        }
    }
}

/// Which face a [`Font`] draws with.
#[derive(Debug, Clone)]
pub enum FontData {
    Builtin,
    Custom(CustomFont),
}

/// Font data at a pixel size. This is the handle the renderer measures and
/// draws with.
#[derive(Debug, Clone)]
pub struct Font {
    data: FontData,
    size: f32,
}

impl Font {
    pub fn new(data: FontData, size: f32) -> Self {
        Self { data, size }
    }

    pub fn builtin(size: f32) -> Self {
        Self::new(FontData::Builtin, size)
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self.data, FontData::Builtin)
    }

    pub fn measure(&self, text: &str) -> TextBounds {
        match &self.data {
            FontData::Builtin => BuiltinFont::for_size(self.size).measure(text),
            FontData::Custom(font) => font.measure(text, self.size),
        }
    }

    pub fn draw(&self, canvas: &mut RgbImage, x: f32, y: f32, text: &str, color: Rgb) {
        match &self.data {
            FontData::Builtin => BuiltinFont::for_size(self.size).draw(canvas, x, y, text, color),
            FontData::Custom(font) => font.draw(canvas, x, y, text, self.size, color),
        }
    }
}

/// Blend `color` over the pixel at (x, y) with 8-bit coverage. Off-canvas
/// pixels are ignored.
pub(crate) fn blend(canvas: &mut RgbImage, x: i64, y: i64, coverage: u8, color: Rgb) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    let a = coverage as u32;
    for (channel, fg) in pixel.0.iter_mut().zip([color.r, color.g, color.b]) {
        let bg = *channel as u32;
        *channel = ((fg as u32 * a + bg * (255 - a) + 127) / 255) as u8;
    }
}

pub(crate) fn fill_rect(canvas: &mut RgbImage, x: i64, y: i64, w: i64, h: i64, color: Rgb) {
    for py in y..y + h {
        for px in x..x + w {
            blend(canvas, px, py, 255, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TUFFY: &[u8] = include_bytes!("../../tests/fonts/Tuffy.ttf");

    fn tuffy() -> CustomFont {
        CustomFont::from_bytes(TUFFY.to_vec(), 0).expect("fixture font should parse")
    }

    #[test]
    fn test_bounds_union() {
        let mut b = TextBounds::empty();
        b.include(2.0, 3.0, 5.0, 9.0);
        b.include(4.0, 1.0, 8.5, 7.0);
        assert!(b.has_ink());
        assert_eq!(b.width(), 7);
        assert_eq!(b.height(), 8);
    }

    #[test]
    fn test_advance_extends_width() {
        let mut b = TextBounds::empty();
        b.include(1.0, 0.0, 4.0, 2.0);
        let b = b.with_advance(10.0);
        assert_eq!(b.width(), 10);
    }

    #[test]
    fn test_leading_space_counts_toward_width() {
        let mut b = TextBounds::empty();
        b.include(30.0, 2.0, 36.0, 8.0);
        let b = b.with_advance(40.0);
        assert_eq!(b.left, 0.0);
        assert_eq!(b.width(), 40);
    }

    #[test]
    fn test_empty_bounds() {
        let b = TextBounds::empty().with_advance(0.0);
        assert_eq!(b.width(), 0);
        assert_eq!(b.height(), 0);
    }

    #[test]
    fn test_blend_full_and_partial() {
        let mut canvas = RgbImage::from_pixel(2, 1, image::Rgb([0, 0, 0]));
        blend(&mut canvas, 0, 0, 255, Rgb::new(200, 100, 50));
        blend(&mut canvas, 1, 0, 128, Rgb::new(200, 100, 50));
        assert_eq!(canvas.get_pixel(0, 0).0, [200, 100, 50]);
        assert_eq!(canvas.get_pixel(1, 0).0, [100, 50, 25]);
        // Off-canvas writes are dropped.
        blend(&mut canvas, -1, 0, 255, Rgb::new(1, 1, 1));
        blend(&mut canvas, 2, 0, 255, Rgb::new(1, 1, 1));
    }

    #[test]
    fn test_custom_font_rejects_garbage() {
        assert!(CustomFont::from_bytes(vec![0, 1, 2, 3], 0).is_none());
        assert!(CustomFont::from_bytes(Vec::new(), 0).is_none());
    }

    #[test]
    fn test_builtin_font_handle() {
        let font = Font::builtin(16.0);
        assert!(font.is_builtin());
        assert_eq!(font.size(), 16.0);
        assert_eq!(font.measure("ab").width(), font.measure("a").width() + 12);
    }

    #[test]
    fn test_truetype_measure() {
        let bounds = tuffy().measure("Hello", 18.0);
        assert!(bounds.has_ink());
        assert!(bounds.width() > 0);
        assert!(bounds.height() > 0 && bounds.height() < 24);
    }

    #[test]
    fn test_truetype_spaces_count_toward_width() {
        let font = tuffy();
        let plain = font.measure("Hi", 18.0);
        let trailing = font.measure("Hi   ", 18.0);
        let leading = font.measure("   Hi", 18.0);
        assert!(trailing.width() > plain.width());
        assert_eq!(trailing.height(), plain.height());
        assert!(leading.width().abs_diff(trailing.width()) <= 1);

        let blank = font.measure("   ", 18.0);
        assert!(blank.width() > 0);
        assert_eq!(blank.height(), 0);
    }

    #[test]
    fn test_truetype_draw_stays_inside_measured_box() {
        let font = tuffy();
        let size = 32.0;
        let (x0, y0) = (10.0, 8.0);
        let bounds = font.measure("Hello", size);
        let mut canvas = RgbImage::from_pixel(240, 60, image::Rgb([0, 0, 0]));
        font.draw(&mut canvas, x0, y0, "Hello", size, Rgb::new(80, 250, 123));

        let mut inked = 0;
        for (x, y, pixel) in canvas.enumerate_pixels() {
            if pixel.0 == [0, 0, 0] {
                continue;
            }
            inked += 1;
            let (dx, dy) = (x as f32 - x0, y as f32 - y0);
            assert!(dx >= bounds.left - 2.0 && dx <= bounds.right + 2.0, "x {} outside", x);
            assert!(dy >= bounds.top - 2.0 && dy <= bounds.bottom + 2.0, "y {} outside", y);
        }
        assert!(inked > 0);
        assert!(canvas.pixels().any(|p| p.0 == [80, 250, 123]));
    }

    #[test]
    fn test_truetype_font_handle_scales() {
        let data = FontData::Custom(tuffy());
        let normal = Font::new(data.clone(), 18.0);
        let emphasis = Font::new(data, 22.0);
        assert!(!normal.is_builtin());
        assert!(emphasis.measure("Start").width() > normal.measure("Start").width());
    }
}
