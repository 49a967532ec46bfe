//! # Raster Renderer
//!
//! Draws laid-out display lines onto a bitmap in two passes.
//!
//! 1. **Measure.** Every line is measured in its role's font. The widest
//!    line and the summed heights fix the canvas size, which is capped at a
//!    maximum width and floored at a minimum width and height.
//! 2. **Draw.** Lines are placed top to bottom. Borders and arrows center on
//!    the canvas. All other lines start at a shared text column, centered on
//!    the widest measured line, so box interiors align with each other.
//!
//! The measure pass produces a list of [`DrawOp`]s, and the draw pass
//! consumes them without measuring again.

pub mod encode;

use image::RgbImage;

use crate::error::FlowError;
use crate::font::{resolve_fonts, ResolvedFonts};
use crate::layout::{DisplayLine, Role};
use crate::style::{RenderConfig, Rgb};

/// Measured size of one line in whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineMetrics {
    pub width: u32,
    pub height: u32,
}

/// Result of the measure pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub lines: Vec<LineMetrics>,
    pub max_text_width: u32,
    /// Sum of line heights, plus one gap after every line.
    pub total_text_height: u32,
    pub width: u32,
    pub height: u32,
}

/// One positioned line, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawOp {
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub role: Role,
    pub color: Rgb,
}

/// Pass 1: measure each line in its role's font and size the canvas.
pub fn measure(
    lines: &[DisplayLine],
    fonts: &ResolvedFonts,
    config: &RenderConfig,
) -> Measurement {
    let metrics: Vec<LineMetrics> = lines
        .iter()
        .map(|line| {
            let bounds = fonts.for_role(line.role).measure(&line.text);
            LineMetrics {
                width: bounds.width(),
                height: bounds.height(),
            }
        })
        .collect();

    let max_text_width = metrics.iter().map(|m| m.width).max().unwrap_or(0);
    let total_text_height = metrics
        .iter()
        .fold(0u32, |sum, m| {
            sum.saturating_add(m.height)
                .saturating_add(config.line_spacing)
        });

    // Sizes come from user config, so every sum saturates instead of wrapping.
    let margins = config.padding.saturating_mul(2);
    let natural_width = max_text_width.saturating_add(margins);
    if natural_width > config.max_width {
        log::warn!(
            "Diagram is {}px wide, capping canvas at {}px",
            natural_width,
            config.max_width
        );
    }
    let width = natural_width.min(config.max_width).max(config.min_width);

    let natural_height = if metrics.is_empty() {
        0
    } else {
        total_text_height
            .saturating_sub(config.line_spacing)
            .saturating_add(margins)
    };
    let height = natural_height.max(config.min_height());

    log::debug!(
        "Measured {} lines: text {}x{}, canvas {}x{}",
        metrics.len(),
        max_text_width,
        total_text_height,
        width,
        height
    );

    Measurement {
        lines: metrics,
        max_text_width,
        total_text_height,
        width,
        height,
    }
}

/// Position every line against the measured canvas.
pub fn plan(
    lines: &[DisplayLine],
    measurement: &Measurement,
    config: &RenderConfig,
) -> Vec<DrawOp> {
    let canvas_width = measurement.width as f32;
    let column_x = (canvas_width - measurement.max_text_width as f32) / 2.0;
    let mut y = config.padding as f32;

    lines
        .iter()
        .zip(&measurement.lines)
        .map(|(line, metrics)| {
            let x = if line.role.centers_on_canvas() {
                (canvas_width - metrics.width as f32) / 2.0
            } else {
                column_x
            };
            let color = if line.role.is_emphasis() {
                config.emphasis_accent
            } else {
                config.accent
            };
            let op = DrawOp {
                x,
                y,
                text: line.text.clone(),
                role: line.role,
                color,
            };
            y += metrics.height.saturating_add(config.line_spacing) as f32;
            op
        })
        .collect()
}

/// Pass 2: fill the background and draw every planned line.
pub fn paint(
    ops: &[DrawOp],
    fonts: &ResolvedFonts,
    measurement: &Measurement,
    config: &RenderConfig,
) -> RgbImage {
    let mut canvas = RgbImage::from_pixel(
        measurement.width,
        measurement.height,
        config.background.to_pixel(),
    );
    for op in ops {
        if op.text.is_empty() {
            continue;
        }
        fonts
            .for_role(op.role)
            .draw(&mut canvas, op.x, op.y, &op.text, op.color);
    }
    canvas
}

/// Renders display lines with a fixed set of resolved fonts.
pub struct Renderer<'a> {
    fonts: ResolvedFonts,
    config: &'a RenderConfig,
}

impl<'a> Renderer<'a> {
    /// Resolve fonts for `config`. Never fails; missing fonts degrade to the
    /// built-in bitmap font.
    pub fn new(config: &'a RenderConfig) -> Self {
        Self {
            fonts: resolve_fonts(&config.fonts),
            config,
        }
    }

    pub fn with_fonts(fonts: ResolvedFonts, config: &'a RenderConfig) -> Self {
        Self { fonts, config }
    }

    pub fn fonts(&self) -> &ResolvedFonts {
        &self.fonts
    }

    pub fn measure(&self, lines: &[DisplayLine]) -> Measurement {
        measure(lines, &self.fonts, self.config)
    }

    pub fn render_image(&self, lines: &[DisplayLine]) -> RgbImage {
        let measurement = self.measure(lines);
        let ops = plan(lines, &measurement, self.config);
        paint(&ops, &self.fonts, &measurement, self.config)
    }

    pub fn render_png(&self, lines: &[DisplayLine]) -> Result<Vec<u8>, FlowError> {
        encode::encode_png(&self.render_image(lines))
    }

    /// Render to a `data:image/png;base64,` URI.
    pub fn render(&self, lines: &[DisplayLine]) -> Result<String, FlowError> {
        Ok(encode::to_data_uri(&self.render_png(lines)?))
    }
}
