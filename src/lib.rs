//! # Flowtext
//!
//! Turns a free-form outline of steps into a rendered flowchart image.
//!
//! The outline is first normalized into a box-drawing text diagram, one box
//! per numbered step with its details nested inside and a down-arrow between
//! boxes. That diagram is then rasterized line by line with real font
//! metrics and returned as a PNG data URI.
//!
//! ## Architecture
//!
//! ```text
//! Outline text
//!       ↓
//!   [outline]   — Group into sections, build a flow description
//!       ↓
//!   [generate]  — Expand via the text-generation service (optional)
//!       ↓
//!   [layout]    — Clean, classify, emit boxes and arrows with roles
//!       ↓
//!   [raster]    — Measure, size the canvas, draw, encode PNG
//! ```
//!
//! Layout and rendering are pure functions of their input. Only the
//! generation step can fail outright.

pub mod error;
pub mod font;
pub mod generate;
pub mod layout;
pub mod outline;
pub mod raster;
pub mod style;

pub use error::FlowError;
pub use generate::{FlowGenerator, VeniceClient};
pub use layout::{DisplayLine, LayoutEngine, Role};
pub use raster::Renderer;
pub use style::RenderConfig;

/// Lay out raw outline text as display lines.
pub fn layout(raw: &str) -> Vec<DisplayLine> {
    LayoutEngine::new().layout(raw)
}

/// Lay out raw outline text and return the box-drawing diagram as text.
pub fn flowchart_text(raw: &str) -> String {
    layout::to_text(&layout(raw))
}

/// Render display lines to a `data:image/png;base64,` URI.
pub fn render(lines: &[DisplayLine], config: &RenderConfig) -> Result<String, FlowError> {
    Renderer::new(config).render(lines)
}

/// Render display lines to PNG bytes.
pub fn render_png(lines: &[DisplayLine], config: &RenderConfig) -> Result<Vec<u8>, FlowError> {
    Renderer::new(config).render_png(lines)
}

/// Pre-format an outline, expand it with `generator`, lay it out and
/// render it. A generation failure ends the request with no image.
pub fn generate_flowchart(
    outline_text: &str,
    generator: &dyn FlowGenerator,
    config: &RenderConfig,
) -> Result<String, FlowError> {
    let description = outline::describe_flow(outline_text);
    let generated = generator.generate(&description)?;
    render(&layout(&generated), config)
}
