//! # Layout Engine
//!
//! Turns a loosely structured outline into an ordered list of display lines
//! drawn with box-drawing glyphs: one box per numbered main point, its
//! sub-points nested inside, and a down-arrow between consecutive boxes.
//!
//! ```text
//! ┌────────────
//!    1. Start
//! │   • Detail
//! └────────────
//!
//!       ↓
//!
//! ┌──────────
//!    2. End
//! └──────────
//! ```
//!
//! Parsing is a two-state machine. `OutsideBox` emits stray text as plain
//! lines; a main point moves to `InsideBox`, which collects sub-points until
//! the next main point or the end of input closes the box. Every emitted line
//! carries its [`Role`], so the renderer never has to re-derive what a line is
//! from the glyphs it contains.

pub mod classify;
pub mod clean;

use serde::Serialize;

use self::classify::{classify, LineKind};
use self::clean::clean;

pub const TOP_LEFT: char = '┌';
pub const BOTTOM_LEFT: char = '└';
pub const HORIZONTAL: char = '─';
pub const VERTICAL: char = '│';
pub const BULLET: char = '•';
pub const DOWN_ARROW: char = '↓';

/// Interior padding added to the main-point text length to get a box's width.
const BOX_PADDING: usize = 4;
/// Indent applied to lines outside any box.
const PLAIN_INDENT: &str = "    ";

/// The display classification of a line. Drives font, color and centering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Role {
    BoxTop,
    BoxBottom,
    MainPointText,
    SubPointText,
    Arrow,
    Plain,
    /// Empty spacer line around an arrow.
    Blank,
}

impl Role {
    /// Main-point text is drawn in the emphasis font and color.
    pub fn is_emphasis(self) -> bool {
        matches!(self, Role::MainPointText)
    }

    /// Borders and arrows center on the full canvas. Everything else shares
    /// the text column so box interiors line up.
    pub fn centers_on_canvas(self) -> bool {
        matches!(self, Role::BoxTop | Role::BoxBottom | Role::Arrow)
    }
}

/// One line of the normalized diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub text: String,
    pub role: Role,
}

impl DisplayLine {
    pub fn new(text: impl Into<String>, role: Role) -> Self {
        Self {
            text: text.into(),
            role,
        }
    }

    fn blank() -> Self {
        Self::new(String::new(), Role::Blank)
    }
}

/// Widths derived from a main point's text. Sub-points never change them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxGeometry {
    /// Number of horizontal bars in the top and bottom borders.
    pub visual_width: usize,
    /// `visual_width` plus the corner glyph.
    pub box_width: usize,
}

impl BoxGeometry {
    pub fn for_main_point(text: &str) -> Self {
        let visual_width = text.chars().count() + BOX_PADDING;
        Self {
            visual_width,
            box_width: visual_width + 1,
        }
    }

    /// Left padding that centers `text` in the box. Odd remainders go right.
    pub fn left_padding(&self, text: &str) -> usize {
        self.box_width.saturating_sub(text.chars().count()) / 2
    }
}

enum State {
    OutsideBox,
    InsideBox { main: String, subs: Vec<String> },
}

pub struct LayoutEngine;

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self
    }

    /// Lay out raw outline text. Total over any input: text without a single
    /// main point comes back as plain lines, and empty text as no lines.
    pub fn layout(&self, raw: &str) -> Vec<DisplayLine> {
        let cleaned = clean(raw);
        let mut out = Vec::new();
        let mut state = State::OutsideBox;

        for line in cleaned.lines() {
            state = match (state, classify(line)) {
                (state, LineKind::Blank) => state,
                (State::OutsideBox, LineKind::Text(text)) => {
                    out.push(DisplayLine::new(
                        format!("{}{}", PLAIN_INDENT, text),
                        Role::Plain,
                    ));
                    State::OutsideBox
                }
                (State::InsideBox { main, mut subs }, LineKind::Text(text)) => {
                    subs.push(text.to_string());
                    State::InsideBox { main, subs }
                }
                (State::OutsideBox, LineKind::MainPoint(text)) => State::InsideBox {
                    main: text.to_string(),
                    subs: Vec::new(),
                },
                (State::InsideBox { main, subs }, LineKind::MainPoint(text)) => {
                    emit_box(&mut out, &main, &subs);
                    emit_arrow(&mut out, BoxGeometry::for_main_point(&main));
                    State::InsideBox {
                        main: text.to_string(),
                        subs: Vec::new(),
                    }
                }
            };
        }

        if let State::InsideBox { main, subs } = state {
            emit_box(&mut out, &main, &subs);
        }

        log::debug!("Laid out {} display lines", out.len());
        out
    }
}

fn emit_box(out: &mut Vec<DisplayLine>, main: &str, subs: &[String]) {
    let geometry = BoxGeometry::for_main_point(main);
    let bar: String = std::iter::repeat(HORIZONTAL)
        .take(geometry.visual_width)
        .collect();

    out.push(DisplayLine::new(
        format!("{}{}", TOP_LEFT, bar),
        Role::BoxTop,
    ));
    out.push(DisplayLine::new(
        format!(" {}{}", " ".repeat(geometry.left_padding(main)), main),
        Role::MainPointText,
    ));
    for sub in subs {
        out.push(DisplayLine::new(
            sub_point_line(sub, geometry),
            Role::SubPointText,
        ));
    }
    out.push(DisplayLine::new(
        format!("{}{}", BOTTOM_LEFT, bar),
        Role::BoxBottom,
    ));
}

/// `│ ` + `  • text`, right-padded to the box's visual width. Text longer
/// than the box overflows unpadded; it is never wrapped or cut.
fn sub_point_line(text: &str, geometry: BoxGeometry) -> String {
    let indented = format!("  {} {}", BULLET, text);
    let pad = geometry
        .visual_width
        .saturating_sub(indented.chars().count());
    format!("{} {}{}", VERTICAL, indented, " ".repeat(pad))
}

fn emit_arrow(out: &mut Vec<DisplayLine>, geometry: BoxGeometry) {
    let half = " ".repeat(geometry.box_width / 2);
    out.push(DisplayLine::blank());
    out.push(DisplayLine::new(
        format!("{}{}{}", half, DOWN_ARROW, half),
        Role::Arrow,
    ));
    out.push(DisplayLine::blank());
}

/// Join display lines into the box-drawing text form of the diagram.
pub fn to_text(lines: &[DisplayLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
