//! # Render Configuration
//!
//! Fonts, spacing, canvas limits and colors for the raster renderer. Every
//! field has a default, so a JSON config only needs the fields it changes:
//!
//! ```json
//! { "padding": 32, "fonts": { "fontDir": "/usr/share/fonts/truetype/dejavu" } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_pixel(self) -> image::Rgb<u8> {
        image::Rgb([self.r, self.g, self.b])
    }
}

/// Dark neutral canvas background.
pub const BACKGROUND: Rgb = Rgb::new(35, 35, 35);
/// Accent color for borders, arrows and interior text.
pub const ACCENT: Rgb = Rgb::new(80, 250, 123);
/// Brighter accent for main-point text.
pub const EMPHASIS_ACCENT: Rgb = Rgb::new(120, 255, 140);

/// One place a font may be loaded from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FontCandidate {
    /// A font file. Relative paths resolve against [`FontSpec::font_dir`].
    File { path: PathBuf },
    /// A family installed on the system, looked up by name.
    System {
        family: String,
        #[serde(default)]
        bold: bool,
    },
}

impl FontCandidate {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File { path: path.into() }
    }

    pub fn system(family: impl Into<String>, bold: bool) -> Self {
        Self::System {
            family: family.into(),
            bold,
        }
    }
}

/// A normal/emphasis pair tried together.
///
/// A tier is used when its normal candidate loads. If only the emphasis
/// candidate fails, emphasis reuses the normal font at the emphasis size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontTier {
    pub normal: FontCandidate,
    pub emphasis: FontCandidate,
}

/// Font sizes and the ordered fallback chain. When no tier resolves, both
/// roles use the built-in bitmap font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FontSpec {
    /// Pixel size for everything except main-point text.
    pub normal_size: f32,
    /// Pixel size for main-point text.
    pub emphasis_size: f32,
    pub font_dir: PathBuf,
    pub tiers: Vec<FontTier>,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            normal_size: 18.0,
            emphasis_size: 22.0,
            font_dir: PathBuf::from("."),
            tiers: vec![
                FontTier {
                    normal: FontCandidate::file("DejaVuSans.ttf"),
                    emphasis: FontCandidate::file("DejaVuSans-Bold.ttf"),
                },
                FontTier {
                    normal: FontCandidate::system("Arial", false),
                    emphasis: FontCandidate::system("Arial", true),
                },
            ],
        }
    }
}

impl FontSpec {
    /// Default sizes with no tiers: always renders with the built-in font.
    pub fn builtin_only() -> Self {
        Self {
            tiers: Vec::new(),
            ..Self::default()
        }
    }

    /// Resolve a file candidate's path against the font directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.font_dir.join(path)
        }
    }
}

/// Everything the raster renderer needs besides the lines themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderConfig {
    pub fonts: FontSpec,
    /// Space around the drawn text on every side.
    pub padding: u32,
    /// Gap between consecutive lines.
    pub line_spacing: u32,
    pub max_width: u32,
    pub min_width: u32,
    /// Defaults to one normal-size line plus padding on both ends.
    pub min_height: Option<u32>,
    pub background: Rgb,
    pub accent: Rgb,
    pub emphasis_accent: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fonts: FontSpec::default(),
            padding: 20,
            line_spacing: 6,
            max_width: 1800,
            min_width: 200,
            min_height: None,
            background: BACKGROUND,
            accent: ACCENT,
            emphasis_accent: EMPHASIS_ACCENT,
        }
    }
}

impl RenderConfig {
    /// Default layout constants with the built-in font only.
    pub fn builtin() -> Self {
        Self {
            fonts: FontSpec::builtin_only(),
            ..Self::default()
        }
    }

    pub fn min_height(&self) -> u32 {
        self.min_height
            .unwrap_or_else(|| {
                let line = self.fonts.normal_size.ceil() as u32;
                line.saturating_add(self.padding.saturating_mul(2))
            })
    }

    pub fn from_json(json: &str) -> Result<Self, FlowError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, FlowError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.padding, 20);
        assert_eq!(config.line_spacing, 6);
        assert_eq!(config.max_width, 1800);
        assert_eq!(config.min_width, 200);
        assert_eq!(config.min_height(), 58);
        assert_eq!(config.fonts.tiers.len(), 2);
    }

    #[test]
    fn test_partial_json() {
        let config = RenderConfig::from_json(r#"{ "padding": 8, "fonts": { "emphasisSize": 30 } }"#)
            .unwrap();
        assert_eq!(config.padding, 8);
        assert_eq!(config.fonts.emphasis_size, 30.0);
        assert_eq!(config.fonts.normal_size, 18.0);
        assert_eq!(config.min_height(), 18 + 16);
        assert_eq!(config.accent, ACCENT);
    }

    #[test]
    fn test_candidate_json() {
        let config = RenderConfig::from_json(
            r#"{ "fonts": { "tiers": [
                { "normal": { "type": "file", "path": "Inter.ttf" },
                  "emphasis": { "type": "system", "family": "Inter", "bold": true } }
            ] } }"#,
        )
        .unwrap();
        assert_eq!(
            config.fonts.tiers[0].normal,
            FontCandidate::file("Inter.ttf")
        );
        assert_eq!(
            config.fonts.tiers[0].emphasis,
            FontCandidate::system("Inter", true)
        );
    }

    #[test]
    fn test_bad_json_is_config_error() {
        let err = RenderConfig::from_json(r#"{ "padding": "wide" }"#).unwrap_err();
        assert!(matches!(err, FlowError::Config { .. }));
    }

    #[test]
    fn test_resolve_path() {
        let spec = FontSpec {
            font_dir: PathBuf::from("/fonts"),
            ..FontSpec::default()
        };
        assert_eq!(
            spec.resolve_path(Path::new("DejaVuSans.ttf")),
            PathBuf::from("/fonts/DejaVuSans.ttf")
        );
        assert_eq!(
            spec.resolve_path(Path::new("/abs/A.ttf")),
            PathBuf::from("/abs/A.ttf")
        );
    }
}
