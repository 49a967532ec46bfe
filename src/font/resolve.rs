//! Font resolution.
//!
//! Walks the [`FontSpec`] tiers in order and keeps the first one whose
//! normal candidate loads. Nothing here returns an error: a missing file or
//! an unknown family moves on to the next candidate, and the chain always
//! ends at the built-in bitmap font.

use std::sync::OnceLock;

use fontdb::{Database, Family, Query};

use super::{CustomFont, Font, FontData};
use crate::layout::Role;
use crate::style::{FontCandidate, FontSpec};

/// Lowest weight accepted as a bold face.
const MIN_BOLD_WEIGHT: u16 = 600;

static SYSTEM_FONTS: OnceLock<Database> = OnceLock::new();

/// The process-wide system font database. Scanned once, read-only after.
fn system_fonts() -> &'static Database {
    SYSTEM_FONTS.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        log::info!("Loaded {} system fonts", db.len());
        db
    })
}

/// Where the resolved fonts came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontSource {
    /// Index into [`FontSpec::tiers`].
    Tier(usize),
    Builtin,
}

/// The normal and emphasis fonts for one render call.
#[derive(Debug, Clone)]
pub struct ResolvedFonts {
    pub normal: Font,
    pub emphasis: Font,
    pub source: FontSource,
    /// Emphasis is the normal face at the emphasis size.
    pub emphasis_substituted: bool,
}

impl ResolvedFonts {
    /// Built-in bitmap font for both roles.
    pub fn builtin(spec: &FontSpec) -> Self {
        Self {
            normal: Font::builtin(spec.normal_size),
            emphasis: Font::builtin(spec.emphasis_size),
            source: FontSource::Builtin,
            emphasis_substituted: false,
        }
    }

    /// Main-point text uses the emphasis font, everything else the normal one.
    pub fn for_role(&self, role: Role) -> &Font {
        if role.is_emphasis() {
            &self.emphasis
        } else {
            &self.normal
        }
    }
}

/// Resolve fonts from files and the system font database.
pub fn resolve_fonts(spec: &FontSpec) -> ResolvedFonts {
    resolve_with(spec, |candidate| load_candidate(spec, candidate))
}

/// First-success-wins selection over the tiers, with `load` as the only
/// source of font data.
pub fn resolve_with<F>(spec: &FontSpec, mut load: F) -> ResolvedFonts
where
    F: FnMut(&FontCandidate) -> Option<FontData>,
{
    for (index, tier) in spec.tiers.iter().enumerate() {
        let Some(normal) = load(&tier.normal) else {
            log::debug!("Font tier {} skipped: {:?} did not load", index, tier.normal);
            continue;
        };
        let (emphasis, substituted) = match load(&tier.emphasis) {
            Some(data) => (data, false),
            None => {
                log::warn!(
                    "Emphasis font {:?} not found, using the normal font at {}px",
                    tier.emphasis,
                    spec.emphasis_size
                );
                (normal.clone(), true)
            }
        };
        log::info!("Using font tier {}: {:?}", index, tier.normal);
        return ResolvedFonts {
            normal: Font::new(normal, spec.normal_size),
            emphasis: Font::new(emphasis, spec.emphasis_size),
            source: FontSource::Tier(index),
            emphasis_substituted: substituted,
        };
    }

    log::warn!("No font tier resolved, using the built-in bitmap font");
    ResolvedFonts::builtin(spec)
}

fn load_candidate(spec: &FontSpec, candidate: &FontCandidate) -> Option<FontData> {
    let font = match candidate {
        FontCandidate::File { path } => {
            let path = spec.resolve_path(path);
            match std::fs::read(&path) {
                Ok(data) => CustomFont::from_bytes(data, 0),
                Err(e) => {
                    log::debug!("Font file '{}' unavailable: {}", path.display(), e);
                    None
                }
            }
        }
        FontCandidate::System { family, bold } => load_system_font(family, *bold),
    };
    font.map(FontData::Custom)
}

fn load_system_font(family: &str, bold: bool) -> Option<CustomFont> {
    let db = system_fonts();
    let query = Query {
        families: &[Family::Name(family)],
        weight: if bold {
            fontdb::Weight::BOLD
        } else {
            fontdb::Weight::NORMAL
        },
        style: fontdb::Style::Normal,
        ..Query::default()
    };
    let id = db.query(&query)?;

    // fontdb answers with the closest weight, so a family without a bold face
    // would hand back its regular one here.
    if bold && db.face(id)?.weight.0 < MIN_BOLD_WEIGHT {
        log::debug!("System family '{}' has no bold face", family);
        return None;
    }

    db.with_face_data(id, |data, index| CustomFont::from_bytes(data.to_vec(), index))
        .flatten()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontTier;

    fn spec_with(tiers: Vec<FontTier>) -> FontSpec {
        FontSpec {
            tiers,
            ..FontSpec::default()
        }
    }

    fn tier(normal: &str, emphasis: &str) -> FontTier {
        FontTier {
            normal: FontCandidate::file(normal),
            emphasis: FontCandidate::file(emphasis),
        }
    }

    fn name(candidate: &FontCandidate) -> String {
        match candidate {
            FontCandidate::File { path } => path.display().to_string(),
            FontCandidate::System { family, .. } => family.clone(),
        }
    }

    #[test]
    fn test_no_tiers_is_builtin() {
        let resolved = resolve_with(&FontSpec::builtin_only(), |_| None);
        assert_eq!(resolved.source, FontSource::Builtin);
        assert!(resolved.normal.is_builtin());
        assert!(resolved.emphasis.is_builtin());
        assert_eq!(resolved.normal.size(), 18.0);
        assert_eq!(resolved.emphasis.size(), 22.0);
    }

    #[test]
    fn test_nothing_loads_is_builtin() {
        let spec = spec_with(vec![tier("a.ttf", "a-bold.ttf"), tier("b.ttf", "b-bold.ttf")]);
        let mut tried = Vec::new();
        let resolved = resolve_with(&spec, |c| {
            tried.push(name(c));
            None
        });
        assert_eq!(resolved.source, FontSource::Builtin);
        // Emphasis candidates are never tried when the normal one fails.
        assert_eq!(tried, vec!["a.ttf", "b.ttf"]);
    }

    #[test]
    fn test_first_loading_tier_wins() {
        let spec = spec_with(vec![
            tier("missing.ttf", "missing-bold.ttf"),
            tier("ok.ttf", "ok-bold.ttf"),
            tier("later.ttf", "later-bold.ttf"),
        ]);
        let mut tried = Vec::new();
        let resolved = resolve_with(&spec, |c| {
            tried.push(name(c));
            name(c).starts_with("ok").then_some(FontData::Builtin)
        });
        assert_eq!(resolved.source, FontSource::Tier(1));
        assert!(!resolved.emphasis_substituted);
        assert_eq!(tried, vec!["missing.ttf", "ok.ttf", "ok-bold.ttf"]);
    }

    #[test]
    fn test_missing_emphasis_uses_normal_at_emphasis_size() {
        let spec = spec_with(vec![tier("regular.ttf", "bold.ttf")]);
        let resolved = resolve_with(&spec, |c| {
            (name(c) == "regular.ttf").then_some(FontData::Builtin)
        });
        assert_eq!(resolved.source, FontSource::Tier(0));
        assert!(resolved.emphasis_substituted);
        assert_eq!(resolved.emphasis.size(), 22.0);
        assert_eq!(resolved.normal.size(), 18.0);
    }

    #[test]
    fn test_for_role() {
        let resolved = ResolvedFonts::builtin(&FontSpec::default());
        assert_eq!(resolved.for_role(Role::MainPointText).size(), 22.0);
        for role in [
            Role::BoxTop,
            Role::BoxBottom,
            Role::SubPointText,
            Role::Arrow,
            Role::Plain,
            Role::Blank,
        ] {
            assert_eq!(resolved.for_role(role).size(), 18.0);
        }
    }

    #[test]
    fn test_missing_files_never_fail() {
        let spec = FontSpec {
            font_dir: std::path::PathBuf::from("/nonexistent/flowtext-fonts"),
            tiers: vec![tier("DejaVuSans.ttf", "DejaVuSans-Bold.ttf")],
            ..FontSpec::default()
        };
        let resolved = resolve_fonts(&spec);
        assert_eq!(resolved.source, FontSource::Builtin);
    }
}
