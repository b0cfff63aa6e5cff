//! Construction of an in-memory icon font from an [`IconMapping`].

use crate::ctx::{Context, FallbackPolicy};
use crate::data::{CharacterMap, Duplicate, IconMapping};
use crate::outline::{BoundingBox, Outline};
use crate::svg::{self, ImportError};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// The number of missing files named individually before the rest is summarised.
const MISSING_FILES_SHOWN: usize = 5;

/// Names and version of a font.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct FontInfo {
    /// The name of the font family; also the family name used in CSS.
    pub family_name: String,
    /// The full name of the font.
    pub full_name: String,
    /// The PostScript name of the font; must not contain spaces.
    pub postscript_name: String,
    /// The version string, e.g. `1.0`.
    pub version: String,
}

impl FontInfo {
    /// Derives the names of an icon font from its family name.
    ///
    /// ```
    /// # use iconforge::font::FontInfo;
    /// let info = FontInfo::new("Pro To");
    /// assert_eq!(info.full_name, "Pro To Icon Font");
    /// assert_eq!(info.postscript_name, "ProTo");
    /// ```
    pub fn new(family_name: &str) -> Self {
        let postscript_name: String = family_name
            .chars()
            .filter(|x| x.is_ascii_graphic() && !"[](){}<>/%.".contains(*x))
            .collect();

        FontInfo {
            family_name: family_name.to_string(),
            full_name: format!("{} Icon Font", family_name),
            postscript_name: if postscript_name.is_empty() {
                "IconFont".to_string()
            } else {
                postscript_name
            },
            version: "1.0".to_string(),
        }
    }
}

/// A single character's vector shape and advance width.
#[derive(Debug, PartialEq, Clone)]
pub struct Glyph {
    /// The character the glyph is mapped to.
    pub character: char,
    /// The SVG file the outline was imported from.
    pub file: String,
    /// The normalised outline.
    pub outline: Outline,
    /// The bounding box of the imported outline.
    pub bounding_box: Option<BoundingBox>,
    /// The advance width in font units.
    pub advance_width: u16,
    /// Whether the outline is a placeholder for an icon that could not be imported.
    pub placeholder: bool,
}

impl Glyph {
    /// The Unicode code point of the glyph's character.
    pub fn code_point(&self) -> u32 {
        self.character as u32
    }
}

/// An in-memory icon font.
#[derive(Debug, PartialEq, Clone)]
pub struct FontAsset {
    /// The names of the font.
    pub info: FontInfo,
    /// The number of font units per em square.
    pub units_per_em: u16,
    /// The ascender in font units.
    pub ascent: i16,
    /// The descender in font units, as a positive distance.
    pub descent: i16,
    /// The glyphs in creation order.
    pub glyphs: Vec<Glyph>,
}

impl FontAsset {
    /// Creates a font without glyphs.
    pub fn new(info: FontInfo, ctx: &Context) -> Self {
        FontAsset {
            info,
            units_per_em: ctx.units_per_em,
            ascent: ctx.ascent,
            descent: ctx.descent,
            glyphs: Vec::new(),
        }
    }

    /// Returns the glyph of a character.
    pub fn glyph(&self, character: char) -> Option<&Glyph> {
        self.glyphs.iter().find(|x| x.character == character)
    }

    /// Returns the character map of the font.
    ///
    /// Glyph id `0` is reserved for `.notdef`, so the glyphs are numbered from `1` in creation order.
    pub fn character_map(&self) -> CharacterMap {
        self.glyphs
            .iter()
            .enumerate()
            .map(|(index, glyph)| (glyph.character, index as u32 + 1))
            .collect()
    }
}

/// Returns the advance width of a glyph with the given bounding box.
///
/// The width is the right edge of the box, truncated to whole units, plus [`Context::advance_padding`].
/// Without a bounding box the width is [`Context::fallback_width`].
///
/// ```
/// # use iconforge::ctx::Context;
/// # use iconforge::font::advance_width;
/// # use iconforge::outline::BoundingBox;
/// let ctx = Context::default();
/// let bbox = BoundingBox { x_min: 10.0, y_min: -5.0, x_max: 480.7, y_max: 700.0 };
/// assert_eq!(advance_width(Some(&bbox), &ctx), 530);
/// assert_eq!(advance_width(None, &ctx), 600);
/// ```
pub fn advance_width(bbox: Option<&BoundingBox>, ctx: &Context) -> u16 {
    match bbox {
        Some(bbox) => {
            let width = bbox.x_max.trunc() + f64::from(ctx.advance_padding);
            width.clamp(0.0, f64::from(u16::MAX)) as u16
        }
        None => ctx.fallback_width,
    }
}

/// The result of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    /// The font with every glyph that could be created.
    pub font: FontAsset,
    /// The per-glyph errors, in mapping order.
    pub errors: Vec<GlyphError>,
    /// The mapping entries that were dropped because their character already had a glyph.
    pub duplicates: Vec<Duplicate>,
}

/// Builds a font with one glyph per mapped character.
///
/// Entries are processed in mapping order.
/// An entry whose character already has a glyph is dropped with a warning.
/// Entries whose SVG file is missing or can not be imported are recorded as errors and, depending on [`Context::fallback`], left out or given a placeholder glyph.
///
/// # Errors
///
/// Returns [`BuildError::NoGlyphs`] if not a single glyph could be created.
pub fn build(
    mapping: &IconMapping,
    svg_dir: &Path,
    info: FontInfo,
    ctx: &Context,
) -> Result<BuildReport, BuildError> {
    log::info!("Build font '{}' from {}", info.family_name, svg_dir.display());

    report_missing_files(mapping, svg_dir);

    let mut font = FontAsset::new(info, ctx);
    let mut created: HashMap<char, String> = HashMap::new();
    let mut errors: Vec<GlyphError> = Vec::new();
    let mut duplicates: Vec<Duplicate> = Vec::new();

    for entry in mapping.entries() {
        if let Some(kept) = created.get(&entry.character) {
            log::warn!(
                "character '{}' was already created from {}, skipping {}",
                entry.character,
                kept,
                entry.file
            );
            duplicates.push(Duplicate {
                character: entry.character,
                kept: kept.clone(),
                dropped: entry.file.clone(),
            });
            continue;
        }

        let path = svg_dir.join(&entry.file);
        let imported = if path.is_file() {
            svg::import_outlines(&path, ctx).map_err(|error| GlyphError::Import {
                character: entry.character,
                path: path.clone(),
                error,
            })
        } else {
            Err(GlyphError::Missing {
                character: entry.character,
                path: path.clone(),
            })
        };

        let glyph = match imported {
            Ok(outline) => make_glyph(entry.character, &entry.file, outline, false, ctx),
            Err(error) => {
                log::warn!("{}", error);
                errors.push(error);

                match ctx.fallback {
                    FallbackPolicy::Omit => continue,
                    FallbackPolicy::Placeholder => {
                        log::info!("created placeholder for '{}'", entry.character);
                        make_glyph(entry.character, &entry.file, Outline::placeholder(), true, ctx)
                    }
                }
            }
        };

        log::info!(
            "  ✓ {} (U+{:04X}) ← {}",
            glyph.character,
            glyph.code_point(),
            glyph.file
        );
        log::debug!(
            "    bounding box {:?}, width {}",
            glyph.bounding_box,
            glyph.advance_width
        );

        created.insert(glyph.character, glyph.file.clone());
        font.glyphs.push(glyph);
    }

    log::info!("Created glyphs: {}", font.glyphs.len());
    if !errors.is_empty() {
        log::warn!("Errors: {}", errors.len());
    }

    if font.glyphs.is_empty() {
        return Err(BuildError::NoGlyphs { errors });
    }

    Ok(BuildReport {
        font,
        errors,
        duplicates,
    })
}

/// Creates a glyph, computing its width from the imported outline before normalising it.
///
/// Placeholders always use the fallback width.
fn make_glyph(
    character: char,
    file: &str,
    mut outline: Outline,
    placeholder: bool,
    ctx: &Context,
) -> Glyph {
    let bounding_box = outline.bounding_box();
    let advance_width = if placeholder {
        ctx.fallback_width
    } else {
        advance_width(bounding_box.as_ref(), ctx)
    };

    outline.simplify(ctx.simplify_tolerance);
    outline.round();

    Glyph {
        character,
        file: file.to_string(),
        outline,
        bounding_box,
        advance_width,
        placeholder,
    }
}

fn report_missing_files(mapping: &IconMapping, svg_dir: &Path) {
    let missing: Vec<&str> = mapping
        .entries()
        .iter()
        .filter(|x| !svg_dir.join(&x.file).is_file())
        .map(|x| x.file.as_str())
        .collect();

    if missing.is_empty() {
        return;
    }

    log::warn!("{} SVG files are missing:", missing.len());
    for file in missing.iter().take(MISSING_FILES_SHOWN) {
        log::warn!("  • {}", file);
    }
    if missing.len() > MISSING_FILES_SHOWN {
        log::warn!("  • and {} more", missing.len() - MISSING_FILES_SHOWN);
    }
}

/// An error that prevented a single glyph from being created.
#[derive(Debug)]
pub enum GlyphError {
    /// The SVG file does not exist.
    Missing {
        /// The mapped character.
        character: char,
        /// The expected location of the SVG file.
        path: PathBuf,
    },
    /// The SVG file could not be imported.
    Import {
        /// The mapped character.
        character: char,
        /// The location of the SVG file.
        path: PathBuf,
        /// The reason the import failed.
        error: ImportError,
    },
}

impl GlyphError {
    /// The character the error belongs to.
    pub fn character(&self) -> char {
        match self {
            Self::Missing { character, .. } | Self::Import { character, .. } => *character,
        }
    }
}

impl fmt::Display for GlyphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { character, path } => {
                write!(f, "file not found: {} for character '{}'", path.display(), character)
            }
            Self::Import {
                character,
                path,
                error,
            } => write!(
                f,
                "error importing {} for character '{}': {}",
                path.display(),
                character,
                error
            ),
        }
    }
}

impl std::error::Error for GlyphError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Missing { .. } => None,
            Self::Import { error, .. } => Some(error),
        }
    }
}

/// An error that prevented the font from being built.
#[derive(Debug)]
pub enum BuildError {
    /// No glyph could be created.
    NoGlyphs {
        /// The errors of all mapped characters.
        errors: Vec<GlyphError>,
    },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGlyphs { errors } => {
                write!(f, "no glyphs were created ({} errors)", errors.len())
            }
        }
    }
}

impl std::error::Error for BuildError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SQUARE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="1000">
  <path d="M100 100 H500 V500 H100 Z"/>
</svg>"#;

    fn icon_dir(files: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for file in files {
            fs::write(dir.path().join(file), SQUARE).unwrap();
        }
        dir
    }

    #[test]
    fn test_build_all_present() {
        let dir = icon_dir(&["max.svg", "vk.svg", "ok.svg"]);
        let mapping = IconMapping::from_pairs(&[('M', "max.svg"), ('V', "vk.svg"), ('O', "ok.svg")]);
        let report = build(&mapping, dir.path(), FontInfo::new("Test"), &Context::default()).unwrap();

        let code_points: Vec<u32> = report.font.glyphs.iter().map(Glyph::code_point).collect();
        assert_eq!(code_points, vec![0x4D, 0x56, 0x4F]);
        assert!(report.errors.is_empty());
        assert!(report.duplicates.is_empty());
    }

    #[test]
    fn test_build_width_from_bounding_box() {
        let dir = icon_dir(&["max.svg"]);
        let mapping = IconMapping::from_pairs(&[('M', "max.svg")]);
        let report = build(&mapping, dir.path(), FontInfo::new("Test"), &Context::default()).unwrap();
        let glyph = report.font.glyph('M').unwrap();
        assert_eq!(glyph.advance_width, 550);
        assert_eq!(glyph.outline.point_count(), 4);
        assert!(!glyph.placeholder);
    }

    #[test]
    fn test_build_duplicate_first_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("people.svg"), SQUARE).unwrap();
        fs::write(
            dir.path().join("file-word.svg"),
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="1000" height="1000"><rect width="900" height="900"/></svg>"#,
        )
        .unwrap();
        let mapping = IconMapping::from_pairs(&[('w', "people.svg"), ('w', "file-word.svg")]);
        let report = build(&mapping, dir.path(), FontInfo::new("Test"), &Context::default()).unwrap();

        assert_eq!(report.font.glyphs.len(), 1);
        assert_eq!(report.font.glyphs[0].file, "people.svg");
        assert_eq!(report.font.glyphs[0].advance_width, 550);
        assert_eq!(report.duplicates.len(), 1);
        assert_eq!(report.duplicates[0].dropped, "file-word.svg");
    }

    #[test]
    fn test_build_missing_file_is_recorded() {
        let dir = icon_dir(&["max.svg"]);
        let mapping = IconMapping::from_pairs(&[('V', "vk.svg"), ('M', "max.svg")]);
        let report = build(&mapping, dir.path(), FontInfo::new("Test"), &Context::default()).unwrap();

        assert_eq!(report.font.glyphs.len(), 1);
        assert!(report.font.glyph('V').is_none());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], GlyphError::Missing { character: 'V', .. }));
    }

    #[test]
    fn test_build_placeholder_policy() {
        let dir = icon_dir(&[]);
        fs::write(dir.path().join("broken.svg"), "<svg").unwrap();
        let mapping = IconMapping::from_pairs(&[('b', "broken.svg"), ('m', "missing.svg")]);
        let ctx = Context {
            fallback: FallbackPolicy::Placeholder,
            ..Context::default()
        };
        let report = build(&mapping, dir.path(), FontInfo::new("Test"), &ctx).unwrap();

        assert_eq!(report.font.glyphs.len(), 2);
        assert!(report.font.glyphs.iter().all(|x| x.placeholder));
        assert_eq!(report.errors.len(), 2);
        assert!(matches!(report.errors[0], GlyphError::Import { character: 'b', .. }));
        assert_eq!(report.font.glyphs[0].advance_width, 600);
    }

    #[test]
    fn test_build_no_glyphs() {
        let dir = icon_dir(&[]);
        let mapping = IconMapping::from_pairs(&[('M', "max.svg")]);
        let result = build(&mapping, dir.path(), FontInfo::new("Test"), &Context::default());
        match result {
            Err(BuildError::NoGlyphs { errors }) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_character_map_numbers_from_one() {
        let dir = icon_dir(&["a.svg", "b.svg"]);
        let mapping = IconMapping::from_pairs(&[('z', "a.svg"), ('a', "b.svg")]);
        let report = build(&mapping, dir.path(), FontInfo::new("Test"), &Context::default()).unwrap();
        let map = report.font.character_map();
        assert_eq!(map[&'z'], 1);
        assert_eq!(map[&'a'], 2);
    }

    #[test]
    fn test_advance_width_truncates() {
        let ctx = Context::default();
        let bbox = BoundingBox {
            x_min: 0.0,
            y_min: 0.0,
            x_max: 99.9,
            y_max: 10.0,
        };
        assert_eq!(advance_width(Some(&bbox), &ctx), 149);
        assert_eq!(advance_width(None, &ctx), 600);
    }
}
