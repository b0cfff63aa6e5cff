//! The complete run: build the font, write the TrueType file, convert it, and emit the style sheet and demo page.

use crate::artifact::{ArtifactKind, GeneratedFileSet};
use crate::convert::{self, ConversionReport, Sfnt2Woff, Woff2Compress, Woff2Encoder, WoffEncoder};
use crate::ctx;
use crate::data::IconMapping;
use crate::emit::{self, ClassStyle};
use crate::font::{self, FontInfo, GlyphError};
use crate::probe::Converters;
use crate::sfnt;
use anyhow::{bail, Context, Result};
use std::fmt;
use std::fs;
use std::path::PathBuf;

/// The configuration of a run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The directory containing the SVG files named in the mapping.
    pub svg_dir: PathBuf,
    /// The directory the outputs are written to.
    pub out_dir: PathBuf,
    /// The file name of the outputs, without extension.
    pub base_name: String,
    /// The font family name, used in the font and in CSS.
    pub family: String,
    /// The characters and their SVG files.
    pub mapping: IconMapping,
    /// The font compilation settings.
    pub ctx: ctx::Context,
    /// How CSS class names are derived.
    pub class_style: ClassStyle,
    /// Keep the TrueType file even when web fonts were created.
    pub keep_ttf: bool,
    /// Print diagnostics about the TrueType file.
    pub inspect: bool,
    /// Fail before building if no converter is available.
    pub require_converter: bool,
    /// Fail if the mapping names a character more than once.
    pub strict: bool,
}

impl Config {
    /// Returns a configuration with the built-in mapping that writes `<base_name>.*` to the current directory.
    pub fn new(svg_dir: impl Into<PathBuf>, base_name: &str) -> Self {
        Config {
            svg_dir: svg_dir.into(),
            out_dir: PathBuf::from("."),
            base_name: base_name.to_string(),
            family: base_name.to_string(),
            mapping: IconMapping::builtin(),
            ctx: ctx::Context::default(),
            class_style: ClassStyle::default(),
            keep_ttf: false,
            inspect: false,
            require_converter: false,
            strict: false,
        }
    }
}

/// The web font encoders used by a run.
#[derive(Default)]
pub struct Encoders {
    /// The WOFF encoder, if any.
    pub woff: Option<Box<dyn WoffEncoder>>,
    /// The WOFF2 encoder, if any.
    pub woff2: Option<Box<dyn Woff2Encoder>>,
}

impl Encoders {
    /// Wraps the located converter executables.
    pub fn from_converters(converters: &Converters) -> Self {
        Encoders {
            woff: converters
                .woff
                .clone()
                .map(|x| Box::new(Sfnt2Woff::new(x)) as Box<dyn WoffEncoder>),
            woff2: converters
                .woff2
                .clone()
                .map(|x| Box::new(Woff2Compress::new(x)) as Box<dyn Woff2Encoder>),
        }
    }

    /// Whether at least one web font format can be produced.
    pub fn any(&self) -> bool {
        self.woff.is_some() || self.woff2.is_some()
    }
}

impl fmt::Debug for Encoders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoders")
            .field("woff", &self.woff.as_ref().map(|x| x.name()))
            .field("woff2", &self.woff2.as_ref().map(|x| x.name()))
            .finish()
    }
}

/// The result of a successful run.
#[derive(Debug)]
pub struct RunReport {
    /// The files present after the run.
    pub files: GeneratedFileSet,
    /// The number of glyphs in the font.
    pub glyph_count: usize,
    /// The characters that could not be imported.
    pub errors: Vec<GlyphError>,
    /// The outcome of the web font conversions.
    pub conversion: ConversionReport,
}

/// Runs the complete pipeline.
///
/// Per-glyph and per-format failures are reported and the run continues.
///
/// # Errors
///
/// Fails if a converter is required but unavailable, if the mapping has duplicates in strict mode, if no glyph could be built, or if an output can not be written.
pub fn run(config: &Config, encoders: &Encoders) -> Result<RunReport> {
    log::info!("SVG directory: {}", config.svg_dir.display());
    log::info!("Font name: {}", config.base_name);

    if config.require_converter && !encoders.any() {
        bail!("no WOFF or WOFF2 converter is available");
    }

    let duplicates = config.mapping.duplicates();
    for duplicate in &duplicates {
        log::warn!("duplicate mapping: {}", duplicate);
    }
    if config.strict && !duplicates.is_empty() {
        bail!(
            "the mapping assigns {} characters more than once",
            duplicates.len()
        );
    }

    if !config.svg_dir.is_dir() {
        bail!("SVG directory not found: {}", config.svg_dir.display());
    }

    fs::create_dir_all(&config.out_dir)
        .with_context(|| format!("Failed to create {}", config.out_dir.display()))?;

    let info = FontInfo::new(&config.family);
    let report = font::build(&config.mapping, &config.svg_dir, info, &config.ctx)
        .context("Failed to build the font")?;

    let ttf = ArtifactKind::Ttf.path(&config.out_dir, &config.base_name);
    let bytes = sfnt::compile_ttf(&report.font, &config.ctx);
    fs::write(&ttf, &bytes).with_context(|| format!("Failed to write {}", ttf.display()))?;
    log::info!(
        "✓ created TTF: {} ({:.1} KB)",
        ttf.display(),
        bytes.len() as f64 / 1024.0
    );

    if config.inspect {
        match convert::inspect_font(&ttf) {
            Some(lines) => {
                log::info!("=== Font Information ===");
                for line in lines {
                    log::info!("{}", line);
                }
            }
            None => log::debug!("no font inspection tool available"),
        }
    }

    let conversion = convert::convert(
        &ttf,
        &config.out_dir,
        &config.base_name,
        encoders.woff.as_deref(),
        encoders.woff2.as_deref(),
    );
    let ttf_kept = convert::cleanup_ttf(&ttf, &conversion, config.keep_ttf);
    let fonts = conversion.formats(ttf_kept);

    let css = emit::css(
        &config.family,
        &config.base_name,
        &fonts,
        &report.font.glyphs,
        config.class_style,
    );
    let path = emit::write_css(&config.out_dir, &config.base_name, &css)
        .with_context(|| format!("Failed to write the style sheet to {}", config.out_dir.display()))?;
    log::debug!("style sheet: {}", path.display());

    let html = emit::html(
        &config.family,
        &config.base_name,
        &report.font.glyphs,
        config.class_style,
    );
    let path = emit::write_html(&config.out_dir, &config.base_name, &html)
        .with_context(|| format!("Failed to write the demo page to {}", config.out_dir.display()))?;
    log::debug!("demo page: {}", path.display());

    let mut files = GeneratedFileSet::scan(&config.out_dir, &config.base_name);
    files.retain_fonts(&fonts);

    Ok(RunReport {
        files,
        glyph_count: report.font.glyphs.len(),
        errors: report.errors,
        conversion,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = Config::new("icons", "ProTo");
        assert_eq!(config.family, "ProTo");
        assert_eq!(config.out_dir, PathBuf::from("."));
        assert_eq!(config.mapping.len(), 26);
        assert_eq!(config.class_style, ClassStyle::Prefixed);
    }

    #[test]
    fn test_require_converter() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            require_converter: true,
            out_dir: dir.path().to_path_buf(),
            ..Config::new(dir.path(), "Test")
        };
        let error = run(&config, &Encoders::default()).unwrap_err();
        assert!(error.to_string().contains("converter"));
        assert!(!dir.path().join("Test.ttf").exists());
    }

    #[test]
    fn test_strict_rejects_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            strict: true,
            mapping: IconMapping::from_pairs(&[('w', "people.svg"), ('w', "file-word.svg")]),
            out_dir: dir.path().to_path_buf(),
            ..Config::new(dir.path(), "Test")
        };
        assert!(run(&config, &Encoders::default()).is_err());
    }

    #[test]
    fn test_missing_svg_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            out_dir: dir.path().to_path_buf(),
            ..Config::new(dir.path().join("icons"), "Test")
        };
        let error = run(&config, &Encoders::default()).unwrap_err();
        assert!(error.to_string().contains("SVG directory not found"));
    }

    #[test]
    fn test_encoders_debug() {
        assert_eq!(
            format!("{:?}", Encoders::default()),
            "Encoders { woff: None, woff2: None }"
        );
    }
}
