//! Generation of the style sheet and the demo page that accompany the font.
//!
//! Every glyph gets a CSS class derived from the name of its SVG file, see [`class_name`].

pub mod css;
pub mod html;

pub use css::css;
pub use html::html;

use crate::artifact::ArtifactKind;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// How CSS class names are derived from file names.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Default)]
pub enum ClassStyle {
    /// `icon-<slug>` for every glyph.
    #[default]
    Prefixed,
    /// `<slug>`, with `icon-` only where the slug would not start with a letter.
    Bare,
}

impl ClassStyle {
    /// Returns the textual representation of the style.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prefixed => "prefixed",
            Self::Bare => "bare",
        }
    }
}

/// The prefix of icon class names.
pub const CLASS_PREFIX: &str = "icon-";

/// Returns the CSS class name of the glyph imported from `file`.
///
/// The slug is the lower-cased file stem with every character removed that is not alphanumeric or `-` (`_` is kept for [`ClassStyle::Bare`]).
///
/// ```
/// # use iconforge::emit::{class_name, ClassStyle};
/// assert_eq!(class_name("Max.svg", ClassStyle::Prefixed), "icon-max");
/// assert_eq!(class_name("file word.svg", ClassStyle::Bare), "fileword");
/// assert_eq!(class_name("7zip.svg", ClassStyle::Bare), "icon-7zip");
/// ```
pub fn class_name(file: &str, style: ClassStyle) -> String {
    let stem = Path::new(file)
        .file_stem()
        .map_or_else(|| file.to_string(), |x| x.to_string_lossy().into_owned());
    let slug: String = stem
        .to_lowercase()
        .chars()
        .filter(|&x| x.is_alphanumeric() || x == '-' || (x == '_' && style == ClassStyle::Bare))
        .collect();

    match style {
        ClassStyle::Prefixed => format!("{}{}", CLASS_PREFIX, slug),
        ClassStyle::Bare if slug.starts_with(char::is_alphabetic) => slug,
        ClassStyle::Bare => format!("{}{}", CLASS_PREFIX, slug),
    }
}

/// Writes the style sheet to `<out_dir>/<base>.css` and returns its location.
pub fn write_css(out_dir: &Path, base: &str, contents: &str) -> io::Result<PathBuf> {
    write_artifact(ArtifactKind::Css, out_dir, base, contents)
}

/// Writes the demo page to `<out_dir>/<base>.html` and returns its location.
pub fn write_html(out_dir: &Path, base: &str, contents: &str) -> io::Result<PathBuf> {
    write_artifact(ArtifactKind::Html, out_dir, base, contents)
}

fn write_artifact(kind: ArtifactKind, out_dir: &Path, base: &str, contents: &str) -> io::Result<PathBuf> {
    let path = kind.path(out_dir, base);
    fs::write(&path, contents)?;
    log::info!("✓ created {}: {}", kind, path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_name_prefixed() {
        assert_eq!(class_name("max.svg", ClassStyle::Prefixed), "icon-max");
        assert_eq!(class_name("file-word.svg", ClassStyle::Prefixed), "icon-file-word");
        assert_eq!(class_name("Arrow_Up (2).svg", ClassStyle::Prefixed), "icon-arrowup2");
        assert_eq!(class_name("sub/dir/ok.svg", ClassStyle::Prefixed), "icon-ok");
    }

    #[test]
    fn test_class_name_bare() {
        assert_eq!(class_name("max.svg", ClassStyle::Bare), "max");
        assert_eq!(class_name("Arrow_Up.svg", ClassStyle::Bare), "arrow_up");
        assert_eq!(class_name("-dash.svg", ClassStyle::Bare), "icon--dash");
        assert_eq!(class_name("_.svg", ClassStyle::Bare), "icon-_");
    }

    #[test]
    fn test_class_name_is_deterministic() {
        let a = class_name("People.svg", ClassStyle::Prefixed);
        let b = class_name("People.svg", ClassStyle::Prefixed);
        assert_eq!(a, b);
    }

    #[test]
    fn test_write_css() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_css(dir.path(), "ProTo", ".icon {}").unwrap();
        assert_eq!(path, dir.path().join("ProTo.css"));
        assert_eq!(fs::read_to_string(path).unwrap(), ".icon {}");
    }

    #[test]
    fn test_write_html_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_html(&dir.path().join("missing"), "ProTo", "");
        assert!(result.is_err());
    }
}
