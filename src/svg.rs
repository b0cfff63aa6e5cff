//! Import of SVG icons as glyph outlines.
//!
//! The SVG document is resolved by `usvg`, which applies the `viewBox`, flattens transforms, and converts basic shapes to paths.
//! Every visible filled path contributes its contours to the outline.
//!
//! SVG user space has its y-axis pointing down while font space has it pointing up.
//! The document height is scaled to the em square and its top edge is placed at the ascender:
//!
//! ```text
//! x' = x · scale
//! y' = ascent − y · scale        where scale = units_per_em / height
//! ```

use crate::ctx::Context;
use crate::outline::{ContourBuilder, Outline};
use std::fmt;
use std::io;
use std::path::Path;
use usvg::tiny_skia_path::PathSegment;

/// Reads the SVG file at `path` and returns its outline in font units.
///
/// # Errors
///
/// - [`ImportError::Io`] if the file can not be read.
/// - [`ImportError::Parse`] if the file is not a valid SVG document.
/// - [`ImportError::Empty`] if the document contains no filled paths.
pub fn import_outlines(path: &Path, ctx: &Context) -> Result<Outline, ImportError> {
    let data = std::fs::read(path)?;
    import_outlines_from_data(&data, ctx)
}

/// Returns the outline of an SVG document given as bytes.
///
/// See [`import_outlines`].
pub fn import_outlines_from_data(data: &[u8], ctx: &Context) -> Result<Outline, ImportError> {
    let options = usvg::Options::default();
    let tree = usvg::Tree::from_data(data, &options).map_err(|x| ImportError::Parse(x.to_string()))?;

    let height = f64::from(tree.size().height());
    if height <= 0.0 {
        return Err(ImportError::Empty);
    }

    let mapping = FontSpace {
        scale: f64::from(ctx.units_per_em) / height,
        ascent: f64::from(ctx.ascent),
        curve_tolerance: ctx.curve_tolerance,
    };
    log::trace!("svg size {:?}, scale {}", tree.size(), mapping.scale);

    let mut outline = Outline::new();
    collect_group(tree.root(), &mapping, &mut outline);

    if outline.is_empty() {
        return Err(ImportError::Empty);
    }

    Ok(outline)
}

/// The transformation from SVG user space into font space.
struct FontSpace {
    scale: f64,
    ascent: f64,
    curve_tolerance: f64,
}

impl FontSpace {
    fn map(&self, point: usvg::tiny_skia_path::Point) -> (f64, f64) {
        (
            f64::from(point.x) * self.scale,
            self.ascent - f64::from(point.y) * self.scale,
        )
    }
}

fn collect_group(group: &usvg::Group, mapping: &FontSpace, outline: &mut Outline) {
    for node in group.children() {
        match node {
            usvg::Node::Group(group) => collect_group(group, mapping, outline),
            usvg::Node::Path(path) => collect_path(path, mapping, outline),
            _ => log::debug!("skipping non-path node {:?}", node.id()),
        }
    }
}

/// Appends the contours of a filled path.
///
/// TrueType fills with the nonzero rule, so the contours of an even-odd path are reoriented first.
fn collect_path(path: &usvg::Path, mapping: &FontSpace, outline: &mut Outline) {
    let Some(fill) = path.fill().filter(|_| path.is_visible()) else {
        log::debug!("skipping unfilled path {:?}", path.id());
        return;
    };

    let Some(data) = path.data().clone().transform(path.abs_transform()) else {
        log::debug!("skipping path {:?} with degenerate transform", path.id());
        return;
    };

    let mut builder = ContourBuilder::new(mapping.curve_tolerance);
    for segment in data.segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                let (x, y) = mapping.map(p);
                builder.move_to(x, y);
            }
            PathSegment::LineTo(p) => {
                let (x, y) = mapping.map(p);
                builder.line_to(x, y);
            }
            PathSegment::QuadTo(p1, p) => {
                let (x1, y1) = mapping.map(p1);
                let (x, y) = mapping.map(p);
                builder.quad_to(x1, y1, x, y);
            }
            PathSegment::CubicTo(p1, p2, p) => {
                let (x1, y1) = mapping.map(p1);
                let (x2, y2) = mapping.map(p2);
                let (x, y) = mapping.map(p);
                builder.cubic_to(x1, y1, x2, y2, x, y);
            }
            PathSegment::Close => builder.close(),
        }
    }

    let mut contours = builder.finish();
    if fill.rule() == usvg::FillRule::EvenOdd {
        contours.orient_even_odd();
    }
    outline.contours.extend(contours.contours);
}

/// An error that may occur when importing an SVG file.
#[derive(Debug)]
pub enum ImportError {
    /// The file can not be read.
    Io(io::Error),
    /// The document can not be parsed.
    Parse(String),
    /// The document contains nothing that can be drawn as a glyph.
    Empty,
}

impl From<io::Error> for ImportError {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(error) => write!(f, "error reading file: {}", error),
            Self::Parse(message) => write!(f, "invalid SVG: {}", message),
            Self::Empty => write!(f, "no filled paths"),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(error) => Some(error),
            _ => None,
        }
    }
}
