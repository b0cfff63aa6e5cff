//! The context with which a font is built and compiled.

use crate::sfnt::tables::cmap::EncodingRecord;

/// A context defines customization options.
#[derive(Debug, PartialEq, Clone)]
pub struct Context {
    /// The number of font units per em square.
    pub units_per_em: u16,
    /// The distance from the baseline to the top of the em square, in font units.
    pub ascent: i16,
    /// The distance from the baseline to the bottom of the em square, in font units.
    ///
    /// The value is positive; it is negated where a table expects a signed descender.
    pub descent: i16,
    /// The space added to the right edge of a glyph's bounding box to form its advance width.
    pub advance_padding: u16,
    /// The advance width of glyphs that have no bounding box.
    pub fallback_width: u16,
    /// What happens to characters whose SVG file is missing or can not be imported.
    pub fallback: FallbackPolicy,
    /// The maximum distance in font units a point may deviate from a straight line and still be removed by [`Outline::simplify`](crate::outline::Outline::simplify).
    pub simplify_tolerance: f64,
    /// The maximum error in font units when approximating cubic curves by quadratic curves.
    pub curve_tolerance: f64,
    /// The encoding records used by [`sfnt::tables::cmap`](crate::sfnt::tables::cmap).
    ///
    /// According to the [TrueType specification][spec], encoding records must be sorted first in ascending order of platform id and second by encoding id (a.k.a. platform-specific id). `EncodingRecord` orders this way, so sorting a vector yields the required order.
    ///
    /// [spec]: https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html
    pub cmap_encoding_records: Option<Vec<EncodingRecord>>,
}

impl Default for Context {
    fn default() -> Self {
        Context {
            units_per_em: 1000,
            ascent: 750,
            descent: 250,
            advance_padding: 50,
            fallback_width: 600,
            fallback: FallbackPolicy::default(),
            simplify_tolerance: 0.5,
            curve_tolerance: 1.0,
            cmap_encoding_records: None,
        }
    }
}

/// The treatment of characters whose outline can not be imported.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum FallbackPolicy {
    /// The character is left without a glyph.
    Omit,
    /// The character receives a rectangular placeholder glyph.
    Placeholder,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        FallbackPolicy::Omit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_metrics() {
        let ctx = Context::default();
        assert_eq!(ctx.units_per_em, 1000);
        assert_eq!(ctx.ascent, 750);
        assert_eq!(ctx.descent, 250);
        assert_eq!(ctx.ascent + ctx.descent, ctx.units_per_em as i16);
    }

    #[test]
    fn test_default_fallback_omits() {
        assert_eq!(Context::default().fallback, FallbackPolicy::Omit);
    }
}
