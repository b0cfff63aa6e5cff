//! # hhea — Horizontal Header Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea).

use crate::font::FontAsset;
use crate::sfnt::GlyphRecord;
use bytes::{BufMut, Bytes, BytesMut};

/// The size in bytes of the table.
const TABLE_SIZE: usize = 36;

/// The horizontal extremes over all glyphs with contours.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct HorizontalExtents {
    /// The largest advance width, including glyphs without contours.
    pub advance_width_max: u16,
    /// The smallest left side bearing.
    pub min_left_side_bearing: i16,
    /// The smallest right side bearing, `advance − xMax`.
    pub min_right_side_bearing: i16,
    /// The largest `lsb + (xMax − xMin)`.
    pub x_max_extent: i16,
}

impl HorizontalExtents {
    /// Computes the extents of a set of glyphs.
    pub fn of(glyphs: &[GlyphRecord]) -> HorizontalExtents {
        let advance_width_max = glyphs.iter().map(|x| x.advance_width).max().unwrap_or(0);
        let with_bounds = || glyphs.iter().filter_map(|x| x.bounds.map(|b| (x, b)));

        HorizontalExtents {
            advance_width_max,
            min_left_side_bearing: with_bounds().map(|(_, b)| b.x_min).min().unwrap_or(0),
            min_right_side_bearing: with_bounds()
                .map(|(x, b)| (i32::from(x.advance_width) - i32::from(b.x_max)) as i16)
                .min()
                .unwrap_or(0),
            x_max_extent: with_bounds().map(|(_, b)| b.x_max).max().unwrap_or(0),
        }
    }
}

/// Returns an `hhea` table.
///
/// Every glyph has its own entry in `hmtx`, so `numberOfHMetrics` is the glyph count.
pub fn compile(font: &FontAsset, glyphs: &[GlyphRecord]) -> Bytes {
    let mut buf = BytesMut::with_capacity(TABLE_SIZE);
    let extents = HorizontalExtents::of(glyphs);

    buf.put_u16(1); // majorVersion
    buf.put_u16(0); // minorVersion
    buf.put_i16(font.ascent);
    buf.put_i16(-font.descent);
    buf.put_i16(0); // lineGap
    buf.put_u16(extents.advance_width_max);
    buf.put_i16(extents.min_left_side_bearing);
    buf.put_i16(extents.min_right_side_bearing);
    buf.put_i16(extents.x_max_extent);
    buf.put_i16(1); // caretSlopeRise
    buf.put_i16(0); // caretSlopeRun
    buf.put_i16(0); // caretOffset

    for _ in 0..4 {
        buf.put_i16(0); // reserved
    }

    buf.put_i16(0); // metricDataFormat
    buf.put_u16(glyphs.len() as u16);

    assert_eq!(TABLE_SIZE, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Outline;
    use crate::sfnt::types::Bounds;

    fn record(advance_width: u16, bounds: Option<Bounds>) -> GlyphRecord {
        GlyphRecord {
            outline: Outline::new(),
            advance_width,
            bounds,
        }
    }

    #[test]
    fn test_extents() {
        let glyphs = vec![
            record(600, None),
            record(
                550,
                Some(Bounds {
                    x_min: 100,
                    y_min: 0,
                    x_max: 500,
                    y_max: 500,
                }),
            ),
            record(
                400,
                Some(Bounds {
                    x_min: -20,
                    y_min: 0,
                    x_max: 420,
                    y_max: 500,
                }),
            ),
        ];
        assert_eq!(
            HorizontalExtents::of(&glyphs),
            HorizontalExtents {
                advance_width_max: 600,
                min_left_side_bearing: -20,
                min_right_side_bearing: -20,
                x_max_extent: 500,
            }
        );
    }

    #[test]
    fn test_extents_without_contours() {
        let extents = HorizontalExtents::of(&[record(600, None)]);
        assert_eq!(extents.advance_width_max, 600);
        assert_eq!(extents.x_max_extent, 0);
    }
}
