//! # maxp — Maximum Profile
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp).
//!
//! Version 1.0 of the table, required by fonts with TrueType outlines.
//! Glyphs carry no instructions and no components, so all hinting and composite limits are `0`.

use crate::sfnt::GlyphRecord;
use bytes::{BufMut, Bytes, BytesMut};

/// The size in bytes of a version 1.0 table.
const TABLE_SIZE: usize = 32;
/// The version 1.0 as a 16.16 fixed-point number.
const VERSION_1_0: u32 = 0x0001_0000;
/// The number of zones: the twilight zone and the glyph zone.
const MAX_ZONES: u16 = 2;

/// Returns a `maxp` table.
pub fn compile(glyphs: &[GlyphRecord]) -> Bytes {
    let mut buf = BytesMut::with_capacity(TABLE_SIZE);

    let max_points = glyphs
        .iter()
        .map(|x| x.outline.point_count())
        .max()
        .unwrap_or(0);
    let max_contours = glyphs
        .iter()
        .map(|x| x.outline.contours.len())
        .max()
        .unwrap_or(0);

    buf.put_u32(VERSION_1_0);
    buf.put_u16(glyphs.len() as u16);
    buf.put_u16(max_points as u16);
    buf.put_u16(max_contours as u16);
    buf.put_u16(0); // maxCompositePoints
    buf.put_u16(0); // maxCompositeContours
    buf.put_u16(MAX_ZONES);

    // maxTwilightPoints, maxStorage, maxFunctionDefs, maxInstructionDefs,
    // maxStackElements, maxSizeOfInstructions, maxComponentElements, maxComponentDepth
    for _ in 0..8 {
        buf.put_u16(0);
    }

    assert_eq!(TABLE_SIZE, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Outline;

    #[test]
    fn test_compile() {
        let glyphs = vec![
            GlyphRecord {
                outline: Outline::new(),
                advance_width: 600,
                bounds: None,
            },
            GlyphRecord {
                outline: Outline::placeholder(),
                advance_width: 600,
                bounds: None,
            },
        ];
        let table = compile(&glyphs);
        assert_eq!(table.len(), 32);
        assert_eq!(&table[..4], &[0, 1, 0, 0]);
        assert_eq!(&table[4..6], &[0, 2]); // numGlyphs
        assert_eq!(&table[6..8], &[0, 4]); // maxPoints
        assert_eq!(&table[8..10], &[0, 1]); // maxContours
        assert_eq!(&table[14..16], &[0, 2]); // maxZones
    }
}
