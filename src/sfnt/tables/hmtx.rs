//! # hmtx — Horizontal Metrics Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx).

use crate::sfnt::GlyphRecord;
use bytes::{BufMut, Bytes, BytesMut};
use std::mem::size_of;

/// The size in bytes of a `longHorMetric` record.
const LONG_HOR_METRIC_SIZE: usize = size_of::<u16>() + size_of::<i16>();

/// Returns an `hmtx` table with one `longHorMetric` per glyph.
pub fn compile(glyphs: &[GlyphRecord]) -> Bytes {
    let length = glyphs.len() * LONG_HOR_METRIC_SIZE;
    let mut buf = BytesMut::with_capacity(length);

    for glyph in glyphs {
        buf.put_u16(glyph.advance_width);
        buf.put_i16(glyph.left_side_bearing());
    }

    assert_eq!(length, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::Outline;
    use crate::sfnt::types::Bounds;

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
                advance_width: 550,
                bounds: Bounds::of(&Outline::placeholder()),
            },
        ];
        let table = compile(&glyphs);
        assert_eq!(&table[..], &[0x02, 0x58, 0, 0, 0x02, 0x26, 0, 100]);
    }
}
