//! # head — Font Header Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/head).
//!
//! The `checkSumAdjustment` field is written as `0`; it can only be computed once the whole font is assembled.
//! See [`CHECKSUM_ADJUSTMENT_OFFSET`].

use crate::font::FontAsset;
use crate::sfnt::types::{long_date_time, version_to_fixed};
use crate::sfnt::{font_bounds, GlyphRecord};
use bytes::{BufMut, Bytes, BytesMut};
use std::time::SystemTime;

/// The size in bytes of the table.
const TABLE_SIZE: usize = 54;
/// The offset of the `checkSumAdjustment` field within the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;
/// The value of the `magicNumber` field.
const MAGIC_NUMBER: u32 = 0x5F0F_3CF5;
/// Baseline at `y = 0` (bit 0) and integer scaling (bit 3).
const FLAGS: u16 = 0b1001;
/// The smallest readable size in pixels.
const LOWEST_REC_PPEM: u16 = 8;
/// Fully mixed directional glyphs.
const FONT_DIRECTION_HINT: i16 = 2;
/// `loca` uses 32-bit offsets.
pub const INDEX_TO_LOC_FORMAT_LONG: i16 = 1;

/// Returns a `head` table.
///
/// `time` is used as both the creation and modification date.
pub fn compile(font: &FontAsset, glyphs: &[GlyphRecord], time: SystemTime) -> Bytes {
    let mut buf = BytesMut::with_capacity(TABLE_SIZE);

    buf.put_u16(1); // majorVersion
    buf.put_u16(0); // minorVersion
    buf.put_u32(version_to_fixed(&font.info.version));

    let check_sum_adjustment = 0;
    buf.put_u32(check_sum_adjustment);
    buf.put_u32(MAGIC_NUMBER);
    buf.put_u16(FLAGS);
    buf.put_u16(font.units_per_em);

    let date = long_date_time(time);
    buf.put_i64(date); // created
    buf.put_i64(date); // modified

    let bounds = font_bounds(glyphs);
    buf.put_i16(bounds.x_min);
    buf.put_i16(bounds.y_min);
    buf.put_i16(bounds.x_max);
    buf.put_i16(bounds.y_max);

    let mac_style = 0;
    buf.put_u16(mac_style);
    buf.put_u16(LOWEST_REC_PPEM);
    buf.put_i16(FONT_DIRECTION_HINT);
    buf.put_i16(INDEX_TO_LOC_FORMAT_LONG);

    let glyph_data_format = 0;
    buf.put_i16(glyph_data_format);

    assert_eq!(TABLE_SIZE, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::Context;
    use crate::font::{FontInfo, Glyph};
    use crate::outline::Outline;
    use std::time::UNIX_EPOCH;

    #[test]
    fn test_compile() {
        let ctx = Context::default();
        let mut font = FontAsset::new(FontInfo::new("Test"), &ctx);
        font.glyphs.push(Glyph {
            character: 'M',
            file: "max.svg".to_string(),
            outline: Outline::placeholder(),
            bounding_box: None,
            advance_width: 600,
            placeholder: true,
        });
        let glyphs = GlyphRecord::collect(&font, &ctx);
        let table = compile(&font, &glyphs, UNIX_EPOCH);
        let read_u16 = |at: usize| u16::from_be_bytes([table[at], table[at + 1]]);

        assert_eq!(table.len(), TABLE_SIZE);
        assert_eq!(&table[4..8], &[0, 1, 0, 0]); // fontRevision 1.0
        assert_eq!(&table[8..12], &[0, 0, 0, 0]);
        assert_eq!(&table[12..16], &MAGIC_NUMBER.to_be_bytes());
        assert_eq!(read_u16(18), 1000);
        assert_eq!(&table[20..28], &2_082_844_800i64.to_be_bytes());
        assert_eq!(read_u16(36), 100); // xMin
        assert_eq!(read_u16(42), 500); // yMax
        assert_eq!(read_u16(50), 1); // indexToLocFormat
    }
}
