//! # post — PostScript Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/post).
//!
//! Version 3.0: no glyph names are stored.

use crate::font::FontAsset;
use bytes::{BufMut, Bytes, BytesMut};

/// The size in bytes of a version 3.0 table.
const TABLE_SIZE: usize = 32;
/// The version 3.0 as a 16.16 fixed-point number.
const VERSION_3_0: u32 = 0x0003_0000;

/// Returns a `post` table.
pub fn compile(font: &FontAsset) -> Bytes {
    let mut buf = BytesMut::with_capacity(TABLE_SIZE);
    let units_per_em = i32::from(font.units_per_em);

    buf.put_u32(VERSION_3_0);
    buf.put_u32(0); // italicAngle
    buf.put_i16((-units_per_em * 75 / 1000) as i16); // underlinePosition
    buf.put_i16((units_per_em * 50 / 1000) as i16); // underlineThickness
    buf.put_u32(0); // isFixedPitch
    buf.put_u32(0); // minMemType42
    buf.put_u32(0); // maxMemType42
    buf.put_u32(0); // minMemType1
    buf.put_u32(0); // maxMemType1

    assert_eq!(TABLE_SIZE, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::Context;
    use crate::font::FontInfo;

    #[test]
    fn test_compile() {
        let font = FontAsset::new(FontInfo::new("Test"), &Context::default());
        let table = compile(&font);
        assert_eq!(&table[..4], &[0, 3, 0, 0]);
        assert_eq!(&table[8..10], &(-75i16).to_be_bytes());
        assert_eq!(&table[10..12], &[0, 50]);
    }
}
