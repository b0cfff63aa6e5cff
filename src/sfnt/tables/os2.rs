//! # OS/2 — OS/2 and Windows Metrics Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/os2).
//!
//! Version 4 of the table.
//! Windows clips glyphs outside of `usWinAscent` and `usWinDescent`, so both are at least as large as the glyph bounds.

use crate::data::CharacterMap;
use crate::font::FontAsset;
use crate::sfnt::{font_bounds, GlyphRecord};
use bytes::{BufMut, Bytes, BytesMut};

/// The size in bytes of a version 4 table.
const TABLE_SIZE: usize = 96;
const VERSION: u16 = 4;
/// Normal weight.
const WEIGHT_CLASS_REGULAR: u16 = 400;
/// Medium (normal) width.
const WIDTH_CLASS_NORMAL: u16 = 5;
/// Installable embedding.
const FS_TYPE_INSTALLABLE: u16 = 0;
/// `fsSelection` bit 6.
const FS_SELECTION_REGULAR: u16 = 0x0040;
/// `ulCodePageRange1` bit 0: Latin 1.
const CODE_PAGE_LATIN_1: u32 = 1;
const VENDOR_ID: [u8; 4] = *b"NONE";

/// The Unicode ranges reported in `ulUnicodeRange1` through `ulUnicodeRange4` as `(bit, first, last)`.
const UNICODE_RANGES: [(u32, u32, u32); 4] = [
    (0, 0x0000, 0x007F),      // Basic Latin
    (1, 0x0080, 0x00FF),      // Latin-1 Supplement
    (57, 0x10000, 0x10FFFF),  // Non-Plane 0
    (60, 0xE000, 0xF8FF),     // Private Use Area
];

/// Returns the four `ulUnicodeRange` fields for the characters of a font.
pub fn unicode_ranges(map: &CharacterMap) -> [u32; 4] {
    let mut ranges = [0u32; 4];

    for &(bit, first, last) in UNICODE_RANGES.iter() {
        if map.keys().any(|&x| (first..=last).contains(&(x as u32))) {
            ranges[(bit / 32) as usize] |= 1 << (bit % 32);
        }
    }

    ranges
}

/// Returns the average advance width of all glyphs with a non-zero width.
fn average_char_width(glyphs: &[GlyphRecord]) -> i16 {
    let widths: Vec<u32> = glyphs
        .iter()
        .map(|x| u32::from(x.advance_width))
        .filter(|&x| x > 0)
        .collect();

    if widths.is_empty() {
        0
    } else {
        (widths.iter().sum::<u32>() / widths.len() as u32) as i16
    }
}

/// Returns an `OS/2` table.
pub fn compile(font: &FontAsset, glyphs: &[GlyphRecord], map: &CharacterMap) -> Bytes {
    let mut buf = BytesMut::with_capacity(TABLE_SIZE);
    let em = i32::from(font.units_per_em);
    let scaled = |permille: i32| (em * permille / 1000) as i16;
    let bounds = font_bounds(glyphs);

    buf.put_u16(VERSION);
    buf.put_i16(average_char_width(glyphs));
    buf.put_u16(WEIGHT_CLASS_REGULAR);
    buf.put_u16(WIDTH_CLASS_NORMAL);
    buf.put_u16(FS_TYPE_INSTALLABLE);

    // subscript: x size, y size, x offset, y offset
    buf.put_i16(scaled(650));
    buf.put_i16(scaled(600));
    buf.put_i16(0);
    buf.put_i16(scaled(75));
    // superscript: x size, y size, x offset, y offset
    buf.put_i16(scaled(650));
    buf.put_i16(scaled(600));
    buf.put_i16(0);
    buf.put_i16(scaled(350));
    // strikeout: size, position
    buf.put_i16(scaled(50));
    buf.put_i16(scaled(250));

    buf.put_i16(0); // sFamilyClass
    buf.put_slice(&[0; 10]); // panose

    for range in unicode_ranges(map) {
        buf.put_u32(range);
    }

    buf.put_slice(&VENDOR_ID);
    buf.put_u16(FS_SELECTION_REGULAR);

    let first = map.keys().next().map_or(0, |&x| x as u32);
    let last = map.keys().last().map_or(0, |&x| x as u32);
    buf.put_u16(first.min(0xFFFF) as u16);
    buf.put_u16(last.min(0xFFFF) as u16);

    buf.put_i16(font.ascent); // sTypoAscender
    buf.put_i16(-font.descent); // sTypoDescender
    buf.put_i16(0); // sTypoLineGap

    let win_ascent = i32::from(font.ascent).max(i32::from(bounds.y_max));
    let win_descent = i32::from(font.descent).max(-i32::from(bounds.y_min));
    buf.put_u16(win_ascent.clamp(0, 0xFFFF) as u16);
    buf.put_u16(win_descent.clamp(0, 0xFFFF) as u16);

    buf.put_u32(CODE_PAGE_LATIN_1);
    buf.put_u32(0);

    buf.put_i16(scaled(500)); // sxHeight
    buf.put_i16(font.ascent); // sCapHeight
    buf.put_u16(0); // usDefaultChar
    buf.put_u16(0x20); // usBreakChar
    buf.put_u16(0); // usMaxContext

    assert_eq!(TABLE_SIZE, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::Context;
    use crate::font::FontInfo;
    use crate::outline::Outline;
    use crate::sfnt::types::Bounds;

    #[test]
    fn test_unicode_ranges() {
        let map: CharacterMap = vec![('M', 1), ('\u{E001}', 2), ('\u{1F600}', 3)]
            .into_iter()
            .collect();
        assert_eq!(unicode_ranges(&map), [1, 1 << 25 | 1 << 28, 0, 0]);
        assert_eq!(unicode_ranges(&CharacterMap::new()), [0; 4]);
    }

    #[test]
    fn test_compile() {
        let font = FontAsset::new(FontInfo::new("Test"), &Context::default());
        let glyphs = vec![
            GlyphRecord {
                outline: Outline::new(),
                advance_width: 600,
                bounds: None,
            },
            GlyphRecord {
                outline: Outline::new(),
                advance_width: 400,
                bounds: Some(Bounds {
                    x_min: 0,
                    y_min: -300,
                    x_max: 400,
                    y_max: 700,
                }),
            },
        ];
        let map: CharacterMap = vec![('a', 1), ('z', 2)].into_iter().collect();
        let table = compile(&font, &glyphs, &map);
        let read = |at: usize| u16::from_be_bytes([table[at], table[at + 1]]);

        assert_eq!(table.len(), 96);
        assert_eq!(read(0), 4);
        assert_eq!(read(2), 500); // xAvgCharWidth
        assert_eq!(&table[58..62], b"NONE");
        assert_eq!(read(62), 0x40);
        assert_eq!(read(64), 'a' as u16);
        assert_eq!(read(66), 'z' as u16);
        assert_eq!(read(68), 750);
        assert_eq!(read(74), 750); // usWinAscent
        assert_eq!(read(76), 300); // usWinDescent
    }
}
