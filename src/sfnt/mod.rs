//! Implementation of the SFNT container format.
//!
//! [`compile`] writes a table directory followed by the given tables.
//! [`compile_ttf`] assembles the complete set of tables of a TrueType font from a [`FontAsset`].

pub mod tables;
pub mod types;

use crate::ctx::Context;
use crate::font::FontAsset;
use crate::outline::Outline;
use bytes::{BufMut, Bytes, BytesMut};
use std::mem::size_of;
use std::time::SystemTime;
use types::{binary_search_params, Bounds, Tag};

/// The size in bytes of the `sfntVersion` field.
const SFNT_VERSION_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the `numTables` field.
const NUM_TABLES_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `searchRange` field.
const SEARCH_RANGE_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `entrySelector` field.
const ENTRY_SELECTOR_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `rangeShift` field.
const RANGE_SHIFT_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of a `tableTag` field.
const TABLE_TAG_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of a `checksum` field.
const CHECKSUM_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of an `offset` field.
const OFFSET_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of a `length` field.
const LENGTH_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the table directory preamble.
const PREAMBLE_SIZE: usize = SFNT_VERSION_FIELD_SIZE
    + NUM_TABLES_FIELD_SIZE
    + SEARCH_RANGE_FIELD_SIZE
    + ENTRY_SELECTOR_FIELD_SIZE
    + RANGE_SHIFT_FIELD_SIZE;
/// The size in bytes of a `TableRecord`.
const TABLE_RECORD_SIZE: usize =
    TABLE_TAG_FIELD_SIZE + CHECKSUM_FIELD_SIZE + OFFSET_FIELD_SIZE + LENGTH_FIELD_SIZE;

/// The `sfntVersion` of fonts with TrueType outlines.
pub const TRUETYPE_VERSION: u32 = 0x0001_0000;
/// The checksum a complete font must have after `checkSumAdjustment` has been set.
const CHECKSUM_MAGIC: u32 = 0xB1B0_AFBA;

/// Returns the checksum of a table.
fn table_checksum(table: &[u8]) -> u32 {
    let iter = table.chunks_exact(4);
    let remainder = iter.remainder();

    let sum = iter.fold(0u32, |a, x| {
        a.wrapping_add(u32::from_be_bytes([x[0], x[1], x[2], x[3]]))
    });

    // add zero-padding to remainder
    let mut rest = [0; 4];

    for (offset, byte) in remainder.iter().enumerate() {
        rest[offset] = *byte;
    }

    sum.wrapping_add(u32::from_be_bytes(rest))
}

/// Compiles an SFNT font.
///
/// `sfnt_version` is written to the first four bytes of the font.
/// The tables are written in the given order to the font.
///
/// # Example
///
/// ```
/// # use iconforge::ctx::Context;
/// # use iconforge::data::CharacterMap;
/// # use iconforge::sfnt::types::Tag;
/// # use iconforge::sfnt::{compile, TRUETYPE_VERSION};
/// use iconforge::sfnt::tables;
///
/// let ctx = Context::default();
/// let map = CharacterMap::new();
/// let tables = vec![
///     (Tag(*b"cmap"), tables::cmap::compile(&map, &ctx)),
///     // ... tables ...
/// ];
///
/// let font = compile(TRUETYPE_VERSION, tables);
/// ```
pub fn compile(sfnt_version: u32, tables: Vec<(Tag, Bytes)>) -> Bytes {
    log::debug!(
        "SFNT version: 0x{:X}{}",
        sfnt_version,
        Tag::from_u32(sfnt_version).map_or(String::new(), |x| format!(" ({})", x))
    );
    log::trace!("Write Table Directory Preamble");

    let padded_length = |len: usize| len + (4 - (len % 4)) % 4;
    let length = PREAMBLE_SIZE
        + (tables.len() * TABLE_RECORD_SIZE)
        + tables.iter().map(|(_, x)| padded_length(x.len())).sum::<usize>();
    let mut buf = BytesMut::with_capacity(length);

    buf.put_u32(sfnt_version);

    let num_tables: u16 = tables.len() as u16;
    buf.put_u16(num_tables);

    let (search_range, entry_selector, range_shift) =
        binary_search_params(num_tables, TABLE_RECORD_SIZE as u16);
    buf.put_u16(search_range);
    buf.put_u16(entry_selector);
    buf.put_u16(range_shift);

    log::trace!("Write Table Records");

    let mut offset: u32 = (PREAMBLE_SIZE + (tables.len() * TABLE_RECORD_SIZE)) as u32;

    for (tag, table) in &tables {
        buf.put_u32(tag.as_u32());

        let checksum = table_checksum(table);
        buf.put_u32(checksum);

        buf.put_u32(offset);

        let len = table.len() as u32;
        buf.put_u32(len);

        offset += padded_length(table.len()) as u32;
    }

    log::trace!("Write Tables");

    for (tag, table) in tables {
        log::debug!("writing table {} ({} bytes) ...", tag, table.len());

        let len = table.len();

        buf.put(table);

        for _ in len..padded_length(len) {
            buf.put_u8(0);
        }
    }

    assert_eq!(length, buf.len());

    buf.freeze()
}

/// A glyph in glyph id order, prepared for the outline and metrics tables.
#[derive(Debug, PartialEq, Clone)]
pub struct GlyphRecord {
    /// The outline in whole font units.
    pub outline: Outline,
    /// The advance width in font units.
    pub advance_width: u16,
    /// The bounds of the outline; `None` for glyphs without contours.
    pub bounds: Option<Bounds>,
}

impl GlyphRecord {
    /// Returns the glyphs of a font in glyph id order, starting with an empty `.notdef` glyph.
    pub fn collect(font: &FontAsset, ctx: &Context) -> Vec<GlyphRecord> {
        let notdef = GlyphRecord {
            outline: Outline::new(),
            advance_width: ctx.fallback_width,
            bounds: None,
        };

        std::iter::once(notdef)
            .chain(font.glyphs.iter().map(|glyph| GlyphRecord {
                bounds: Bounds::of(&glyph.outline),
                outline: glyph.outline.clone(),
                advance_width: glyph.advance_width,
            }))
            .collect()
    }

    /// The left side bearing: the distance from the origin to the left edge of the bounds.
    pub fn left_side_bearing(&self) -> i16 {
        self.bounds.map_or(0, |x| x.x_min)
    }
}

/// Returns the union of the bounds of all glyphs, or zero bounds if no glyph has contours.
pub(crate) fn font_bounds(glyphs: &[GlyphRecord]) -> Bounds {
    glyphs
        .iter()
        .filter_map(|x| x.bounds)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Bounds {
            x_min: 0,
            y_min: 0,
            x_max: 0,
            y_max: 0,
        })
}

/// Compiles a TrueType font.
///
/// The tables are written in ascending tag order; `head.checkSumAdjustment` is set after the font has been assembled.
pub fn compile_ttf(font: &FontAsset, ctx: &Context) -> Bytes {
    log::info!(
        "Compile TrueType font '{}' with {} glyphs",
        font.info.family_name,
        font.glyphs.len()
    );

    let glyphs = GlyphRecord::collect(font, ctx);
    let map = font.character_map();
    let (glyf, loca) = tables::glyf::compile(&glyphs);

    let mut tables = vec![
        (Tag(*b"OS/2"), tables::os2::compile(font, &glyphs, &map)),
        (Tag(*b"cmap"), tables::cmap::compile(&map, ctx)),
        (Tag(*b"glyf"), glyf),
        (
            Tag(*b"head"),
            tables::head::compile(font, &glyphs, SystemTime::now()),
        ),
        (Tag(*b"hhea"), tables::hhea::compile(font, &glyphs)),
        (Tag(*b"hmtx"), tables::hmtx::compile(&glyphs)),
        (Tag(*b"loca"), loca),
        (Tag(*b"maxp"), tables::maxp::compile(&glyphs)),
        (Tag(*b"name"), tables::name::compile(&font.info)),
        (Tag(*b"post"), tables::post::compile(font)),
    ];
    tables.sort_by_key(|(tag, _)| tag.as_u32());

    set_checksum_adjustment(compile(TRUETYPE_VERSION, tables))
}

/// Writes `checkSumAdjustment` into the `head` table of a compiled font.
fn set_checksum_adjustment(font: Bytes) -> Bytes {
    let mut buf = BytesMut::from(&font[..]);
    let head_offset = table_offset(&buf, Tag(*b"head"));

    if let Some(offset) = head_offset {
        let adjustment = CHECKSUM_MAGIC.wrapping_sub(table_checksum(&buf));
        let field = offset + tables::head::CHECKSUM_ADJUSTMENT_OFFSET;
        buf[field..field + 4].copy_from_slice(&adjustment.to_be_bytes());
    }

    buf.freeze()
}

/// Returns the offset of a table by looking up its record in the table directory.
fn table_offset(font: &[u8], tag: Tag) -> Option<usize> {
    let read_u32 = |at: usize| -> Option<u32> {
        let bytes = font.get(at..at + 4)?;
        Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    };
    let num_tables = font
        .get(SFNT_VERSION_FIELD_SIZE..PREAMBLE_SIZE)
        .map(|x| u16::from_be_bytes([x[0], x[1]]))?;

    (0..num_tables as usize)
        .map(|index| PREAMBLE_SIZE + index * TABLE_RECORD_SIZE)
        .find(|&record| read_u32(record) == Some(tag.as_u32()))
        .and_then(|record| read_u32(record + TABLE_TAG_FIELD_SIZE + CHECKSUM_FIELD_SIZE))
        .map(|offset| offset as usize)
}
