//! # Format 4: Segment mapping to delta values
//!
//! Implementation of the `cmap` format 4 subtable.
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values),
//! [TrueType](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html).
//!
//! The entry to this module is the [`compile`] function.
//! It returns a `cmap` format 4 subtable for a given character map.
//!
//! Every segment is a *shift* segment: a run of consecutive character codes mapping to consecutive glyph ids, encoded by a single `idDelta`.
//! Icon fonts map a few dozen characters, so the `glyphIdArray` is never needed.
//! Characters outside of the Basic Multilingual Plane are skipped; they are covered by [format 12](super::format12).
//!
//! ```
//! # use iconforge::data::CharacterMap;
//! # use iconforge::sfnt::tables::cmap::format4::{compile_segments, form_segments};
//! let mut map = CharacterMap::new();
//! map.insert('A', 1);
//! map.insert('B', 2);
//! map.insert('x', 3);
//! let segments = form_segments(&map);
//! assert_eq!(segments.len(), 3); // A-B, x, and the sentinel
//! let subtable = compile_segments(&segments);
//! ```

use crate::data::CharacterMap;
use crate::sfnt::types::binary_search_params;
use bytes::{BufMut, Bytes, BytesMut};
use spans::Spans;
use std::collections::BTreeMap;
use std::mem::size_of;

/// The size in bytes of the `format` field.
const FORMAT_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `length` field.
const LENGTH_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `language` field.
const LANGUAGE_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `segCountX2` field.
const SEG_COUNT_X2_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `searchRange` field.
const SEARCH_RANGE_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `entrySelector` field.
const ENTRY_SELECTOR_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `rangeShift` field.
const RANGE_SHIFT_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `reservedPad` field.
const RESERVED_PAD_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the subtable header and `reservedPad`.
const CONSTANT_SIZE: usize = FORMAT_FIELD_SIZE
    + LENGTH_FIELD_SIZE
    + LANGUAGE_FIELD_SIZE
    + SEG_COUNT_X2_FIELD_SIZE
    + SEARCH_RANGE_FIELD_SIZE
    + ENTRY_SELECTOR_FIELD_SIZE
    + RANGE_SHIFT_FIELD_SIZE
    + RESERVED_PAD_FIELD_SIZE;
/// The size in bytes of a segment: `endCode`, `startCode`, `idDelta`, and `idRangeOffset`.
const SEGMENT_SIZE: usize = 4 * size_of::<u16>();
/// The character code of the sentinel segment.
const SENTINEL_CODE: u16 = 0xFFFF;

/// Returns a `cmap` format 4 subtable representing the given character map.
///
/// ```
/// # use iconforge::data::CharacterMap;
/// # use iconforge::sfnt::tables::cmap::format4::compile;
/// let mut map = CharacterMap::new();
/// map.insert('M', 1);
/// let subtable = compile(&map);
/// assert_eq!(&subtable[..2], &[0, 4]);
/// ```
pub fn compile(map: &CharacterMap) -> Bytes {
    compile_segments(&form_segments(map))
}

/// Returns a `cmap` format 4 subtable representing the given segments.
///
/// The segments need to be in order of increasing `start` and end with a [sentinel](Segment::sentinel).
pub fn compile_segments(segments: &[Segment]) -> Bytes {
    let length = CONSTANT_SIZE + segments.len() * SEGMENT_SIZE;
    let mut buf = BytesMut::with_capacity(length);

    let format = 4;
    buf.put_u16(format);

    buf.put_u16(length as u16);

    let language = 0;
    buf.put_u16(language);

    let seg_count = segments.len() as u16;
    buf.put_u16(seg_count * 2);

    let (search_range, entry_selector, range_shift) = binary_search_params(seg_count, 2);
    buf.put_u16(search_range);
    buf.put_u16(entry_selector);
    buf.put_u16(range_shift);

    // endCode
    for segment in segments {
        buf.put_u16(segment.end);
    }

    let reserved_pad = 0;
    buf.put_u16(reserved_pad);

    // startCode
    for segment in segments {
        buf.put_u16(segment.start);
    }

    // idDelta
    for segment in segments {
        buf.put_i16(segment.id_delta);
    }

    // idRangeOffset
    for _ in segments {
        buf.put_u16(0);
    }

    assert_eq!(length, buf.len());

    buf.freeze()
}

/// Returns the shift segments of a character map, followed by the sentinel segment.
///
/// Characters outside of the BMP and glyph ids above `0xFFFF` are skipped.
/// A mapping of U+FFFF itself is left to the sentinel, which maps it to `.notdef`.
pub fn form_segments(map: &CharacterMap) -> Vec<Segment> {
    let bmp: BTreeMap<u16, u16> = map
        .iter()
        .filter_map(|(&code, &gid)| {
            let code = u16::try_from(code as u32).ok()?;
            let gid = u16::try_from(gid).ok()?;
            (code != SENTINEL_CODE).then_some((code, gid))
        })
        .collect();

    let mut segments: Vec<Segment> = Vec::new();
    let mut spans = bmp.iter().spans_by_key(
        |(&code, &gid)| (code as u32, gid as u32),
        |(code_a, gid_a), (code_b, gid_b)| code_a + 1 == code_b && gid_a + 1 == gid_b,
    );

    while let Some(mut span) = spans.next() {
        let Some((&start, &start_gid)) = span.next() else {
            continue;
        };
        let end = span.last().map_or(start, |(&x, _)| x);
        segments.push(Segment::shift(start, end, start_gid));
    }

    log::trace!("cmap format 4 segments: {:?}", segments);

    segments.push(Segment::sentinel());
    segments
}

/// A range of continuous character codes mapping to continuous glyph ids.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Segment {
    /// The first character code of the range.
    pub start: u16,
    /// The last character code of the range.
    pub end: u16,
    /// The value added to a character code, modulo 65536, to get its glyph id.
    pub id_delta: i16,
}

impl Segment {
    /// Returns a segment mapping `start..=end` to glyph ids starting at `start_gid`.
    pub fn shift(start: u16, end: u16, start_gid: u16) -> Segment {
        Segment {
            start,
            end,
            id_delta: start_gid.wrapping_sub(start) as i16,
        }
    }

    /// Returns the segment that terminates the list of segments.
    ///
    /// It covers U+FFFF and maps it to glyph id `0`.
    pub fn sentinel() -> Segment {
        Segment::shift(SENTINEL_CODE, SENTINEL_CODE, 0)
    }

    /// Returns the glyph id of a character code covered by the segment.
    pub fn glyph_id(&self, code: u16) -> Option<u16> {
        (self.start..=self.end)
            .contains(&code)
            .then(|| code.wrapping_add(self.id_delta as u16))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(segments: &[Segment], code: u16) -> u16 {
        segments
            .iter()
            .find_map(|x| x.glyph_id(code))
            .unwrap_or(0)
    }

    #[test]
    fn test_sentinel_maps_to_notdef() {
        let sentinel = Segment::sentinel();
        assert_eq!(sentinel.id_delta, 1);
        assert_eq!(sentinel.glyph_id(0xFFFF), Some(0));
    }

    #[test]
    fn test_form_segments_runs() {
        let map: CharacterMap = vec![('A', 1), ('B', 2), ('C', 3), ('M', 4), ('Z', 6), ('Y', 5)]
            .into_iter()
            .collect();
        let segments = form_segments(&map);
        assert_eq!(
            segments,
            vec![
                Segment::shift(0x41, 0x43, 1),
                Segment::shift(0x4D, 0x4D, 4),
                Segment::shift(0x59, 0x5A, 5),
                Segment::sentinel(),
            ]
        );
    }

    #[test]
    fn test_form_segments_breaks_on_unordered_glyph_ids() {
        // creation order differs from code point order
        let map: CharacterMap = vec![('M', 1), ('V', 2), ('O', 3), ('N', 4)].into_iter().collect();
        let segments = form_segments(&map);
        for (code, gid) in [(0x4D, 1), (0x4E, 4), (0x4F, 3), (0x56, 2), (0x50, 0)] {
            assert_eq!(lookup(&segments, code), gid);
        }
        assert_eq!(segments.len(), 4);
    }

    #[test]
    fn test_form_segments_skips_supplementary_planes() {
        let map: CharacterMap = vec![('a', 1), ('\u{1F600}', 2), ('\u{FFFF}', 3)]
            .into_iter()
            .collect();
        let segments = form_segments(&map);
        assert_eq!(segments, vec![Segment::shift(0x61, 0x61, 1), Segment::sentinel()]);
    }

    #[test]
    fn test_compile_layout() {
        let map: CharacterMap = vec![('M', 1)].into_iter().collect();
        let subtable = compile(&map);
        let read = |at: usize| u16::from_be_bytes([subtable[at], subtable[at + 1]]);

        assert_eq!(subtable.len(), 16 + 2 * 8);
        assert_eq!(read(0), 4);
        assert_eq!(read(2) as usize, subtable.len());
        assert_eq!(read(6), 4); // segCountX2
        assert_eq!(read(8), 4); // searchRange
        assert_eq!(read(10), 1); // entrySelector
        assert_eq!(read(12), 0); // rangeShift
        assert_eq!(read(14), 0x4D); // endCode[0]
        assert_eq!(read(16), 0xFFFF); // endCode[1]
        assert_eq!(read(18), 0); // reservedPad
        assert_eq!(read(20), 0x4D); // startCode[0]
        assert_eq!(read(22), 0xFFFF); // startCode[1]
        assert_eq!(read(24), 1u16.wrapping_sub(0x4D)); // idDelta[0]
        assert_eq!(read(26), 1); // idDelta[1]
        assert_eq!(read(28), 0);
        assert_eq!(read(30), 0);
    }
}
