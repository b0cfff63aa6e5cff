//! # Format 12: Segmented coverage
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage).
//!
//! Format 12 covers all of Unicode with 32-bit character codes.
//! It is only written when an icon is mapped to a character beyond the Basic Multilingual Plane, such as an emoji code point.
//! Unlike [format 4](super::format4), every mapped character is included.
//!
//! ```
//! # use iconforge::data::CharacterMap;
//! # use iconforge::sfnt::tables::cmap::format12::{compile_groups, form_groups, Group};
//! let mut map = CharacterMap::new();
//! map.insert('\u{1F600}', 1);
//! map.insert('\u{1F601}', 2);
//! let groups = form_groups(&map);
//! assert_eq!(groups, vec![Group { start: 0x1F600, end: 0x1F601, start_gid: 1 }]);
//! let subtable = compile_groups(&groups);
//! assert_eq!(subtable.len(), 16 + 12);
//! ```

use crate::data::CharacterMap;
use bytes::{BufMut, Bytes, BytesMut};
use spans::Spans;
use std::mem::size_of;

/// The size in bytes of the `format` field.
const FORMAT_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `reserved` field.
const RESERVED_FIELD_SIZE: usize = size_of::<u16>();
/// The size in bytes of the `length` field.
const LENGTH_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the `language` field.
const LANGUAGE_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the `numGroups` field.
const NUM_GROUPS_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the subtable header.
const CONSTANT_SIZE: usize = FORMAT_FIELD_SIZE
    + RESERVED_FIELD_SIZE
    + LENGTH_FIELD_SIZE
    + LANGUAGE_FIELD_SIZE
    + NUM_GROUPS_FIELD_SIZE;
/// The size in bytes of the `startCharCode` field of a group.
const START_CHAR_CODE_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the `endCharCode` field of a group.
const END_CHAR_CODE_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of the `startGlyphID` field of a group.
const START_GLYPH_ID_FIELD_SIZE: usize = size_of::<u32>();
/// The size in bytes of a group.
const GROUP_SIZE: usize =
    START_CHAR_CODE_FIELD_SIZE + END_CHAR_CODE_FIELD_SIZE + START_GLYPH_ID_FIELD_SIZE;

/// Returns a `cmap` format 12 subtable for a character map.
pub fn compile(map: &CharacterMap) -> Bytes {
    compile_groups(&form_groups(map))
}

/// Returns a `cmap` format 12 subtable for groups in order of increasing `start`.
pub fn compile_groups(groups: &[Group]) -> Bytes {
    let length = CONSTANT_SIZE + groups.len() * GROUP_SIZE;
    let mut buf = BytesMut::with_capacity(length);

    buf.put_u16(12);
    // reserved
    buf.put_u16(0);
    buf.put_u32(length as u32);
    // language
    buf.put_u32(0);
    buf.put_u32(groups.len() as u32);

    for group in groups {
        buf.put_u32(group.start);
        buf.put_u32(group.end);
        buf.put_u32(group.start_gid);
    }

    assert_eq!(length, buf.len());

    buf.freeze()
}

/// Returns the groups of a character map in order of increasing `start`.
///
/// A group is a run of consecutive characters mapped to consecutive glyph ids.
pub fn form_groups(map: &CharacterMap) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut spans = map.iter().spans_by_key(
        |(&code, &gid)| (code as u32, gid),
        |(code_a, gid_a), (code_b, gid_b)| code_a + 1 == code_b && gid_a + 1 == gid_b,
    );

    while let Some(mut span) = spans.next() {
        let Some((&first, &start_gid)) = span.next() else {
            continue;
        };
        let last = span.last().map_or(first, |(&x, _)| x);
        groups.push(Group {
            start: first as u32,
            end: last as u32,
            start_gid,
        });
    }

    log::trace!("cmap format 12 groups: {:?}", groups);

    groups
}

/// A range of continuous character codes mapping to continuous glyph ids.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Group {
    /// The first character code of the range.
    pub start: u32,
    /// The last character code of the range.
    pub end: u32,
    /// The glyph id of `start`.
    pub start_gid: u32,
}

impl Group {
    /// Returns the glyph id of a character code covered by the group.
    pub fn glyph_id(&self, code: u32) -> Option<u32> {
        (self.start..=self.end)
            .contains(&code)
            .then(|| self.start_gid + (code - self.start))
    }
}
