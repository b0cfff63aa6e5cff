//! # name — Naming Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/name).
//!
//! A format 0 table with one record per name, all on the Windows platform with Unicode BMP encoding and the `en-US` language.
//! Strings are stored as UTF-16BE.

use crate::font::FontInfo;
use bytes::{BufMut, Bytes, BytesMut};
use std::mem::size_of;

/// The size in bytes of the `format`, `count`, and `storageOffset` fields.
const HEADER_SIZE: usize = 3 * size_of::<u16>();
/// The size in bytes of a name record.
const NAME_RECORD_SIZE: usize = 6 * size_of::<u16>();
/// The Windows platform.
const PLATFORM_ID: u16 = 3;
/// Unicode BMP.
const ENCODING_ID: u16 = 1;
/// `en-US`.
const LANGUAGE_ID: u16 = 0x0409;

/// The name ids written by [`compile`].
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub enum NameId {
    /// Font family name (1).
    FamilyName,
    /// Font subfamily name (2).
    SubfamilyName,
    /// Unique font identifier (3).
    UniqueId,
    /// Full font name (4).
    FullName,
    /// Version string (5).
    Version,
    /// PostScript name (6).
    PostScriptName,
}

impl NameId {
    /// Returns the numeric `nameID`.
    pub fn id(&self) -> u16 {
        match self {
            Self::FamilyName => 1,
            Self::SubfamilyName => 2,
            Self::UniqueId => 3,
            Self::FullName => 4,
            Self::Version => 5,
            Self::PostScriptName => 6,
        }
    }
}

/// Returns the names of a font, ordered by name id.
pub fn names(info: &FontInfo) -> Vec<(NameId, String)> {
    vec![
        (NameId::FamilyName, info.family_name.clone()),
        (NameId::SubfamilyName, "Regular".to_string()),
        (
            NameId::UniqueId,
            format!("{}:Version {}", info.postscript_name, info.version),
        ),
        (NameId::FullName, info.full_name.clone()),
        (NameId::Version, format!("Version {}", info.version)),
        (NameId::PostScriptName, info.postscript_name.clone()),
    ]
}

/// Returns a `name` table.
///
/// ```
/// # use iconforge::font::FontInfo;
/// # use iconforge::sfnt::tables::name::compile;
/// let table = compile(&FontInfo::new("ProTo"));
/// assert_eq!(&table[..4], &[0, 0, 0, 6]);
/// ```
pub fn compile(info: &FontInfo) -> Bytes {
    let encoded: Vec<(NameId, Vec<u8>)> = names(info)
        .into_iter()
        .map(|(id, value)| {
            let bytes = value.encode_utf16().flat_map(u16::to_be_bytes).collect();
            (id, bytes)
        })
        .collect();

    let storage_offset = HEADER_SIZE + encoded.len() * NAME_RECORD_SIZE;
    let length = storage_offset + encoded.iter().map(|(_, x)| x.len()).sum::<usize>();
    let mut buf = BytesMut::with_capacity(length);

    let format = 0;
    buf.put_u16(format);
    buf.put_u16(encoded.len() as u16);
    buf.put_u16(storage_offset as u16);

    let mut offset: u16 = 0;

    for (id, bytes) in &encoded {
        buf.put_u16(PLATFORM_ID);
        buf.put_u16(ENCODING_ID);
        buf.put_u16(LANGUAGE_ID);
        buf.put_u16(id.id());
        buf.put_u16(bytes.len() as u16);
        buf.put_u16(offset);

        offset += bytes.len() as u16;
    }

    for (_, bytes) in encoded {
        buf.put_slice(&bytes);
    }

    assert_eq!(length, buf.len());

    buf.freeze()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        let names = names(&FontInfo::new("ProTo"));
        let ids: Vec<u16> = names.iter().map(|(id, _)| id.id()).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(names[3].1, "ProTo Icon Font");
        assert_eq!(names[4].1, "Version 1.0");
    }

    #[test]
    fn test_compile_records() {
        let table = compile(&FontInfo::new("Ab"));
        let read = |at: usize| u16::from_be_bytes([table[at], table[at + 1]]);

        assert_eq!(read(4), 6 + 6 * 12);
        // first record: family name "Ab"
        assert_eq!(read(6), 3);
        assert_eq!(read(8), 1);
        assert_eq!(read(10), 0x0409);
        assert_eq!(read(12), 1);
        assert_eq!(read(14), 4);
        assert_eq!(read(16), 0);
        // second record follows the first string
        assert_eq!(read(24), 2);
        assert_eq!(read(26), 14); // "Regular"
        assert_eq!(read(28), 4);

        let storage = read(4) as usize;
        assert_eq!(&table[storage..storage + 4], &[0, b'A', 0, b'b']);
    }
}
