//! # cmap — Character to Glyph Index Mapping Table
//!
//! *Specification:*
//! [OpenType](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap),
//! [TrueType](https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6cmap.html).
//!
//! The `cmap` table maps the characters of an icon font to its glyphs, so that a browser rendering `content: "M"` finds the icon drawn for `M`.
//!
//! A `cmap` table consists of one or multiple subtables, each reached through an encoding record naming a platform, an encoding, and the subtable format.
//! Records using the same format share a single subtable.
//!
//! Set [`Context::cmap_encoding_records`] to choose the encoding records; by default a format 4 subtable is written for the Unicode and Windows platforms, plus format 12 when a character lies beyond the BMP.
//!
//! ```
//! # use iconforge::ctx::Context;
//! # use iconforge::data::CharacterMap;
//! # use iconforge::sfnt::tables::cmap::compile;
//! let mut map = CharacterMap::new();
//! map.insert('M', 1);
//! map.insert('V', 2);
//! let table = compile(&map, &Context::default());
//! assert_eq!(&table[..4], &[0, 0, 0, 2]);
//! ```

pub mod format12;
pub mod format4;

use crate::ctx::Context;
use crate::data::CharacterMap;
use bytes::{BufMut, Bytes, BytesMut};
use itertools::Itertools;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::mem::size_of;

/// The size in bytes of `version` and `numTables`.
const HEADER_SIZE: usize = 2 * size_of::<u16>();
/// The size in bytes of an encoding record: `platformID`, `encodingID`, and `subtableOffset`.
const ENCODING_RECORD_SIZE: usize = 2 * size_of::<u16>() + size_of::<u32>();
/// The largest Unicode scalar that is part of the Basic Multilingual Plane (BMP).
const MAX_BMP_SCALAR: char = '\u{FFFF}';

lazy_static! {
    /// The records of a font whose characters all lie in the BMP, sorted.
    static ref BMP_RECORDS: Vec<EncodingRecord> = vec![
        EncodingRecord::new(Encoding::UnicodeBmp, RecordFormat::Format4),
        EncodingRecord::new(Encoding::WindowsBmp, RecordFormat::Format4),
    ];
    /// The records of a font with characters beyond the BMP, sorted.
    static ref FULL_RECORDS: Vec<EncodingRecord> = vec![
        EncodingRecord::new(Encoding::UnicodeBmp, RecordFormat::Format4),
        EncodingRecord::new(Encoding::UnicodeFull, RecordFormat::Format12),
        EncodingRecord::new(Encoding::WindowsBmp, RecordFormat::Format4),
        EncodingRecord::new(Encoding::WindowsFull, RecordFormat::Format12),
    ];
}

/// Returns a `cmap` table for the given character map.
///
/// Subtables are written in the order their format first appears in the records.
pub fn compile(map: &CharacterMap, ctx: &Context) -> Bytes {
    let records = ctx.cmap_encoding_records.as_ref().unwrap_or_else(|| {
        if map.keys().last().map_or(false, |&x| x > MAX_BMP_SCALAR) {
            &FULL_RECORDS
        } else {
            &BMP_RECORDS
        }
    });
    log::debug!("cmap encoding records: {}", records.iter().join(", "));

    let formats: Vec<RecordFormat> = records.iter().map(|x| x.format).unique().collect();
    let subtables: Vec<Bytes> = formats
        .iter()
        .map(|format| match format {
            RecordFormat::Format4 => format4::compile(map),
            RecordFormat::Format12 => format12::compile(map),
        })
        .collect();

    let directory_size = HEADER_SIZE + records.len() * ENCODING_RECORD_SIZE;
    let mut offsets: HashMap<RecordFormat, u32> = HashMap::new();
    let mut offset = directory_size;
    for (format, subtable) in formats.iter().zip(&subtables) {
        offsets.insert(*format, offset as u32);
        offset += subtable.len();
    }

    let length = offset;
    let mut buf = BytesMut::with_capacity(length);

    // version
    buf.put_u16(0);
    buf.put_u16(records.len() as u16);

    for record in records {
        let (platform_id, encoding_id) = record.encoding.ids();
        buf.put_u16(platform_id);
        buf.put_u16(encoding_id);
        buf.put_u32(offsets.get(&record.format).copied().unwrap_or_default());
    }

    for (format, subtable) in formats.iter().zip(subtables) {
        log::trace!("cmap format {} subtable: {} bytes", format, subtable.len());
        buf.put(subtable);
    }

    assert_eq!(length, buf.len());

    buf.freeze()
}

/// An encoding record describes a `cmap` subtable.
///
/// Records are ordered by platform id and encoding id, the order they have in the table.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct EncodingRecord {
    /// The platform and encoding of the subtable.
    pub encoding: Encoding,
    /// The subtable format.
    pub format: RecordFormat,
}

impl EncodingRecord {
    /// Creates a record.
    pub fn new(encoding: Encoding, format: RecordFormat) -> Self {
        EncodingRecord { encoding, format }
    }

    /// Creates a record from a code of the form `<platform_id>/<encoding_id>=<format_id>`.
    ///
    /// The `Display` implementation writes the same form.
    ///
    /// ```
    /// # use iconforge::sfnt::tables::cmap::{Encoding, EncodingRecord, RecordFormat};
    /// assert_eq!(
    ///     EncodingRecord::from_code("0/3=4"),
    ///     Ok(EncodingRecord::new(Encoding::UnicodeBmp, RecordFormat::Format4))
    /// );
    /// ```
    pub fn from_code(code: &str) -> Result<EncodingRecord, ReadError> {
        let (selection, format) = code.trim().split_once('=').ok_or(ReadError::InvalidSyntax)?;
        let (platform, encoding) = selection.split_once('/').ok_or(ReadError::InvalidSyntax)?;

        let platform_id: u16 = platform.parse().map_err(|_| ReadError::InvalidPlatform)?;
        let encoding_id: u16 = encoding.parse().map_err(|_| ReadError::InvalidEncoding)?;
        let format_id: u16 = format.parse().map_err(|_| ReadError::InvalidFormat)?;

        Ok(EncodingRecord {
            encoding: Encoding::from_ids(platform_id, encoding_id)?,
            format: RecordFormat::from_id(format_id).ok_or(ReadError::UnsupportedFormat)?,
        })
    }
}

impl std::str::FromStr for EncodingRecord {
    type Err = ReadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EncodingRecord::from_code(s)
    }
}

impl fmt::Display for EncodingRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (platform_id, encoding_id) = self.encoding.ids();
        write!(f, "{}/{}={}", platform_id, encoding_id, self.format)
    }
}

/// A supported combination of `platformID` and `encodingID`, in table order.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Encoding {
    /// Unicode platform, BMP only (`0/3`).
    UnicodeBmp,
    /// Unicode platform, full repertoire (`0/4`).
    UnicodeFull,
    /// Windows platform, Unicode BMP (`3/1`).
    WindowsBmp,
    /// Windows platform, Unicode full repertoire (`3/10`).
    WindowsFull,
}

impl Encoding {
    /// Returns the encoding of a `platformID` and `encodingID`.
    ///
    /// # Errors
    ///
    /// Fails if either id is unsupported.
    pub fn from_ids(platform_id: u16, encoding_id: u16) -> Result<Self, ReadError> {
        match (platform_id, encoding_id) {
            (0, 3) => Ok(Self::UnicodeBmp),
            (0, 4) => Ok(Self::UnicodeFull),
            (3, 1) => Ok(Self::WindowsBmp),
            (3, 10) => Ok(Self::WindowsFull),
            (0 | 3, _) => Err(ReadError::UnsupportedEncoding),
            _ => Err(ReadError::UnsupportedPlatform),
        }
    }

    /// Returns the `platformID` and `encodingID`.
    pub fn ids(&self) -> (u16, u16) {
        match self {
            Self::UnicodeBmp => (0, 3),
            Self::UnicodeFull => (0, 4),
            Self::WindowsBmp => (3, 1),
            Self::WindowsFull => (3, 10),
        }
    }
}

/// The supported `cmap` subtable formats.
#[derive(Debug, PartialOrd, Ord, PartialEq, Eq, Hash, Clone, Copy)]
pub enum RecordFormat {
    /// Segment mapping to delta values, see [`format4`].
    Format4,
    /// Segmented coverage, see [`format12`].
    Format12,
}

impl RecordFormat {
    /// Returns the format of a subtable format id.
    pub fn from_id(id: u16) -> Option<Self> {
        match id {
            4 => Some(Self::Format4),
            12 => Some(Self::Format12),
            _ => None,
        }
    }

    /// Returns the subtable format id.
    pub fn id(&self) -> u16 {
        match self {
            Self::Format4 => 4,
            Self::Format12 => 12,
        }
    }
}

impl fmt::Display for RecordFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// An error that may occur when reading an encoding record code.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum ReadError {
    /// The code is not of the form `<platform>/<encoding>=<format>`.
    InvalidSyntax,
    /// The platform id is not a number.
    InvalidPlatform,
    /// The encoding id is not a number.
    InvalidEncoding,
    /// The format id is not a number.
    InvalidFormat,
    /// The platform is neither Unicode (`0`) nor Windows (`3`).
    UnsupportedPlatform,
    /// The encoding is not a Unicode encoding of its platform.
    UnsupportedEncoding,
    /// The format is neither `4` nor `12`.
    UnsupportedFormat,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::InvalidSyntax => "expected <platform>/<encoding>=<format>",
            Self::InvalidPlatform => "the platform id is not a number",
            Self::InvalidEncoding => "the encoding id is not a number",
            Self::InvalidFormat => "the format id is not a number",
            Self::UnsupportedPlatform => "the platform id is not supported",
            Self::UnsupportedEncoding => "the encoding id is not supported",
            Self::UnsupportedFormat => "the format is not supported",
        };
        f.write_str(message)
    }
}

impl std::error::Error for ReadError {}
