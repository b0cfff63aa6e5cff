//! Types used throughout an SFNT file.

use crate::outline::Outline;
use std::time::{SystemTime, UNIX_EPOCH};

/// Interpretation of four bytes as a four-letter tag.
#[derive(PartialEq, Eq, Hash, Copy, Clone)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Creates a tag by interpreting a `u32` as 4 bytes with a big-endian layout.
    ///
    /// Returns `None` if any of the bytes are not in the range from `0x20` to `0x7E` (both inclusive). This value restriction matches the [OpenType specification for tags](https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types).
    #[inline]
    pub fn from_u32(value: u32) -> Option<Tag> {
        let bytes = value.to_be_bytes();

        if bytes.iter().any(|&x| !(0x20..=0x7E).contains(&x)) {
            None
        } else {
            Some(Tag(bytes))
        }
    }

    /// Returns the tag as a big-endian `u32`.
    #[inline]
    pub fn as_u32(&self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl From<Tag> for u32 {
    fn from(tag: Tag) -> u32 {
        tag.as_u32()
    }
}

impl From<Tag> for [u8; 4] {
    fn from(tag: Tag) -> [u8; 4] {
        let Tag(bytes) = tag;
        bytes
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Tag(bytes) = self;
        write!(
            f,
            "'{}{}{}{}'",
            bytes[0] as char, bytes[1] as char, bytes[2] as char, bytes[3] as char
        )
    }
}

impl std::fmt::Debug for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let Tag(bytes) = self;
        for byte in bytes {
            write!(f, "{}", std::ascii::escape_default(*byte))?;
        }
        Ok(())
    }
}

/// A bounding box in whole font units, as stored in `head` and `glyf`.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Bounds {
    /// The left edge.
    pub x_min: i16,
    /// The bottom edge.
    pub y_min: i16,
    /// The right edge.
    pub x_max: i16,
    /// The top edge.
    pub y_max: i16,
}

impl Bounds {
    /// Returns the bounds of all points of an outline, or `None` if the outline is empty.
    pub fn of(outline: &Outline) -> Option<Bounds> {
        outline.control_bounds().map(|x| Bounds {
            x_min: to_fword(x.x_min.floor()),
            y_min: to_fword(x.y_min.floor()),
            x_max: to_fword(x.x_max.ceil()),
            y_max: to_fword(x.y_max.ceil()),
        })
    }

    /// Returns the smallest bounds containing both bounds.
    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(other.x_min),
            y_min: self.y_min.min(other.y_min),
            x_max: self.x_max.max(other.x_max),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// Converts a coordinate to an `FWORD`, saturating at the bounds of `i16`.
pub fn to_fword(value: f64) -> i16 {
    value.round().clamp(f64::from(i16::MIN), f64::from(i16::MAX)) as i16
}

/// Returns the `searchRange`, `entrySelector`, and `rangeShift` fields for a binary search over `count` items of `unit_size` bytes.
///
/// ```
/// # use iconforge::sfnt::types::binary_search_params;
/// assert_eq!(binary_search_params(10, 16), (128, 3, 32));
/// assert_eq!(binary_search_params(1, 2), (2, 0, 0));
/// ```
pub fn binary_search_params(count: u16, unit_size: u16) -> (u16, u16, u16) {
    if count == 0 {
        return (0, 0, 0);
    }

    let entry_selector = 15 - count.leading_zeros() as u16;
    let search_range = (1u16 << entry_selector) * unit_size;
    let range_shift = count * unit_size - search_range;

    (search_range, entry_selector, range_shift)
}

/// Converts a version string such as `1.0` or `2.15` to a 16.16 fixed-point number.
///
/// Unparsable versions yield `1.0`.
pub fn version_to_fixed(version: &str) -> u32 {
    let value = version
        .trim()
        .trim_start_matches(|x: char| x == 'v' || x == 'V')
        .parse::<f64>()
        .unwrap_or(1.0);
    (value.max(0.0) * 65536.0).round() as u32
}

/// The number of seconds between 1904-01-01 and 1970-01-01.
const MAC_EPOCH_OFFSET: i64 = 2_082_844_800;

/// Returns a `LONGDATETIME`: the seconds since 1904-01-01 00:00 UTC.
pub fn long_date_time(time: SystemTime) -> i64 {
    let unix = time
        .duration_since(UNIX_EPOCH)
        .map_or(0, |x| x.as_secs() as i64);
    unix + MAC_EPOCH_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tag_from_u32() {
        assert_eq!(Tag::from_u32(0x636D6170), Some(Tag(*b"cmap")));
        assert_eq!(Tag::from_u32(0x00010000), None);
    }

    #[test]
    fn test_tag_display_and_debug() {
        assert_eq!(format!("{}", Tag(*b"OS/2")), "'OS/2'");
        assert_eq!(format!("{:?}", Tag([0, b'a', b'b', b'c'])), "\\x00abc");
    }

    #[test]
    fn test_binary_search_params() {
        assert_eq!(binary_search_params(0, 16), (0, 0, 0));
        assert_eq!(binary_search_params(9, 16), (128, 3, 16));
        assert_eq!(binary_search_params(16, 16), (256, 4, 0));
        assert_eq!(binary_search_params(3, 2), (4, 1, 2));
    }

    #[test]
    fn test_version_to_fixed() {
        assert_eq!(version_to_fixed("1.0"), 0x0001_0000);
        assert_eq!(version_to_fixed("2.5"), 0x0002_8000);
        assert_eq!(version_to_fixed("v3"), 0x0003_0000);
        assert_eq!(version_to_fixed("beta"), 0x0001_0000);
    }

    #[test]
    fn test_long_date_time() {
        assert_eq!(long_date_time(UNIX_EPOCH), MAC_EPOCH_OFFSET);
        assert_eq!(
            long_date_time(UNIX_EPOCH + Duration::from_secs(60)),
            MAC_EPOCH_OFFSET + 60
        );
    }

    #[test]
    fn test_bounds_of_outline() {
        assert_eq!(Bounds::of(&Outline::new()), None);
        assert_eq!(
            Bounds::of(&Outline::placeholder()),
            Some(Bounds {
                x_min: 100,
                y_min: 100,
                x_max: 500,
                y_max: 500
            })
        );
    }
}
