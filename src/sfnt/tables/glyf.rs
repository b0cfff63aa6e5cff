//! # glyf — Glyph Data, and loca — Index to Location
//!
//! *Specification:*
//! [OpenType `glyf`](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf),
//! [OpenType `loca`](https://docs.microsoft.com/en-us/typography/opentype/spec/loca).
//!
//! Every glyph is written as a simple glyph without instructions.
//! Glyphs without contours occupy no bytes in `glyf`; their `loca` entry equals the next one.
//!
//! Coordinates are stored as deltas from the previous point.
//! A delta that fits into a byte is stored as a byte with its sign in the flags, a zero delta is not stored at all.
//! Runs of equal flags are collapsed using the `REPEAT_FLAG` bit.

use crate::outline::Outline;
use crate::sfnt::types::{to_fword, Bounds};
use crate::sfnt::GlyphRecord;
use bytes::{BufMut, Bytes, BytesMut};

const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
/// With `X_SHORT_VECTOR`: the delta is positive. Without: the delta is zero.
const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: u8 = 0x10;
/// With `Y_SHORT_VECTOR`: the delta is positive. Without: the delta is zero.
const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: u8 = 0x20;

/// Returns the `glyf` and `loca` tables for glyphs in glyph id order.
///
/// `loca` uses the long format; see [`head::INDEX_TO_LOC_FORMAT_LONG`](super::head::INDEX_TO_LOC_FORMAT_LONG).
pub fn compile(glyphs: &[GlyphRecord]) -> (Bytes, Bytes) {
    let mut glyf = BytesMut::new();
    let mut loca = BytesMut::with_capacity((glyphs.len() + 1) * 4);

    for glyph in glyphs {
        loca.put_u32(glyf.len() as u32);

        if let Some(bounds) = glyph.bounds {
            compile_simple_glyph(&mut glyf, &glyph.outline, bounds);

            while glyf.len() % 4 != 0 {
                glyf.put_u8(0);
            }
        }
    }

    loca.put_u32(glyf.len() as u32);

    log::trace!("glyf: {} bytes for {} glyphs", glyf.len(), glyphs.len());

    (glyf.freeze(), loca.freeze())
}

/// Appends the description of a simple glyph to `buf`.
fn compile_simple_glyph(buf: &mut BytesMut, outline: &Outline, bounds: Bounds) {
    buf.put_i16(outline.contours.len() as i16);
    buf.put_i16(bounds.x_min);
    buf.put_i16(bounds.y_min);
    buf.put_i16(bounds.x_max);
    buf.put_i16(bounds.y_max);

    let mut end_point: u16 = 0;
    for contour in &outline.contours {
        end_point += contour.points.len() as u16;
        buf.put_u16(end_point - 1);
    }

    let instruction_length = 0;
    buf.put_u16(instruction_length);

    let mut flags: Vec<u8> = Vec::new();
    let mut x_coordinates = BytesMut::new();
    let mut y_coordinates = BytesMut::new();
    let (mut previous_x, mut previous_y) = (0i32, 0i32);

    for point in outline.contours.iter().flat_map(|x| &x.points) {
        let x = i32::from(to_fword(point.x));
        let y = i32::from(to_fword(point.y));
        let mut flag = if point.on_curve { ON_CURVE_POINT } else { 0 };

        flag |= put_delta(
            &mut x_coordinates,
            x - previous_x,
            X_SHORT_VECTOR,
            X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR,
        );
        flag |= put_delta(
            &mut y_coordinates,
            y - previous_y,
            Y_SHORT_VECTOR,
            Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR,
        );

        flags.push(flag);
        previous_x = x;
        previous_y = y;
    }

    put_flags(buf, &flags);
    buf.put(x_coordinates);
    buf.put(y_coordinates);
}

/// Writes a coordinate delta in its shortest form and returns the flag bits describing it.
fn put_delta(buf: &mut BytesMut, delta: i32, short: u8, same_or_positive: u8) -> u8 {
    if delta == 0 {
        same_or_positive
    } else if delta.abs() <= i32::from(u8::MAX) {
        buf.put_u8(delta.unsigned_abs() as u8);
        if delta > 0 {
            short | same_or_positive
        } else {
            short
        }
    } else {
        buf.put_i16(delta as i16);
        0
    }
}

/// Writes flags, collapsing runs of equal flags.
fn put_flags(buf: &mut BytesMut, flags: &[u8]) {
    let mut index = 0;

    while index < flags.len() {
        let flag = flags[index];
        let repeats = flags[index + 1..]
            .iter()
            .take(u8::MAX as usize)
            .take_while(|&&x| x == flag)
            .count();

        if repeats > 0 {
            buf.put_u8(flag | REPEAT_FLAG);
            buf.put_u8(repeats as u8);
        } else {
            buf.put_u8(flag);
        }

        index += repeats + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::{Contour, Point};

    fn record(outline: Outline) -> GlyphRecord {
        GlyphRecord {
            bounds: Bounds::of(&outline),
            outline,
            advance_width: 600,
        }
    }

    #[test]
    fn test_put_delta() {
        let mut buf = BytesMut::new();
        assert_eq!(put_delta(&mut buf, 0, 0x02, 0x10), 0x10);
        assert_eq!(put_delta(&mut buf, 200, 0x02, 0x10), 0x12);
        assert_eq!(put_delta(&mut buf, -5, 0x02, 0x10), 0x02);
        assert_eq!(put_delta(&mut buf, -400, 0x02, 0x10), 0);
        assert_eq!(&buf[..], &[200, 5, 0xFE, 0x70]);
    }

    #[test]
    fn test_put_flags_repeats() {
        let mut buf = BytesMut::new();
        put_flags(&mut buf, &[1, 1, 1, 0x21, 1]);
        assert_eq!(&buf[..], &[1 | REPEAT_FLAG, 2, 0x21, 1]);
    }

    #[test]
    fn test_compile_placeholder() {
        let glyphs = vec![record(Outline::new()), record(Outline::placeholder())];
        let (glyf, loca) = compile(&glyphs);

        // numberOfContours, bounds, one endPtsOfContours, instructionLength
        let header = [0, 1, 0, 100, 0, 100, 1, 0xF4, 1, 0xF4, 0, 3, 0, 0];
        assert_eq!(&glyf[..14], &header);
        // (100,100) (100,500) (500,500) (500,100)
        let flags = [0x37, 0x11, 0x21, 0x11];
        assert_eq!(&glyf[14..18], &flags);
        // x: +100, 0, +400 (long), 0
        assert_eq!(&glyf[18..21], &[100, 0x01, 0x90]);
        // y: +100, +400 (long), 0, -400 (long)
        assert_eq!(&glyf[21..26], &[100, 0x01, 0x90, 0xFE, 0x70]);
        assert_eq!(&glyf[26..], &[0, 0]);

        assert_eq!(&loca[..], &[0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 28]);
    }

    #[test]
    fn test_compile_pads_to_four_bytes() {
        let triangle = Outline {
            contours: vec![Contour {
                points: vec![
                    Point::on(0.0, 0.0),
                    Point::off(10.0, 10.0),
                    Point::on(20.0, 0.0),
                ],
            }],
        };
        let (glyf, loca) = compile(&[record(triangle.clone()), record(triangle)]);
        assert_eq!(glyf.len() % 4, 0);
        let second = u32::from_be_bytes([loca[4], loca[5], loca[6], loca[7]]);
        assert_eq!(second as usize * 2, glyf.len());
    }
}
