//! Encoded polyline format (precision 1e5).
//!
//! Each coordinate is stored as the delta from the previous one, latitude
//! first. Deltas are zig-zag folded and written as 5-bit groups offset by 63,
//! with 0x20 set on every group except the last of a value.
//!
//! The arithmetic is done by the `polyline` crate. Its line strings are
//! x = longitude, y = latitude; [`Coordinate`] is converted at this boundary.

use super::coord::{Coordinate, RoutePath};
use super::error::{DecodeError, EncodeError};
use geo_types::Coord;

const PRECISION: u32 = 5;
const CHAR_OFFSET: u8 = 63;
const CONTINUATION: u8 = 0x20;
// Deltas of valid coordinates fit in 28 bits; anything past seven groups is garbage.
const MAX_GROUPS: usize = 7;

pub fn decode(encoded: &str) -> Result<RoutePath, DecodeError> {
    check_framing(encoded.as_bytes())?;

    let line = ::polyline::decode_polyline(encoded, PRECISION)
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let points = line
        .into_iter()
        .map(|c| Coordinate::new(c.y, c.x))
        .collect::<Result<Vec<_>, _>>()?;

    RoutePath::new(points)
}

/// Rejects input the decoder would otherwise cut short: bytes outside the
/// alphabet, runaway values, a value left open on a continuation bit, and a
/// trailing latitude without its longitude.
fn check_framing(bytes: &[u8]) -> Result<(), DecodeError> {
    let mut values = 0usize;
    let mut groups = 0usize;
    let mut value_start = 0usize;

    for (offset, &byte) in bytes.iter().enumerate() {
        if !(CHAR_OFFSET..=126).contains(&byte) {
            return Err(DecodeError::InvalidCharacter { offset, byte });
        }
        if groups == 0 {
            value_start = offset;
        }
        groups += 1;
        if groups > MAX_GROUPS {
            return Err(DecodeError::Overflow {
                offset: value_start,
            });
        }
        if (byte - CHAR_OFFSET) & CONTINUATION == 0 {
            values += 1;
            groups = 0;
        }
    }

    if groups != 0 || values % 2 == 1 {
        return Err(DecodeError::Truncated {
            offset: bytes.len(),
        });
    }
    Ok(())
}

/// Inverse of [`decode`]. Values are rounded to the nearest 1e-5 degree.
pub fn encode(points: &[Coordinate]) -> Result<String, EncodeError> {
    let coords = points.iter().map(|p| Coord {
        x: p.lon(),
        y: p.lat(),
    });
    ::polyline::encode_coordinates(coords, PRECISION).map_err(|e| EncodeError(e.to_string()))
}
