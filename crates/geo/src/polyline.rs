//! Codec for the mapping vendor's encoded polyline format.
//!
//! Route shapes arrive as a compact ASCII string: each coordinate is a
//! delta against the previous one, scaled by 1e5, zig-zag mapped to an
//! unsigned integer, split into 5-bit groups (least significant first),
//! and emitted as bytes offset by 63 with 0x20 as the continuation bit.
//!
//! Decoding comes in two flavours. [`decode_polyline`] reproduces the
//! app's legacy behaviour where a truncated string silently terminates
//! the open chunk; [`decode_polyline_strict`] rejects such input with a
//! [`DecodeError`].

use crate::models::LatLng;

/// Malformed encoded polyline (strict mode only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("polyline ends mid-chunk at byte {0}")]
    TruncatedChunk(usize),

    #[error("polyline ends with an unpaired latitude delta at byte {0}")]
    UnpairedDelta(usize),
}

/// Decode an encoded polyline into coordinates, lenient legacy mode.
///
/// Matches the decoder the app has always shipped: input exhaustion
/// mid-chunk terminates the chunk contributing no further bits, so a
/// truncated string still yields points (the trailing one possibly with
/// a garbage or zero longitude delta). Use
/// [`decode_polyline_strict`] to reject such input instead.
///
/// An empty string decodes to an empty sequence.
pub fn decode_polyline(encoded: &str) -> Vec<LatLng> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut points = Vec::new();

    while cursor < bytes.len() {
        let (dlat, _) = read_delta(bytes, &mut cursor);
        lat += dlat;

        let (dlng, _) = read_delta(bytes, &mut cursor);
        lng += dlng;

        points.push(LatLng {
            latitude: lat as f64 / 1e5,
            longitude: lng as f64 / 1e5,
        });
    }

    points
}

/// Decode an encoded polyline, rejecting truncated input.
///
/// Fails when the string ends while a chunk is still open (continuation
/// bit set on the final byte) or when a latitude delta has no paired
/// longitude chunk.
pub fn decode_polyline_strict(encoded: &str) -> Result<Vec<LatLng>, DecodeError> {
    let bytes = encoded.as_bytes();
    let mut cursor = 0;
    let mut lat = 0i64;
    let mut lng = 0i64;
    let mut points = Vec::new();

    while cursor < bytes.len() {
        let start = cursor;
        let (dlat, closed) = read_delta(bytes, &mut cursor);
        if !closed {
            return Err(DecodeError::TruncatedChunk(start));
        }
        lat += dlat;

        if cursor == bytes.len() {
            return Err(DecodeError::UnpairedDelta(start));
        }
        let start = cursor;
        let (dlng, closed) = read_delta(bytes, &mut cursor);
        if !closed {
            return Err(DecodeError::TruncatedChunk(start));
        }
        lng += dlng;

        points.push(LatLng {
            latitude: lat as f64 / 1e5,
            longitude: lng as f64 / 1e5,
        });
    }

    Ok(points)
}

/// Encode coordinates into the vendor's polyline format.
///
/// Inverse of [`decode_polyline`]: `decode_polyline(&encode_polyline(p))`
/// reproduces `p` within the format's 1e-5 resolution.
pub fn encode_polyline(points: &[LatLng]) -> String {
    let mut out = String::new();
    let mut prev_lat = 0i64;
    let mut prev_lng = 0i64;

    for point in points {
        let lat = (point.latitude * 1e5).round() as i64;
        let lng = (point.longitude * 1e5).round() as i64;

        write_delta(lat - prev_lat, &mut out);
        write_delta(lng - prev_lng, &mut out);

        prev_lat = lat;
        prev_lng = lng;
    }

    out
}

/// Read one zig-zag encoded delta starting at `cursor`.
///
/// Returns the decoded delta and whether the chunk run was closed by a
/// byte with the continuation bit clear (`false` means the input ran
/// out mid-chunk).
fn read_delta(bytes: &[u8], cursor: &mut usize) -> (i64, bool) {
    let mut result = 0i64;
    let mut shift = 0u64;

    while let Some(&raw) = bytes.get(*cursor) {
        *cursor += 1;
        let b = i64::from(raw) - 63;
        // Bits past 63 cannot land in the accumulator; only malformed
        // input produces runs that long.
        if shift < 64 {
            result |= (b & 0x1f) << shift;
        }
        shift += 5;
        if b < 0x20 {
            return (unzigzag(result), true);
        }
    }

    (unzigzag(result), false)
}

fn unzigzag(value: i64) -> i64 {
    if value & 1 != 0 {
        !(value >> 1)
    } else {
        value >> 1
    }
}

fn write_delta(delta: i64, out: &mut String) {
    let mut value = (delta << 1) as u64;
    if delta < 0 {
        value = !value;
    }
    while value >= 0x20 {
        out.push((((value & 0x1f) | 0x20) as u8 + 63) as char);
        value >>= 5;
    }
    out.push((value as u8 + 63) as char);
}
