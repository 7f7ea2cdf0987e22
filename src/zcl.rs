//! Cluster and attribute identities, plus wire-value conversions.
//!
//! Only the identifiers this device actually exposes. Level and
//! chromaticity attributes arrive in their ZCL integer encodings and are
//! converted to `[0, 1]` fractions at this boundary.

use heapless::Vec;

/// On/Off cluster.
pub const CLUSTER_ON_OFF: u16 = 0x0006;
/// Level Control cluster.
pub const CLUSTER_LEVEL_CONTROL: u16 = 0x0008;
/// Color Control cluster.
pub const CLUSTER_COLOR_CONTROL: u16 = 0x0300;

/// OnOff attribute of the On/Off cluster.
pub const ATTR_ON_OFF: u16 = 0x0000;
/// CurrentLevel attribute of the Level Control cluster.
pub const ATTR_CURRENT_LEVEL: u16 = 0x0000;
/// CurrentX attribute of the Color Control cluster.
pub const ATTR_CURRENT_X: u16 = 0x0003;
/// CurrentY attribute of the Color Control cluster.
pub const ATTR_CURRENT_Y: u16 = 0x0004;

/// Highest CurrentLevel value on the wire.
pub const LEVEL_MAX: f64 = 254.0;
/// Highest chromaticity coordinate value on the wire.
pub const CHROMA_MAX: f64 = 65535.0;

/// Encoded length of a character string attribute: one length byte plus
/// up to 32 characters.
pub const STRING_ATTR_LEN: usize = 33;

/// Convert a wire level (0-254) to a brightness fraction.
///
/// The wire range tops out at 254, so a raw 255 maps above 1.0 and fails
/// range validation downstream instead of silently clamping.
pub fn level_to_brightness(level: u8) -> f64 {
    f64::from(level) / LEVEL_MAX
}

/// Convert a brightness fraction to a wire level, rounding to nearest.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness_to_level(brightness: f64) -> u8 {
    libm::round(brightness * LEVEL_MAX) as u8
}

/// Convert a wire chromaticity coordinate to a `[0, 1]` fraction.
pub fn raw_to_chroma(raw: u16) -> f64 {
    f64::from(raw) / CHROMA_MAX
}

/// Convert a `[0, 1]` chromaticity coordinate to its wire encoding.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn chroma_to_raw(value: f64) -> u16 {
    libm::round(value * CHROMA_MAX) as u16
}

/// Encode a string as a length-prefixed ZCL character string.
///
/// Input longer than the attribute buffer is truncated.
#[allow(clippy::cast_possible_truncation)]
pub fn string_attr(value: &str) -> Vec<u8, STRING_ATTR_LEN> {
    let mut out = Vec::new();
    let bytes = value.as_bytes();
    let len = bytes.len().min(STRING_ATTR_LEN - 1);
    // Length prefix plus payload always fit the fixed buffer.
    let _ = out.push(len as u8);
    let _ = out.extend_from_slice(&bytes[..len]);
    out
}
