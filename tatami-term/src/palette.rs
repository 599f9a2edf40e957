//! X11-style color specification parsing
//!
//! OSC 4/10/11/12 carry colors as either `rgb:RR/GG/BB` (1-4 hex digits
//! per channel, scaled to 8 bits) or `#RRGGBB` (3, 6, 9, or 12 digits
//! total, high bits first). Anything else is rejected; the caller logs
//! and ignores the failure.

use thiserror::Error;

/// Error parsing a color specification
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorSpecError {
    /// Not an `rgb:` or `#` form
    #[error("unsupported color format: {0:?}")]
    UnsupportedFormat(String),

    /// Wrong number of components or digits
    #[error("malformed color components: {0:?}")]
    MalformedComponents(String),

    /// A component held non-hex characters
    #[error("invalid hex digits: {0:?}")]
    InvalidHex(String),
}

/// Parse a color specification into 8-bit RGB
pub fn parse_color_spec(spec: &str) -> Result<(u8, u8, u8), ColorSpecError> {
    if let Some(rest) = spec.strip_prefix("rgb:") {
        return parse_rgb_slashes(rest);
    }
    if let Some(rest) = spec.strip_prefix('#') {
        return parse_sharp(rest);
    }
    Err(ColorSpecError::UnsupportedFormat(spec.to_string()))
}

/// `rgb:R/G/B` with 1-4 hex digits per channel
fn parse_rgb_slashes(body: &str) -> Result<(u8, u8, u8), ColorSpecError> {
    let parts: Vec<&str> = body.split('/').collect();
    if parts.len() != 3 {
        return Err(ColorSpecError::MalformedComponents(body.to_string()));
    }
    let mut channels = [0u8; 3];
    for (channel, part) in channels.iter_mut().zip(&parts) {
        *channel = parse_scaled_channel(part)?;
    }
    Ok((channels[0], channels[1], channels[2]))
}

/// Scale a 1-4 digit hex value to 8 bits against its own maximum
fn parse_scaled_channel(digits: &str) -> Result<u8, ColorSpecError> {
    if digits.is_empty() || digits.len() > 4 {
        return Err(ColorSpecError::MalformedComponents(digits.to_string()));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|_| ColorSpecError::InvalidHex(digits.to_string()))?;
    let max = (1u32 << (4 * digits.len())) - 1;
    Ok(((value * 255 + max / 2) / max) as u8)
}

/// `#RGB`, `#RRGGBB`, `#RRRGGGBBB`, `#RRRRGGGGBBBB`: high bits first
fn parse_sharp(digits: &str) -> Result<(u8, u8, u8), ColorSpecError> {
    let per_channel = match digits.len() {
        3 => 1,
        6 => 2,
        9 => 3,
        12 => 4,
        _ => return Err(ColorSpecError::MalformedComponents(digits.to_string())),
    };
    let mut channels = [0u8; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        let part = &digits[i * per_channel..(i + 1) * per_channel];
        let value = u32::from_str_radix(part, 16)
            .map_err(|_| ColorSpecError::InvalidHex(part.to_string()))?;
        // Unlike rgb:, the # form is left-aligned: take the top 8 bits
        *channel = (value << (4 * (4 - per_channel)) >> 8) as u8;
    }
    Ok((channels[0], channels[1], channels[2]))
}
