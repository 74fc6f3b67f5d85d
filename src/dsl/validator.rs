use serde_json::Value;

use crate::dsl::model::{Pixel, PixelSet, GRID_MAX};
use crate::error::PixelError;

/// How strictly `hexCode` is checked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HexPolicy {
    /// Any string is passed through unchanged.
    #[default]
    Lenient,
    /// Only `#RRGGBB` is accepted.
    Strict,
}

/// Parses an extracted array and normalizes every element. The first invalid
/// element rejects the whole batch.
pub fn validate_pixels(array_text: &str, policy: HexPolicy) -> Result<PixelSet, PixelError> {
    let value: Value = serde_json::from_str(array_text)?;
    let items = value.as_array().ok_or(PixelError::Shape)?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| validate_pixel(index, item, policy))
        .collect()
}

fn validate_pixel(index: usize, item: &Value, policy: HexPolicy) -> Result<Pixel, PixelError> {
    let invalid = |reason: &str| PixelError::Element { index, reason: reason.to_string() };

    let hex_code = item
        .get("hexCode")
        .and_then(Value::as_str)
        .ok_or_else(|| invalid("hexCode must be a string"))?;
    let column = item
        .get("column")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("column must be a number"))?;
    let row = item
        .get("row")
        .and_then(Value::as_f64)
        .ok_or_else(|| invalid("row must be a number"))?;

    if policy == HexPolicy::Strict && !is_hex_color(hex_code) {
        return Err(invalid("hexCode must be #RRGGBB"));
    }

    Ok(Pixel {
        hex_code: hex_code.to_string(),
        column: normalize_coordinate(column),
        row: normalize_coordinate(row),
    })
}

/// Floor, then clamp into `[0, 15]`.
pub fn normalize_coordinate(value: f64) -> u8 {
    value.floor().clamp(0.0, GRID_MAX as f64) as u8
}

pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != 7 || bytes[0] != b'#' {
        return false;
    }
    bytes[1..].iter().all(u8::is_ascii_hexdigit)
}
