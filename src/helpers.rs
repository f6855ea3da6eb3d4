use crate::{prelude::*, Error};
use ethers::types::U256;

/// Strips an optional `0x`/`0X` prefix.
pub(crate) fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

pub fn add_hex_prefix(value: &str) -> String {
    if value.starts_with("0x") || value.starts_with("0X") {
        value.to_string()
    } else {
        format!("0x{value}")
    }
}

/// Parses a hex-encoded integer quantity. The prefix is optional; an empty
/// digit string, a non-hex digit or a value wider than 256 bits is rejected.
pub fn parse_hex_quantity(value: &str) -> Option<U256> {
    let digits = strip_hex_prefix(value.trim());
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        return Some(U256::zero());
    }
    if significant.len() > 64 {
        return None;
    }
    U256::from_str_radix(significant, 16).ok()
}

/// Like [`parse_hex_quantity`], but reports the offending field.
pub(crate) fn require_hex_quantity(field: &str, value: &str) -> Result<U256> {
    parse_hex_quantity(value).ok_or_else(|| Error::parse(field, value))
}

/// Parses an optional field, treating an absent value as `None`.
pub(crate) fn optional_hex_quantity(field: &str, value: Option<&str>) -> Result<Option<U256>> {
    value.map(|v| require_hex_quantity(field, v)).transpose()
}

/// Minimal lower-case hex with a `0x` prefix; zero encodes as `0x0`.
pub fn int_to_hex(value: U256) -> String {
    format!("0x{value:x}")
}

/// Returns true when the value parses as a hex quantity.
pub fn is_hex_quantity(value: Option<&str>) -> bool {
    value.and_then(parse_hex_quantity).is_some()
}

/// Decodes hex calldata. `0x` and the empty string decode to no bytes.
pub(crate) fn decode_hex_bytes(field: &str, value: &str) -> Result<Vec<u8>> {
    let digits = strip_hex_prefix(value);
    let padded;
    let digits = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    hex::decode(digits).map_err(|_| Error::parse(field, value))
}
