use {
    crate::{Error, Result},
    num::{BigUint, Num, Zero},
    serde_json::Value,
};

/// Prefixes `hex` with `0x` unless it already carries the prefix (in any
/// case).
pub fn add_0x(hex: &str) -> String {
    if has_0x(hex) {
        hex.to_string()
    } else {
        format!("0x{hex}")
    }
}

pub fn strip_0x(hex: &str) -> &str {
    if has_0x(hex) { &hex[2..] } else { hex }
}

fn has_0x(hex: &str) -> bool {
    hex.get(..2)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("0x"))
}

/// Decodes a hex number with or without the `0x` prefix. The empty string
/// and a bare prefix both decode to zero.
pub fn hex_to_int(hex: &str) -> Result<BigUint> {
    let digits = strip_0x(hex);
    if digits.is_empty() {
        return Ok(BigUint::zero());
    }
    // `from_str_radix` also takes a sign and `_` separators
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(Error::InvalidHex(hex.to_string()));
    }
    BigUint::from_str_radix(digits, 16).map_err(|_| Error::InvalidHex(hex.to_string()))
}

/// Like [`hex_to_int`] but for values coming straight out of a JSON
/// response, where the node may have returned something other than a
/// string.
pub fn hex_value_to_int(value: &Value) -> Result<BigUint> {
    match value {
        Value::String(hex) => hex_to_int(hex),
        other => Err(Error::NotAString(value_kind(other))),
    }
}

/// Name of the JSON type of `value`, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Encodes `n` as unprefixed hex, left padded to exactly `2 * byte_length`
/// digits. Values that don't fit are returned unpadded rather than
/// truncated.
pub fn int_to_hex(n: &BigUint, byte_length: usize) -> Result<String> {
    if byte_length == 0 {
        return Err(Error::ZeroByteLength);
    }
    Ok(format!(
        "{:0>width$}",
        int_to_minimal_hex(n),
        width = byte_length * 2
    ))
}

/// Encodes `n` as unprefixed hex with an even number of digits.
pub fn int_to_minimal_hex(n: &BigUint) -> String {
    let hex = n.to_str_radix(16);
    if hex.len() % 2 == 1 {
        format!("0{hex}")
    } else {
        hex
    }
}

/// Parses a decimal integer string, or a hex one if it is `0x` prefixed.
pub fn parse_int(s: &str) -> Result<BigUint> {
    if has_0x(s) {
        hex_to_int(s)
    } else {
        s.parse::<BigUint>()
            .map_err(|_| Error::InvalidDecimal(s.to_string()))
    }
}

/// Input accepted for numeric call fields: either an integer or a string
/// holding a decimal or `0x` prefixed hex number.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Quantity {
    Int(BigUint),
    Str(String),
}

impl Quantity {
    pub fn to_int(&self) -> Result<BigUint> {
        match self {
            Quantity::Int(n) => Ok(n.clone()),
            Quantity::Str(s) if s.is_empty() => Ok(BigUint::zero()),
            Quantity::Str(s) => parse_int(s),
        }
    }
}

impl From<BigUint> for Quantity {
    fn from(value: BigUint) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for Quantity {
    fn from(value: u64) -> Self {
        Self::Int(value.into())
    }
}

impl From<u128> for Quantity {
    fn from(value: u128) -> Self {
        Self::Int(value.into())
    }
}

impl From<&str> for Quantity {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Canonical JSON-RPC quantity encoding: `0x` prefixed and without leading
/// zero digits, `0x0` for zero.
pub fn normalize_quantity(n: impl Into<Quantity>) -> Result<String> {
    let n = n.into().to_int()?;
    if n.is_zero() {
        return Ok("0x0".to_string());
    }
    Ok(add_0x(int_to_minimal_hex(&n).trim_start_matches('0')))
}
