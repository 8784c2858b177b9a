//! Fixed point decimals stored as integers scaled by `10^precision`.

use {
    crate::{Error, Result},
    num::{BigInt, Signed, Zero},
    std::ops::Neg,
};

/// Parses a signed decimal string into an integer scaled by
/// `10^precision`. Fractional digits beyond `precision` are truncated, never
/// rounded.
pub fn parse_decimal(s: &str, precision: u32) -> Result<BigInt> {
    let invalid = || Error::InvalidDecimal(s.to_string());
    let trimmed = s.trim();
    let (is_negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(stripped) => (true, stripped),
        None => (false, trimmed),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, fraction),
        None => (unsigned, ""),
    };
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (integer.is_empty() && fraction.is_empty()) || !is_digits(integer) || !is_digits(fraction)
    {
        return Err(invalid());
    }

    let precision = precision as usize;
    let fraction = &fraction[..fraction.len().min(precision)];
    let digits = format!("{integer}{fraction:0<precision$}");
    let value = if digits.is_empty() {
        BigInt::zero()
    } else {
        digits.parse::<BigInt>().map_err(|_| invalid())?
    };
    Ok(if is_negative { value.neg() } else { value })
}

/// Renders an integer scaled by `10^precision` as a decimal string. Trailing
/// fractional zeros are dropped, the integer part is always kept.
pub fn format_decimal(value: &BigInt, precision: u32) -> String {
    let sign = if value.is_negative() { "-" } else { "" };
    let digits = value.abs().to_string();
    let precision = precision as usize;
    if precision == 0 {
        return format!("{sign}{digits}");
    }

    let digits = format!("{digits:0>width$}", width = precision + 1);
    let (integer, fraction) = digits.split_at(digits.len() - precision);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        format!("{sign}{integer}")
    } else {
        format!("{sign}{integer}.{fraction}")
    }
}
