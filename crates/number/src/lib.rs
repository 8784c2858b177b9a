//! Conversions between the numeric encodings used on the JSON-RPC wire:
//! `0x` prefixed hex quantities, arbitrary precision integers and fixed point
//! decimal strings.

pub mod decimal;
pub mod hex;
pub mod units;

pub use {
    decimal::{format_decimal, parse_decimal},
    hex::{Quantity, hex_to_int, int_to_hex, int_to_minimal_hex, normalize_quantity},
    units::ContractInfo,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A JSON value that was expected to hold a hex string held something
    /// else.
    #[error("expected string, got {0}")]
    NotAString(&'static str),

    #[error("invalid hex number {0:?}")]
    InvalidHex(String),

    #[error("byte length target must be specified")]
    ZeroByteLength,

    #[error("invalid decimal number {0:?}")]
    InvalidDecimal(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
