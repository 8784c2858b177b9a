use {
    crate::{Result, decimal},
    num::BigInt,
};

/// Token metadata needed to render raw on-chain amounts. Supplied by whoever
/// knows the contract; nothing in this crate looks it up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractInfo {
    pub decimals: u32,
    pub symbol: String,
}

impl ContractInfo {
    pub fn new(decimals: u32, symbol: impl Into<String>) -> Self {
        Self {
            decimals,
            symbol: symbol.into(),
        }
    }

    /// Formats a raw token amount, e.g. `1500000` with 6 decimals as
    /// `"1.5 USDC"`.
    pub fn format_amount(&self, amount: &BigInt) -> String {
        format!(
            "{} {}",
            decimal::format_decimal(amount, self.decimals),
            self.symbol
        )
    }

    /// Converts a human readable amount into raw token units.
    pub fn parse_amount(&self, amount: &str) -> Result<BigInt> {
        decimal::parse_decimal(amount, self.decimals)
    }
}
