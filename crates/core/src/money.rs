use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A non-negative monetary amount read off a document.
///
/// Serialized as a plain JSON number so API consumers see `45.67`, not `"45.67"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Money {
    /// Parse a monetary token as it appears in OCR output (`45.67`, `$ 45.67`).
    ///
    /// Commas are dropped as grouping marks, so `5,00` reads as 500. Signs are
    /// rejected: the extraction patterns never produce them.
    pub fn parse_token(token: &str) -> Option<Self> {
        let clean = token.trim().trim_start_matches('$').trim().replace(',', "");
        if clean.is_empty() || !clean.chars().all(|c| c.is_ascii_digit() || c == '.') {
            return None;
        }
        Decimal::from_str(&clean).ok().map(Money)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(self) -> Decimal {
        self.0
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}
