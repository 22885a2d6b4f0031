//! Money type for representing prices.
//!
//! Amounts are integers in the currency's smallest unit, so VND (no minor unit)
//! and USD (cents) share one representation without floating point.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    VND,
    USD,
    EUR,
    JPY,
}

impl Currency {
    /// Get the currency code (e.g., "VND").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::VND => "VND",
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::JPY => "JPY",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::VND => "\u{20ab}",
            Currency::USD => "$",
            Currency::EUR => "\u{20ac}",
            Currency::JPY => "\u{00a5}",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::VND | Currency::JPY => 0,
            _ => 2,
        }
    }

    /// Parse a currency code string.
    pub fn from_code(code: &str) -> Option<Self> {
        match code.to_uppercase().as_str() {
            "VND" => Some(Currency::VND),
            "USD" => Some(Currency::USD),
            "EUR" => Some(Currency::EUR),
            "JPY" => Some(Currency::JPY),
            _ => None,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value from minor units.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Check if this is positive.
    pub fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        let divisor = 10_i64.pow(self.currency.decimal_places());
        self.amount as f64 / divisor as f64
    }

    /// Format as a display string (e.g., "$49.99").
    pub fn display(&self) -> String {
        format!("{}{}", self.currency.symbol(), self.display_amount())
    }

    /// Format without the symbol (e.g., "49.99").
    pub fn display_amount(&self) -> String {
        let places = self.currency.decimal_places() as usize;
        format!("{:.places$}", self.to_decimal())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_and_positive() {
        assert!(Money::zero(Currency::VND).is_zero());
        assert!(Money::new(50, Currency::VND).is_positive());
        assert!(!Money::new(-5, Currency::VND).is_positive());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::new(4999, Currency::USD).display(), "$49.99");
        assert_eq!(Money::new(150000, Currency::VND).display(), "\u{20ab}150000");
    }

    #[test]
    fn test_currency_from_code() {
        assert_eq!(Currency::from_code("vnd"), Some(Currency::VND));
        assert_eq!(Currency::from_code("XXX"), None);
    }
}
