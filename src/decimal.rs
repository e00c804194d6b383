use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use crate::config::CurrencyDisplay;

/// Money type with 8 decimal places precision
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    /// create from decimal
    pub fn from_decimal(d: Decimal) -> Self {
        Money(d.round_dp(8))
    }

    /// create from string with exact parsing
    pub fn from_str_exact(s: &str) -> Result<Self, rust_decimal::Error> {
        Ok(Money(Decimal::from_str(s)?.round_dp(8)))
    }

    /// create from integer amount (naira, dollars, etc)
    pub fn from_major(amount: i64) -> Self {
        Money(Decimal::from(amount))
    }

    /// lenient numeric coercion for upstream amounts.
    ///
    /// Accepts numbers, decimal strings (optionally in scientific notation,
    /// surrounding whitespace allowed) and null. Anything else, including
    /// booleans, objects and malformed strings, maps to zero. Never panics.
    ///
    /// The result is display-grade: ledger arithmetic of record belongs to the
    /// server.
    pub fn coerce(value: &Value) -> Self {
        match value {
            Value::Number(n) => Self::coerce_str(&n.to_string()),
            Value::String(s) => Self::coerce_str(s),
            _ => Money::ZERO,
        }
    }

    /// string half of [`Money::coerce`]
    pub fn coerce_str(raw: &str) -> Self {
        Self::parse(raw).unwrap_or(Money::ZERO)
    }

    /// strict parse of user input; `None` when the text is not a number
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .ok()
            .map(Money::from_decimal)
    }

    /// get underlying decimal
    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// check if zero
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// strictly greater than zero
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// check if negative
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// maximum of two values
    pub fn max(self, other: Self) -> Self {
        Money(self.0.max(other.0))
    }

    /// `self - other`, floored at zero
    pub fn saturating_sub(self, other: Self) -> Self {
        (self - other).max(Money::ZERO)
    }

    /// plain decimal text without currency decoration, trailing zeros trimmed.
    /// used to pre-fill editable amount fields
    pub fn to_input_string(&self) -> String {
        self.0.normalize().to_string()
    }

    /// format for display, e.g. `₦70,000.00`
    pub fn format(&self, display: &CurrencyDisplay) -> String {
        let mut rounded = self
            .0
            .round_dp_with_strategy(display.decimal_places, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(display.decimal_places);

        let text = rounded.abs().to_string();
        let (whole, fraction) = match text.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (text.as_str(), None),
        };

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                if let Some(sep) = display.thousands_separator {
                    grouped.push(sep);
                }
            }
            grouped.push(ch);
        }

        let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
        match fraction {
            Some(f) => format!("{}{}{}.{}", sign, display.symbol, grouped, f),
            None => format!("{}{}{}", sign, display.symbol, grouped),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Money::from_str_exact(s)
    }
}

impl From<Decimal> for Money {
    fn from(d: Decimal) -> Self {
        Money::from_decimal(d)
    }
}

impl Add for Money {
    type Output = Money;

    /// saturates at the representable range instead of overflowing
    fn add(self, other: Money) -> Money {
        match self.0.checked_add(other.0) {
            Some(sum) => Money(sum.round_dp(8)),
            None if other.0.is_sign_negative() => Money(Decimal::MIN),
            None => Money(Decimal::MAX),
        }
    }
}

impl Sub for Money {
    type Output = Money;

    /// saturates at the representable range instead of overflowing
    fn sub(self, other: Money) -> Money {
        match self.0.checked_sub(other.0) {
            Some(diff) => Money(diff.round_dp(8)),
            None if other.0.is_sign_negative() => Money(Decimal::MAX),
            None => Money(Decimal::MIN),
        }
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, |acc, m| acc + m)
    }
}

/// serde adapter for amount fields that arrive as string, number, or null
pub fn deserialize_lenient<'de, D>(deserializer: D) -> Result<Money, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Money::coerce(&value))
}
