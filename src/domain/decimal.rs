//! Exact decimal amount type backed by rust_decimal.
//!
//! Tax amounts, rates and clamps all flow through this type so that
//! `gross - tax == net` holds exactly.

use rust_decimal::Decimal as RustDecimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Exact decimal used for token amounts and percentage rates.
///
/// Serializes to a JSON number (not a string).
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Decimal(#[serde(with = "rust_decimal::serde::float")] RustDecimal);

impl Decimal {
    pub const ZERO: Decimal = Decimal(RustDecimal::ZERO);
    pub const HUNDRED: Decimal = Decimal(RustDecimal::ONE_HUNDRED);

    pub fn new(value: RustDecimal) -> Self {
        Decimal(value)
    }

    /// Parse a Decimal from a string losslessly.
    ///
    /// # Errors
    /// Returns an error if the string is not a valid decimal number.
    pub fn from_str_canonical(s: &str) -> Result<Self, rust_decimal::Error> {
        RustDecimal::from_str(s.trim()).map(Decimal)
    }

    /// Canonical string form: trailing zeros removed, never exponent notation.
    pub fn to_canonical_string(&self) -> String {
        format!("{}", self.0.normalize())
    }

    pub fn inner(&self) -> RustDecimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// True if the value is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        !self.is_zero() && self.0.is_sign_positive()
    }

    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.0.is_sign_negative()
    }

    /// `self * rate / 100`, or `None` when the product does not fit.
    pub fn percent(&self, rate: Decimal) -> Option<Decimal> {
        self.0
            .checked_mul(rate.0)?
            .checked_div(RustDecimal::ONE_HUNDRED)
            .map(Decimal)
    }

    pub fn checked_sub(self, rhs: Decimal) -> Option<Decimal> {
        self.0.checked_sub(rhs.0).map(Decimal)
    }

    /// Sum pinned at the representable bounds instead of overflowing.
    pub fn saturating_add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0.saturating_add(rhs.0))
    }

    /// `max(lower, min(self, upper))`.
    ///
    /// Unlike `Ord::clamp` this never panics when `lower > upper`; the lower
    /// bound wins.
    pub fn clamp_between(self, lower: Decimal, upper: Decimal) -> Decimal {
        std::cmp::max(lower, std::cmp::min(self, upper))
    }

    /// Arithmetic mean of `total` over `count` items, zero when `count` is zero.
    pub fn mean(total: Decimal, count: usize) -> Decimal {
        if count == 0 {
            return Decimal::ZERO;
        }
        Decimal(total.0 / RustDecimal::from(count as u64))
    }

    /// `part / whole * 100`, zero when `whole` is zero.
    pub fn ratio_pct(part: usize, whole: usize) -> Decimal {
        if whole == 0 {
            return Decimal::ZERO;
        }
        Decimal(
            RustDecimal::from(part as u64) / RustDecimal::from(whole as u64)
                * RustDecimal::ONE_HUNDRED,
        )
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl FromStr for Decimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_canonical(s)
    }
}

impl From<RustDecimal> for Decimal {
    fn from(value: RustDecimal) -> Self {
        Decimal(value)
    }
}

impl From<Decimal> for RustDecimal {
    fn from(value: Decimal) -> Self {
        value.0
    }
}

impl From<i64> for Decimal {
    fn from(value: i64) -> Self {
        Decimal(RustDecimal::from(value))
    }
}

impl std::ops::Add for Decimal {
    type Output = Decimal;

    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Decimal {
    fn add_assign(&mut self, rhs: Decimal) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Decimal {
    type Output = Decimal;

    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Decimal {
    fn sum<I: Iterator<Item = Decimal>>(iter: I) -> Decimal {
        iter.fold(Decimal::ZERO, |acc, d| acc + d)
    }
}
