//! Measurement and money units backed by integers, with lossless conversions
//! through rust_decimal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight in whole pounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pound(pub i32);

impl Pound {
    pub fn new(lbs: i32) -> Self {
        Pound(lbs)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Scale by a decimal factor, rounding half away from zero to whole pounds.
    ///
    /// Returns `None` when the result does not fit in a `Pound`.
    pub fn scale_rounded(&self, factor: Decimal) -> Option<Pound> {
        let scaled = Decimal::from(self.0)
            .checked_mul(factor)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        scaled.to_i32().map(Pound)
    }
}

impl fmt::Display for Pound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Money in US cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cents(pub i64);

impl Cents {
    pub fn new(cents: i64) -> Self {
        Cents(cents)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Whole dollars with two decimal places.
    pub fn to_dollars(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Thousandths of a cent, the unit fuel prices are published in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Millicents(pub i64);

impl Millicents {
    pub fn new(millicents: i64) -> Self {
        Millicents(millicents)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Convert to (fractional) cents.
    pub fn to_cents(&self) -> Decimal {
        Decimal::new(self.0, 3)
    }
}

impl fmt::Display for Millicents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Length in thousandths of an inch, as crate dimensions are recorded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ThousandthInches(pub i32);

impl ThousandthInches {
    pub fn new(value: i32) -> Self {
        ThousandthInches(value)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Convert to inches without losing precision.
    pub fn to_inches(&self) -> Decimal {
        Decimal::new(i64::from(self.0), 3)
    }
}

/// Cubic feet enclosed by three edges.
pub fn cubic_feet(
    length: ThousandthInches,
    width: ThousandthInches,
    height: ThousandthInches,
) -> Decimal {
    length.to_inches() * width.to_inches() * height.to_inches() / Decimal::from(1728)
}

/// Format a decimal with exactly `dp` places, rounding half away from zero.
pub fn format_fixed(value: Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Format a decimal without trailing zeros or exponent.
pub fn format_canonical(value: Decimal) -> String {
    format!("{}", value.normalize())
}
