//! Fixed-point money type with 4 decimal places.
//!
//! Every amount and balance in the crate goes through `Decimal4`, so tier
//! thresholds and admission limits compare values of one consistent scale.
//! Balance arithmetic is checked: sums past the `rust_decimal` range come back
//! as `None` instead of panicking.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary value held at exactly 4 decimal places.
///
/// Values too large to carry 4 fractional digits keep the largest scale
/// `rust_decimal` allows for them.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use bank_queue::Decimal4;
///
/// let amount = Decimal4::from_str("999.99").unwrap();
/// assert_eq!(amount.to_string(), "999.9900");
/// assert_eq!(amount.times(3).to_string(), "2999.9700");
/// assert!(Decimal4::MAX.checked_add(amount).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Decimal4(Decimal);

impl Decimal4 {
    pub const SCALE: u32 = 4;

    pub const ZERO: Self = Decimal4(Decimal::ZERO);

    /// Largest representable value.
    pub const MAX: Self = Decimal4(Decimal::MAX);

    /// Wraps a `Decimal`, rescaling it to 4 decimal places.
    pub fn new(value: Decimal) -> Self {
        let mut scaled = value;
        scaled.rescale(Self::SCALE);
        Decimal4(scaled)
    }

    /// Sum, or `None` if it falls outside the representable range.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Decimal4::new)
    }

    /// Difference, or `None` if it falls outside the representable range.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Decimal4::new)
    }

    /// Multiplies by a whole-number factor, saturating at the representable limit.
    pub fn times(self, factor: u32) -> Self {
        Decimal4::new(self.0.saturating_mul(Decimal::from(factor)))
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }
}

impl From<i64> for Decimal4 {
    fn from(units: i64) -> Self {
        Decimal4::new(Decimal::from(units))
    }
}

impl FromStr for Decimal4 {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Decimal4::new)
    }
}

impl fmt::Display for Decimal4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Serialized as its 4-place display string, the form written to output CSV.
impl Serialize for Decimal4 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
