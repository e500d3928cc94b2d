use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Fixed-point token amount with four decimal places.
///
/// Stored as an integer count of 1/10000 tokens so royalty arithmetic is
/// exact. On the wire it is a plain JSON number (`0.06`); deserialization
/// rounds the number to four places.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TokenAmount(u64);

impl TokenAmount {
    /// Number of units in one whole token.
    pub const UNITS_PER_TOKEN: u64 = 10_000;

    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Create from a count of 1/10000 token units.
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Create from a decimal token value, rounded to four places.
    pub fn from_tokens(tokens: f64) -> Result<Self, TypeError> {
        if !tokens.is_finite() || tokens < 0.0 {
            return Err(TypeError::InvalidAmount(format!(
                "{tokens} is not a finite non-negative number"
            )));
        }
        let units = (tokens * Self::UNITS_PER_TOKEN as f64).round();
        if units > u64::MAX as f64 {
            return Err(TypeError::InvalidAmount(format!("{tokens} is out of range")));
        }
        Ok(Self(units as u64))
    }

    /// Count of 1/10000 token units.
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Lossy conversion to a float token value.
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / Self::UNITS_PER_TOKEN as f64
    }

    /// Returns `true` if the amount is zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Saturating addition, for totals across many events.
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }
}

impl std::iter::Sum for TokenAmount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl fmt::Debug for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenAmount({self})")
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:04}",
            self.0 / Self::UNITS_PER_TOKEN,
            self.0 % Self::UNITS_PER_TOKEN
        )
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tokens = f64::deserialize(deserializer)?;
        Self::from_tokens(tokens).map_err(serde::de::Error::custom)
    }
}
