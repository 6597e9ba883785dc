use std::{
    cmp::Ordering,
    fmt,
    ops::{Add, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::InputError;

/// Stock amount held for an item. Integers stay integers until combined with a
/// fractional value, so snapshots keep `7` rather than `7.0`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
}

impl Quantity {
    pub const ZERO: Quantity = Quantity::Int(0);

    pub fn as_f64(self) -> f64 {
        match self {
            Quantity::Int(value) => value as f64,
            Quantity::Float(value) => value,
        }
    }

    /// NaN and infinities do not count as numbers.
    pub fn is_number(self) -> bool {
        match self {
            Quantity::Int(_) => true,
            Quantity::Float(value) => value.is_finite(),
        }
    }

    pub fn is_positive(self) -> bool {
        match self {
            Quantity::Int(value) => value > 0,
            Quantity::Float(value) => value > 0.0,
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::ZERO
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => a
                .checked_add(b)
                .map(Quantity::Int)
                .unwrap_or_else(|| Quantity::Float(a as f64 + b as f64)),
            (a, b) => Quantity::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    fn sub(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => a
                .checked_sub(b)
                .map(Quantity::Int)
                .unwrap_or_else(|| Quantity::Float(a as f64 - b as f64)),
            (a, b) => Quantity::Float(a.as_f64() - b.as_f64()),
        }
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Quantity::Int(a), Quantity::Int(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64().partial_cmp(&b.as_f64()),
        }
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity::Int(value)
    }
}

impl From<i32> for Quantity {
    fn from(value: i32) -> Self {
        Quantity::Int(value.into())
    }
}

impl From<u32> for Quantity {
    fn from(value: u32) -> Self {
        Quantity::Int(value.into())
    }
}

impl From<f64> for Quantity {
    fn from(value: f64) -> Self {
        Quantity::Float(value)
    }
}

impl FromStr for Quantity {
    type Err = InputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Quantity::Int(value));
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Quantity::Float(value)),
            _ => Err(InputError::NotANumber),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Int(value) => write!(f, "{value}"),
            // Debug keeps the trailing `.0` on whole floats.
            Quantity::Float(value) => write!(f, "{value:?}"),
        }
    }
}
