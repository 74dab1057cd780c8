//! Numeric representation of compartment populations.
//!
//! A simulation run uses exactly one representation for every cell:
//! continuous (`f64`, no rounding) or discrete (`i64` counts, every
//! `rate * count` product truncated toward zero). Generic code works
//! through [`Population`] so the two can never be mixed inside a run.

use std::fmt;
use std::ops::{Add, Sub};

use crate::params::NumericMode;

/// A compartment population value.
///
/// # Contract
///
/// - [`scale`](Population::scale) and [`from_rate_product`](Population::from_rate_product)
///   apply the same conversion convention (identity for `f64`, truncation
///   for `i64`), so every delta in an update step is rounded the same way.
/// - `Add`/`Sub` are exact for the discrete representation, which makes
///   compartment totals conserved exactly.
pub trait Population:
    Copy
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + fmt::Debug
    + fmt::Display
    + Send
    + Sync
    + 'static
{
    /// The empty population.
    const ZERO: Self;

    /// Which [`NumericMode`] this representation implements.
    const MODE: NumericMode;

    /// Convert a configuration value, rejecting values this representation
    /// cannot hold exactly (non-finite, or fractional for discrete counts).
    fn from_config(value: f64) -> Option<Self>;

    /// Widen to `f64` for weighted aggregation.
    fn to_f64(self) -> f64;

    /// Convert a real-valued flow (e.g. `beta * force`) into a delta.
    fn from_rate_product(value: f64) -> Self;

    /// `rate * self`, converted with [`from_rate_product`](Population::from_rate_product).
    fn scale(self, rate: f64) -> Self {
        Self::from_rate_product(rate * self.to_f64())
    }

    /// The smaller of two values.
    fn min_of(self, other: Self) -> Self {
        if other < self {
            other
        } else {
            self
        }
    }

    /// `true` if the value is non-negative (and finite, where applicable).
    fn is_valid(self) -> bool;
}

impl Population for f64 {
    const ZERO: Self = 0.0;
    const MODE: NumericMode = NumericMode::Continuous;

    fn from_config(value: f64) -> Option<Self> {
        value.is_finite().then_some(value)
    }

    fn to_f64(self) -> f64 {
        self
    }

    fn from_rate_product(value: f64) -> Self {
        value
    }

    fn is_valid(self) -> bool {
        self.is_finite() && self >= 0.0
    }
}

impl Population for i64 {
    const ZERO: Self = 0;
    const MODE: NumericMode = NumericMode::Discrete;

    fn from_config(value: f64) -> Option<Self> {
        if !value.is_finite() || value.fract() != 0.0 {
            return None;
        }
        if value < i64::MIN as f64 || value > i64::MAX as f64 {
            return None;
        }
        Some(value as i64)
    }

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_rate_product(value: f64) -> Self {
        // `as` truncates toward zero and saturates on overflow.
        value as i64
    }

    fn is_valid(self) -> bool {
        self >= 0
    }
}
