//! Closed numeric intervals and affine remapping.

use std::fmt;

use crate::error::{PqError, Result};

/// A closed interval `[min, max]`.
///
/// `valid()` holds iff `min <= max`; for floating-point `T` a NaN bound makes
/// the comparison false, so the range is invalid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range<T> {
    pub min: T,
    pub max: T,
}

impl<T: PartialOrd + Copy + fmt::Display> Range<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn valid(&self) -> bool {
        self.min <= self.max
    }

    pub fn validate(&self) -> Result<()> {
        if self.valid() {
            Ok(())
        } else {
            Err(PqError::InvalidInput(format!(
                "invalid range min={}, max={}",
                self.min, self.max
            )))
        }
    }

    #[must_use]
    pub fn contains(&self, v: T) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Affine rescale of `v` from `[in_min, in_max]` onto `[out_min, out_max]`.
///
/// Degenerate-domain convention: when `in_min == in_max` the result is
/// `out_max` for every input.
#[must_use]
pub fn remap(v: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_min == in_max {
        return out_max;
    }
    (v - in_min) / (in_max - in_min) * (out_max - out_min) + out_min
}
