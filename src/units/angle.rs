//! Validated angle value types.
//!
//! `Degree` and `Radian` always hold a finite value folded into the
//! canonical half-open interval `(-180, 180]` / `(-π, π]`. Non-finite input
//! (NaN, ±inf) is stored as 0.0; this policy applies identically on
//! construction, `set`, and deserialization.

use std::fmt;
use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

const DEG_PER_TURN: f64 = 360.0;
const DEG_PER_HALF_TURN: f64 = 180.0;
const RAD_PER_DEG: f64 = std::f64::consts::PI / DEG_PER_HALF_TURN;
const DEG_PER_RAD: f64 = DEG_PER_HALF_TURN / std::f64::consts::PI;

/// True for any finite angle, false for NaN and ±infinity.
#[must_use]
pub fn is_valid_angle(v: f64) -> bool {
    v.is_finite()
}

/// Fold a finite angle into `(-180, 180]` using the Euclidean remainder.
/// The lower boundary maps to the positive edge: `normalize_degrees(-180.0)`
/// is `180.0`.
#[must_use]
pub fn normalize_degrees(v: f64) -> f64 {
    let r = v.rem_euclid(DEG_PER_TURN);
    if r > DEG_PER_HALF_TURN { r - DEG_PER_TURN } else { r }
}

/// Fold a finite angle into `(-π, π]` using the Euclidean remainder.
#[must_use]
pub fn normalize_radians(v: f64) -> f64 {
    let r = v.rem_euclid(std::f64::consts::TAU);
    if r > std::f64::consts::PI {
        r - std::f64::consts::TAU
    } else {
        r
    }
}

fn sanitize_degrees(v: f64) -> f64 {
    if is_valid_angle(v) { normalize_degrees(v) } else { 0.0 }
}

fn sanitize_radians(v: f64) -> f64 {
    if is_valid_angle(v) { normalize_radians(v) } else { 0.0 }
}

/// An angle in degrees, canonicalized to `(-180, 180]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Degree(f64);

impl Degree {
    #[must_use]
    pub fn new(v: f64) -> Self {
        Self(sanitize_degrees(v))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    pub fn set(&mut self, v: f64) {
        self.0 = sanitize_degrees(v);
    }

    #[must_use]
    pub fn to_radian(self) -> Radian {
        Radian::new(self.0 * RAD_PER_DEG)
    }
}

/// An angle in radians, canonicalized to `(-π, π]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct Radian(f64);

impl Radian {
    #[must_use]
    pub fn new(v: f64) -> Self {
        Self(sanitize_radians(v))
    }

    #[must_use]
    pub const fn get(self) -> f64 {
        self.0
    }

    pub fn set(&mut self, v: f64) {
        self.0 = sanitize_radians(v);
    }

    #[must_use]
    pub fn to_degree(self) -> Degree {
        Degree::new(self.0 * DEG_PER_RAD)
    }
}

impl From<f64> for Degree {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl From<Degree> for f64 {
    fn from(d: Degree) -> Self {
        d.get()
    }
}

impl From<f64> for Radian {
    fn from(v: f64) -> Self {
        Self::new(v)
    }
}

impl From<Radian> for f64 {
    fn from(r: Radian) -> Self {
        r.get()
    }
}

impl From<Radian> for Degree {
    fn from(r: Radian) -> Self {
        r.to_degree()
    }
}

impl From<Degree> for Radian {
    fn from(d: Degree) -> Self {
        d.to_radian()
    }
}

impl Add for Degree {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Degree {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Mul<f64> for Degree {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.0 * s)
    }
}

impl Mul<Degree> for f64 {
    type Output = Degree;
    fn mul(self, a: Degree) -> Degree {
        Degree::new(self * a.0)
    }
}

impl Add for Radian {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.0 + rhs.0)
    }
}

impl Sub for Radian {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.0 - rhs.0)
    }
}

impl Mul<f64> for Radian {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.0 * s)
    }
}

impl Mul<Radian> for f64 {
    type Output = Radian;
    fn mul(self, a: Radian) -> Radian {
        Radian::new(self * a.0)
    }
}

impl fmt::Display for Degree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(deg)", self.0)
    }
}

impl fmt::Display for Radian {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(rad)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_normalize_degrees_boundaries() {
        assert_eq!(normalize_degrees(-180.0), 180.0);
        assert_eq!(normalize_degrees(180.0), 180.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(540.0), 180.0);
        assert!((normalize_degrees(539.5) - 179.5).abs() < 1e-9);
        assert!((normalize_degrees(-190.0) - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_radians_boundaries() {
        let pi = std::f64::consts::PI;
        assert_eq!(normalize_radians(-pi), pi);
        assert_eq!(normalize_radians(pi), pi);
        assert!((normalize_radians(3.0 * pi) - pi).abs() < 1e-9);
    }

    #[test]
    fn test_is_valid_angle() {
        assert!(is_valid_angle(0.0));
        assert!(is_valid_angle(-720.5));
        assert!(!is_valid_angle(f64::NAN));
        assert!(!is_valid_angle(f64::INFINITY));
        assert!(!is_valid_angle(f64::NEG_INFINITY));
    }

    #[test]
    fn test_non_finite_stored_as_zero() {
        assert_eq!(Degree::new(f64::NAN).get(), 0.0);
        assert_eq!(Degree::new(f64::INFINITY).get(), 0.0);
        assert_eq!(Radian::new(f64::NAN).get(), 0.0);

        let mut d = Degree::new(45.0);
        d.set(f64::NEG_INFINITY);
        assert_eq!(d.get(), 0.0);
    }

    #[test]
    fn test_conversion_round_trip() {
        for v in [-179.0, -90.0, -0.5, 0.0, 0.5, 45.0, 90.0, 179.9, 180.0] {
            let d = Degree::new(v);
            let back = d.to_radian().to_degree();
            assert!((back.get() - d.get()).abs() < 1e-5, "round trip of {v}");
        }
    }

    #[test]
    fn test_arithmetic_renormalizes() {
        let sum = Degree::new(170.0) + Degree::new(20.0);
        assert!((sum.get() - (-170.0)).abs() < 1e-9);

        let diff = Degree::new(-170.0) - Degree::new(20.0);
        assert!((diff.get() - 170.0).abs() < 1e-9);

        let scaled = Degree::new(100.0) * 2.0;
        assert!((scaled.get() - (-160.0)).abs() < 1e-9);
    }

    #[test]
    fn test_serde_sanitizes() {
        let d: Degree = serde_json::from_str("540.0").unwrap();
        assert!((d.get() - 180.0).abs() < 1e-9);

        let json = serde_json::to_string(&Degree::new(90.0)).unwrap();
        assert_eq!(json, "90.0");
    }

    proptest! {
        #[test]
        fn prop_degrees_periodic(a in -1e6f64..1e6f64) {
            let lhs = normalize_degrees(a + 360.0);
            let rhs = normalize_degrees(a);
            // Tolerance scales with magnitude since fold subtracts multiples
            // of 360 from a large input.
            prop_assert!((lhs - rhs).abs() < 1e-6);
        }

        #[test]
        fn prop_degrees_in_canonical_interval(a in -1e9f64..1e9f64) {
            let r = normalize_degrees(a);
            prop_assert!(r > -180.0 && r <= 180.0);
        }

        #[test]
        fn prop_degree_radian_round_trip(a in -1e4f64..1e4f64) {
            let d = Degree::new(a);
            let back = Radian::from(d).to_degree();
            prop_assert!((back.get() - d.get()).abs() < 1e-5);
        }
    }
}
