//! Direction vectors and their packed binary form.
//!
//! sqlite-vec matches against packed little-endian f32 arrays; `pack_floats`
//! and the `to_blob` helpers produce exactly that layout.

use std::fmt;
use std::ops::Neg;

use serde::{Deserialize, Serialize};

use crate::units::Degree;

/// Pack f32 values as consecutive little-endian bytes.
#[must_use]
pub fn pack_floats(values: &[f32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for v in values {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out
}

/// A 2D direction, typically a unit yaw vector `(sin yaw, cos yaw)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit yaw vector for the given heading angle.
    #[must_use]
    pub fn from_yaw(yaw: Degree) -> Self {
        let rad = yaw.to_radian().get();
        Self::new(rad.sin() as f32, rad.cos() as f32)
    }

    /// Heading angle of this vector.
    #[must_use]
    pub fn yaw(self) -> Degree {
        Degree::new(f64::from(self.x).atan2(f64::from(self.y)).to_degrees())
    }

    #[must_use]
    pub fn to_blob(self) -> Vec<u8> {
        pack_floats(&[self.x, self.y])
    }
}

/// A 3D direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub fn length(self) -> f32 {
        self.z
            .mul_add(self.z, self.x.mul_add(self.x, self.y * self.y))
            .sqrt()
    }

    /// Unit-length copy; the zero vector is returned unchanged.
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len, self.z / len)
        } else {
            self
        }
    }

    #[must_use]
    pub fn to_blob(self) -> Vec<u8> {
        pack_floats(&[self.x, self.y, self.z])
    }
}

impl Neg for Vec2 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
