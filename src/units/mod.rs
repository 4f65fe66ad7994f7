//! Angle and range value types used as criterion parameters.

pub mod angle;
pub mod range;

pub use angle::{Degree, Radian, is_valid_angle, normalize_degrees, normalize_radians};
pub use range::{Range, remap};
