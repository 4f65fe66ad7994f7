//! Small shared helpers: vector math/packing and file digests.

pub mod fs;
pub mod vecmath;

pub use vecmath::{Vec2, Vec3, pack_floats};
