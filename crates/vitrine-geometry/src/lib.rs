mod aabb;
mod math;
mod transform;

pub use aabb::{Aabb, merge, overlaps};
pub use math::Vec3;
pub use transform::Transform;
