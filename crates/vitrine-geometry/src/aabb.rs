use serde::{Deserialize, Serialize};
use vitrine_base::{Error, Result};

use crate::math::Vec3;
use crate::transform::Transform;

/// Axis-aligned bounding box, serialized as `[minX, minY, minZ, maxX, maxY, maxZ]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 6]", into = "[f64; 6]")]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub const fn from_array(values: [f64; 6]) -> Self {
        Self {
            min: Vec3::new(values[0], values[1], values[2]),
            max: Vec3::new(values[3], values[4], values[5]),
        }
    }

    /// Builds a box from untrusted scalars, rejecting wrong arity, non-finite
    /// values and inverted extents.
    pub fn try_from_slice(values: &[f64]) -> Result<Self> {
        let values: [f64; 6] = values.try_into().map_err(|_| {
            Error::InvalidParameter(format!("aabb expects 6 values, got {}", values.len()))
        })?;
        if values.iter().any(|value| !value.is_finite()) {
            return Err(Error::InvalidParameter(
                "aabb values must be finite".to_string(),
            ));
        }
        let aabb = Self::from_array(values);
        if aabb.min.x > aabb.max.x || aabb.min.y > aabb.max.y || aabb.min.z > aabb.max.z {
            return Err(Error::InvalidParameter(
                "aabb min must not exceed max".to_string(),
            ));
        }
        Ok(aabb)
    }

    pub fn to_array(&self) -> [f64; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Inclusive on every axis: boxes that only touch still intersect.
    pub fn intersects(&self, other: &Self) -> bool {
        !(self.max.x < other.min.x
            || other.max.x < self.min.x
            || self.max.y < other.min.y
            || other.max.y < self.min.y
            || self.max.z < other.min.z
            || other.max.z < self.min.z)
    }

    pub fn union(&self, other: &Self) -> Self {
        Self::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// World-space box of a model-local box placed by `transform`.
    pub fn transformed(&self, transform: &Transform) -> Self {
        let mut corners = self.corners().into_iter().map(|corner| transform.apply(corner));
        let first = match corners.next() {
            Some(point) => point,
            None => return *self,
        };
        let (min, max) = corners.fold((first, first), |(min, max), point| {
            (min.min(point), max.max(point))
        });
        Self::new(min, max)
    }
}

impl From<[f64; 6]> for Aabb {
    fn from(values: [f64; 6]) -> Self {
        Self::from_array(values)
    }
}

impl From<Aabb> for [f64; 6] {
    fn from(value: Aabb) -> Self {
        value.to_array()
    }
}

impl std::fmt::Display for Aabb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] .. [{}]", self.min, self.max)
    }
}

/// Missing geometry never collides.
pub fn overlaps(a: Option<&Aabb>, b: Option<&Aabb>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.intersects(b),
        _ => false,
    }
}

/// Smallest box enclosing every present input, or `None` when nothing is present.
pub fn merge<I>(boxes: I) -> Option<Aabb>
where
    I: IntoIterator<Item = Option<Aabb>>,
{
    boxes
        .into_iter()
        .flatten()
        .reduce(|merged, aabb| merged.union(&aabb))
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: Aabb = Aabb::from_array([0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

    #[test]
    fn touching_faces_overlap() {
        let right = Aabb::from_array([1.0, 0.0, 0.0, 2.0, 1.0, 1.0]);
        assert!(overlaps(Some(&UNIT), Some(&right)));
        assert!(overlaps(Some(&right), Some(&UNIT)));
    }

    #[test]
    fn separation_on_single_axis_is_enough() {
        let above = Aabb::from_array([0.0, 1.0 + 1.0e-9, 0.0, 1.0, 2.0, 1.0]);
        assert!(!UNIT.intersects(&above));
        let behind = Aabb::from_array([0.2, 0.2, -3.0, 0.8, 0.8, -0.5]);
        assert!(!UNIT.intersects(&behind));
    }

    #[test]
    fn absent_box_never_overlaps() {
        assert!(!overlaps(None, Some(&UNIT)));
        assert!(!overlaps(Some(&UNIT), None));
        assert!(!overlaps(None, None));
    }

    #[test]
    fn self_overlap() {
        assert!(overlaps(Some(&UNIT), Some(&UNIT)));
    }

    #[test]
    fn merge_handles_empty_and_single_inputs() {
        assert_eq!(merge(Vec::new()), None);
        assert_eq!(merge(vec![None, None]), None);
        assert_eq!(merge(vec![Some(UNIT)]), Some(UNIT));
    }

    #[test]
    fn merge_skips_missing_entries() {
        let far = Aabb::from_array([-2.0, 3.0, 0.5, -1.0, 4.0, 0.75]);
        let merged = merge(vec![None, Some(UNIT), None, Some(far)]);
        assert_eq!(
            merged,
            Some(Aabb::from_array([-2.0, 0.0, 0.0, 1.0, 4.0, 1.0]))
        );
    }

    #[test]
    fn try_from_slice_rejects_bad_input() {
        assert!(Aabb::try_from_slice(&[0.0, 0.0, 0.0]).is_err());
        assert!(Aabb::try_from_slice(&[0.0, 0.0, 0.0, f64::NAN, 1.0, 1.0]).is_err());
        assert!(Aabb::try_from_slice(&[2.0, 0.0, 0.0, 1.0, 1.0, 1.0]).is_err());
        assert_eq!(Aabb::try_from_slice(&UNIT.to_array()).ok(), Some(UNIT));
    }
}
