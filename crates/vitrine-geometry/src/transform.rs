use cgmath::{Deg, Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Placement of a model in the scene: translation plus Euler rotation in
/// degrees, applied in X, Y, Z order about the model origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
    };

    pub const fn new(position: Vec3, rotation: Vec3) -> Self {
        Self { position, rotation }
    }

    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Vec3::ZERO,
        }
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        Matrix3::from_angle_x(Deg(self.rotation.x))
            * Matrix3::from_angle_y(Deg(self.rotation.y))
            * Matrix3::from_angle_z(Deg(self.rotation.z))
    }

    pub fn apply(&self, point: Vec3) -> Vec3 {
        let rotated = self.rotation_matrix() * Vector3::from(point);
        Vec3::from(rotated) + self.position
    }
}
