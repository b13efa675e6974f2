use vitrine_base::ObjectId;
use vitrine_geometry::Aabb;

#[derive(Clone, Debug, PartialEq)]
pub enum FlightTarget {
    Aabb(Aabb),
    Object(ObjectId),
    /// Frame the whole scene.
    Scene,
}

/// Camera fly-to command. A zero duration is an immediate jump.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraFlight {
    pub target: FlightTarget,
    pub duration: f64,
}

impl CameraFlight {
    pub fn fly_to(target: FlightTarget, duration: f64) -> Self {
        Self {
            target,
            duration: duration.max(0.0),
        }
    }

    pub fn jump_to(target: FlightTarget) -> Self {
        Self {
            target,
            duration: 0.0,
        }
    }

    pub fn is_jump(&self) -> bool {
        self.duration <= 0.0
    }
}
