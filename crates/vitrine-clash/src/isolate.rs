use std::collections::HashSet;
use tracing::debug;
use vitrine_base::ObjectId;
use vitrine_geometry::merge;
use vitrine_scene::{CameraFlight, FlightTarget, ScenePort};

/// Camera flight time when framing a collision, in seconds.
pub const COLLISION_FLIGHT_DURATION: f64 = 0.6;

/// Shows one collision in context: everything else x-rayed, the conflicting
/// objects drawn normally and highlighted, camera framed on their union box.
#[derive(Clone, Copy, Debug)]
pub struct IsolationDriver {
    flight_duration: f64,
}

impl Default for IsolationDriver {
    fn default() -> Self {
        Self {
            flight_duration: COLLISION_FLIGHT_DURATION,
        }
    }
}

impl IsolationDriver {
    pub fn new(flight_duration: f64) -> Self {
        Self { flight_duration }
    }

    /// Returns `false` without touching anything when no scene is available.
    ///
    /// The full flag baseline is rebuilt on every call, so leftovers from an
    /// earlier isolation never survive.
    pub fn isolate<S: ScenePort + ?Sized>(
        &self,
        scene: Option<&mut S>,
        object: &ObjectId,
        colliding: &[ObjectId],
    ) -> bool {
        let Some(scene) = scene else {
            debug!(object = %object, "isolation skipped: scene not initialized");
            return false;
        };

        let mut focus_set = HashSet::new();
        let focus: Vec<ObjectId> = std::iter::once(object)
            .chain(colliding)
            .filter(|id| focus_set.insert((*id).clone()))
            .cloned()
            .collect();
        let all = scene.object_ids();
        let others: Vec<ObjectId> = all
            .iter()
            .filter(|id| !focus_set.contains(*id))
            .cloned()
            .collect();

        scene.set_objects_visible(&all, true);
        scene.set_objects_xrayed(&all, true);
        scene.set_objects_highlighted(&all, false);

        scene.set_objects_visible(&focus, true);
        scene.set_objects_xrayed(&focus, false);
        scene.set_objects_highlighted(&focus, true);

        if !others.is_empty() {
            scene.set_objects_highlighted(&others, false);
        }

        let framed = merge(focus.iter().map(|id| scene.aabb(id)));
        match framed {
            Some(aabb) => scene.fly_to(CameraFlight::fly_to(
                FlightTarget::Aabb(aabb),
                self.flight_duration,
            )),
            None => debug!(object = %object, "no geometry to frame, camera left in place"),
        }

        scene.request_render();
        debug!(object = %object, focus = focus.len(), "collision isolated");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_geometry::Aabb;
    use vitrine_scene::{MemoryScene, ModelDescription, Result};

    fn scene() -> Result<MemoryScene> {
        let mut scene = MemoryScene::new();
        scene.load_model(
            &ModelDescription::new("A")
                .with_object("a1", Some([0.0, 0.0, 0.0, 1.0, 1.0, 1.0]))
                .with_object("a2", Some([5.0, 0.0, 0.0, 6.0, 1.0, 1.0]))
                .with_object("a3", None),
        )?;
        scene.load_model(
            &ModelDescription::new("B")
                .with_object("b1", Some([0.5, 0.5, 0.5, 1.5, 1.5, 1.5]))
                .with_object("b2", None),
        )?;
        Ok(scene)
    }

    #[test]
    fn missing_scene_is_a_no_op() {
        let driver = IsolationDriver::default();
        let applied =
            driver.isolate::<MemoryScene>(None, &ObjectId::from("a1"), &[ObjectId::from("b1")]);
        assert!(!applied);
    }

    #[test]
    fn camera_frames_union_of_focus() -> Result<()> {
        let mut scene = scene()?;
        let driver = IsolationDriver::default();
        assert!(driver.isolate(Some(&mut scene), &ObjectId::from("a1"), &[ObjectId::from("b1")]));

        let flight = scene.last_flight().cloned();
        assert_eq!(
            flight,
            Some(CameraFlight::fly_to(
                FlightTarget::Aabb(Aabb::from_array([0.0, 0.0, 0.0, 1.5, 1.5, 1.5])),
                COLLISION_FLIGHT_DURATION,
            ))
        );
        assert_eq!(scene.render_requests(), 1);
        Ok(())
    }

    #[test]
    fn focus_without_geometry_skips_camera() -> Result<()> {
        let mut scene = scene()?;
        let driver = IsolationDriver::new(1.0);
        assert!(driver.isolate(Some(&mut scene), &ObjectId::from("a3"), &[ObjectId::from("b2")]));
        assert!(scene.last_flight().is_none());
        assert_eq!(scene.render_requests(), 1);
        Ok(())
    }

    #[test]
    fn second_isolation_clears_first_highlight() -> Result<()> {
        let mut scene = scene()?;
        let driver = IsolationDriver::default();
        driver.isolate(Some(&mut scene), &ObjectId::from("a1"), &[ObjectId::from("b1")]);
        driver.isolate(Some(&mut scene), &ObjectId::from("a2"), &[]);

        assert_eq!(scene.highlighted_object_ids(), vec![ObjectId::from("a2")]);
        let b1 = scene.flags(&ObjectId::from("b1"));
        assert!(b1.is_some_and(|flags| flags.xrayed && flags.visible && !flags.highlighted));
        Ok(())
    }
}
