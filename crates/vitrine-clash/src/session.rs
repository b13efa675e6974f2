use tracing::{info, warn};
use vitrine_base::{ModelId, ObjectId};
use vitrine_geometry::{Aabb, Transform, Vec3};
use vitrine_scene::{CameraFlight, FlightTarget, ScenePort};

use crate::config::ViewerConfig;
use crate::isolate::IsolationDriver;
use crate::ready::{LoadBarrier, ReadyState};
use crate::scan::{CollisionScanner, EmptyReason, ScanReport};
use crate::store::CollisionResultStore;
use crate::transform::TransformRegistry;
use crate::visibility;
use crate::{Error, Result};

/// Helper object laid under the models once loading completes.
pub const GROUND_GRID_ID: &str = "__ground_grid";

/// Called after every scan with the entry count and, when there are no
/// entries, the reason.
pub type ResultsListener = Box<dyn FnMut(usize, Option<EmptyReason>)>;

/// Viewer state around one scene: loading progress, model placement,
/// collision results and visualization.
pub struct ViewerSession<S: ScenePort> {
    scene: S,
    config: ViewerConfig,
    state: ReadyState,
    barrier: LoadBarrier,
    transforms: TransformRegistry,
    store: CollisionResultStore,
    scanner: CollisionScanner,
    driver: IsolationDriver,
    collision_target: Option<ModelId>,
    listener: Option<ResultsListener>,
}

impl<S: ScenePort> ViewerSession<S> {
    /// Starts loading. With no configured sources the session is ready at once.
    pub fn new(scene: S, config: ViewerConfig) -> Self {
        let mut session = Self {
            scene,
            barrier: LoadBarrier::new(config.default_models.len()),
            scanner: CollisionScanner::new(config.scan_strategy),
            driver: IsolationDriver::new(config.collision_flight_duration),
            config,
            state: ReadyState::Loading,
            transforms: TransformRegistry::new(),
            store: CollisionResultStore::new(),
            collision_target: None,
            listener: None,
        };
        if session.barrier.is_complete() {
            session.finalize();
        }
        session
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn ready_state(&self) -> ReadyState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == ReadyState::Initialized
    }

    pub fn transforms(&self) -> &TransformRegistry {
        &self.transforms
    }

    pub fn results(&self) -> &CollisionResultStore {
        &self.store
    }

    pub fn set_results_listener(
        &mut self,
        listener: impl FnMut(usize, Option<EmptyReason>) + 'static,
    ) {
        self.listener = Some(Box::new(listener));
    }

    /// Model the collision panel scans by default: the first one registered
    /// unless the user picked another.
    pub fn collision_target(&self) -> Option<&ModelId> {
        self.collision_target.as_ref()
    }

    pub fn set_collision_target(&mut self, model: Option<ModelId>) {
        self.collision_target = model;
    }

    /// Result of the availability check for one configured source.
    pub fn source_checked(&mut self, model: &ModelId, available: bool) {
        if !available {
            warn!(model = %model, "default model skipped: source not available");
        }
        if self.barrier.source_checked(available) {
            self.finalize();
        }
    }

    /// Load notification: applies the configured placement, registers the
    /// model and advances the barrier.
    pub fn model_loaded(&mut self, model: &ModelId) -> Result<()> {
        let handle = self
            .scene
            .model(model)
            .ok_or_else(|| Error::UnknownModel(model.clone()))?;

        if let Some(preset) = self.config.preset(model).copied() {
            let placed = preset.apply_to(handle.transform);
            if !self.scene.set_model_transform(model, placed) {
                warn!(model = %model, "placement preset not applied");
            }
        }

        self.register_model(model)?;
        if self.barrier.model_settled() {
            self.finalize();
        }
        Ok(())
    }

    pub fn model_failed(&mut self, model: &ModelId, reason: &str) {
        warn!(model = %model, reason, "model failed to load");
        if self.barrier.model_settled() {
            self.finalize();
        }
    }

    /// Returns whether this was the first registration of the model.
    pub fn register_model(&mut self, model: &ModelId) -> Result<bool> {
        let handle = self
            .scene
            .model(model)
            .ok_or_else(|| Error::UnknownModel(model.clone()))?;
        let first = self.transforms.register(&handle);
        if self.collision_target.is_none() {
            self.collision_target = Some(handle.id);
        }
        Ok(first)
    }

    pub fn apply_transform(
        &mut self,
        model: &ModelId,
        position: Vec3,
        rotation_y: f64,
    ) -> Result<Transform> {
        self.transforms
            .apply_transform(&mut self.scene, model, position, rotation_y)
    }

    pub fn reset_transform(&mut self, model: &ModelId) -> bool {
        self.transforms.reset_transform(&mut self.scene, model)
    }

    /// Scans `model`, replaces the stored result and notifies the listener.
    pub fn run_scan(&mut self, model: Option<&ModelId>) -> Result<&ScanReport> {
        self.ensure_ready()?;
        let report = self.scanner.scan(&self.scene, model);
        let count = report.entries.len();
        let reason = report.empty_reason();
        let report = self.store.replace(report);
        if let Some(listener) = self.listener.as_mut() {
            listener(count, reason);
        }
        Ok(report)
    }

    pub fn isolate(&mut self, object: &ObjectId, colliding: &[ObjectId]) -> Result<()> {
        self.ensure_ready()?;
        self.driver.isolate(Some(&mut self.scene), object, colliding);
        Ok(())
    }

    /// Isolates the stored collision at `index`.
    pub fn isolate_entry(&mut self, index: usize) -> Result<()> {
        self.ensure_ready()?;
        let entry = self
            .store
            .entry(index)
            .cloned()
            .ok_or(Error::EntryOutOfRange {
                index,
                len: self.store.len(),
            })?;
        self.driver
            .isolate(Some(&mut self.scene), &entry.object, &entry.colliding);
        Ok(())
    }

    pub fn reset_visibility(&mut self) -> Result<()> {
        self.ensure_ready()?;
        visibility::reset_visibility(&mut self.scene);
        Ok(())
    }

    pub fn isolate_subtree(&mut self, node: &ObjectId) -> Result<()> {
        self.ensure_ready()?;
        visibility::isolate_subtree(&mut self.scene, node, self.config.subtree_flight_duration);
        Ok(())
    }

    fn ensure_ready(&self) -> Result<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(Error::NotReady)
        }
    }

    fn finalize(&mut self) {
        if self.is_ready() {
            return;
        }
        self.scene.fly_to(CameraFlight::jump_to(FlightTarget::Scene));
        if let Some(bounds) = self.scene.scene_aabb() {
            let grid = ground_grid(&bounds, self.config.grid_size);
            if !self.scene.add_helper(ObjectId::from(GROUND_GRID_ID), grid) {
                warn!(id = GROUND_GRID_ID, "ground grid skipped: id taken by a model object");
            }
        }
        self.state = ReadyState::Initialized;
        info!(
            models = self.transforms.models().len(),
            expected = self.barrier.expected(),
            settled = self.barrier.settled(),
            "all models settled, viewer initialized"
        );
    }
}

/// Flat square of side `size` centred under the scene at its lowest point.
pub fn ground_grid(scene: &Aabb, size: f64) -> Aabb {
    let center = scene.center();
    let half = size * 0.5;
    let ground = scene.min.y;
    Aabb::new(
        Vec3::new(center.x - half, ground, center.z - half),
        Vec3::new(center.x + half, ground, center.z + half),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_sits_under_scene_center() {
        let scene = Aabb::from_array([0.0, -1.0, 10.0, 20.0, 5.0, 30.0]);
        assert_eq!(
            ground_grid(&scene, 100.0),
            Aabb::from_array([-40.0, -1.0, -30.0, 60.0, -1.0, 70.0])
        );
    }
}
