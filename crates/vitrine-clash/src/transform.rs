use std::collections::HashMap;
use tracing::{debug, info};
use vitrine_base::ModelId;
use vitrine_geometry::{Transform, Vec3};
use vitrine_scene::{ModelHandle, ScenePort};

use crate::{Error, Result};

/// Fallback for non-finite transform components.
const DEFAULT_COMPONENT: f64 = 0.0;

/// Tracks loaded models and the placement each had when first registered.
#[derive(Clone, Debug, Default)]
pub struct TransformRegistry {
    live: Vec<ModelId>,
    originals: HashMap<ModelId, Transform>,
}

impl TransformRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the model. Only the first registration of an id captures the
    /// original transform; returns whether this was that first registration.
    pub fn register(&mut self, model: &ModelHandle) -> bool {
        if !self.live.contains(&model.id) {
            self.live.push(model.id.clone());
        }
        if self.originals.contains_key(&model.id) {
            debug!(model = %model.id, "model re-registered, original transform kept");
            return false;
        }
        self.originals.insert(model.id.clone(), model.transform);
        info!(
            model = %model.id,
            position = %model.transform.position,
            rotation = %model.transform.rotation,
            "model registered"
        );
        true
    }

    pub fn is_registered(&self, model: &ModelId) -> bool {
        self.live.contains(model)
    }

    /// Registered models in first-registration order.
    pub fn models(&self) -> &[ModelId] {
        &self.live
    }

    pub fn original(&self, model: &ModelId) -> Option<Transform> {
        self.originals.get(model).copied()
    }

    /// Live placement, for filling an edit form.
    pub fn current_transform<S: ScenePort + ?Sized>(
        &self,
        scene: &S,
        model: &ModelId,
    ) -> Option<Transform> {
        if !self.is_registered(model) {
            return None;
        }
        scene.model(model).map(|handle| handle.transform)
    }

    /// Replaces the position and the Y rotation; X and Z rotation are kept.
    pub fn apply_transform<S: ScenePort + ?Sized>(
        &self,
        scene: &mut S,
        model: &ModelId,
        position: Vec3,
        rotation_y: f64,
    ) -> Result<Transform> {
        let current = self
            .current_transform(scene, model)
            .ok_or_else(|| Error::UnknownModel(model.clone()))?;

        let position = Vec3::new(
            finite_or(position.x, DEFAULT_COMPONENT),
            finite_or(position.y, DEFAULT_COMPONENT),
            finite_or(position.z, DEFAULT_COMPONENT),
        );
        let mut rotation = current.rotation;
        rotation.y = finite_or(rotation_y, DEFAULT_COMPONENT);
        let transform = Transform::new(position, rotation);

        if !scene.set_model_transform(model, transform) {
            return Err(Error::UnknownModel(model.clone()));
        }
        scene.request_render();
        info!(model = %model, position = %position, rotation_y = rotation.y, "transform applied");
        Ok(transform)
    }

    /// Puts the model back where it was first registered. Returns `false`
    /// when the model or its original is unknown.
    pub fn reset_transform<S: ScenePort + ?Sized>(&self, scene: &mut S, model: &ModelId) -> bool {
        let Some(original) = self.original(model) else {
            return false;
        };
        if !self.is_registered(model) || !scene.set_model_transform(model, original) {
            return false;
        }
        scene.request_render();
        info!(model = %model, "transform reset to original");
        true
    }
}

pub fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Parses user-entered text, falling back when it is not a finite number.
pub fn parse_number(text: &str, fallback: f64) -> f64 {
    text.trim()
        .parse::<f64>()
        .map(|value| finite_or(value, fallback))
        .unwrap_or(fallback)
}
