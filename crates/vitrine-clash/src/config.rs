use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use vitrine_base::ModelId;
use vitrine_geometry::{Transform, Vec3};

use crate::Result;
use crate::isolate::COLLISION_FLIGHT_DURATION;
use crate::scan::ScanStrategy;
use crate::visibility::SUBTREE_FLIGHT_DURATION;

pub const DEFAULT_GRID_SIZE: f64 = 100.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelSource {
    pub id: ModelId,
    pub src: String,
}

/// Placement applied to a model as soon as it finishes loading. Missing
/// parts keep the value the model was loaded with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementPreset {
    #[serde(default)]
    pub position: Option<Vec3>,
    #[serde(default)]
    pub rotation: Option<Vec3>,
}

impl PlacementPreset {
    pub fn apply_to(&self, transform: Transform) -> Transform {
        Transform::new(
            self.position.unwrap_or(transform.position),
            self.rotation.unwrap_or(transform.rotation),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub default_models: Vec<ModelSource>,
    pub model_transforms: BTreeMap<ModelId, PlacementPreset>,
    pub collision_flight_duration: f64,
    pub subtree_flight_duration: f64,
    pub grid_size: f64,
    pub scan_strategy: ScanStrategy,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            default_models: Vec::new(),
            model_transforms: BTreeMap::new(),
            collision_flight_duration: COLLISION_FLIGHT_DURATION,
            subtree_flight_duration: SUBTREE_FLIGHT_DURATION,
            grid_size: DEFAULT_GRID_SIZE,
            scan_strategy: ScanStrategy::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn preset(&self, model: &ModelId) -> Option<&PlacementPreset> {
        self.model_transforms.get(model)
    }
}
