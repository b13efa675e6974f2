use serde::{Deserialize, Serialize};
use std::path::Path;
use vitrine_base::{ModelId, ObjectId};
use vitrine_geometry::{Aabb, Transform, Vec3};

use crate::Result;

/// Serialized scene content: models with their objects' model-local boxes.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub models: Vec<ModelDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelDescription {
    pub id: ModelId,
    #[serde(default)]
    pub position: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    /// When false the engine keeps no per-model object list and membership
    /// has to be derived from metadata.
    #[serde(default = "default_list_objects")]
    pub list_objects: bool,
    #[serde(default)]
    pub objects: Vec<ObjectDescription>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ObjectDescription {
    pub id: ObjectId,
    #[serde(default)]
    pub aabb: Option<Vec<f64>>,
    #[serde(default)]
    pub parent: Option<ObjectId>,
}

fn default_list_objects() -> bool {
    true
}

impl SceneDescription {
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn model(&self, id: &ModelId) -> Option<&ModelDescription> {
        self.models.iter().find(|model| &model.id == id)
    }
}

impl ModelDescription {
    pub fn new(id: impl Into<ModelId>) -> Self {
        Self {
            id: id.into(),
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            list_objects: true,
            objects: Vec::new(),
        }
    }

    pub fn with_object(mut self, id: impl Into<ObjectId>, aabb: Option<[f64; 6]>) -> Self {
        self.objects.push(ObjectDescription {
            id: id.into(),
            aabb: aabb.map(|values| values.to_vec()),
            parent: None,
        });
        self
    }

    pub fn with_child(
        mut self,
        id: impl Into<ObjectId>,
        parent: impl Into<ObjectId>,
        aabb: Option<[f64; 6]>,
    ) -> Self {
        self.objects.push(ObjectDescription {
            id: id.into(),
            aabb: aabb.map(|values| values.to_vec()),
            parent: Some(parent.into()),
        });
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn without_object_list(mut self) -> Self {
        self.list_objects = false;
        self
    }

    pub fn transform(&self) -> Transform {
        Transform::new(self.position, self.rotation)
    }
}

impl ObjectDescription {
    pub fn local_aabb(&self) -> Result<Option<Aabb>> {
        match &self.aabb {
            Some(values) => Ok(Some(Aabb::try_from_slice(values)?)),
            None => Ok(None),
        }
    }
}
