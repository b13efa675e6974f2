use serde::Serialize;
use vitrine_base::{ModelId, ObjectId};
use vitrine_geometry::Transform;

/// Render state of one object. Visible by default, nothing else set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ObjectFlags {
    pub visible: bool,
    pub xrayed: bool,
    pub highlighted: bool,
    pub selected: bool,
}

impl Default for ObjectFlags {
    fn default() -> Self {
        Self {
            visible: true,
            xrayed: false,
            highlighted: false,
            selected: false,
        }
    }
}

/// Snapshot of a loaded model as delivered by the load notification.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelHandle {
    pub id: ModelId,
    pub transform: Transform,
    pub object_ids: Vec<ObjectId>,
}

/// Metadata entry for an object. `owner` is `None` for helper geometry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaObject {
    pub id: ObjectId,
    pub owner: Option<ModelId>,
    pub parent: Option<ObjectId>,
}
