//! Scene port trait defining the engine contract.

use vitrine_base::{ModelId, ObjectId};
use vitrine_geometry::{Aabb, Transform};

use crate::{CameraFlight, MetaObject, ModelHandle};

/// Capabilities the viewer core needs from a rendering engine.
///
/// All queries return snapshots. Object boxes are always world-space and
/// reflect the owning model's current transform at the time of the call.
/// Flag setters silently ignore ids the scene does not know.
pub trait ScenePort {
    /// Every object in the scene, in load order. Includes helper geometry.
    fn object_ids(&self) -> Vec<ObjectId>;

    /// Loaded models, in load order.
    fn model_ids(&self) -> Vec<ModelId>;

    fn model(&self, model: &ModelId) -> Option<ModelHandle>;

    /// The model's own object list, when the engine keeps one.
    fn model_object_ids(&self, model: &ModelId) -> Option<Vec<ObjectId>>;

    /// The metadata index, in insertion order.
    fn meta_objects(&self) -> Vec<MetaObject>;

    /// Owning model of an object; `None` when the object has no metadata.
    fn meta_owner(&self, object: &ObjectId) -> Option<ModelId>;

    /// The node itself followed by every descendant in the metadata hierarchy.
    /// Empty when the node is unknown.
    fn objects_in_subtree(&self, node: &ObjectId) -> Vec<ObjectId>;

    fn aabb(&self, object: &ObjectId) -> Option<Aabb>;

    /// Box around every object with geometry.
    fn scene_aabb(&self) -> Option<Aabb>;

    /// Re-places a model live. Returns `false` for an unknown model.
    fn set_model_transform(&mut self, model: &ModelId, transform: Transform) -> bool;

    fn set_objects_visible(&mut self, ids: &[ObjectId], visible: bool);
    fn set_objects_xrayed(&mut self, ids: &[ObjectId], xrayed: bool);
    fn set_objects_highlighted(&mut self, ids: &[ObjectId], highlighted: bool);
    fn set_objects_selected(&mut self, ids: &[ObjectId], selected: bool);

    fn visible_object_ids(&self) -> Vec<ObjectId>;
    fn xrayed_object_ids(&self) -> Vec<ObjectId>;
    fn highlighted_object_ids(&self) -> Vec<ObjectId>;
    fn selected_object_ids(&self) -> Vec<ObjectId>;

    fn fly_to(&mut self, flight: CameraFlight);

    fn request_render(&mut self);

    /// Adds decorative geometry that has no model metadata. Returns `false`
    /// and leaves the scene alone when the id is already taken.
    fn add_helper(&mut self, id: ObjectId, aabb: Aabb) -> bool;
}
