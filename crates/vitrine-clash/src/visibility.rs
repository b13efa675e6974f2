//! Show/hide/x-ray workflows driven from the object tree, context menu and
//! keyboard shortcuts. They share the scene's flag state with collision
//! isolation.

use tracing::debug;
use vitrine_base::ObjectId;
use vitrine_geometry::merge;
use vitrine_scene::{CameraFlight, FlightTarget, ScenePort};

/// Camera flight time when framing a tree node, in seconds.
pub const SUBTREE_FLIGHT_DURATION: f64 = 0.5;

/// Everything visible and plain again, camera back on the whole scene.
pub fn reset_visibility<S: ScenePort + ?Sized>(scene: &mut S) {
    let all = scene.object_ids();
    scene.set_objects_visible(&all, true);
    scene.set_objects_xrayed(&all, false);
    scene.set_objects_highlighted(&all, false);
    scene.fly_to(CameraFlight::jump_to(FlightTarget::Scene));
    clear_selection(scene);
}

pub fn clear_selection<S: ScenePort + ?Sized>(scene: &mut S) {
    let selected = scene.selected_object_ids();
    scene.set_objects_selected(&selected, false);
    let highlighted = scene.highlighted_object_ids();
    scene.set_objects_highlighted(&highlighted, false);
}

/// Selection replaces any previous selection. Unknown ids are ignored.
pub fn select_object<S: ScenePort + ?Sized>(scene: &mut S, object: &ObjectId) -> bool {
    if !scene.object_ids().contains(object) {
        return false;
    }
    clear_selection(scene);
    scene.set_objects_selected(std::slice::from_ref(object), true);
    true
}

pub fn hide_object<S: ScenePort + ?Sized>(scene: &mut S, object: &ObjectId) {
    scene.set_objects_visible(std::slice::from_ref(object), false);
}

pub fn hide_all<S: ScenePort + ?Sized>(scene: &mut S) {
    let visible = scene.visible_object_ids();
    scene.set_objects_visible(&visible, false);
}

pub fn show_all<S: ScenePort + ?Sized>(scene: &mut S) {
    let all = scene.object_ids();
    scene.set_objects_visible(&all, true);
    let xrayed = scene.xrayed_object_ids();
    scene.set_objects_xrayed(&xrayed, false);
    let selected = scene.selected_object_ids();
    scene.set_objects_selected(&selected, false);
}

pub fn reset_xray<S: ScenePort + ?Sized>(scene: &mut S) {
    let xrayed = scene.xrayed_object_ids();
    if xrayed.is_empty() {
        return;
    }
    scene.set_objects_xrayed(&xrayed, false);
}

/// Shows only the object and its metadata subtree. Objects without metadata
/// (helpers) cannot be isolated.
pub fn isolate_object<S: ScenePort + ?Sized>(scene: &mut S, object: &ObjectId) -> bool {
    if scene.meta_owner(object).is_none() {
        return false;
    }
    let visible = scene.visible_object_ids();
    scene.set_objects_visible(&visible, false);
    let xrayed = scene.xrayed_object_ids();
    scene.set_objects_xrayed(&xrayed, false);
    let selected = scene.selected_object_ids();
    scene.set_objects_selected(&selected, false);

    let subtree = scene.objects_in_subtree(object);
    scene.set_objects_visible(&subtree, true);
    true
}

/// Keeps everything visible but x-rays all except the object's subtree.
pub fn xray_others<S: ScenePort + ?Sized>(scene: &mut S, object: &ObjectId) -> bool {
    if scene.meta_owner(object).is_none() {
        return false;
    }
    let all = scene.object_ids();
    scene.set_objects_visible(&all, true);
    scene.set_objects_xrayed(&all, true);
    let subtree = scene.objects_in_subtree(object);
    scene.set_objects_xrayed(&subtree, false);
    true
}

/// Tree-node isolation. A node with nothing under it resets the view instead.
pub fn isolate_subtree<S: ScenePort + ?Sized>(
    scene: &mut S,
    node: &ObjectId,
    flight_duration: f64,
) {
    let subtree = scene.objects_in_subtree(node);
    if subtree.is_empty() {
        debug!(node = %node, "empty subtree, resetting visibility");
        reset_visibility(scene);
        return;
    }

    let all = scene.object_ids();
    scene.set_objects_xrayed(&all, true);
    scene.set_objects_xrayed(&subtree, false);
    scene.set_objects_visible(&all, false);
    scene.set_objects_visible(&subtree, true);

    let framed = merge(subtree.iter().map(|id| scene.aabb(id)));
    if let Some(aabb) = framed {
        scene.fly_to(CameraFlight::fly_to(FlightTarget::Aabb(aabb), flight_duration));
    }
    clear_selection(scene);
    debug!(node = %node, objects = subtree.len(), "subtree isolated");
}
