use std::collections::{HashMap, HashSet};
use tracing::debug;
use vitrine_base::{ModelId, ObjectId};
use vitrine_geometry::{Aabb, Transform, merge};

use crate::{
    CameraFlight, Error, MetaObject, ModelDescription, ModelHandle, ObjectFlags, Result,
    SceneDescription, ScenePort,
};

#[derive(Clone, Debug)]
struct ModelRecord {
    id: ModelId,
    transform: Transform,
    object_list: Option<Vec<ObjectId>>,
}

#[derive(Clone, Debug)]
struct ObjectRecord {
    id: ObjectId,
    owner: Option<ModelId>,
    parent: Option<ObjectId>,
    local: Option<Aabb>,
    flags: ObjectFlags,
}

/// In-process scene holding model-local boxes and per-object flags.
///
/// World boxes are recomputed from the owning model's transform on every
/// query, so a re-placed model is visible to the next caller immediately.
#[derive(Clone, Debug, Default)]
pub struct MemoryScene {
    models: Vec<ModelRecord>,
    objects: Vec<ObjectRecord>,
    index: HashMap<ObjectId, usize>,
    flights: Vec<CameraFlight>,
    render_requests: usize,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: &SceneDescription) -> Result<Self> {
        let mut scene = Self::new();
        for model in &description.models {
            scene.load_model(model)?;
        }
        Ok(scene)
    }

    /// Adds a model and its objects. Nothing is inserted when any id clashes
    /// or any box is malformed.
    pub fn load_model(&mut self, model: &ModelDescription) -> Result<ModelHandle> {
        if self.models.iter().any(|record| record.id == model.id) {
            return Err(Error::DuplicateModel(model.id.clone()));
        }

        let mut seen = HashSet::new();
        let mut records = Vec::with_capacity(model.objects.len());
        for object in &model.objects {
            if self.index.contains_key(&object.id) || !seen.insert(object.id.clone()) {
                return Err(Error::DuplicateObject(object.id.clone()));
            }
            records.push(ObjectRecord {
                id: object.id.clone(),
                owner: Some(model.id.clone()),
                parent: object.parent.clone(),
                local: object.local_aabb()?,
                flags: ObjectFlags::default(),
            });
        }

        if let Some(object) = self.parent_cycle(&records) {
            return Err(Error::ParentCycle(object));
        }

        let object_ids: Vec<ObjectId> = records.iter().map(|record| record.id.clone()).collect();
        for record in records {
            self.index.insert(record.id.clone(), self.objects.len());
            self.objects.push(record);
        }
        self.models.push(ModelRecord {
            id: model.id.clone(),
            transform: model.transform(),
            object_list: model.list_objects.then(|| object_ids.clone()),
        });

        debug!(model = %model.id, objects = object_ids.len(), "model loaded into scene");
        Ok(ModelHandle {
            id: model.id.clone(),
            transform: model.transform(),
            object_ids,
        })
    }

    pub fn flags(&self, object: &ObjectId) -> Option<ObjectFlags> {
        self.record(object).map(|record| record.flags)
    }

    pub fn flights(&self) -> &[CameraFlight] {
        &self.flights
    }

    pub fn last_flight(&self) -> Option<&CameraFlight> {
        self.flights.last()
    }

    pub fn render_requests(&self) -> usize {
        self.render_requests
    }

    fn record(&self, object: &ObjectId) -> Option<&ObjectRecord> {
        self.index.get(object).map(|&idx| &self.objects[idx])
    }

    fn model_record(&self, model: &ModelId) -> Option<&ModelRecord> {
        self.models.iter().find(|record| &record.id == model)
    }

    /// First incoming object whose parent chain loops back on itself.
    /// Loaded objects never form a cycle, so any loop runs through `incoming`.
    fn parent_cycle(&self, incoming: &[ObjectRecord]) -> Option<ObjectId> {
        let pending: HashMap<&ObjectId, Option<&ObjectId>> = incoming
            .iter()
            .map(|record| (&record.id, record.parent.as_ref()))
            .collect();
        let parent_of = |id: &ObjectId| match pending.get(id) {
            Some(parent) => *parent,
            None => self.record(id).and_then(|record| record.parent.as_ref()),
        };

        incoming.iter().find_map(|record| {
            let mut chain = HashSet::new();
            let mut current = Some(&record.id);
            while let Some(id) = current {
                if !chain.insert(id) {
                    return Some(record.id.clone());
                }
                current = parent_of(id);
            }
            None
        })
    }

    fn world_aabb(&self, record: &ObjectRecord) -> Option<Aabb> {
        let local = record.local?;
        let transform = record
            .owner
            .as_ref()
            .and_then(|owner| self.model_record(owner))
            .map(|model| model.transform);
        match transform {
            Some(transform) => Some(local.transformed(&transform)),
            None => Some(local),
        }
    }

    fn update_flags(&mut self, ids: &[ObjectId], mut update: impl FnMut(&mut ObjectFlags)) {
        for id in ids {
            if let Some(&idx) = self.index.get(id) {
                update(&mut self.objects[idx].flags);
            }
        }
    }

    fn ids_where(&self, predicate: impl Fn(&ObjectFlags) -> bool) -> Vec<ObjectId> {
        self.objects
            .iter()
            .filter(|record| predicate(&record.flags))
            .map(|record| record.id.clone())
            .collect()
    }
}

impl ScenePort for MemoryScene {
    fn object_ids(&self) -> Vec<ObjectId> {
        self.objects.iter().map(|record| record.id.clone()).collect()
    }

    fn model_ids(&self) -> Vec<ModelId> {
        self.models.iter().map(|record| record.id.clone()).collect()
    }

    fn model(&self, model: &ModelId) -> Option<ModelHandle> {
        let record = self.model_record(model)?;
        let object_ids = self
            .objects
            .iter()
            .filter(|object| object.owner.as_ref() == Some(model))
            .map(|object| object.id.clone())
            .collect();
        Some(ModelHandle {
            id: record.id.clone(),
            transform: record.transform,
            object_ids,
        })
    }

    fn model_object_ids(&self, model: &ModelId) -> Option<Vec<ObjectId>> {
        self.model_record(model)?.object_list.clone()
    }

    fn meta_objects(&self) -> Vec<MetaObject> {
        self.objects
            .iter()
            .filter(|record| record.owner.is_some())
            .map(|record| MetaObject {
                id: record.id.clone(),
                owner: record.owner.clone(),
                parent: record.parent.clone(),
            })
            .collect()
    }

    fn meta_owner(&self, object: &ObjectId) -> Option<ModelId> {
        self.record(object)?.owner.clone()
    }

    fn objects_in_subtree(&self, node: &ObjectId) -> Vec<ObjectId> {
        if !self.index.contains_key(node) {
            return Vec::new();
        }

        let mut children: HashMap<&ObjectId, Vec<&ObjectId>> = HashMap::new();
        for record in &self.objects {
            if let Some(parent) = &record.parent {
                children.entry(parent).or_default().push(&record.id);
            }
        }

        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            result.push(current.clone());
            if let Some(kids) = children.get(current) {
                stack.extend(kids.iter().rev().copied());
            }
        }
        result
    }

    fn aabb(&self, object: &ObjectId) -> Option<Aabb> {
        self.record(object).and_then(|record| self.world_aabb(record))
    }

    fn scene_aabb(&self) -> Option<Aabb> {
        merge(self.objects.iter().map(|record| self.world_aabb(record)))
    }

    fn set_model_transform(&mut self, model: &ModelId, transform: Transform) -> bool {
        match self.models.iter_mut().find(|record| &record.id == model) {
            Some(record) => {
                record.transform = transform;
                true
            }
            None => false,
        }
    }

    fn set_objects_visible(&mut self, ids: &[ObjectId], visible: bool) {
        self.update_flags(ids, |flags| flags.visible = visible);
    }

    fn set_objects_xrayed(&mut self, ids: &[ObjectId], xrayed: bool) {
        self.update_flags(ids, |flags| flags.xrayed = xrayed);
    }

    fn set_objects_highlighted(&mut self, ids: &[ObjectId], highlighted: bool) {
        self.update_flags(ids, |flags| flags.highlighted = highlighted);
    }

    fn set_objects_selected(&mut self, ids: &[ObjectId], selected: bool) {
        self.update_flags(ids, |flags| flags.selected = selected);
    }

    fn visible_object_ids(&self) -> Vec<ObjectId> {
        self.ids_where(|flags| flags.visible)
    }

    fn xrayed_object_ids(&self) -> Vec<ObjectId> {
        self.ids_where(|flags| flags.xrayed)
    }

    fn highlighted_object_ids(&self) -> Vec<ObjectId> {
        self.ids_where(|flags| flags.highlighted)
    }

    fn selected_object_ids(&self) -> Vec<ObjectId> {
        self.ids_where(|flags| flags.selected)
    }

    fn fly_to(&mut self, flight: CameraFlight) {
        self.flights.push(flight);
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }

    fn add_helper(&mut self, id: ObjectId, aabb: Aabb) -> bool {
        if self.index.contains_key(&id) {
            debug!(object = %id, "helper refused: id already in scene");
            return false;
        }
        self.index.insert(id.clone(), self.objects.len());
        self.objects.push(ObjectRecord {
            id,
            owner: None,
            parent: None,
            local: Some(aabb),
            flags: ObjectFlags::default(),
        });
        true
    }
}
