use std::collections::HashSet;
use vitrine_base::{ModelId, ObjectId};
use vitrine_scene::ScenePort;

/// Read-only membership queries over the scene's metadata.
///
/// Every call takes a fresh snapshot; nothing is retained between calls.
pub struct ObjectRegistry<'a, S: ScenePort + ?Sized> {
    scene: &'a S,
}

impl<'a, S: ScenePort + ?Sized> ObjectRegistry<'a, S> {
    pub fn new(scene: &'a S) -> Self {
        Self { scene }
    }

    /// Objects owned by `model`, from the model's own list when it has a
    /// non-empty one, otherwise from the metadata index.
    pub fn objects_of(&self, model: &ModelId) -> Vec<ObjectId> {
        if let Some(ids) = self.scene.model_object_ids(model) {
            if !ids.is_empty() {
                return dedup(ids);
            }
        }

        self.scene
            .meta_objects()
            .into_iter()
            .filter(|meta| meta.owner.as_ref() == Some(model))
            .map(|meta| meta.id)
            .collect()
    }

    pub fn owner_of(&self, object: &ObjectId) -> Option<ModelId> {
        self.scene.meta_owner(object)
    }

    pub fn all_object_ids(&self) -> Vec<ObjectId> {
        self.scene.object_ids()
    }

    /// Objects that belong to some model other than `model`. Objects without
    /// an owner are helper geometry and are left out.
    pub fn external_objects(&self, model: &ModelId, targets: &HashSet<ObjectId>) -> Vec<ObjectId> {
        let mut seen = HashSet::new();
        self.all_object_ids()
            .into_iter()
            .filter(|id| !targets.contains(id))
            .filter(|id| match self.owner_of(id) {
                Some(owner) => &owner != model,
                None => false,
            })
            .filter(|id| seen.insert(id.clone()))
            .collect()
    }
}

fn dedup(ids: Vec<ObjectId>) -> Vec<ObjectId> {
    let mut seen = HashSet::new();
    ids.into_iter().filter(|id| seen.insert(id.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_geometry::Aabb;
    use vitrine_scene::{MemoryScene, ModelDescription, Result};

    fn scene() -> Result<MemoryScene> {
        let mut scene = MemoryScene::new();
        scene.load_model(
            &ModelDescription::new("ARQ")
                .with_object("wall", Some([0.0, 0.0, 0.0, 1.0, 3.0, 0.2]))
                .with_object("door", None),
        )?;
        scene.load_model(
            &ModelDescription::new("HID")
                .without_object_list()
                .with_object("pipe", Some([0.0, 1.0, 0.0, 2.0, 1.1, 0.1])),
        )?;
        scene.add_helper(
            ObjectId::from("grid"),
            Aabb::from_array([-50.0, 0.0, -50.0, 50.0, 0.0, 50.0]),
        );
        Ok(scene)
    }

    #[test]
    fn objects_of_prefers_model_list() -> Result<()> {
        let scene = scene()?;
        let registry = ObjectRegistry::new(&scene);
        assert_eq!(
            registry.objects_of(&ModelId::from("ARQ")),
            vec![ObjectId::from("wall"), ObjectId::from("door")]
        );
        Ok(())
    }

    #[test]
    fn objects_of_falls_back_to_metadata() -> Result<()> {
        let scene = scene()?;
        let registry = ObjectRegistry::new(&scene);
        assert_eq!(
            registry.objects_of(&ModelId::from("HID")),
            vec![ObjectId::from("pipe")]
        );
        assert!(registry.objects_of(&ModelId::from("missing")).is_empty());
        Ok(())
    }

    #[test]
    fn helper_geometry_is_never_external() -> Result<()> {
        let scene = scene()?;
        let registry = ObjectRegistry::new(&scene);
        let model = ModelId::from("ARQ");
        let targets: HashSet<ObjectId> = registry.objects_of(&model).into_iter().collect();
        assert_eq!(registry.owner_of(&ObjectId::from("grid")), None);
        assert_eq!(
            registry.external_objects(&model, &targets),
            vec![ObjectId::from("pipe")]
        );
        Ok(())
    }
}
