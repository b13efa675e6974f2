use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};
use vitrine_base::{ModelId, ObjectId};
use vitrine_geometry::Aabb;
use vitrine_scene::ScenePort;

use crate::registry::ObjectRegistry;

/// An object of the scanned model and the objects of other models whose
/// boxes overlap it, in discovery order. Never empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollisionEntry {
    pub object: ObjectId,
    pub colliding: Vec<ObjectId>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    NoModelSelected,
    NoObjectsInModel,
    NoExternalObjects,
    Completed,
}

/// Why a scan produced no entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyReason {
    NoModelSelected,
    NoObjectsInModel,
    NoOtherModels,
    NoOverlap,
}

impl std::fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::NoModelSelected => "Select a model to start the analysis.",
            Self::NoObjectsInModel => "No objects found in the selected model.",
            Self::NoOtherModels => "No other model loaded to compare collisions against.",
            Self::NoOverlap => "No collisions found.",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanStrategy {
    /// Every target box against every external box.
    #[default]
    AllPairs,
    /// External boxes sorted by min X; each target only visits the prefix
    /// that can still reach it. Same output as `AllPairs`.
    SweepX,
}

impl std::str::FromStr for ScanStrategy {
    type Err = String;

    fn from_str(text: &str) -> std::result::Result<Self, Self::Err> {
        match text.trim() {
            "all-pairs" => Ok(Self::AllPairs),
            "sweep-x" => Ok(Self::SweepX),
            other => Err(format!("unknown scan strategy: {other}")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScanReport {
    pub model: Option<ModelId>,
    pub status: ScanStatus,
    pub target_objects: usize,
    pub external_objects: usize,
    pub entries: Vec<CollisionEntry>,
}

impl ScanReport {
    fn without_entries(model: Option<ModelId>, status: ScanStatus) -> Self {
        Self {
            model,
            status,
            target_objects: 0,
            external_objects: 0,
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        match self.status {
            ScanStatus::NoModelSelected => Some(EmptyReason::NoModelSelected),
            ScanStatus::NoObjectsInModel => Some(EmptyReason::NoObjectsInModel),
            ScanStatus::NoExternalObjects => Some(EmptyReason::NoOtherModels),
            ScanStatus::Completed if self.entries.is_empty() => Some(EmptyReason::NoOverlap),
            ScanStatus::Completed => None,
        }
    }

    pub fn summary(&self) -> String {
        match (&self.status, &self.model) {
            (ScanStatus::Completed, Some(model)) => format!(
                "{} object(s) of model {model} colliding with other models.",
                self.entries.len()
            ),
            _ => self
                .empty_reason()
                .map(|reason| reason.to_string())
                .unwrap_or_default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct CollisionScanner {
    strategy: ScanStrategy,
}

impl CollisionScanner {
    pub fn new(strategy: ScanStrategy) -> Self {
        Self { strategy }
    }

    pub fn scan<S: ScenePort + ?Sized>(&self, scene: &S, target: Option<&ModelId>) -> ScanReport {
        let model = match target {
            Some(model) if !model.is_empty() => model.clone(),
            _ => {
                debug!("collision scan requested without a model");
                return ScanReport::without_entries(None, ScanStatus::NoModelSelected);
            }
        };

        let registry = ObjectRegistry::new(scene);
        let targets = registry.objects_of(&model);
        if targets.is_empty() {
            info!(model = %model, "collision scan: model has no objects");
            return ScanReport::without_entries(Some(model), ScanStatus::NoObjectsInModel);
        }

        let target_set: HashSet<ObjectId> = targets.iter().cloned().collect();
        let externals = registry.external_objects(&model, &target_set);
        if externals.is_empty() {
            info!(model = %model, "collision scan: no other models to compare against");
            let mut report = ScanReport::without_entries(Some(model), ScanStatus::NoExternalObjects);
            report.target_objects = targets.len();
            return report;
        }

        let external_boxes: Vec<(ObjectId, Aabb)> = externals
            .iter()
            .filter_map(|id| scene.aabb(id).map(|aabb| (id.clone(), aabb)))
            .collect();

        let entries = match self.strategy {
            ScanStrategy::AllPairs => all_pairs(scene, &targets, &external_boxes),
            ScanStrategy::SweepX => sweep_x(scene, &targets, &external_boxes),
        };

        info!(
            model = %model,
            targets = targets.len(),
            externals = externals.len(),
            collisions = entries.len(),
            strategy = ?self.strategy,
            "collision scan finished"
        );

        ScanReport {
            model: Some(model),
            status: ScanStatus::Completed,
            target_objects: targets.len(),
            external_objects: externals.len(),
            entries,
        }
    }
}

/// Scans with the default all-pairs strategy.
pub fn scan<S: ScenePort + ?Sized>(scene: &S, target: Option<&ModelId>) -> ScanReport {
    CollisionScanner::default().scan(scene, target)
}

fn target_boxes<'a, S: ScenePort + ?Sized>(
    scene: &'a S,
    targets: &'a [ObjectId],
) -> impl Iterator<Item = (&'a ObjectId, Aabb)> + 'a {
    targets.iter().filter_map(move |id| match scene.aabb(id) {
        Some(aabb) => Some((id, aabb)),
        None => {
            debug!(object = %id, "skipping object without geometry");
            None
        }
    })
}

fn all_pairs<S: ScenePort + ?Sized>(
    scene: &S,
    targets: &[ObjectId],
    externals: &[(ObjectId, Aabb)],
) -> Vec<CollisionEntry> {
    target_boxes(scene, targets)
        .filter_map(|(id, aabb)| {
            let colliding: Vec<ObjectId> = externals
                .iter()
                .filter(|(_, other)| aabb.intersects(other))
                .map(|(other_id, _)| other_id.clone())
                .collect();
            entry(id, colliding)
        })
        .collect()
}

fn sweep_x<S: ScenePort + ?Sized>(
    scene: &S,
    targets: &[ObjectId],
    externals: &[(ObjectId, Aabb)],
) -> Vec<CollisionEntry> {
    let mut order: Vec<usize> = (0..externals.len()).collect();
    order.sort_by(|&a, &b| externals[a].1.min.x.total_cmp(&externals[b].1.min.x));

    target_boxes(scene, targets)
        .filter_map(|(id, aabb)| {
            let reachable = order.partition_point(|&idx| externals[idx].1.min.x <= aabb.max.x);
            let mut hits: Vec<usize> = order[..reachable]
                .iter()
                .copied()
                .filter(|&idx| aabb.intersects(&externals[idx].1))
                .collect();
            // back to discovery order
            hits.sort_unstable();
            let colliding = hits
                .into_iter()
                .map(|idx| externals[idx].0.clone())
                .collect();
            entry(id, colliding)
        })
        .collect()
}

fn entry(object: &ObjectId, colliding: Vec<ObjectId>) -> Option<CollisionEntry> {
    if colliding.is_empty() {
        None
    } else {
        Some(CollisionEntry {
            object: object.clone(),
            colliding,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vitrine_scene::{MemoryScene, ModelDescription, Result};

    const UNIT: [f64; 6] = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

    fn pair(other: [f64; 6]) -> Result<MemoryScene> {
        let mut scene = MemoryScene::new();
        scene.load_model(&ModelDescription::new("A").with_object("a1", Some(UNIT)))?;
        scene.load_model(&ModelDescription::new("B").with_object("b1", Some(other)))?;
        Ok(scene)
    }

    #[test]
    fn overlapping_pair_yields_one_entry() -> Result<()> {
        let scene = pair([0.5, 0.5, 0.5, 1.5, 1.5, 1.5])?;
        let report = scan(&scene, Some(&ModelId::from("A")));
        assert_eq!(report.status, ScanStatus::Completed);
        assert_eq!(
            report.entries,
            vec![CollisionEntry {
                object: ObjectId::from("a1"),
                colliding: vec![ObjectId::from("b1")],
            }]
        );
        assert_eq!(report.empty_reason(), None);
        Ok(())
    }

    #[test]
    fn disjoint_pair_reports_no_overlap() -> Result<()> {
        let scene = pair([2.0, 2.0, 2.0, 3.0, 3.0, 3.0])?;
        let report = scan(&scene, Some(&ModelId::from("A")));
        assert_eq!(report.status, ScanStatus::Completed);
        assert!(report.is_empty());
        assert_eq!(report.empty_reason(), Some(EmptyReason::NoOverlap));
        Ok(())
    }

    #[test]
    fn missing_or_blank_model_is_not_selected() -> Result<()> {
        let scene = pair(UNIT)?;
        assert_eq!(scan(&scene, None).status, ScanStatus::NoModelSelected);
        assert_eq!(
            scan(&scene, Some(&ModelId::from(""))).empty_reason(),
            Some(EmptyReason::NoModelSelected)
        );
        Ok(())
    }

    #[test]
    fn unknown_model_has_no_objects() -> Result<()> {
        let scene = pair(UNIT)?;
        let report = scan(&scene, Some(&ModelId::from("C")));
        assert_eq!(report.status, ScanStatus::NoObjectsInModel);
        assert_eq!(report.empty_reason(), Some(EmptyReason::NoObjectsInModel));
        Ok(())
    }

    #[test]
    fn strategies_parse_from_cli_names() {
        assert_eq!("sweep-x".parse::<ScanStrategy>(), Ok(ScanStrategy::SweepX));
        assert_eq!("all-pairs".parse::<ScanStrategy>(), Ok(ScanStrategy::AllPairs));
        assert!("octree".parse::<ScanStrategy>().is_err());
    }

    #[test]
    fn summaries_differ_per_reason() {
        let reasons = [
            EmptyReason::NoModelSelected,
            EmptyReason::NoObjectsInModel,
            EmptyReason::NoOtherModels,
            EmptyReason::NoOverlap,
        ];
        let texts: HashSet<String> = reasons.iter().map(ToString::to_string).collect();
        assert_eq!(texts.len(), reasons.len());
    }
}
