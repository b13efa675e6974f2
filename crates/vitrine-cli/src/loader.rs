use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::{debug, info};
use vitrine_base::ModelId;
use vitrine_clash::{ModelSource, ViewerConfig, ViewerSession};
use vitrine_geometry::Vec3;
use vitrine_scene::{MemoryScene, SceneDescription, ScenePort};

/// `--place` argument: new position and optional Y rotation for one model.
#[derive(Clone, Debug, PartialEq)]
pub struct Placement {
    pub model: ModelId,
    pub position: Vec3,
    pub rotation_y: Option<f64>,
}

pub fn read_scene(path: &Path) -> Result<SceneDescription> {
    SceneDescription::from_path(path)
        .with_context(|| format!("failed to read scene {}", path.display()))
}

/// Reads the config file, or starts from defaults. Without configured default
/// models every model of the scene is loaded.
pub fn read_config(path: Option<&Path>, scene: &SceneDescription) -> Result<ViewerConfig> {
    let mut config = match path {
        Some(path) => ViewerConfig::from_path(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => ViewerConfig::default(),
    };
    if config.default_models.is_empty() {
        config.default_models = scene
            .models
            .iter()
            .map(|model| ModelSource {
                id: model.id.clone(),
                src: format!("scene:{}", model.id),
            })
            .collect();
    }
    Ok(config)
}

/// Runs the startup sequence against an in-memory scene: every configured
/// source is checked, then each available one is loaded. A source is
/// available when the scene description has a model with its id.
pub fn open_session(
    description: &SceneDescription,
    config: ViewerConfig,
) -> Result<ViewerSession<MemoryScene>> {
    let sources = config.default_models.clone();
    let mut session = ViewerSession::new(MemoryScene::new(), config);

    let mut available = Vec::new();
    for source in &sources {
        let model = description.model(&source.id);
        session.source_checked(&source.id, model.is_some());
        available.extend(model);
    }

    for model in available {
        match session.scene_mut().load_model(model) {
            Ok(handle) => {
                debug!(model = %handle.id, objects = handle.object_ids.len(), "model loaded");
                session
                    .model_loaded(&handle.id)
                    .with_context(|| format!("failed to register model {}", handle.id))?;
            }
            Err(err) => session.model_failed(&model.id, &err.to_string()),
        }
    }

    if !session.is_ready() {
        bail!("scene did not finish loading");
    }
    info!(
        models = session.transforms().models().len(),
        objects = session.scene().object_ids().len(),
        "scene ready"
    );
    Ok(session)
}

pub fn apply_placements(
    session: &mut ViewerSession<MemoryScene>,
    placements: &[Placement],
) -> Result<()> {
    for placement in placements {
        let rotation_y = match placement.rotation_y {
            Some(value) => value,
            None => session
                .scene()
                .model(&placement.model)
                .map(|handle| handle.transform.rotation.y)
                .unwrap_or_default(),
        };
        session
            .apply_transform(&placement.model, placement.position, rotation_y)
            .with_context(|| format!("cannot place model {}", placement.model))?;
    }
    Ok(())
}

/// Parses `ID=x,y,z` or `ID=x,y,z@rotY`.
pub fn parse_place(text: &str) -> Result<Placement> {
    let Some((model, rest)) = text.split_once('=') else {
        bail!("--place expects ID=x,y,z[@rotY], e.g. IFC_EST=-8.789,0.4,22.48@90");
    };
    let model = model.trim();
    if model.is_empty() {
        bail!("--place is missing the model id");
    }

    let (coords, rotation) = match rest.split_once('@') {
        Some((coords, rotation)) => (coords, Some(rotation)),
        None => (rest, None),
    };
    let parts: Vec<&str> = coords.split(',').collect();
    if parts.len() != 3 {
        bail!("--place expects three comma-separated coordinates for {model}");
    }

    let x: f64 = parts[0].trim().parse().context("invalid x")?;
    let y: f64 = parts[1].trim().parse().context("invalid y")?;
    let z: f64 = parts[2].trim().parse().context("invalid z")?;
    let rotation_y = match rotation {
        Some(text) => Some(text.trim().parse::<f64>().context("invalid rotation")?),
        None => None,
    };

    Ok(Placement {
        model: ModelId::from(model),
        position: Vec3::new(x, y, z),
        rotation_y,
    })
}
