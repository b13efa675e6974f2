//! Scene capability contract for the viewer core.
//!
//! The rendering engine owns models, objects and their per-object flags. The
//! core never reaches into engine state directly: everything goes through
//! [`ScenePort`], and each engine provides one adapter implementing it.
//! [`MemoryScene`] is the in-process adapter used headlessly and in tests.

use thiserror::Error;
use vitrine_base::{ModelId, ObjectId};

mod camera;
mod description;
mod memory;
mod port;
mod types;

pub use camera::{CameraFlight, FlightTarget};
pub use description::{ModelDescription, ObjectDescription, SceneDescription};
pub use memory::MemoryScene;
pub use port::ScenePort;
pub use types::{MetaObject, ModelHandle, ObjectFlags};

#[derive(Error, Debug)]
pub enum Error {
    #[error("model already loaded: {0}")]
    DuplicateModel(ModelId),
    #[error("object id already in scene: {0}")]
    DuplicateObject(ObjectId),
    #[error("parent chain of object {0} loops back on itself")]
    ParentCycle(ObjectId),
    #[error(transparent)]
    Base(#[from] vitrine_base::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
