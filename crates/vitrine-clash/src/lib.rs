use thiserror::Error;
use vitrine_base::ModelId;

pub mod config;
pub mod isolate;
pub mod ready;
pub mod registry;
pub mod scan;
pub mod session;
pub mod store;
pub mod transform;
pub mod visibility;

pub use config::{ModelSource, PlacementPreset, ViewerConfig};
pub use isolate::{COLLISION_FLIGHT_DURATION, IsolationDriver};
pub use ready::{LoadBarrier, ReadyState};
pub use registry::ObjectRegistry;
pub use scan::{
    CollisionEntry, CollisionScanner, EmptyReason, ScanReport, ScanStatus, ScanStrategy, scan,
};
pub use session::{ResultsListener, ViewerSession};
pub use store::CollisionResultStore;
pub use transform::{TransformRegistry, finite_or, parse_number};

#[derive(Error, Debug)]
pub enum Error {
    #[error("viewer is still loading models")]
    NotReady,
    #[error("no model loaded with id {0}")]
    UnknownModel(ModelId),
    #[error("collision entry {index} out of range ({len} entries)")]
    EntryOutOfRange { index: usize, len: usize },
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Scene(#[from] vitrine_scene::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
