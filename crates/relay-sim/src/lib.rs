mod bridge;
mod component;
mod context;
mod coordinator;
mod dirty;
mod engine;
mod error;
mod evaluator;
mod ids;
mod link_resolver;
mod model;
mod propagator;
mod schema;
mod state;
mod timer;
mod visual;
mod vnet;
mod vnet_builder;
mod world;

pub(crate) use fxhash::FxHashMap as HashMap;
pub(crate) use fxhash::FxHashSet as HashSet;

pub use component::{ComponentKind, InteractAction, InteractParams, Rotation};
pub use engine::{Engine, EngineConfig, EngineState, PooledEngine, RunStatistics, SingleThreadedEngine};
pub use error::{ConfigurationError, EngineError};
pub use ids::{BridgeId, ComponentId, JunctionId, PageId, PinId, TabId, VnetId, WireId};
pub use schema::load_document;
pub use state::State;
pub use visual::VisualState;
pub use world::World;
