//! SPEC_FULL.md §4.8: the rayon-backed pooled engine. Evaluation,
//! propagation, and the `simulate_logic` phase run across a dedicated
//! `rayon::ThreadPool` sized by [`EngineConfig::worker_threads`]; the loop
//! shape and termination rules are otherwise identical to
//! [`super::single::SingleThreadedEngine`] (SPEC_FULL.md: "pooling changes
//! timing, never outcomes").

use crate::component::{InteractAction, InteractParams};
use crate::error::EngineError;
use crate::schema;
use crate::visual::VisualState;
use crate::world::World;

use super::config::EngineConfig;
use super::core::EngineCore;
use super::state::EngineState;
use super::stats::RunStatistics;

pub struct PooledEngine {
    core: EngineCore,
}

impl PooledEngine {
    pub fn from_world(world: World, config: EngineConfig) -> Result<Self, EngineError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.worker_threads.max(1))
            .thread_name(|i| format!("relay-sim-worker-{i}"))
            .build()
            .map_err(|e| EngineError::InvalidState(format!("failed to build worker pool: {e}")))?;
        let core = EngineCore::build(world, config, Some(pool))?;
        Ok(Self { core })
    }

    pub fn load(json: &str, config: EngineConfig) -> Result<Self, EngineError> {
        let world = schema::load_document(json)?;
        Self::from_world(world, config)
    }

    pub fn state(&self) -> EngineState {
        self.core.state()
    }

    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.core.initialize()
    }

    pub fn run(&mut self) -> Result<RunStatistics, EngineError> {
        self.core.run()
    }

    pub fn stop(&self) {
        self.core.request_stop();
    }

    pub fn shutdown(&mut self) {
        self.core.shutdown();
    }

    pub fn interact(&self, component_id: &str, action: InteractAction, params: &InteractParams) -> Result<bool, EngineError> {
        self.core.interact(component_id, action, params)
    }

    pub fn visual_state(&self, component_id: &str) -> Option<VisualState> {
        self.core.visual_state(component_id)
    }
}
