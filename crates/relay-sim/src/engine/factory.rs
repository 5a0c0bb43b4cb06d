//! SPEC_FULL.md §4.8: picks the single-threaded or pooled engine by
//! component count so small documents don't pay worker-pool setup cost and
//! large ones don't serialize unnecessarily.

use crate::error::EngineError;
use crate::world::World;

use super::config::EngineConfig;
use super::pooled::PooledEngine;
use super::single::SingleThreadedEngine;

pub enum Engine {
    Single(SingleThreadedEngine),
    Pooled(PooledEngine),
}

impl Engine {
    pub fn load(json: &str, config: EngineConfig) -> Result<Self, EngineError> {
        let world = crate::schema::load_document(json)?;
        Self::from_world(world, config)
    }

    pub fn from_world(world: World, config: EngineConfig) -> Result<Self, EngineError> {
        if world.components.len() >= config.pooled_threshold {
            Ok(Self::Pooled(PooledEngine::from_world(world, config)?))
        } else {
            Ok(Self::Single(SingleThreadedEngine::from_world(world, config)?))
        }
    }

    pub fn state(&self) -> super::state::EngineState {
        match self {
            Self::Single(e) => e.state(),
            Self::Pooled(e) => e.state(),
        }
    }

    pub fn initialize(&mut self) -> Result<(), EngineError> {
        match self {
            Self::Single(e) => e.initialize(),
            Self::Pooled(e) => e.initialize(),
        }
    }

    pub fn run(&mut self) -> Result<super::stats::RunStatistics, EngineError> {
        match self {
            Self::Single(e) => e.run(),
            Self::Pooled(e) => e.run(),
        }
    }

    pub fn stop(&self) {
        match self {
            Self::Single(e) => e.stop(),
            Self::Pooled(e) => e.stop(),
        }
    }

    pub fn shutdown(&mut self) {
        match self {
            Self::Single(e) => e.shutdown(),
            Self::Pooled(e) => e.shutdown(),
        }
    }

    pub fn interact(
        &self,
        component_id: &str,
        action: crate::component::InteractAction,
        params: &crate::component::InteractParams,
    ) -> Result<bool, EngineError> {
        match self {
            Self::Single(e) => e.interact(component_id, action, params),
            Self::Pooled(e) => e.interact(component_id, action, params),
        }
    }

    pub fn visual_state(&self, component_id: &str) -> Option<crate::visual::VisualState> {
        match self {
            Self::Single(e) => e.visual_state(component_id),
            Self::Pooled(e) => e.visual_state(component_id),
        }
    }
}
