//! SPEC_FULL.md §4.7: the single-threaded engine. All work runs on the
//! calling thread; the only background thread is the shared `TimerService`
//! used for delayed transitions (SPEC_FULL.md §3 Relay).

use crate::component::{InteractAction, InteractParams};
use crate::error::EngineError;
use crate::schema;
use crate::visual::VisualState;
use crate::world::World;

use super::config::EngineConfig;
use super::core::EngineCore;
use super::state::EngineState;
use super::stats::RunStatistics;

/// Owns one loaded schematic and runs the fixed-point loop on the calling
/// thread. Appropriate for small-to-medium documents (see
/// [`EngineConfig::pooled_threshold`] and [`super::factory::make_engine`]).
pub struct SingleThreadedEngine {
    core: EngineCore,
}

impl SingleThreadedEngine {
    pub fn from_world(world: World, config: EngineConfig) -> Result<Self, EngineError> {
        let core = EngineCore::build(world, config, None)?;
        Ok(Self { core })
    }

    pub fn load(json: &str, config: EngineConfig) -> Result<Self, EngineError> {
        let world = schema::load_document(json)?;
        Self::from_world(world, config)
    }

    pub fn state(&self) -> EngineState {
        self.core.state()
    }

    /// Runs every component's `sim_start` and marks the whole design dirty
    /// so the first `run()` pass evaluates everything from scratch.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        self.core.initialize()
    }

    /// Runs the fixed-point loop until STABLE, OSCILLATING, TIMEOUT, or an
    /// external `stop()` request.
    pub fn run(&mut self) -> Result<RunStatistics, EngineError> {
        self.core.run()
    }

    /// Requests the in-progress (or next) `run()` call stop at the next
    /// iteration boundary.
    pub fn stop(&self) {
        self.core.request_stop();
    }

    /// Runs every component's `sim_stop`, cancels in-flight delayed
    /// transitions, and tears down the timer thread. The engine cannot be
    /// restarted after this.
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
