//! Shared fixed-point loop for both engine variants (SPEC_FULL.md §4.7/§4.8).
//! The single-threaded and pooled engines differ only in whether
//! `EngineCore` was built with a `rayon::ThreadPool` attached — the loop
//! body, state machine, and statistics are identical either way, which is
//! the spec's explicit "single/pooled split must not affect functional
//! outcomes, only timing" requirement.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;

use crate::HashMap;
use crate::bridge::BridgeManager;
use crate::component::InteractParams;
use crate::context::{EngineHandles, SimContext, TabVnetIndex, build_tab_vnet_index};
use crate::coordinator::{UpdateCoordinator, VnetComponentIndex, build_vnet_component_index};
use crate::dirty::DirtyFlagManager;
use crate::error::EngineError;
use crate::evaluator::VnetEvaluator;
use crate::ids::{ComponentId, VnetId};
use crate::link_resolver::{self, LinkIndex};
use crate::propagator::StatePropagator;
use crate::state::State;
use crate::timer::TimerService;
use crate::vnet::VnetTable;
use crate::vnet_builder;
use crate::world::World;

use super::config::EngineConfig;
use super::stats::RunStatistics;
use super::state::EngineState;

pub struct EngineCore {
    pub handles: EngineHandles,
    pub link_index: LinkIndex,
    pub vnet_component_index: VnetComponentIndex,
    pub coordinator: UpdateCoordinator,
    pub config: EngineConfig,
    pub state: EngineState,
    pub stop_requested: AtomicBool,
    pub pool: Option<rayon::ThreadPool>,
}

impl EngineCore {
    pub fn build(world: World, config: EngineConfig, pool: Option<rayon::ThreadPool>) -> Result<Self, EngineError> {
        let world = Arc::new(world);
        let mut vnets = VnetTable::with_key();
        vnet_builder::build_all(&world, &mut vnets);

        let tab_vnet_index: TabVnetIndex = build_tab_vnet_index(&vnets);
        let vnets = Arc::new(vnets);

        let resolve_result = link_resolver::resolve(&world, &vnets, |tab| tab_vnet_index.get(&tab).copied())?;
        for warning in &resolve_result.warnings {
            log::warn!("link resolution: {warning:?}");
        }

        let vnet_component_index = build_vnet_component_index(&vnets, |tab| world.tab_owner_component(tab));

        let handles = EngineHandles {
            world,
            vnets,
            bridges: Arc::new(BridgeManager::new()),
            dirty: Arc::new(DirtyFlagManager::new()),
            tab_vnet_index: Arc::new(tab_vnet_index),
            timers: Arc::new(TimerService::new()),
        };

        Ok(Self {
            handles,
            link_index: resolve_result.index,
            vnet_component_index,
            coordinator: UpdateCoordinator::new(),
            config,
            state: EngineState::Stopped,
            stop_requested: AtomicBool::new(false),
            pool,
        })
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::SeqCst);
    }

    fn ctx_for(&self, component_id: ComponentId) -> SimContext<'_> {
        SimContext {
            component_id,
            handles: &self.handles,
        }
    }

    /// SPEC_FULL.md §4.7 `initialize()`.
    pub fn initialize(&mut self) -> Result<(), EngineError> {
        log::info!("engine initializing ({} components, {} vnets)", self.handles.world.components.len(), self.handles.vnets.len());
        self.set_state(EngineState::Initializing);
        self.stop_requested.store(false, Ordering::SeqCst);
        self.coordinator.reset();

        let component_ids: Vec<ComponentId> = self.handles.world.components.keys().collect();
        for component_id in component_ids {
            self.call_sim_start(component_id);
        }
        self.handles.dirty.mark_all_dirty(&self.handles.vnets);
        self.set_state(EngineState::Stopped);
        Ok(())
    }

    fn set_state(&mut self, state: EngineState) {
        log::debug!("engine state: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    fn call_sim_start(&self, component_id: ComponentId) {
        let ctx = self.ctx_for(component_id);
        let kind = &self.handles.world.components[component_id].kind;
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| kind.sim_start(&ctx))) {
            log::error!("component {component_id:?} panicked in sim_start: {}", describe_panic(&panic));
        }
    }

    fn call_sim_stop(&self, component_id: ComponentId) {
        let ctx = self.ctx_for(component_id);
        let kind = &self.handles.world.components[component_id].kind;
        if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| kind.sim_stop(&ctx))) {
            log::error!("component {component_id:?} panicked in sim_stop: {}", describe_panic(&panic));
        }
    }

    /// SPEC_FULL.md §4.7 `run()` main loop.
    pub fn run(&mut self) -> Result<RunStatistics, EngineError> {
        self.set_state(EngineState::Running);
        let start = Instant::now();
        let mut stats = RunStatistics::default();

        loop {
            let dirty_ids: Vec<VnetId> = self.handles.dirty.get_dirty().into_iter().collect();
            log::trace!("iteration {}: {} dirty vnets", stats.iterations, dirty_ids.len());
            if dirty_ids.is_empty() {
                self.set_state(EngineState::Stable);
                stats.stable = true;
                stats.time_to_stability = Some(start.elapsed());
                break;
            }

            let evaluated = self.evaluate(&dirty_ids);
            stats.vnets_processed_parallel += if self.pool.is_some() { evaluated.len() as u64 } else { 0 };

            self.propagate(&evaluated);

            let pending_count = self.coordinator.start_updates();
            let pending: Vec<ComponentId> = self.coordinator.pending_components();
            let (updated, errors) = self.run_components(&pending);
            stats.components_updated += updated;
            stats.component_errors += errors;
            stats.components_processed_parallel += if self.pool.is_some() { pending_count as u64 } else { 0 };

            if !self.coordinator.wait_until_complete(self.config.component_barrier_timeout) {
                self.set_state(EngineState::Error);
                log::error!("worker-pool phase barrier timed out after {:?}", self.config.component_barrier_timeout);
                return Err(EngineError::InternalBarrierTimeout(self.config.component_barrier_timeout));
            }

            stats.iterations += 1;
            if stats.iterations >= self.config.max_iterations {
                self.set_state(EngineState::Oscillating);
                log::warn!("oscillation: {} iterations without stabilizing", stats.iterations);
                stats.max_iterations_reached = true;
                break;
            }
            if start.elapsed() >= self.config.timeout {
                self.set_state(EngineState::Timeout);
                log::warn!("timeout: {:?} elapsed without stabilizing", start.elapsed());
                stats.timeout_reached = true;
                break;
            }
            if self.stop_requested.load(Ordering::SeqCst) {
                self.set_state(EngineState::Stopped);
                break;
            }
        }

        stats.total_time = start.elapsed();
        Ok(stats)
    }

    fn evaluate(&self, dirty_ids: &[VnetId]) -> HashMap<VnetId, State> {
        let evaluator = VnetEvaluator::new(&self.handles.world, &self.handles.vnets, &self.handles.bridges, &self.link_index);
        match &self.pool {
            Some(pool) => pool.install(|| {
                dirty_ids
                    .par_iter()
                    .map(|&id| (id, evaluator.eval(id)))
                    .collect::<HashMap<VnetId, State>>()
            }),
            None => evaluator.eval_many(dirty_ids.iter().copied()),
        }
    }

    fn propagate(&self, evaluated: &HashMap<VnetId, State>) {
        let propagator = StatePropagator::new(
            &self.handles.world,
            &self.handles.vnets,
            &self.handles.dirty,
            &self.coordinator,
            &self.vnet_component_index,
        );
        let changed: Vec<VnetId> = match &self.pool {
            Some(pool) => pool.install(|| {
                evaluated
                    .par_iter()
                    .filter(|(&id, &state)| propagator.propagate_one(id, state))
                    .map(|(&id, _)| id)
                    .collect()
            }),
            None => propagator.propagate_many(evaluated),
        };
        self.fan_out_links_and_bridges(&changed);
    }

    /// A link name or a bridge is a conductor, not a VNET-membership merge
    /// (§4.2/§3 Bridge): when one side's resolved state changes, every VNET
    /// sharing that link name, and every VNET on the other end of one of
    /// its bridges, has to re-evaluate too — even though it owns none of
    /// the tabs that just changed and its own topology didn't move. A
    /// bridge created once (e.g. a `SubCircuit`'s pin-to-Link bridge at
    /// `sim_start`) would otherwise never see a driven state that changes
    /// on the far side afterward: nothing re-marks it dirty, so it would
    /// sit stale at whatever it last evaluated to. Marking it dirty here
    /// (rather than writing the new state across directly, as §4.4 step 4
    /// also allows) reuses the evaluator's own bridge traversal on the next
    /// pass, so the two mechanisms never disagree about what a bridge's
    /// far side currently resolves to.
    fn fan_out_links_and_bridges(&self, changed: &[VnetId]) {
        for &vnet_id in changed {
            let Some(vnet) = self.handles.vnets.get(vnet_id) else {
                continue;
            };
            for name in vnet.link_names() {
                let Some(peers) = self.link_index.get(&name) else {
                    continue;
                };
                for &peer in peers {
                    if peer != vnet_id {
                        self.handles.dirty.mark_dirty(&self.handles.vnets, peer);
                    }
                }
            }
            for bridge_id in vnet.bridge_ids() {
                let Some(bridge) = self.handles.bridges.get(bridge_id) else {
                    continue;
                };
                if let Some(peer) = bridge.other(vnet_id) {
                    self.handles.dirty.mark_dirty(&self.handles.vnets, peer);
                }
            }
        }
    }

    fn run_components(&self, pending: &[ComponentId]) -> (u64, u64) {
        let run_one = |&component_id: &ComponentId| -> bool {
            let ctx = self.ctx_for(component_id);
            let ok = {
                let kind = &self.handles.world.components[component_id].kind;
                panic::catch_unwind(AssertUnwindSafe(|| kind.simulate_logic(&ctx))).is_ok()
            };
            self.coordinator.mark_complete(component_id);
            ok
        };

        let results: Vec<bool> = match &self.pool {
            Some(pool) => pool.install(|| pending.par_iter().map(run_one).collect()),
            None => pending.iter().map(run_one).collect(),
        };
        let errors = results.iter().filter(|ok| !**ok).count() as u64;
        for (component_id, ok) in pending.iter().zip(&results) {
            if !ok {
                log::error!("component {component_id:?} panicked in simulate_logic");
            }
        }
        (results.len() as u64, errors)
    }

    fn resolve(&self, source_id: &str) -> Result<ComponentId, EngineError> {
        self.handles
            .world
            .component_by_source_id(source_id)
            .ok_or(EngineError::UnknownComponent)
    }

    /// SPEC_FULL.md §6: `interact` "causes an immediate pin state change" —
    /// it doesn't just flip the component's internal flag and wait for a
    /// dirty VNET to queue it later, because nothing would dirty that VNET
    /// in the first place. Re-running `simulate_logic` right here, on the
    /// caller's thread, is what actually drives the pin and (via
    /// `ctx.set_pin`) marks the owning VNET dirty so the next `run()` call
    /// picks up the change.
    pub fn interact(&self, source_id: &str, action: crate::component::InteractAction, params: &InteractParams) -> Result<bool, EngineError> {
        let component_id = self.resolve(source_id)?;
        let ctx = self.ctx_for(component_id);
        let kind = &self.handles.world.components[component_id].kind;
        let changed = kind.interact(action, params, &ctx);
        if changed {
            if let Err(panic) = panic::catch_unwind(AssertUnwindSafe(|| kind.simulate_logic(&ctx))) {
                log::error!("component {component_id:?} panicked in simulate_logic (via interact): {}", describe_panic(&panic));
            }
        }
        Ok(changed)
    }

    pub fn visual_state(&self, source_id: &str) -> Option<crate::visual::VisualState> {
        let component_id = self.handles.world.component_by_source_id(source_id)?;
        let record = self.handles.world.components.get(component_id)?;
        let ctx = self.ctx_for(component_id);
        Some(record.get_visual_state(&ctx))
    }

    /// SPEC_FULL.md §4.9/§4.12: wait briefly for in-flight delayed
    /// transitions, then call `sim_stop` on every component and drop the
    /// timer thread.
    pub fn shutdown(&mut self) {
        log::info!("engine shutting down");
        self.request_stop();
        std::thread::sleep(std::time::Duration::from_millis(50));
        let component_ids: Vec<ComponentId> = self.handles.world.components.keys().collect();
        for component_id in component_ids {
            self.call_sim_stop(component_id);
        }
        self.handles.timers.shutdown();
        self.set_state(EngineState::Stopped);
    }
}

fn describe_panic(payload: &Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
