//! The handle a component's lifecycle methods use to touch the rest of the
//! engine. Deliberately thin: it exposes exactly the operations
//! SPEC_FULL.md §3/§4.10 lets a component perform (set its own pins,
//! create/remove bridges it owns, schedule a delayed transition, read the
//! current resolved state of a VNET it cares about) and nothing that would
//! let a component reach into another component's internals.
//!
//! `EngineHandles` carries everything a component needs behind `Arc`, so a
//! relay's delayed-switch callback — which has to run on the timer thread
//! long after the `simulate_logic` call that scheduled it returned — can
//! clone it into a `'static` closure rather than borrowing anything with a
//! call-scoped lifetime.

use std::sync::Arc;
use std::time::Duration;

use crate::HashMap;
use crate::bridge::{BridgeError, BridgeManager};
use crate::dirty::DirtyFlagManager;
use crate::ids::{BridgeId, ComponentId, PinId, TabId, VnetId};
use crate::state::State;
use crate::timer::{TimerHandle, TimerService};
use crate::vnet::VnetTable;
use crate::world::World;

/// `TabId -> VnetId`, built once after VNET construction. Tab membership in
/// a VNET never changes after `VnetBuilder` runs (only bridges do), so this
/// index is valid for the whole lifetime of an engine instance.
pub type TabVnetIndex = HashMap<TabId, VnetId>;

pub fn build_tab_vnet_index(vnets: &VnetTable) -> TabVnetIndex {
    let mut index = TabVnetIndex::default();
    for (vnet_id, vnet) in vnets.iter() {
        for tab in vnet.tabs() {
            index.insert(tab, vnet_id);
        }
    }
    index
}

/// Everything one engine instance shares across every component call and
/// every timer callback. Cheap to clone (a handful of `Arc` bumps).
pub struct EngineHandles {
    pub world: Arc<World>,
    pub vnets: Arc<VnetTable>,
    pub bridges: Arc<BridgeManager>,
    pub dirty: Arc<DirtyFlagManager>,
    pub tab_vnet_index: Arc<TabVnetIndex>,
    pub timers: Arc<TimerService>,
}

impl Clone for EngineHandles {
    fn clone(&self) -> Self {
        Self {
            world: Arc::clone(&self.world),
            vnets: Arc::clone(&self.vnets),
            bridges: Arc::clone(&self.bridges),
            dirty: Arc::clone(&self.dirty),
            tab_vnet_index: Arc::clone(&self.tab_vnet_index),
            timers: Arc::clone(&self.timers),
        }
    }
}

impl EngineHandles {
    pub fn set_pin(&self, pin: PinId, state: State) {
        let old = self.world.pins[pin].set_state(state);
        if old != state {
            self.mark_pin_vnets_dirty(pin);
        }
    }

    fn mark_pin_vnets_dirty(&self, pin: PinId) {
        for &tab in &self.world.pins[pin].tabs {
            if let Some(&vnet_id) = self.tab_vnet_index.get(&tab) {
                self.dirty.mark_dirty(&self.vnets, vnet_id);
            }
        }
    }

    pub fn vnet_for_tab(&self, tab: TabId) -> Option<VnetId> {
        self.tab_vnet_index.get(&tab).copied()
    }

    pub fn vnet_for_pin(&self, pin: PinId) -> Option<VnetId> {
        self.world.pins.get(pin)?.tabs.first().and_then(|&t| self.vnet_for_tab(t))
    }

    pub fn vnet_state(&self, vnet: VnetId) -> State {
        self.vnets.get(vnet).map(|v| v.state()).unwrap_or_default()
    }

    /// The electrical state a passive reader actually sees at `pin`: the
    /// resolved state of the VNET the pin's tabs belong to, not whatever
    /// this pin itself last asserted. A pin that never drives (an
    /// indicator, a relay's coil) has nothing meaningful in its own
    /// `state` field — its readers must consult the net instead.
    pub fn resolved_pin_state(&self, pin: PinId) -> State {
        self.vnet_for_pin(pin).map(|v| self.vnet_state(v)).unwrap_or_default()
    }

    pub fn create_bridge(&self, owner: ComponentId, a: VnetId, b: VnetId) -> Result<BridgeId, BridgeError> {
        let id = self.bridges.create(a, b, owner)?;
        if let Some(va) = self.vnets.get(a) {
            va.add_bridge(id);
        }
        if let Some(vb) = self.vnets.get(b) {
            vb.add_bridge(id);
        }
        self.dirty.mark_dirty(&self.vnets, a);
        self.dirty.mark_dirty(&self.vnets, b);
        Ok(id)
    }

    /// Remove every bridge a component currently owns (a relay
    /// re-switching, or any component tearing down on `sim_stop`).
    pub fn clear_bridges_for(&self, owner: ComponentId) {
        for (id, bridge) in self.bridges.remove_all_for_component(owner) {
            if let Some(v) = self.vnets.get(bridge.vnet_a) {
                v.remove_bridge(id);
                self.dirty.mark_dirty(&self.vnets, bridge.vnet_a);
            }
            if let Some(v) = self.vnets.get(bridge.vnet_b) {
                v.remove_bridge(id);
                self.dirty.mark_dirty(&self.vnets, bridge.vnet_b);
            }
        }
    }

    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + Send + 'static) -> TimerHandle {
        self.timers.schedule(delay, action)
    }
}

/// The view one lifecycle call sees: the shared handles plus which
/// component is currently executing.
pub struct SimContext<'a> {
    pub component_id: ComponentId,
    pub handles: &'a EngineHandles,
}

impl<'a> SimContext<'a> {
    pub fn pins(&self) -> &[PinId] {
        &self.handles.world.components[self.component_id].pins
    }

    pub fn pin(&self, index: usize) -> PinId {
        self.pins()[index]
    }

    pub fn set_pin(&self, pin: PinId, state: State) {
        self.handles.set_pin(pin, state);
    }

    pub fn vnet_for_tab(&self, tab: TabId) -> Option<VnetId> {
        self.handles.vnet_for_tab(tab)
    }

    pub fn vnet_for_pin(&self, pin: PinId) -> Option<VnetId> {
        self.handles.vnet_for_pin(pin)
    }

    pub fn vnet_state(&self, vnet: VnetId) -> State {
        self.handles.vnet_state(vnet)
    }

    pub fn resolved_pin_state(&self, pin: PinId) -> State {
        self.handles.resolved_pin_state(pin)
    }

    pub fn create_bridge(&self, a: VnetId, b: VnetId) -> Result<BridgeId, BridgeError> {
        self.handles.create_bridge(self.component_id, a, b)
    }

    pub fn clear_own_bridges(&self) {
        self.handles.clear_bridges_for(self.component_id);
    }

    pub fn schedule(&self, delay: Duration, action: impl FnOnce() + Send + 'static) -> TimerHandle {
        self.handles.schedule(delay, action)
    }

    /// A cheap clone of the shared handles plus this call's component id,
    /// for stashing into a `'static` timer callback (SPEC_FULL.md §4.12).
    pub fn owned_handles(&self) -> (EngineHandles, ComponentId) {
        (self.handles.clone(), self.component_id)
    }
}
