//! L7: UpdateCoordinator — which components must run `simulate_logic` this
//! pass, duplicate suppression, and pass-completion synchronization.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

use crate::HashSet;
use crate::ids::{ComponentId, VnetId};
use crate::vnet::VnetTable;

#[derive(Debug, Default)]
struct State {
    /// Components queued for the *next* pass.
    queued: HashSet<ComponentId>,
    /// Components snapshotted into the *current* pass by `start_updates`.
    pending: HashSet<ComponentId>,
}

/// Reverse index from a VNET to every component that owns a tab in it.
/// Built once after VNET construction (topology is static during a run —
/// bridges don't change tab membership) and handed to the coordinator by
/// the engine.
pub type VnetComponentIndex = crate::HashMap<VnetId, Vec<ComponentId>>;

#[derive(Debug, Default)]
pub struct UpdateCoordinator {
    state: Mutex<State>,
    pending_empty: Condvar,
}

impl UpdateCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: a component already queued or already snapshotted into
    /// the current pending set is not re-added until both are cleared.
    pub fn queue(&self, component: ComponentId) {
        let mut state = self.state.lock();
        if state.pending.contains(&component) {
            return;
        }
        state.queued.insert(component);
    }

    pub fn queue_for_vnet(&self, index: &VnetComponentIndex, vnet: VnetId) {
        if let Some(owners) = index.get(&vnet) {
            for &c in owners {
                self.queue(c);
            }
        }
    }

    pub fn queue_for_vnets(&self, index: &VnetComponentIndex, vnets: impl IntoIterator<Item = VnetId>) {
        for v in vnets {
            self.queue_for_vnet(index, v);
        }
    }

    /// Snapshot the queued set as the pending set for this pass. Returns its
    /// size.
    pub fn start_updates(&self) -> usize {
        let mut state = self.state.lock();
        state.pending = std::mem::take(&mut state.queued);
        state.pending.len()
    }

    pub fn pending_components(&self) -> Vec<ComponentId> {
        self.state.lock().pending.iter().copied().collect()
    }

    pub fn mark_complete(&self, component: ComponentId) {
        let mut state = self.state.lock();
        state.pending.remove(&component);
        if state.pending.is_empty() {
            self.pending_empty.notify_all();
        }
    }

    /// Block until the pending set is empty or `timeout` elapses. Returns
    /// `true` if the pending set drained, `false` on timeout.
    pub fn wait_until_complete(&self, timeout: Duration) -> bool {
        let mut state = self.state.lock();
        if state.pending.is_empty() {
            return true;
        }
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let now = std::time::Instant::now();
            if now >= deadline {
                return state.pending.is_empty();
            }
            let result = self.pending_empty.wait_for(&mut state, deadline - now);
            if state.pending.is_empty() {
                return true;
            }
            if result.timed_out() {
                return false;
            }
        }
    }

    pub fn cancel_all(&self) {
        let mut state = self.state.lock();
        state.queued.clear();
        state.pending.clear();
        self.pending_empty.notify_all();
    }

    pub fn reset(&self) {
        self.cancel_all();
    }
}

/// Build the static VNET -> owning-components index once, after VNET
/// construction, from each VNET's tab set and each tab's owning pin's
/// owning component.
pub fn build_vnet_component_index(
    vnets: &VnetTable,
    tab_owner: impl Fn(crate::ids::TabId) -> Option<ComponentId>,
) -> VnetComponentIndex {
    let mut index = VnetComponentIndex::default();
    for (vnet_id, vnet) in vnets.iter() {
        let mut owners: Vec<ComponentId> = vnet
            .tabs()
            .into_iter()
            .filter_map(&tab_owner)
            .collect();
        owners.sort_unstable();
        owners.dedup();
        index.insert(vnet_id, owners);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn fresh_component() -> ComponentId {
        let mut sm: SlotMap<ComponentId, ()> = SlotMap::with_key();
        sm.insert(())
    }

    #[test]
    fn duplicate_queue_is_suppressed_until_pass_completes() {
        let coord = UpdateCoordinator::new();
        let c = fresh_component();
        coord.queue(c);
        coord.queue(c);
        assert_eq!(coord.start_updates(), 1);
        // Already pending: queueing again should not re-add it to `queued`.
        coord.queue(c);
        assert_eq!(coord.pending_components(), vec![c]);
        coord.mark_complete(c);
        assert!(coord.wait_until_complete(Duration::from_millis(10)));
        // Now it can be queued again for the next pass.
        coord.queue(c);
        assert_eq!(coord.start_updates(), 1);
    }

    #[test]
    fn wait_until_complete_times_out_if_never_marked() {
        let coord = UpdateCoordinator::new();
        let c = fresh_component();
        coord.queue(c);
        coord.start_updates();
        assert!(!coord.wait_until_complete(Duration::from_millis(5)));
    }
}
