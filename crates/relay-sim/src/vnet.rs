//! L5: VNET — the equivalence class of electrically-connected tabs on one
//! page, plus the link names and bridge ids that make it a transitive
//! electrical node together with other VNETs.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;
use slotmap::SlotMap;

use crate::HashSet;
use crate::ids::{BridgeId, PageId, TabId, VnetId};
use crate::state::State;

/// The arena of all VNETs in one engine instance.
pub type VnetTable = SlotMap<VnetId, Vnet>;

/// One VNET's mutable membership/state, behind its own lock.
///
/// Per SPEC_FULL.md §5, readers (the evaluator) acquire, read, and release —
/// they never hold a VNET lock across a call into another VNET's lock
/// except by going through the id (drop-then-reacquire), which is exactly
/// what [`crate::evaluator::VnetEvaluator`] does.
#[derive(Debug)]
pub struct Vnet {
    /// Absent once a link has merged this VNET's identity across pages.
    pub page_id: Option<PageId>,
    inner: RwLock<Inner>,
    dirty: AtomicBool,
}

#[derive(Debug, Default)]
struct Inner {
    tabs: HashSet<TabId>,
    link_names: HashSet<String>,
    bridges: HashSet<BridgeId>,
    state: State,
}

impl Vnet {
    pub fn new(page_id: Option<PageId>, tabs: HashSet<TabId>) -> Self {
        Self {
            page_id,
            inner: RwLock::new(Inner {
                tabs,
                ..Default::default()
            }),
            // Bootstrapping: every VNET starts dirty so the first pass
            // computes from scratch (§4.5, §4.7 step 3).
            dirty: AtomicBool::new(true),
        }
    }

    pub fn tabs(&self) -> Vec<TabId> {
        self.inner.read().tabs.iter().copied().collect()
    }

    pub fn contains_tab(&self, tab: TabId) -> bool {
        self.inner.read().tabs.contains(&tab)
    }

    pub fn link_names(&self) -> Vec<String> {
        self.inner.read().link_names.iter().cloned().collect()
    }

    pub fn bridge_ids(&self) -> Vec<BridgeId> {
        self.inner.read().bridges.iter().copied().collect()
    }

    pub fn state(&self) -> State {
        self.inner.read().state
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::Release);
    }

    /// Add a link name, marking dirty per the VNET dirty invariant.
    pub fn add_link_name(&self, name: String) {
        let mut inner = self.inner.write();
        if inner.link_names.insert(name) {
            drop(inner);
            self.mark_dirty();
        }
    }

    pub fn remove_link_name(&self, name: &str) {
        let mut inner = self.inner.write();
        if inner.link_names.remove(name) {
            drop(inner);
            self.mark_dirty();
        }
    }

    pub fn add_bridge(&self, id: BridgeId) {
        let mut inner = self.inner.write();
        if inner.bridges.insert(id) {
            drop(inner);
            self.mark_dirty();
        }
    }

    pub fn remove_bridge(&self, id: BridgeId) {
        let mut inner = self.inner.write();
        if inner.bridges.remove(&id) {
            drop(inner);
            self.mark_dirty();
        }
    }

    /// Explicitly set the resolved state (used by the propagator). Always
    /// marks dirty per the invariant that an explicit state write dirties
    /// the VNET — the engine clears it again immediately after evaluating
    /// from this same write, so in practice this only matters for callers
    /// outside the normal evaluate/propagate cycle (tests, interactive
    /// single-stepping).
    pub fn set_state(&self, new_state: State) {
        let mut inner = self.inner.write();
        inner.state = new_state;
        drop(inner);
        self.mark_dirty();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_vnet_is_dirty() {
        let v = Vnet::new(None, HashSet::default());
        assert!(v.is_dirty());
    }

    #[test]
    fn empty_tabs_vnet_has_no_members() {
        let v = Vnet::new(None, HashSet::default());
        assert!(v.tabs().is_empty());
    }

    #[test]
    fn link_name_add_remove_marks_dirty() {
        let v = Vnet::new(None, HashSet::default());
        v.clear_dirty();
        assert!(!v.is_dirty());
        v.add_link_name("SIGNAL_A".to_string());
        assert!(v.is_dirty());
        v.clear_dirty();
        v.remove_link_name("SIGNAL_A");
        assert!(v.is_dirty());
    }
}
