//! L3/L7: Bridge and BridgeManager — dynamic non-directed edges between two
//! VNETs, introduced at runtime (typically by a relay).

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::HashMap;
use crate::ids::{BridgeId, ComponentId, VnetId};

#[derive(Debug, Clone, Copy)]
pub struct Bridge {
    pub vnet_a: VnetId,
    pub vnet_b: VnetId,
    pub owner_component: ComponentId,
}

impl Bridge {
    /// The VNET on the other side of this bridge from `from`.
    pub fn other(&self, from: VnetId) -> Option<VnetId> {
        if from == self.vnet_a {
            Some(self.vnet_b)
        } else if from == self.vnet_b {
            Some(self.vnet_a)
        } else {
            None
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge endpoints must be distinct VNETs, got the same VNET {0:?} twice")]
    SameVnet(VnetId),
}

/// Process-wide (per-engine) bridge table. Bridges change rarely — only on
/// relay transitions — so a single coarse lock over the id map and its two
/// secondary indexes is deliberately simple rather than per-bridge locking
/// (SPEC_FULL.md §5).
#[derive(Debug, Default)]
pub struct BridgeManager {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    bridges: SlotMap<BridgeId, Bridge>,
    by_vnet: HashMap<VnetId, Vec<BridgeId>>,
    by_owner: HashMap<ComponentId, Vec<BridgeId>>,
}

impl BridgeManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bridge between two distinct VNETs, marking both dirty.
    /// The caller is expected to mark the VNETs dirty through the
    /// [`crate::vnet::Vnet`] it already holds a reference to (done by
    /// `Engine`/component contexts that call this), consistent with the
    /// VNET dirty invariant living on the VNET itself rather than here.
    pub fn create(
        &self,
        vnet_a: VnetId,
        vnet_b: VnetId,
        owner_component: ComponentId,
    ) -> Result<BridgeId, BridgeError> {
        if vnet_a == vnet_b {
            return Err(BridgeError::SameVnet(vnet_a));
        }
        let mut inner = self.inner.lock();
        let id = inner.bridges.insert(Bridge {
            vnet_a,
            vnet_b,
            owner_component,
        });
        inner.by_vnet.entry(vnet_a).or_default().push(id);
        inner.by_vnet.entry(vnet_b).or_default().push(id);
        inner.by_owner.entry(owner_component).or_default().push(id);
        Ok(id)
    }

    pub fn get(&self, id: BridgeId) -> Option<Bridge> {
        self.inner.lock().bridges.get(id).copied()
    }

    pub fn remove(&self, id: BridgeId) -> Option<Bridge> {
        let mut inner = self.inner.lock();
        let bridge = inner.bridges.remove(id)?;
        if let Some(v) = inner.by_vnet.get_mut(&bridge.vnet_a) {
            v.retain(|b| *b != id);
        }
        if let Some(v) = inner.by_vnet.get_mut(&bridge.vnet_b) {
            v.retain(|b| *b != id);
        }
        if let Some(v) = inner.by_owner.get_mut(&bridge.owner_component) {
            v.retain(|b| *b != id);
        }
        Some(bridge)
    }

    pub fn bridges_for_vnet(&self, vnet: VnetId) -> Vec<BridgeId> {
        self.inner
            .lock()
            .by_vnet
            .get(&vnet)
            .cloned()
            .unwrap_or_default()
    }

    /// Remove every bridge owned by a component (engine-invoked teardown on
    /// `sim_stop`/component removal, or a relay re-switching). Returns the
    /// removed bridges with their ids so the caller can also detach them
    /// from the [`crate::vnet::Vnet`]s that reference them and mark those
    /// VNETs dirty.
    pub fn remove_all_for_component(&self, owner: ComponentId) -> Vec<(BridgeId, Bridge)> {
        let ids = {
            let inner = self.inner.lock();
            inner.by_owner.get(&owner).cloned().unwrap_or_default()
        };
        ids.into_iter().filter_map(|id| self.remove(id).map(|b| (id, b))).collect()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().bridges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn fresh_vnet_ids(n: usize) -> Vec<VnetId> {
        let mut sm: SlotMap<VnetId, ()> = SlotMap::with_key();
        (0..n).map(|_| sm.insert(())).collect()
    }

    fn fresh_component_id() -> ComponentId {
        let mut sm: SlotMap<ComponentId, ()> = SlotMap::with_key();
        sm.insert(())
    }

    #[test]
    fn same_vnet_bridge_is_rejected() {
        let mgr = BridgeManager::new();
        let vnets = fresh_vnet_ids(1);
        let owner = fresh_component_id();
        assert!(mgr.create(vnets[0], vnets[0], owner).is_err());
    }

    #[test]
    fn remove_all_for_component_clears_both_indexes() {
        let mgr = BridgeManager::new();
        let vnets = fresh_vnet_ids(4);
        let owner = fresh_component_id();
        let b1 = mgr.create(vnets[0], vnets[1], owner).unwrap();
        let b2 = mgr.create(vnets[2], vnets[3], owner).unwrap();
        assert_eq!(mgr.len(), 2);
        let removed = mgr.remove_all_for_component(owner);
        assert_eq!(removed.len(), 2);
        assert!(removed.iter().any(|(id, _)| *id == b1));
        assert!(removed.iter().any(|(id, _)| *id == b2));
        assert!(mgr.is_empty());
        assert!(mgr.bridges_for_vnet(vnets[0]).is_empty());
        assert!(mgr.get(b1).is_none());
        assert!(mgr.get(b2).is_none());
    }

    #[test]
    fn removing_bridge_updates_vnet_index() {
        let mgr = BridgeManager::new();
        let vnets = fresh_vnet_ids(2);
        let owner = fresh_component_id();
        let b = mgr.create(vnets[0], vnets[1], owner).unwrap();
        assert_eq!(mgr.bridges_for_vnet(vnets[0]), vec![b]);
        mgr.remove(b);
        assert!(mgr.bridges_for_vnet(vnets[0]).is_empty());
    }
}
