//! L7: VnetEvaluator — computes a VNET's resolved state, treating links and
//! bridges as transitive, without mutating anything.

use crate::HashSet;
use crate::bridge::BridgeManager;
use crate::ids::VnetId;
use crate::state::State;
use crate::vnet::VnetTable;
use crate::world::World;

pub struct VnetEvaluator<'a> {
    world: &'a World,
    vnets: &'a VnetTable,
    bridges: &'a BridgeManager,
    /// `link_name -> every other VNET carrying it`. Built once after
    /// `LinkResolver::resolve` and handed in here; the evaluator never
    /// mutates it.
    link_index: &'a crate::link_resolver::LinkIndex,
}

impl<'a> VnetEvaluator<'a> {
    pub fn new(
        world: &'a World,
        vnets: &'a VnetTable,
        bridges: &'a BridgeManager,
        link_index: &'a crate::link_resolver::LinkIndex,
    ) -> Self {
        Self {
            world,
            vnets,
            bridges,
            link_index,
        }
    }

    /// Pure function of the current data-model snapshot: never mutates
    /// pins, VNETs, tabs, or bridges.
    pub fn eval(&self, vnet: VnetId) -> State {
        let mut seen = HashSet::default();
        self.eval_inner(vnet, &mut seen)
    }

    fn eval_inner(&self, vnet_id: VnetId, seen: &mut HashSet<VnetId>) -> State {
        if seen.contains(&vnet_id) {
            return State::Float;
        }
        seen.insert(vnet_id);

        let Some(vnet) = self.vnets.get(vnet_id) else {
            return State::Float;
        };

        for tab in vnet.tabs() {
            if self.world.tab_state(tab).is_high() {
                return State::High;
            }
        }

        for link_name in vnet.link_names() {
            if let Some(peers) = self.link_index.get(&link_name) {
                for &other in peers {
                    if other == vnet_id {
                        continue;
                    }
                    if self.eval_inner(other, seen).is_high() {
                        return State::High;
                    }
                }
            }
        }

        for bridge_id in vnet.bridge_ids() {
            if let Some(bridge) = self.bridges.get(bridge_id) {
                if let Some(other) = bridge.other(vnet_id) {
                    if self.eval_inner(other, seen).is_high() {
                        return State::High;
                    }
                }
            }
        }

        State::Float
    }

    /// Batch form: evaluate a collection and return `{vnet_id -> state}`.
    /// This is the input handed to the propagator.
    pub fn eval_many(&self, vnets: impl IntoIterator<Item = VnetId>) -> crate::HashMap<VnetId, State> {
        vnets.into_iter().map(|id| (id, self.eval(id))).collect()
    }
}
