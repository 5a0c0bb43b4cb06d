//! L7: StatePropagator — applies a freshly-evaluated VNET's resolved
//! state, clears the VNET's dirty flag, and queues the owning components
//! for the next `simulate_logic` pass.

use crate::HashMap;
use crate::coordinator::{UpdateCoordinator, VnetComponentIndex};
use crate::dirty::DirtyFlagManager;
use crate::ids::VnetId;
use crate::state::State;
use crate::vnet::VnetTable;
use crate::world::World;

pub struct StatePropagator<'a> {
    world: &'a World,
    vnets: &'a VnetTable,
    dirty: &'a DirtyFlagManager,
    coordinator: &'a UpdateCoordinator,
    component_index: &'a VnetComponentIndex,
}

impl<'a> StatePropagator<'a> {
    pub fn new(
        world: &'a World,
        vnets: &'a VnetTable,
        dirty: &'a DirtyFlagManager,
        coordinator: &'a UpdateCoordinator,
        component_index: &'a VnetComponentIndex,
    ) -> Self {
        Self {
            world,
            vnets,
            dirty,
            coordinator,
            component_index,
        }
    }

    /// Write `new_state` onto the VNET, clear its dirty flag, and queue
    /// every owning component — but only if the resolved state actually
    /// changed; a no-op write must never re-dirty or re-queue anything
    /// (SPEC_FULL.md invariant: propagate is idempotent on an unchanged
    /// value).
    ///
    /// This deliberately does *not* write `new_state` onto the tabs' own
    /// pins. A pin's `state` field is what that pin's owning component
    /// itself is asserting (a VCC's constant HIGH, a switch's on/off) —
    /// the evaluator reads it back as a *source* for the net. Writing the
    /// net's resolved state onto every pin it touches, including passive
    /// ones that never drive anything (an indicator, a relay's coil),
    /// would turn that passive pin into a phantom source on the very next
    /// pass: once a net resolved HIGH once, the passive pin would stay
    /// latched HIGH even after every real driver went FLOAT, since nothing
    /// ever asserts FLOAT onto it again. A passive reader has to consult
    /// the net's resolved state directly (`SimContext::resolved_pin_state`)
    /// instead of its own pin.
    pub fn propagate_one(&self, vnet: VnetId, new_state: State) -> bool {
        let Some(v) = self.vnets.get(vnet) else {
            return false;
        };
        let changed = v.state() != new_state;
        v.set_state(new_state);
        self.dirty.clear_dirty(self.vnets, vnet);
        if changed {
            self.coordinator.queue_for_vnet(self.component_index, vnet);
        }
        changed
    }

    /// Propagate every evaluated state, returning the VNETs whose resolved
    /// state actually changed.
    pub fn propagate_many(&self, states: &HashMap<VnetId, State>) -> Vec<VnetId> {
        states
            .iter()
            .filter(|(&vnet, &state)| self.propagate_one(vnet, state))
            .map(|(&vnet, _)| vnet)
            .collect()
    }

    pub fn world(&self) -> &World {
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HashSet;
    use crate::vnet::Vnet;

    #[test]
    fn unchanged_state_clears_dirty_without_queueing() {
        let world = World::new();
        let mut vnets = VnetTable::with_key();
        let id = vnets.insert(Vnet::new(None, HashSet::default()));
        vnets[id].set_state(State::Float);
        vnets[id].clear_dirty();
        vnets[id].mark_dirty();

        let dirty = DirtyFlagManager::new();
        dirty.mark_dirty(&vnets, id);
        let coordinator = UpdateCoordinator::new();
        let index = VnetComponentIndex::default();
        let prop = StatePropagator::new(&world, &vnets, &dirty, &coordinator, &index);

        let changed = prop.propagate_one(id, State::Float);
        assert!(!changed);
        assert!(!dirty.is_dirty(id));
        assert!(coordinator.pending_components().is_empty());
        assert_eq!(coordinator.start_updates(), 0);
    }

    /// Regression for the passive-pin latch: propagating HIGH then FLOAT
    /// onto the same VNET must never leave a tab's own pin holding a
    /// stale HIGH, since the evaluator reads that field back as a source.
    #[test]
    fn propagate_one_never_writes_tab_pins() {
        let mut world = World::new();
        let mut sm: slotmap::SlotMap<crate::ids::ComponentId, ()> = slotmap::SlotMap::with_key();
        let owner = sm.insert(());
        let pin = world.pins.insert(crate::model::Pin::new(owner));
        let tab = world.tabs.insert(crate::model::Tab::new(pin, (0.0, 0.0)));
        world.pins[pin].tabs.push(tab);

        let mut vnets = VnetTable::with_key();
        let mut members = HashSet::default();
        members.insert(tab);
        let id = vnets.insert(Vnet::new(None, members));

        let dirty = DirtyFlagManager::new();
        let coordinator = UpdateCoordinator::new();
        let index = VnetComponentIndex::default();
        let prop = StatePropagator::new(&world, &vnets, &dirty, &coordinator, &index);

        prop.propagate_one(id, State::High);
        assert_eq!(world.pins[pin].state(), State::Float, "propagate must not write resolved state onto a passive pin");

        prop.propagate_one(id, State::Float);
        assert_eq!(world.pins[pin].state(), State::Float);
        assert_eq!(vnets[id].state(), State::Float);
    }

    #[test]
    fn changed_state_queues_owning_components() {
        let world = World::new();
        let mut vnets = VnetTable::with_key();
        let id = vnets.insert(Vnet::new(None, HashSet::default()));
        vnets[id].set_state(State::Float);

        let dirty = DirtyFlagManager::new();
        let coordinator = UpdateCoordinator::new();
        let mut sm: slotmap::SlotMap<crate::ids::ComponentId, ()> = slotmap::SlotMap::with_key();
        let comp = sm.insert(());
        let mut index = VnetComponentIndex::default();
        index.insert(id, vec![comp]);

        let prop = StatePropagator::new(&world, &vnets, &dirty, &coordinator, &index);
        let changed = prop.propagate_one(id, State::High);
        assert!(changed);
        assert_eq!(coordinator.start_updates(), 1);
    }
}
