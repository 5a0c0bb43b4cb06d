//! L1-L4 arena: the static topology of one engine instance.
//!
//! Built once at load time and not structurally mutated while a simulation
//! runs (the spec's "topology is static except for bridge edges" rule) — so
//! every table here can be read concurrently through a shared `&World`
//! while individual records' interior-mutable fields (pin state, component
//! internals) are still safely written from worker threads.

use slotmap::SlotMap;

use crate::HashMap;
use crate::component::ComponentRecord;
use crate::ids::{ComponentId, JunctionId, PageId, PinId, TabId, WireId};
use crate::model::{Document, Page, Pin, Tab, Wire};
use crate::model::wire::Junction;
use crate::state::State;

#[derive(Debug, Default)]
pub struct World {
    pub tabs: SlotMap<TabId, Tab>,
    pub pins: SlotMap<PinId, Pin>,
    pub wires: SlotMap<WireId, Wire>,
    pub junctions: SlotMap<JunctionId, Junction>,
    pub pages: SlotMap<PageId, Page>,
    pub components: SlotMap<ComponentId, ComponentRecord>,
    pub document: Document,
    /// `tab_id string (from the loaded document) -> TabId`, kept around only
    /// for diagnostics (error messages can name the original id).
    pub tab_source_ids: HashMap<TabId, String>,
    /// The document's own `component_id` strings, for hosts that address
    /// components the way SPEC_FULL.md's wire format does (GUI events
    /// reference a component by its authored id, never by the arena key).
    pub component_source_ids: HashMap<ComponentId, String>,
    pub component_ids_by_source: HashMap<String, ComponentId>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tab_state(&self, tab: TabId) -> State {
        let pin = self.tabs[tab].pin;
        self.pins[pin].effective_state()
    }

    pub fn tab_owner_component(&self, tab: TabId) -> Option<ComponentId> {
        let pin_id = self.tabs.get(tab)?.pin;
        self.pins.get(pin_id).map(|p| p.component)
    }

    pub fn pin_owner_component(&self, pin: PinId) -> Option<ComponentId> {
        self.pins.get(pin).map(|p| p.component)
    }

    pub fn component_by_source_id(&self, source_id: &str) -> Option<ComponentId> {
        self.component_ids_by_source.get(source_id).copied()
    }
}
