//! Link: a single-tab, single-pin passive node used inside a sub-circuit
//! definition's FOOTPRINT page as the internal endpoint a `SubCircuit`
//! instance bridges its external pins to (SPEC_FULL.md §3 SubCircuit
//! component, §4.10).

use crate::HashMap;
use crate::context::SimContext;

use super::{ComponentBehavior, InteractAction, InteractParams};

#[derive(Debug, Default)]
pub struct Link;

impl ComponentBehavior for Link {
    fn sim_start(&self, _ctx: &SimContext) {}

    fn simulate_logic(&self, _ctx: &SimContext) {}

    fn sim_stop(&self, _ctx: &SimContext) {}

    fn interact(&self, _action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        false
    }

    fn visual_state(&self, _ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        HashMap::default()
    }
}
