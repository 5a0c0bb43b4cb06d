//! SubCircuit: a composite component whose pins are derived, at load time,
//! from the `Link` components on its definition's FOOTPRINT page. On
//! `sim_start` it bridges each external pin to its corresponding internal
//! `Link`'s single tab; `simulate_logic` is a no-op because all behavior
//! lives in the instantiated internal pages, which participate in the
//! normal per-page dirty/evaluate/propagate loop like any other page
//! (grounded in `sub_circuit.py`'s `_pin_to_link_map`/bridge-per-pin
//! pattern).

use crate::HashMap;
use crate::context::SimContext;
use crate::ids::ComponentId;

use super::{ComponentBehavior, InteractAction, InteractParams};

#[derive(Debug)]
pub struct SubCircuit {
    pub definition_name: String,
    /// `pins[i]` externally bridges to the Link component at
    /// `pin_to_link[i]`'s single tab, inside this instance's private page
    /// copy. Recorded once when the instance was materialized by the
    /// loader; never mutated afterward.
    pub pin_to_link: Vec<ComponentId>,
}

impl ComponentBehavior for SubCircuit {
    fn sim_start(&self, ctx: &SimContext) {
        for (index, &link_component) in self.pin_to_link.iter().enumerate() {
            ctx.set_pin(ctx.pin(index), crate::state::State::Float);

            let Some(external_vnet) = ctx.vnet_for_pin(ctx.pin(index)) else {
                continue;
            };
            let Some(&internal_pin) = ctx.handles.world.components.get(link_component).and_then(|c| c.pins.first()) else {
                continue;
            };
            let Some(internal_vnet) = ctx.vnet_for_pin(internal_pin) else {
                continue;
            };
            if external_vnet != internal_vnet {
                let _ = ctx.create_bridge(external_vnet, internal_vnet);
            }
        }
    }

    /// All behavior lives in the instantiated internal pages' own
    /// components.
    fn simulate_logic(&self, _ctx: &SimContext) {}

    fn sim_stop(&self, ctx: &SimContext) {
        ctx.clear_own_bridges();
    }

    fn interact(&self, _action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        false
    }

    fn visual_state(&self, _ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        let mut fields = HashMap::default();
        fields.insert(
            "definition".to_string(),
            serde_json::Value::String(self.definition_name.clone()),
        );
        fields
    }
}
