//! A constant HIGH source: one pin, always driven.

use crate::HashMap;
use crate::context::SimContext;
use crate::state::State;

use super::{ComponentBehavior, InteractAction, InteractParams};

#[derive(Debug, Default)]
pub struct Vcc;

impl ComponentBehavior for Vcc {
    fn sim_start(&self, ctx: &SimContext) {
        ctx.set_pin(ctx.pin(0), State::High);
    }

    /// Re-assert HIGH every cycle in case a bridge or link perturbed it —
    /// a VCC never stops driving.
    fn simulate_logic(&self, ctx: &SimContext) {
        ctx.set_pin(ctx.pin(0), State::High);
    }

    fn sim_stop(&self, _ctx: &SimContext) {}

    fn interact(&self, _action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        false
    }

    fn visual_state(&self, _ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        let mut fields = HashMap::default();
        fields.insert("state".to_string(), serde_json::Value::String("HIGH".to_string()));
        fields
    }
}
