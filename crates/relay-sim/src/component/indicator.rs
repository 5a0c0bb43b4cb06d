//! A passive lamp: one pin, four tabs, never drives.

use crate::HashMap;
use crate::context::SimContext;

use super::{ComponentBehavior, InteractAction, InteractParams};

#[derive(Debug, Default)]
pub struct Indicator;

impl ComponentBehavior for Indicator {
    fn sim_start(&self, _ctx: &SimContext) {}

    fn simulate_logic(&self, _ctx: &SimContext) {
        // Purely reads its pin through `visual_state`; nothing to drive.
    }

    fn sim_stop(&self, _ctx: &SimContext) {}

    fn interact(&self, _action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        false
    }

    fn visual_state(&self, ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        let mut fields = HashMap::default();
        let on = ctx.resolved_pin_state(ctx.pin(0)).is_high();
        fields.insert(
            "indicator_state".to_string(),
            serde_json::Value::String(if on { "ON" } else { "OFF" }.to_string()),
        );
        fields
    }
}
