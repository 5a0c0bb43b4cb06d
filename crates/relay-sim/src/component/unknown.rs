//! Forward-compatible placeholder for a `component_type` the loader does
//! not recognize. Carries no behavior — never drives, never switches — but
//! still reports through `get_visual_state` so a GUI can render something
//! rather than fail outright (SPEC_FULL.md §6).

use crate::HashMap;
use crate::context::SimContext;

use super::{ComponentBehavior, InteractAction, InteractParams};

#[derive(Debug)]
pub struct Unknown {
    pub original_type: String,
}

impl ComponentBehavior for Unknown {
    fn sim_start(&self, _ctx: &SimContext) {}

    fn simulate_logic(&self, _ctx: &SimContext) {}

    fn sim_stop(&self, _ctx: &SimContext) {}

    fn interact(&self, _action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        false
    }

    fn visual_state(&self, _ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        let mut fields = HashMap::default();
        fields.insert(
            "original_type".to_string(),
            serde_json::Value::String(self.original_type.clone()),
        );
        fields
    }
}
