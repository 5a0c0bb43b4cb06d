//! A manually-operated switch: one pin, four tabs, two operating modes.

use parking_lot::Mutex;

use crate::HashMap;
use crate::context::SimContext;
use crate::state::State;

use super::{ComponentBehavior, InteractAction, InteractParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchMode {
    Toggle,
    Pushbutton,
}

impl SwitchMode {
    pub fn parse(s: &str) -> Self {
        match s {
            "pushbutton" => SwitchMode::Pushbutton,
            _ => SwitchMode::Toggle,
        }
    }
}

#[derive(Debug)]
pub struct Switch {
    pub mode: SwitchMode,
    is_on: Mutex<bool>,
}

impl Switch {
    pub fn new(mode: SwitchMode) -> Self {
        Self {
            mode,
            is_on: Mutex::new(false),
        }
    }

    pub fn is_on(&self) -> bool {
        *self.is_on.lock()
    }
}

impl ComponentBehavior for Switch {
    fn sim_start(&self, ctx: &SimContext) {
        ctx.set_pin(ctx.pin(0), State::Float);
    }

    fn simulate_logic(&self, ctx: &SimContext) {
        let state = if self.is_on() { State::High } else { State::Float };
        ctx.set_pin(ctx.pin(0), state);
    }

    fn sim_stop(&self, _ctx: &SimContext) {}

    fn interact(&self, action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        let mut is_on = self.is_on.lock();
        match (self.mode, action) {
            (SwitchMode::Toggle, InteractAction::Toggle | InteractAction::Click) => {
                *is_on = !*is_on;
                true
            }
            (SwitchMode::Pushbutton, InteractAction::Press) => {
                *is_on = true;
                true
            }
            (SwitchMode::Pushbutton, InteractAction::Release) => {
                *is_on = false;
                true
            }
            _ => false,
        }
    }

    fn visual_state(&self, _ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        let mut fields = HashMap::default();
        fields.insert(
            "switch_state".to_string(),
            serde_json::Value::String(if self.is_on() { "ON" } else { "OFF" }.to_string()),
        );
        fields.insert(
            "mode".to_string(),
            serde_json::Value::String(
                match self.mode {
                    SwitchMode::Toggle => "toggle",
                    SwitchMode::Pushbutton => "pushbutton",
                }
                .to_string(),
            ),
        );
        fields
    }
}
