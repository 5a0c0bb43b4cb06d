//! DPDT relay: seven pins (`COIL`, `COM1`, `NO1`, `NC1`, `COM2`, `NO2`,
//! `NC2`), each with four tabs. The only component with a delayed
//! transition, grounded in the teacher's `dpdt_relay.py` switching-delay
//! pattern (a lock-guarded timer thread that coalesces intermediate target
//! flips and only acts on the latest one at fire time).

use std::time::Duration;

use parking_lot::Mutex;

use crate::HashMap;
use crate::context::SimContext;
use crate::ids::BridgeId;
use crate::state::State;
use crate::timer::TimerHandle;

use super::{ComponentBehavior, ComponentKind, InteractAction, InteractParams};

pub const PIN_COIL: usize = 0;
pub const PIN_COM1: usize = 1;
pub const PIN_NO1: usize = 2;
pub const PIN_NC1: usize = 3;
pub const PIN_COM2: usize = 4;
pub const PIN_NO2: usize = 5;
pub const PIN_NC2: usize = 6;

pub const SWITCHING_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Default)]
struct RelayState {
    is_energized: bool,
    target_energized: bool,
    timer: Option<TimerHandle>,
    com1_bridge: Option<BridgeId>,
    com2_bridge: Option<BridgeId>,
}

#[derive(Debug, Default)]
pub struct DpdtRelay {
    state: Mutex<RelayState>,
}

impl DpdtRelay {
    pub fn is_energized(&self) -> bool {
        self.state.lock().is_energized
    }

    pub fn timer_active(&self) -> bool {
        self.state.lock().timer.is_some()
    }

    /// Replace `COM1<->NC1`/`COM2<->NC2` with `COM1<->NO1`/`COM2<->NO2` (or
    /// back) depending on `energize`. Called both at `sim_start` (initial
    /// de-energized bridges) and when a delayed transition fires.
    fn switch_contacts(&self, ctx: &SimContext, energize: bool) {
        ctx.clear_own_bridges();
        let com1 = ctx.vnet_for_pin(ctx.pin(PIN_COM1));
        let com2 = ctx.vnet_for_pin(ctx.pin(PIN_COM2));
        let (other1, other2) = if energize {
            (ctx.vnet_for_pin(ctx.pin(PIN_NO1)), ctx.vnet_for_pin(ctx.pin(PIN_NO2)))
        } else {
            (ctx.vnet_for_pin(ctx.pin(PIN_NC1)), ctx.vnet_for_pin(ctx.pin(PIN_NC2)))
        };

        let mut state = self.state.lock();
        state.com1_bridge = match (com1, other1) {
            (Some(a), Some(b)) if a != b => ctx.create_bridge(a, b).ok(),
            _ => None,
        };
        state.com2_bridge = match (com2, other2) {
            (Some(a), Some(b)) if a != b => ctx.create_bridge(a, b).ok(),
            _ => None,
        };
        state.is_energized = energize;
    }
}

impl ComponentBehavior for DpdtRelay {
    fn sim_start(&self, ctx: &SimContext) {
        for &index in &[PIN_COIL, PIN_COM1, PIN_NO1, PIN_NC1, PIN_COM2, PIN_NO2, PIN_NC2] {
            ctx.set_pin(ctx.pin(index), State::Float);
        }
        {
            let mut state = self.state.lock();
            state.is_energized = false;
            state.target_energized = false;
            state.timer = None;
        }
        self.switch_contacts(ctx, false);
    }

    fn simulate_logic(&self, ctx: &SimContext) {
        let target = ctx.resolved_pin_state(ctx.pin(PIN_COIL)).is_high();
        let mut state = self.state.lock();
        if target == state.target_energized {
            return;
        }
        state.target_energized = target;
        if let Some(existing) = state.timer.take() {
            existing.cancel();
        }

        let (handles, component_id) = ctx.owned_handles();
        let handle = handles.schedule(SWITCHING_DELAY, move || {
            if let Some(record) = handles.world.components.get(component_id) {
                if let ComponentKind::Relay(relay) = &record.kind {
                    relay.fire_delayed_transition(&handles, component_id);
                }
            }
        });
        state.timer = Some(handle);
    }

    fn sim_stop(&self, ctx: &SimContext) {
        let mut state = self.state.lock();
        if let Some(handle) = state.timer.take() {
            handle.cancel();
        }
        drop(state);
        ctx.clear_own_bridges();
    }

    fn interact(&self, _action: InteractAction, _params: &InteractParams, _ctx: &SimContext) -> bool {
        false
    }

    fn visual_state(&self, ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        let state = self.state.lock();
        let mut fields = HashMap::default();
        fields.insert(
            "relay_state".to_string(),
            serde_json::Value::String(if state.is_energized { "ENERGIZED" } else { "DE-ENERGIZED" }.to_string()),
        );
        fields.insert(
            "coil_state".to_string(),
            serde_json::Value::String(ctx.resolved_pin_state(ctx.pin(PIN_COIL)).as_str().to_string()),
        );
        fields.insert("timer_active".to_string(), serde_json::Value::Bool(state.timer.is_some()));
        fields
    }
}

impl DpdtRelay {
    /// Runs on the timer thread, well after the `simulate_logic` call that
    /// scheduled it has returned. Only acts if the latest recorded target
    /// still disagrees with the current contact position — an
    /// intermediate flip-and-flip-back during the delay window coalesces
    /// into a no-op, matching `dpdt_relay.py`.
    fn fire_delayed_transition(&self, handles: &crate::context::EngineHandles, component_id: crate::ids::ComponentId) {
        let target = {
            let mut state = self.state.lock();
            state.timer = None;
            if state.target_energized == state.is_energized {
                return;
            }
            state.target_energized
        };
        let ctx = SimContext {
            component_id,
            handles,
        };
        self.switch_contacts(&ctx, target);
    }
}
