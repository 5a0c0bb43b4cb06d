//! L3: Component — the behavior carrier.
//!
//! Dynamic dispatch is replaced by a tagged variant ([`ComponentKind`])
//! whose payload carries per-variant state, plus a common "vtable" of the
//! four lifecycle operations implemented as a match over the variant — the
//! sum-type + capabilities approach from SPEC_FULL.md §9 Design Notes,
//! generalizing teacher's own preference for small `Copy`/`Clone` tagged
//! enums over trait objects.

pub mod indicator;
pub mod link;
pub mod relay;
pub mod subcircuit;
pub mod switch;
pub mod unknown;
pub mod vcc;

use crate::HashMap;
use crate::context::SimContext;
use crate::ids::{ComponentId, PageId, PinId};
use crate::visual::VisualState;

pub use indicator::Indicator;
pub use link::Link;
pub use relay::DpdtRelay;
pub use subcircuit::SubCircuit;
pub use switch::Switch;
pub use unknown::Unknown;
pub use vcc::Vcc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    pub fn from_degrees(deg: i32) -> Option<Self> {
        match deg.rem_euclid(360) {
            0 => Some(Rotation::Deg0),
            90 => Some(Rotation::Deg90),
            180 => Some(Rotation::Deg180),
            270 => Some(Rotation::Deg270),
            _ => None,
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }
}

/// Action names accepted by [`ComponentKind::interact`]. Unrecognized
/// actions for a given component are simply ignored (return `false`), never
/// an error — `interact` is a best-effort side channel from the GUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractAction {
    Toggle,
    Click,
    Press,
    Release,
}

impl InteractAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "toggle" => Some(InteractAction::Toggle),
            "click" => Some(InteractAction::Click),
            "press" => Some(InteractAction::Press),
            "release" => Some(InteractAction::Release),
            _ => None,
        }
    }
}

pub type InteractParams = HashMap<String, serde_json::Value>;

/// Per-variant component behavior, carried inline rather than through a
/// vtable pointer.
#[derive(Debug)]
pub enum ComponentKind {
    Vcc(Vcc),
    Switch(Switch),
    Indicator(Indicator),
    Relay(DpdtRelay),
    SubCircuit(SubCircuit),
    Link(Link),
    Unknown(Unknown),
}

impl ComponentKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            ComponentKind::Vcc(_) => "VCC",
            ComponentKind::Switch(_) => "Switch",
            ComponentKind::Indicator(_) => "Indicator",
            ComponentKind::Relay(_) => "DPDTRelay",
            ComponentKind::SubCircuit(_) => "SubCircuit",
            ComponentKind::Link(_) => "Link",
            ComponentKind::Unknown(u) => u.original_type.as_str(),
        }
    }

    pub fn sim_start(&self, ctx: &SimContext) {
        match self {
            ComponentKind::Vcc(c) => c.sim_start(ctx),
            ComponentKind::Switch(c) => c.sim_start(ctx),
            ComponentKind::Indicator(c) => c.sim_start(ctx),
            ComponentKind::Relay(c) => c.sim_start(ctx),
            ComponentKind::SubCircuit(c) => c.sim_start(ctx),
            ComponentKind::Link(c) => c.sim_start(ctx),
            ComponentKind::Unknown(c) => c.sim_start(ctx),
        }
    }

    pub fn simulate_logic(&self, ctx: &SimContext) {
        match self {
            ComponentKind::Vcc(c) => c.simulate_logic(ctx),
            ComponentKind::Switch(c) => c.simulate_logic(ctx),
            ComponentKind::Indicator(c) => c.simulate_logic(ctx),
            ComponentKind::Relay(c) => c.simulate_logic(ctx),
            ComponentKind::SubCircuit(c) => c.simulate_logic(ctx),
            ComponentKind::Link(c) => c.simulate_logic(ctx),
            ComponentKind::Unknown(c) => c.simulate_logic(ctx),
        }
    }

    pub fn sim_stop(&self, ctx: &SimContext) {
        match self {
            ComponentKind::Vcc(c) => c.sim_stop(ctx),
            ComponentKind::Switch(c) => c.sim_stop(ctx),
            ComponentKind::Indicator(c) => c.sim_stop(ctx),
            ComponentKind::Relay(c) => c.sim_stop(ctx),
            ComponentKind::SubCircuit(c) => c.sim_stop(ctx),
            ComponentKind::Link(c) => c.sim_stop(ctx),
            ComponentKind::Unknown(c) => c.sim_stop(ctx),
        }
    }

    pub fn interact(&self, action: InteractAction, params: &InteractParams, ctx: &SimContext) -> bool {
        match self {
            ComponentKind::Vcc(c) => c.interact(action, params, ctx),
            ComponentKind::Switch(c) => c.interact(action, params, ctx),
            ComponentKind::Indicator(c) => c.interact(action, params, ctx),
            ComponentKind::Relay(c) => c.interact(action, params, ctx),
            ComponentKind::SubCircuit(c) => c.interact(action, params, ctx),
            ComponentKind::Link(c) => c.interact(action, params, ctx),
            ComponentKind::Unknown(c) => c.interact(action, params, ctx),
        }
    }

    pub fn visual_state(&self, ctx: &SimContext) -> HashMap<String, serde_json::Value> {
        match self {
            ComponentKind::Vcc(c) => c.visual_state(ctx),
            ComponentKind::Switch(c) => c.visual_state(ctx),
            ComponentKind::Indicator(c) => c.visual_state(ctx),
            ComponentKind::Relay(c) => c.visual_state(ctx),
            ComponentKind::SubCircuit(c) => c.visual_state(ctx),
            ComponentKind::Link(c) => c.visual_state(ctx),
            ComponentKind::Unknown(c) => c.visual_state(ctx),
        }
    }
}

/// Trait giving every concrete component the same four-operation surface,
/// implemented per-variant and dispatched through [`ComponentKind`] above
/// rather than via `dyn ComponentBehavior`.
pub trait ComponentBehavior {
    fn sim_start(&self, ctx: &SimContext);
    fn simulate_logic(&self, ctx: &SimContext);
    fn sim_stop(&self, ctx: &SimContext);
    fn interact(&self, action: InteractAction, params: &InteractParams, ctx: &SimContext) -> bool;
    fn visual_state(&self, ctx: &SimContext) -> HashMap<String, serde_json::Value>;
}

/// A component: behavior carrier plus the shared attributes every
/// component has regardless of kind (SPEC_FULL.md §3).
#[derive(Debug)]
pub struct ComponentRecord {
    pub page: PageId,
    pub position: (f64, f64),
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub properties: HashMap<String, serde_json::Value>,
    pub link_name: Option<String>,
    pub pins: Vec<PinId>,
    pub kind: ComponentKind,
}

impl ComponentRecord {
    pub fn new(page: PageId, kind: ComponentKind) -> Self {
        Self {
            page,
            position: (0.0, 0.0),
            rotation: Rotation::Deg0,
            flip_horizontal: false,
            flip_vertical: false,
            properties: HashMap::default(),
            link_name: None,
            pins: Vec::new(),
            kind,
        }
    }

    /// A minimal component with no behavior and no pins, used by the
    /// loader for forward-compatible unknown component types and by unit
    /// tests that only need *some* component to own a pin/tab.
    pub fn placeholder(_id: ComponentId, page: PageId) -> Self {
        Self::new(
            page,
            ComponentKind::Unknown(Unknown {
                original_type: "Unknown".to_string(),
            }),
        )
    }

    pub fn get_visual_state(&self, ctx: &SimContext) -> VisualState {
        let mut fields = self.kind.visual_state(ctx);
        fields.insert(
            "type".to_string(),
            serde_json::Value::String(self.kind.type_name().to_string()),
        );
        fields.insert(
            "position".to_string(),
            serde_json::json!({"x": self.position.0, "y": self.position.1}),
        );
        fields.insert(
            "rotation".to_string(),
            serde_json::Value::Number(self.rotation.degrees().into()),
        );
        fields.insert(
            "properties".to_string(),
            serde_json::to_value(&self.properties).unwrap_or(serde_json::Value::Null),
        );
        let pin_states: HashMap<String, serde_json::Value> = self
            .pins
            .iter()
            .enumerate()
            .map(|(index, &pin)| (index.to_string(), serde_json::Value::String(ctx.resolved_pin_state(pin).as_str().to_string())))
            .collect();
        fields.insert(
            "pin_states".to_string(),
            serde_json::to_value(&pin_states).unwrap_or(serde_json::Value::Null),
        );
        VisualState { fields }
    }
}
