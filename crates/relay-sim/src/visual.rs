//! Visual state snapshot returned to callers (SPEC_FULL.md §4.9 / §6 API).

use crate::HashMap;

/// Free-form per-component visual state, serializable for a GUI layer.
/// Field sets differ per component kind (a switch reports `closed`, a
/// relay reports `energized`/`timer_active`, ...), so this stays a map
/// rather than a fixed struct.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct VisualState {
    #[serde(flatten)]
    pub fields: HashMap<String, serde_json::Value>,
}
