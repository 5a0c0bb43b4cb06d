//! Snapshot of `get_visual_state`'s JSON shape for a stabilized circuit
//! (SPEC_FULL.md §9 Testing tooling: "insta for snapshotting
//! `get_visual_state` JSON shapes"). The fields are collected into a
//! `BTreeMap` before snapshotting so key order is deterministic regardless
//! of the engine's internal hash map iteration order.

use std::collections::BTreeMap;

use relay_sim::{Engine, EngineConfig};
use serde_json::json;

fn document() -> String {
    json!({
        "version": {"major": 1, "minor": 0},
        "pages": [{
            "id": "p0",
            "name": "main",
            "components": [
                {
                    "id": "SW1",
                    "component_type": "Switch",
                    "pins": [{"id": "SW1_P0", "tabs": [{"id": "SW1_T0"}]}],
                },
                {
                    "id": "LED1",
                    "component_type": "Indicator",
                    "pins": [{"id": "LED1_P0", "tabs": [{"id": "LED1_T0"}]}],
                },
            ],
            "wires": [{"id": "W1", "start_tab": "SW1_T0", "end_tab": "LED1_T0"}],
        }],
    })
    .to_string()
}

fn sorted_json(engine: &Engine, source_id: &str) -> String {
    let fields = engine.visual_state(source_id).unwrap().fields;
    let sorted: BTreeMap<String, serde_json::Value> = fields.into_iter().collect();
    serde_json::to_string_pretty(&sorted).unwrap()
}

#[test]
fn indicator_visual_state_shape_off() {
    let mut engine = Engine::load(&document(), EngineConfig::default()).unwrap();
    engine.initialize().unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);

    insta::assert_snapshot!(sorted_json(&engine, "LED1"), @r#"
    {
      "indicator_state": "OFF",
      "pin_states": {
        "0": "FLOAT"
      },
      "position": {
        "x": 0.0,
        "y": 0.0
      },
      "properties": {},
      "rotation": 0,
      "type": "Indicator"
    }
    "#);

    engine.shutdown();
}
