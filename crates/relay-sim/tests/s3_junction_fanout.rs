//! S3: one switch fans out, via a single junction, to three indicators.
//! Toggling the switch on drives all three indicators on in one
//! convergence pass.

use relay_sim::{Engine, EngineConfig, InteractAction, InteractParams};
use serde_json::json;

fn document() -> String {
    json!({
        "version": {"major": 1, "minor": 0},
        "pages": [{
            "id": "p0",
            "name": "main",
            "components": [
                {"id": "SW1", "component_type": "Switch", "pins": [{"id": "SW1_P0", "tabs": [{"id": "SW1_T0"}]}]},
                {"id": "LED1", "component_type": "Indicator", "pins": [{"id": "LED1_P0", "tabs": [{"id": "LED1_T0"}]}]},
                {"id": "LED2", "component_type": "Indicator", "pins": [{"id": "LED2_P0", "tabs": [{"id": "LED2_T0"}]}]},
                {"id": "LED3", "component_type": "Indicator", "pins": [{"id": "LED3_P0", "tabs": [{"id": "LED3_T0"}]}]},
            ],
            "wires": [
                {"id": "TRUNK", "start_tab": "SW1_T0"},
                {"id": "BRANCH1", "start_tab": "LED1_T0"},
                {"id": "BRANCH2", "start_tab": "LED2_T0"},
                {"id": "BRANCH3", "start_tab": "LED3_T0"},
            ],
            "junctions": [
                {"id": "J1", "trunk_wire": "TRUNK", "child_wires": ["BRANCH1", "BRANCH2", "BRANCH3"]},
            ],
        }],
    })
    .to_string()
}

fn indicator_state(engine: &Engine, id: &str) -> String {
    engine.visual_state(id).unwrap().fields["indicator_state"].as_str().unwrap().to_string()
}

#[test]
fn junction_fans_switch_out_to_three_indicators() {
    let mut engine = Engine::load(&document(), EngineConfig::default()).unwrap();
    engine.initialize().unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    for id in ["LED1", "LED2", "LED3"] {
        assert_eq!(indicator_state(&engine, id), "OFF");
    }

    engine.interact("SW1", InteractAction::Toggle, &InteractParams::default()).unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    for id in ["LED1", "LED2", "LED3"] {
        assert_eq!(indicator_state(&engine, id), "ON");
    }

    engine.shutdown();
}
