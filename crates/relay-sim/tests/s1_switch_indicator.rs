//! S1: one page, Switch SW1 wired directly to Indicator LED1. Toggling the
//! switch flips the indicator after the next convergence; toggling again
//! flips it back.

use relay_sim::{Engine, EngineConfig, InteractAction, InteractParams};
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

fn indicator_state(engine: &Engine) -> String {
    let visual = engine.visual_state("LED1").expect("LED1 should exist");
    visual.fields["indicator_state"].as_str().unwrap().to_string()
}

#[test]
fn toggle_switch_drives_indicator() {
    let mut engine = Engine::load(&document(), EngineConfig::default()).unwrap();
    engine.initialize().unwrap();

    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(indicator_state(&engine), "OFF");

    let changed = engine.interact("SW1", InteractAction::Toggle, &InteractParams::default()).unwrap();
    assert!(changed);
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(indicator_state(&engine), "ON");

    engine.interact("SW1", InteractAction::Toggle, &InteractParams::default()).unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(indicator_state(&engine), "OFF");

    engine.shutdown();
}
