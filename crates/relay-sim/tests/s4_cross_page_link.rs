//! S4: a Switch on page A carries `link_name = "SIGNAL_A"`; an Indicator on
//! page B carries the same link name. No wire connects the two pages.
//! Toggling the switch on lights the indicator after one convergence.

use relay_sim::{Engine, EngineConfig, InteractAction, InteractParams};
use serde_json::json;

fn document() -> String {
    json!({
        "version": {"major": 1, "minor": 0},
        "pages": [
            {
                "id": "pageA",
                "name": "A",
                "components": [
                    {
                        "id": "SW1",
                        "component_type": "Switch",
                        "link_name": "SIGNAL_A",
                        "pins": [{"id": "SW1_P0", "tabs": [{"id": "SW1_T0"}]}],
                    },
                ],
            },
            {
                "id": "pageB",
                "name": "B",
                "components": [
                    {
                        "id": "LED1",
                        "component_type": "Indicator",
                        "link_name": "SIGNAL_A",
                        "pins": [{"id": "LED1_P0", "tabs": [{"id": "LED1_T0"}]}],
                    },
                ],
            },
        ],
    })
    .to_string()
}

#[test]
fn link_name_merges_vnets_across_pages() {
    let mut engine = Engine::load(&document(), EngineConfig::default()).unwrap();
    engine.initialize().unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(
        engine.visual_state("LED1").unwrap().fields["indicator_state"].as_str().unwrap(),
        "OFF"
    );

    engine.interact("SW1", InteractAction::Toggle, &InteractParams::default()).unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(
        engine.visual_state("LED1").unwrap().fields["indicator_state"].as_str().unwrap(),
        "ON"
    );

    engine.shutdown();
}
