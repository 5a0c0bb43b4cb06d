//! S2: a switch feeds a DPDT relay's coil; the relay's NO1 contact feeds an
//! indicator. Energizing the coil flips the indicator only after the
//! relay's 10ms switching delay — immediately after the toggle the engine
//! reaches STABLE with the indicator still OFF, and only a second
//! convergence (after the delay fires) reaches STABLE with it ON.
//!
//! The VCC feeds `COM1` so that, once the relay energizes and bridges
//! `COM1<->NO1`, the indicator wired to `NO1` actually sees a driven HIGH
//! rather than an isolated floating contact.

use std::thread::sleep;
use std::time::Duration;

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
                    "id": "VCC1",
                    "component_type": "VCC",
                    "pins": [{"id": "VCC1_P0", "tabs": [{"id": "VCC1_T0"}]}],
                },
                {
                    "id": "SW1",
                    "component_type": "Switch",
                    "pins": [{"id": "SW1_P0", "tabs": [{"id": "SW1_T0"}]}],
                },
                {
                    "id": "RELAY1",
                    "component_type": "DPDTRelay",
                    "pins": [
                        {"id": "RELAY1_COIL", "tabs": [{"id": "RELAY1_COIL_T0"}]},
                        {"id": "RELAY1_COM1", "tabs": [{"id": "RELAY1_COM1_T0"}]},
                        {"id": "RELAY1_NO1", "tabs": [{"id": "RELAY1_NO1_T0"}]},
                        {"id": "RELAY1_NC1", "tabs": [{"id": "RELAY1_NC1_T0"}]},
                        {"id": "RELAY1_COM2", "tabs": [{"id": "RELAY1_COM2_T0"}]},
                        {"id": "RELAY1_NO2", "tabs": [{"id": "RELAY1_NO2_T0"}]},
                        {"id": "RELAY1_NC2", "tabs": [{"id": "RELAY1_NC2_T0"}]},
                    ],
                },
                {
                    "id": "LED1",
                    "component_type": "Indicator",
                    "pins": [{"id": "LED1_P0", "tabs": [{"id": "LED1_T0"}]}],
                },
            ],
            "wires": [
                {"id": "W1", "start_tab": "SW1_T0", "end_tab": "RELAY1_COIL_T0"},
                {"id": "W2", "start_tab": "RELAY1_NO1_T0", "end_tab": "LED1_T0"},
                {"id": "W3", "start_tab": "VCC1_T0", "end_tab": "RELAY1_COM1_T0"},
            ],
        }],
    })
    .to_string()
}

fn indicator_state(engine: &Engine) -> String {
    engine.visual_state("LED1").unwrap().fields["indicator_state"].as_str().unwrap().to_string()
}

fn relay_state(engine: &Engine) -> String {
    engine.visual_state("RELAY1").unwrap().fields["relay_state"].as_str().unwrap().to_string()
}

#[test]
fn relay_delay_gates_indicator() {
    let mut engine = Engine::load(&document(), EngineConfig::default()).unwrap();
    engine.initialize().unwrap();
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(relay_state(&engine), "DE-ENERGIZED");
    assert_eq!(indicator_state(&engine), "OFF");

    engine.interact("SW1", InteractAction::Toggle, &InteractParams::default()).unwrap();

    // Immediately after the toggle, one convergence pass reaches STABLE
    // with the indicator still off: the coil is HIGH, but the relay has
    // only just scheduled its 10ms delayed contact switch.
    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(indicator_state(&engine), "OFF");

    // Give the relay's timer thread time to fire and flip the contacts.
    sleep(Duration::from_millis(60));

    let stats = engine.run().unwrap();
    assert!(stats.stable);
    assert_eq!(relay_state(&engine), "ENERGIZED");
    assert_eq!(indicator_state(&engine), "ON");

    engine.shutdown();
}
