use criterion::{Criterion, criterion_group, criterion_main};
use relay_sim::{Engine, EngineConfig};
use serde_json::{Value, json};

/// `n` independent `Switch -> Indicator` chains on a single page, each
/// joined by one wire. Cheap to build, gives the evaluator/propagator a
/// tunable number of independent VNETs with no cross-chain fan-in.
fn chain_document(n: usize) -> String {
    let mut components = Vec::with_capacity(n * 2);
    let mut wires = Vec::with_capacity(n);

    for i in 0..n {
        components.push(json!({
            "id": format!("sw{i}"),
            "component_type": "Switch",
            "pins": [{"id": format!("sw{i}_p0"), "tabs": [{"id": format!("sw{i}_t0")}]}],
        }));
        components.push(json!({
            "id": format!("ind{i}"),
            "component_type": "Indicator",
            "pins": [{"id": format!("ind{i}_p0"), "tabs": [{"id": format!("ind{i}_t0")}]}],
        }));
        wires.push(json!({
            "id": format!("w{i}"),
            "start_tab": format!("sw{i}_t0"),
            "end_tab": format!("ind{i}_t0"),
        }));
    }

    let doc: Value = json!({
        "version": {"major": 1, "minor": 0},
        "pages": [{
            "id": "p0",
            "name": "main",
            "components": components,
            "wires": wires,
        }],
    });
    doc.to_string()
}

fn bench_initial_stabilization(c: &mut Criterion) {
    let mut group = c.benchmark_group("initial_stabilization");
    for &n in &[100usize, 1_000, 5_000] {
        let json = chain_document(n);
        group.bench_function(format!("chains_{n}"), |b| {
            b.iter(|| {
                let mut engine = Engine::load(&json, EngineConfig::default()).unwrap();
                engine.initialize().unwrap();
                engine.run().unwrap()
            })
        });
    }
    group.finish();
}

fn bench_reevaluate_after_toggle(c: &mut Criterion) {
    let json = chain_document(2_000);
    let mut engine = Engine::load(&json, EngineConfig::default()).unwrap();
    engine.initialize().unwrap();
    engine.run().unwrap();

    c.bench_function("reevaluate_after_single_toggle", |b| {
        b.iter(|| {
            engine
                .interact("sw0", relay_sim::InteractAction::Toggle, &Default::default())
                .ok();
            engine.run().unwrap()
        })
    });
}

criterion_group!(benches, bench_initial_stabilization, bench_reevaluate_after_toggle);
criterion_main!(benches);
