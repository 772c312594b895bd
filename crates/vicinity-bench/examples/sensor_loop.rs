//! End-to-end sensing loop example.
//!
//! Demonstrates: JSON mission → SensorMission → tick a moving world →
//! read frames from the outbox → time limit ends the mission.
//!
//! Run with `RUST_LOG=debug` to see state changes and dropped frames.

use std::sync::Arc;

use serde_json::Value;
use tracing_subscriber::EnvFilter;
use vicinity_core::{ObjectId, Vec3};
use vicinity_engine::{MissionState, SensorMission};
use vicinity_test_utils::wool_catalog;

use vicinity_bench::scatter_world;

const MISSION: &str = r#"{
    "observationProducers": [{
        "type": "ObservationFromNearbyEntities",
        "range": [
            { "name": "near", "xrange": 3, "yrange": 2, "zrange": 3 },
            { "name": "far", "xrange": 12, "yrange": 4, "zrange": 12, "updateFrequency": 5 }
        ]
    }],
    "timeLimitTicks": 20,
    "emissionPolicy": "non_empty_only"
}"#;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Vicinity Sensor Loop Example ===\n");

    let built = SensorMission::from_json(MISSION, Arc::new(wool_catalog()));
    let (mut mission, frames) = match built {
        Ok(built) => built,
        Err(e) => {
            eprintln!("mission rejected: {e}");
            return;
        }
    };
    let mut world = scatter_world(7, 200, 16.0);
    println!("start: {:?}", mission.start());

    // Walk object 1 towards the observer, one block per tick.
    let mut state = mission.state();
    let mut x = 10.0;
    while state == MissionState::Running {
        world.move_object(ObjectId(1), Vec3::new(x, 0.0, 0.0));
        x -= 1.0;
        state = mission.tick(&world);

        for frame in frames.try_iter() {
            let count =
                |key: &str| frame.observations.get(key).and_then(Value::as_array).map(Vec::len);
            let near = count("near").unwrap_or(0);
            let far = count("far");
            println!("tick {:>3}: near={near:<3} far={far:?}", frame.tick);
        }
    }

    println!("\nfinal state: {state} after {} ticks", mission.ticks());
    if let Some(details) = mission.error_details() {
        println!("error details: {details}");
    }
}
