//! Integration test: full sensing missions driven tick by tick.
//!
//! Builds missions from JSON, runs them against a mock world, and checks
//! the frames that arrive on the outbox along with the final state.

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};
use vicinity_core::{AccessError, ItemStack, NullCatalog, ObjectId, ObserverFrame, TickId, Vec3};
use vicinity_engine::{HostEvent, MissionState, ObservationFrame, SensorMission};
use vicinity_test_utils::fixtures::{
    cow_at, dropped_item_at, remote_observer_at, wool_catalog, WOOL,
};
use vicinity_test_utils::MockWorld;

// ── Helpers ──────────────────────────────────────────────────────────

fn nearby_mission(ranges: Value, extra: Value) -> String {
    let mut config = json!({
        "observationProducers": [
            { "type": "ObservationFromNearbyEntities", "range": ranges }
        ]
    });
    if let (Some(obj), Some(more)) = (config.as_object_mut(), extra.as_object()) {
        for (k, v) in more {
            obj.insert(k.clone(), v.clone());
        }
    }
    config.to_string()
}

/// Route library logs to the test harness; `RUST_LOG` selects the level.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn origin_world() -> MockWorld {
    MockWorld::new().with_observer(ObserverFrame::at(Vec3::default()))
}

fn drain(frames: &crossbeam_channel::Receiver<ObservationFrame>) -> Vec<ObservationFrame> {
    frames.try_iter().collect()
}

// ── Tests ────────────────────────────────────────────────────────────

#[test]
fn near_channel_tracks_object_entering_and_leaving() {
    init_tracing();
    let json = nearby_mission(
        json!([{ "name": "near", "xrange": 2, "yrange": 2, "zrange": 2, "updateFrequency": 1 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    assert_eq!(mission.start().unwrap(), MissionState::Running);

    let mut world = origin_world().with_object(cow_at(7, 1.0, 1.0, 1.0));
    for _ in 0..3 {
        mission.tick(&world);
    }
    let seen = drain(&frames);
    assert_eq!(seen.len(), 3);
    for (i, frame) in seen.iter().enumerate() {
        assert_eq!(frame.tick, TickId(i as u64 + 1));
        assert_eq!(
            frame.observations,
            json!({
                "near": [{ "name": "Cow", "x": 1.0, "y": 1.0, "z": 1.0, "yaw": 0.0, "pitch": 0.0 }]
            })
        );
    }

    assert!(world.move_object(ObjectId(7), Vec3::new(3.0, 0.0, 0.0)));
    mission.tick(&world);
    let frame = frames.try_recv().unwrap();
    assert_eq!(frame.observations, json!({ "near": [] }));
}

#[test]
fn overlapping_channels_both_report_the_object() {
    let json = nearby_mission(
        json!([
            { "name": "near", "xrange": 2, "yrange": 2, "zrange": 2 },
            { "name": "far", "xrange": 20, "yrange": 20, "zrange": 20 }
        ]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();
    mission.tick(&origin_world().with_object(cow_at(1, 1.0, 0.0, 0.0)));

    let frame = frames.try_recv().unwrap();
    let keys: Vec<_> = frame
        .observations
        .as_object()
        .unwrap()
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["near", "far"]);
    assert_eq!(frame.observations["near"][0]["name"], json!("Cow"));
    assert_eq!(frame.observations["far"][0]["name"], json!("Cow"));
}

#[test]
fn throttled_channels_appear_under_their_own_names() {
    let json = nearby_mission(
        json!([
            { "name": "fast", "xrange": 5, "yrange": 5, "zrange": 5, "updateFrequency": 1 },
            { "name": "slow", "xrange": 5, "yrange": 5, "zrange": 5, "updateFrequency": 3 }
        ]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();
    let world = origin_world().with_object(cow_at(1, 1.0, 0.0, 0.0));
    for _ in 0..6 {
        mission.tick(&world);
    }

    let slow_ticks: Vec<u64> = drain(&frames)
        .into_iter()
        .filter(|f| f.observations.get("slow").is_some())
        .map(|f| f.tick.0)
        .collect();
    assert_eq!(slow_ticks, vec![3, 6]);
}

#[test]
fn failed_remote_observer_lookup_omits_transform() {
    init_tracing();
    let json = nearby_mission(
        json!([{ "name": "near", "xrange": 4, "yrange": 4, "zrange": 4 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();
    let world = origin_world()
        .with_object(remote_observer_at(2, "Alex", 1.0, 0.0, 0.0))
        .with_transform_error(
            ObjectId(2),
            AccessError::AccessDenied {
                reason: "transform is private".into(),
            },
        );

    assert_eq!(mission.tick(&world), MissionState::Running);
    let frame = frames.try_recv().unwrap();
    assert_eq!(frame.observations, json!({ "near": [{ "name": "Alex" }] }));
}

#[test]
fn dropped_items_resolve_through_the_catalog() {
    let json = nearby_mission(
        json!([{ "name": "items", "xrange": 4, "yrange": 4, "zrange": 4 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(wool_catalog())).unwrap();
    mission.start().unwrap();
    let world = origin_world()
        .with_object(dropped_item_at(
            3,
            ItemStack::new(WOOL, 5).with_damage(14),
            1.0,
            0.0,
            0.0,
        ))
        .with_object(dropped_item_at(
            4,
            ItemStack::new("minecraft:apple", 2),
            -1.0,
            0.0,
            0.0,
        ));
    mission.tick(&world);

    let frame = frames.try_recv().unwrap();
    let items = &frame.observations["items"];
    assert_eq!(items[0]["name"], json!("wool"));
    assert_eq!(items[0]["colour"], json!("RED"));
    assert_eq!(items[0]["quantity"], json!(5));
    assert_eq!(items[1]["name"], json!("item.apple"));
    assert_eq!(items[1]["quantity"], json!(2));
    assert!(items[1].get("colour").is_none());
}

#[test]
fn time_limit_ends_mission() {
    let json = nearby_mission(
        json!([{ "name": "near", "xrange": 2, "yrange": 2, "zrange": 2 }]),
        json!({ "timeLimitTicks": 2 }),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();
    let world = origin_world();

    assert_eq!(mission.tick(&world), MissionState::Running);
    assert_eq!(mission.tick(&world), MissionState::Ended);
    assert_eq!(mission.active_producers(), 0);

    // Further ticks are ignored.
    assert_eq!(mission.tick(&world), MissionState::Ended);
    assert_eq!(drain(&frames).len(), 2);
    assert_eq!(mission.ticks(), 2);
}

#[test]
fn strict_mission_with_invalid_handler_errors() {
    init_tracing();
    let json = nearby_mission(
        json!([
            { "name": "dup", "xrange": 2, "yrange": 2, "zrange": 2 },
            { "name": "dup", "xrange": 3, "yrange": 3, "zrange": 3 }
        ]),
        json!({ "strictHandlers": true }),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    assert_eq!(mission.start().unwrap(), MissionState::Errored);
    assert!(mission
        .error_details()
        .unwrap()
        .contains("ObservationFromNearbyEntities"));

    assert_eq!(mission.tick(&origin_world()), MissionState::Errored);
    assert!(frames.try_recv().is_err());
}

#[test]
fn lenient_mission_with_invalid_handler_runs_without_it() {
    let json = nearby_mission(
        json!([{ "name": "", "xrange": 2, "yrange": 2, "zrange": 2 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    assert_eq!(mission.start().unwrap(), MissionState::Running);
    assert_eq!(mission.active_producers(), 0);

    mission.tick(&origin_world().with_object(cow_at(1, 0.5, 0.0, 0.0)));
    assert_eq!(frames.try_recv().unwrap().observations, json!({}));
}

#[test]
fn misspelled_range_key_leaves_handler_inert() {
    let json = nearby_mission(
        json!([{
            "name": "slow", "xrange": 2, "yrange": 2, "zrange": 2, "update_frequency": 10
        }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    assert_eq!(mission.start().unwrap(), MissionState::Running);
    assert_eq!(mission.active_producers(), 0);

    mission.tick(&origin_world().with_object(cow_at(1, 0.5, 0.0, 0.0)));
    assert_eq!(frames.try_recv().unwrap().observations, json!({}));
}

#[test]
fn misspelled_range_key_is_fatal_when_strict() {
    let json = nearby_mission(
        json!([{
            "name": "slow", "xrange": 2, "yrange": 2, "zrange": 2, "update_frequency": 10
        }]),
        json!({ "strictHandlers": true }),
    );
    let (mut mission, _frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    assert_eq!(mission.start().unwrap(), MissionState::Errored);
    assert_eq!(
        mission.error_details(),
        Some("handler 'ObservationFromNearbyEntities' failed: parameters rejected")
    );
}

#[test]
fn observer_movement_and_unloading_change_matches() {
    let json = nearby_mission(
        json!([{ "name": "near", "xrange": 2, "yrange": 2, "zrange": 2 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();
    let mut world = origin_world()
        .with_object(cow_at(1, 1.0, 0.0, 0.0))
        .with_object(cow_at(2, 5.0, 0.0, 0.0));

    let xs = |frame: ObservationFrame| -> Vec<f64> {
        frame.observations["near"]
            .as_array()
            .map(|records| records.iter().filter_map(|r| r["x"].as_f64()).collect())
            .unwrap_or_default()
    };

    mission.tick(&world);
    assert_eq!(xs(frames.try_recv().unwrap()), vec![1.0]);

    // Observer walks to x = 4: the first cow is now 3 away, the second 1.
    world.set_observer(Vec3::new(4.0, 0.0, 0.0));
    mission.tick(&world);
    assert_eq!(xs(frames.try_recv().unwrap()), vec![5.0]);

    assert!(world.remove_object(ObjectId(2)).is_some());
    mission.tick(&world);
    assert_eq!(xs(frames.try_recv().unwrap()), Vec::<f64>::new());
}

#[test]
fn stop_requested_from_another_thread() {
    let json = nearby_mission(
        json!([{ "name": "near", "xrange": 2, "yrange": 2, "zrange": 2 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();

    let handle = mission.handle();
    let consumer = thread::spawn(move || {
        let first = frames.recv().unwrap();
        handle.request(MissionState::Cleanup);
        first.tick
    });

    let world = origin_world();
    mission.tick(&world);
    assert_eq!(consumer.join().unwrap(), TickId(1));
    assert_eq!(mission.pump(), MissionState::Ended);
}

#[test]
fn non_tick_events_do_not_sample() {
    let json = nearby_mission(
        json!([{ "name": "near", "xrange": 2, "yrange": 2, "zrange": 2 }]),
        json!({}),
    );
    let (mut mission, frames) = SensorMission::from_json(&json, Arc::new(NullCatalog)).unwrap();
    mission.start().unwrap();
    for event in [
        HostEvent::ServerTick,
        HostEvent::RenderTick,
        HostEvent::ChunkLoad { x: 0, z: 0 },
        HostEvent::PlayerJoined,
        HostEvent::PlayerTick,
        HostEvent::PotentialSpawns,
        HostEvent::ConfigChanged,
    ] {
        assert_eq!(mission.dispatch(&event), MissionState::Running);
    }
    assert_eq!(mission.ticks(), 0);
    assert!(frames.try_recv().is_err());
}
