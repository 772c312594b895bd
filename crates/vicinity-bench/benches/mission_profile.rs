//! Criterion benchmarks for whole missions over the bench profiles.

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use vicinity_engine::{MissionConfig, SensorMission};
use vicinity_obs::HandlerParams;
use vicinity_test_utils::wool_catalog;

use vicinity_bench::{reference_profile, stress_profile, Profile};

fn mission_for(profile: &Profile) -> SensorMission {
    let config = MissionConfig {
        observation_producers: vec![HandlerParams::ObservationFromNearbyEntities(
            profile.params.clone(),
        )],
        outbox_capacity: 1,
        ..MissionConfig::default()
    };
    let (mut mission, frames) = SensorMission::new(config, Arc::new(wool_catalog())).unwrap();
    // Dropping the receiver makes every send fail fast; the tick cost
    // measured is sampling and serialization only.
    drop(frames);
    mission.start().unwrap();
    mission
}

/// Benchmark: 100 client ticks over the 1K-object reference world.
fn bench_reference_100_ticks(c: &mut Criterion) {
    let profile = reference_profile(42);

    c.bench_function("mission_reference_100_ticks", |b| {
        b.iter(|| {
            let mut mission = mission_for(&profile);
            for _ in 0..100 {
                mission.tick(&profile.world);
            }
            std::hint::black_box(mission.ticks());
        });
    });
}

/// Benchmark: one client tick over the 20K-object stress world.
fn bench_stress_tick(c: &mut Criterion) {
    let profile = stress_profile(42);
    let mut mission = mission_for(&profile);

    let mut group = c.benchmark_group("stress");
    group.sample_size(20);
    group.bench_function("mission_stress_tick", |b| {
        b.iter(|| std::hint::black_box(mission.tick(&profile.world)));
    });
    group.finish();
}

criterion_group!(benches, bench_reference_100_ticks, bench_stress_tick);
criterion_main!(benches);
