//! Benchmark profiles and utilities for the Vicinity observation pipeline.
//!
//! Provides deterministic worlds and channel layouts for benchmarks and
//! examples:
//!
//! - [`reference_profile`]: 1K objects in a 64-block cube, three channels
//! - [`stress_profile`]: 20K objects in a 256-block cube, eight channels
//! - [`scatter_world`]: seeded object placement with a mix of kinds

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vicinity_core::{InterpolatedTransform, ItemStack, ObjectId, ObserverFrame, Vec3, WorldView};
use vicinity_obs::{NearbyEntitiesParams, RangeDefinition};
use vicinity_test_utils::fixtures::{cow_at, dropped_item_at, remote_observer_at, WOOL};
use vicinity_test_utils::MockWorld;

/// A world plus the channel layout to observe it with.
#[derive(Debug)]
pub struct Profile {
    /// Objects around an observer at the origin.
    pub world: MockWorld,
    /// Channels to attach.
    pub params: NearbyEntitiesParams,
}

/// Build the reference profile: 1K objects, three channels at
/// frequencies 1, 2 and 5.
pub fn reference_profile(seed: u64) -> Profile {
    Profile {
        world: scatter_world(seed, 1_000, 32.0),
        params: NearbyEntitiesParams {
            range: vec![
                RangeDefinition::new("near", 4.0, 2.0, 4.0, 1),
                RangeDefinition::new("mid", 12.0, 6.0, 12.0, 2),
                RangeDefinition::new("far", 32.0, 16.0, 32.0, 5),
            ],
        },
    }
}

/// Build the stress profile: 20K objects, eight channels at frequency 1.
pub fn stress_profile(seed: u64) -> Profile {
    Profile {
        world: scatter_world(seed, 20_000, 128.0),
        params: NearbyEntitiesParams {
            range: (0..8)
                .map(|i| {
                    let r = 16.0 * (i + 1) as f64;
                    RangeDefinition::new(format!("ring{i}"), r, r / 2.0, r, 1)
                })
                .collect(),
        },
    }
}

/// Place `n` objects uniformly in a cube of half-size `extent` around
/// an observer at the origin.
///
/// Every tenth object is a remote observer (with a resolvable
/// transform) and every fifth a dropped wool stack; the rest are generic.
pub fn scatter_world(seed: u64, n: u32, extent: f64) -> MockWorld {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut world = MockWorld::new().with_observer(ObserverFrame::at(Vec3::default()));
    let mut objects = Vec::with_capacity(n as usize);
    for id in 0..n {
        let x = coord(&mut rng, extent);
        let y = coord(&mut rng, extent);
        let z = coord(&mut rng, extent);
        let object = if id % 10 == 0 {
            let transform = InterpolatedTransform::complete(Vec3::new(x, y, z), 0.0, 0.0);
            world = world.with_transform(ObjectId(id), transform);
            remote_observer_at(id, "Agent", x, y, z)
        } else if id % 5 == 0 {
            let damage = (rng.next_u32() % 16) as i32;
            dropped_item_at(id, ItemStack::new(WOOL, 1).with_damage(damage), x, y, z)
        } else {
            cow_at(id, x, y, z)
        };
        objects.push(object);
    }
    world.with_objects(objects)
}

/// Uniform in `[-extent, extent)`.
fn coord(rng: &mut ChaCha8Rng, extent: f64) -> f64 {
    let unit = (rng.next_u64() >> 11) as f64 / (1u64 << 53) as f64;
    (unit * 2.0 - 1.0) * extent
}

/// Objects of `world` that fall within `range` of the origin, counted
/// directly. Used to sanity-check benchmark output.
pub fn expected_matches(world: &MockWorld, range: &RangeDefinition) -> usize {
    world
        .loaded_objects()
        .iter()
        .filter(|o| {
            o.position.x.abs() < range.xrange()
                && o.position.y.abs() < range.yrange()
                && o.position.z.abs() < range.zrange()
        })
        .count()
}
