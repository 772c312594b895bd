//! Vicinity: a nearby-entity observation sensor for agent simulations.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Vicinity sub-crates. For most users, adding `vicinity` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use vicinity::prelude::*;
//!
//! // A host world: observer at the origin, one object close by.
//! struct Paddock {
//!     objects: Vec<WorldObject>,
//! }
//!
//! impl WorldView for Paddock {
//!     fn observer(&self) -> ObserverFrame {
//!         ObserverFrame::at(Vec3::default())
//!     }
//!     fn loaded_objects(&self) -> &[WorldObject] {
//!         &self.objects
//!     }
//!     fn interpolated_transform(
//!         &self,
//!         id: ObjectId,
//!     ) -> Result<InterpolatedTransform, AccessError> {
//!         Err(AccessError::NotRemoteObserver { object: id })
//!     }
//! }
//!
//! let config = MissionConfig::from_json(r#"{
//!     "observationProducers": [{
//!         "type": "ObservationFromNearbyEntities",
//!         "range": [{ "name": "near", "xrange": 2, "yrange": 2, "zrange": 2 }]
//!     }]
//! }"#).unwrap();
//! let (mut mission, frames) = SensorMission::new(config, Arc::new(NullCatalog)).unwrap();
//! assert_eq!(mission.start().unwrap(), MissionState::Running);
//!
//! let world = Paddock {
//!     objects: vec![WorldObject::generic(1, "Pig", Vec3::new(1.0, 1.0, 1.0))],
//! };
//! mission.tick(&world);
//!
//! let frame = frames.try_recv().unwrap();
//! assert_eq!(frame.tick, TickId(1));
//! assert_eq!(frame.observations["near"][0]["name"], "Pig");
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `vicinity-core` | IDs, geometry, world objects, host traits |
//! | [`obs`] | `vicinity-obs` | Channels, throttling, classification, records |
//! | [`engine`] | `vicinity-engine` | Episode state machine and sensing missions |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`vicinity-core`).
///
/// Contains world objects, geometry, and the host-facing traits
/// ([`types::WorldView`], [`types::ItemCatalog`]).
pub use vicinity_core as types;

/// The nearby-entities observation pipeline (`vicinity-obs`).
///
/// [`obs::RangeRegistry`] validates channels, [`obs::ThrottleScheduler`]
/// decides which are due, [`obs::classify()`] buckets
/// objects, and [`obs::emit()`] builds the per-tick document.
/// [`obs::NearbyEntitiesProducer`] runs all of it once per tick.
pub use vicinity_obs as obs;

/// Episode control (`vicinity-engine`).
///
/// [`engine::EpisodeMachine`] is the generic phase machine;
/// [`engine::SensorMission`] drives observation producers with it.
pub use vicinity_engine as engine;

/// Common imports for typical Vicinity usage.
///
/// ```rust
/// use vicinity::prelude::*;
/// ```
///
/// This imports the most frequently used types: world objects, host
/// traits, channel configuration, the producer, and the mission driver.
pub mod prelude {
    // Core types and traits
    pub use vicinity_core::{
        AccessError, InterpolatedTransform, ItemCatalog, ItemStack, NullCatalog, ObjectId,
        ObjectKind, ObserverFrame, TickId, Vec3, WorldObject, WorldView,
    };

    // Observation pipeline
    pub use vicinity_obs::{
        EmissionPolicy, HandlerParams, NearbyEntitiesParams, NearbyEntitiesProducer,
        ObservationDocument, ObservationProducer, RangeDefinition,
    };

    // Engine
    pub use vicinity_engine::{
        HostEvent, MissionConfig, MissionError, MissionState, ObservationFrame, SensorMission,
    };
}
