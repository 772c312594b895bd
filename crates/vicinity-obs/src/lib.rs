//! Nearby-entity observation pipeline for the Vicinity sensor.
//!
//! Each tick runs the same five stages:
//!
//! 1. [`ThrottleScheduler`] decides which configured channels are due.
//! 2. [`classify`] buckets loaded objects into every due channel whose
//!    half-extents box contains them.
//! 3. [`DescriptorBuilder`] turns each bucketed object into an
//!    [`ObservationRecord`].
//! 4. [`emit`] assembles the records into an [`ObservationDocument`]
//!    keyed by channel name.
//! 5. [`NearbyEntitiesProducer`] wires the stages together behind the
//!    [`ObservationProducer`] lifecycle used by the episode controller.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod classify;
pub mod descriptor;
pub mod emit;
pub mod producer;
pub mod range;
pub mod throttle;

pub use classify::{classify, contains, Buckets};
pub use descriptor::{DescriptorBuilder, ObservationRecord};
pub use emit::{emit, EmissionPolicy, ObservationDocument};
pub use producer::{HandlerParams, NearbyEntitiesProducer, ObservationProducer};
pub use range::{ConfigError, NearbyEntitiesParams, RangeDefinition, RangeRegistry};
pub use throttle::{DueChannels, ScheduledRange, ThrottleScheduler};
