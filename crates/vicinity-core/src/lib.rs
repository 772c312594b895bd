//! Core types and traits for the Vicinity observation sensor.
//!
//! This is the leaf crate with no internal dependencies. It defines
//! the fundamental abstractions used throughout the Vicinity workspace:
//! type IDs, observer geometry, the world object model, error types,
//! and the traits through which the host world and item catalog are
//! consulted.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geometry;
pub mod id;
pub mod object;
pub mod traits;

pub use error::AccessError;
pub use geometry::{ObserverFrame, Vec3};
pub use id::{ObjectId, TickId};
pub use object::{
    Colour, DrawItem, InterpolatedTransform, ItemStack, ObjectKind, Variant, WorldObject,
};
pub use traits::{ItemCatalog, NullCatalog, WorldView};
