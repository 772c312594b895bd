//! Collaborator traits at the host boundary.
//!
//! The sensor never owns world state. It reads the host through
//! [`WorldView`] and resolves dropped items through [`ItemCatalog`];
//! both are implemented by the integration layer (or by mocks in
//! `vicinity-test-utils`).

use crate::error::AccessError;
use crate::geometry::ObserverFrame;
use crate::id::ObjectId;
use crate::object::{DrawItem, InterpolatedTransform, ItemStack, WorldObject};

/// Read-only snapshot of the host world for one tick.
///
/// Implementations must return the same observer and object list for
/// the duration of a tick; the sensor treats them as immutable.
pub trait WorldView {
    /// The sampling reference frame (the controlling agent).
    fn observer(&self) -> ObserverFrame;

    /// Every object currently loaded by the world, in host order.
    fn loaded_objects(&self) -> &[WorldObject];

    /// Interpolated transform of a remote observer.
    ///
    /// This is the privileged-access capability: hosts wire it to
    /// whatever internal state holds the smoothed transform, chosen once
    /// when the adapter is built. Failure is expected and non-fatal.
    fn interpolated_transform(&self, object: ObjectId)
        -> Result<InterpolatedTransform, AccessError>;
}

/// Maps raw item stacks to domain item types.
///
/// Must be [`Send`] + [`Sync`] so a single catalog can be shared by
/// every producer in a mission.
pub trait ItemCatalog: Send + Sync {
    /// Resolve `stack`, or `None` when the catalog has no mapping.
    fn resolve(&self, stack: &ItemStack) -> Option<DrawItem>;
}

/// A catalog that resolves nothing.
///
/// Dropped items described through it keep their raw display name.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullCatalog;

impl ItemCatalog for NullCatalog {
    fn resolve(&self, _stack: &ItemStack) -> Option<DrawItem> {
        None
    }
}
