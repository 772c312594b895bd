//! Reusable object and catalog fixtures.
//!
//! - [`cow_at`]: a generic object.
//! - [`remote_observer_at`]: another agent, described via the host's
//!   interpolated transform.
//! - [`dropped_item_at`]: a dropped item stack.
//! - [`wool_catalog`]: a catalog resolving all sixteen wool colours.

use vicinity_core::{Colour, DrawItem, ItemStack, ObjectKind, Vec3, WorldObject};

use crate::MockCatalog;

/// Raw item id used by [`wool_catalog`].
pub const WOOL: &str = "minecraft:wool";

/// A generic object named `"Cow"`.
pub fn cow_at(id: u32, x: f64, y: f64, z: f64) -> WorldObject {
    WorldObject::generic(id, "Cow", Vec3::new(x, y, z))
}

/// A remote observer named `name` at the given public position.
pub fn remote_observer_at(id: u32, name: &str, x: f64, y: f64, z: f64) -> WorldObject {
    WorldObject::generic(id, name, Vec3::new(x, y, z)).with_kind(ObjectKind::RemoteObserver)
}

/// A dropped item carrying `stack`, with the host's raw item display name.
pub fn dropped_item_at(id: u32, stack: ItemStack, x: f64, y: f64, z: f64) -> WorldObject {
    let name = format!("item.{}", stack.item.trim_start_matches("minecraft:"));
    WorldObject::generic(id, name, Vec3::new(x, y, z)).with_kind(ObjectKind::DroppedItem(stack))
}

/// Catalog mapping `minecraft:wool` damage values 0..16 to coloured wool.
pub fn wool_catalog() -> MockCatalog {
    (0..16)
        .filter_map(|meta| Colour::from_metadata(meta).map(|colour| (meta, colour)))
        .fold(MockCatalog::new(), |catalog, (meta, colour)| {
            catalog.with_entry(WOOL, meta, DrawItem::new("wool").with_colour(colour))
        })
}
