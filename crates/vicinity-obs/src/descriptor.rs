//! Per-object attribute records.
//!
//! [`DescriptorBuilder::describe`] is a total match over
//! [`ObjectKind`]. Extraction never fails: when an attribute cannot be
//! obtained it is left out of the record and the record is still
//! produced.

use serde::Serialize;
use tracing::warn;
use vicinity_core::{Colour, ItemCatalog, ObjectKind, Variant, WorldObject, WorldView};

/// Serialized description of one object in one channel.
///
/// Absent attributes are omitted from the JSON form rather than
/// written as `null`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ObservationRecord {
    /// Display name, or the resolved item type for catalogued items.
    pub name: String,
    /// Position x.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    /// Position y.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    /// Position z.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    /// Heading.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaw: Option<f64>,
    /// Elevation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    /// Item colour, when the catalog provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,
    /// Item variant, when the catalog provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variation: Option<Variant>,
    /// Stack size; present for every dropped item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
}

impl ObservationRecord {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            ..Self::default()
        }
    }

    fn with_public_transform(mut self, object: &WorldObject) -> Self {
        self.x = finite(Some(object.position.x));
        self.y = finite(Some(object.position.y));
        self.z = finite(Some(object.position.z));
        self.yaw = finite(Some(object.yaw));
        self.pitch = finite(Some(object.pitch));
        self
    }
}

/// NaN and infinities have no JSON form; they count as absent.
fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

/// Builds [`ObservationRecord`]s, resolving dropped items through a catalog.
#[derive(Clone, Copy)]
pub struct DescriptorBuilder<'a> {
    catalog: &'a dyn ItemCatalog,
}

impl<'a> DescriptorBuilder<'a> {
    /// Builder backed by `catalog`.
    pub fn new(catalog: &'a dyn ItemCatalog) -> Self {
        Self { catalog }
    }

    /// Describe `object` as seen in `world`.
    pub fn describe(&self, world: &dyn WorldView, object: &WorldObject) -> ObservationRecord {
        match &object.kind {
            ObjectKind::Generic => {
                ObservationRecord::named(&object.name).with_public_transform(object)
            }
            ObjectKind::RemoteObserver => {
                let mut record = ObservationRecord::named(&object.name);
                match world.interpolated_transform(object.id) {
                    Ok(t) => {
                        record.x = finite(t.x);
                        record.y = finite(t.y);
                        record.z = finite(t.z);
                        record.yaw = finite(t.yaw);
                        record.pitch = finite(t.pitch);
                    }
                    Err(e) => {
                        warn!(
                            object = %object.id,
                            name = %object.name,
                            error = %e,
                            "remote observer transform unavailable; omitting position"
                        );
                    }
                }
                record
            }
            ObjectKind::DroppedItem(stack) => {
                let mut record =
                    ObservationRecord::named(&object.name).with_public_transform(object);
                if let Some(draw) = self.catalog.resolve(stack) {
                    record.name = draw.item_type;
                    record.colour = draw.colour;
                    record.variation = draw.variant;
                }
                record.quantity = Some(stack.count);
                record
            }
        }
    }
}

impl std::fmt::Debug for DescriptorBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DescriptorBuilder").finish_non_exhaustive()
    }
}
