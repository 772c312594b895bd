//! Test utilities and mock types for Vicinity development.
//!
//! Provides mock implementations of the host-boundary traits
//! ([`WorldView`], [`ItemCatalog`]) and a handful of object fixtures
//! for constructing test scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashMap;

use vicinity_core::{
    AccessError, DrawItem, InterpolatedTransform, ItemCatalog, ItemStack, ObjectId,
    ObserverFrame, Vec3, WorldObject, WorldView,
};

pub use fixtures::{cow_at, dropped_item_at, remote_observer_at, wool_catalog};

/// Mock implementation of [`WorldView`].
///
/// Holds an observer frame, an object list, and a table of interpolated
/// transforms (or access failures) per object. Objects without an entry
/// in the table report [`AccessError::NotRemoteObserver`].
#[derive(Clone, Debug, Default)]
pub struct MockWorld {
    observer: ObserverFrame,
    objects: Vec<WorldObject>,
    transforms: HashMap<ObjectId, Result<InterpolatedTransform, AccessError>>,
}

impl MockWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_observer(mut self, observer: ObserverFrame) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_object(mut self, object: WorldObject) -> Self {
        self.objects.push(object);
        self
    }

    pub fn with_objects(mut self, objects: impl IntoIterator<Item = WorldObject>) -> Self {
        self.objects.extend(objects);
        self
    }

    pub fn with_transform(mut self, object: ObjectId, transform: InterpolatedTransform) -> Self {
        self.transforms.insert(object, Ok(transform));
        self
    }

    pub fn with_transform_error(mut self, object: ObjectId, error: AccessError) -> Self {
        self.transforms.insert(object, Err(error));
        self
    }

    /// Move the observer between ticks.
    pub fn set_observer(&mut self, position: Vec3) {
        self.observer = ObserverFrame::at(position);
    }

    /// Move an object between ticks. Returns `false` if it is not loaded.
    pub fn move_object(&mut self, id: ObjectId, position: Vec3) -> bool {
        match self.objects.iter_mut().find(|o| o.id == id) {
            Some(o) => {
                o.position = position;
                true
            }
            None => false,
        }
    }

    /// Unload an object. Returns the removed object, if any.
    pub fn remove_object(&mut self, id: ObjectId) -> Option<WorldObject> {
        let idx = self.objects.iter().position(|o| o.id == id)?;
        Some(self.objects.remove(idx))
    }
}

impl WorldView for MockWorld {
    fn observer(&self) -> ObserverFrame {
        self.observer
    }

    fn loaded_objects(&self) -> &[WorldObject] {
        &self.objects
    }

    fn interpolated_transform(
        &self,
        object: ObjectId,
    ) -> Result<InterpolatedTransform, AccessError> {
        self.transforms
            .get(&object)
            .cloned()
            .unwrap_or(Err(AccessError::NotRemoteObserver { object }))
    }
}

/// Mock implementation of [`ItemCatalog`].
///
/// Backed by a `HashMap<(item, damage), DrawItem>`.
#[derive(Clone, Debug, Default)]
pub struct MockCatalog {
    entries: HashMap<(String, i32), DrawItem>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, item: impl Into<String>, damage: i32, draw: DrawItem) -> Self {
        self.entries.insert((item.into(), damage), draw);
        self
    }
}

impl ItemCatalog for MockCatalog {
    fn resolve(&self, stack: &ItemStack) -> Option<DrawItem> {
        self.entries.get(&(stack.item.clone(), stack.damage)).cloned()
    }
}
