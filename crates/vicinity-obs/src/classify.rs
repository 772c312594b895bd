//! Spatial classification of loaded objects into due channels.
//!
//! An object belongs to a channel when it lies strictly inside the
//! channel's half-extents box centred on the observer. Channels are
//! not exclusive: one object can land in several buckets on the same
//! tick.

use vicinity_core::{ObserverFrame, Vec3, WorldObject};

use crate::range::RangeDefinition;

/// Whether `position` lies strictly inside `range`'s box around `observer`.
///
/// Points exactly on a face are outside. Non-finite coordinates are
/// always outside.
pub fn contains(range: &RangeDefinition, observer: &ObserverFrame, position: &Vec3) -> bool {
    let d = position.abs_delta(&observer.position);
    d.x < range.xrange() && d.y < range.yrange() && d.z < range.zrange()
}

/// Per-channel object buckets, reused across ticks.
///
/// Bucket `i` holds indices into the object slice passed to
/// [`classify`], for the `i`-th due channel of that tick. Inner vectors
/// keep their capacity between ticks, so steady-state classification
/// does not allocate.
#[derive(Clone, Debug, Default)]
pub struct Buckets {
    lists: Vec<Vec<usize>>,
    active: usize,
}

impl Buckets {
    /// Empty bucket set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepare `n` empty buckets, retaining prior allocations.
    pub fn reset(&mut self, n: usize) {
        if self.lists.len() < n {
            self.lists.resize_with(n, Vec::new);
        }
        for list in &mut self.lists[..n] {
            list.clear();
        }
        self.active = n;
    }

    /// Object indices for the `i`-th due channel.
    pub fn get(&self, i: usize) -> Option<&[usize]> {
        self.active_lists().get(i).map(Vec::as_slice)
    }

    /// Active buckets in due-channel order.
    pub fn iter(&self) -> impl Iterator<Item = &[usize]> {
        self.active_lists().iter().map(Vec::as_slice)
    }

    /// Number of active buckets.
    pub fn len(&self) -> usize {
        self.active
    }

    /// Whether there are no active buckets.
    pub fn is_empty(&self) -> bool {
        self.active == 0
    }

    /// Total bucket entries across all active buckets.
    pub fn total_entries(&self) -> usize {
        self.iter().map(<[usize]>::len).sum()
    }

    /// Release all retained capacity.
    pub fn clear(&mut self) {
        self.lists.clear();
        self.active = 0;
    }

    fn active_lists(&self) -> &[Vec<usize>] {
        &self.lists[..self.active]
    }
}

/// Bucket every object into every due channel whose box contains it.
///
/// `due` is the tick's due channels in order; on return `buckets` has
/// exactly `due.len()` buckets in the same order. Cost is
/// O(objects × due channels).
pub fn classify(
    due: &[&RangeDefinition],
    observer: &ObserverFrame,
    objects: &[WorldObject],
    buckets: &mut Buckets,
) {
    buckets.reset(due.len());
    if due.is_empty() {
        return;
    }
    for (obj_idx, object) in objects.iter().enumerate() {
        for (bucket, range) in buckets.lists[..due.len()].iter_mut().zip(due) {
            if contains(range, observer, &object.position) {
                bucket.push(obj_idx);
            }
        }
    }
}
