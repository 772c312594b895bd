//! Assembly of the per-tick observation document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;
use vicinity_core::WorldView;

use crate::classify::Buckets;
use crate::descriptor::{DescriptorBuilder, ObservationRecord};
use crate::range::RangeDefinition;

/// Which due channels appear in the output document.
///
/// Both policies look at each channel's own bucket, so the result does
/// not depend on what the other channels contained.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmissionPolicy {
    /// Every due channel, with an empty array when nothing matched.
    #[default]
    AllDue,
    /// Only due channels with at least one record.
    NonEmptyOnly,
}

impl EmissionPolicy {
    fn emits(self, bucket: &[usize]) -> bool {
        match self {
            Self::AllDue => true,
            Self::NonEmptyOnly => !bucket.is_empty(),
        }
    }
}

/// One tick's observations, keyed by channel name in due order.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ObservationDocument {
    channels: IndexMap<String, Vec<ObservationRecord>>,
}

impl ObservationDocument {
    /// Empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a channel; replaces (and returns) any records already under `name`.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        records: Vec<ObservationRecord>,
    ) -> Option<Vec<ObservationRecord>> {
        self.channels.insert(name.into(), records)
    }

    /// Records for channel `name`.
    pub fn get(&self, name: &str) -> Option<&[ObservationRecord]> {
        self.channels.get(name).map(Vec::as_slice)
    }

    /// Whether channel `name` was emitted.
    pub fn contains(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Number of emitted channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channels were emitted.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channels in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ObservationRecord])> {
        self.channels
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Channel names in emission order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.keys().map(String::as_str)
    }

    /// Merge every channel into an existing JSON object.
    ///
    /// Existing keys with the same name are overwritten.
    pub fn write_into(&self, json: &mut Map<String, Value>) {
        for (name, records) in &self.channels {
            match serde_json::to_value(records) {
                Ok(value) => {
                    json.insert(name.clone(), value);
                }
                Err(e) => warn!(channel = %name, error = %e, "failed to serialize channel"),
            }
        }
    }

    /// The document as a JSON object.
    pub fn to_json(&self) -> Value {
        let mut json = Map::new();
        self.write_into(&mut json);
        Value::Object(json)
    }
}

/// Build the document for one tick.
///
/// `due` and `buckets` must come from the same [`classify`](crate::classify())
/// call over `world`'s loaded objects. Bucket entries that no longer
/// index a loaded object are skipped.
pub fn emit(
    due: &[&RangeDefinition],
    buckets: &Buckets,
    world: &dyn WorldView,
    builder: &DescriptorBuilder<'_>,
    policy: EmissionPolicy,
) -> ObservationDocument {
    let objects = world.loaded_objects();
    let mut doc = ObservationDocument::new();
    for (range, bucket) in due.iter().zip(buckets.iter()) {
        if !policy.emits(bucket) {
            continue;
        }
        let records = bucket
            .iter()
            .filter_map(|&i| objects.get(i))
            .map(|object| builder.describe(world, object))
            .collect();
        doc.insert(range.name(), records);
    }
    doc
}
