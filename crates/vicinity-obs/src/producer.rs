//! Observation producer lifecycle and the nearby-entities producer.
//!
//! An [`ObservationProducer`] is attached to a mission with
//! [`parse_parameters`](ObservationProducer::parse_parameters), sampled
//! once per tick with
//! [`write_observations`](ObservationProducer::write_observations), and
//! detached with [`cleanup`](ObservationProducer::cleanup).

use std::sync::Arc;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, trace, warn};
use vicinity_core::{ItemCatalog, WorldView};

use crate::classify::{classify, Buckets};
use crate::descriptor::DescriptorBuilder;
use crate::emit::{emit, EmissionPolicy, ObservationDocument};
use crate::range::{ConfigError, NearbyEntitiesParams, RangeRegistry};
use crate::throttle::ThrottleScheduler;

/// Declarative configuration for one observation producer.
///
/// Tagged by `type`. Kinds this crate does not implement deserialize to
/// [`HandlerParams::Unsupported`], and a known kind whose body does not
/// parse deserializes to [`HandlerParams::Invalid`], so a mission still
/// loads and the failure surfaces when the producer attaches.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum HandlerParams {
    /// Parameters for [`NearbyEntitiesProducer`].
    ObservationFromNearbyEntities(NearbyEntitiesParams),
    /// A known handler kind with a malformed body.
    #[serde(skip_serializing)]
    Invalid {
        /// Handler kind named by `type`.
        kind: &'static str,
        /// Parser diagnostic.
        reason: String,
    },
    /// Any producer kind not implemented here.
    Unsupported,
}

impl HandlerParams {
    /// Handler kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ObservationFromNearbyEntities(_) => NearbyEntitiesProducer::KIND,
            Self::Invalid { kind, .. } => *kind,
            Self::Unsupported => "Unsupported",
        }
    }
}

impl<'de> Deserialize<'de> for HandlerParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut body = Value::deserialize(deserializer)?;
        let obj = body
            .as_object_mut()
            .ok_or_else(|| de::Error::custom("handler parameters must be an object"))?;
        let kind = match obj.remove("type") {
            Some(Value::String(kind)) => kind,
            Some(_) => return Err(de::Error::custom("handler `type` must be a string")),
            None => return Err(de::Error::missing_field("type")),
        };
        if kind != NearbyEntitiesProducer::KIND {
            return Ok(Self::Unsupported);
        }
        Ok(match serde_json::from_value(body) {
            Ok(params) => Self::ObservationFromNearbyEntities(params),
            Err(e) => Self::Invalid {
                kind: NearbyEntitiesProducer::KIND,
                reason: e.to_string(),
            },
        })
    }
}

/// A mission handler that contributes keys to the per-tick observation.
pub trait ObservationProducer: Send {
    /// Handler kind, for diagnostics.
    fn name(&self) -> &str;

    /// Attach to a configuration.
    ///
    /// Returns `false` when the parameters are absent, of the wrong
    /// kind, or invalid; the producer then stays inert.
    fn parse_parameters(&mut self, params: &HandlerParams) -> bool;

    /// Called once when the mission starts running.
    fn prepare(&mut self) {}

    /// Sample the world and merge this producer's keys into `json`.
    fn write_observations(&mut self, json: &mut Map<String, Value>, world: &dyn WorldView);

    /// Called once when the mission stops running.
    fn cleanup(&mut self) {}
}

/// Reports objects near the observer, one key per configured channel.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vicinity_core::NullCatalog;
/// use vicinity_obs::{NearbyEntitiesParams, NearbyEntitiesProducer, RangeDefinition};
///
/// let params = NearbyEntitiesParams {
///     range: vec![RangeDefinition::new("near", 2.0, 2.0, 2.0, 1)],
/// };
/// let producer = NearbyEntitiesProducer::from_params(Arc::new(NullCatalog), &params).unwrap();
/// assert!(producer.is_active());
/// ```
pub struct NearbyEntitiesProducer {
    catalog: Arc<dyn ItemCatalog>,
    policy: EmissionPolicy,
    scheduler: Option<ThrottleScheduler>,
    buckets: Buckets,
}

impl NearbyEntitiesProducer {
    /// Handler kind accepted by [`parse_parameters`](ObservationProducer::parse_parameters).
    pub const KIND: &'static str = "ObservationFromNearbyEntities";

    /// An inert producer resolving items through `catalog`.
    pub fn new(catalog: Arc<dyn ItemCatalog>) -> Self {
        Self {
            catalog,
            policy: EmissionPolicy::default(),
            scheduler: None,
            buckets: Buckets::new(),
        }
    }

    /// Set the emission policy, consuming and returning `self`.
    pub fn with_policy(mut self, policy: EmissionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// A producer already attached to `params`.
    pub fn from_params(
        catalog: Arc<dyn ItemCatalog>,
        params: &NearbyEntitiesParams,
    ) -> Result<Self, ConfigError> {
        let mut producer = Self::new(catalog);
        producer.configure(params)?;
        Ok(producer)
    }

    /// Validate `params` and (re)attach to them, resetting throttle state.
    pub fn configure(&mut self, params: &NearbyEntitiesParams) -> Result<(), ConfigError> {
        let registry = RangeRegistry::from_params(params)?;
        debug!(channels = registry.len(), "nearby-entities producer attached");
        self.scheduler = Some(ThrottleScheduler::new(registry));
        Ok(())
    }

    /// Whether the producer is attached to a valid configuration.
    pub fn is_active(&self) -> bool {
        self.scheduler.is_some()
    }

    /// The emission policy in use.
    pub fn policy(&self) -> EmissionPolicy {
        self.policy
    }

    /// Throttle state, if attached.
    pub fn scheduler(&self) -> Option<&ThrottleScheduler> {
        self.scheduler.as_ref()
    }

    /// Run one tick of the pipeline and return the typed document.
    ///
    /// Returns `None` when inert. Advances the tick counter even when no
    /// channel is due.
    pub fn observe(&mut self, world: &dyn WorldView) -> Option<ObservationDocument> {
        let scheduler = self.scheduler.as_mut()?;
        let due = scheduler.advance();
        let tick = scheduler.current_tick();
        let scheduler = &*scheduler;
        let due_ranges = scheduler.due_ranges(&due);

        let observer = world.observer();
        let objects = world.loaded_objects();
        classify(&due_ranges, &observer, objects, &mut self.buckets);

        let builder = DescriptorBuilder::new(self.catalog.as_ref());
        let doc = emit(&due_ranges, &self.buckets, world, &builder, self.policy);
        trace!(
            %tick,
            due = due_ranges.len(),
            objects = objects.len(),
            matched = self.buckets.total_entries(),
            emitted = doc.len(),
            "nearby-entities sample"
        );
        Some(doc)
    }
}

impl ObservationProducer for NearbyEntitiesProducer {
    fn name(&self) -> &str {
        Self::KIND
    }

    fn parse_parameters(&mut self, params: &HandlerParams) -> bool {
        let result = match params {
            HandlerParams::ObservationFromNearbyEntities(p) => self.configure(p),
            HandlerParams::Invalid { kind, reason } if *kind == Self::KIND => {
                Err(ConfigError::Json {
                    reason: reason.clone(),
                })
            }
            other => Err(ConfigError::WrongHandler {
                expected: Self::KIND,
                found: other.kind(),
            }),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "nearby-entities producer not activated");
                self.scheduler = None;
                false
            }
        }
    }

    fn prepare(&mut self) {
        if let Some(scheduler) = self.scheduler.as_mut() {
            scheduler.reset();
        }
    }

    fn write_observations(&mut self, json: &mut Map<String, Value>, world: &dyn WorldView) {
        if let Some(doc) = self.observe(world) {
            doc.write_into(json);
        }
    }

    fn cleanup(&mut self) {
        self.scheduler = None;
        self.buckets.clear();
    }
}

impl std::fmt::Debug for NearbyEntitiesProducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NearbyEntitiesProducer")
            .field("policy", &self.policy)
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::RangeDefinition;
    use serde_json::json;
    use vicinity_core::{NullCatalog, ObserverFrame, TickId, Vec3, WorldObject};
    use vicinity_test_utils::MockWorld;

    fn params(ranges: Vec<RangeDefinition>) -> HandlerParams {
        HandlerParams::ObservationFromNearbyEntities(NearbyEntitiesParams { range: ranges })
    }

    fn producer() -> NearbyEntitiesProducer {
        NearbyEntitiesProducer::new(Arc::new(NullCatalog))
    }

    fn world() -> MockWorld {
        MockWorld::new()
            .with_observer(ObserverFrame::at(Vec3::default()))
            .with_object(WorldObject::generic(1, "Pig", Vec3::new(1.0, 1.0, 1.0)))
    }

    #[test]
    fn inert_until_parsed() {
        let mut p = producer();
        assert!(!p.is_active());
        let mut json = Map::new();
        p.write_observations(&mut json, &world());
        assert!(json.is_empty());
        assert!(p.observe(&world()).is_none());
    }

    #[test]
    fn parse_accepts_valid_params() {
        let mut p = producer();
        assert!(p.parse_parameters(&params(vec![RangeDefinition::new("near", 2.0, 2.0, 2.0, 1)])));
        assert!(p.is_active());
    }

    #[test]
    fn parse_rejects_invalid_params() {
        let mut p = producer();
        let bad = params(vec![RangeDefinition::new("near", 2.0, 2.0, 2.0, 0)]);
        assert!(!p.parse_parameters(&bad));
        assert!(!p.is_active());
    }

    #[test]
    fn parse_rejects_other_handler_kinds() {
        let mut p = producer();
        assert!(!p.parse_parameters(&HandlerParams::Unsupported));
        assert!(!p.is_active());
    }

    #[test]
    fn failed_reparse_deactivates() {
        let mut p = producer();
        assert!(p.parse_parameters(&params(vec![RangeDefinition::new("a", 1.0, 1.0, 1.0, 1)])));
        assert!(!p.parse_parameters(&HandlerParams::Unsupported));
        assert!(!p.is_active());
    }

    #[test]
    fn unknown_handler_kind_deserializes_as_unsupported() {
        let hp: HandlerParams =
            serde_json::from_str(r#"{"type":"ObservationFromFullStats"}"#).unwrap();
        assert_eq!(hp, HandlerParams::Unsupported);
        let hp: HandlerParams = serde_json::from_value(json!({
            "type": "ObservationFromNearbyEntities",
            "range": [{ "name": "n", "xrange": 1, "yrange": 1, "zrange": 1 }]
        }))
        .unwrap();
        assert_eq!(hp.kind(), NearbyEntitiesProducer::KIND);
    }

    #[test]
    fn handler_without_type_is_a_parse_error() {
        let err = serde_json::from_str::<HandlerParams>(r#"{"range":[]}"#).unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn misspelled_range_key_loads_but_does_not_attach() {
        // snake_case is not the configured spelling; it must not fall
        // back to the default frequency.
        let hp: HandlerParams = serde_json::from_value(json!({
            "type": "ObservationFromNearbyEntities",
            "range": [{
                "name": "slow", "xrange": 2, "yrange": 2, "zrange": 2,
                "update_frequency": 10
            }]
        }))
        .unwrap();
        assert!(matches!(hp, HandlerParams::Invalid { .. }));
        assert_eq!(hp.kind(), NearbyEntitiesProducer::KIND);

        let mut p = producer();
        assert!(!p.parse_parameters(&hp));
        assert!(!p.is_active());
    }

    #[test]
    fn camel_case_frequency_is_honoured() {
        let hp: HandlerParams = serde_json::from_value(json!({
            "type": "ObservationFromNearbyEntities",
            "range": [{
                "name": "slow", "xrange": 2, "yrange": 2, "zrange": 2,
                "updateFrequency": 10
            }]
        }))
        .unwrap();
        let mut p = producer();
        assert!(p.parse_parameters(&hp));
        let w = world();
        let fired = (0..10)
            .filter(|_| p.observe(&w).is_some_and(|doc| doc.contains("slow")))
            .count();
        assert_eq!(fired, 1);
    }

    #[test]
    fn writes_due_channels_into_json() {
        let mut p = producer();
        p.parse_parameters(&params(vec![
            RangeDefinition::new("near", 2.0, 2.0, 2.0, 1),
            RangeDefinition::new("slow", 2.0, 2.0, 2.0, 2),
        ]));
        let w = world();

        let mut json = Map::new();
        p.write_observations(&mut json, &w);
        assert_eq!(json.keys().collect::<Vec<_>>(), vec!["near"]);

        let mut json = Map::new();
        p.write_observations(&mut json, &w);
        assert_eq!(json.keys().collect::<Vec<_>>(), vec!["near", "slow"]);
        assert_eq!(json["slow"][0]["name"], json!("Pig"));
    }

    #[test]
    fn prepare_resets_throttle() {
        let mut p = producer();
        p.parse_parameters(&params(vec![RangeDefinition::new("n", 2.0, 2.0, 2.0, 1)]));
        p.observe(&world());
        p.observe(&world());
        assert_eq!(p.scheduler().unwrap().current_tick(), TickId(2));
        p.prepare();
        assert_eq!(p.scheduler().unwrap().current_tick(), TickId(0));
    }

    #[test]
    fn cleanup_detaches() {
        let mut p = producer();
        p.parse_parameters(&params(vec![RangeDefinition::new("n", 2.0, 2.0, 2.0, 1)]));
        p.cleanup();
        assert!(!p.is_active());
        assert!(p.observe(&world()).is_none());
    }

    #[test]
    fn non_empty_policy_is_applied() {
        let mut p = producer().with_policy(EmissionPolicy::NonEmptyOnly);
        p.parse_parameters(&params(vec![
            RangeDefinition::new("near", 2.0, 2.0, 2.0, 1),
            RangeDefinition::new("tiny", 0.5, 0.5, 0.5, 1),
        ]));
        let doc = p.observe(&world()).unwrap();
        assert!(doc.contains("near"));
        assert!(!doc.contains("tiny"));
    }
}
