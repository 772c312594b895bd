//! Range definitions and the validated range registry.
//!
//! A [`RangeDefinition`] is one observation channel: a name, an
//! axis-aligned half-extents box around the observer, and an update
//! frequency in ticks. A [`RangeRegistry`] is the validated, ordered
//! set of channels for one sensor; it is immutable once built.

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a [`RangeRegistry`] or attaching a
/// producer to its configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A range has an empty name.
    EmptyName {
        /// Position of the offending range in the configured list.
        index: usize,
    },
    /// A half-extent is zero, negative, or not finite.
    InvalidExtent {
        /// Name of the offending range.
        name: String,
        /// Axis of the offending extent (`'x'`, `'y'` or `'z'`).
        axis: char,
        /// The invalid value.
        value: f64,
    },
    /// Update frequency is zero.
    InvalidFrequency {
        /// Name of the offending range.
        name: String,
    },
    /// Two ranges share a name; names key the output document.
    DuplicateName {
        /// The repeated name.
        name: String,
    },
    /// The producer was handed parameters for a different handler.
    WrongHandler {
        /// Handler kind the producer accepts.
        expected: &'static str,
        /// Handler kind it was given.
        found: &'static str,
    },
    /// The declarative configuration could not be parsed.
    Json {
        /// Parser diagnostic.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName { index } => write!(f, "range {index} has an empty name"),
            Self::InvalidExtent { name, axis, value } => {
                write!(
                    f,
                    "range '{name}': {axis}range must be finite and > 0, got {value}"
                )
            }
            Self::InvalidFrequency { name } => {
                write!(f, "range '{name}': updateFrequency must be >= 1")
            }
            Self::DuplicateName { name } => write!(f, "duplicate range name '{name}'"),
            Self::WrongHandler { expected, found } => {
                write!(f, "expected {expected} parameters, got {found}")
            }
            Self::Json { reason } => write!(f, "invalid configuration: {reason}"),
        }
    }
}

impl Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            reason: e.to_string(),
        }
    }
}

// ── RangeDefinition ────────────────────────────────────────────────

fn default_update_frequency() -> u32 {
    1
}

/// One configured observation channel.
///
/// Unvalidated on its own; only a [`RangeRegistry`] guarantees positive
/// extents, a non-zero frequency, and a unique name.
///
/// # Examples
///
/// ```
/// use vicinity_obs::RangeDefinition;
///
/// let near = RangeDefinition::new("near", 2.0, 2.0, 2.0, 1);
/// assert_eq!(near.name(), "near");
/// assert_eq!(near.update_frequency(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RangeDefinition {
    name: String,
    xrange: f64,
    yrange: f64,
    zrange: f64,
    #[serde(default = "default_update_frequency")]
    update_frequency: u32,
}

impl RangeDefinition {
    /// Describe a channel. Validation happens in [`RangeRegistry::new`].
    pub fn new(
        name: impl Into<String>,
        xrange: f64,
        yrange: f64,
        zrange: f64,
        update_frequency: u32,
    ) -> Self {
        Self {
            name: name.into(),
            xrange,
            yrange,
            zrange,
            update_frequency,
        }
    }

    /// Output key for this channel.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Half-extent along x.
    pub fn xrange(&self) -> f64 {
        self.xrange
    }

    /// Half-extent along y.
    pub fn yrange(&self) -> f64 {
        self.yrange
    }

    /// Half-extent along z.
    pub fn zrange(&self) -> f64 {
        self.zrange
    }

    /// Ticks between firings.
    pub fn update_frequency(&self) -> u32 {
        self.update_frequency
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName { index });
        }
        for (axis, value) in [('x', self.xrange), ('y', self.yrange), ('z', self.zrange)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidExtent {
                    name: self.name.clone(),
                    axis,
                    value,
                });
            }
        }
        if self.update_frequency == 0 {
            return Err(ConfigError::InvalidFrequency {
                name: self.name.clone(),
            });
        }
        Ok(())
    }
}

// ── NearbyEntitiesParams ───────────────────────────────────────────

/// Declarative configuration for the nearby-entities producer.
///
/// ```
/// use vicinity_obs::NearbyEntitiesParams;
///
/// let params: NearbyEntitiesParams = serde_json::from_str(
///     r#"{"range":[{"name":"near","xrange":2,"yrange":2,"zrange":2}]}"#,
/// ).unwrap();
/// assert_eq!(params.range[0].update_frequency(), 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NearbyEntitiesParams {
    /// Channels, in output order.
    #[serde(default)]
    pub range: Vec<RangeDefinition>,
}

impl NearbyEntitiesParams {
    /// Parse from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

// ── RangeRegistry ──────────────────────────────────────────────────

/// Validated, ordered set of channels for one sensor instance.
///
/// An empty registry is valid: the sensor then emits nothing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeRegistry {
    ranges: Vec<RangeDefinition>,
}

impl RangeRegistry {
    /// Validate `ranges` and freeze them in the given order.
    ///
    /// Rejects empty names, non-positive or non-finite extents, a zero
    /// update frequency, and repeated names. The first offending range
    /// is reported.
    pub fn new(ranges: Vec<RangeDefinition>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::with_capacity(ranges.len());
        for (i, range) in ranges.iter().enumerate() {
            range.validate(i)?;
            if !seen.insert(range.name.as_str()) {
                return Err(ConfigError::DuplicateName {
                    name: range.name.clone(),
                });
            }
        }
        Ok(Self { ranges })
    }

    /// Validate the ranges of a parsed configuration.
    pub fn from_params(params: &NearbyEntitiesParams) -> Result<Self, ConfigError> {
        Self::new(params.range.clone())
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether no channels are configured.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Channel at position `i`.
    pub fn get(&self, i: usize) -> Option<&RangeDefinition> {
        self.ranges.get(i)
    }

    /// Channels in configured order.
    pub fn iter(&self) -> std::slice::Iter<'_, RangeDefinition> {
        self.ranges.iter()
    }

    /// Channel names in configured order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ranges.iter().map(|r| r.name())
    }

    pub(crate) fn into_ranges(self) -> Vec<RangeDefinition> {
        self.ranges
    }
}

impl<'a> IntoIterator for &'a RangeRegistry {
    type Item = &'a RangeDefinition;
    type IntoIter = std::slice::Iter<'a, RangeDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
