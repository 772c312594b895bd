//! Strongly-typed identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Monotonically increasing tick counter.
///
/// Incremented each time the sensor is sampled. `TickId(0)` is the
/// state before the first sample, so the first sampled tick is `TickId(1)`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TickId(pub u64);

impl TickId {
    /// Ticks elapsed since `earlier`, saturating at zero.
    pub fn since(self, earlier: TickId) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// The tick after this one.
    pub fn next(self) -> TickId {
        TickId(self.0 + 1)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Identifies an object loaded in the host world.
///
/// Assigned by the host; stable for as long as the object stays loaded.
/// Used to look up privileged per-object state such as a remote
/// observer's interpolated transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ObjectId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}
