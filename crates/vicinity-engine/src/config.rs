//! Mission configuration, validation, and error types.
//!
//! [`MissionConfig`] is read from JSON and checked with
//! [`validate()`](MissionConfig::validate) before a
//! [`SensorMission`](crate::SensorMission) is built from it. Handler
//! parameters themselves are validated later, when each producer parses
//! them during setup.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use vicinity_obs::{EmissionPolicy, HandlerParams};

fn default_outbox_capacity() -> usize {
    64
}

// ── MissionConfig ──────────────────────────────────────────────────

/// Everything needed to run one sensing mission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MissionConfig {
    /// One entry per observation handler, in attach order.
    #[serde(default)]
    pub observation_producers: Vec<HandlerParams>,
    /// Stop after this many client ticks. `None` runs until told to stop.
    #[serde(default)]
    pub time_limit_ticks: Option<u64>,
    /// Which due channels appear in each frame.
    #[serde(default)]
    pub emission_policy: EmissionPolicy,
    /// Treat a handler that fails to attach as fatal. Default: `false`,
    /// which leaves the failed handler inert.
    #[serde(default)]
    pub strict_handlers: bool,
    /// Frames buffered for the consumer before new frames are dropped.
    /// Default: 64.
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            observation_producers: Vec::new(),
            time_limit_ticks: None,
            emission_policy: EmissionPolicy::default(),
            strict_handlers: false,
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

impl MissionConfig {
    /// Parse and validate a JSON mission description.
    pub fn from_json(json: &str) -> Result<Self, MissionError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), MissionError> {
        if self.outbox_capacity == 0 {
            return Err(MissionError::Config {
                reason: "outbox capacity must be at least 1".into(),
            });
        }
        if self.time_limit_ticks == Some(0) {
            return Err(MissionError::Config {
                reason: "time limit must be at least 1 tick".into(),
            });
        }
        Ok(())
    }
}

// ── MissionError ───────────────────────────────────────────────────

/// Errors raised while building or starting a mission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MissionError {
    /// The configuration is structurally invalid.
    Config {
        /// What is wrong with it.
        reason: String,
    },
    /// The configuration is not valid JSON for [`MissionConfig`].
    Json {
        /// Parser message.
        reason: String,
    },
    /// [`start`](crate::SensorMission::start) was called twice.
    AlreadyStarted,
}

impl fmt::Display for MissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config { reason } => write!(f, "invalid mission config: {reason}"),
            Self::Json { reason } => write!(f, "malformed mission JSON: {reason}"),
            Self::AlreadyStarted => write!(f, "mission already started"),
        }
    }
}

impl Error for MissionError {}

impl From<serde_json::Error> for MissionError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            reason: e.to_string(),
        }
    }
}
