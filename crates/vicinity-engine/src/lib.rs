//! Episode controller driving Vicinity observation producers.
//!
//! A mission moves through a small phase state machine
//! (setup → running → cleanup). [`EpisodeMachine`] owns the current
//! phase, forwards host events to it while it is live, and applies the
//! explicit [`PhaseOutcome`] each phase returns. [`SensorMission`] is the
//! concrete mission that attaches the configured observation producers
//! and samples them once per client tick.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod event;
pub mod machine;
pub mod mission;
pub mod phase;

pub use config::{MissionConfig, MissionError};
pub use event::HostEvent;
pub use machine::{EpisodeMachine, PhaseFactory, TransitionHandle};
pub use mission::{MissionContext, ObservationFrame, SensorMission};
pub use phase::{MissionState, Phase, PhaseError, PhaseOutcome, PhaseResult};
