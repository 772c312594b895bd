//! Phase trait and the explicit outcome each phase reports.

use std::error::Error;
use std::fmt;

use crate::event::HostEvent;

// ── MissionState ───────────────────────────────────────────────────

/// States of the mission state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MissionState {
    /// Handlers are being created and attached.
    Setup,
    /// The mission is live; producers are sampled every client tick.
    Running,
    /// Handlers are being detached.
    Cleanup,
    /// Finished normally. Terminal.
    Ended,
    /// Aborted by a fatal phase error. Terminal.
    Errored,
}

impl MissionState {
    /// Whether no further transitions are accepted.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Errored)
    }
}

impl fmt::Display for MissionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Setup => "setup",
            Self::Running => "running",
            Self::Cleanup => "cleanup",
            Self::Ended => "ended",
            Self::Errored => "errored",
        };
        f.write_str(s)
    }
}

// ── PhaseOutcome / PhaseError ──────────────────────────────────────

/// Non-fatal result of a phase's work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseOutcome {
    /// Stay live and keep receiving events.
    Pending,
    /// Done; hand off to `next`.
    Completed {
        /// The state to enter.
        next: MissionState,
    },
    /// Done abnormally; record `error` and hand off to `next`.
    CompletedWithError {
        /// The state to enter.
        next: MissionState,
        /// Recorded on the machine as the mission's error details.
        error: String,
    },
}

impl PhaseOutcome {
    /// Shorthand for [`PhaseOutcome::Completed`].
    pub fn completed(next: MissionState) -> Self {
        Self::Completed { next }
    }
}

/// Fatal failure of a phase. The machine moves to
/// [`MissionState::Errored`] and records the message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhaseError {
    /// The phase's own work failed.
    ExecutionFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
    /// A handler could not be attached.
    Producer {
        /// Handler kind.
        name: String,
        /// Why it could not be attached.
        reason: String,
    },
}

impl fmt::Display for PhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExecutionFailed { reason } => write!(f, "phase execution failed: {reason}"),
            Self::Producer { name, reason } => write!(f, "handler '{name}' failed: {reason}"),
        }
    }
}

impl Error for PhaseError {}

/// What every phase entry point returns.
pub type PhaseResult = Result<PhaseOutcome, PhaseError>;

// ── Phase ──────────────────────────────────────────────────────────

/// One state's behaviour, operating on shared context `C`.
///
/// A phase is built by the machine's factory when its state is entered,
/// [`execute`](Self::execute)d once, then receives events through
/// [`on_event`](Self::on_event) until it completes. It is retired with
/// [`cleanup`](Self::cleanup) before the next phase starts.
pub trait Phase<C>: Send {
    /// The state this phase implements.
    fn state(&self) -> MissionState;

    /// Entry work for the state.
    fn execute(&mut self, ctx: &mut C) -> PhaseResult;

    /// React to a host event while live.
    fn on_event(&mut self, _ctx: &mut C, _event: &HostEvent<'_>) -> PhaseResult {
        Ok(PhaseOutcome::Pending)
    }

    /// Release anything acquired by the phase.
    fn cleanup(&mut self, _ctx: &mut C) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states() {
        assert!(MissionState::Ended.is_terminal());
        assert!(MissionState::Errored.is_terminal());
        assert!(!MissionState::Setup.is_terminal());
        assert!(!MissionState::Running.is_terminal());
        assert!(!MissionState::Cleanup.is_terminal());
    }

    #[test]
    fn error_display() {
        let e = PhaseError::Producer {
            name: "ObservationFromNearbyEntities".into(),
            reason: "duplicate range name 'near'".into(),
        };
        assert_eq!(
            e.to_string(),
            "handler 'ObservationFromNearbyEntities' failed: duplicate range name 'near'"
        );
    }
}
