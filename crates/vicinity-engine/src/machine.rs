//! The episode state machine.
//!
//! [`EpisodeMachine`] runs one [`Phase`] at a time. Phases finish by
//! returning a [`PhaseOutcome`]; the machine queues the requested state
//! and [`pump`](EpisodeMachine::pump)s the queue, retiring the old phase
//! before building and executing the next. A fatal [`PhaseError`]
//! always ends in [`MissionState::Errored`].
//!
//! # Threading
//!
//! The machine itself is driven from one thread. Transition requests
//! can come from anywhere through a [`TransitionHandle`]; they take
//! effect on the next `pump()`, `start()` or `dispatch()`.

use crossbeam_channel::{Receiver, Sender};
use tracing::{debug, error, trace, warn};

use crate::event::HostEvent;
use crate::phase::{MissionState, Phase, PhaseOutcome, PhaseResult};

/// Builds the phase for a non-terminal state.
pub type PhaseFactory<C> = Box<dyn FnMut(MissionState) -> Box<dyn Phase<C>> + Send>;

/// Cloneable, thread-safe handle for requesting state changes.
#[derive(Clone, Debug)]
pub struct TransitionHandle {
    tx: Sender<MissionState>,
}

impl TransitionHandle {
    /// Queue a transition to `next`.
    ///
    /// Returns `false` if the machine has been dropped.
    pub fn request(&self, next: MissionState) -> bool {
        self.tx.send(next).is_ok()
    }
}

/// Phase state machine over shared context `C`.
pub struct EpisodeMachine<C> {
    context: C,
    factory: PhaseFactory<C>,
    initial: MissionState,
    state: MissionState,
    current: Option<Box<dyn Phase<C>>>,
    live: bool,
    started: bool,
    error_details: Option<String>,
    history: Vec<MissionState>,
    tx: Sender<MissionState>,
    rx: Receiver<MissionState>,
}

impl<C> EpisodeMachine<C> {
    /// A machine that will enter `initial` on [`start`](Self::start).
    pub fn new(initial: MissionState, context: C, factory: PhaseFactory<C>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            context,
            factory,
            initial,
            state: initial,
            current: None,
            live: false,
            started: false,
            error_details: None,
            history: Vec::new(),
            tx,
            rx,
        }
    }

    /// Enter the initial state and run until a phase is pending or the
    /// machine is terminal. A second call does nothing.
    pub fn start(&mut self) -> MissionState {
        if self.started {
            warn!(state = %self.state, "episode machine already started");
            return self.state;
        }
        self.started = true;
        self.enter(self.initial);
        self.pump()
    }

    /// Forward `event` to the live phase, then apply any transitions.
    ///
    /// Ignored when no phase is live.
    pub fn dispatch(&mut self, event: &HostEvent<'_>) -> MissionState {
        if !self.live {
            trace!(event = event.name(), state = %self.state, "event ignored: no live phase");
            return self.pump();
        }
        if let Some(mut phase) = self.current.take() {
            let result = phase.on_event(&mut self.context, event);
            self.current = Some(phase);
            self.apply(result);
        }
        self.pump()
    }

    /// Queue a transition to `next`.
    pub fn queue_state_change(&self, next: MissionState) {
        if self.tx.send(next).is_err() {
            // Receiver lives in self; unreachable while self exists.
            warn!(%next, "transition queue closed");
        }
    }

    /// A handle for requesting transitions from other threads.
    pub fn handle(&self) -> TransitionHandle {
        TransitionHandle {
            tx: self.tx.clone(),
        }
    }

    /// Record error details; the latest message wins.
    pub fn save_error_details(&mut self, details: impl Into<String>) {
        self.error_details = Some(details.into());
    }

    /// Apply every queued transition. Returns the resulting state.
    pub fn pump(&mut self) -> MissionState {
        while let Ok(next) = self.rx.try_recv() {
            if self.state.is_terminal() {
                debug!(%next, state = %self.state, "transition ignored: machine is terminal");
                continue;
            }
            self.enter(next);
        }
        self.state
    }

    /// Current state.
    pub fn state(&self) -> MissionState {
        self.state
    }

    /// Whether [`start`](Self::start) has been called.
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Whether a phase is live and receiving events.
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Error details recorded by the last abnormal completion, if any.
    pub fn error_details(&self) -> Option<&str> {
        self.error_details.as_deref()
    }

    /// Every state entered, in order.
    pub fn history(&self) -> &[MissionState] {
        &self.history
    }

    /// Shared context.
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Shared context, mutably.
    pub fn context_mut(&mut self) -> &mut C {
        &mut self.context
    }

    /// Tear down the live phase (if any) and return the context.
    pub fn into_context(mut self) -> C {
        self.retire();
        self.context
    }

    fn retire(&mut self) {
        self.live = false;
        if let Some(mut phase) = self.current.take() {
            trace!(state = %phase.state(), "retiring phase");
            phase.cleanup(&mut self.context);
        }
    }

    fn enter(&mut self, next: MissionState) {
        self.retire();
        debug!(from = %self.state, to = %next, "mission state change");
        self.state = next;
        self.history.push(next);
        if next.is_terminal() {
            return;
        }
        let mut phase = (self.factory)(next);
        self.live = true;
        let result = phase.execute(&mut self.context);
        self.current = Some(phase);
        self.apply(result);
    }

    fn apply(&mut self, result: PhaseResult) {
        match result {
            Ok(PhaseOutcome::Pending) => {}
            Ok(PhaseOutcome::Completed { next }) => self.complete(next),
            Ok(PhaseOutcome::CompletedWithError { next, error }) => {
                warn!(state = %self.state, %next, %error, "phase completed with error");
                self.save_error_details(error);
                self.complete(next);
            }
            Err(e) => {
                error!(state = %self.state, error = %e, "phase failed");
                self.save_error_details(e.to_string());
                self.complete(MissionState::Errored);
            }
        }
    }

    fn complete(&mut self, next: MissionState) {
        self.live = false;
        self.queue_state_change(next);
    }
}

impl<C> std::fmt::Debug for EpisodeMachine<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EpisodeMachine")
            .field("state", &self.state)
            .field("live", &self.live)
            .field("error_details", &self.error_details)
            .finish_non_exhaustive()
    }
}
