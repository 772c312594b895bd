//! A sensing mission: producers attached in setup, sampled every client
//! tick while running, and detached in cleanup.
//!
//! [`SensorMission`] wires an [`EpisodeMachine`] to three phases over a
//! shared [`MissionContext`]. Each client tick yields one
//! [`ObservationFrame`] on a bounded crossbeam channel; when the consumer
//! falls behind or goes away the frame is dropped and the tick carries on.

use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use vicinity_core::{ItemCatalog, TickId, WorldView};
use vicinity_obs::{HandlerParams, NearbyEntitiesProducer, ObservationProducer};

use crate::config::{MissionConfig, MissionError};
use crate::event::HostEvent;
use crate::machine::{EpisodeMachine, PhaseFactory, TransitionHandle};
use crate::phase::{MissionState, Phase, PhaseError, PhaseOutcome, PhaseResult};

/// One client tick's merged observations.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ObservationFrame {
    /// Client tick the frame was sampled on, starting at 1.
    pub tick: TickId,
    /// Every attached producer's keys, merged into one JSON object.
    pub observations: Value,
}

/// State shared by the mission phases.
pub struct MissionContext {
    config: MissionConfig,
    catalog: Arc<dyn ItemCatalog>,
    producers: Vec<Box<dyn ObservationProducer>>,
    outbox: Sender<ObservationFrame>,
    ticks: u64,
    frames_dropped: u64,
}

impl MissionContext {
    /// Producers that attached successfully.
    pub fn producers(&self) -> impl Iterator<Item = &dyn ObservationProducer> {
        self.producers.iter().map(|p| p.as_ref())
    }

    /// Client ticks seen while running.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Frames the consumer did not receive.
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    fn build_producer(&self, params: &HandlerParams) -> Option<Box<dyn ObservationProducer>> {
        if params.kind() != NearbyEntitiesProducer::KIND {
            return None;
        }
        Some(Box::new(
            NearbyEntitiesProducer::new(Arc::clone(&self.catalog))
                .with_policy(self.config.emission_policy),
        ))
    }

    fn send(&mut self, frame: ObservationFrame) {
        match self.outbox.try_send(frame) {
            Ok(()) => {}
            Err(TrySendError::Full(frame)) => {
                self.frames_dropped += 1;
                debug!(tick = %frame.tick, "outbox full, frame dropped");
            }
            Err(TrySendError::Disconnected(frame)) => {
                self.frames_dropped += 1;
                debug!(tick = %frame.tick, "observation consumer gone, frame dropped");
            }
        }
    }
}

impl std::fmt::Debug for MissionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MissionContext")
            .field("producers", &self.producers.len())
            .field("ticks", &self.ticks)
            .field("frames_dropped", &self.frames_dropped)
            .finish_non_exhaustive()
    }
}

// ── Phases ─────────────────────────────────────────────────────────

struct SetupPhase;

impl Phase<MissionContext> for SetupPhase {
    fn state(&self) -> MissionState {
        MissionState::Setup
    }

    fn execute(&mut self, ctx: &mut MissionContext) -> PhaseResult {
        let handlers = ctx.config.observation_producers.clone();
        for params in &handlers {
            let attached = match ctx.build_producer(params) {
                Some(mut producer) => {
                    if producer.parse_parameters(params) {
                        ctx.producers.push(producer);
                        Ok(())
                    } else {
                        Err("parameters rejected")
                    }
                }
                None => Err("no producer for this handler kind"),
            };
            if let Err(reason) = attached {
                if ctx.config.strict_handlers {
                    return Err(PhaseError::Producer {
                        name: params.kind().to_string(),
                        reason: reason.to_string(),
                    });
                }
                warn!(handler = params.kind(), reason, "handler left inert");
            }
        }
        info!(
            attached = ctx.producers.len(),
            configured = handlers.len(),
            "mission handlers attached"
        );
        Ok(PhaseOutcome::completed(MissionState::Running))
    }
}

struct RunningPhase;

impl Phase<MissionContext> for RunningPhase {
    fn state(&self) -> MissionState {
        MissionState::Running
    }

    fn execute(&mut self, ctx: &mut MissionContext) -> PhaseResult {
        for producer in &mut ctx.producers {
            producer.prepare();
        }
        Ok(PhaseOutcome::Pending)
    }

    fn on_event(&mut self, ctx: &mut MissionContext, event: &HostEvent<'_>) -> PhaseResult {
        match *event {
            HostEvent::ClientTick { world } => Ok(sample(ctx, world)),
            HostEvent::PlayerDied => {
                info!(ticks = ctx.ticks, "agent died, ending mission");
                Ok(PhaseOutcome::completed(MissionState::Cleanup))
            }
            _ => Ok(PhaseOutcome::Pending),
        }
    }
}

fn sample(ctx: &mut MissionContext, world: &dyn WorldView) -> PhaseOutcome {
    ctx.ticks += 1;
    let mut json = Map::new();
    for producer in &mut ctx.producers {
        producer.write_observations(&mut json, world);
    }
    ctx.send(ObservationFrame {
        tick: TickId(ctx.ticks),
        observations: Value::Object(json),
    });

    match ctx.config.time_limit_ticks {
        Some(limit) if ctx.ticks >= limit => {
            info!(ticks = ctx.ticks, "time limit reached");
            PhaseOutcome::completed(MissionState::Cleanup)
        }
        _ => PhaseOutcome::Pending,
    }
}

struct CleanupPhase;

impl Phase<MissionContext> for CleanupPhase {
    fn state(&self) -> MissionState {
        MissionState::Cleanup
    }

    fn execute(&mut self, ctx: &mut MissionContext) -> PhaseResult {
        for producer in &mut ctx.producers {
            producer.cleanup();
        }
        ctx.producers.clear();
        Ok(PhaseOutcome::completed(MissionState::Ended))
    }
}

fn mission_phases() -> PhaseFactory<MissionContext> {
    Box::new(|state| -> Box<dyn Phase<MissionContext>> {
        match state {
            MissionState::Setup => Box::new(SetupPhase),
            MissionState::Running => Box::new(RunningPhase),
            _ => Box::new(CleanupPhase),
        }
    })
}

// ── SensorMission ──────────────────────────────────────────────────

/// A mission whose only job is sampling observation producers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use vicinity_core::NullCatalog;
/// use vicinity_engine::{MissionConfig, MissionState, SensorMission};
///
/// let (mut mission, frames) =
///     SensorMission::new(MissionConfig::default(), Arc::new(NullCatalog)).unwrap();
/// assert_eq!(mission.start().unwrap(), MissionState::Running);
/// assert_eq!(mission.stop(), MissionState::Ended);
/// assert!(frames.try_recv().is_err());
/// ```
#[derive(Debug)]
pub struct SensorMission {
    machine: EpisodeMachine<MissionContext>,
}

impl SensorMission {
    /// Validate `config` and build a mission in [`MissionState::Setup`].
    ///
    /// Returns the mission and the receiving end of its frame outbox.
    pub fn new(
        config: MissionConfig,
        catalog: Arc<dyn ItemCatalog>,
    ) -> Result<(Self, Receiver<ObservationFrame>), MissionError> {
        config.validate()?;
        let (outbox, frames) = crossbeam_channel::bounded(config.outbox_capacity);
        let context = MissionContext {
            config,
            catalog,
            producers: Vec::new(),
            outbox,
            ticks: 0,
            frames_dropped: 0,
        };
        let machine = EpisodeMachine::new(MissionState::Setup, context, mission_phases());
        Ok((Self { machine }, frames))
    }

    /// Parse a JSON [`MissionConfig`] and build a mission from it.
    pub fn from_json(
        json: &str,
        catalog: Arc<dyn ItemCatalog>,
    ) -> Result<(Self, Receiver<ObservationFrame>), MissionError> {
        Self::new(MissionConfig::from_json(json)?, catalog)
    }

    /// Attach handlers and begin running.
    pub fn start(&mut self) -> Result<MissionState, MissionError> {
        if self.machine.is_started() {
            return Err(MissionError::AlreadyStarted);
        }
        Ok(self.machine.start())
    }

    /// Forward a host event.
    pub fn dispatch(&mut self, event: &HostEvent<'_>) -> MissionState {
        self.machine.dispatch(event)
    }

    /// Shorthand for dispatching [`HostEvent::ClientTick`].
    pub fn tick(&mut self, world: &dyn WorldView) -> MissionState {
        self.dispatch(&HostEvent::ClientTick { world })
    }

    /// Detach handlers and end the mission. No effect once terminal.
    pub fn stop(&mut self) -> MissionState {
        self.machine.queue_state_change(MissionState::Cleanup);
        self.machine.pump()
    }

    /// Apply transitions requested through a [`TransitionHandle`].
    pub fn pump(&mut self) -> MissionState {
        self.machine.pump()
    }

    /// Current state.
    pub fn state(&self) -> MissionState {
        self.machine.state()
    }

    /// Why the mission failed, if it did.
    pub fn error_details(&self) -> Option<&str> {
        self.machine.error_details()
    }

    /// Handle for requesting transitions from other threads.
    pub fn handle(&self) -> TransitionHandle {
        self.machine.handle()
    }

    /// Number of attached producers.
    pub fn active_producers(&self) -> usize {
        self.machine.context().producers.len()
    }

    /// Client ticks sampled so far.
    pub fn ticks(&self) -> u64 {
        self.machine.context().ticks()
    }

    /// Frames dropped because the outbox was full or closed.
    pub fn frames_dropped(&self) -> u64 {
        self.machine.context().frames_dropped()
    }

    /// Shared mission context.
    pub fn context(&self) -> &MissionContext {
        self.machine.context()
    }
}
