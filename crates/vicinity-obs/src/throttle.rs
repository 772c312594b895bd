//! Per-channel sampling cadence.
//!
//! [`ThrottleScheduler`] owns the registry's channels paired with the
//! tick at which each last fired. Pairing them in one collection keeps
//! the per-channel counter structurally aligned with its definition.

use smallvec::SmallVec;
use vicinity_core::TickId;

use crate::range::{RangeDefinition, RangeRegistry};

/// Indices of the channels due on one tick, in configured order.
pub type DueChannels = SmallVec<[usize; 8]>;

/// A channel together with its throttle state.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledRange {
    range: RangeDefinition,
    last_fired: TickId,
}

impl ScheduledRange {
    /// The channel definition.
    pub fn range(&self) -> &RangeDefinition {
        &self.range
    }

    /// Tick at which the channel last fired (`TickId(0)` if never).
    pub fn last_fired(&self) -> TickId {
        self.last_fired
    }

    fn is_due(&self, now: TickId) -> bool {
        now.since(self.last_fired) >= u64::from(self.range.update_frequency())
    }
}

/// Decides, tick by tick, which channels fire.
///
/// A channel with update frequency `f` fires on ticks `f, 2f, 3f, …`.
/// Firing re-arms the channel immediately, so a channel fires at most
/// once per tick.
///
/// # Examples
///
/// ```
/// use vicinity_obs::{RangeDefinition, RangeRegistry, ThrottleScheduler};
///
/// let registry = RangeRegistry::new(vec![
///     RangeDefinition::new("fast", 1.0, 1.0, 1.0, 1),
///     RangeDefinition::new("slow", 1.0, 1.0, 1.0, 3),
/// ]).unwrap();
/// let mut sched = ThrottleScheduler::new(registry);
///
/// assert_eq!(sched.advance().as_slice(), &[0]);
/// assert_eq!(sched.advance().as_slice(), &[0]);
/// assert_eq!(sched.advance().as_slice(), &[0, 1]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct ThrottleScheduler {
    ranges: Vec<ScheduledRange>,
    current: TickId,
}

impl ThrottleScheduler {
    /// Start scheduling the registry's channels at tick 0.
    pub fn new(registry: RangeRegistry) -> Self {
        let ranges = registry
            .into_ranges()
            .into_iter()
            .map(|range| ScheduledRange {
                range,
                last_fired: TickId(0),
            })
            .collect();
        Self {
            ranges,
            current: TickId(0),
        }
    }

    /// Advance the tick counter by one and return the new tick.
    pub fn tick(&mut self) -> TickId {
        self.current = self.current.next();
        self.current
    }

    /// Channels due at the current tick; each returned channel is
    /// re-armed to the current tick as part of this call.
    ///
    /// Channels not returned are skipped entirely this tick.
    pub fn due_channels(&mut self) -> DueChannels {
        let now = self.current;
        let mut due = DueChannels::new();
        for (i, scheduled) in self.ranges.iter_mut().enumerate() {
            if scheduled.is_due(now) {
                scheduled.last_fired = now;
                due.push(i);
            }
        }
        due
    }

    /// [`tick`](Self::tick) followed by [`due_channels`](Self::due_channels).
    pub fn advance(&mut self) -> DueChannels {
        self.tick();
        self.due_channels()
    }

    /// Resolve due indices to their definitions, preserving order.
    pub fn due_ranges(&self, due: &[usize]) -> SmallVec<[&RangeDefinition; 8]> {
        due.iter()
            .filter_map(|&i| self.ranges.get(i))
            .map(ScheduledRange::range)
            .collect()
    }

    /// The current tick (0 before the first [`tick`](Self::tick)).
    pub fn current_tick(&self) -> TickId {
        self.current
    }

    /// Scheduled channels in configured order.
    pub fn ranges(&self) -> &[ScheduledRange] {
        &self.ranges
    }

    /// Number of channels.
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Whether no channels are scheduled.
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Return to tick 0 with every channel un-fired.
    pub fn reset(&mut self) {
        self.current = TickId(0);
        for scheduled in &mut self.ranges {
            scheduled.last_fired = TickId(0);
        }
    }
}
