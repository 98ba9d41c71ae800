//! Auto-scene cycling: timed automatic advancement of the active scene.
//!
//! The engine has no wall clock of its own; an external timer delivers
//! elapsed-time increments and the controller counts period boundaries.
//! The persisted configuration ([`AutoScene`]) is separate from the runtime
//! accumulator ([`AutoAdvanceTimer`]), which is never serialized.

use serde::{Deserialize, Serialize};

/// Shortest accepted cycling period, in seconds. Guards the accumulator
/// arithmetic against a zero or negative persisted period.
pub const MIN_AUTO_PERIOD: f32 = 0.05;

/// Most advances a single tick may report. An elapsed value crossing more
/// boundaries than this means the host clock jumped; the excess is dropped
/// rather than replayed.
pub const MAX_ADVANCES_PER_TICK: u32 = 4096;

/// Persisted auto-scene configuration.
///
/// One instance per document, alive for the whole session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoScene {
    /// Whether automatic cycling is armed.
    pub enabled: bool,
    /// Global randomization strength applied on each advance, in [0, 1].
    pub bombacity: f32,
    /// Seconds between automatic advances.
    pub period: f32,
}

impl Default for AutoScene {
    fn default() -> Self {
        Self {
            enabled: false,
            bombacity: 0.0,
            period: 1.0,
        }
    }
}

/// Accumulates elapsed time and reports period-boundary crossings.
///
/// On each crossing the accumulator is decremented by exactly one period
/// (rather than reset to zero), so timing drift from coarse host ticks does
/// not compound across advances.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoAdvanceTimer {
    accumulator: f32,
}

impl AutoAdvanceTimer {
    /// Fresh timer with an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any accumulated time.
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }

    /// Time accumulated toward the next advance.
    pub fn accumulated(&self) -> f32 {
        self.accumulator
    }

    /// Feed `elapsed` seconds to the timer and return how many advances are
    /// due, at most [`MAX_ADVANCES_PER_TICK`]. While cycling is disabled the
    /// accumulator is held at zero, so re-arming starts a full period from
    /// that moment.
    pub fn tick(&mut self, auto: &AutoScene, elapsed: f32) -> u32 {
        if !auto.enabled {
            self.accumulator = 0.0;
            return 0;
        }
        let period = auto.period.max(MIN_AUTO_PERIOD);
        self.accumulator += elapsed.max(0.0);
        if self.accumulator < period {
            return 0;
        }

        // Division rather than repeated subtraction: for accumulators large
        // enough that `acc - period == acc` in f32, subtraction never ends.
        let due = (self.accumulator / period).floor();
        if due >= MAX_ADVANCES_PER_TICK as f32 {
            self.accumulator = 0.0;
            return MAX_ADVANCES_PER_TICK;
        }
        let advances = due as u32;
        self.accumulator = (self.accumulator - due * period).max(0.0);
        advances
    }
}
