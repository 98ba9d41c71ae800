//! Low-frequency oscillator evaluation.
//!
//! Unlike an audio-rate oscillator there is no accumulated phase here: an
//! [`Lfo`] is a pure description, and [`Lfo::evaluate`] is a pure function of
//! the description and a time value. That keeps evaluation safe to call for
//! any number of modulators at any tick, in any order.

use serde::{Deserialize, Serialize};

use crate::math::{clamp_bipolar, clamp_normalized, wrap_phase};

/// LFO waveform shape.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LfoShape {
    /// Smooth sinusoid, zero at phase 0 and rising
    #[default]
    Sine,
    /// Linear ramps between -1 and 1
    Triangle,
    /// High for the first half cycle, low for the second
    Square,
    /// Rising ramp with an abrupt reset
    Saw,
}

impl LfoShape {
    /// Every available shape.
    pub const ALL: [LfoShape; 4] = [
        LfoShape::Sine,
        LfoShape::Triangle,
        LfoShape::Square,
        LfoShape::Saw,
    ];
}

/// Relative adjustments to the continuous shape controls of an [`Lfo`].
///
/// Produced by UI gestures (drag deltas); applied with [`Lfo::nudge`], which
/// clamps each control to its declared range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LfoNudge {
    /// Change to the flip control
    pub flip: f32,
    /// Change to the phase shift
    pub phase_shift: f32,
    /// Change to the skew
    pub skew: f32,
    /// Change to the symmetric skew
    pub symmetric_skew: f32,
}

/// A low-frequency oscillator description.
///
/// All fields are private and every mutation path clamps, so an `Lfo` never
/// holds an out-of-range value, including after deserialization, which goes
/// through the same constructors.
///
/// # Output convention
///
/// [`evaluate`](Self::evaluate) is bipolar: every shape maps warped phase to
/// [-1, 1], with sine zero at phase 0 and peaking at a quarter cycle.
///
/// # Example
///
/// ```rust
/// use lumen_core::{Lfo, LfoShape};
///
/// let mut lfo = Lfo::new(LfoShape::Sine);
/// lfo.set_period(4.0);
///
/// assert!(lfo.evaluate(0.0).abs() < 1e-6); // sine starts at zero
/// assert!((lfo.evaluate(1.0) - 1.0).abs() < 1e-5); // quarter-period peak
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "LfoRepr", into = "LfoRepr")]
pub struct Lfo {
    /// Waveform shape
    shape: LfoShape,
    /// Cycle length in time units, in [0.25, 16]
    period: f32,
    /// Normalized phase offset in [0, 1]
    phase_shift: f32,
    /// Polarity blend in [-1, 1]; see [`Lfo::evaluate`]
    flip: f32,
    /// Rising/falling edge asymmetry in [-1, 1]
    skew: f32,
    /// Symmetric edge warp in [-1, 1]
    symmetric_skew: f32,
}

/// Declared range of [`Lfo`] periods.
pub const PERIOD_RANGE: (f32, f32) = (0.25, 16.0);

impl Lfo {
    /// Create an LFO with the given shape and neutral controls.
    pub fn new(shape: LfoShape) -> Self {
        Self {
            shape,
            period: 1.0,
            phase_shift: 0.0,
            flip: 0.0,
            skew: 0.0,
            symmetric_skew: 0.0,
        }
    }

    /// Current waveform shape.
    pub fn shape(&self) -> LfoShape {
        self.shape
    }

    /// Set the waveform shape.
    pub fn set_shape(&mut self, shape: LfoShape) {
        self.shape = shape;
    }

    /// Cycle length in time units.
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Set the period, clamped to [0.25, 16].
    pub fn set_period(&mut self, period: f32) {
        self.period = period.clamp(PERIOD_RANGE.0, PERIOD_RANGE.1);
    }

    /// Add `delta` to the period, clamping the result.
    pub fn increment_period(&mut self, delta: f32) {
        self.set_period(self.period + delta);
    }

    /// Normalized phase offset.
    pub fn phase_shift(&self) -> f32 {
        self.phase_shift
    }

    /// Set the phase offset, clamped to [0, 1]. Wrapping happens at
    /// evaluation time, so a stored offset of 1.0 is equivalent to 0.0.
    pub fn set_phase_shift(&mut self, phase_shift: f32) {
        self.phase_shift = clamp_normalized(phase_shift);
    }

    /// Polarity blend control.
    pub fn flip(&self) -> f32 {
        self.flip
    }

    /// Set the flip control, clamped to [-1, 1].
    pub fn set_flip(&mut self, flip: f32) {
        self.flip = clamp_bipolar(flip);
    }

    /// Edge asymmetry control.
    pub fn skew(&self) -> f32 {
        self.skew
    }

    /// Set the skew control, clamped to [-1, 1].
    pub fn set_skew(&mut self, skew: f32) {
        self.skew = clamp_bipolar(skew);
    }

    /// Symmetric edge warp control.
    pub fn symmetric_skew(&self) -> f32 {
        self.symmetric_skew
    }

    /// Set the symmetric skew control, clamped to [-1, 1].
    pub fn set_symmetric_skew(&mut self, symmetric_skew: f32) {
        self.symmetric_skew = clamp_bipolar(symmetric_skew);
    }

    /// Apply relative adjustments to the continuous controls.
    pub fn nudge(&mut self, nudge: &LfoNudge) {
        self.set_flip(self.flip + nudge.flip);
        self.set_phase_shift(self.phase_shift + nudge.phase_shift);
        self.set_skew(self.skew + nudge.skew);
        self.set_symmetric_skew(self.symmetric_skew + nudge.symmetric_skew);
    }

    /// Evaluate the oscillator at time `t`.
    ///
    /// Pure function of `(self, t)`; output is in [-1, 1] and periodic with
    /// [`period`](Self::period). Computation order:
    ///
    /// 1. `phase = (t / period + phase_shift) mod 1`, always non-negative
    /// 2. skew warp, then symmetric-skew warp of the phase
    /// 3. shape function of the warped phase
    /// 4. flip: `value * (1 - 2 * max(0, flip))`. Zero leaves the waveform
    ///    untouched, 0.5 silences it, 1.0 fully inverts it; negative values
    ///    behave as zero. This exact formula is a behavior contract, locked
    ///    by golden-value tests.
    pub fn evaluate(&self, t: f32) -> f32 {
        let phase = wrap_phase(t / self.period + self.phase_shift);
        let warped = warp_symmetric(warp_skew(phase, self.skew), self.symmetric_skew);

        let value = match self.shape {
            LfoShape::Sine => (warped * core::f32::consts::TAU).sin(),

            LfoShape::Triangle => {
                if warped < 0.5 {
                    4.0 * warped - 1.0
                } else {
                    3.0 - 4.0 * warped
                }
            }

            LfoShape::Square => {
                if warped < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }

            LfoShape::Saw => 2.0 * warped - 1.0,
        };

        value * (1.0 - 2.0 * self.flip.max(0.0))
    }
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(LfoShape::Sine)
    }
}

/// Bend the phase ramp asymmetrically.
///
/// Maps [0, 1) onto itself monotonically with fixed endpoints, so warping
/// never breaks periodicity. `skew` of 0 is the identity; positive values
/// compress the early part of the cycle, negative values the late part.
fn warp_skew(phase: f32, skew: f32) -> f32 {
    if skew == 0.0 {
        return phase;
    }
    phase.powf(2f32.powf(2.0 * skew))
}

/// Bend both halves of the phase ramp symmetrically toward or away from the
/// cycle midpoint. Identity at 0, fixed points at 0, 0.5 and 1.
fn warp_symmetric(phase: f32, symmetric_skew: f32) -> f32 {
    if symmetric_skew == 0.0 {
        return phase;
    }
    let exponent = 2f32.powf(2.0 * symmetric_skew);
    if phase < 0.5 {
        0.5 * (2.0 * phase).powf(exponent)
    } else {
        1.0 - 0.5 * (2.0 * (1.0 - phase)).powf(exponent)
    }
}

/// Serialized form of [`Lfo`]; conversion back clamps every field.
#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct LfoRepr {
    shape: LfoShape,
    period: f32,
    phase_shift: f32,
    flip: f32,
    skew: f32,
    symmetric_skew: f32,
}

impl From<LfoRepr> for Lfo {
    fn from(repr: LfoRepr) -> Self {
        let mut lfo = Lfo::new(repr.shape);
        lfo.set_period(repr.period);
        lfo.set_phase_shift(repr.phase_shift);
        lfo.set_flip(repr.flip);
        lfo.set_skew(repr.skew);
        lfo.set_symmetric_skew(repr.symmetric_skew);
        lfo
    }
}

impl From<Lfo> for LfoRepr {
    fn from(lfo: Lfo) -> Self {
        LfoRepr {
            shape: lfo.shape,
            period: lfo.period,
            phase_shift: lfo.phase_shift,
            flip: lfo.flip,
            skew: lfo.skew,
            symmetric_skew: lfo.symmetric_skew,
        }
    }
}
