//! Lumen Core - the scene and modulation engine of the lumen instrument.
//!
//! A scene holds a base value for every parameter in a fixed registry plus a
//! bank of LFO modulators, each routed to any number of parameters with a
//! signed depth. On every evaluation tick the engine composes the effective
//! parameter vector consumed by the rendering stage:
//!
//! ```text
//! effective(key, t) = clamp(base(key) + sum(depth_i * lfo_i(t)))
//! ```
//!
//! # Core Abstractions
//!
//! - [`ParamKey`] / [`Params`] - the compile-time parameter registry and one
//!   complete value set over it
//! - [`Lfo`] / [`LfoShape`] - a pure, stateless oscillator description
//!   evaluated as a function of time
//! - [`Modulator`] - one LFO plus its per-parameter routing table
//! - [`Scene`] - base parameters, modulator bank, name and bombacity
//! - [`randomize`] - deterministic, seeded scene perturbation
//!
//! # Design Principles
//!
//! - **Pure evaluation**: [`Lfo::evaluate`] and [`Scene::render`] have no
//!   side effects; snapshots handed to consumers are never mutated.
//! - **Clamp on mutation**: no stored value is ever outside its declared
//!   range, including after deserialization.
//! - **Value-like entities**: nothing holds a reference to its owner; all
//!   addressing goes by id or index through the owning collection.

pub mod error;
pub mod lfo;
pub mod math;
pub mod modulator;
pub mod params;
pub mod randomizer;
pub mod scene;

pub use error::EngineError;
pub use lfo::{Lfo, LfoNudge, LfoShape, PERIOD_RANGE};
pub use math::{clamp_bipolar, clamp_normalized, lerp, wrap_phase};
pub use modulator::Modulator;
pub use params::{ParamKey, Params};
pub use randomizer::{RandomizerOptions, randomize};
pub use scene::Scene;
