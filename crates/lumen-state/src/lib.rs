//! Lumen State - scene collection, auto-scene cycling, and persistence.
//!
//! This crate owns the mutable half of the lumen engine: the [`SceneBank`]
//! (all scenes plus the active selection), the [`AutoScene`] cycling
//! configuration with its runtime [`AutoAdvanceTimer`], and the
//! [`StateDocument`] that persists both as one JSON document.
//!
//! The engine assumes a single logical update loop: operations here are
//! synchronous, atomic per call, and never block. Rendered parameter
//! snapshots come out of [`SceneBank::render`] as plain values that are
//! never touched again by the engine.

pub mod auto;
pub mod bank;
pub mod document;

pub use auto::{AutoAdvanceTimer, AutoScene, MAX_ADVANCES_PER_TICK, MIN_AUTO_PERIOD};
pub use bank::SceneBank;
pub use document::{DocumentError, StateDocument};
