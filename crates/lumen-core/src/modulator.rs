//! A modulator: one LFO plus its routing table.
//!
//! Routing is many-to-one by design: any number of modulators may target the
//! same parameter, and their contributions sum. A UI that restricts routing
//! to one modulator per parameter is a presentation choice, not an engine
//! constraint.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lfo::Lfo;
use crate::math::clamp_bipolar;
use crate::params::ParamKey;

/// One LFO and the signed per-parameter depths it is routed with.
///
/// Modulators are owned by exactly one scene and addressed by their index in
/// that scene's modulator list; they carry no back-reference to their owner.
/// Deserialization routes every depth through [`set_depth`](Self::set_depth),
/// so restored depths are clamped and zero entries are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModulatorRepr", into = "ModulatorRepr")]
pub struct Modulator {
    /// The oscillator driving this modulator.
    pub lfo: Lfo,
    /// Routing table: modulation depth per targeted parameter, in [-1, 1].
    /// Parameters with zero depth are not stored.
    modulation: BTreeMap<ParamKey, f32>,
}

impl Modulator {
    /// Create a modulator with the given LFO and an empty routing table.
    pub fn new(lfo: Lfo) -> Self {
        Self {
            lfo,
            modulation: BTreeMap::new(),
        }
    }

    /// Modulation depth for a parameter; zero when unrouted.
    pub fn depth(&self, key: ParamKey) -> f32 {
        self.modulation.get(&key).copied().unwrap_or(0.0)
    }

    /// Route this modulator to `key` with the given depth, clamped to
    /// [-1, 1]. A depth of zero removes the route.
    pub fn set_depth(&mut self, key: ParamKey, depth: f32) {
        let depth = clamp_bipolar(depth);
        if depth == 0.0 {
            self.modulation.remove(&key);
        } else {
            self.modulation.insert(key, depth);
        }
    }

    /// Iterate over active routes as `(key, depth)` pairs, in key order.
    pub fn routes(&self) -> impl Iterator<Item = (ParamKey, f32)> + '_ {
        self.modulation.iter().map(|(&key, &depth)| (key, depth))
    }

    /// Number of parameters this modulator is routed to.
    pub fn route_count(&self) -> usize {
        self.modulation.len()
    }

    /// This modulator's contribution to `key` at time `t`:
    /// `depth * lfo.evaluate(t)`, or zero when unrouted.
    pub fn contribution(&self, key: ParamKey, t: f32) -> f32 {
        let depth = self.depth(key);
        if depth == 0.0 {
            return 0.0;
        }
        depth * self.lfo.evaluate(t)
    }
}

/// Serialized form of [`Modulator`]; conversion back clamps every depth.
#[derive(Serialize, Deserialize, Clone)]
struct ModulatorRepr {
    lfo: Lfo,
    #[serde(default)]
    modulation: BTreeMap<ParamKey, f32>,
}

impl From<ModulatorRepr> for Modulator {
    fn from(repr: ModulatorRepr) -> Self {
        let mut modulator = Modulator::new(repr.lfo);
        for (key, depth) in repr.modulation {
            modulator.set_depth(key, depth);
        }
        modulator
    }
}

impl From<Modulator> for ModulatorRepr {
    fn from(modulator: Modulator) -> Self {
        Self {
            lfo: modulator.lfo,
            modulation: modulator.modulation,
        }
    }
}
