//! Scenes and value composition.
//!
//! A scene is a named snapshot of base parameter values plus its own bank of
//! modulators. Composition happens once per evaluation tick: for every
//! parameter, the base value plus the sum of all routed modulator
//! contributions, clamped to the parameter domain as the final step.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::math::clamp_normalized;
use crate::modulator::Modulator;
use crate::params::{ParamKey, Params};
use crate::randomizer::RandomizerOptions;

/// A named, switchable snapshot of base parameters and modulators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Display name.
    pub name: String,
    /// Randomization intensity used by autoplay and manual randomize,
    /// in [0, 1]. Both the setter and deserialization clamp.
    #[serde(deserialize_with = "clamped_unit")]
    bombacity: f32,
    /// Base value for every parameter in the registry.
    pub base_params: Params,
    /// Ordered modulator bank. Order is significant: the index is the
    /// UI-facing identity of a modulator.
    #[serde(default)]
    pub modulators: Vec<Modulator>,
    /// Knobs consumed by the randomizer.
    #[serde(default)]
    pub randomizer: RandomizerOptions,
}

impl Scene {
    /// Create a scene with default parameters and a single default modulator.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bombacity: 0.0,
            base_params: Params::default(),
            modulators: vec![Modulator::default()],
            randomizer: RandomizerOptions::default(),
        }
    }

    /// Randomization intensity.
    pub fn bombacity(&self) -> f32 {
        self.bombacity
    }

    /// Set the randomization intensity, clamped to [0, 1].
    pub fn set_bombacity(&mut self, bombacity: f32) {
        self.bombacity = clamp_normalized(bombacity);
    }

    /// Effective value of one parameter at time `t`.
    ///
    /// Contributions from every modulator routed to `key` are summed
    /// unclamped, in index order, and the clamp to the parameter domain is
    /// applied exactly once at the end, so the result never depends on the
    /// order routes saturate in.
    pub fn applied_value(&self, key: ParamKey, t: f32) -> f32 {
        let base = self.base_params.get(key);
        let modulated: f32 = self
            .modulators
            .iter()
            .map(|modulator| modulator.contribution(key, t))
            .sum();
        clamp_normalized(base + modulated)
    }

    /// Compose the full effective parameter vector at time `t`.
    ///
    /// The returned snapshot is a plain value; the engine never mutates it
    /// after handing it out.
    pub fn render(&self, t: f32) -> Params {
        let mut out = self.base_params;
        for key in ParamKey::ALL {
            out.set(key, self.applied_value(key, t));
        }
        out
    }

    /// Append a fresh default modulator to the bank.
    pub fn add_modulator(&mut self) {
        self.modulators.push(Modulator::default());
    }

    /// Remove the modulator at `index`, shifting later ones down.
    pub fn remove_modulator(&mut self, index: usize) -> Result<Modulator, EngineError> {
        if index >= self.modulators.len() {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.modulators.len(),
            });
        }
        Ok(self.modulators.remove(index))
    }

    /// Replace the modulator at `index` with a default one.
    pub fn reset_modulator(&mut self, index: usize) -> Result<(), EngineError> {
        match self.modulators.get_mut(index) {
            Some(modulator) => {
                *modulator = Modulator::default();
                Ok(())
            }
            None => Err(EngineError::IndexOutOfRange {
                index,
                len: self.modulators.len(),
            }),
        }
    }

    /// Borrow the modulator at `index`.
    pub fn modulator(&self, index: usize) -> Option<&Modulator> {
        self.modulators.get(index)
    }

    /// Mutably borrow the modulator at `index`.
    pub fn modulator_mut(&mut self, index: usize) -> Option<&mut Modulator> {
        self.modulators.get_mut(index)
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new("Scene 1")
    }
}

fn clamped_unit<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    f32::deserialize(deserializer).map(clamp_normalized)
}
