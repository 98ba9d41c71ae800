//! Randomized scene perturbation.
//!
//! Used by autoplay ("bombacity") and by explicit randomize actions. The
//! random source is always passed in by the caller: given the same seed, the
//! same scene and the same strength, the output is identical. That is the
//! primary testable property of this module.

use serde::{Deserialize, Serialize};

use crate::lfo::LfoShape;
use crate::math::clamp_normalized;
use crate::scene::Scene;

/// Per-category randomization knobs, each in [0, 1].
///
/// `*_chance` is the probability that a given target is perturbed at all;
/// `*_spread` scales how far a perturbed value can move. Values are read
/// through a clamp, so out-of-range knobs degrade gracefully.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RandomizerOptions {
    /// Probability of perturbing each base parameter.
    pub base_chance: f32,
    /// Maximum relative excursion of a perturbed base parameter.
    pub base_spread: f32,
    /// Probability of perturbing each modulator's LFO.
    pub lfo_chance: f32,
    /// Maximum relative excursion of perturbed LFO controls.
    pub lfo_spread: f32,
}

impl Default for RandomizerOptions {
    fn default() -> Self {
        Self {
            base_chance: 0.5,
            base_spread: 0.25,
            lfo_chance: 0.5,
            lfo_spread: 0.25,
        }
    }
}

/// Produce a randomized copy of `scene`.
///
/// Every draw is scaled by `strength * scene.bombacity()` and by the scene's
/// own [`RandomizerOptions`]; all perturbed values go through the usual
/// clamping mutators, so the result satisfies the same invariants as any
/// hand-edited scene. Iteration order (registry order for parameters, index
/// order for modulators) is fixed, which is what makes a seeded
/// [`fastrand::Rng`] reproducible here.
pub fn randomize(scene: &Scene, strength: f32, rng: &mut fastrand::Rng) -> Scene {
    let mut out = scene.clone();
    let opts = scene.randomizer;
    let intensity = clamp_normalized(strength) * scene.bombacity();

    let base_chance = clamp_normalized(opts.base_chance);
    let base_spread = clamp_normalized(opts.base_spread) * intensity;
    for (key, value) in scene.base_params.iter() {
        if rng.f32() < base_chance {
            let delta = bipolar_draw(rng) * base_spread;
            out.base_params.set(key, value + delta);
        }
    }

    let lfo_chance = clamp_normalized(opts.lfo_chance);
    let lfo_spread = clamp_normalized(opts.lfo_spread) * intensity;
    for modulator in &mut out.modulators {
        if rng.f32() >= lfo_chance {
            continue;
        }
        let lfo = &mut modulator.lfo;
        // Period moves over a wider span than the normalized controls.
        lfo.increment_period(bipolar_draw(rng) * lfo_spread * 8.0);
        lfo.set_phase_shift(lfo.phase_shift() + bipolar_draw(rng) * lfo_spread);
        lfo.set_skew(lfo.skew() + bipolar_draw(rng) * lfo_spread);
        lfo.set_symmetric_skew(lfo.symmetric_skew() + bipolar_draw(rng) * lfo_spread);
        if rng.f32() < lfo_spread {
            lfo.set_shape(LfoShape::ALL[rng.usize(..LfoShape::ALL.len())]);
        }
    }

    out
}

/// Uniform draw in [-1, 1).
fn bipolar_draw(rng: &mut fastrand::Rng) -> f32 {
    rng.f32() * 2.0 - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamKey;

    fn busy_scene() -> Scene {
        let mut scene = Scene::new("busy");
        scene.set_bombacity(1.0);
        scene.add_modulator();
        scene.add_modulator();
        if let Some(modulator) = scene.modulator_mut(0) {
            modulator.set_depth(ParamKey::Hue, 0.5);
        }
        scene
    }

    #[test]
    fn same_seed_same_output() {
        let scene = busy_scene();
        let mut rng_a = fastrand::Rng::with_seed(42);
        let mut rng_b = fastrand::Rng::with_seed(42);
        let a = randomize(&scene, 0.8, &mut rng_a);
        let b = randomize(&scene, 0.8, &mut rng_b);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut scene = busy_scene();
        scene.randomizer.base_chance = 1.0;
        let mut rng_a = fastrand::Rng::with_seed(1);
        let mut rng_b = fastrand::Rng::with_seed(2);
        let a = randomize(&scene, 1.0, &mut rng_a);
        let b = randomize(&scene, 1.0, &mut rng_b);
        assert_ne!(a, b);
    }

    #[test]
    fn zero_bombacity_freezes_values() {
        let mut scene = busy_scene();
        scene.set_bombacity(0.0);
        let mut rng = fastrand::Rng::with_seed(7);
        let out = randomize(&scene, 1.0, &mut rng);
        // Chance rolls still happen, but every excursion is scaled to zero.
        assert_eq!(out.base_params, scene.base_params);
    }

    #[test]
    fn output_respects_parameter_domain() {
        let mut scene = busy_scene();
        scene.randomizer.base_chance = 1.0;
        scene.randomizer.base_spread = 1.0;
        scene.randomizer.lfo_chance = 1.0;
        scene.randomizer.lfo_spread = 1.0;
        let mut rng = fastrand::Rng::with_seed(99);
        for _ in 0..50 {
            scene = randomize(&scene, 1.0, &mut rng);
            for (key, value) in scene.base_params.iter() {
                assert!((0.0..=1.0).contains(&value), "{key} = {value}");
            }
            for modulator in &scene.modulators {
                let p = modulator.lfo.period();
                assert!((0.25..=16.0).contains(&p), "period {p}");
            }
        }
    }

    #[test]
    fn routing_tables_are_preserved() {
        let scene = busy_scene();
        let mut rng = fastrand::Rng::with_seed(3);
        let out = randomize(&scene, 1.0, &mut rng);
        assert_eq!(out.modulators[0].depth(ParamKey::Hue), 0.5);
        assert_eq!(out.modulators.len(), scene.modulators.len());
    }
}
