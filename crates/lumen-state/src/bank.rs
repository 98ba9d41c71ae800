//! The scene collection and its mutation operations.
//!
//! Scenes are stored normalized: an ordered id list (insertion order is the
//! display order), a map from id to scene, and the id of the active scene.
//! Every exposed operation is atomic from the caller's view; there is no
//! multi-step mutation spanning more than one call.
//!
//! Two operation families deliberately differ in failure behavior:
//! structural misuse (removing at a bad index, selecting an unknown id) is a
//! synchronous error, while mutations racing transient UI state (no active
//! scene, selecting by an out-of-range index) are silent no-ops.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lumen_core::{
    EngineError, LfoNudge, LfoShape, ParamKey, Params, RandomizerOptions, Scene,
};

/// Ordered collection of scenes with one active selection.
///
/// Invariants, upheld by every operation and checked by
/// [`validate`](Self::validate) during deserialization, so a restored bank
/// satisfies them before any operation can run:
/// - the collection is never empty
/// - `ids` and the map hold exactly the same set of ids
/// - `active` is always a present id
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SceneBankRepr")]
pub struct SceneBank {
    ids: Vec<String>,
    by_id: BTreeMap<String, Scene>,
    active: String,
}

/// Serialized form of [`SceneBank`]; conversion back runs the invariant
/// checks, so a bank that deserializes is always structurally sound.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneBankRepr {
    ids: Vec<String>,
    by_id: BTreeMap<String, Scene>,
    active: String,
}

impl TryFrom<SceneBankRepr> for SceneBank {
    type Error = EngineError;

    fn try_from(repr: SceneBankRepr) -> Result<Self, Self::Error> {
        let bank = SceneBank {
            ids: repr.ids,
            by_id: repr.by_id,
            active: repr.active,
        };
        bank.validate()?;
        Ok(bank)
    }
}

impl SceneBank {
    /// The explicit first-run bootstrap: one default scene, active.
    ///
    /// Hosts call this once at startup; there is no hidden static state.
    pub fn default_state() -> Self {
        let id = "scene-1".to_string();
        let mut by_id = BTreeMap::new();
        by_id.insert(id.clone(), Scene::default());
        Self {
            ids: vec![id.clone()],
            by_id,
            active: id,
        }
    }

    /// Check the structural invariants. Runs automatically when a bank is
    /// deserialized; also available to callers as a post-mutation sanity
    /// check.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.ids.is_empty() {
            return Err(EngineError::CannotRemoveLastScene);
        }
        if self.ids.len() != self.by_id.len() {
            return Err(EngineError::UnknownSceneId(format!(
                "id list and scene map disagree ({} vs {})",
                self.ids.len(),
                self.by_id.len()
            )));
        }
        for id in &self.ids {
            if !self.by_id.contains_key(id) {
                return Err(EngineError::UnknownSceneId(id.clone()));
            }
        }
        if !self.by_id.contains_key(&self.active) {
            return Err(EngineError::UnknownSceneId(self.active.clone()));
        }
        Ok(())
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false; kept for API symmetry with other collections.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Scene ids in display order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Id of the active scene.
    pub fn active_id(&self) -> &str {
        &self.active
    }

    /// Display-order index of the active scene.
    pub fn active_index(&self) -> Option<usize> {
        self.ids.iter().position(|id| id == &self.active)
    }

    /// Borrow a scene by id.
    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.by_id.get(id)
    }

    /// Borrow a scene by display-order index.
    pub fn get_by_index(&self, index: usize) -> Option<&Scene> {
        self.ids.get(index).and_then(|id| self.by_id.get(id))
    }

    /// Borrow the active scene.
    ///
    /// `None` only ever happens for a bank whose invariants were broken
    /// externally; operations built on [`with_active`](Self::with_active)
    /// treat that as a quiet no-op rather than a fault.
    pub fn active_scene(&self) -> Option<&Scene> {
        self.by_id.get(&self.active)
    }

    /// Append a scene under a caller-generated unique id.
    ///
    /// Id collisions are a programming error, not a user-facing failure.
    pub fn add_scene(&mut self, id: impl Into<String>, scene: Scene) {
        let id = id.into();
        debug_assert!(
            !self.by_id.contains_key(&id),
            "duplicate scene id: {id}"
        );
        tracing::debug!(id = %id, name = %scene.name, "scene added");
        self.ids.push(id.clone());
        self.by_id.insert(id, scene);
    }

    /// Remove the scene at a display-order index.
    ///
    /// Errors on an invalid index and refuses to remove the last remaining
    /// scene. If the removed scene was active, the scene now occupying the
    /// removed index becomes active, or the new last scene when the removed
    /// index was the last. `active` never dangles.
    pub fn remove_scene(&mut self, index: usize) -> Result<Scene, EngineError> {
        if index >= self.ids.len() {
            return Err(EngineError::IndexOutOfRange {
                index,
                len: self.ids.len(),
            });
        }
        if self.ids.len() == 1 {
            return Err(EngineError::CannotRemoveLastScene);
        }

        let id = self.ids.remove(index);
        let scene = self
            .by_id
            .remove(&id)
            .unwrap_or_else(|| unreachable!("ids and map are kept in sync"));

        if self.active == id {
            let successor = index.min(self.ids.len() - 1);
            self.active = self.ids[successor].clone();
            tracing::debug!(active = %self.active, "active scene reselected after removal");
        }
        Ok(scene)
    }

    /// Make the scene with `id` active.
    pub fn set_active(&mut self, id: &str) -> Result<(), EngineError> {
        if !self.by_id.contains_key(id) {
            return Err(EngineError::UnknownSceneId(id.to_string()));
        }
        tracing::debug!(id = %id, "active scene set");
        self.active = id.to_string();
        Ok(())
    }

    /// Make the scene at `index` active; silently does nothing when the
    /// index is out of range, since index-based selection races scene
    /// removal in the UI. This is distinct from
    /// [`remove_scene`](Self::remove_scene)'s strict error.
    pub fn set_active_by_index(&mut self, index: usize) {
        if let Some(id) = self.ids.get(index) {
            self.active = id.clone();
        }
    }

    /// Advance the active selection to the next scene in display order,
    /// wrapping at the end of the list. Used by auto-scene cycling.
    pub fn advance_scene(&mut self) {
        if let Some(current) = self.active_index() {
            let next = (current + 1) % self.ids.len();
            self.active = self.ids[next].clone();
            tracing::debug!(index = next, id = %self.active, "auto-advanced scene");
        }
    }

    /// Run a mutation against the active scene, if there is one.
    ///
    /// Returns `None` (and does nothing) when no active scene exists. All
    /// field-level setters below are built on this, making "modify the
    /// active scene if present" an explicit, typed pattern rather than an
    /// implicit nullability convention.
    pub fn with_active<R>(&mut self, f: impl FnOnce(&mut Scene) -> R) -> Option<R> {
        self.by_id.get_mut(&self.active).map(f)
    }

    /// Rename the active scene.
    pub fn set_active_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.with_active(|scene| scene.name = name);
    }

    /// Set the active scene's bombacity, clamped to [0, 1].
    pub fn set_active_bombacity(&mut self, bombacity: f32) {
        self.with_active(|scene| scene.set_bombacity(bombacity));
    }

    /// Set one base parameter on the active scene.
    pub fn set_base_param(&mut self, key: ParamKey, value: f32) {
        self.with_active(|scene| scene.base_params.set(key, value));
    }

    /// Set several base parameters on the active scene.
    pub fn set_base_params(&mut self, values: impl IntoIterator<Item = (ParamKey, f32)>) {
        self.with_active(|scene| {
            for (key, value) in values {
                scene.base_params.set(key, value);
            }
        });
    }

    /// Add `delta` to one base parameter on the active scene, clamped.
    pub fn increment_base_param(&mut self, key: ParamKey, delta: f32) {
        self.with_active(|scene| scene.base_params.increment(key, delta));
    }

    /// Replace the active scene's randomizer knobs.
    pub fn set_randomizer_options(&mut self, options: RandomizerOptions) {
        self.with_active(|scene| scene.randomizer = options);
    }

    /// Append a default modulator to the active scene.
    pub fn add_modulator(&mut self) {
        self.with_active(Scene::add_modulator);
    }

    /// Remove the active scene's modulator at `index`.
    pub fn remove_modulator(&mut self, index: usize) -> Result<(), EngineError> {
        // No active scene is a quiet no-op; a bad index on a real scene is
        // a structural error.
        self.with_active(|scene| scene.remove_modulator(index).map(|_| ()))
            .unwrap_or(Ok(()))
    }

    /// Reset the active scene's modulator at `index` to defaults.
    pub fn reset_modulator(&mut self, index: usize) -> Result<(), EngineError> {
        self.with_active(|scene| scene.reset_modulator(index))
            .unwrap_or(Ok(()))
    }

    /// Set the waveform shape of the active scene's modulator at `index`.
    pub fn set_modulator_shape(&mut self, index: usize, shape: LfoShape) -> Result<(), EngineError> {
        self.modify_modulator(index, |scene, i| {
            scene.modulator_mut(i).map(|m| m.lfo.set_shape(shape))
        })
    }

    /// Set the LFO period of the active scene's modulator at `index`.
    pub fn set_modulator_period(&mut self, index: usize, period: f32) -> Result<(), EngineError> {
        self.modify_modulator(index, |scene, i| {
            scene.modulator_mut(i).map(|m| m.lfo.set_period(period))
        })
    }

    /// Add `delta` to the LFO period of the modulator at `index`, clamped.
    pub fn increment_modulator_period(
        &mut self,
        index: usize,
        delta: f32,
    ) -> Result<(), EngineError> {
        self.modify_modulator(index, |scene, i| {
            scene.modulator_mut(i).map(|m| m.lfo.increment_period(delta))
        })
    }

    /// Apply relative shape-control adjustments to the modulator at `index`.
    pub fn nudge_modulator(&mut self, index: usize, nudge: &LfoNudge) -> Result<(), EngineError> {
        self.modify_modulator(index, |scene, i| {
            scene.modulator_mut(i).map(|m| m.lfo.nudge(nudge))
        })
    }

    /// Route the modulator at `index` to `key` with the given depth.
    pub fn set_modulation(
        &mut self,
        index: usize,
        key: ParamKey,
        depth: f32,
    ) -> Result<(), EngineError> {
        self.modify_modulator(index, |scene, i| {
            scene.modulator_mut(i).map(|m| m.set_depth(key, depth))
        })
    }

    /// Compose the active scene's effective parameter vector at time `t`.
    pub fn render(&self, t: f32) -> Option<Params> {
        self.active_scene().map(|scene| scene.render(t))
    }

    fn modify_modulator(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Scene, usize) -> Option<()>,
    ) -> Result<(), EngineError> {
        self.with_active(|scene| {
            let len = scene.modulators.len();
            f(scene, index).ok_or(EngineError::IndexOutOfRange { index, len })
        })
        .unwrap_or(Ok(()))
    }
}

impl Default for SceneBank {
    fn default() -> Self {
        Self::default_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank_of(n: usize) -> SceneBank {
        let mut bank = SceneBank::default_state();
        for i in 1..n {
            bank.add_scene(format!("scene-{}", i + 1), Scene::new(format!("Scene {}", i + 1)));
        }
        bank
    }

    #[test]
    fn default_state_has_one_active_scene() {
        let bank = SceneBank::default_state();
        assert_eq!(bank.len(), 1);
        assert_eq!(bank.active_index(), Some(0));
        assert!(bank.active_scene().is_some());
        bank.validate().unwrap();
    }

    #[test]
    fn add_scene_appends_in_order() {
        let bank = bank_of(3);
        assert_eq!(bank.ids(), &["scene-1", "scene-2", "scene-3"]);
        assert_eq!(bank.active_id(), "scene-1");
    }

    #[test]
    fn remove_scene_strict_on_bad_index() {
        let mut bank = bank_of(2);
        let err = bank.remove_scene(5).unwrap_err();
        assert_eq!(err, EngineError::IndexOutOfRange { index: 5, len: 2 });
    }

    #[test]
    fn refuses_to_remove_last_scene() {
        let mut bank = bank_of(1);
        assert_eq!(
            bank.remove_scene(0).unwrap_err(),
            EngineError::CannotRemoveLastScene
        );
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn removing_inactive_scene_keeps_selection() {
        let mut bank = bank_of(3);
        bank.set_active("scene-2").unwrap();
        bank.remove_scene(2).unwrap();
        assert_eq!(bank.active_id(), "scene-2");
        bank.validate().unwrap();
    }

    #[test]
    fn removing_active_scene_selects_same_index_successor() {
        let mut bank = bank_of(3);
        bank.set_active("scene-2").unwrap();
        bank.remove_scene(1).unwrap();
        // scene-3 now occupies index 1.
        assert_eq!(bank.active_id(), "scene-3");
    }

    #[test]
    fn removing_active_last_scene_selects_new_last() {
        let mut bank = bank_of(3);
        bank.set_active("scene-3").unwrap();
        bank.remove_scene(2).unwrap();
        assert_eq!(bank.active_id(), "scene-2");
    }

    #[test]
    fn removal_never_dangles_active() {
        // Exhaustive over small sizes and every index/active combination.
        for size in 2..=5 {
            for active in 0..size {
                for removed in 0..size {
                    let mut bank = bank_of(size);
                    bank.set_active_by_index(active);
                    bank.remove_scene(removed).unwrap();
                    assert_eq!(bank.len(), size - 1);
                    bank.validate().unwrap_or_else(|e| {
                        panic!("size {size}, active {active}, removed {removed}: {e}")
                    });
                }
            }
        }
    }

    #[test]
    fn set_active_unknown_id_errors() {
        let mut bank = bank_of(2);
        assert_eq!(
            bank.set_active("nope").unwrap_err(),
            EngineError::UnknownSceneId("nope".to_string())
        );
    }

    #[test]
    fn set_active_by_index_out_of_range_is_noop() {
        let mut bank = bank_of(2);
        bank.set_active_by_index(1);
        assert_eq!(bank.active_id(), "scene-2");
        bank.set_active_by_index(99);
        assert_eq!(bank.active_id(), "scene-2");
    }

    #[test]
    fn advance_scene_wraps() {
        let mut bank = bank_of(3);
        bank.advance_scene();
        assert_eq!(bank.active_index(), Some(1));
        bank.advance_scene();
        bank.advance_scene();
        assert_eq!(bank.active_index(), Some(0));
    }

    #[test]
    fn field_setters_hit_the_active_scene() {
        let mut bank = bank_of(2);
        bank.set_active_by_index(1);
        bank.set_active_name("Renamed");
        bank.set_active_bombacity(1.7);
        bank.set_base_param(ParamKey::Hue, 0.9);
        bank.increment_base_param(ParamKey::Hue, 0.3);

        let scene = bank.active_scene().unwrap();
        assert_eq!(scene.name, "Renamed");
        assert_eq!(scene.bombacity(), 1.0);
        assert_eq!(scene.base_params.get(ParamKey::Hue), 1.0);

        let other = bank.get_by_index(0).unwrap();
        assert_ne!(other.name, "Renamed");
    }

    #[test]
    fn modulator_ops_route_through_active_scene() {
        let mut bank = bank_of(1);
        bank.add_modulator();
        // Default scene ships with one modulator, so index 1 exists now.
        bank.set_modulator_shape(1, LfoShape::Saw).unwrap();
        bank.set_modulator_period(1, 8.0).unwrap();
        bank.increment_modulator_period(1, 100.0).unwrap();
        bank.set_modulation(1, ParamKey::X, 0.75).unwrap();

        let scene = bank.active_scene().unwrap();
        let modulator = scene.modulator(1).unwrap();
        assert_eq!(modulator.lfo.shape(), LfoShape::Saw);
        assert_eq!(modulator.lfo.period(), 16.0);
        assert_eq!(modulator.depth(ParamKey::X), 0.75);

        let err = bank.set_modulation(9, ParamKey::X, 0.5).unwrap_err();
        assert_eq!(err, EngineError::IndexOutOfRange { index: 9, len: 2 });
    }

    #[test]
    fn nudge_modulator_clamps_controls() {
        let mut bank = bank_of(1);
        let nudge = LfoNudge {
            flip: 2.0,
            phase_shift: -0.5,
            skew: 0.25,
            symmetric_skew: 0.0,
        };
        bank.nudge_modulator(0, &nudge).unwrap();
        let lfo = &bank.active_scene().unwrap().modulator(0).unwrap().lfo;
        assert_eq!(lfo.flip(), 1.0);
        assert_eq!(lfo.phase_shift(), 0.0);
        assert_eq!(lfo.skew(), 0.25);
    }

    #[test]
    fn remove_modulator_errors_on_bad_index() {
        let mut bank = bank_of(1);
        assert!(bank.remove_modulator(0).is_ok());
        let err = bank.remove_modulator(0).unwrap_err();
        assert_eq!(err, EngineError::IndexOutOfRange { index: 0, len: 0 });
    }

    #[test]
    fn deserialization_rejects_dangling_active() {
        let mut value = serde_json::to_value(bank_of(2)).unwrap();
        value["active"] = serde_json::Value::String("ghost".to_string());
        let err = serde_json::from_value::<SceneBank>(value).unwrap_err();
        assert!(err.to_string().contains("unknown scene id: ghost"), "{err}");
    }

    #[test]
    fn deserialization_rejects_id_list_and_map_disagreement() {
        let mut value = serde_json::to_value(bank_of(2)).unwrap();
        value["ids"]
            .as_array_mut()
            .unwrap()
            .push(serde_json::Value::String("phantom".to_string()));
        assert!(serde_json::from_value::<SceneBank>(value).is_err());
    }

    #[test]
    fn validate_rejects_broken_invariants() {
        let mut bank = bank_of(2);
        bank.active = "ghost".to_string();
        assert!(matches!(
            bank.validate(),
            Err(EngineError::UnknownSceneId(id)) if id == "ghost"
        ));

        let mut bank = bank_of(2);
        bank.ids.clear();
        bank.by_id.clear();
        assert_eq!(bank.validate(), Err(EngineError::CannotRemoveLastScene));
    }

    #[test]
    fn render_snapshots_active_scene() {
        let mut bank = bank_of(2);
        bank.set_base_param(ParamKey::Brightness, 0.25);
        let frame = bank.render(0.0).unwrap();
        assert_eq!(frame.get(ParamKey::Brightness), 0.25);
    }
}
