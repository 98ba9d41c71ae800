//! The persisted scene-state document.
//!
//! The whole engine state, scene collection plus auto-scene configuration,
//! serializes to one JSON document. The persistence provider (file dialogs,
//! project files, network sync) treats that document as opaque; this module
//! guarantees the round-trip is lossless and that restored state satisfies
//! the collection invariants.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use lumen_core::randomize;

use crate::auto::{AutoAdvanceTimer, AutoScene};
use crate::bank::SceneBank;

/// Errors from loading, saving, or restoring a state document.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Failed to read a state file.
    #[error("failed to read state file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a state file.
    #[error("failed to write state file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document was not valid JSON for this schema, or it violates a
    /// collection invariant.
    #[error("failed to parse state document: {0}")]
    Parse(#[source] serde_json::Error),

    /// The document could not be serialized.
    #[error("failed to serialize state document: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl DocumentError {
    /// Create a read error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocumentError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocumentError::WriteFile {
            path: path.into(),
            source,
        }
    }
}

/// Complete persisted engine state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateDocument {
    /// The scene collection and active selection.
    pub scenes: SceneBank,
    /// Auto-scene cycling configuration.
    pub auto: AutoScene,
}

impl StateDocument {
    /// The explicit first-run state: one default scene, autoplay off.
    pub fn default_state() -> Self {
        Self {
            scenes: SceneBank::default_state(),
            auto: AutoScene::default(),
        }
    }

    /// Restore a document from a JSON string. Scene collection invariants
    /// and value domains are enforced during deserialization, so a document
    /// that parses is always safe to operate on.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        serde_json::from_str(json).map_err(DocumentError::Parse)
    }

    /// Serialize to a pretty-printed JSON string.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        serde_json::to_string_pretty(self).map_err(DocumentError::Serialize)
    }

    /// Load a document from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DocumentError::read_file(path, e))?;
        let document = Self::from_json(&content)?;
        tracing::info!(path = %path.display(), scenes = document.scenes.len(), "state loaded");
        Ok(document)
    }

    /// Save the document to a JSON file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| DocumentError::write_file(parent, e))?;
        }

        let content = self.to_json()?;
        std::fs::write(path, content).map_err(|e| DocumentError::write_file(path, e))?;
        tracing::info!(path = %path.display(), "state saved");
        Ok(())
    }

    /// Feed elapsed time to auto-scene cycling.
    ///
    /// For every period boundary the timer reports, the active scene
    /// advances (wrapping at the end of the list) and, when the global
    /// bombacity is nonzero, the newly active scene is randomized with
    /// strength `auto.bombacity`. Returns the number of advances applied.
    pub fn tick_auto(
        &mut self,
        timer: &mut AutoAdvanceTimer,
        elapsed: f32,
        rng: &mut fastrand::Rng,
    ) -> u32 {
        let advances = timer.tick(&self.auto, elapsed);
        for _ in 0..advances {
            self.scenes.advance_scene();
            if self.auto.bombacity > 0.0 {
                let strength = self.auto.bombacity;
                self.scenes.with_active(|scene| {
                    *scene = randomize(scene, strength, rng);
                });
            }
        }
        advances
    }
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::default_state()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{LfoShape, ParamKey, Scene};
    use tempfile::TempDir;

    fn multi_scene_document() -> StateDocument {
        let mut document = StateDocument::default_state();
        document.scenes.set_active_bombacity(0.6);
        document.scenes.set_base_param(ParamKey::Hue, 0.12);
        document.scenes.add_modulator();
        document.scenes.set_modulator_shape(1, LfoShape::Saw).unwrap();
        document.scenes.set_modulation(1, ParamKey::Y, -0.4).unwrap();

        document.scenes.add_scene("scene-2", Scene::new("Scene 2"));
        document.scenes.add_scene("scene-3", Scene::new("Scene 3"));
        document.auto = AutoScene {
            enabled: true,
            bombacity: 0.3,
            period: 2.5,
        };
        document
    }

    #[test]
    fn roundtrip_empty_modulator_scene() {
        let mut document = StateDocument::default_state();
        document.scenes.with_active(|scene| scene.modulators.clear());
        let json = document.to_json().unwrap();
        let back = StateDocument::from_json(&json).unwrap();
        assert_eq!(document, back);
    }

    #[test]
    fn roundtrip_multi_modulator_scene() {
        let mut document = StateDocument::default_state();
        document.scenes.add_modulator();
        document.scenes.add_modulator();
        document.scenes.set_modulation(0, ParamKey::Hue, 0.5).unwrap();
        document.scenes.set_modulation(2, ParamKey::Strobe, -1.0).unwrap();
        let json = document.to_json().unwrap();
        let back = StateDocument::from_json(&json).unwrap();
        assert_eq!(document, back);
    }

    #[test]
    fn roundtrip_multi_scene_collection() {
        let document = multi_scene_document();
        let json = document.to_json().unwrap();
        let back = StateDocument::from_json(&json).unwrap();
        assert_eq!(document, back);
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state.json");

        let document = multi_scene_document();
        document.save(&path).unwrap();
        let back = StateDocument::load(&path).unwrap();
        assert_eq!(document, back);
    }

    #[test]
    fn load_missing_file_is_a_read_error() {
        let err = StateDocument::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, DocumentError::ReadFile { .. }));
    }

    #[test]
    fn from_json_rejects_garbage() {
        assert!(matches!(
            StateDocument::from_json("not json").unwrap_err(),
            DocumentError::Parse(_)
        ));
    }

    #[test]
    fn from_json_rejects_broken_invariants() {
        let mut value = serde_json::to_value(multi_scene_document()).unwrap();
        value["scenes"]["active"] = serde_json::Value::String("ghost".to_string());
        let json = serde_json::to_string(&value).unwrap();
        let err = StateDocument::from_json(&json).unwrap_err();
        assert!(matches!(err, DocumentError::Parse(_)));
        assert!(err.to_string().contains("unknown scene id: ghost"), "{err}");
    }

    #[test]
    fn from_json_clamps_out_of_range_values() {
        let mut value = serde_json::to_value(StateDocument::default_state()).unwrap();
        let scene = &mut value["scenes"]["byId"]["scene-1"];
        scene["baseParams"]["hue"] = serde_json::json!(7.5);
        scene["baseParams"]["saturation"] = serde_json::json!(-3.0);
        scene["bombacity"] = serde_json::json!(42.0);
        scene["modulators"][0]["modulation"]["hue"] = serde_json::json!(100.0);

        let json = serde_json::to_string(&value).unwrap();
        let document = StateDocument::from_json(&json).unwrap();
        let scene = document.scenes.get("scene-1").unwrap();
        assert_eq!(scene.base_params.get(ParamKey::Hue), 1.0);
        assert_eq!(scene.base_params.get(ParamKey::Saturation), 0.0);
        assert_eq!(scene.bombacity(), 1.0);
        assert_eq!(scene.modulators[0].depth(ParamKey::Hue), 1.0);
    }

    #[test]
    fn tick_auto_cycles_back_to_start() {
        let mut document = multi_scene_document();
        document.auto.bombacity = 0.0;
        document.auto.period = 1.0;
        let start = document.scenes.active_index();
        let count = document.scenes.len() as u32;

        let mut timer = AutoAdvanceTimer::new();
        let mut rng = fastrand::Rng::with_seed(0);
        let mut advances = 0;
        while advances < count {
            advances += document.tick_auto(&mut timer, 1.0, &mut rng);
        }
        assert_eq!(advances, count);
        assert_eq!(document.scenes.active_index(), start);
    }

    #[test]
    fn tick_auto_disabled_does_nothing() {
        let mut document = multi_scene_document();
        document.auto.enabled = false;
        let before = document.clone();
        let mut timer = AutoAdvanceTimer::new();
        let mut rng = fastrand::Rng::with_seed(0);
        assert_eq!(document.tick_auto(&mut timer, 100.0, &mut rng), 0);
        assert_eq!(document, before);
    }

    #[test]
    fn tick_auto_randomizes_with_global_bombacity() {
        let mut document = multi_scene_document();
        document.auto.period = 1.0;
        document.auto.bombacity = 1.0;
        // Make perturbation certain for the scene that will become active.
        document.scenes.set_active_by_index(2);
        document.scenes.set_active_bombacity(1.0);
        document.scenes.set_randomizer_options(lumen_core::RandomizerOptions {
            base_chance: 1.0,
            base_spread: 1.0,
            ..Default::default()
        });
        document.scenes.set_active_by_index(1);

        let before = document.scenes.get_by_index(2).unwrap().clone();
        let mut timer = AutoAdvanceTimer::new();
        let mut rng = fastrand::Rng::with_seed(11);
        document.tick_auto(&mut timer, 1.0, &mut rng);

        assert_eq!(document.scenes.active_index(), Some(2));
        let after = document.scenes.get_by_index(2).unwrap();
        assert_ne!(before.base_params, after.base_params);
    }
}
