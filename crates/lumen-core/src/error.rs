//! Structural error types for engine and collection operations.

use thiserror::Error;

/// Errors raised by index- and id-addressed engine operations.
///
/// These represent caller bugs (stale index, nonexistent id), not user-facing
/// failures; there is nothing to retry. Operations that are expected to race
/// with transient UI state (mutating when no scene is active, selecting by an
/// out-of-range index) are deliberate silent no-ops instead and never produce
/// one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An index-addressed operation referenced a position outside the list.
    #[error("index {index} out of range (length {len})")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the addressed list at the time of the call.
        len: usize,
    },

    /// A scene id was not present in the collection.
    #[error("unknown scene id: {0}")]
    UnknownSceneId(String),

    /// Removal was refused because it would leave the collection empty.
    #[error("cannot remove the last remaining scene")]
    CannotRemoveLastScene,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_out_of_range_display() {
        let err = EngineError::IndexOutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range (length 3)");
    }

    #[test]
    fn unknown_scene_id_display() {
        let err = EngineError::UnknownSceneId("abc123".to_string());
        assert_eq!(err.to_string(), "unknown scene id: abc123");
    }

    #[test]
    fn last_scene_display() {
        assert_eq!(
            EngineError::CannotRemoveLastScene.to_string(),
            "cannot remove the last remaining scene"
        );
    }
}
