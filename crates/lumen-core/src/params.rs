//! The controllable parameter registry.
//!
//! Parameters are a fixed, compile-time set: every scene carries a value for
//! every key, and nothing else. The renderer consumes one [`Params`] snapshot
//! per evaluation tick.

use serde::{Deserialize, Serialize};

use crate::math::clamp_normalized;

/// Identifier for one controllable parameter.
///
/// The registry is finite and known at compile time; a parameter that is not
/// listed here does not exist anywhere in the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamKey {
    /// Color hue
    Hue,
    /// Color saturation
    Saturation,
    /// Overall brightness
    Brightness,
    /// Horizontal position
    X,
    /// Vertical position
    Y,
    /// Horizontal extent
    Width,
    /// Vertical extent
    Height,
    /// Strobe amount
    Strobe,
}

impl ParamKey {
    /// Every key in the registry, in display/iteration order.
    pub const ALL: [ParamKey; 8] = [
        ParamKey::Hue,
        ParamKey::Saturation,
        ParamKey::Brightness,
        ParamKey::X,
        ParamKey::Y,
        ParamKey::Width,
        ParamKey::Height,
        ParamKey::Strobe,
    ];

    /// Short lowercase name, matching the serialized form.
    pub fn name(self) -> &'static str {
        match self {
            ParamKey::Hue => "hue",
            ParamKey::Saturation => "saturation",
            ParamKey::Brightness => "brightness",
            ParamKey::X => "x",
            ParamKey::Y => "y",
            ParamKey::Width => "width",
            ParamKey::Height => "height",
            ParamKey::Strobe => "strobe",
        }
    }
}

impl core::fmt::Display for ParamKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// One value per registry key, each in [0, 1].
///
/// A field per key means a missing entry is unrepresentable: every scene
/// always has a complete parameter set, and no extraneous keys can appear.
/// Fields are private and both [`set`](Self::set) and deserialization clamp,
/// so a stored value is never outside its domain.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "ParamsRepr", into = "ParamsRepr")]
pub struct Params {
    hue: f32,
    saturation: f32,
    brightness: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    strobe: f32,
}

impl Params {
    /// Get the value for a key.
    pub fn get(&self, key: ParamKey) -> f32 {
        match key {
            ParamKey::Hue => self.hue,
            ParamKey::Saturation => self.saturation,
            ParamKey::Brightness => self.brightness,
            ParamKey::X => self.x,
            ParamKey::Y => self.y,
            ParamKey::Width => self.width,
            ParamKey::Height => self.height,
            ParamKey::Strobe => self.strobe,
        }
    }

    /// Set the value for a key, clamped to [0, 1].
    pub fn set(&mut self, key: ParamKey, value: f32) {
        let value = clamp_normalized(value);
        match key {
            ParamKey::Hue => self.hue = value,
            ParamKey::Saturation => self.saturation = value,
            ParamKey::Brightness => self.brightness = value,
            ParamKey::X => self.x = value,
            ParamKey::Y => self.y = value,
            ParamKey::Width => self.width = value,
            ParamKey::Height => self.height = value,
            ParamKey::Strobe => self.strobe = value,
        }
    }

    /// Add `delta` to the value for a key, clamping the result.
    pub fn increment(&mut self, key: ParamKey, delta: f32) {
        self.set(key, self.get(key) + delta);
    }

    /// Iterate over every `(key, value)` pair in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamKey, f32)> + '_ {
        ParamKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            hue: 0.5,
            saturation: 0.5,
            brightness: 0.5,
            x: 0.5,
            y: 0.5,
            width: 0.5,
            height: 0.5,
            strobe: 0.0,
        }
    }
}

/// Serialized form of [`Params`]; conversion back clamps every field.
#[derive(Serialize, Deserialize, Clone, Copy)]
#[serde(rename_all = "camelCase")]
struct ParamsRepr {
    hue: f32,
    saturation: f32,
    brightness: f32,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    strobe: f32,
}

impl From<ParamsRepr> for Params {
    fn from(repr: ParamsRepr) -> Self {
        Self {
            hue: clamp_normalized(repr.hue),
            saturation: clamp_normalized(repr.saturation),
            brightness: clamp_normalized(repr.brightness),
            x: clamp_normalized(repr.x),
            y: clamp_normalized(repr.y),
            width: clamp_normalized(repr.width),
            height: clamp_normalized(repr.height),
            strobe: clamp_normalized(repr.strobe),
        }
    }
}

impl From<Params> for ParamsRepr {
    fn from(params: Params) -> Self {
        Self {
            hue: params.hue,
            saturation: params.saturation,
            brightness: params.brightness,
            x: params.x,
            y: params.y,
            width: params.width,
            height: params.height,
            strobe: params.strobe,
        }
    }
}
