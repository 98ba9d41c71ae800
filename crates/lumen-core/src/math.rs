//! Numeric helpers shared across the engine.
//!
//! Every stored engine value lives in a declared range, and every mutation
//! path funnels through one of these helpers so that no unclamped value is
//! ever observable.

/// Clamp a value to the normalized [0, 1] range.
///
/// This is the domain of every parameter in the registry and of most
/// modulator shape controls.
///
/// # Example
/// ```rust
/// use lumen_core::clamp_normalized;
///
/// assert_eq!(clamp_normalized(0.3), 0.3);
/// assert_eq!(clamp_normalized(-2.0), 0.0);
/// assert_eq!(clamp_normalized(1.5), 1.0);
/// ```
#[inline]
pub fn clamp_normalized(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Clamp a value to the bipolar [-1, 1] range.
///
/// Domain of modulation depths and of the skew/flip shape controls.
#[inline]
pub fn clamp_bipolar(x: f32) -> f32 {
    x.clamp(-1.0, 1.0)
}

/// Wrap a phase value into [0, 1), always non-negative.
///
/// Unlike `%`, this behaves correctly for negative inputs, so oscillator
/// evaluation is well defined for negative time.
///
/// # Example
/// ```rust
/// use lumen_core::wrap_phase;
///
/// assert!((wrap_phase(1.25) - 0.25).abs() < 1e-6);
/// assert!((wrap_phase(-0.25) - 0.75).abs() < 1e-6);
/// ```
#[inline]
pub fn wrap_phase(x: f32) -> f32 {
    let wrapped = x.rem_euclid(1.0);
    // rem_euclid can return exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
