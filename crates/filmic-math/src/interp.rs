//! Scalar helpers used across the tone-mapping stages.
//!
//! # Usage
//!
//! ```rust
//! use filmic_math::{clamp01, lerp, max_abs};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(clamp01(1.5), 1.0);
//! assert_eq!(max_abs(-3.0, 2.0), -3.0);
//! ```

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps a value to [0, 1]. NaN maps to 0.
#[inline]
pub fn clamp01(x: f32) -> f32 {
    if x > 0.0 { x.min(1.0) } else { 0.0 }
}

/// Squares a value.
#[inline]
pub fn sq(x: f32) -> f32 {
    x * x
}

/// Returns whichever argument has the larger magnitude, keeping its sign.
///
/// # Example
///
/// ```rust
/// use filmic_math::max_abs;
///
/// assert_eq!(max_abs(0.5, -0.75), -0.75);
/// ```
#[inline]
pub fn max_abs(a: f32, b: f32) -> f32 {
    if a.abs() >= b.abs() { a } else { b }
}

/// Returns whichever argument has the smaller magnitude, keeping its sign.
#[inline]
pub fn min_abs(a: f32, b: f32) -> f32 {
    if a.abs() <= b.abs() { a } else { b }
}

/// Signed max-magnitude over three values.
#[inline]
pub fn max_abs3(v: [f32; 3]) -> f32 {
    max_abs(max_abs(v[0], v[1]), v[2])
}

/// Signed min-magnitude over three values.
#[inline]
pub fn min_abs3(v: [f32; 3]) -> f32 {
    min_abs(min_abs(v[0], v[1]), v[2])
}

/// Largest of three values.
#[inline]
pub fn max3(v: [f32; 3]) -> f32 {
    v[0].max(v[1]).max(v[2])
}

/// Smallest of three values.
#[inline]
pub fn min3(v: [f32; 3]) -> f32 {
    v[0].min(v[1]).min(v[2])
}
