//! Chroma falloff near the ends of the curve.
//!
//! Both generations build two Gaussian keys on the log-encoded value, one
//! centered on black (toe) and one on white (shoulder), with widths derived
//! from the latitude boundaries. They differ in how the keys become a
//! saturation factor.

use filmic_math::{clamp01, sq};

/// First-generation factor in [0, 1]: 1 keeps full chroma, 0 collapses to
/// luminance.
#[inline]
pub fn desaturate_v1(x: f32, sigma_toe: f32, sigma_shoulder: f32, saturation: f32) -> f32 {
    let key_toe = (-0.5 * sq(x) / sigma_toe).exp();
    let key_shoulder = (-0.5 * sq(1.0 - x) / sigma_shoulder).exp();
    1.0 - clamp01((key_toe + key_shoulder) / saturation)
}

/// Second-generation factor, scaled by `saturation` and possibly negative
/// at the extremes (pushes ratios past white).
#[inline]
pub fn desaturate_v2(x: f32, sigma_toe: f32, sigma_shoulder: f32, saturation: f32) -> f32 {
    let sat2 = 0.5 / saturation.sqrt();
    let key_toe = (-sq(x) / sigma_toe * sat2).exp();
    let key_shoulder = (-sq(1.0 - x) / sigma_shoulder * sat2).exp();
    saturation - (key_toe + key_shoulder) * saturation
}

/// Moves `x` away from (or toward) `luminance` by `saturation`.
#[inline]
pub fn linear_saturation(x: f32, luminance: f32, saturation: f32) -> f32 {
    luminance + saturation * (x - luminance)
}
