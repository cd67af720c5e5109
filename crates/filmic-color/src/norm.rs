//! Color norms: one scalar summarizing the intensity of an RGB triple.
//!
//! The norm drives chroma-preserving tone mapping: the curve is applied to
//! the norm only, and the pixel keeps its channel ratios.
//!
//! # Example
//!
//! ```rust
//! use filmic_color::{NormMethod, pixel_norm};
//!
//! let n = pixel_norm([0.2, 0.8, 0.5], NormMethod::MaxRgb, None);
//! assert_eq!(n, 0.8);
//! ```

use crate::profile::{WorkingProfile, luminance};
use filmic_math::max3;

/// Floor for the power-norm denominator.
pub const POWER_NORM_EPSILON: f32 = 1e-12;

/// How a pixel is reduced to a single intensity value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NormMethod {
    /// No norm: channels are tone mapped independently.
    ///
    /// Where a single norm is still needed (autotuning), luminance is used.
    None,
    /// Largest channel.
    MaxRgb,
    /// Profile-weighted luminance.
    Luminance,
    /// `sum(|c|^3) / sum(|c|^2)`.
    #[default]
    PowerNorm,
}

impl std::fmt::Display for NormMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::MaxRgb => "max RGB",
            Self::Luminance => "luminance Y",
            Self::PowerNorm => "RGB power norm",
        };
        f.write_str(name)
    }
}

/// Largest of the three channels. Negative when every channel is.
#[inline]
pub fn max_rgb(rgb: [f32; 3]) -> f32 {
    max3(rgb)
}

/// Perceptual power norm, biased toward the brightest and most saturated
/// channel.
#[inline]
pub fn power_norm(rgb: [f32; 3]) -> f32 {
    let mut num = 0.0;
    let mut den = 0.0;
    for c in rgb {
        let a = c.abs();
        let sq = a * a;
        den += sq;
        num += sq * a;
    }
    num / den.max(POWER_NORM_EPSILON)
}

/// Euclidean length of the triple.
#[inline]
pub fn euclidean_norm(rgb: [f32; 3]) -> f32 {
    (rgb[0] * rgb[0] + rgb[1] * rgb[1] + rgb[2] * rgb[2]).sqrt()
}

/// Norm of `rgb` under `method`, never negative.
///
/// Out-of-gamut triples whose max channel or luminance is negative yield 0.
/// Stages that divide by the norm apply their own positive floor on top.
#[inline]
pub fn pixel_norm(rgb: [f32; 3], method: NormMethod, profile: Option<&WorkingProfile>) -> f32 {
    let norm = match method {
        NormMethod::MaxRgb => max_rgb(rgb),
        NormMethod::PowerNorm => power_norm(rgb),
        NormMethod::Luminance | NormMethod::None => luminance(rgb, profile),
    };
    norm.max(0.0)
}
