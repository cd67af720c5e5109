//! Working-profile transfer curve.
//!
//! Some working spaces are not linear; their profile carries a sampled
//! transfer curve that must be applied per channel before the matrix. The
//! table covers [0, 1]; inputs above 1 continue along the slope of the last
//! segment, so HDR values stay monotonic instead of clipping.

use crate::{ColorError, ColorResult};
use filmic_math::lerp;

/// Sampled transfer curve over [0, 1], shared by all channels.
///
/// # Example
///
/// ```rust
/// use filmic_color::ToneLut;
///
/// let lut = ToneLut::gamma(1024, 2.2);
/// assert!((lut.apply(0.5) - 0.5f32.powf(2.2)).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ToneLut {
    data: Vec<f32>,
}

impl ToneLut {
    /// Power curve `x^gamma`.
    pub fn gamma(size: usize, gamma: f32) -> Self {
        let size = size.max(2);
        let n = (size - 1) as f32;
        Self {
            data: (0..size).map(|i| (i as f32 / n).powf(gamma)).collect(),
        }
    }

    /// Curve from evenly spaced samples.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidLut`] for fewer than two samples or
    /// non-finite entries.
    pub fn from_data(data: Vec<f32>) -> ColorResult<Self> {
        if data.len() < 2 {
            return Err(ColorError::InvalidLut("LUT size must be > 1".into()));
        }
        if !data.iter().all(|v| v.is_finite()) {
            return Err(ColorError::InvalidLut("LUT entries must be finite".into()));
        }
        Ok(Self { data })
    }

    /// Applies the curve to one value.
    #[inline]
    pub fn apply(&self, value: f32) -> f32 {
        let last = self.data.len() - 1;
        let idx_f = value * last as f32;
        let idx0 = if idx_f <= 0.0 {
            0
        } else {
            (idx_f as usize).min(last - 1)
        };
        lerp(self.data[idx0], self.data[idx0 + 1], idx_f - idx0 as f32)
    }

    /// Applies the curve to each channel.
    #[inline]
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        rgb.map(|c| self.apply(c))
    }
}
