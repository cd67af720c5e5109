//! Working color profile used for luminance norms.
//!
//! A profile is the RGB-to-XYZ matrix of the working space plus an optional
//! transfer curve. Luminance is the Y row of the matrix applied to the
//! (linearized) pixel. Without a profile, a fixed camera-RGB weighting is
//! used instead.
//!
//! # Example
//!
//! ```rust
//! use filmic_color::{WorkingProfile, camera_rgb_luminance};
//!
//! let profile = WorkingProfile::rec2020();
//! let y = profile.luminance([1.0, 1.0, 1.0]);
//! assert!((y - 1.0).abs() < 1e-4);
//! assert!((camera_rgb_luminance([1.0, 1.0, 1.0]) - 1.0).abs() < 1e-4);
//! ```

use crate::{ColorError, ColorResult, ToneLut};
use filmic_math::Mat3;

/// Camera-RGB luminance weights used when no profile is available.
pub const CAMERA_RGB_LUMINANCE: [f32; 3] = [0.222_504_5, 0.716_878_6, 0.060_616_9];

/// Luminance of a camera-RGB triple.
#[inline]
pub fn camera_rgb_luminance(rgb: [f32; 3]) -> f32 {
    let w = CAMERA_RGB_LUMINANCE;
    w[0] * rgb[0] + w[1] * rgb[1] + w[2] * rgb[2]
}

/// Working-space description: RGB-to-XYZ matrix and optional transfer curve.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingProfile {
    matrix: Mat3,
    lut: Option<ToneLut>,
}

impl WorkingProfile {
    /// Linear profile from an RGB-to-XYZ matrix.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::MatrixError`] if the matrix has non-finite entries.
    pub fn new(matrix: Mat3) -> ColorResult<Self> {
        if !matrix.is_finite() {
            return Err(ColorError::MatrixError("matrix has non-finite entries".into()));
        }
        Ok(Self { matrix, lut: None })
    }

    /// Linear Rec.2020.
    pub fn rec2020() -> Self {
        Self {
            matrix: Mat3::REC2020_TO_XYZ,
            lut: None,
        }
    }

    /// Linear Rec.709 / sRGB primaries.
    pub fn rec709() -> Self {
        Self {
            matrix: Mat3::REC709_TO_XYZ,
            lut: None,
        }
    }

    /// Attaches a transfer curve applied before the matrix.
    pub fn with_lut(mut self, lut: ToneLut) -> Self {
        self.lut = Some(lut);
        self
    }

    /// Profile-weighted luminance (Y) of an RGB triple.
    #[inline]
    pub fn luminance(&self, rgb: [f32; 3]) -> f32 {
        let linear = match &self.lut {
            Some(lut) => lut.apply_rgb(rgb),
            None => rgb,
        };
        self.matrix.row_dot(1, linear)
    }
}

/// Luminance with an optional profile, falling back to camera RGB.
#[inline]
pub fn luminance(rgb: [f32; 3], profile: Option<&WorkingProfile>) -> f32 {
    match profile {
        Some(p) => p.luminance(rgb),
        None => camera_rgb_luminance(rgb),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rec709_primaries() {
        let p = WorkingProfile::rec709();
        assert!((p.luminance([1.0, 0.0, 0.0]) - 0.2126729).abs() < 1e-6);
        assert!((p.luminance([0.0, 1.0, 0.0]) - 0.7151522).abs() < 1e-6);
    }

    #[test]
    fn test_lut_applied_before_matrix() {
        let p = WorkingProfile::rec709().with_lut(ToneLut::gamma(4096, 2.0));
        let y = p.luminance([0.5, 0.5, 0.5]);
        assert!((y - 0.25).abs() < 1e-3);
        let linear = WorkingProfile::rec709().luminance([0.25, 0.25, 0.25]);
        assert!((linear - y).abs() < 1e-3);
    }

    #[test]
    fn test_fallback() {
        let rgb = [0.2, 0.4, 0.8];
        assert_eq!(luminance(rgb, None), camera_rgb_luminance(rgb));
        let p = WorkingProfile::rec2020();
        assert_eq!(luminance(rgb, Some(&p)), p.luminance(rgb));
    }

    #[test]
    fn test_rejects_nan_matrix() {
        let mut m = Mat3::REC2020_TO_XYZ;
        m.m[1][1] = f32::NAN;
        assert!(WorkingProfile::new(m).is_err());
        assert!(WorkingProfile::new(Mat3::REC709_TO_XYZ).is_ok());
    }
}
