//! User-facing filmic parameters.
//!
//! Scene values are expressed the way a photographer reads them: grey in
//! percent of scene luminance, black and white relative to grey in EV.
//! Display targets are percentages of the output medium's range.
//!
//! Nothing here is range-checked beyond the numeric guards applied by
//! [`FilmicData::commit`](crate::FilmicData::commit); hosts are expected to
//! validate slider ranges themselves.
//!
//! # Example
//!
//! ```rust
//! use filmic_ops::{ColorScience, FilmicParams};
//!
//! let mut params = FilmicParams::default();
//! params.white_point_source = 4.5;
//! params.version = ColorScience::V1;
//! assert!((params.dynamic_range() - 15.05).abs() < 1e-5);
//! ```

use filmic_color::NormMethod;

/// Degree of the polynomial used for the toe or the shoulder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CurveOrder {
    /// 4th order: flat at the end node (hard).
    #[default]
    Poly4,
    /// 3rd order: free slope at the end node (soft).
    Poly3,
}

/// Color-science generation of the tone-mapping kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ColorScience {
    /// Desaturation toward luminance with an asymmetric log floor.
    V1,
    /// Desaturation toward white with gamut penalization.
    #[default]
    V2,
}

/// Complete parameter set for one filmic instance.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilmicParams {
    /// Scene middle grey, % of scene luminance.
    pub grey_point_source: f32,
    /// Scene black relative to grey, EV.
    pub black_point_source: f32,
    /// Scene white relative to grey, EV.
    pub white_point_source: f32,
    /// Clipping threshold offset relative to white, EV.
    pub reconstruct_threshold: f32,
    /// Mask transition width, EV.
    pub reconstruct_feather: f32,
    /// Bloom (-100) vs. details (+100), %.
    pub reconstruct_bloom_vs_details: f32,
    /// Grey (-100) vs. color (+100), %.
    pub reconstruct_grey_vs_color: f32,
    /// Structure (-100) vs. texture (+100), %.
    pub reconstruct_structure_vs_texture: f32,
    /// Symmetric enlargement of the dynamic range, %.
    pub security_factor: f32,
    /// Display middle grey, %.
    pub grey_point_target: f32,
    /// Display black, %.
    pub black_point_target: f32,
    /// Display white, %.
    pub white_point_target: f32,
    /// Display transfer exponent (hardness).
    pub output_power: f32,
    /// Linear part of the curve, % of dynamic range.
    pub latitude: f32,
    /// Slope of the linear part.
    pub contrast: f32,
    /// Saturation at the extremes, %.
    pub saturation: f32,
    /// Shadows vs. highlights balance, %.
    pub balance: f32,
    /// Norm used to preserve chrominance.
    pub preserve_color: NormMethod,
    /// Toe polynomial.
    pub shadows: CurveOrder,
    /// Shoulder polynomial.
    pub highlights: CurveOrder,
    /// Kernel generation.
    pub version: ColorScience,
    /// Derive `output_power` from the other settings on autotune.
    pub auto_hardness: bool,
    /// Use `grey_point_source` / `grey_point_target` instead of 18.45 %.
    pub custom_grey: bool,
    /// Run the second, ratio-domain reconstruction pass.
    pub high_quality_reconstruction: bool,
}

impl Default for FilmicParams {
    fn default() -> Self {
        Self {
            grey_point_source: 18.45,
            black_point_source: -10.55,
            white_point_source: 3.45,
            reconstruct_threshold: 0.0,
            reconstruct_feather: 3.0,
            reconstruct_bloom_vs_details: 100.0,
            reconstruct_grey_vs_color: 0.0,
            reconstruct_structure_vs_texture: 50.0,
            security_factor: 0.0,
            grey_point_target: 18.45,
            black_point_target: 0.0,
            white_point_target: 100.0,
            output_power: 5.98,
            latitude: 40.0,
            contrast: 1.30,
            saturation: 0.0,
            balance: 12.0,
            preserve_color: NormMethod::PowerNorm,
            shadows: CurveOrder::Poly4,
            highlights: CurveOrder::Poly4,
            version: ColorScience::V2,
            auto_hardness: true,
            custom_grey: false,
            high_quality_reconstruction: false,
        }
    }
}

impl FilmicParams {
    /// Scene dynamic range in EV (white minus black).
    #[inline]
    pub fn dynamic_range(&self) -> f32 {
        self.white_point_source - self.black_point_source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let p = FilmicParams::default();
        assert_eq!(p.preserve_color, NormMethod::PowerNorm);
        assert_eq!(p.version, ColorScience::V2);
        assert_eq!((p.shadows, p.highlights), (CurveOrder::Poly4, CurveOrder::Poly4));
        assert!((p.dynamic_range() - 14.0).abs() < 1e-5);
        assert!(p.auto_hardness && !p.custom_grey && !p.high_quality_reconstruction);
    }
}
