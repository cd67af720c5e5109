//! Derived per-render data.
//!
//! [`FilmicData::commit`] turns user parameters into everything the pixel
//! kernels need: the solved curve, the log encoding, desaturation widths and
//! the reconstruction settings in linear units. Hosts call it whenever the
//! parameters change and reuse the result for every render until then.
//!
//! # Example
//!
//! ```rust
//! use filmic_ops::{FilmicData, FilmicParams};
//!
//! let data = FilmicData::commit(&FilmicParams::default());
//! assert!((data.grey_source - 0.1845).abs() < 1e-6);
//! assert!((data.saturation - 1.0).abs() < 1e-6);
//! ```

use crate::log::LogEncoder;
use crate::params::{ColorScience, FilmicParams};
use crate::spline::{self, DEFAULT_GREY, FilmicSpline};
use crate::wavelets::ReconstructionWeights;
use filmic_color::NormMethod;

/// Everything a render call reads; immutable once committed.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmicData {
    /// Solved tone curve.
    pub spline: FilmicSpline,
    /// Scene grey, linear.
    pub grey_source: f32,
    /// Scene black relative to grey, EV.
    pub black_source: f32,
    /// Scene dynamic range, EV.
    pub dynamic_range: f32,
    /// Display transfer exponent.
    pub output_power: f32,
    /// Contrast after the grey guard.
    pub contrast: f32,
    /// Saturation gain at the extremes.
    pub saturation: f32,
    /// Gaussian width of the toe desaturation.
    pub sigma_toe: f32,
    /// Gaussian width of the shoulder desaturation.
    pub sigma_shoulder: f32,
    /// Center of the clipping sigmoid, linear.
    pub reconstruct_threshold: f32,
    /// Steepness of the clipping sigmoid.
    pub reconstruct_feather: f32,
    /// Blending weights of the wavelet synthesis.
    pub reconstruct_weights: ReconstructionWeights,
    /// Norm used to preserve chrominance.
    pub preserve_color: NormMethod,
    /// Kernel generation.
    pub version: ColorScience,
    /// Run the ratio-domain reconstruction pass.
    pub high_quality_reconstruction: bool,
}

/// Maps a -100..100 % slider to a 0..1 blend weight.
#[inline]
fn blend_weight(percent: f32) -> f32 {
    (percent / 100.0 + 1.0) / 2.0
}

impl FilmicData {
    /// Derives render data from parameters.
    pub fn commit(params: &FilmicParams) -> Self {
        let grey_source = if params.custom_grey {
            params.grey_point_source / 100.0
        } else {
            DEFAULT_GREY
        };

        let white_source = params.white_point_source;
        let dynamic_range = spline::dynamic_range(params);
        let contrast = spline::guarded_contrast(params);
        let spline = FilmicSpline::with_contrast(params, contrast);

        Self {
            grey_source,
            black_source: params.black_point_source,
            dynamic_range,
            output_power: params.output_power,
            contrast,
            saturation: 2.0 * params.saturation / 100.0 + 1.0,
            sigma_toe: (spline.latitude_min / 3.0).powi(2),
            sigma_shoulder: ((1.0 - spline.latitude_max) / 3.0).powi(2),
            reconstruct_threshold: 2f32.powf(white_source + params.reconstruct_threshold)
                * grey_source,
            reconstruct_feather: 2f32.powf(12.0 / params.reconstruct_feather),
            reconstruct_weights: ReconstructionWeights {
                structure_vs_texture: blend_weight(params.reconstruct_structure_vs_texture),
                grey_vs_color: blend_weight(params.reconstruct_grey_vs_color),
                bloom_vs_details: blend_weight(params.reconstruct_bloom_vs_details),
            },
            preserve_color: params.preserve_color,
            version: params.version,
            high_quality_reconstruction: params.high_quality_reconstruction,
            spline,
        }
    }

    /// Log encoding matching this data.
    #[inline]
    pub fn log_encoder(&self) -> LogEncoder {
        LogEncoder::new(self.grey_source, self.black_source, self.dynamic_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_commit() {
        let d = FilmicData::commit(&FilmicParams::default());
        assert!((d.dynamic_range - 14.0).abs() < 1e-5);
        assert!((d.contrast - 1.3).abs() < 1e-6);
        // threshold at the scene white
        assert_relative_eq!(d.reconstruct_threshold, 0.1845 * 2f32.powf(3.45), max_relative = 1e-5);
        assert_relative_eq!(d.reconstruct_feather, 16.0, max_relative = 1e-5);
        let w = d.reconstruct_weights;
        assert!((w.structure_vs_texture - 0.75).abs() < 1e-6);
        assert!((w.grey_vs_color - 0.5).abs() < 1e-6);
        assert!((w.bloom_vs_details - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sigmas_follow_latitude() {
        let d = FilmicData::commit(&FilmicParams::default());
        let expected = (d.spline.latitude_min / 3.0) * (d.spline.latitude_min / 3.0);
        assert!((d.sigma_toe - expected).abs() < 1e-7);
        assert!(d.sigma_shoulder > 0.0);
    }

    #[test]
    fn test_custom_grey_source() {
        let p = FilmicParams {
            custom_grey: true,
            grey_point_source: 9.0,
            ..Default::default()
        };
        let d = FilmicData::commit(&p);
        assert!((d.grey_source - 0.09).abs() < 1e-6);
    }

    #[test]
    fn test_saturation_gain() {
        let p = FilmicParams {
            saturation: 50.0,
            ..Default::default()
        };
        assert!((FilmicData::commit(&p).saturation - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_range_stays_finite() {
        let p = FilmicParams {
            black_point_source: 2.0,
            white_point_source: 2.0,
            ..Default::default()
        };
        let d = FilmicData::commit(&p);
        assert!(d.dynamic_range > 0.0);
        assert!(d.log_encoder().encode_v2(0.5).is_finite());
    }
}
