//! Parameter estimation from sampled colors.
//!
//! The estimators read colors picked from the scene (mean, darkest and
//! brightest) and set the scene exposure parameters accordingly. All norms
//! follow the configured chroma preservation method.
//!
//! The picker estimators ([`auto_grey`], [`auto_black`], [`auto_white`],
//! [`autotune`]) always recompute `output_power` so that the scene grey lands
//! on the display grey. The plain setters ([`set_grey_source`],
//! [`set_security_factor`]) only do so when `auto_hardness` is on:
//!
//! ```text
//! output_power = ln(grey_target / 100) / ln(-black / (white - black))
//! ```
//!
//! # Example
//!
//! ```rust
//! use filmic_core::RgbaImage;
//! use filmic_ops::FilmicParams;
//! use filmic_ops::autotune::{RegionStats, autotune};
//!
//! let img = RgbaImage::filled(4, 4, [0.2, 0.2, 0.2, 1.0]);
//! let mut params = FilmicParams::default();
//! autotune(&mut params, &RegionStats::from_image(&img), None);
//! assert!((params.grey_point_source - 10.0).abs() < 1e-3);
//! ```

use crate::params::FilmicParams;
use filmic_color::{WorkingProfile, pixel_norm};
use filmic_core::RgbaImage;
use rayon::prelude::*;
use tracing::debug;

/// Per-channel statistics of a sampled region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionStats {
    /// Mean RGB.
    pub mean: [f32; 3],
    /// Per-channel minimum.
    pub min: [f32; 3],
    /// Per-channel maximum.
    pub max: [f32; 3],
}

#[derive(Clone, Copy)]
struct Accumulator {
    sum: [f64; 3],
    min: [f32; 3],
    max: [f32; 3],
    count: usize,
}

impl Accumulator {
    const EMPTY: Self = Self {
        sum: [0.0; 3],
        min: [f32::INFINITY; 3],
        max: [f32::NEG_INFINITY; 3],
        count: 0,
    };

    fn push(mut self, px: &[f32]) -> Self {
        for c in 0..3 {
            self.sum[c] += f64::from(px[c]);
            self.min[c] = self.min[c].min(px[c]);
            self.max[c] = self.max[c].max(px[c]);
        }
        self.count += 1;
        self
    }

    fn merge(mut self, other: Self) -> Self {
        for c in 0..3 {
            self.sum[c] += other.sum[c];
            self.min[c] = self.min[c].min(other.min[c]);
            self.max[c] = self.max[c].max(other.max[c]);
        }
        self.count += other.count;
        self
    }
}

impl RegionStats {
    /// Statistics over every pixel of `img`. An empty image yields zeros.
    pub fn from_image(img: &RgbaImage) -> Self {
        let acc = img
            .par_pixels()
            .fold(|| Accumulator::EMPTY, Accumulator::push)
            .reduce(|| Accumulator::EMPTY, Accumulator::merge);

        if acc.count == 0 {
            return Self {
                mean: [0.0; 3],
                min: [0.0; 3],
                max: [0.0; 3],
            };
        }
        let n = acc.count as f64;
        Self {
            mean: acc.sum.map(|s| (s / n) as f32),
            min: acc.min,
            max: acc.max,
        }
    }
}

/// Display-grey-preserving output power for the current exposure settings.
///
/// Returns `None` when the settings do not define a finite positive power
/// (black not below grey, or an empty range).
pub fn auto_output_power(params: &FilmicParams) -> Option<f32> {
    let black = params.black_point_source;
    let white = params.white_point_source;
    let power = (params.grey_point_target / 100.0).ln() / (-black / (white - black)).ln();
    (power.is_finite() && power > 0.0).then_some(power)
}

fn refresh_output_power(params: &mut FilmicParams) {
    if let Some(power) = auto_output_power(params) {
        params.output_power = power;
    }
}

fn apply_hardness(params: &mut FilmicParams) {
    if params.auto_hardness {
        refresh_output_power(params);
    }
}

fn grey_from(mean: [f32; 3], params: &FilmicParams, profile: Option<&WorkingProfile>) -> f32 {
    let grey = pixel_norm(mean, params.preserve_color, profile) / 2.0;
    (100.0 * grey).max(0.001).min(100.0)
}

fn white_ev(max: [f32; 3], params: &FilmicParams, profile: Option<&WorkingProfile>) -> f32 {
    let white = pixel_norm(max, params.preserve_color, profile);
    let ev = (white / (params.grey_point_source / 100.0)).log2().max(1.0).min(16.0);
    ev * (1.0 + params.security_factor / 100.0)
}

fn black_ev(min: [f32; 3], params: &FilmicParams, profile: Option<&WorkingProfile>) -> f32 {
    let black = pixel_norm(min, params.preserve_color, profile);
    let ev = (black / (params.grey_point_source / 100.0)).log2().max(-16.0).min(-1.0);
    (ev * (1.0 + params.security_factor / 100.0)).max(-16.0)
}

fn shift_grey(params: &mut FilmicParams, grey: f32) {
    let grey = grey.max(0.001).min(100.0);
    let shift = (params.grey_point_source / grey).log2();
    params.grey_point_source = grey;
    params.black_point_source -= shift;
    params.white_point_source += shift;
}

/// Moves the scene grey to `grey` %.
///
/// Black and white move apart by the EV change of grey (or closer together
/// when grey goes up).
pub fn set_grey_source(params: &mut FilmicParams, grey: f32) {
    shift_grey(params, grey);
    apply_hardness(params);
}

/// Sets the scene grey from the mean color of a region.
///
/// The picked average is assumed to sit one EV above middle grey.
pub fn auto_grey(params: &mut FilmicParams, mean: [f32; 3], profile: Option<&WorkingProfile>) {
    let grey = grey_from(mean, params, profile);
    debug!(grey, "Auto grey");
    shift_grey(params, grey);
    refresh_output_power(params);
}

/// Sets the scene black from the darkest color of a region.
pub fn auto_black(params: &mut FilmicParams, min: [f32; 3], profile: Option<&WorkingProfile>) {
    params.black_point_source = black_ev(min, params, profile);
    debug!(black = params.black_point_source, "Auto black");
    refresh_output_power(params);
}

/// Sets the scene white from the brightest color of a region.
pub fn auto_white(params: &mut FilmicParams, max: [f32; 3], profile: Option<&WorkingProfile>) {
    params.white_point_source = white_ev(max, params, profile);
    debug!(white = params.white_point_source, "Auto white");
    refresh_output_power(params);
}

/// Sets grey, white and black from one region.
///
/// Grey is set first and the extremes are measured against it, so black and
/// white are not shifted by the grey change.
pub fn autotune(params: &mut FilmicParams, stats: &RegionStats, profile: Option<&WorkingProfile>) {
    params.grey_point_source = grey_from(stats.mean, params, profile);
    params.white_point_source = white_ev(stats.max, params, profile);
    params.black_point_source = black_ev(stats.min, params, profile);
    debug!(
        grey = params.grey_point_source,
        black = params.black_point_source,
        white = params.white_point_source,
        "Autotune"
    );
    refresh_output_power(params);
}

/// Changes the security factor, scaling black and white by the relative
/// change.
pub fn set_security_factor(params: &mut FilmicParams, security_factor: f32) {
    let previous = params.security_factor;
    let ratio = (security_factor - previous) / (previous + 100.0);
    params.security_factor = security_factor;
    params.black_point_source += ratio * params.black_point_source;
    params.white_point_source += ratio * params.white_point_source;
    apply_hardness(params);
}

#[cfg(test)]
mod tests {
    use super::*;
    use filmic_color::NormMethod;

    fn params() -> FilmicParams {
        FilmicParams {
            preserve_color: NormMethod::MaxRgb,
            ..Default::default()
        }
    }

    #[test]
    fn test_region_stats() {
        let mut img = RgbaImage::filled(2, 2, [0.5, 0.5, 0.5, 1.0]);
        img.set_pixel(0, 0, [0.1, 0.2, 0.3, 1.0]);
        img.set_pixel(1, 1, [0.9, 4.0, 0.5, 1.0]);
        let s = RegionStats::from_image(&img);
        assert_eq!(s.min, [0.1, 0.2, 0.3]);
        assert_eq!(s.max, [0.9, 4.0, 0.5]);
        assert!((s.mean[1] - 5.2 / 4.0).abs() < 1e-6);

        let empty = RegionStats::from_image(&RgbaImage::new(0, 0));
        assert_eq!(empty.mean, [0.0; 3]);
    }

    #[test]
    fn test_auto_grey_shifts_bounds() {
        let mut p = params();
        auto_grey(&mut p, [0.369, 0.369, 0.369], None);
        assert!((p.grey_point_source - 18.45).abs() < 1e-3);
        assert!((p.black_point_source - -10.55).abs() < 1e-4);

        auto_grey(&mut p, [0.0923, 0.0, 0.0], None);
        assert!((p.grey_point_source - 4.615).abs() < 1e-3);
        let shift = (18.45f32 / 4.615).log2();
        assert!((p.black_point_source - (-10.55 - shift)).abs() < 1e-3);
        assert!((p.white_point_source - (3.45 + shift)).abs() < 1e-3);
    }

    #[test]
    fn test_auto_black_white_clamps() {
        let mut p = params();
        auto_white(&mut p, [1e9, 0.0, 0.0], None);
        assert_eq!(p.white_point_source, 16.0);
        auto_white(&mut p, [0.2, 0.0, 0.0], None);
        assert_eq!(p.white_point_source, 1.0);
        auto_black(&mut p, [0.0; 3], None);
        assert_eq!(p.black_point_source, -16.0);
        auto_black(&mut p, [0.18, 0.0, 0.0], None);
        assert_eq!(p.black_point_source, -1.0);
    }

    #[test]
    fn test_security_factor_scales_bounds() {
        let mut p = params();
        p.auto_hardness = false;
        auto_white(&mut p, [0.1845 * 8.0, 0.0, 0.0], None);
        assert!((p.white_point_source - 3.0).abs() < 1e-4);

        set_security_factor(&mut p, 50.0);
        assert!((p.white_point_source - 4.5).abs() < 1e-4);
        assert!((p.black_point_source - -10.55 * 1.5).abs() < 1e-3);
        set_security_factor(&mut p, 0.0);
        assert!((p.white_point_source - 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_output_power() {
        let mut p = params();
        let power = auto_output_power(&p).unwrap();
        // grey at 10.55 / 14 of the range maps to 18.45 %
        let expected = 0.1845f32.ln() / (10.55f32 / 14.0).ln();
        assert!((power - expected).abs() < 1e-4);

        p.black_point_source = 1.0;
        assert!(auto_output_power(&p).is_none());

        let mut p = params();
        p.auto_hardness = false;
        auto_black(&mut p, [0.001, 0.0, 0.0], None);
        assert_eq!(Some(p.output_power), auto_output_power(&p));
        assert_ne!(p.output_power, 5.98);
    }

    #[test]
    fn test_setters_respect_auto_hardness() {
        let mut p = params();
        p.auto_hardness = false;
        set_grey_source(&mut p, 9.0);
        set_security_factor(&mut p, 20.0);
        assert_eq!(p.output_power, 5.98);

        p.auto_hardness = true;
        set_security_factor(&mut p, 10.0);
        assert_eq!(Some(p.output_power), auto_output_power(&p));
    }

    #[test]
    fn test_autotune_measures_against_new_grey() {
        let mut img = RgbaImage::filled(3, 1, [0.36, 0.36, 0.36, 1.0]);
        img.set_pixel(0, 0, [0.0018, 0.0018, 0.0018, 1.0]);
        img.set_pixel(2, 0, [2.0, 2.0, 2.0, 1.0]);
        let stats = RegionStats::from_image(&img);
        let mut p = params();
        autotune(&mut p, &stats, None);
        let grey = p.grey_point_source / 100.0;
        assert!((p.white_point_source - (2.0 / grey).log2()).abs() < 1e-3);
        assert!((p.black_point_source - (0.0018 / grey).log2()).abs() < 1e-3);
        assert!(p.output_power > 0.0);
    }
}
