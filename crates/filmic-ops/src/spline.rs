//! Filmic tone curve.
//!
//! The curve maps log-encoded scene values in [0, 1] to display values in
//! [0, 1]. It has three segments:
//!
//! ```text
//!   y
//!   1 |                          ____----  shoulder (poly 3/4)
//!     |                    __---
//!     |                 _-/  <- latitude: straight line, slope = contrast
//!     |              _-/
//!     |          __-/
//!   0 |____----                            toe (poly 3/4)
//!     +----------|----------|---------- x
//!     0      latitude_min  latitude_max  1
//! ```
//!
//! The toe and shoulder polynomials match the straight segment in value,
//! slope and curvature at the latitude bounds, so the curve is C2 there.
//! The 4th order variants are also flat at the black and white nodes.
//!
//! The curve is built once per parameter change and read-only afterwards.
//!
//! # Example
//!
//! ```rust
//! use filmic_ops::{FilmicParams, FilmicSpline};
//!
//! let spline = FilmicSpline::compute(&FilmicParams::default());
//! let grey = spline.eval(spline.x[2]);
//! assert!((grey - spline.y[2]).abs() < 1e-5);
//! ```

use crate::params::{CurveOrder, FilmicParams};
use filmic_math::gauss_solve;
use tracing::debug;

/// Middle grey used when no custom grey is set.
pub const DEFAULT_GREY: f32 = 0.1845;

/// Smallest dynamic range accepted by the log encoding, EV.
pub const MIN_DYNAMIC_RANGE: f32 = 0.01;

/// Piecewise polynomial tone curve.
///
/// Segment coefficients are stored in ascending power order:
/// `c[0] + c[1] x + c[2] x^2 + c[3] x^3 + c[4] x^4`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilmicSpline {
    /// Node abscissas: black, toe, grey, shoulder, white (log domain).
    pub x: [f32; 5],
    /// Node ordinates (display domain, before the output power).
    pub y: [f32; 5],
    /// Toe polynomial, used for `x < latitude_min`.
    pub toe: [f32; 5],
    /// Straight segment between the latitude bounds.
    pub latitude: [f32; 5],
    /// Shoulder polynomial, used for `x > latitude_max`.
    pub shoulder: [f32; 5],
    /// Start of the straight segment.
    pub latitude_min: f32,
    /// End of the straight segment.
    pub latitude_max: f32,
}

/// Scene dynamic range in EV, floored to keep the log encoding finite.
#[inline]
pub(crate) fn dynamic_range(params: &FilmicParams) -> f32 {
    params.dynamic_range().max(MIN_DYNAMIC_RANGE)
}

/// Display middle grey before the output power is applied.
pub fn grey_display(params: &FilmicParams) -> f32 {
    let inv_power = 1.0 / params.output_power;
    if params.custom_grey {
        let target = params
            .grey_point_target
            .max(params.black_point_target)
            .min(params.white_point_target);
        (target / 100.0).powf(inv_power)
    } else {
        DEFAULT_GREY.powf(inv_power)
    }
}

/// Contrast raised, if needed, so the straight segment crosses x = 0 below
/// the grey node's display value.
pub fn guarded_contrast(params: &FilmicParams) -> f32 {
    let grey_display = grey_display(params);
    let grey_log = params.black_point_source.abs() / dynamic_range(params);
    let contrast = params.contrast;
    if grey_log > 0.0 && contrast < grey_display / grey_log {
        1.0001 * grey_display / grey_log
    } else {
        contrast
    }
}

impl FilmicSpline {
    /// Builds the curve with the guarded contrast.
    pub fn compute(params: &FilmicParams) -> Self {
        Self::with_contrast(params, guarded_contrast(params))
    }

    /// Builds the curve with an explicit contrast (clamped to [0.1, 2]).
    pub fn with_contrast(params: &FilmicParams, contrast: f32) -> Self {
        let grey_display = grey_display(params);
        let white_source = params.white_point_source;
        let black_source = params.black_point_source;
        let dr = dynamic_range(params);

        let grey_log = black_source.abs() / dr;

        let black_display = params
            .black_point_target
            .max(0.0)
            .min(params.grey_point_target)
            / 100.0;
        let white_display = params
            .white_point_target
            .max(params.grey_point_target)
            .min(100.0)
            / 100.0;

        let latitude = params.latitude.max(0.0).min(100.0) / 100.0 * dr;
        let balance = params.balance.max(-50.0).min(50.0) / 100.0;
        let contrast = contrast.max(0.1).min(2.0);

        let mut toe_log = grey_log - latitude / dr * (black_source / dr).abs();
        let mut shoulder_log = grey_log + latitude / dr * (white_source / dr).abs();

        let intercept = grey_display - contrast * grey_log;
        let mut toe_display = toe_log * contrast + intercept;
        let mut shoulder_display = shoulder_log * contrast + intercept;

        // slide both latitude bounds along the straight segment
        let norm = (contrast * contrast + 1.0).sqrt();
        let coeff = -((2.0 * latitude) / dr) * balance;
        toe_display += coeff * contrast / norm;
        shoulder_display += coeff * contrast / norm;
        toe_log += coeff / norm;
        shoulder_log += coeff / norm;

        let x = [0.0, toe_log, grey_log, shoulder_log, 1.0];
        let y = [black_display, toe_display, grey_display, shoulder_display, white_display];

        let linear = [y[1] - contrast * x[1], contrast, 0.0, 0.0, 0.0];

        let toe = solve_toe(params.shadows, x[1], y[0], y[1], contrast).unwrap_or_else(|| {
            debug!(toe = x[1], "Toe system is singular, using the straight segment");
            linear
        });
        let shoulder = solve_shoulder(params.highlights, x[3], y[4], y[3], contrast)
            .unwrap_or_else(|| {
                debug!(shoulder = x[3], "Shoulder system is singular, using the straight segment");
                linear
            });

        debug!(?x, ?y, contrast, "Computed filmic spline");

        Self {
            x,
            y,
            toe,
            latitude: linear,
            shoulder,
            latitude_min: x[1],
            latitude_max: x[3],
        }
    }

    /// Evaluates the curve at a log-encoded value.
    #[inline]
    pub fn eval(&self, x: f32) -> f32 {
        let m = if x < self.latitude_min {
            &self.toe
        } else if x > self.latitude_max {
            &self.shoulder
        } else {
            &self.latitude
        };
        m[0] + x * (m[1] + x * (m[2] + x * (m[3] + x * m[4])))
    }

    /// `n` evenly spaced `(x, y)` points over [0, 1].
    pub fn sample(&self, n: usize) -> Vec<(f32, f32)> {
        match n {
            0 => Vec::new(),
            1 => vec![(0.0, self.eval(0.0))],
            _ => {
                let step = 1.0 / (n - 1) as f32;
                (0..n)
                    .map(|i| {
                        let x = i as f32 * step;
                        (x, self.eval(x))
                    })
                    .collect()
            }
        }
    }
}

/// Toe through (0, y0) meeting the straight segment at `t`.
fn solve_toe(order: CurveOrder, t: f32, y0: f32, y1: f32, slope: f32) -> Option<[f32; 5]> {
    let t = t as f64;
    let (t2, t3, t4) = (t * t, t * t * t, t * t * t * t);
    let (y0, y1, slope) = (y0 as f64, y1 as f64, slope as f64);
    match order {
        CurveOrder::Poly4 => {
            let a = [
                [0.0, 0.0, 0.0, 0.0, 1.0],
                [0.0, 0.0, 0.0, 1.0, 0.0],
                [t4, t3, t2, t, 1.0],
                [4.0 * t3, 3.0 * t2, 2.0 * t, 1.0, 0.0],
                [12.0 * t2, 6.0 * t, 2.0, 0.0, 0.0],
            ];
            gauss_solve(a, [y0, 0.0, y1, slope, 0.0]).map(ascending5)
        }
        CurveOrder::Poly3 => {
            let a = [
                [0.0, 0.0, 0.0, 1.0],
                [t3, t2, t, 1.0],
                [3.0 * t2, 2.0 * t, 1.0, 0.0],
                [6.0 * t, 2.0, 0.0, 0.0],
            ];
            gauss_solve(a, [y0, y1, slope, 0.0]).map(ascending4)
        }
    }
}

/// Shoulder through (1, y4) meeting the straight segment at `s`.
fn solve_shoulder(order: CurveOrder, s: f32, y4: f32, y3: f32, slope: f32) -> Option<[f32; 5]> {
    let s = s as f64;
    let (s2, s3, s4) = (s * s, s * s * s, s * s * s * s);
    let (y4, y3, slope) = (y4 as f64, y3 as f64, slope as f64);
    match order {
        CurveOrder::Poly4 => {
            let a = [
                [1.0, 1.0, 1.0, 1.0, 1.0],
                [4.0, 3.0, 2.0, 1.0, 0.0],
                [s4, s3, s2, s, 1.0],
                [4.0 * s3, 3.0 * s2, 2.0 * s, 1.0, 0.0],
                [12.0 * s2, 6.0 * s, 2.0, 0.0, 0.0],
            ];
            gauss_solve(a, [y4, 0.0, y3, slope, 0.0]).map(ascending5)
        }
        CurveOrder::Poly3 => {
            let a = [
                [1.0, 1.0, 1.0, 1.0],
                [s3, s2, s, 1.0],
                [3.0 * s2, 2.0 * s, 1.0, 0.0],
                [6.0 * s, 2.0, 0.0, 0.0],
            ];
            gauss_solve(a, [y4, y3, slope, 0.0]).map(ascending4)
        }
    }
}

// the systems are written with the highest power first
fn ascending5(d: [f64; 5]) -> [f32; 5] {
    [d[4] as f32, d[3] as f32, d[2] as f32, d[1] as f32, d[0] as f32]
}

fn ascending4(d: [f64; 4]) -> [f32; 5] {
    [d[3] as f32, d[2] as f32, d[1] as f32, d[0] as f32, 0.0]
}
