//! Per-pixel tone mapping.
//!
//! Four kernels come from two independent choices:
//!
//! - **split** (no chroma preservation): every channel is log-encoded,
//!   desaturated toward the luminance of the encoded triple and sent
//!   through the curve. v1 and v2 differ only in encoding and falloff.
//! - **chroma v1**: the norm goes through the curve; ratios are desaturated
//!   toward luminance.
//! - **chroma v2**: the norm goes through the curve; ratios are pushed
//!   toward white, then penalized when the result leaves the display gamut.
//!
//! Chroma kernels are further specialized on the norm. The combination is
//! picked once per render in [`tone_map`]; every kernel is a separate
//! monomorphized pixel loop.
//!
//! Alpha is copied from the input.

pub mod desaturate;

use crate::data::FilmicData;
use crate::log::{LogEncoder, NORM_FLOOR};
use crate::params::ColorScience;
use crate::spline::FilmicSpline;
use crate::OpsResult;
use desaturate::{desaturate_v1, desaturate_v2, linear_saturation};
use filmic_color::{NormMethod, WorkingProfile, luminance, max_rgb, power_norm};
use filmic_core::RgbaImage;
use filmic_math::{clamp01, max3, min3};
use rayon::prelude::*;
use std::marker::PhantomData;
use tracing::{debug, trace};

/// Read-only state shared by every pixel of one render.
#[derive(Debug, Clone, Copy)]
pub struct ToneContext<'a> {
    spline: &'a FilmicSpline,
    encoder: LogEncoder,
    profile: Option<&'a WorkingProfile>,
    sigma_toe: f32,
    sigma_shoulder: f32,
    saturation: f32,
    output_power: f32,
}

impl<'a> ToneContext<'a> {
    /// Binds committed data and an optional working profile.
    pub fn new(data: &'a FilmicData, profile: Option<&'a WorkingProfile>) -> Self {
        Self {
            spline: &data.spline,
            encoder: data.log_encoder(),
            profile,
            sigma_toe: data.sigma_toe,
            sigma_shoulder: data.sigma_shoulder,
            saturation: data.saturation,
            output_power: data.output_power,
        }
    }

    /// Curve plus display transfer on one log value.
    #[inline]
    fn display(&self, x: f32) -> f32 {
        clamp01(self.spline.eval(x)).powf(self.output_power)
    }

    #[inline]
    fn luminance(&self, rgb: [f32; 3]) -> f32 {
        luminance(rgb, self.profile)
    }
}

/// Log encoding and desaturation of one color-science generation.
pub trait Science: Send + Sync {
    /// Scene value to [0, 1].
    fn encode(enc: &LogEncoder, x: f32) -> f32;

    /// Saturation factor at log value `x`.
    fn desaturate(ctx: &ToneContext<'_>, x: f32) -> f32;
}

/// First generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScienceV1;

/// Second generation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScienceV2;

impl Science for ScienceV1 {
    #[inline]
    fn encode(enc: &LogEncoder, x: f32) -> f32 {
        enc.encode_v1(x)
    }

    #[inline]
    fn desaturate(ctx: &ToneContext<'_>, x: f32) -> f32 {
        desaturate_v1(x, ctx.sigma_toe, ctx.sigma_shoulder, ctx.saturation)
    }
}

impl Science for ScienceV2 {
    #[inline]
    fn encode(enc: &LogEncoder, x: f32) -> f32 {
        enc.encode_v2(x)
    }

    #[inline]
    fn desaturate(ctx: &ToneContext<'_>, x: f32) -> f32 {
        desaturate_v2(x, ctx.sigma_toe, ctx.sigma_shoulder, ctx.saturation)
    }
}

/// Norm a chroma kernel is specialized on.
pub trait Norm: Send + Sync {
    /// Norm of one pixel, before flooring.
    fn norm(ctx: &ToneContext<'_>, rgb: [f32; 3]) -> f32;
}

/// Largest channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxRgbNorm;

/// Working-profile luminance.
#[derive(Debug, Clone, Copy, Default)]
pub struct LuminanceNorm;

/// `sum(c^3) / sum(c^2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerNorm;

impl Norm for MaxRgbNorm {
    #[inline]
    fn norm(_: &ToneContext<'_>, rgb: [f32; 3]) -> f32 {
        max_rgb(rgb)
    }
}

impl Norm for LuminanceNorm {
    #[inline]
    fn norm(ctx: &ToneContext<'_>, rgb: [f32; 3]) -> f32 {
        ctx.luminance(rgb)
    }
}

impl Norm for PowerNorm {
    #[inline]
    fn norm(_: &ToneContext<'_>, rgb: [f32; 3]) -> f32 {
        power_norm(rgb)
    }
}

/// A pixel kernel.
pub trait ToneKernel: Send + Sync {
    /// Maps scene RGB to display RGB.
    fn map(ctx: &ToneContext<'_>, rgb: [f32; 3]) -> [f32; 3];
}

/// Each channel through the curve.
#[derive(Debug, Clone, Copy, Default)]
pub struct Split<S>(PhantomData<S>);

/// Norm through the curve, ratios desaturated toward luminance.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromaV1<N>(PhantomData<N>);

/// Norm through the curve, ratios pushed toward white with gamut penalty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromaV2<N>(PhantomData<N>);

impl<S: Science> ToneKernel for Split<S> {
    #[inline]
    fn map(ctx: &ToneContext<'_>, rgb: [f32; 3]) -> [f32; 3] {
        let log = rgb.map(|c| S::encode(&ctx.encoder, c));
        let lum = ctx.luminance(log);
        let desat = S::desaturate(ctx, lum);
        log.map(|c| ctx.display(linear_saturation(c, lum, desat)))
    }
}

/// `rgb / norm`, shifted so no ratio is negative.
#[inline]
fn sanitized_ratios(rgb: [f32; 3], norm: f32) -> [f32; 3] {
    let ratios = rgb.map(|c| c / norm);
    let min = min3(ratios);
    if min < 0.0 { ratios.map(|r| r - min) } else { ratios }
}

impl<N: Norm> ToneKernel for ChromaV1<N> {
    #[inline]
    fn map(ctx: &ToneContext<'_>, rgb: [f32; 3]) -> [f32; 3] {
        let norm = N::norm(ctx, rgb).max(NORM_FLOOR);
        let ratios = sanitized_ratios(rgb, norm);

        let log = ctx.encoder.encode_v1(norm);
        let desat = desaturate_v1(log, ctx.sigma_toe, ctx.sigma_shoulder, ctx.saturation);

        let scaled = ratios.map(|r| r * log);
        let lum = ctx.luminance(scaled);
        let ratios = scaled.map(|c| linear_saturation(c, lum, desat) / log);

        let out = ctx.display(log);
        ratios.map(|r| r * out)
    }
}

impl<N: Norm> ToneKernel for ChromaV2<N> {
    #[inline]
    fn map(ctx: &ToneContext<'_>, rgb: [f32; 3]) -> [f32; 3] {
        let norm = N::norm(ctx, rgb).max(NORM_FLOOR);
        let ratios = sanitized_ratios(rgb, norm);

        let log = ctx.encoder.encode_v2(norm);
        let desat = desaturate_v2(log, ctx.sigma_toe, ctx.sigma_shoulder, ctx.saturation);
        let out = ctx.display(log);

        let ratios = ratios.map(|r| (r + (1.0 - r) * (1.0 - desat)).max(0.0));
        let pixel = ratios.map(|r| r * out);

        let max = max3(pixel);
        if max > 1.0 {
            // gamut penalty
            ratios.map(|r| clamp01((r + (1.0 - max)).max(0.0) * out))
        } else {
            pixel
        }
    }
}

/// Runs kernel `K` over every pixel of `input`.
pub fn apply<K: ToneKernel>(ctx: &ToneContext<'_>, input: &RgbaImage) -> OpsResult<RgbaImage> {
    let (width, height) = input.dimensions();
    trace!(width, height, "tone_map");

    let mut out = RgbaImage::try_new(width, height)?;
    out.par_pixels_mut()
        .zip(input.par_pixels())
        .for_each(|(dst, src)| {
            let rgb = K::map(ctx, [src[0], src[1], src[2]]);
            dst[..3].copy_from_slice(&rgb);
            dst[3] = src[3];
        });
    Ok(out)
}

/// Tone maps `input` with the kernel selected by `data`.
///
/// # Example
///
/// ```rust
/// use filmic_core::RgbaImage;
/// use filmic_ops::{FilmicData, FilmicParams};
/// use filmic_ops::tonemap::tone_map;
///
/// let data = FilmicData::commit(&FilmicParams::default());
/// let grey = RgbaImage::filled(4, 4, [0.1845, 0.1845, 0.1845, 1.0]);
/// let out = tone_map(&data, None, &grey).unwrap();
/// assert!((out.pixel(0, 0)[1] - 0.1845).abs() < 1e-4);
/// ```
pub fn tone_map(
    data: &FilmicData,
    profile: Option<&WorkingProfile>,
    input: &RgbaImage,
) -> OpsResult<RgbaImage> {
    let ctx = ToneContext::new(data, profile);
    debug!(
        preserve_color = %data.preserve_color,
        version = ?data.version,
        "Selected tone kernel"
    );

    use ColorScience::{V1, V2};
    match (data.preserve_color, data.version) {
        (NormMethod::None, V1) => apply::<Split<ScienceV1>>(&ctx, input),
        (NormMethod::None, V2) => apply::<Split<ScienceV2>>(&ctx, input),
        (NormMethod::MaxRgb, V1) => apply::<ChromaV1<MaxRgbNorm>>(&ctx, input),
        (NormMethod::MaxRgb, V2) => apply::<ChromaV2<MaxRgbNorm>>(&ctx, input),
        (NormMethod::Luminance, V1) => apply::<ChromaV1<LuminanceNorm>>(&ctx, input),
        (NormMethod::Luminance, V2) => apply::<ChromaV2<LuminanceNorm>>(&ctx, input),
        (NormMethod::PowerNorm, V1) => apply::<ChromaV1<PowerNorm>>(&ctx, input),
        (NormMethod::PowerNorm, V2) => apply::<ChromaV2<PowerNorm>>(&ctx, input),
    }
}
