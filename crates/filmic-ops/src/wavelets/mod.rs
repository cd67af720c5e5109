//! Multi-scale highlight reconstruction.
//!
//! Clipped regions are filled from their surroundings with an à-trous
//! wavelet decomposition. At each scale `s` the current low-frequency layer
//! is blurred with taps `2^s` pixels apart; the difference is the detail
//! layer of that scale. Details are blurred once more to inpaint holes, and
//! the masked pixels accumulate a blend of
//!
//! - a flat texture term taken from the strongest (or weakest) channel,
//! - the per-channel details,
//! - a flat structure term taken from the low-frequency layer,
//!
//! weighted by [`ReconstructionWeights`]. Unmasked pixels keep their input
//! values.
//!
//! Two domains are supported: [`RgbDomain`] works on scene RGB,
//! [`RatioDomain`] on chromaticity ratios (see [`crate::ratios`]) and favors
//! smooth, achromatic solutions.

mod filter;

use crate::{OpsError, OpsResult};
use filmic_core::{MaskImage, RgbaImage, Roi};
use filmic_math::simd::sub_x4;
use filmic_math::{max3, max_abs3, min3, min_abs3};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace};

/// Upper bound on the number of wavelet scales.
pub const MAX_SCALES: usize = 12;

/// Blend weights of the synthesis, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconstructionWeights {
    /// 1 copies the sharpest channel texture, 0 inpaints smooth details.
    pub structure_vs_texture: f32,
    /// 1 keeps per-channel color, 0 forces an achromatic fill.
    pub grey_vs_color: f32,
    /// 1 restores details, 0 leaves a blurry bloom.
    pub bloom_vs_details: f32,
}

/// Number of scales needed so the coarsest filter covers the same share of
/// the image at any zoom level.
///
/// # Example
///
/// ```rust
/// use filmic_core::Roi;
/// use filmic_ops::wavelets::wavelet_scales;
///
/// assert_eq!(wavelet_scales(&Roi::new(256, 256)), 4);
/// assert_eq!(wavelet_scales(&Roi::new(8, 8)), 1);
/// ```
pub fn wavelet_scales(roi: &Roi) -> usize {
    // 5-tap filter: the coarsest level spans 1/5 of the largest dimension
    let arg = 2.0 * roi.extent() / 20.0 - 1.0;
    if !(arg > 0.0) {
        return 1;
    }
    let scales = arg.log2().floor();
    scales.max(1.0).min(MAX_SCALES as f32) as usize
}

/// Per-domain choice of the flat synthesis terms.
pub trait ReconstructionDomain: Send + Sync {
    /// Name used in logs.
    const NAME: &'static str;

    /// Flat texture term from one pixel's detail coefficients.
    fn texture(hf: [f32; 3]) -> f32;

    /// Flat structure term from one pixel's low-frequency values.
    fn residual(lf: [f32; 3]) -> f32;
}

/// Reconstruction on scene RGB: sharpest texture, darkest structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct RgbDomain;

impl ReconstructionDomain for RgbDomain {
    const NAME: &'static str = "rgb";

    #[inline]
    fn texture(hf: [f32; 3]) -> f32 {
        max_abs3(hf)
    }

    #[inline]
    fn residual(lf: [f32; 3]) -> f32 {
        min3(lf)
    }
}

/// Reconstruction on chromaticity ratios: smoothest texture, brightest
/// (most achromatic) structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioDomain;

impl ReconstructionDomain for RatioDomain {
    const NAME: &'static str = "ratios";

    #[inline]
    fn texture(hf: [f32; 3]) -> f32 {
        min_abs3(hf)
    }

    #[inline]
    fn residual(lf: [f32; 3]) -> f32 {
        max3(lf)
    }
}

#[inline]
fn rgb(px: &[f32]) -> [f32; 3] {
    [px[0], px[1], px[2]]
}

/// Synthesizes masked pixels of `input` from `scales` wavelet levels.
///
/// The output keeps `input * (1 - mask)` on RGB and the input alpha, then
/// accumulates the synthesized terms weighted by the mask.
///
/// # Errors
///
/// - [`OpsError::Core`] if the buffers differ in size or scratch memory
///   cannot be allocated
/// - [`OpsError::Cancelled`] if `cancel` is raised between scales
pub fn reconstruct_highlights<D: ReconstructionDomain>(
    input: &RgbaImage,
    mask: &MaskImage,
    weights: &ReconstructionWeights,
    scales: usize,
    cancel: Option<&AtomicBool>,
) -> OpsResult<RgbaImage> {
    input.ensure_same_size(mask)?;
    let (width, height) = input.dimensions();
    let scales = scales.clamp(1, MAX_SCALES);
    debug!(width, height, scales, domain = D::NAME, "Reconstructing highlights");

    let mut lf = RgbaImage::try_new(width, height)?;
    let mut lf_next = RgbaImage::try_new(width, height)?;
    let mut hf = RgbaImage::try_new(width, height)?;
    let mut tmp = RgbaImage::try_new(width, height)?;
    let mut texture = MaskImage::try_new(width, height)?;
    let mut out = RgbaImage::try_new(width, height)?;

    out.par_pixels_mut()
        .zip(input.par_pixels())
        .zip(mask.data().par_iter())
        .for_each(|((dst, src), &m)| {
            let keep = 1.0 - m;
            dst[0] = src[0] * keep;
            dst[1] = src[1] * keep;
            dst[2] = src[2] * keep;
            dst[3] = src[3];
        });

    for s in 0..scales {
        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            debug!(scale = s, "Reconstruction cancelled");
            return Err(OpsError::Cancelled);
        }
        let mult = 1usize << s;
        trace!(scale = s, mult, "wavelet level");

        let detail = if s == 0 { input } else { &lf };
        filter::blur(detail, &mut tmp, &mut lf_next, mult);
        detail_level::<D>(detail, &lf_next, &mut hf, &mut texture);
        filter::blur_in_place(&mut hf, &mut tmp, mult);
        synthesize::<D>(&hf, &lf_next, &texture, mask, weights, scales, &mut out);

        std::mem::swap(&mut lf, &mut lf_next);
    }

    Ok(out)
}

/// `hf = detail - lf` and the flat texture of each pixel.
fn detail_level<D: ReconstructionDomain>(
    detail: &RgbaImage,
    lf: &RgbaImage,
    hf: &mut RgbaImage,
    texture: &mut MaskImage,
) {
    hf.par_pixels_mut()
        .zip(texture.data_mut().par_iter_mut())
        .zip(detail.par_pixels().zip(lf.par_pixels()))
        .for_each(|((h, t), (d, l))| {
            h.copy_from_slice(&sub_x4(d, l));
            *t = D::texture(rgb(h));
        });
}

/// Adds one level's contribution to the masked pixels of `out`.
fn synthesize<D: ReconstructionDomain>(
    hf: &RgbaImage,
    lf: &RgbaImage,
    texture: &MaskImage,
    mask: &MaskImage,
    weights: &ReconstructionWeights,
    scales: usize,
    out: &mut RgbaImage,
) {
    let gamma = weights.structure_vs_texture;
    let gamma_comp = 1.0 - gamma;
    let beta = weights.grey_vs_color;
    let beta_comp = 1.0 - beta;
    let delta = weights.bloom_vs_details;
    let inv_scales = 1.0 / scales as f32;

    out.par_pixels_mut()
        .zip(hf.par_pixels().zip(lf.par_pixels()))
        .zip(texture.data().par_iter().zip(mask.data().par_iter()))
        .for_each(|((dst, (h, l)), (&tex, &alpha))| {
            let h = rgb(h);
            let l = rgb(l);
            let grey_texture = gamma * tex;
            let grey_details = gamma_comp * max_abs3(h);
            let grey_hf = beta_comp * (grey_details + grey_texture);
            let grey_residual = beta_comp * D::residual(l);

            for c in 0..3 {
                let color_residual = l[c] * beta;
                let color_details = h[c] * beta * gamma_comp;
                dst[c] += alpha
                    * (delta * (grey_hf + color_details) + (grey_residual + color_residual) * inv_scales);
            }
        });
}
