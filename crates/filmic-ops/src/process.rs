//! Render entry points.
//!
//! One call renders one buffer:
//!
//! ```text
//! input -> clip mask -> [RGB reconstruction -> [ratio reconstruction]] -> tone map -> output
//! ```
//!
//! Reconstruction runs only when enough pixels are clipped. If it cannot
//! allocate its scratch buffers the render continues on the original input;
//! if the ratio pass fails the RGB pass result is kept.
//!
//! # Example
//!
//! ```rust
//! use filmic_core::{RgbaImage, Roi};
//! use filmic_ops::{FilmicData, FilmicParams, ProcessOptions, process};
//!
//! let data = FilmicData::commit(&FilmicParams::default());
//! let input = RgbaImage::filled(32, 32, [0.1845, 0.1845, 0.1845, 1.0]);
//! let out = process(&data, &input, &Roi::new(32, 32), None, &ProcessOptions::default()).unwrap();
//! assert!((out.pixel(5, 5)[0] - 0.1845).abs() < 1e-4);
//! ```

use crate::data::FilmicData;
use crate::mask::ClipMask;
use crate::ratios::{compute_ratios, restore_ratios};
use crate::tonemap::tone_map;
use crate::wavelets::{RatioDomain, RgbDomain, reconstruct_highlights, wavelet_scales};
use crate::{OpsError, OpsResult};
use filmic_color::WorkingProfile;
use filmic_core::{MaskImage, RgbaImage, Roi};
use rayon::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, trace, warn};

/// Per-call host flags.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Output the clip mask on every channel instead of the rendered image.
    pub mask_preview: bool,
    /// Copy the input alpha onto the output, including in mask preview.
    pub display_mask_alpha: bool,
    /// Checked between stages and wavelet scales.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl ProcessOptions {
    fn cancel_flag(&self) -> Option<&AtomicBool> {
        self.cancel.as_deref()
    }

    fn check_cancelled(&self) -> OpsResult<()> {
        match self.cancel_flag() {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(OpsError::Cancelled),
            _ => Ok(()),
        }
    }
}

/// Renders `input` with committed `data`.
///
/// `roi` must describe a buffer of the same size as `input`; its scale and
/// full-image extent size the wavelet pyramid.
///
/// # Errors
///
/// - [`OpsError::SizeMismatch`] if `roi` and `input` disagree
/// - [`OpsError::Cancelled`] if the cancel flag is raised
/// - [`OpsError::Core`] if the output buffer cannot be allocated
pub fn process(
    data: &FilmicData,
    input: &RgbaImage,
    roi: &Roi,
    profile: Option<&WorkingProfile>,
    options: &ProcessOptions,
) -> OpsResult<RgbaImage> {
    trace!(%roi, "process");
    if roi.dimensions() != input.dimensions() {
        return Err(OpsError::SizeMismatch(format!(
            "region is {}x{}, buffer is {}x{}",
            roi.width,
            roi.height,
            input.width(),
            input.height()
        )));
    }
    options.check_cancelled()?;

    let mask = match ClipMask::compute(input, data.reconstruct_threshold, data.reconstruct_feather) {
        Ok(mask) => Some(mask),
        Err(e) if e.is_allocation_error() => {
            warn!(error = %e, "Highlight mask allocation failed, skipping reconstruction");
            None
        }
        Err(e) => return Err(e),
    };

    if options.mask_preview {
        if let Some(mask) = &mask {
            let mut out = mask.preview()?;
            if options.display_mask_alpha {
                copy_alpha(input, &mut out);
            }
            return Ok(out);
        }
    }

    let mut reconstructed = None;
    if let Some(mask) = &mask {
        if mask.needs_reconstruction() {
            options.check_cancelled()?;
            reconstructed = reconstruct(data, input, &mask.mask, roi, profile, options)?;
        } else {
            debug!(clipped = mask.clipped, "Too few clipped pixels, skipping reconstruction");
        }
    }
    drop(mask);

    options.check_cancelled()?;
    let source = reconstructed.as_ref().unwrap_or(input);
    let mut out = tone_map(data, profile, source)?;

    if options.display_mask_alpha {
        copy_alpha(input, &mut out);
    }
    Ok(out)
}

/// Runs the reconstruction passes. `Ok(None)` means the render should fall
/// back to the original input.
fn reconstruct(
    data: &FilmicData,
    input: &RgbaImage,
    mask: &MaskImage,
    roi: &Roi,
    profile: Option<&WorkingProfile>,
    options: &ProcessOptions,
) -> OpsResult<Option<RgbaImage>> {
    let scales = wavelet_scales(roi);
    let weights = &data.reconstruct_weights;
    let cancel = options.cancel_flag();

    let rgb = match reconstruct_highlights::<RgbDomain>(input, mask, weights, scales, cancel) {
        Ok(rgb) => rgb,
        Err(e) if e.is_allocation_error() => {
            warn!(error = %e, "Highlight reconstruction failed, using the original buffer");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    if !data.high_quality_reconstruction {
        return Ok(Some(rgb));
    }

    let (ratios, norms) = match compute_ratios(&rgb, data.preserve_color, profile) {
        Ok(split) => split,
        Err(e) if e.is_allocation_error() => {
            warn!(error = %e, "Ratio buffers allocation failed, keeping the RGB pass");
            return Ok(Some(rgb));
        }
        Err(e) => return Err(e),
    };

    match reconstruct_highlights::<RatioDomain>(&ratios, mask, weights, scales, cancel) {
        Ok(mut out) => {
            restore_ratios(&mut out, &norms)?;
            Ok(Some(out))
        }
        Err(e) if e.is_allocation_error() => {
            warn!(error = %e, "Ratio reconstruction failed, keeping the RGB pass");
            Ok(Some(rgb))
        }
        Err(e) => Err(e),
    }
}

fn copy_alpha(src: &RgbaImage, dst: &mut RgbaImage) {
    dst.par_pixels_mut()
        .zip(src.par_pixels())
        .for_each(|(d, s)| d[3] = s[3]);
}

/// Renders a raw interleaved buffer.
///
/// # Errors
///
/// - [`OpsError::InvalidChannels`] unless `channels == 4`
/// - [`OpsError::SizeMismatch`] if `pixels` does not hold `width * height`
///   pixels
/// - anything [`process`] returns
#[allow(clippy::too_many_arguments)]
pub fn process_interleaved(
    data: &FilmicData,
    pixels: &[f32],
    width: u32,
    height: u32,
    channels: usize,
    roi: &Roi,
    profile: Option<&WorkingProfile>,
    options: &ProcessOptions,
) -> OpsResult<Vec<f32>> {
    if channels != 4 {
        return Err(OpsError::InvalidChannels {
            expected: 4,
            got: channels,
        });
    }
    let expected = width as usize * height as usize * channels;
    if pixels.len() != expected {
        return Err(OpsError::SizeMismatch(format!(
            "expected {} samples for {}x{}, got {}",
            expected,
            width,
            height,
            pixels.len()
        )));
    }

    let input = RgbaImage::from_data(width, height, pixels.to_vec())?;
    Ok(process(data, &input, roi, profile, options)?.into_data())
}
