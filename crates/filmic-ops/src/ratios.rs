//! Splitting RGB into a norm and chromaticity ratios.
//!
//! `ratio = rgb / norm`, with the norm floored at 2^-16 so black pixels stay
//! finite. The ratio-domain reconstruction pass runs on the ratios and the
//! norms are multiplied back afterwards.

use crate::OpsResult;
use crate::log::NORM_FLOOR;
use filmic_color::{NormMethod, WorkingProfile, pixel_norm};
use filmic_core::{MaskImage, RgbaImage};
use rayon::prelude::*;

/// Returns `(ratios, norms)` for every pixel of `input`.
///
/// Alpha is carried over to the ratio buffer unchanged.
///
/// # Example
///
/// ```rust
/// use filmic_color::NormMethod;
/// use filmic_core::RgbaImage;
/// use filmic_ops::ratios::{compute_ratios, restore_ratios};
///
/// let img = RgbaImage::filled(2, 2, [0.8, 0.4, 0.2, 1.0]);
/// let (mut ratios, norms) = compute_ratios(&img, NormMethod::MaxRgb, None).unwrap();
/// assert_eq!(ratios.pixel(0, 0), [1.0, 0.5, 0.25, 1.0]);
///
/// restore_ratios(&mut ratios, &norms).unwrap();
/// assert_eq!(ratios, img);
/// ```
pub fn compute_ratios(
    input: &RgbaImage,
    method: NormMethod,
    profile: Option<&WorkingProfile>,
) -> OpsResult<(RgbaImage, MaskImage)> {
    let (width, height) = input.dimensions();
    let mut ratios = RgbaImage::try_new(width, height)?;
    let mut norms = MaskImage::try_new(width, height)?;

    ratios
        .par_pixels_mut()
        .zip(norms.data_mut().par_iter_mut())
        .zip(input.par_pixels())
        .for_each(|((r, n), px)| {
            let norm = pixel_norm([px[0], px[1], px[2]], method, profile).max(NORM_FLOOR);
            *n = norm;
            r[0] = px[0] / norm;
            r[1] = px[1] / norm;
            r[2] = px[2] / norm;
            r[3] = px[3];
        });

    Ok((ratios, norms))
}

/// Multiplies the RGB ratios of `ratios` back by `norms`, in place.
///
/// # Errors
///
/// Returns a dimension mismatch if the buffers differ in size.
pub fn restore_ratios(ratios: &mut RgbaImage, norms: &MaskImage) -> OpsResult<()> {
    ratios.ensure_same_size(norms)?;
    ratios
        .par_pixels_mut()
        .zip(norms.data().par_iter())
        .for_each(|(px, &n)| {
            px[0] *= n;
            px[1] *= n;
            px[2] *= n;
        });
    Ok(())
}
