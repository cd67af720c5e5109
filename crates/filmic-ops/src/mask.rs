//! Clipped-highlight mask.
//!
//! Each pixel gets a weight in [0, 1] from the Euclidean norm of its RGB
//! values through a base-2 sigmoid centered on the clipping threshold:
//!
//! ```text
//! argument = feather - norm * feather / threshold
//! weight   = 1 / (1 + 2^argument)
//! ```
//!
//! Weight 0 means the pixel is trusted, 1 means it is fully clipped and
//! must be synthesized.

use crate::OpsResult;
use filmic_color::euclidean_norm;
use filmic_core::{MaskImage, RgbaImage};
use rayon::prelude::*;
use tracing::{debug, trace};

/// Pixels whose sigmoid argument is below this count as clipped
/// (weight above ~5.9 %).
pub const CLIP_ARGUMENT: f32 = 4.0;

/// Reconstruction runs only when more clipped pixels than this are found.
pub const MIN_CLIPPED_PIXELS: usize = 9;

/// Mask plus the number of pixels that need reconstruction.
#[derive(Debug, Clone)]
pub struct ClipMask {
    /// One weight per pixel.
    pub mask: MaskImage,
    /// Pixels with a weight above ~5.9 %.
    pub clipped: usize,
}

impl ClipMask {
    /// Builds the mask of `input` for a linear `threshold` and sigmoid
    /// steepness `feather`.
    ///
    /// # Errors
    ///
    /// Returns an allocation error if the mask buffer cannot be allocated.
    pub fn compute(input: &RgbaImage, threshold: f32, feather: f32) -> OpsResult<Self> {
        let (width, height) = input.dimensions();
        trace!(width, height, threshold, feather, "clip_mask");

        let mut mask = MaskImage::try_new(width, height)?;
        let normalize = feather / threshold.max(f32::MIN_POSITIVE);

        let clipped = mask
            .data_mut()
            .par_iter_mut()
            .zip(input.par_pixels())
            .map(|(m, px)| {
                let (weight, argument) = clip_weight(euclidean_norm([px[0], px[1], px[2]]), normalize, feather);
                *m = weight;
                usize::from(argument < CLIP_ARGUMENT)
            })
            .sum();

        debug!(clipped, "Computed highlight mask");
        Ok(Self { mask, clipped })
    }

    /// Returns `true` if enough pixels are clipped to justify reconstruction.
    #[inline]
    pub fn needs_reconstruction(&self) -> bool {
        self.clipped > MIN_CLIPPED_PIXELS
    }

    /// Broadcasts the mask to all four channels for display.
    pub fn preview(&self) -> OpsResult<RgbaImage> {
        let (width, height) = self.mask.dimensions();
        let mut out = RgbaImage::try_new(width, height)?;
        out.par_pixels_mut()
            .zip(self.mask.data().par_iter())
            .for_each(|(px, &m)| px.fill(m));
        Ok(out)
    }
}

/// Sigmoid weight and its argument for one pixel norm.
#[inline]
pub fn clip_weight(norm: f32, normalize: f32, feather: f32) -> (f32, f32) {
    let argument = feather - norm * normalize;
    (1.0 / (1.0 + argument.exp2()), argument)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weight_bounds() {
        let (feather, threshold) = (16.0, 2.0);
        let normalize = feather / threshold;
        let mut prev = 0.0;
        for i in 0..200 {
            let norm = i as f32 * 0.05;
            let (w, _) = clip_weight(norm, normalize, feather);
            assert!((0.0..=1.0).contains(&w));
            assert!(w >= prev);
            prev = w;
        }
        assert!(clip_weight(0.0, normalize, feather).0 < 1e-4);
        assert!(clip_weight(1e3, normalize, feather).0 > 0.9999);
        // half weight at the threshold
        assert!((clip_weight(threshold, normalize, feather).0 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_counts_clipped_pixels() {
        let mut img = RgbaImage::filled(8, 8, [0.1, 0.1, 0.1, 1.0]);
        for x in 0..8 {
            img.set_pixel(x, 0, [5.0, 5.0, 5.0, 1.0]);
            img.set_pixel(x, 1, [5.0, 5.0, 5.0, 1.0]);
        }
        let m = ClipMask::compute(&img, 2.0, 16.0).unwrap();
        assert_eq!(m.clipped, 16);
        assert!(m.needs_reconstruction());
        assert!(m.mask.pixel(0, 0)[0] > 0.99);
        assert!(m.mask.pixel(4, 4)[0] < 1e-3);
    }

    #[test]
    fn test_few_clipped_pixels_skip() {
        let mut img = RgbaImage::filled(8, 8, [0.1, 0.1, 0.1, 1.0]);
        for x in 0..9 {
            img.set_pixel(x % 8, x / 8, [5.0, 5.0, 5.0, 1.0]);
        }
        let m = ClipMask::compute(&img, 2.0, 16.0).unwrap();
        assert_eq!(m.clipped, 9);
        assert!(!m.needs_reconstruction());
    }

    #[test]
    fn test_preview_broadcasts() {
        let img = RgbaImage::filled(4, 4, [5.0, 5.0, 5.0, 0.25]);
        let m = ClipMask::compute(&img, 2.0, 16.0).unwrap();
        let out = m.preview().unwrap();
        let px = out.pixel(2, 2);
        assert!(px.iter().all(|&v| v == m.mask.pixel(2, 2)[0]));
    }
}
