//! Separable à-trous B-spline blur.
//!
//! The 5-tap kernel `[1, 4, 6, 4, 1] / 16` is applied along rows, then
//! along columns, with taps spread `mult` pixels apart. Out-of-range taps
//! are clamped to the nearest edge pixel.

use filmic_core::RgbaImage;
use filmic_math::simd::b_spline_x4;
use rayon::prelude::*;

#[inline]
fn tap_index(center: usize, k: usize, mult: usize, last: usize) -> usize {
    let offset = (k as isize - 2) * mult as isize;
    (center as isize + offset).clamp(0, last as isize) as usize
}

/// Blurs every row of `src` into `dst`.
pub(crate) fn blur_rows(src: &RgbaImage, dst: &mut RgbaImage, mult: usize) {
    let width = src.width() as usize;
    if width == 0 {
        return;
    }
    let stride = width * 4;
    let last = width - 1;
    let data = src.data();

    dst.par_rows_mut().enumerate().for_each(|(y, row)| {
        let src_row = &data[y * stride..(y + 1) * stride];
        for (x, out) in row.chunks_exact_mut(4).enumerate() {
            let taps: [&[f32]; 5] = std::array::from_fn(|k| {
                let i = tap_index(x, k, mult, last) * 4;
                &src_row[i..i + 4]
            });
            out.copy_from_slice(&b_spline_x4(taps));
        }
    });
}

/// Blurs every column of `src` into `dst`.
pub(crate) fn blur_cols(src: &RgbaImage, dst: &mut RgbaImage, mult: usize) {
    let (width, height) = (src.width() as usize, src.height() as usize);
    if width == 0 || height == 0 {
        return;
    }
    let stride = width * 4;
    let last = height - 1;
    let data = src.data();

    dst.par_rows_mut().enumerate().for_each(|(y, row)| {
        let rows: [&[f32]; 5] = std::array::from_fn(|k| {
            let r = tap_index(y, k, mult, last);
            &data[r * stride..(r + 1) * stride]
        });
        for (x, out) in row.chunks_exact_mut(4).enumerate() {
            let i = x * 4;
            let taps: [&[f32]; 5] = std::array::from_fn(|k| &rows[k][i..i + 4]);
            out.copy_from_slice(&b_spline_x4(taps));
        }
    });
}

/// 2D blur of `src` into `dst`, using `tmp` for the intermediate pass.
pub(crate) fn blur(src: &RgbaImage, tmp: &mut RgbaImage, dst: &mut RgbaImage, mult: usize) {
    blur_rows(src, tmp, mult);
    blur_cols(tmp, dst, mult);
}

/// 2D blur of `img` in place.
pub(crate) fn blur_in_place(img: &mut RgbaImage, tmp: &mut RgbaImage, mult: usize) {
    blur_rows(img, tmp, mult);
    blur_cols(tmp, img, mult);
}
