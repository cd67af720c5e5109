//! SIMD helpers for RGBA pixels.
//!
//! One RGBA pixel fits one `f32x4` lane group, so the multi-scale filters
//! accumulate whole pixels at a time using the `wide` crate.
//!
//! # Example
//!
//! ```rust
//! use filmic_math::simd::b_spline_x4;
//!
//! let px = [1.0, 2.0, 3.0, 4.0];
//! let acc = b_spline_x4([&px, &px, &px, &px, &px]);
//! assert!((acc[3] - 4.0).abs() < 1e-6);
//! ```

use wide::f32x4;

/// Normalized 5-tap B3-spline kernel `[1, 4, 6, 4, 1] / 16`.
pub const B_SPLINE_5: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Weighted sum of five pixels with the [`B_SPLINE_5`] kernel.
#[inline]
pub fn b_spline_x4(taps: [&[f32]; 5]) -> [f32; 4] {
    let mut acc = f32x4::ZERO;
    for (tap, &w) in taps.iter().zip(B_SPLINE_5.iter()) {
        let v = f32x4::from([tap[0], tap[1], tap[2], tap[3]]);
        acc += v * f32x4::splat(w);
    }
    acc.to_array()
}

/// Lane-wise `a - b`.
#[inline]
pub fn sub_x4(a: &[f32], b: &[f32]) -> [f32; 4] {
    (f32x4::from([a[0], a[1], a[2], a[3]]) - f32x4::from([b[0], b[1], b[2], b[3]])).to_array()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized() {
        let sum: f32 = B_SPLINE_5.iter().sum();
        assert!((sum - 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_b_spline_flat() {
        let px = [0.5, 0.25, 2.0, 1.0];
        let out = b_spline_x4([&px, &px, &px, &px, &px]);
        for (o, p) in out.iter().zip(px.iter()) {
            assert!((o - p).abs() < 1e-6);
        }
    }

    #[test]
    fn test_b_spline_impulse() {
        let z = [0.0; 4];
        let one = [1.0; 4];
        let out = b_spline_x4([&z, &z, &one, &z, &z]);
        assert!((out[0] - 0.375).abs() < 1e-7);
    }

    #[test]
    fn test_sub() {
        let d = sub_x4(&[1.0, 2.0, 3.0, 4.0], &[0.5, 0.5, 0.5, 0.5]);
        assert_eq!(d, [0.5, 1.5, 2.5, 3.5]);
    }
}
