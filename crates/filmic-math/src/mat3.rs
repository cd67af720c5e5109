//! 3x3 matrix type for linear RGB transforms.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and use **column vectors**:
//!
//! ```text
//! | m00 m01 m02 |   | r |   | m00*r + m01*g + m02*b |
//! | m10 m11 m12 | * | g | = | m10*r + m11*g + m12*b |
//! | m20 m21 m22 |   | b |   | m20*r + m21*g + m22*b |
//! ```
//!
//! For an RGB-to-XYZ matrix the middle row is the luminance (Y) weighting.
//!
//! # Usage
//!
//! ```rust
//! use filmic_math::Mat3;
//!
//! let rgb_to_xyz = Mat3::REC2020_TO_XYZ;
//! let y = rgb_to_xyz.row_dot(1, [1.0, 1.0, 1.0]);
//! assert!((y - 1.0).abs() < 1e-5);
//! ```

use glam::Vec3;

/// A 3x3 matrix for color transformations, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// Matrix elements in row-major order: [row0, row1, row2]
    pub m: [[f32; 3]; 3],
}

impl Mat3 {
    /// Linear Rec.2020 (D65) to CIE XYZ.
    pub const REC2020_TO_XYZ: Self = Self {
        m: [
            [0.636_958, 0.144_616_9, 0.168_881],
            [0.262_700_2, 0.677_998_1, 0.059_301_7],
            [0.0, 0.028_072_7, 1.060_985_1],
        ],
    };

    /// Linear Rec.709 / sRGB (D65) to CIE XYZ.
    pub const REC709_TO_XYZ: Self = Self {
        m: [
            [0.412_456_4, 0.357_576_1, 0.180_437_5],
            [0.212_672_9, 0.715_152_2, 0.072_175],
            [0.019_333_9, 0.119_192, 0.950_304_1],
        ],
    };

    /// Dot product of row `i` with `v`.
    #[inline]
    pub fn row_dot(&self, i: usize, v: [f32; 3]) -> f32 {
        Vec3::from_array(self.m[i]).dot(Vec3::from_array(v))
    }

    /// Returns `true` if all elements are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|x| x.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_primaries_map_to_rows() {
        let m = Mat3::REC709_TO_XYZ;
        assert_eq!(m.row_dot(1, [1.0, 0.0, 0.0]), m.m[1][0]);
        assert_eq!(m.row_dot(2, [0.0, 0.0, 1.0]), m.m[2][2]);
    }

    #[test]
    fn test_luminance_rows_sum_to_one() {
        for m in [Mat3::REC2020_TO_XYZ, Mat3::REC709_TO_XYZ] {
            assert_relative_eq!(m.row_dot(1, [1.0; 3]), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_row_dot_matches_glam_product() {
        let m = Mat3::REC2020_TO_XYZ;
        let v = [0.2, 0.7, 0.1];
        let cols = glam::Mat3::from_cols_array_2d(&m.m).transpose();
        let t = cols * Vec3::from_array(v);
        for i in 0..3 {
            assert_relative_eq!(t[i], m.row_dot(i, v), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_non_finite() {
        let mut m = Mat3::REC709_TO_XYZ;
        assert!(m.is_finite());
        m.m[2][0] = f32::INFINITY;
        assert!(!m.is_finite());
    }
}
