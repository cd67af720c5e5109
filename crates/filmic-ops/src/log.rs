//! Logarithmic encoding of scene values.
//!
//! Scene-linear values are mapped to [0, 1] relative to the grey point:
//!
//! ```text
//! encoded = (log2(x / grey) - black_ev) / dynamic_range_ev
//! ```
//!
//! so that the scene black lands on 0, grey on `|black| / dr` and the scene
//! white on 1.
//!
//! # Example
//!
//! ```rust
//! use filmic_ops::LogEncoder;
//!
//! let enc = LogEncoder::new(0.1845, -10.55, 14.0);
//! let grey = enc.encode_v2(0.1845);
//! assert!((grey - 10.55 / 14.0).abs() < 1e-6);
//! ```

/// Smallest linear value fed to `log2`: 2^-16.
pub const NORM_FLOOR: f32 = 1.525_878_906_25e-5;

/// Scene-to-log mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogEncoder {
    grey: f32,
    black: f32,
    dynamic_range: f32,
}

impl LogEncoder {
    /// Creates an encoder from a linear grey and black/range in EV.
    #[inline]
    pub fn new(grey: f32, black_ev: f32, dynamic_range_ev: f32) -> Self {
        Self {
            grey,
            black: black_ev,
            dynamic_range: dynamic_range_ev,
        }
    }

    #[inline]
    fn raw(&self, x: f32) -> f32 {
        ((x.max(NORM_FLOOR) / self.grey).log2() - self.black) / self.dynamic_range
    }

    /// First-generation encoding, clamped to [2^-16, 1].
    #[inline]
    pub fn encode_v1(&self, x: f32) -> f32 {
        self.raw(x).min(1.0).max(NORM_FLOOR)
    }

    /// Second-generation encoding, clamped to [0, 1].
    #[inline]
    pub fn encode_v2(&self, x: f32) -> f32 {
        filmic_math::clamp01(self.raw(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> LogEncoder {
        LogEncoder::new(0.1845, -10.55, 14.0)
    }

    #[test]
    fn test_black_and_white_points() {
        let enc = encoder();
        let black = 0.1845 * 2f32.powf(-10.55);
        let white = 0.1845 * 2f32.powf(3.45);
        assert!(enc.encode_v2(black).abs() < 1e-5);
        assert!((enc.encode_v2(white) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamping() {
        let enc = encoder();
        assert_eq!(enc.encode_v2(1e6), 1.0);
        assert_eq!(enc.encode_v1(1e6), 1.0);
        assert_eq!(enc.encode_v2(0.0), 0.0);
        assert_eq!(enc.encode_v1(0.0), NORM_FLOOR);
        assert_eq!(enc.encode_v1(-3.0), NORM_FLOOR);
    }

    #[test]
    fn test_monotonic() {
        let enc = encoder();
        let mut prev = enc.encode_v2(1e-4);
        for i in 1..100 {
            let v = enc.encode_v2(1e-4 * 1.15f32.powi(i));
            assert!(v >= prev);
            prev = v;
        }
    }
}
