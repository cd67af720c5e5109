//! Region descriptor for a render call.
//!
//! A render call processes one buffer, which may be a downsampled preview or
//! a tile of a larger image. Multi-scale stages need to know how that buffer
//! relates to the whole image so their filters cover the same fraction of
//! the picture at every zoom level.
//!
//! # Example
//!
//! ```rust
//! use filmic_core::Roi;
//!
//! // A 1000x750 preview of a 4000x3000 image.
//! let roi = Roi::with_scale(1000, 750, 0.25);
//! assert_eq!(roi.image_width, 4000);
//! assert_eq!(roi.extent(), 1000.0);
//! ```

/// Region of interest: buffer size plus its scale against full resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Roi {
    /// Buffer width in pixels.
    pub width: u32,
    /// Buffer height in pixels.
    pub height: u32,
    /// Current resolution divided by full resolution (1.0 = 100 %).
    pub scale: f32,
    /// Full-resolution width of the whole image.
    pub image_width: u32,
    /// Full-resolution height of the whole image.
    pub image_height: u32,
}

impl Roi {
    /// A buffer that is the whole image at full resolution.
    #[inline]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            scale: 1.0,
            image_width: width,
            image_height: height,
        }
    }

    /// A buffer that is the whole image, rendered at `scale`.
    ///
    /// Non-positive scales are treated as 1.0.
    pub fn with_scale(width: u32, height: u32, scale: f32) -> Self {
        let scale = if scale > 0.0 { scale } else { 1.0 };
        Self {
            width,
            height,
            scale,
            image_width: (width as f32 / scale).round() as u32,
            image_height: (height as f32 / scale).round() as u32,
        }
    }

    /// A tile of a larger image, rendered at `scale`.
    pub fn tile(width: u32, height: u32, scale: f32, image_width: u32, image_height: u32) -> Self {
        Self {
            width,
            height,
            scale: if scale > 0.0 { scale } else { 1.0 },
            image_width,
            image_height,
        }
    }

    /// Largest dimension of the whole image at the current resolution.
    #[inline]
    pub fn extent(&self) -> f32 {
        self.image_width.max(self.image_height) as f32 * self.scale
    }

    /// Returns `(width, height)` of the buffer.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl std::fmt::Display for Roi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Roi({}x{} @ {:.3} of {}x{})",
            self.width, self.height, self.scale, self.image_width, self.image_height
        )
    }
}
