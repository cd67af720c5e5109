//! Owned pixel buffers for tone-mapping stages.
//!
//! [`Image<N>`] is a row-major, interleaved `f32` buffer with a compile-time
//! channel count:
//!
//! - [`RgbaImage`] (`N = 4`) - scene or display RGB plus alpha
//! - [`MaskImage`] (`N = 1`) - one scalar per pixel (clip masks, norms)
//!
//! # Memory Layout
//!
//! ```text
//! Memory: [R G B A R G B A ...]  <- Row 0
//!         [R G B A R G B A ...]  <- Row 1
//!         ...
//! ```
//!
//! Buffers are exclusively owned. A stage that produces a new buffer returns
//! it by value; nothing aliases the caller's input.
//!
//! # Usage
//!
//! ```rust
//! use filmic_core::RgbaImage;
//!
//! let mut img = RgbaImage::new(64, 32);
//! img.set_pixel(10, 5, [1.0, 0.5, 0.25, 1.0]);
//! assert_eq!(img.pixel(10, 5)[1], 0.5);
//! ```

use crate::{Error, Result};
use rayon::prelude::*;

/// Owned interleaved `f32` buffer with `N` channels per pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<const N: usize> {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

/// Four-channel RGBA buffer.
pub type RgbaImage = Image<4>;

/// Single-channel buffer (masks, norms).
pub type MaskImage = Image<1>;

impl<const N: usize> Image<N> {
    /// Creates a new zero-filled buffer.
    ///
    /// # Panics
    ///
    /// Aborts if the allocation fails. Use [`try_new`](Self::try_new) on
    /// paths that must survive memory pressure.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * N;
        Self {
            data: vec![0.0; len],
            width,
            height,
        }
    }

    /// Creates a new zero-filled buffer, reporting allocation failure.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidDimensions`] if the size computation overflows
    /// - [`Error::AllocationFailed`] if the allocator refuses the request
    ///
    /// # Example
    ///
    /// ```rust
    /// use filmic_core::MaskImage;
    ///
    /// let mask = MaskImage::try_new(16, 16).unwrap();
    /// assert_eq!(mask.data().len(), 256);
    /// ```
    pub fn try_new(width: u32, height: u32) -> Result<Self> {
        let len = Self::checked_len(width, height)?;
        let mut data = Vec::new();
        data.try_reserve_exact(len).map_err(|e| {
            Error::allocation_failed(len.saturating_mul(std::mem::size_of::<f32>()), e.to_string())
        })?;
        data.resize(len, 0.0);
        Ok(Self { data, width, height })
    }

    /// Creates a buffer from existing interleaved data.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if `data.len() != width * height * N`.
    pub fn from_data(width: u32, height: u32, data: Vec<f32>) -> Result<Self> {
        let expected = Self::checked_len(width, height)?;
        if data.len() != expected {
            return Err(Error::invalid_dimensions(
                width,
                height,
                format!("expected {} elements, got {}", expected, data.len()),
            ));
        }
        Ok(Self { data, width, height })
    }

    /// Creates a buffer where every pixel equals `pixel`.
    pub fn filled(width: u32, height: u32, pixel: [f32; N]) -> Self {
        let count = width as usize * height as usize;
        let mut data = Vec::with_capacity(count * N);
        for _ in 0..count {
            data.extend_from_slice(&pixel);
        }
        Self { data, width, height }
    }

    fn checked_len(width: u32, height: u32) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(N))
            .ok_or_else(|| Error::invalid_dimensions(width, height, "buffer size overflows"))
    }

    /// Returns the width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of channels per pixel.
    #[inline]
    pub const fn channels(&self) -> usize {
        N
    }

    /// Returns the number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns `true` if the buffer has zero area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Raw interleaved samples.
    #[inline]
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Mutable raw interleaved samples.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Consumes the buffer and returns its samples.
    #[inline]
    pub fn into_data(self) -> Vec<f32> {
        self.data
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * N
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [f32; N] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        let mut px = [0.0; N];
        px.copy_from_slice(&self.data[o..o + N]);
        px
    }

    /// Overwrites the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, px: [f32; N]) {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let o = self.offset(x, y);
        self.data[o..o + N].copy_from_slice(&px);
    }

    /// Iterates over pixels as `N`-sample slices.
    #[inline]
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, f32> {
        self.data.chunks_exact(N)
    }

    /// Parallel iterator over pixels as `N`-sample slices.
    #[inline]
    pub fn par_pixels(&self) -> rayon::slice::ChunksExact<'_, f32> {
        self.data.par_chunks_exact(N)
    }

    /// Parallel mutable iterator over pixels.
    #[inline]
    pub fn par_pixels_mut(&mut self) -> rayon::slice::ChunksExactMut<'_, f32> {
        self.data.par_chunks_exact_mut(N)
    }

    /// Parallel mutable iterator over rows, each `width * N` samples long.
    #[inline]
    pub fn par_rows_mut(&mut self) -> rayon::slice::ChunksMut<'_, f32> {
        let row = (self.width as usize * N).max(1);
        self.data.par_chunks_mut(row)
    }

    /// Fills every pixel with `px`.
    pub fn fill(&mut self, px: [f32; N]) {
        self.data
            .par_chunks_exact_mut(N)
            .for_each(|dst| dst.copy_from_slice(&px));
    }

    /// Checks that `other` has the same pixel grid, whatever its channel count.
    pub fn ensure_same_size<const M: usize>(&self, other: &Image<M>) -> Result<()> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::dimension_mismatch(self.dimensions(), other.dimensions()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zeroed() {
        let img = RgbaImage::new(8, 4);
        assert_eq!(img.data().len(), 8 * 4 * 4);
        assert!(img.data().iter().all(|&v| v == 0.0));
        assert_eq!(img.channels(), 4);
    }

    #[test]
    fn test_from_data_length_check() {
        assert!(MaskImage::from_data(4, 4, vec![0.0; 16]).is_ok());
        let err = RgbaImage::from_data(4, 4, vec![0.0; 16]).unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }

    #[test]
    fn test_pixel_roundtrip() {
        let mut img = RgbaImage::new(3, 3);
        img.set_pixel(2, 1, [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(img.pixel(2, 1), [0.1, 0.2, 0.3, 0.4]);
        assert_eq!(img.pixel(0, 0), [0.0; 4]);
    }

    #[test]
    fn test_try_new_overflow() {
        let err = Image::<4>::try_new(u32::MAX, u32::MAX);
        // Either the size computation overflows (32-bit) or the allocator refuses.
        assert!(err.is_err());
    }

    #[test]
    fn test_fill_and_same_size() {
        let mut img = RgbaImage::new(5, 2);
        img.fill([1.0, 2.0, 3.0, 4.0]);
        assert!(img.pixels().all(|p| p == [1.0, 2.0, 3.0, 4.0]));

        let mask = MaskImage::new(5, 2);
        assert!(img.ensure_same_size(&mask).is_ok());
        let other = MaskImage::new(2, 5);
        assert!(img.ensure_same_size(&other).is_err());
    }
}
