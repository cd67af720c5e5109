//! # filmic-core
//!
//! Core types shared by the filmic tone-mapping crates.
//!
//! - [`Image`], [`RgbaImage`], [`MaskImage`] - owned interleaved `f32` buffers
//! - [`Roi`] - region descriptor (buffer size and zoom scale)
//! - [`Error`], [`Result`] - structural failures (allocation, shape)
//!
//! ## Crate Structure
//!
//! ```text
//! filmic-core (this crate)
//!    ^
//!    +-- filmic-math (matrices, linear solve)
//!    +-- filmic-color (norms, working profile)
//!    +-- filmic-ops (curve, reconstruction, tone mapping)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod image;
pub mod roi;

pub use error::{Error, Result};
pub use image::{Image, MaskImage, RgbaImage};
pub use roi::Roi;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::image::{Image, MaskImage, RgbaImage};
    pub use crate::roi::Roi;
}
