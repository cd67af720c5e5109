//! # filmic-math
//!
//! Math primitives for the filmic tone-mapping crates.
//!
//! - [`Mat3`] - 3x3 RGB matrices (working-profile luminance)
//! - [`gauss_solve`] - small dense linear solve for curve fitting
//! - Scalar helpers ([`lerp`], [`clamp01`], signed magnitude selection)
//! - [`simd`] - `f32x4` helpers for per-pixel filter accumulation
//!
//! # Design
//!
//! Matrix storage is **row-major** with **column vectors**; row products
//! go through `glam` vectors:
//!
//! ```text
//! result = matrix * vector
//! ```
//!
//! # Usage
//!
//! ```rust
//! use filmic_math::Mat3;
//!
//! let m = Mat3::REC709_TO_XYZ;
//! let luminance = m.row_dot(1, [1.0, 0.5, 0.25]);
//! assert!(luminance > 0.5);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod interp;
mod mat3;
pub mod simd;
mod solve;

pub use interp::*;
pub use mat3::*;
pub use solve::*;
