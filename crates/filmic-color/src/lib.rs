//! # filmic-color
//!
//! Color norms and luminance for filmic tone mapping.
//!
//! - [`NormMethod`], [`pixel_norm`] - reduce an RGB triple to one intensity
//! - [`WorkingProfile`] - working-space matrix plus optional [`ToneLut`]
//! - [`camera_rgb_luminance`] - fallback luminance without a profile
//!
//! # Architecture
//!
//! ```text
//!   filmic-color
//!        |
//!   filmic-math
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use filmic_color::{NormMethod, WorkingProfile, pixel_norm};
//!
//! let profile = WorkingProfile::rec2020();
//! let rgb = [0.18, 0.18, 0.18];
//! let y = pixel_norm(rgb, NormMethod::Luminance, Some(&profile));
//! assert!((y - 0.18).abs() < 1e-4);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod lut;
pub mod norm;
pub mod profile;

pub use error::{ColorError, ColorResult};
pub use lut::ToneLut;
pub use norm::{NormMethod, euclidean_norm, max_rgb, pixel_norm, power_norm};
pub use profile::{CAMERA_RGB_LUMINANCE, WorkingProfile, camera_rgb_luminance, luminance};
