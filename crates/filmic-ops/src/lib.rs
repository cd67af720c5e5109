//! # filmic-ops
//!
//! Filmic tone mapping for scene-referred RGB.
//!
//! Converts linear scene RGB of any dynamic range into display RGB,
//! rebuilding plausible detail in clipped highlights on the way.
//!
//! # Modules
//!
//! - [`params`] - user parameters ([`FilmicParams`])
//! - [`data`] - derived per-render data ([`FilmicData::commit`])
//! - [`spline`] - the tone curve ([`FilmicSpline`])
//! - [`log`] - logarithmic scene encoding ([`LogEncoder`])
//! - [`mask`] - clipped-highlight mask ([`ClipMask`])
//! - [`wavelets`] - multi-scale highlight reconstruction
//! - [`ratios`] - norm / chromaticity split for the ratio pass
//! - [`tonemap`] - per-pixel kernels
//! - [`process`] - render entry points
//! - [`autotune`] - exposure estimation from sampled colors
//!
//! # Example
//!
//! ```rust
//! use filmic_core::{RgbaImage, Roi};
//! use filmic_ops::{FilmicData, FilmicParams, ProcessOptions, process};
//!
//! let params = FilmicParams::default();
//! let data = FilmicData::commit(&params);
//!
//! let scene = RgbaImage::filled(64, 64, [0.5, 0.3, 0.1, 1.0]);
//! let display = process(&data, &scene, &Roi::new(64, 64), None, &ProcessOptions::default()).unwrap();
//! assert!(display.pixels().all(|px| px[..3].iter().all(|v| (0.0..=1.0).contains(v))));
//! ```
//!
//! # Lifecycle
//!
//! ```text
//! FilmicParams --commit--> FilmicData    (once per parameter change)
//! FilmicData + buffer --process--> out   (once per render)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod autotune;
pub mod data;
pub mod log;
pub mod mask;
pub mod params;
pub mod process;
pub mod ratios;
pub mod spline;
pub mod tonemap;
pub mod wavelets;

pub use data::FilmicData;
pub use error::{OpsError, OpsResult};
pub use log::LogEncoder;
pub use mask::ClipMask;
pub use params::{ColorScience, CurveOrder, FilmicParams};
pub use process::{ProcessOptions, process, process_interleaved};
pub use spline::FilmicSpline;
pub use wavelets::ReconstructionWeights;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::autotune::{RegionStats, autotune};
    pub use crate::data::FilmicData;
    pub use crate::error::{OpsError, OpsResult};
    pub use crate::params::{ColorScience, CurveOrder, FilmicParams};
    pub use crate::process::{ProcessOptions, process};
    pub use filmic_color::NormMethod;
}
