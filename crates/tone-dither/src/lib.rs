//! tone-dither: grayscale quantization and dithering
//!
//! Reduces a single-channel, continuous-tone raster to a small set of output
//! levels while keeping its perceived tonal structure.
//!
//! # Quick Start
//!
//! ```
//! use tone_dither::{DiffusionKernel, ErrorDiffusion, IntensityGrid, QuantizationPolicy};
//!
//! let policy = QuantizationPolicy::threshold(0.0, 255.0, 128.0).unwrap();
//! let engine = ErrorDiffusion::new(policy, DiffusionKernel::JARVIS_JUDICE_NINKE);
//!
//! let grid = IntensityGrid::from_u8(3, 1, &[40, 128, 220]).unwrap();
//! let result = engine.run(&grid).unwrap();
//!
//! assert_eq!(result.width(), 3);
//! assert!(result.samples().iter().all(|&v| v == 0.0 || v == 255.0));
//! ```
//!
//! # Engines
//!
//! - [`ErrorDiffusion`]: sequential raster scan; each pixel's quantization
//!   error is spread to later pixels through a [`DiffusionKernel`]
//! - [`OrderedDither`]: stateless comparison against a tiled
//!   [`ThresholdMatrix`]; rows run in parallel
//!
//! Both engines take an [`IntensityGrid`] and return a [`QuantizedGrid`] of
//! the same dimensions. Every configuration defect is reported as
//! [`DitherError::InvalidConfiguration`] before any pixel is processed.
//!
//! # Quantization
//!
//! A [`QuantizationPolicy`] decides which level a value becomes:
//!
//! | Policy | Rule |
//! |--------|------|
//! | `Nearest` | closest level, ties to the lower one |
//! | `Threshold` | `high` if `v >= T`, else `low` |
//! | `Bands` | first level whose breakpoint exceeds `v` |
//!
//! # Color Images
//!
//! The engines are single-channel. Color images are dithered by running an
//! engine once per channel; runs share no state.

pub mod diffusion;
pub mod error;
pub mod grid;
pub mod kernel;
pub mod matrix;
pub mod ordered;
pub mod quantize;


pub use diffusion::ErrorDiffusion;
pub use error::{ConfigError, DitherError, Result};
pub use grid::{ErrorBuffer, IntensityGrid, OutputRange, QuantizedGrid};
pub use kernel::{DiffusionKernel, KernelPreset, UnknownPreset};
pub use matrix::{MatrixPreset, ThresholdMatrix};
pub use ordered::{OrderedDither, OrderedMode};
pub use quantize::{LevelSet, QuantizationPolicy, Quantized};
