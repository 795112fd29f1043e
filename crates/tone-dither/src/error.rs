//! Error types for the tone-dither engines.
//!
//! Every failure the engines can report is a configuration defect, detected
//! before the first pixel is touched. [`DitherError`] is the type returned by
//! the public API; [`ConfigError`] names the exact defect.

use thiserror::Error;

/// Unified error type for the tone-dither public API.
///
/// # Example
///
/// ```
/// use tone_dither::{ConfigError, DitherError, LevelSet};
///
/// let err = LevelSet::new(vec![]).unwrap_err();
/// assert_eq!(err, DitherError::InvalidConfiguration(ConfigError::EmptyLevelSet));
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DitherError {
    /// The level set, kernel, matrix or grid cannot be used.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
}

/// The specific configuration defect behind [`DitherError::InvalidConfiguration`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("level set cannot be empty")]
    EmptyLevelSet,

    #[error("levels must be strictly ascending (violated at index {index})")]
    UnorderedLevels { index: usize },

    #[error("{what} must be a finite number")]
    NonFiniteValue { what: &'static str },

    #[error("binary levels must satisfy low < high (got {low} and {high})")]
    InvertedBinaryLevels { low: f64, high: f64 },

    #[error("expected {expected} breakpoints for {levels} levels, got {actual}")]
    BreakpointCountMismatch {
        levels: usize,
        expected: usize,
        actual: usize,
    },

    #[error("breakpoints must be strictly ascending (violated at index {index})")]
    UnorderedBreakpoints { index: usize },

    #[error("diffusion kernel has no taps")]
    EmptyKernel,

    #[error("diffusion kernel divisor must be positive")]
    ZeroDivisor,

    #[error("kernel tap {index} has zero weight")]
    ZeroWeight { index: usize },

    #[error("kernel tap {index} at ({dx}, {dy}) does not lie after the current pixel in scan order")]
    NonCausalTap { index: usize, dx: i32, dy: i32 },

    #[error("threshold matrix is empty")]
    EmptyMatrix,

    #[error("threshold matrix row {row} has {len} entries, expected {expected}")]
    MatrixNotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("threshold matrix of size {size} is not a permutation of 0..{cells}")]
    MatrixNotPermutation { size: usize, cells: usize },

    #[error("grid has zero area ({width}x{height})")]
    ZeroArea { width: u32, height: u32 },

    #[error("grid {width}x{height} needs {expected} samples, got {actual}")]
    SampleCountMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("sample maximum must be positive (got {0})")]
    InvalidSampleMax(f64),

    #[error("output range must satisfy min <= max (got {min}..={max})")]
    InvalidOutputRange { min: f64, max: f64 },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DitherError>;
