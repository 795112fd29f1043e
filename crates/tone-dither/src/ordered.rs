//! Ordered dithering engine.
//!
//! Each pixel is compared against the tiled [`ThresholdMatrix`] entry at its
//! position. There is no state carried between pixels, so rows are processed
//! in parallel and the result does not depend on scheduling.
//!
//! # Comparison with Error Diffusion
//!
//! | Aspect | Ordered | Error Diffusion |
//! |--------|---------|-----------------|
//! | Pattern | Regular, tiled | Organic, scan-dependent |
//! | Parallelizable | Yes (per-pixel) | No (neighbor dependencies) |
//! | Levels | Binary or evenly blended | Any quantization policy |

use rayon::prelude::*;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::grid::{IntensityGrid, OutputRange, QuantizedGrid};
use crate::matrix::ThresholdMatrix;
use crate::quantize::LevelSet;

/// How a normalized threshold selects an output level.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderedMode {
    /// `high` when `v > t * sample_max`, otherwise `low`. Ties go low.
    Binary { low: f64, high: f64 },

    /// Offset the normalized value by `t / (L-1)` and truncate to one of the
    /// `L` levels: `index = floor((v/sample_max + t/(L-1)) * (L-1))`,
    /// clamped to `[0, L-1]`. A single-level set always emits that level.
    Multilevel(LevelSet),
}

impl OrderedMode {
    fn validate(&self) -> Result<()> {
        if let OrderedMode::Binary { low, high } = *self {
            if !low.is_finite() || !high.is_finite() {
                return Err(ConfigError::NonFiniteValue {
                    what: "binary level",
                }
                .into());
            }
            if low >= high {
                return Err(ConfigError::InvertedBinaryLevels { low, high }.into());
            }
        }
        Ok(())
    }

    fn level_count(&self) -> usize {
        match self {
            OrderedMode::Binary { .. } => 2,
            OrderedMode::Multilevel(levels) => levels.len(),
        }
    }

    /// Level for intensity `value` against normalized threshold `t`.
    #[inline]
    fn select(&self, value: f64, t: f64, sample_max: f64) -> f64 {
        match self {
            OrderedMode::Binary { low, high } => {
                if value > t * sample_max {
                    *high
                } else {
                    *low
                }
            }
            OrderedMode::Multilevel(levels) => {
                let last = levels.len() - 1;
                if last == 0 {
                    return levels.first();
                }
                let steps = last as f64;
                let index = ((value / sample_max + t / steps) * steps).floor();
                let index = index.clamp(0.0, steps) as usize;
                levels.get(index)
            }
        }
    }
}

/// Configured ordered dithering.
///
/// # Example
///
/// ```
/// use tone_dither::{IntensityGrid, OrderedDither, OrderedMode, ThresholdMatrix};
///
/// let engine = OrderedDither::new(
///     ThresholdMatrix::bayer4(),
///     OrderedMode::Binary { low: 0.0, high: 255.0 },
/// );
/// let out = engine.run(&IntensityGrid::filled(8, 8, 128.0).unwrap()).unwrap();
/// let white = out.samples().iter().filter(|&&v| v == 255.0).count();
/// assert_eq!(white, 32);
/// ```
#[derive(Debug, Clone)]
pub struct OrderedDither {
    matrix: ThresholdMatrix,
    mode: OrderedMode,
    sample_max: f64,
    output_range: OutputRange,
}

impl OrderedDither {
    /// Create an engine for 8-bit samples (`sample_max = 255`).
    pub fn new(matrix: ThresholdMatrix, mode: OrderedMode) -> Self {
        Self {
            matrix,
            mode,
            sample_max: 255.0,
            output_range: OutputRange::default(),
        }
    }

    /// Intensity that maps to a normalized value of 1.
    pub fn sample_max(mut self, sample_max: f64) -> Self {
        self.sample_max = sample_max;
        self
    }

    /// Set the clamp applied to emitted levels.
    pub fn output_range(mut self, range: OutputRange) -> Self {
        self.output_range = range;
        self
    }

    pub fn matrix(&self) -> &ThresholdMatrix {
        &self.matrix
    }

    pub fn mode(&self) -> &OrderedMode {
        &self.mode
    }

    /// Dither `grid`.
    ///
    /// Fails with `InvalidConfiguration` when the binary levels are not
    /// ordered or `sample_max` is not a positive finite number.
    pub fn run(&self, grid: &IntensityGrid) -> Result<QuantizedGrid> {
        self.mode.validate()?;
        if !(self.sample_max.is_finite() && self.sample_max > 0.0) {
            return Err(ConfigError::InvalidSampleMax(self.sample_max).into());
        }

        let width = grid.width() as usize;
        debug!(
            width,
            height = grid.height(),
            matrix_size = self.matrix.size(),
            levels = self.mode.level_count(),
            "Running ordered dither"
        );

        let mut output = vec![0.0f64; grid.samples().len()];
        output
            .par_chunks_mut(width)
            .zip(grid.samples().par_chunks(width))
            .enumerate()
            .for_each(|(y, (out_row, in_row))| {
                let y = y as u32;
                for (x, (out, &value)) in out_row.iter_mut().zip(in_row).enumerate() {
                    let t = self.matrix.threshold(x as u32, y);
                    let level = self.mode.select(value, t, self.sample_max);
                    *out = self.output_range.clamp(level);
                }
            });

        Ok(QuantizedGrid::new(grid.width(), grid.height(), output))
    }
}
