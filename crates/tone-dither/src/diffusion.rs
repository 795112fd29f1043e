//! Error diffusion engine.
//!
//! Visits every pixel once in raster order, quantizes the accumulated value,
//! and pushes the weighted residual forward to not-yet-visited neighbors.
//!
//! # Algorithm
//!
//! For each pixel `(x, y)`:
//! 1. Read the accumulated value from the [`ErrorBuffer`]
//! 2. Quantize it with the [`QuantizationPolicy`], giving `(level, error)`
//! 3. Emit `level`, clamped to the [`OutputRange`]
//! 4. For each kernel tap, add `error * weight / divisor` to `(x+dx, y+dy)`
//!    when that cell exists
//!
//! Taps that fall off the image are dropped: no wrapping, no reflection and
//! no redistribution to the remaining taps. Buffer values are never clamped,
//! so an accumulated value may leave `[0, 255]` before it is quantized.
//!
//! A run is single-threaded. Separate runs share nothing and may execute in
//! parallel.

use tracing::debug;

use crate::error::Result;
use crate::grid::{ErrorBuffer, IntensityGrid, OutputRange, QuantizedGrid};
use crate::kernel::DiffusionKernel;
use crate::quantize::QuantizationPolicy;

/// Configured error diffusion.
///
/// # Example
///
/// ```
/// use tone_dither::{DiffusionKernel, ErrorDiffusion, IntensityGrid, QuantizationPolicy};
///
/// let policy = QuantizationPolicy::threshold(0.0, 255.0, 128.0).unwrap();
/// let engine = ErrorDiffusion::new(policy, DiffusionKernel::FLOYD_STEINBERG);
///
/// let grid = IntensityGrid::filled(2, 2, 200.0).unwrap();
/// let out = engine.run(&grid).unwrap();
/// assert_eq!(out.samples(), &[255.0; 4]);
/// ```
#[derive(Debug, Clone)]
pub struct ErrorDiffusion {
    policy: QuantizationPolicy,
    kernel: DiffusionKernel,
    output_range: OutputRange,
    serpentine: bool,
}

impl ErrorDiffusion {
    /// Create an engine with the default `[0, 255]` output range and plain
    /// left-to-right scanning.
    pub fn new(policy: QuantizationPolicy, kernel: DiffusionKernel) -> Self {
        Self {
            policy,
            kernel,
            output_range: OutputRange::default(),
            serpentine: false,
        }
    }

    /// Set the clamp applied to emitted levels.
    pub fn output_range(mut self, range: OutputRange) -> Self {
        self.output_range = range;
        self
    }

    /// Scan odd rows right-to-left with mirrored `dx`.
    ///
    /// Boustrophedon scanning breaks up the diagonal "worm" patterns of
    /// one-directional scans. Off by default.
    pub fn serpentine(mut self, enabled: bool) -> Self {
        self.serpentine = enabled;
        self
    }

    pub fn policy(&self) -> &QuantizationPolicy {
        &self.policy
    }

    pub fn kernel(&self) -> &DiffusionKernel {
        &self.kernel
    }

    /// Dither `grid`.
    ///
    /// Fails with `InvalidConfiguration` only when the kernel is invalid;
    /// grids are validated when they are built. Otherwise total: every input
    /// value, including ones outside `[0, 255]`, produces a level.
    pub fn run(&self, grid: &IntensityGrid) -> Result<QuantizedGrid> {
        self.kernel.validate()?;

        let width = grid.width() as usize;
        let height = grid.height() as usize;
        debug!(
            width,
            height,
            taps = self.kernel.taps().len(),
            divisor = self.kernel.divisor(),
            levels = self.policy.levels().len(),
            serpentine = self.serpentine,
            "Running error diffusion"
        );

        let mut buffer = ErrorBuffer::new(grid);
        let mut output = vec![0.0f64; width * height];
        let divisor = f64::from(self.kernel.divisor());

        for y in 0..height {
            let reverse = self.serpentine && y % 2 == 1;
            let columns: Box<dyn Iterator<Item = usize>> = if reverse {
                Box::new((0..width).rev())
            } else {
                Box::new(0..width)
            };

            for x in columns {
                let quantized = self.policy.quantize(buffer.get(x, y));
                output[y * width + x] = self.output_range.clamp(quantized.level);

                for &(dx, dy, weight) in self.kernel.taps() {
                    let dx = if reverse { -dx } else { dx };
                    buffer.add(
                        x as i64 + i64::from(dx),
                        y as i64 + i64::from(dy),
                        quantized.error * f64::from(weight) / divisor,
                    );
                }
            }
        }

        Ok(QuantizedGrid::new(grid.width(), grid.height(), output))
    }
}
