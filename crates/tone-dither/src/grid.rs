//! Grid types shared by both engines.
//!
//! - [`IntensityGrid`]: read-only engine input
//! - [`QuantizedGrid`]: engine output, same dimensions as the input
//! - [`ErrorBuffer`]: the mutable working copy owned by one error diffusion run
//! - [`OutputRange`]: the clamp applied when a level is written to the output

use crate::error::{ConfigError, Result};

/// A rectangular, row-major grid of real-valued intensity samples.
///
/// Dimensions are always at least 1x1 and `samples.len() == width * height`;
/// both are checked on construction so engines never see a malformed grid.
///
/// # Example
///
/// ```
/// use tone_dither::IntensityGrid;
///
/// let grid = IntensityGrid::from_u8(2, 1, &[10, 250]).unwrap();
/// assert_eq!(grid.get(1, 0), 250.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct IntensityGrid {
    width: u32,
    height: u32,
    samples: Vec<f64>,
}

impl IntensityGrid {
    /// Create a grid from row-major samples.
    ///
    /// Fails with `InvalidConfiguration` when either dimension is zero or
    /// the sample count does not match `width * height`.
    pub fn new(width: u32, height: u32, samples: Vec<f64>) -> Result<Self> {
        check_dimensions(width, height, samples.len())?;
        Ok(Self {
            width,
            height,
            samples,
        })
    }

    /// Create a grid from 8-bit samples, widening each to `f64`.
    pub fn from_u8(width: u32, height: u32, samples: &[u8]) -> Result<Self> {
        Self::new(width, height, samples.iter().map(|&v| f64::from(v)).collect())
    }

    /// Create a grid where every sample has the same value.
    pub fn filled(width: u32, height: u32, value: f64) -> Result<Self> {
        let len = width as usize * height as usize;
        Self::new(width, height, vec![value; len])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major samples.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sample at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.samples[y as usize * self.width as usize + x as usize]
    }
}

/// Validate grid dimensions against a sample count.
fn check_dimensions(width: u32, height: u32, actual: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(ConfigError::ZeroArea { width, height }.into());
    }
    let expected = width as usize * height as usize;
    if actual != expected {
        return Err(ConfigError::SampleCountMismatch {
            width,
            height,
            expected,
            actual,
        }
        .into());
    }
    Ok(())
}

/// Closed interval that emitted levels are clamped into.
///
/// Clamping happens only when a level is written to a [`QuantizedGrid`];
/// values inside an [`ErrorBuffer`] are never clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRange {
    min: f64,
    max: f64,
}

impl OutputRange {
    /// The 8-bit sample domain `[0, 255]`.
    pub const U8: OutputRange = OutputRange {
        min: 0.0,
        max: 255.0,
    };

    /// Create a range. Fails unless both bounds are finite and `min <= max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFiniteValue {
                what: "output range bound",
            }
            .into());
        }
        if min > max {
            return Err(ConfigError::InvalidOutputRange { min, max }.into());
        }
        Ok(Self { min, max })
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl Default for OutputRange {
    fn default() -> Self {
        Self::U8
    }
}

/// Engine output: one quantized level per pixel, row-major.
///
/// Has the same dimensions as the [`IntensityGrid`] it was produced from.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedGrid {
    width: u32,
    height: u32,
    samples: Vec<f64>,
}

impl QuantizedGrid {
    pub(crate) fn new(width: u32, height: u32, samples: Vec<f64>) -> Self {
        debug_assert_eq!(
            samples.len(),
            width as usize * height as usize,
            "samples length must match {}x{}",
            width,
            height
        );
        Self {
            width,
            height,
            samples,
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major quantized levels.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Level at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the coordinate is out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> f64 {
        self.samples[y as usize * self.width as usize + x as usize]
    }

    /// Convert to 8-bit samples.
    ///
    /// Each level is clamped to `[0, 255]` and truncated toward zero, so a
    /// fractional level such as `63.75` becomes `63`.
    pub fn to_u8(&self) -> Vec<u8> {
        self.samples
            .iter()
            .map(|&v| v.clamp(0.0, 255.0) as u8)
            .collect()
    }

    /// Consume the grid, returning its samples.
    pub fn into_samples(self) -> Vec<f64> {
        self.samples
    }
}

/// Working buffer for error diffusion.
///
/// Starts as a copy of the input samples; every visited pixel adds its
/// weighted quantization error to not-yet-visited cells. The buffer covers
/// the whole image and belongs to exactly one engine invocation.
///
/// # Usage Pattern
///
/// 1. Create with [`ErrorBuffer::new`] from the input grid
/// 2. For each pixel in scan order:
///    a. Read the accumulated value with [`get`](ErrorBuffer::get)
///    b. Push weighted error forward with [`add`](ErrorBuffer::add)
#[derive(Debug)]
pub struct ErrorBuffer {
    values: Vec<f64>,
    width: usize,
    height: usize,
}

impl ErrorBuffer {
    pub fn new(grid: &IntensityGrid) -> Self {
        Self {
            values: grid.samples().to_vec(),
            width: grid.width() as usize,
            height: grid.height() as usize,
        }
    }

    /// Accumulated value at `(x, y)`: original sample plus all error
    /// diffused into it so far.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> f64 {
        self.values[y * self.width + x]
    }

    /// Add `delta` to the cell at `(x, y)`.
    ///
    /// Coordinates outside the grid are silently ignored, which is how
    /// kernel taps falling off the image are dropped.
    #[inline]
    pub fn add(&mut self, x: i64, y: i64, delta: f64) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            self.values[y as usize * self.width + x as usize] += delta;
        }
    }
}
