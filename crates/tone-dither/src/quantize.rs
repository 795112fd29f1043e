//! Quantization policies.
//!
//! A [`QuantizationPolicy`] maps a real-valued intensity to one member of an
//! ordered [`LevelSet`] and reports the signed residual. Policies are plain
//! configuration: thresholds, breakpoints and levels always come from the
//! caller.

use crate::error::{ConfigError, Result};

/// An ordered set of reachable output intensities.
///
/// Invariant: non-empty, finite, strictly ascending.
///
/// # Example
///
/// ```
/// use tone_dither::LevelSet;
///
/// let levels = LevelSet::new(vec![0.0, 64.0, 128.0, 192.0, 255.0]).unwrap();
/// assert_eq!(levels.len(), 5);
/// assert!(LevelSet::new(vec![0.0, 0.0]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSet {
    levels: Vec<f64>,
}

impl LevelSet {
    pub fn new(levels: Vec<f64>) -> Result<Self> {
        if levels.is_empty() {
            return Err(ConfigError::EmptyLevelSet.into());
        }
        if levels.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteValue { what: "level" }.into());
        }
        if let Some(index) = first_unordered(&levels) {
            return Err(ConfigError::UnorderedLevels { index }.into());
        }
        Ok(Self { levels })
    }

    /// The two-level set `{low, high}`.
    pub fn binary(low: f64, high: f64) -> Result<Self> {
        if low.is_finite() && high.is_finite() && low >= high {
            return Err(ConfigError::InvertedBinaryLevels { low, high }.into());
        }
        Self::new(vec![low, high])
    }

    /// `count` levels spread evenly over `[0, max]`, rounded to integers.
    ///
    /// `evenly_spaced(4, 255.0)` gives `{0, 85, 170, 255}`. A count of one
    /// yields `{0}`.
    pub fn evenly_spaced(count: usize, max: f64) -> Result<Self> {
        match count {
            0 => Err(ConfigError::EmptyLevelSet.into()),
            1 => Self::new(vec![0.0]),
            _ => {
                let steps = (count - 1) as f64;
                Self::new(
                    (0..count)
                        .map(|i| (i as f64 * max / steps).round())
                        .collect(),
                )
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.levels
    }

    #[inline]
    pub fn get(&self, index: usize) -> f64 {
        self.levels[index]
    }

    #[inline]
    pub fn first(&self) -> f64 {
        self.levels[0]
    }

    #[inline]
    pub fn last(&self) -> f64 {
        self.levels[self.levels.len() - 1]
    }

    /// Whether `value` is exactly one of the levels.
    pub fn contains(&self, value: f64) -> bool {
        self.levels.iter().any(|&l| l == value)
    }

    /// Nearest level to `value`; ties resolve to the lower level.
    pub fn nearest(&self, value: f64) -> f64 {
        // First index whose level is >= value; the answer is it or its
        // predecessor.
        let upper = self.levels.partition_point(|&l| l < value);
        if upper == 0 {
            return self.levels[0];
        }
        if upper == self.levels.len() {
            return self.last();
        }
        let below = self.levels[upper - 1];
        let above = self.levels[upper];
        if value - below <= above - value {
            below
        } else {
            above
        }
    }
}

/// Index of the first element not strictly greater than its predecessor.
fn first_unordered(values: &[f64]) -> Option<usize> {
    values
        .windows(2)
        .position(|w| w[1] <= w[0])
        .map(|i| i + 1)
}

/// Result of quantizing a single value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quantized {
    /// The chosen output level.
    pub level: f64,
    /// Signed residual `value - level`.
    pub error: f64,
}

/// How a real value is reduced to one output level.
///
/// # Variants
///
/// - [`Nearest`](QuantizationPolicy::Nearest): closest level, ties go low
/// - [`Threshold`](QuantizationPolicy::Threshold): binary `v >= T` split
/// - [`Bands`](QuantizationPolicy::Bands): fixed breakpoints between levels
///
/// # Example
///
/// ```
/// use tone_dither::QuantizationPolicy;
///
/// let policy = QuantizationPolicy::threshold(0.0, 255.0, 109.0).unwrap();
/// assert_eq!(policy.quantize(109.0).level, 255.0);
/// assert_eq!(policy.quantize(108.9).level, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum QuantizationPolicy {
    /// Closest member of the level set.
    Nearest(LevelSet),

    /// Binary split at a caller-chosen threshold (not necessarily the
    /// midpoint): `high` if `v >= threshold`, otherwise `low`.
    Threshold { levels: LevelSet, threshold: f64 },

    /// Value `v` maps to `levels[i]` for the first `i` with
    /// `v < breakpoints[i]`, or to the last level when no breakpoint
    /// exceeds it. `breakpoints.len() == levels.len() - 1`.
    Bands {
        levels: LevelSet,
        breakpoints: Vec<f64>,
    },
}

impl QuantizationPolicy {
    pub fn nearest(levels: LevelSet) -> Self {
        QuantizationPolicy::Nearest(levels)
    }

    pub fn threshold(low: f64, high: f64, threshold: f64) -> Result<Self> {
        if !threshold.is_finite() {
            return Err(ConfigError::NonFiniteValue { what: "threshold" }.into());
        }
        Ok(QuantizationPolicy::Threshold {
            levels: LevelSet::binary(low, high)?,
            threshold,
        })
    }

    pub fn bands(levels: LevelSet, breakpoints: Vec<f64>) -> Result<Self> {
        let expected = levels.len() - 1;
        if breakpoints.len() != expected {
            return Err(ConfigError::BreakpointCountMismatch {
                levels: levels.len(),
                expected,
                actual: breakpoints.len(),
            }
            .into());
        }
        if breakpoints.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::NonFiniteValue { what: "breakpoint" }.into());
        }
        if let Some(index) = first_unordered(&breakpoints) {
            return Err(ConfigError::UnorderedBreakpoints { index }.into());
        }
        Ok(QuantizationPolicy::Bands {
            levels,
            breakpoints,
        })
    }

    /// Every level this policy can emit.
    pub fn levels(&self) -> &LevelSet {
        match self {
            QuantizationPolicy::Nearest(levels)
            | QuantizationPolicy::Threshold { levels, .. }
            | QuantizationPolicy::Bands { levels, .. } => levels,
        }
    }

    /// Quantize `value`, returning the level and the residual.
    #[inline]
    pub fn quantize(&self, value: f64) -> Quantized {
        let level = match self {
            QuantizationPolicy::Nearest(levels) => levels.nearest(value),
            QuantizationPolicy::Threshold { levels, threshold } => {
                if value >= *threshold {
                    levels.last()
                } else {
                    levels.first()
                }
            }
            QuantizationPolicy::Bands {
                levels,
                breakpoints,
            } => {
                let band = breakpoints.partition_point(|&b| value >= b);
                levels.get(band)
            }
        };
        Quantized {
            level,
            error: value - level,
        }
    }
}
