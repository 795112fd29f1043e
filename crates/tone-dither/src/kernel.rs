//! Error diffusion kernel definitions.
//!
//! A kernel lists the neighbors that receive a share of each pixel's
//! quantization error. The two kernels every caller expects are
//! [`DiffusionKernel::FLOYD_STEINBERG`] and
//! [`DiffusionKernel::JARVIS_JUDICE_NINKE`]; the other classic tables are
//! provided as presets and callers may build their own with
//! [`DiffusionKernel::new`].

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};

/// An error diffusion kernel.
///
/// Each tap `(dx, dy, weight)` sends `error * weight / divisor` to the pixel
/// at `(x + dx, y + dy)`. Taps are causal: they point strictly after the
/// current pixel in raster order (`dy > 0`, or `dy == 0` and `dx > 0`), so
/// a finalized pixel never receives error.
///
/// # Error Propagation
///
/// The fraction of error propagated is `sum(weights) / divisor`. Most
/// kernels propagate all of it; Atkinson deliberately drops a quarter.
/// Conservation is reported by [`is_energy_conserving`](Self::is_energy_conserving)
/// and never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffusionKernel {
    taps: Cow<'static, [(i32, i32, u32)]>,
    divisor: u32,
}

impl DiffusionKernel {
    /// Floyd-Steinberg, 4 taps, 16/16.
    ///
    /// ```text
    ///        X   7
    ///    3   5   1
    /// ```
    pub const FLOYD_STEINBERG: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)]),
        divisor: 16,
    };

    /// Jarvis-Judice-Ninke, 12 taps over three rows, 48/48.
    ///
    /// ```text
    ///            X   7   5
    ///    3   5   7   5   3
    ///    1   3   5   3   1
    /// ```
    pub const JARVIS_JUDICE_NINKE: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[
            (1, 0, 7),
            (2, 0, 5),
            (-2, 1, 3),
            (-1, 1, 5),
            (0, 1, 7),
            (1, 1, 5),
            (2, 1, 3),
            (-2, 2, 1),
            (-1, 2, 3),
            (0, 2, 5),
            (1, 2, 3),
            (2, 2, 1),
        ]),
        divisor: 48,
    };

    /// Stucki, 12 taps, 42/42. Heavier center weights than JJN.
    ///
    /// ```text
    ///            X   8   4
    ///    2   4   8   4   2
    ///    1   2   4   2   1
    /// ```
    pub const STUCKI: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[
            (1, 0, 8),
            (2, 0, 4),
            (-2, 1, 2),
            (-1, 1, 4),
            (0, 1, 8),
            (1, 1, 4),
            (2, 1, 2),
            (-2, 2, 1),
            (-1, 2, 2),
            (0, 2, 4),
            (1, 2, 2),
            (2, 2, 1),
        ]),
        divisor: 42,
    };

    /// Burkes, 7 taps over two rows, 32/32.
    ///
    /// ```text
    ///            X   8   4
    ///    2   4   8   4   2
    /// ```
    pub const BURKES: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[
            (1, 0, 8),
            (2, 0, 4),
            (-2, 1, 2),
            (-1, 1, 4),
            (0, 1, 8),
            (1, 1, 4),
            (2, 1, 2),
        ]),
        divisor: 32,
    };

    /// Sierra (Sierra-3), 10 taps, 32/32.
    ///
    /// ```text
    ///            X   5   3
    ///    2   4   5   4   2
    ///        2   3   2
    /// ```
    pub const SIERRA: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[
            (1, 0, 5),
            (2, 0, 3),
            (-2, 1, 2),
            (-1, 1, 4),
            (0, 1, 5),
            (1, 1, 4),
            (2, 1, 2),
            (-1, 2, 2),
            (0, 2, 3),
            (1, 2, 2),
        ]),
        divisor: 32,
    };

    /// Sierra two-row, 7 taps, 16/16.
    pub const SIERRA_TWO_ROW: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[
            (1, 0, 4),
            (2, 0, 3),
            (-2, 1, 1),
            (-1, 1, 2),
            (0, 1, 3),
            (1, 1, 2),
            (2, 1, 1),
        ]),
        divisor: 16,
    };

    /// Sierra Lite, 3 taps, 4/4.
    pub const SIERRA_LITE: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[(1, 0, 2), (-1, 1, 1), (0, 1, 1)]),
        divisor: 4,
    };

    /// Atkinson, 6 taps, 6/8. Only 75% of the error is propagated.
    ///
    /// ```text
    ///        X   1   1
    ///    1   1   1
    ///        1
    /// ```
    pub const ATKINSON: DiffusionKernel = DiffusionKernel {
        taps: Cow::Borrowed(&[(1, 0, 1), (2, 0, 1), (-1, 1, 1), (0, 1, 1), (1, 1, 1), (0, 2, 1)]),
        divisor: 8,
    };

    /// Build a caller-supplied kernel.
    ///
    /// Fails with `InvalidConfiguration` if there are no taps, the divisor
    /// is zero, a weight is zero, or a tap is not causal.
    ///
    /// # Example
    ///
    /// ```
    /// use tone_dither::DiffusionKernel;
    ///
    /// let right_only = DiffusionKernel::new(vec![(1, 0, 1)], 1).unwrap();
    /// assert!(right_only.is_energy_conserving());
    ///
    /// assert!(DiffusionKernel::new(vec![(-1, 0, 1)], 1).is_err());
    /// ```
    pub fn new(taps: Vec<(i32, i32, u32)>, divisor: u32) -> Result<Self> {
        let kernel = Self {
            taps: Cow::Owned(taps),
            divisor,
        };
        kernel.validate()?;
        Ok(kernel)
    }

    /// Check the invariants that [`new`](Self::new) enforces.
    ///
    /// Engines call this before touching any pixel.
    pub fn validate(&self) -> Result<()> {
        if self.taps.is_empty() {
            return Err(ConfigError::EmptyKernel.into());
        }
        if self.divisor == 0 {
            return Err(ConfigError::ZeroDivisor.into());
        }
        for (index, &(dx, dy, weight)) in self.taps.iter().enumerate() {
            if weight == 0 {
                return Err(ConfigError::ZeroWeight { index }.into());
            }
            if !(dy > 0 || (dy == 0 && dx > 0)) {
                return Err(ConfigError::NonCausalTap { index, dx, dy }.into());
            }
        }
        Ok(())
    }

    #[inline]
    pub fn taps(&self) -> &[(i32, i32, u32)] {
        &self.taps
    }

    #[inline]
    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    pub fn weight_sum(&self) -> u32 {
        self.taps.iter().map(|&(_, _, w)| w).sum()
    }

    /// True when all error is propagated (`sum(weights) == divisor`).
    pub fn is_energy_conserving(&self) -> bool {
        self.weight_sum() == self.divisor
    }

    /// How many rows below the current one the kernel reaches.
    pub fn max_dy(&self) -> i32 {
        self.taps.iter().map(|&(_, dy, _)| dy).max().unwrap_or(0)
    }
}

/// Named kernel presets, for configuration files and the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KernelPreset {
    FloydSteinberg,
    JarvisJudiceNinke,
    Stucki,
    Burkes,
    Sierra,
    SierraTwoRow,
    SierraLite,
    Atkinson,
}

impl KernelPreset {
    pub const ALL: [KernelPreset; 8] = [
        KernelPreset::FloydSteinberg,
        KernelPreset::JarvisJudiceNinke,
        KernelPreset::Stucki,
        KernelPreset::Burkes,
        KernelPreset::Sierra,
        KernelPreset::SierraTwoRow,
        KernelPreset::SierraLite,
        KernelPreset::Atkinson,
    ];

    pub fn kernel(self) -> DiffusionKernel {
        match self {
            KernelPreset::FloydSteinberg => DiffusionKernel::FLOYD_STEINBERG,
            KernelPreset::JarvisJudiceNinke => DiffusionKernel::JARVIS_JUDICE_NINKE,
            KernelPreset::Stucki => DiffusionKernel::STUCKI,
            KernelPreset::Burkes => DiffusionKernel::BURKES,
            KernelPreset::Sierra => DiffusionKernel::SIERRA,
            KernelPreset::SierraTwoRow => DiffusionKernel::SIERRA_TWO_ROW,
            KernelPreset::SierraLite => DiffusionKernel::SIERRA_LITE,
            KernelPreset::Atkinson => DiffusionKernel::ATKINSON,
        }
    }

    /// Canonical snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            KernelPreset::FloydSteinberg => "floyd_steinberg",
            KernelPreset::JarvisJudiceNinke => "jarvis_judice_ninke",
            KernelPreset::Stucki => "stucki",
            KernelPreset::Burkes => "burkes",
            KernelPreset::Sierra => "sierra",
            KernelPreset::SierraTwoRow => "sierra_two_row",
            KernelPreset::SierraLite => "sierra_lite",
            KernelPreset::Atkinson => "atkinson",
        }
    }
}

impl fmt::Display for KernelPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a kernel or matrix preset name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} preset: {name}")]
pub struct UnknownPreset {
    pub kind: &'static str,
    pub name: String,
}

impl UnknownPreset {
    pub(crate) fn new(kind: &'static str, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
        }
    }
}

impl FromStr for KernelPreset {
    type Err = UnknownPreset;

    /// Accepts the canonical name plus short aliases (`fs`, `jjn`).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "fs" => return Ok(KernelPreset::FloydSteinberg),
            "jjn" => return Ok(KernelPreset::JarvisJudiceNinke),
            _ => {}
        }
        KernelPreset::ALL
            .into_iter()
            .find(|p| p.name() == normalized)
            .ok_or_else(|| UnknownPreset::new("kernel", s))
    }
}
