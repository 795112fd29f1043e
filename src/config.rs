//! Dithering job configuration.
//!
//! A job is read from YAML (or assembled from CLI flags) and turned into a
//! configured engine with [`JobConfig::build`]. Every threshold, level and
//! kernel lives here, never in the engines.
//!
//! ```yaml
//! method: error_diffusion
//! kernel: jarvis_judice_ninke
//! quantization:
//!   bands: { levels: [0, 64, 128, 192, 255], breakpoints: [20, 40, 60, 120] }
//! ```

use serde::Deserialize;
use std::path::Path;
use tone_dither::{
    DiffusionKernel, ErrorDiffusion, KernelPreset, LevelSet, MatrixPreset, OrderedDither,
    OrderedMode, QuantizationPolicy, ThresholdMatrix,
};

use crate::error::AppError;
use crate::pipeline::Engine;

/// A complete dithering job.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum JobConfig {
    ErrorDiffusion(DiffusionJob),
    Ordered(OrderedJob),
}

/// Error diffusion settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DiffusionJob {
    #[serde(default)]
    pub kernel: KernelSpec,

    /// Scan odd rows right-to-left
    #[serde(default)]
    pub serpentine: bool,

    #[serde(default, with = "serde_yaml::with::singleton_map")]
    pub quantization: QuantizationSpec,

    /// Collapse color input to one gray channel first
    #[serde(default)]
    pub grayscale: bool,
}

/// Ordered dithering settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct OrderedJob {
    #[serde(default)]
    pub matrix: MatrixSpec,

    /// Output levels. Two levels select the binary `v > t` rule; any other
    /// count uses the multilevel offset rule.
    #[serde(default = "default_levels")]
    pub levels: Vec<f64>,

    #[serde(default = "default_sample_max")]
    pub sample_max: f64,

    #[serde(default)]
    pub grayscale: bool,
}

fn default_levels() -> Vec<f64> {
    vec![0.0, 255.0]
}

fn default_sample_max() -> f64 {
    255.0
}

/// A kernel preset name or an explicit tap table.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum KernelSpec {
    Preset(String),
    Custom {
        taps: Vec<(i32, i32, u32)>,
        divisor: u32,
    },
}

impl Default for KernelSpec {
    fn default() -> Self {
        KernelSpec::Preset(KernelPreset::FloydSteinberg.name().to_string())
    }
}

/// A matrix preset name or explicit rows.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MatrixSpec {
    Preset(String),
    Custom { values: Vec<Vec<u32>> },
}

impl Default for MatrixSpec {
    fn default() -> Self {
        MatrixSpec::Preset(MatrixPreset::Bayer4.name().to_string())
    }
}

/// How error diffusion picks a level.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum QuantizationSpec {
    Threshold {
        #[serde(default)]
        low: f64,
        #[serde(default = "default_high")]
        high: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    Nearest(Vec<f64>),
    Bands {
        levels: Vec<f64>,
        breakpoints: Vec<f64>,
    },
}

fn default_high() -> f64 {
    255.0
}

fn default_threshold() -> f64 {
    128.0
}

impl Default for QuantizationSpec {
    fn default() -> Self {
        QuantizationSpec::Threshold {
            low: 0.0,
            high: default_high(),
            threshold: default_threshold(),
        }
    }
}

impl KernelSpec {
    pub fn build(&self) -> Result<DiffusionKernel, AppError> {
        match self {
            KernelSpec::Preset(name) => Ok(name.parse::<KernelPreset>()?.kernel()),
            KernelSpec::Custom { taps, divisor } => {
                Ok(DiffusionKernel::new(taps.clone(), *divisor)?)
            }
        }
    }
}

impl MatrixSpec {
    pub fn build(&self) -> Result<ThresholdMatrix, AppError> {
        match self {
            MatrixSpec::Preset(name) => Ok(name.parse::<MatrixPreset>()?.matrix()),
            MatrixSpec::Custom { values } => Ok(ThresholdMatrix::new(values.clone())?),
        }
    }
}

impl QuantizationSpec {
    pub fn build(&self) -> Result<QuantizationPolicy, AppError> {
        let policy = match self {
            QuantizationSpec::Threshold {
                low,
                high,
                threshold,
            } => QuantizationPolicy::threshold(*low, *high, *threshold)?,
            QuantizationSpec::Nearest(levels) => {
                QuantizationPolicy::nearest(LevelSet::new(levels.clone())?)
            }
            QuantizationSpec::Bands {
                levels,
                breakpoints,
            } => QuantizationPolicy::bands(LevelSet::new(levels.clone())?, breakpoints.clone())?,
        };
        Ok(policy)
    }
}

impl JobConfig {
    /// Read a job from a YAML file. Parse failures are errors, never
    /// silently replaced by defaults.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(
            path = %path.display(),
            method = config.method_name(),
            "Loaded job configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, AppError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            JobConfig::ErrorDiffusion(_) => "error_diffusion",
            JobConfig::Ordered(_) => "ordered",
        }
    }

    pub fn grayscale(&self) -> bool {
        match self {
            JobConfig::ErrorDiffusion(job) => job.grayscale,
            JobConfig::Ordered(job) => job.grayscale,
        }
    }

    pub fn set_grayscale(&mut self, grayscale: bool) {
        match self {
            JobConfig::ErrorDiffusion(job) => job.grayscale = grayscale,
            JobConfig::Ordered(job) => job.grayscale = grayscale,
        }
    }

    /// Validate the job and build its engine.
    pub fn build(&self) -> Result<Engine, AppError> {
        match self {
            JobConfig::ErrorDiffusion(job) => {
                let engine = ErrorDiffusion::new(job.quantization.build()?, job.kernel.build()?)
                    .serpentine(job.serpentine);
                Ok(Engine::Diffusion(engine))
            }
            JobConfig::Ordered(job) => {
                let mode = match job.levels.as_slice() {
                    &[low, high] => OrderedMode::Binary { low, high },
                    _ => OrderedMode::Multilevel(LevelSet::new(job.levels.clone())?),
                };
                let engine =
                    OrderedDither::new(job.matrix.build()?, mode).sample_max(job.sample_max);
                Ok(Engine::Ordered(engine))
            }
        }
    }
}
