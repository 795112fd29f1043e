//! Runs a configured engine over every color channel of an image.
//!
//! Each channel gets its own engine invocation (and therefore its own error
//! buffer); channels run in parallel on the rayon pool. Alpha is copied
//! through untouched.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::Path;
use tone_dither::{DitherError, ErrorDiffusion, IntensityGrid, OrderedDither, QuantizedGrid};

use crate::config::JobConfig;
use crate::error::AppError;
use crate::image_io::{self, PlanarImage};

/// A ready-to-run engine built from a [`JobConfig`].
#[derive(Debug, Clone)]
pub enum Engine {
    Diffusion(ErrorDiffusion),
    Ordered(OrderedDither),
}

impl Engine {
    pub fn run(&self, grid: &IntensityGrid) -> Result<QuantizedGrid, DitherError> {
        match self {
            Engine::Diffusion(engine) => engine.run(grid),
            Engine::Ordered(engine) => engine.run(grid),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Engine::Diffusion(_) => "error_diffusion",
            Engine::Ordered(_) => "ordered",
        }
    }
}

/// How many pixels of one channel landed on each output value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelHistogram {
    counts: BTreeMap<u8, usize>,
}

impl LevelHistogram {
    pub fn from_samples(samples: &[u8]) -> Self {
        let mut counts = BTreeMap::new();
        for &v in samples {
            *counts.entry(v).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn count(&self, level: u8) -> usize {
        self.counts.get(&level).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// `(level, count)` pairs in ascending level order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.counts.iter().map(|(&level, &count)| (level, count))
    }

    /// Compact `level:count(percent%)` listing for logs.
    pub fn summary(&self) -> String {
        let total = self.total().max(1) as f64;
        self.iter()
            .map(|(level, count)| {
                format!("{level}:{count}({:.1}%)", count as f64 * 100.0 / total)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Output of [`dither_image`].
#[derive(Debug, Clone)]
pub struct DitherOutcome {
    pub image: PlanarImage,
    /// One histogram per dithered (non-alpha) channel, in channel order.
    pub histograms: Vec<LevelHistogram>,
}

/// Dither every color channel of `image` with `engine`.
pub fn dither_image(image: &PlanarImage, engine: &Engine) -> Result<DitherOutcome, AppError> {
    let alpha = image.layout().alpha_index();
    let (width, height) = (image.width(), image.height());

    let planes = image
        .planes()
        .par_iter()
        .enumerate()
        .map(|(index, plane)| -> Result<Vec<u8>, DitherError> {
            if Some(index) == alpha {
                return Ok(plane.clone());
            }
            let grid = IntensityGrid::from_u8(width, height, plane)?;
            Ok(engine.run(&grid)?.to_u8())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let histograms = planes
        .iter()
        .enumerate()
        .filter(|&(index, _)| Some(index) != alpha)
        .map(|(_, plane)| LevelHistogram::from_samples(plane))
        .collect();

    let image = PlanarImage::new(width, height, image.layout(), planes)?;
    Ok(DitherOutcome { image, histograms })
}

/// Read `input`, dither it as `config` describes and write `output`.
pub fn process_file(
    input: &Path,
    output: &Path,
    config: &JobConfig,
) -> Result<DitherOutcome, AppError> {
    let engine = config.build()?;

    let mut image = image_io::read_png(input)?;
    if config.grayscale() {
        image = image.to_grayscale();
    }
    tracing::info!(
        input = %input.display(),
        width = image.width(),
        height = image.height(),
        layout = image.layout().name(),
        method = engine.name(),
        "Dithering image"
    );

    let outcome = dither_image(&image, &engine)?;
    image_io::write_png(output, &outcome.image)?;

    for (channel, histogram) in outcome.histograms.iter().enumerate() {
        tracing::info!(channel, levels = %histogram.summary(), "Level distribution");
    }
    tracing::info!(output = %output.display(), "Wrote dithered image");
    Ok(outcome)
}
