//! Scratch directory holding input images, job files and outputs.

use std::path::PathBuf;

use halftone::config::JobConfig;
use halftone::error::AppError;
use halftone::image_io::{self, PlanarImage};
use halftone::pipeline::{self, DitherOutcome};

/// A temporary directory that is removed when dropped.
pub struct TestWorkspace {
    dir: tempfile::TempDir,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Encode `image` as PNG under `name` and return its path.
    pub fn write_png(&self, name: &str, image: &PlanarImage) -> PathBuf {
        let path = self.path(name);
        image_io::write_png(&path, image).expect("Failed to write input PNG");
        path
    }

    /// Write raw bytes under `name` and return its path.
    pub fn write_bytes(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }

    /// Write a YAML job file under `name` and return its path.
    pub fn write_job(&self, name: &str, yaml: &str) -> PathBuf {
        self.write_bytes(name, yaml.as_bytes())
    }

    /// Dither `input` into `output` with a job parsed from `yaml`.
    pub fn dither(
        &self,
        input: &PlanarImage,
        yaml: &str,
    ) -> Result<(DitherOutcome, PlanarImage), AppError> {
        let input_path = self.write_png("input.png", input);
        let output_path = self.path("output.png");
        let config = JobConfig::from_yaml_str(yaml)?;
        let outcome = pipeline::process_file(&input_path, &output_path, &config)?;
        let written = image_io::read_png(&output_path)?;
        Ok((outcome, written))
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
