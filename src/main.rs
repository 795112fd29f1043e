use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use halftone::config::{
    DiffusionJob, JobConfig, KernelSpec, MatrixSpec, OrderedJob, QuantizationSpec,
};
use halftone::pipeline;
use tone_dither::{KernelPreset, MatrixPreset};

#[derive(Parser)]
#[command(name = "halftone")]
#[command(about = "Error diffusion and ordered dithering for PNG images")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct IoArgs {
    /// Input PNG file path
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG file path
    #[arg(short, long)]
    output: PathBuf,

    /// Collapse color input to a single gray channel first
    #[arg(long)]
    grayscale: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Dither with an error diffusion kernel
    Diffuse {
        #[command(flatten)]
        io: IoArgs,

        /// Kernel preset (see `presets`)
        #[arg(short, long, default_value = "floyd_steinberg")]
        kernel: String,

        /// Binary threshold: values >= T become 255
        #[arg(short, long, conflicts_with = "levels")]
        threshold: Option<f64>,

        /// Output levels as comma-separated values (e.g. "0,85,170,255")
        #[arg(short, long, value_delimiter = ',')]
        levels: Option<Vec<f64>>,

        /// Band breakpoints between levels (one fewer than levels)
        #[arg(short, long, value_delimiter = ',', requires = "levels")]
        breakpoints: Option<Vec<f64>>,

        /// Scan odd rows right-to-left
        #[arg(long)]
        serpentine: bool,
    },
    /// Dither with a tiled threshold matrix
    Ordered {
        #[command(flatten)]
        io: IoArgs,

        /// Matrix preset: bayer2, bayer4, bayer8 or clustered3
        #[arg(short, long, default_value = "bayer4")]
        matrix: String,

        /// Output levels as comma-separated values (e.g. "0,64,128,192,255")
        #[arg(short, long, value_delimiter = ',', default_value = "0,255")]
        levels: Vec<f64>,
    },
    /// Dither as described by a YAML job file
    Apply {
        #[command(flatten)]
        io: IoArgs,

        /// Job configuration file
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List kernel and matrix presets
    Presets,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "halftone=info,tone_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Diffuse {
            io,
            kernel,
            threshold,
            levels,
            breakpoints,
            serpentine,
        } => {
            let quantization = match (levels, breakpoints) {
                (Some(levels), Some(breakpoints)) => QuantizationSpec::Bands {
                    levels,
                    breakpoints,
                },
                (Some(levels), None) => QuantizationSpec::Nearest(levels),
                (None, _) => QuantizationSpec::Threshold {
                    low: 0.0,
                    high: 255.0,
                    threshold: threshold.unwrap_or(128.0),
                },
            };
            let job = JobConfig::ErrorDiffusion(DiffusionJob {
                kernel: KernelSpec::Preset(kernel),
                serpentine,
                quantization,
                grayscale: io.grayscale,
            });
            run_job(&io.input, &io.output, &job)
        }
        Commands::Ordered { io, matrix, levels } => {
            let job = JobConfig::Ordered(OrderedJob {
                matrix: MatrixSpec::Preset(matrix),
                levels,
                sample_max: 255.0,
                grayscale: io.grayscale,
            });
            run_job(&io.input, &io.output, &job)
        }
        Commands::Apply { io, config } => {
            let mut job = JobConfig::load(&config)
                .with_context(|| format!("Failed to load job from {}", config.display()))?;
            if io.grayscale {
                job.set_grayscale(true);
            }
            run_job(&io.input, &io.output, &job)
        }
        Commands::Presets => {
            print_presets();
            Ok(())
        }
    }
}

fn run_job(input: &Path, output: &Path, job: &JobConfig) -> anyhow::Result<()> {
    let outcome = pipeline::process_file(input, output, job)
        .with_context(|| format!("Failed to dither {}", input.display()))?;

    println!(
        "Dithered {}x{} {} image ({}) -> {}",
        outcome.image.width(),
        outcome.image.height(),
        outcome.image.layout().name(),
        job.method_name(),
        output.display()
    );
    Ok(())
}

fn print_presets() {
    println!("Kernels:");
    for preset in KernelPreset::ALL {
        let kernel = preset.kernel();
        println!(
            "  {:<22} {:>2} taps, {}/{}",
            preset.name(),
            kernel.taps().len(),
            kernel.weight_sum(),
            kernel.divisor()
        );
    }
    println!("Matrices:");
    for preset in MatrixPreset::ALL {
        let size = preset.matrix().size();
        println!("  {:<22} {size}x{size}", preset.name());
    }
}
