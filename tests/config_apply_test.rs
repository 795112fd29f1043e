//! Loading job files and reporting bad input.

mod common;

use common::{fixtures, TestWorkspace};
use halftone::config::JobConfig;
use halftone::error::AppError;
use halftone::pipeline;

#[test]
fn test_job_file_round_trip() {
    let ws = TestWorkspace::new();
    let job_path = ws.write_job("job.yaml", fixtures::jobs::BAYER8_MULTILEVEL);
    let input = ws.write_png("in.png", &fixtures::gray_ramp(16, 16));
    let output = ws.path("out.png");

    let config = JobConfig::load(&job_path).unwrap();
    assert_eq!(config.method_name(), "ordered");

    pipeline::process_file(&input, &output, &config).unwrap();
    assert!(output.exists());
}

#[test]
fn test_grayscale_override() {
    let mut config = JobConfig::from_yaml_str(fixtures::jobs::FLOYD_STEINBERG).unwrap();
    assert!(!config.grayscale());
    config.set_grayscale(true);
    assert!(config.grayscale());
}

#[test]
fn test_missing_job_file() {
    let ws = TestWorkspace::new();
    let result = JobConfig::load(&ws.path("absent.yaml"));
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
fn test_unknown_method_is_rejected() {
    let result = JobConfig::from_yaml_str("method: halftone_screen\n");
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_unknown_kernel_fails_before_reading_input() {
    let ws = TestWorkspace::new();
    let config = JobConfig::from_yaml_str("method: error_diffusion\nkernel: burkes_mk2\n").unwrap();
    let result = pipeline::process_file(&ws.path("missing.png"), &ws.path("out.png"), &config);

    match result {
        Err(AppError::Config(message)) => assert!(message.contains("burkes_mk2"), "{message}"),
        other => panic!("expected config error, got {other:?}"),
    }
}

#[test]
fn test_non_causal_kernel_is_rejected() {
    let config = JobConfig::from_yaml_str(
        "method: error_diffusion\nkernel:\n  taps: [[-1, 0, 1]]\n  divisor: 1\n",
    )
    .unwrap();
    assert!(matches!(config.build(), Err(AppError::Dither(_))));
}

#[test]
fn test_mismatched_breakpoints_are_rejected() {
    let config = JobConfig::from_yaml_str(
        "method: error_diffusion\nquantization:\n  bands:\n    levels: [0, 128, 255]\n    breakpoints: [100]\n",
    )
    .unwrap();
    assert!(matches!(config.build(), Err(AppError::Dither(_))));
}

#[test]
fn test_non_png_input_is_rejected() {
    let ws = TestWorkspace::new();
    let input = ws.write_bytes("fake.png", b"GIF89a not a png");
    let config = JobConfig::from_yaml_str(fixtures::jobs::FLOYD_STEINBERG).unwrap();
    let result = pipeline::process_file(&input, &ws.path("out.png"), &config);

    assert!(matches!(result, Err(AppError::PngDecode(_))));
    assert!(!ws.path("out.png").exists());
}
