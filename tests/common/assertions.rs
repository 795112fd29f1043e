//! Assertion helpers for tests.

use pretty_assertions::assert_eq;

use halftone::image_io::PlanarImage;

/// Assert two images share dimensions and channel layout.
pub fn assert_same_shape(actual: &PlanarImage, expected: &PlanarImage) {
    assert_eq!(
        (actual.width(), actual.height(), actual.layout()),
        (expected.width(), expected.height(), expected.layout()),
        "Image shape changed"
    );
}

/// Assert every sample of channel `index` is one of `levels`.
pub fn assert_only_levels(image: &PlanarImage, index: usize, levels: &[u8]) {
    let stray: Vec<u8> = image
        .plane(index)
        .iter()
        .copied()
        .filter(|v| !levels.contains(v))
        .collect();
    assert!(
        stray.is_empty(),
        "Channel {} has values outside {:?}: {:?}",
        index,
        levels,
        &stray[..stray.len().min(16)]
    );
}

/// Assert the mean of channel `index` is within `tolerance` of `expected`.
pub fn assert_mean_near(image: &PlanarImage, index: usize, expected: f64, tolerance: f64) {
    let plane = image.plane(index);
    let mean = plane.iter().map(|&v| v as f64).sum::<f64>() / plane.len() as f64;
    assert!(
        (mean - expected).abs() <= tolerance,
        "Channel {} mean {:.2} not within {} of {:.2}",
        index,
        mean,
        tolerance,
        expected
    );
}

/// Extract a `w`x`h` window of channel `index` as rows.
pub fn window(image: &PlanarImage, index: usize, x: u32, y: u32, w: u32, h: u32) -> Vec<Vec<u8>> {
    let plane = image.plane(index);
    (y..y + h)
        .map(|row| {
            let start = (row * image.width() + x) as usize;
            plane[start..start + w as usize].to_vec()
        })
        .collect()
}
