//! Test images and job files.

use halftone::image_io::{ChannelLayout, PlanarImage};

/// Job files covering each engine and quantization policy.
pub mod jobs {
    pub const FLOYD_STEINBERG: &str = "method: error_diffusion\n";

    pub const SERPENTINE_JJN: &str = "\
method: error_diffusion
kernel: jarvis_judice_ninke
serpentine: true
";

    pub const NEAREST_FOUR: &str = "\
method: error_diffusion
kernel: stucki
quantization:
  nearest: [0, 85, 170, 255]
";

    pub const FIVE_BANDS: &str = "\
method: error_diffusion
quantization:
  bands:
    levels: [0, 64, 128, 192, 255]
    breakpoints: [20, 40, 60, 120]
";

    pub const BAYER4_BINARY: &str = "\
method: ordered
matrix: bayer4
";

    pub const BAYER8_MULTILEVEL: &str = "\
method: ordered
matrix: bayer8
levels: [0, 85, 170, 255]
";

    pub const GRAYSCALE_ORDERED: &str = "\
method: ordered
matrix: clustered3
grayscale: true
";

    pub const CUSTOM_KERNEL: &str = "\
method: error_diffusion
kernel:
  taps: [[1, 0, 1], [0, 1, 1]]
  divisor: 2
";
}

/// Horizontal ramp from 0 to 255 repeated on every row.
pub fn gray_ramp(width: u32, height: u32) -> PlanarImage {
    let samples = (0..height)
        .flat_map(|_| (0..width).map(move |x| ramp_value(x, width)))
        .collect();
    PlanarImage::gray(width, height, samples).expect("valid ramp")
}

/// Uniform gray image.
pub fn gray_flat(width: u32, height: u32, value: u8) -> PlanarImage {
    PlanarImage::gray(width, height, vec![value; (width * height) as usize]).expect("valid image")
}

/// RGBA image with a ramp in red, a flat green, an inverted ramp in blue and
/// a checkerboard alpha.
pub fn rgba_ramp(width: u32, height: u32) -> PlanarImage {
    let len = (width * height) as usize;
    let mut red = Vec::with_capacity(len);
    let mut blue = Vec::with_capacity(len);
    let mut alpha = Vec::with_capacity(len);
    for y in 0..height {
        for x in 0..width {
            let v = ramp_value(x, width);
            red.push(v);
            blue.push(255 - v);
            alpha.push(if (x + y) % 2 == 0 { 255 } else { 96 });
        }
    }
    PlanarImage::new(
        width,
        height,
        ChannelLayout::Rgba,
        vec![red, vec![100; len], blue, alpha],
    )
    .expect("valid image")
}

/// The 4x4 patch found at (250..254, 250..254) of the reference photo,
/// embedded at that position in an otherwise black 256x256 image.
pub fn reference_patch_image() -> PlanarImage {
    const PATCH: [[u8; 4]; 4] = [
        [176, 181, 194, 182],
        [175, 176, 163, 160],
        [172, 194, 189, 185],
        [207, 179, 181, 205],
    ];
    let mut samples = vec![0u8; 256 * 256];
    for (dy, row) in PATCH.iter().enumerate() {
        for (dx, &v) in row.iter().enumerate() {
            samples[(250 + dy) * 256 + 250 + dx] = v;
        }
    }
    PlanarImage::gray(256, 256, samples).expect("valid image")
}

/// Bayer 4x4 binary output expected for [`reference_patch_image`].
pub const REFERENCE_PATCH_BAYER4: [[u8; 4]; 4] = [
    [255, 255, 255, 0],
    [0, 255, 0, 255],
    [255, 255, 255, 255],
    [0, 255, 0, 255],
];

fn ramp_value(x: u32, width: u32) -> u8 {
    if width <= 1 {
        return 0;
    }
    ((x as u64 * 255) / (width as u64 - 1)) as u8
}
