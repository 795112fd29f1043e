//! PNG decoding into per-channel planes and encoding back.
//!
//! Every supported input is normalized to 8 bits per sample: 16-bit samples
//! are stripped, palettes and sub-byte grays are expanded. Planes are stored
//! de-interleaved so each channel can be handed to an engine on its own.

use std::io::Cursor;
use std::path::Path;

use crate::error::AppError;

/// Channel arrangement of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    Gray,
    GrayAlpha,
    Rgb,
    Rgba,
}

impl ChannelLayout {
    pub fn channel_count(self) -> usize {
        match self {
            ChannelLayout::Gray => 1,
            ChannelLayout::GrayAlpha => 2,
            ChannelLayout::Rgb => 3,
            ChannelLayout::Rgba => 4,
        }
    }

    /// Index of the alpha plane, if any. Alpha is always last.
    pub fn alpha_index(self) -> Option<usize> {
        match self {
            ChannelLayout::GrayAlpha => Some(1),
            ChannelLayout::Rgba => Some(3),
            ChannelLayout::Gray | ChannelLayout::Rgb => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelLayout::Gray => "gray",
            ChannelLayout::GrayAlpha => "gray+alpha",
            ChannelLayout::Rgb => "rgb",
            ChannelLayout::Rgba => "rgba",
        }
    }

    fn from_color_type(color_type: png::ColorType) -> Result<Self, AppError> {
        match color_type {
            png::ColorType::Grayscale => Ok(ChannelLayout::Gray),
            png::ColorType::GrayscaleAlpha => Ok(ChannelLayout::GrayAlpha),
            png::ColorType::Rgb => Ok(ChannelLayout::Rgb),
            png::ColorType::Rgba => Ok(ChannelLayout::Rgba),
            other => Err(AppError::UnsupportedImage(format!(
                "color type {other:?} after expansion"
            ))),
        }
    }

    fn color_type(self) -> png::ColorType {
        match self {
            ChannelLayout::Gray => png::ColorType::Grayscale,
            ChannelLayout::GrayAlpha => png::ColorType::GrayscaleAlpha,
            ChannelLayout::Rgb => png::ColorType::Rgb,
            ChannelLayout::Rgba => png::ColorType::Rgba,
        }
    }
}

/// An 8-bit image held as one plane per channel.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanarImage {
    width: u32,
    height: u32,
    layout: ChannelLayout,
    planes: Vec<Vec<u8>>,
}

impl PlanarImage {
    /// Build an image from planes.
    ///
    /// Fails with `UnsupportedImage` on zero area, a plane count that does
    /// not match the layout, or a plane of the wrong length.
    pub fn new(
        width: u32,
        height: u32,
        layout: ChannelLayout,
        planes: Vec<Vec<u8>>,
    ) -> Result<Self, AppError> {
        if width == 0 || height == 0 {
            return Err(AppError::UnsupportedImage(format!(
                "zero-area image {width}x{height}"
            )));
        }
        if planes.len() != layout.channel_count() {
            return Err(AppError::UnsupportedImage(format!(
                "{} planes for a {} image",
                planes.len(),
                layout.name()
            )));
        }
        let expected = width as usize * height as usize;
        if let Some(plane) = planes.iter().find(|p| p.len() != expected) {
            return Err(AppError::UnsupportedImage(format!(
                "plane of {} samples for a {width}x{height} image",
                plane.len()
            )));
        }
        Ok(Self {
            width,
            height,
            layout,
            planes,
        })
    }

    /// Single-channel gray image.
    pub fn gray(width: u32, height: u32, samples: Vec<u8>) -> Result<Self, AppError> {
        Self::new(width, height, ChannelLayout::Gray, vec![samples])
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn planes(&self) -> &[Vec<u8>] {
        &self.planes
    }

    pub fn plane(&self, index: usize) -> &[u8] {
        &self.planes[index]
    }

    /// Collapse color channels into one gray channel.
    ///
    /// Uses the unweighted mean `(R + G + B) / 3`, rounded to nearest.
    /// Gray images are returned unchanged; alpha is kept.
    pub fn to_grayscale(&self) -> Self {
        let (layout, alpha) = match self.layout {
            ChannelLayout::Gray | ChannelLayout::GrayAlpha => return self.clone(),
            ChannelLayout::Rgb => (ChannelLayout::Gray, None),
            ChannelLayout::Rgba => (ChannelLayout::GrayAlpha, Some(self.planes[3].clone())),
        };

        let (r, g, b) = (&self.planes[0], &self.planes[1], &self.planes[2]);
        let gray: Vec<u8> = r
            .iter()
            .zip(g)
            .zip(b)
            .map(|((&r, &g), &b)| {
                let sum = u16::from(r) + u16::from(g) + u16::from(b);
                ((sum + 1) / 3) as u8
            })
            .collect();

        let mut planes = vec![gray];
        planes.extend(alpha);
        Self {
            width: self.width,
            height: self.height,
            layout,
            planes,
        }
    }

    /// Interleave planes into PNG row data.
    fn interleaved(&self) -> Vec<u8> {
        let channels = self.planes.len();
        let pixels = self.width as usize * self.height as usize;
        let mut data = Vec::with_capacity(pixels * channels);
        for i in 0..pixels {
            for plane in &self.planes {
                data.push(plane[i]);
            }
        }
        data
    }
}

/// Decode a PNG into planes.
pub fn decode_png(bytes: &[u8]) -> Result<PlanarImage, AppError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| AppError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| AppError::PngDecode(e.to_string()))?;

    if info.bit_depth != png::BitDepth::Eight {
        return Err(AppError::UnsupportedImage(format!(
            "bit depth {:?} after expansion",
            info.bit_depth
        )));
    }
    let layout = ChannelLayout::from_color_type(info.color_type)?;
    let channels = layout.channel_count();
    let width = info.width as usize;
    let row_bytes = width * channels;

    let mut planes = vec![Vec::with_capacity(width * info.height as usize); channels];
    for row in buf.chunks(info.line_size).take(info.height as usize) {
        for pixel in row[..row_bytes].chunks_exact(channels) {
            for (plane, &sample) in planes.iter_mut().zip(pixel) {
                plane.push(sample);
            }
        }
    }

    tracing::debug!(
        width = info.width,
        height = info.height,
        layout = layout.name(),
        "Decoded PNG"
    );
    PlanarImage::new(info.width, info.height, layout, planes)
}

/// Encode planes as an 8-bit PNG with the image's own color type.
pub fn encode_png(image: &PlanarImage) -> Result<Vec<u8>, AppError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, image.width, image.height);
        encoder.set_color(image.layout.color_type());
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&image.interleaved())
            .map_err(|e| AppError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

pub fn read_png(path: &Path) -> Result<PlanarImage, AppError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

pub fn write_png(path: &Path, image: &PlanarImage) -> Result<(), AppError> {
    let bytes = encode_png(image)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn encode_raw(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        data: &[u8],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_gray_round_trip() {
        let image = PlanarImage::gray(3, 2, vec![0, 10, 20, 30, 40, 255]).unwrap();
        let decoded = decode_png(&encode_png(&image).unwrap()).unwrap();
        assert_eq!(decoded, image);
    }

    #[test]
    fn test_rgba_is_split_into_planes() {
        let data = [1, 2, 3, 4, 5, 6, 7, 8];
        let png = encode_raw(2, 1, png::ColorType::Rgba, png::BitDepth::Eight, &data);
        let image = decode_png(&png).unwrap();

        assert_eq!(image.layout(), ChannelLayout::Rgba);
        assert_eq!(image.plane(0), &[1, 5]);
        assert_eq!(image.plane(1), &[2, 6]);
        assert_eq!(image.plane(2), &[3, 7]);
        assert_eq!(image.plane(3), &[4, 8]);
        assert_eq!(image.layout().alpha_index(), Some(3));
    }

    #[test]
    fn test_sixteen_bit_gray_is_stripped() {
        // Big-endian 16-bit samples: 0x1234 and 0xFF00
        let data = [0x12, 0x34, 0xFF, 0x00];
        let png = encode_raw(2, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen, &data);
        let image = decode_png(&png).unwrap();
        assert_eq!(image.layout(), ChannelLayout::Gray);
        assert_eq!(image.plane(0), &[0x12, 0xFF]);
    }

    #[test]
    fn test_one_bit_gray_is_expanded() {
        // 0b1010_0000: pixels 1, 0, 1, 0
        let png = encode_raw(4, 1, png::ColorType::Grayscale, png::BitDepth::One, &[0b1010_0000]);
        let image = decode_png(&png).unwrap();
        assert_eq!(image.plane(0), &[255, 0, 255, 0]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = decode_png(b"not a png").unwrap_err();
        assert!(matches!(err, AppError::PngDecode(_)));
    }

    #[test]
    fn test_new_rejects_mismatched_planes() {
        let err = PlanarImage::new(2, 2, ChannelLayout::Rgb, vec![vec![0; 4]; 2]).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));

        let err = PlanarImage::new(2, 2, ChannelLayout::Gray, vec![vec![0; 3]]).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));

        let err = PlanarImage::gray(0, 2, vec![]).unwrap_err();
        assert!(matches!(err, AppError::UnsupportedImage(_)));
    }

    #[test]
    fn test_to_grayscale_uses_rounded_mean() {
        let image = PlanarImage::new(
            2,
            1,
            ChannelLayout::Rgba,
            vec![vec![255, 10], vec![0, 11], vec![0, 11], vec![200, 50]],
        )
        .unwrap();
        let gray = image.to_grayscale();
        assert_eq!(gray.layout(), ChannelLayout::GrayAlpha);
        // 255/3 = 85; 32/3 = 10.67 -> 11
        assert_eq!(gray.plane(0), &[85, 11]);
        assert_eq!(gray.plane(1), &[200, 50]);
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = PlanarImage::new(
            1,
            2,
            ChannelLayout::GrayAlpha,
            vec![vec![0, 255], vec![255, 128]],
        )
        .unwrap();
        write_png(&path, &image).unwrap();
        assert_eq!(read_png(&path).unwrap(), image);
    }
}
