use thiserror::Error;
use tone_dither::DitherError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(String),

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("Unsupported image: {0}")]
    UnsupportedImage(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Dither error: {0}")]
    Dither(#[from] DitherError),
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

impl From<tone_dither::UnknownPreset> for AppError {
    fn from(e: tone_dither::UnknownPreset) -> Self {
        AppError::Config(e.to_string())
    }
}
