//! Halftone - error diffusion and ordered dithering for PNG images
//!
//! Reads PNG files, dithers each color channel with the `tone-dither`
//! engines and writes the result. This library exposes modules for
//! integration testing.

pub mod config;
pub mod error;
pub mod image_io;
pub mod pipeline;
