use std::path::Path;

use image::{DynamicImage, RgbaImage};

use crate::HalftoneError;

/// Decoded RGBA source. Read-only once loaded.
#[derive(Clone, Debug)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, HalftoneError> {
        let image = image::open(path)?;
        Ok(Self::from_dynamic(image))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HalftoneError> {
        let image = image::load_from_memory(bytes)?;
        Ok(Self::from_dynamic(image))
    }

    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self::from_rgba(image.into_rgba8())
    }

    /// Fully transparent pixels lose their color and read as black.
    pub fn from_rgba(mut pixels: RgbaImage) -> Self {
        for pixel in pixels.pixels_mut().filter(|pixel| pixel[3] == 0) {
            pixel.0 = [0; 4];
        }
        Self { pixels }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
