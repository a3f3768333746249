use std::io::Cursor;
use std::path::Path;

use image::{ImageFormat, ImageOutputFormat, RgbaImage};
use tiny_skia::Pixmap;

use super::color::Rgb;
use crate::HalftoneError;

/// Raster the glyphs are composited onto. Zero-area surfaces are valid and
/// hold no pixel storage.
#[derive(Clone, Debug)]
pub struct OutputSurface {
    width: u32,
    height: u32,
    pixmap: Option<Pixmap>,
}

impl OutputSurface {
    /// Surface of the given size filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb) -> Result<Self, HalftoneError> {
        if width == 0 || height == 0 {
            return Ok(Self { width, height, pixmap: None });
        }

        let mut pixmap =
            Pixmap::new(width, height).ok_or(HalftoneError::SurfaceAllocation { width, height })?;
        pixmap.fill(background.to_skia(1.0));
        Ok(Self { width, height, pixmap: Some(pixmap) })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.pixmap.is_none()
    }

    pub(crate) fn pixmap_mut(&mut self) -> Option<&mut Pixmap> {
        self.pixmap.as_mut()
    }

    /// Straight-alpha RGBA value at `(x, y)`, `None` outside the surface.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let color = self.pixmap.as_ref()?.pixel(x, y)?.demultiply();
        Some([color.red(), color.green(), color.blue(), color.alpha()])
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let Some(pixmap) = &self.pixmap else {
            return RgbaImage::new(self.width, self.height);
        };

        let mut data = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let color = pixel.demultiply();
            data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
        }
        RgbaImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, HalftoneError> {
        if self.is_empty() {
            return Err(HalftoneError::EmptySurface);
        }

        let mut bytes = Vec::new();
        self.to_rgba_image()
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(HalftoneError::Export)?;
        Ok(bytes)
    }

    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), HalftoneError> {
        if self.is_empty() {
            return Err(HalftoneError::EmptySurface);
        }

        self.to_rgba_image()
            .save_with_format(path, ImageFormat::Png)
            .map_err(HalftoneError::Export)
    }
}
