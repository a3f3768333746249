use image::{GrayAlphaImage, LumaA, RgbaImage};

/// Tonal adjustments applied before sampling. Percentages, 100 is neutral.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AdjustmentParameters {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
    pub invert: bool,
}

impl Default for AdjustmentParameters {
    fn default() -> Self {
        Self { brightness: 100.0, contrast: 100.0, saturation: 100.0, invert: false }
    }
}

/// Grayscale luminance buffer derived from a source image.
#[derive(Clone, Debug)]
pub struct ToneField {
    pixels: GrayAlphaImage,
}

impl ToneField {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn luminance(&self, x: u32, y: u32) -> u8 {
        self.pixels.get_pixel(x, y).0[0]
    }

    pub fn as_image(&self) -> &GrayAlphaImage {
        &self.pixels
    }

    /// Expands the field to RGBA with R = G = B = luminance.
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            let LumaA([l, a]) = *self.pixels.get_pixel(x, y);
            image::Rgba([l, l, l, a])
        })
    }
}

/// Runs the per-pixel tone transform over the whole image.
pub fn tone_field(image: &RgbaImage, params: &AdjustmentParameters) -> ToneField {
    let mut pixels = GrayAlphaImage::new(image.width(), image.height());
    for (src, dst) in image.pixels().zip(pixels.pixels_mut()) {
        let [r, g, b, a] = src.0;
        *dst = LumaA([tone_value([r, g, b], params), a]);
    }
    ToneField { pixels }
}

/// Luminance of a single pixel after brightness, contrast, saturation and
/// inversion, in that order.
pub fn tone_value(rgb: [u8; 3], params: &AdjustmentParameters) -> u8 {
    let luminance = tone_luminance(rgb, params);
    luminance.clamp(0.0, 255.0).round_ties_even() as u8
}

/// Unclamped luminance, before quantization.
pub fn tone_luminance(rgb: [u8; 3], params: &AdjustmentParameters) -> f64 {
    let brightness = f64::from(params.brightness) / 100.0;
    let contrast = f64::from(params.contrast) / 100.0;
    let saturation = f64::from(params.saturation) / 100.0;

    let mut channels = rgb.map(|c| f64::from(c) * brightness);
    for c in &mut channels {
        *c = ((*c / 255.0 - 0.5) * contrast + 0.5) * 255.0;
    }

    let gray = luma(channels);
    for c in &mut channels {
        *c = gray + (*c - gray) * saturation;
    }

    let luminance = luma(channels);
    if params.invert {
        255.0 - luminance
    } else {
        luminance
    }
}

fn luma([r, g, b]: [f64; 3]) -> f64 {
    0.299 * r + 0.587 * g + 0.114 * b
}
