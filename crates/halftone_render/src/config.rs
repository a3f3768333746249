use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::glyph::alphabet::Alphabet;
use crate::glyph::style::{GlyphStyle, ShadowStyle, StrokeStyle};
use crate::image_pipeline::adjust::AdjustmentParameters;
use crate::render::color::{ColorMode, Rgb};
use crate::HalftoneError;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("glyph alphabet must contain at least one character")]
    EmptyAlphabet,
    #[error("{field} = {value} is outside [{min}, {max}]")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64 },
    #[error("invalid color {value:?}, expected #rrggbb")]
    InvalidColor { value: String },
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Every user-facing generation parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HalftoneConfig {
    pub glyphs: String,
    pub tile_size: u32,
    pub font_name: String,
    /// Ignored when `custom_colors` is set.
    pub white_on_black: bool,
    pub custom_colors: bool,
    pub text_color: Rgb,
    pub background_color: Rgb,
    pub contrast: f32,
    pub brightness: f32,
    pub saturation: f32,
    pub invert_image: bool,
    pub letter_spacing: f64,
    pub rotation: f32,
    pub text_stroke: f32,
    pub stroke_color: Rgb,
    pub opacity: f32,
    pub min_glyph_size: f32,
    pub randomize_glyphs: bool,
    pub size_randomness: f32,
    pub threshold: f32,
    pub shadow_blur: f32,
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
    pub shadow_color: Rgb,
    pub skew_x: f32,
    pub rotation_randomness: f32,
    pub position_noise: f32,
    /// Seed for jitter and random glyph choice. Unseeded runs differ.
    pub seed: Option<u64>,
}

impl Default for HalftoneConfig {
    fn default() -> Self {
        Self {
            glyphs: String::from("inserthereyourtext"),
            tile_size: 20,
            font_name: String::from("Arial"),
            white_on_black: true,
            custom_colors: false,
            text_color: Rgb::WHITE,
            background_color: Rgb::BLACK,
            contrast: 100.0,
            brightness: 100.0,
            saturation: 0.0,
            invert_image: false,
            letter_spacing: 0.0,
            rotation: 0.0,
            text_stroke: 0.0,
            stroke_color: Rgb::BLACK,
            opacity: 100.0,
            min_glyph_size: 0.0,
            randomize_glyphs: false,
            size_randomness: 0.0,
            threshold: 0.0,
            shadow_blur: 0.0,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_color: Rgb::BLACK,
            skew_x: 0.0,
            rotation_randomness: 0.0,
            position_noise: 0.0,
            seed: None,
        }
    }
}

impl HalftoneConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, HalftoneError> {
        let source = fs::read_to_string(path)?;
        Ok(Self::from_toml_str(&source)?)
    }

    /// Checks the alphabet and every numeric range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.glyphs.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }

        check("tile_size", f64::from(self.tile_size), 5.0, 100.0)?;
        check("contrast", self.contrast, 0.0, 200.0)?;
        check("brightness", self.brightness, 0.0, 200.0)?;
        check("saturation", self.saturation, 0.0, 200.0)?;
        check("letter_spacing", self.letter_spacing, 0.0, 100.0)?;
        check("rotation", self.rotation, 0.0, 360.0)?;
        check("text_stroke", self.text_stroke, 0.0, 5.0)?;
        check("opacity", self.opacity, 0.0, 100.0)?;
        check("min_glyph_size", self.min_glyph_size, 0.0, 20.0)?;
        check("size_randomness", self.size_randomness, 0.0, 100.0)?;
        check("threshold", self.threshold, 0.0, 100.0)?;
        check("shadow_blur", self.shadow_blur, 0.0, 20.0)?;
        check("shadow_offset_x", self.shadow_offset_x, -20.0, 20.0)?;
        check("shadow_offset_y", self.shadow_offset_y, -20.0, 20.0)?;
        check("skew_x", self.skew_x, -45.0, 45.0)?;
        check("rotation_randomness", self.rotation_randomness, 0.0, 180.0)?;
        check("position_noise", self.position_noise, 0.0, 20.0)?;
        Ok(())
    }

    pub fn adjustments(&self) -> AdjustmentParameters {
        AdjustmentParameters {
            brightness: self.brightness,
            contrast: self.contrast,
            saturation: self.saturation,
            invert: self.invert_image,
        }
    }

    pub fn color_mode(&self) -> ColorMode {
        if self.custom_colors {
            ColorMode::Custom { text: self.text_color, background: self.background_color }
        } else if self.white_on_black {
            ColorMode::WhiteOnBlack
        } else {
            ColorMode::BlackOnWhite
        }
    }

    /// Validates and builds the typed glyph style.
    pub fn glyph_style(&self) -> Result<GlyphStyle, ConfigError> {
        self.validate()?;

        let stroke = (self.text_stroke > 0.0)
            .then(|| StrokeStyle { width: self.text_stroke, color: self.stroke_color });
        let shadow = (self.shadow_blur > 0.0).then(|| ShadowStyle {
            blur: self.shadow_blur,
            offset_x: self.shadow_offset_x,
            offset_y: self.shadow_offset_y,
            color: self.shadow_color,
        });

        Ok(GlyphStyle {
            alphabet: Alphabet::new(&self.glyphs)?,
            font_name: self.font_name.clone(),
            color_mode: self.color_mode(),
            opacity: self.opacity / 100.0,
            stroke,
            shadow,
            skew_x: self.skew_x,
            rotation: self.rotation,
            rotation_randomness: self.rotation_randomness,
            position_noise: self.position_noise,
            size_randomness: self.size_randomness,
            min_glyph_size: self.min_glyph_size,
            threshold: self.threshold,
            randomize_glyphs: self.randomize_glyphs,
        })
    }
}

fn check<T: Into<f64>>(field: &'static str, value: T, min: f64, max: f64) -> Result<(), ConfigError> {
    let value = value.into();
    if value.is_nan() || value < min || value > max {
        return Err(ConfigError::OutOfRange { field, value, min, max });
    }
    Ok(())
}
