use super::alphabet::Alphabet;
use crate::render::color::{ColorMode, Rgb};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub width: f32,
    pub color: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
    pub color: Rgb,
}

/// Everything that decides which glyph a cell gets and how it is drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphStyle {
    pub alphabet: Alphabet,
    pub font_name: String,
    pub color_mode: ColorMode,
    /// Global opacity in `[0, 1]`.
    pub opacity: f32,
    pub stroke: Option<StrokeStyle>,
    pub shadow: Option<ShadowStyle>,
    /// Horizontal shear in degrees.
    pub skew_x: f32,
    /// Base rotation in degrees.
    pub rotation: f32,
    pub rotation_randomness: f32,
    pub position_noise: f32,
    /// Size jitter in percent.
    pub size_randomness: f32,
    pub min_glyph_size: f32,
    /// Brightness threshold in percent.
    pub threshold: f32,
    pub randomize_glyphs: bool,
}

impl GlyphStyle {
    /// Plain white-on-black style with no jitter or effects.
    pub fn new(alphabet: Alphabet) -> Self {
        Self {
            alphabet,
            font_name: String::from("Arial"),
            color_mode: ColorMode::WhiteOnBlack,
            opacity: 1.0,
            stroke: None,
            shadow: None,
            skew_x: 0.0,
            rotation: 0.0,
            rotation_randomness: 0.0,
            position_noise: 0.0,
            size_randomness: 0.0,
            min_glyph_size: 0.0,
            threshold: 0.0,
            randomize_glyphs: false,
        }
    }
}
