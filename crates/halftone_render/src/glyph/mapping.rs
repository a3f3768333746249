use super::{
    cell::{GlyphDecision, SkipReason},
    style::GlyphStyle,
};
use crate::jitter::UniformSource;

/// Turns brightness samples into draw/skip decisions.
///
/// Created fresh for every generation pass: in sequential mode the position
/// counter advances once per visited cell, skipped or not, so the i-th cell in
/// scan order always receives `alphabet[i % len]`.
pub struct GlyphMapper<'a> {
    style: &'a GlyphStyle,
    tile_size: u32,
    position: usize,
}

impl<'a> GlyphMapper<'a> {
    pub fn new(style: &'a GlyphStyle, tile_size: u32) -> Self {
        Self { style, tile_size, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn map_sample(&mut self, sample: u8, rng: &mut dyn UniformSource) -> GlyphDecision {
        let brightness_percent = f32::from(sample) / 255.0 * 100.0;
        if brightness_percent < self.style.threshold {
            return self.skip(SkipReason::Threshold);
        }

        let mut size = self.base_size(sample);
        if self.style.size_randomness > 0.0 {
            let factor = 1.0 + rng.symmetric() * f64::from(self.style.size_randomness) / 100.0;
            size = round_half_up(size * factor);
        }
        let size = size.clamp(0.0, f64::from(self.tile_size));

        if size < f64::from(self.style.min_glyph_size) {
            return self.skip(SkipReason::TooSmall);
        }

        let ch = if self.style.randomize_glyphs {
            let alphabet = &self.style.alphabet;
            alphabet.char_at(rng.index(alphabet.len()))
        } else {
            let ch = self.style.alphabet.char_at(self.position);
            self.advance();
            ch
        };

        GlyphDecision::Draw { ch, size: size as u32 }
    }

    fn base_size(&self, sample: u8) -> f64 {
        let tile = f64::from(self.tile_size);
        let sample = f64::from(sample);
        if self.style.color_mode.brighter_is_larger() {
            round_half_up(sample / 255.0 * tile)
        } else {
            round_half_up((255.0 - sample) / 255.0 * tile)
        }
    }

    fn skip(&mut self, reason: SkipReason) -> GlyphDecision {
        if !self.style.randomize_glyphs {
            self.advance();
        }
        GlyphDecision::Skip(reason)
    }

    fn advance(&mut self) {
        self.position = (self.position + 1) % self.style.alphabet.len();
    }
}

/// Rounds halves toward positive infinity.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
