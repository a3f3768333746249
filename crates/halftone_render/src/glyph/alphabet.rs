use crate::config::ConfigError;

/// Ordered, non-empty set of characters cycled over the grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

/// Named alphabets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphPreset {
    Circles,
    Squares,
    Lines,
    Numbers,
    Letters,
    Symbols,
    Dots,
}

impl GlyphPreset {
    pub const ALL: [GlyphPreset; 7] = [
        GlyphPreset::Circles,
        GlyphPreset::Squares,
        GlyphPreset::Lines,
        GlyphPreset::Numbers,
        GlyphPreset::Letters,
        GlyphPreset::Symbols,
        GlyphPreset::Dots,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GlyphPreset::Circles => "circles",
            GlyphPreset::Squares => "squares",
            GlyphPreset::Lines => "lines",
            GlyphPreset::Numbers => "numbers",
            GlyphPreset::Letters => "letters",
            GlyphPreset::Symbols => "symbols",
            GlyphPreset::Dots => "dots",
        }
    }

    pub fn glyphs(self) -> &'static str {
        match self {
            GlyphPreset::Circles => "●○◐◑◒◓◔◕",
            GlyphPreset::Squares => "█▓▒░",
            GlyphPreset::Lines => "|||//\\\\",
            GlyphPreset::Numbers => "0123456789",
            GlyphPreset::Letters => "abcdefghijklmnopqrstuvwxyz",
            GlyphPreset::Symbols => "@#$%&*+=~",
            GlyphPreset::Dots => "·•●⬤",
        }
    }
}

impl Alphabet {
    pub fn new(glyphs: &str) -> Result<Self, ConfigError> {
        let chars: Vec<char> = glyphs.chars().collect();
        if chars.is_empty() {
            return Err(ConfigError::EmptyAlphabet);
        }
        Ok(Self { chars })
    }

    pub fn preset(preset: GlyphPreset) -> Self {
        Self { chars: preset.glyphs().chars().collect() }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_at(&self, index: usize) -> char {
        self.chars[index % self.chars.len()]
    }
}
