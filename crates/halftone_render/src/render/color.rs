use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Opaque RGB color written as `#rrggbb`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Skia color with the given opacity in `[0, 1]`.
    pub fn to_skia(self, opacity: f32) -> tiny_skia::Color {
        let mut color = tiny_skia::Color::from_rgba8(self.r, self.g, self.b, 255);
        color.apply_opacity(opacity);
        color
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidColor { value: s.to_string() };
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |range| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
        Ok(Rgb::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Foreground/background scheme. Also decides which end of the tone range
/// produces the largest glyphs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorMode {
    WhiteOnBlack,
    BlackOnWhite,
    Custom { text: Rgb, background: Rgb },
}

impl ColorMode {
    pub fn foreground(self) -> Rgb {
        match self {
            ColorMode::WhiteOnBlack => Rgb::WHITE,
            ColorMode::BlackOnWhite => Rgb::BLACK,
            ColorMode::Custom { text, .. } => text,
        }
    }

    pub fn background(self) -> Rgb {
        match self {
            ColorMode::WhiteOnBlack => Rgb::BLACK,
            ColorMode::BlackOnWhite => Rgb::WHITE,
            ColorMode::Custom { background, .. } => background,
        }
    }

    /// Bright samples draw large glyphs unless drawing dark ink on white.
    pub fn brighter_is_larger(self) -> bool {
        !matches!(self, ColorMode::BlackOnWhite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_colors() {
        assert_eq!("#ff8000".parse::<Rgb>().unwrap(), Rgb::new(255, 128, 0));
        assert_eq!("#0A0b0C".parse::<Rgb>().unwrap(), Rgb::new(10, 11, 12));
        assert_eq!(Rgb::new(1, 2, 255).to_string(), "#0102ff");
    }

    #[test]
    fn rejects_malformed_colors() {
        for value in ["ff8000", "#fff", "#ff80001", "#gg0000", "", "#ffé000"] {
            assert!(value.parse::<Rgb>().is_err(), "{value:?}");
        }
    }

    #[test]
    fn mode_defaults() {
        assert_eq!(ColorMode::WhiteOnBlack.foreground(), Rgb::WHITE);
        assert_eq!(ColorMode::WhiteOnBlack.background(), Rgb::BLACK);
        assert_eq!(ColorMode::BlackOnWhite.foreground(), Rgb::BLACK);
        assert_eq!(ColorMode::BlackOnWhite.background(), Rgb::WHITE);
        assert!(!ColorMode::BlackOnWhite.brighter_is_larger());

        let custom = ColorMode::Custom { text: Rgb::BLACK, background: Rgb::WHITE };
        assert_eq!(custom.foreground(), Rgb::BLACK);
        assert!(custom.brighter_is_larger());
    }
}
