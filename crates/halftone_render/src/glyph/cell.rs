/// Why a cell produced no glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// Brightness below the threshold.
    Threshold,
    /// Mapped size below the minimum glyph size.
    TooSmall,
}

/// Outcome of mapping one brightness sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlyphDecision {
    Draw { ch: char, size: u32 },
    Skip(SkipReason),
}

impl GlyphDecision {
    pub fn is_drawn(&self) -> bool {
        matches!(self, GlyphDecision::Draw { .. })
    }

    pub fn glyph(&self) -> Option<(char, u32)> {
        match *self {
            GlyphDecision::Draw { ch, size } => Some((ch, size)),
            GlyphDecision::Skip(_) => None,
        }
    }
}

/// Jittered anchor and total rotation a drawn glyph ended up with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub x: u32,
    pub y: u32,
    pub sample: u8,
    pub decision: GlyphDecision,
    /// Set for drawn cells only.
    pub placement: Option<Placement>,
}
