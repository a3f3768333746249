/// Sampling grid and output scale derived from the source size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
    pub tile_size: u32,
    pub columns: u32,
    pub rows: u32,
    /// Letter spacing in percent of the tile size.
    pub letter_spacing: f64,
}

impl GridSpec {
    /// Partitions a `width` x `height` image into whole tiles. A tile size of
    /// zero yields `None`; images smaller than one tile give an empty grid.
    pub fn derive(width: u32, height: u32, tile_size: u32, letter_spacing: f64) -> Option<Self> {
        if tile_size == 0 {
            return None;
        }

        Some(Self {
            tile_size,
            columns: width / tile_size,
            rows: height / tile_size,
            letter_spacing,
        })
    }

    pub fn effective_tile_size(&self) -> f64 {
        f64::from(self.tile_size) * (1.0 + self.letter_spacing / 100.0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns == 0 || self.rows == 0
    }

    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Output surface size, truncated to whole pixels.
    pub fn surface_size(&self) -> (u32, u32) {
        let tile = self.effective_tile_size();
        ((f64::from(self.columns) * tile) as u32, (f64::from(self.rows) * tile) as u32)
    }

    /// Top-left corner of a cell on the output surface, before jitter.
    pub fn cell_origin(&self, x: u32, y: u32) -> (f32, f32) {
        let tile = self.effective_tile_size();
        ((f64::from(x) * tile) as f32, (f64::from(y) * tile) as f32)
    }

    /// Cells in scan order: rows top to bottom, columns left to right.
    pub fn scan(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.columns).map(move |x| (x, y)))
    }
}
