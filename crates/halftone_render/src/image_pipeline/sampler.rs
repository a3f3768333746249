use super::{adjust::ToneField, grid::GridSpec};

/// Pixel read for cell `(x, y)`.
///
/// Tile centers are stretched by `image / (cells * tile)` so that the samples
/// spread over the whole image rather than only the tiled sub-region.
pub fn sample_point(grid: &GridSpec, width: u32, height: u32, x: u32, y: u32) -> (u32, u32) {
    let tile = f64::from(grid.tile_size);
    let scale_x = f64::from(width) / (f64::from(grid.columns) * tile);
    let scale_y = f64::from(height) / (f64::from(grid.rows) * tile);

    let sample_x = ((f64::from(x) * tile + tile / 2.0) * scale_x).floor() as u32;
    let sample_y = ((f64::from(y) * tile + tile / 2.0) * scale_y).floor() as u32;

    (sample_x.min(width.saturating_sub(1)), sample_y.min(height.saturating_sub(1)))
}

/// One point sample per cell, in scan order.
pub fn sample_grid(field: &ToneField, grid: &GridSpec) -> Vec<u8> {
    let mut samples = Vec::with_capacity(grid.cell_count());
    for (x, y) in grid.scan() {
        let (sx, sy) = sample_point(grid, field.width(), field.height(), x, y);
        samples.push(field.luminance(sx, sy));
    }
    samples
}
