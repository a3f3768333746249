use tiny_skia::Transform;

/// Maps glyph-local coordinates (em box top-left at the origin) onto the
/// surface.
///
/// The glyph is anchored at `(x, y)`. Skew and rotation pivot around
/// `(x + half_tile, y + half_tile)`, so the anchor itself moves while the
/// cell center stays put. Each glyph gets its own matrix; nothing carries over
/// between cells.
pub fn glyph_frame(x: f32, y: f32, half_tile: f32, skew_x: f32, rotation: f32) -> Transform {
    let (pivot_x, pivot_y) = (x + half_tile, y + half_tile);

    let mut frame = Transform::from_translate(pivot_x, pivot_y);
    if skew_x != 0.0 {
        frame = frame.pre_concat(Transform::from_skew(skew_x.to_radians().tan(), 0.0));
    }
    if rotation != 0.0 {
        frame = frame.pre_concat(Transform::from_rotate(rotation));
    }

    frame.pre_translate(-pivot_x, -pivot_y).pre_translate(x, y)
}
