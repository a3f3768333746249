use std::collections::HashMap;

use image::GrayImage;
use tiny_skia::{
    FillRule, IntSize, Mask, Paint, Path, Pixmap, PixmapPaint, Stroke, Transform,
};

use super::{color::Rgb, fonts::Typeface, surface::OutputSurface, transform::glyph_frame};
use crate::glyph::{cell::Placement, style::GlyphStyle};
use crate::image_pipeline::grid::GridSpec;
use crate::jitter::UniformSource;
use crate::HalftoneError;

/// Canvas default miter limit.
const MITER_LIMIT: f32 = 10.0;

/// Draws one pass of glyphs onto a freshly filled surface.
///
/// Fill color, opacity, stroke and shadow are fixed for the whole pass; the
/// position, rotation and transform are computed per glyph.
pub struct Compositor<'a> {
    style: &'a GlyphStyle,
    grid: &'a GridSpec,
    typeface: Typeface,
    surface: OutputSurface,
    outlines: HashMap<char, Option<Path>>,
}

impl<'a> Compositor<'a> {
    pub fn new(
        style: &'a GlyphStyle,
        grid: &'a GridSpec,
        typeface: Typeface,
    ) -> Result<Self, HalftoneError> {
        let (width, height) = grid.surface_size();
        let surface = OutputSurface::new(width, height, style.color_mode.background())?;
        Ok(Self { style, grid, typeface, surface, outlines: HashMap::new() })
    }

    /// Draws `ch` at `size` pixels into cell `(x, y)`, returning where it
    /// landed after jitter.
    pub fn draw_glyph(
        &mut self,
        x: u32,
        y: u32,
        ch: char,
        size: u32,
        rng: &mut dyn UniformSource,
    ) -> Placement {
        let style = self.style;
        let (mut anchor_x, mut anchor_y) = self.grid.cell_origin(x, y);
        if style.position_noise > 0.0 {
            anchor_x += (rng.symmetric() * f64::from(style.position_noise)) as f32;
            anchor_y += (rng.symmetric() * f64::from(style.position_noise)) as f32;
        }

        let mut rotation = style.rotation;
        if style.rotation_randomness > 0.0 {
            rotation += (rng.symmetric() * f64::from(style.rotation_randomness)) as f32;
        }

        let half_tile = (self.grid.effective_tile_size() / 2.0) as f32;
        let frame = glyph_frame(anchor_x, anchor_y, half_tile, style.skew_x, rotation);
        let placement = Placement { x: anchor_x, y: anchor_y, rotation };

        let Some(outline) = self.glyph_outline(ch, size) else {
            return placement;
        };

        if let Some(stroke_style) = style.stroke {
            let stroke = Stroke { width: stroke_style.width, miter_limit: MITER_LIMIT, ..Stroke::default() };
            if let Some(device) = outline.stroke(&stroke, 1.0).and_then(|p| p.transform(frame)) {
                self.paint(&device, stroke_style.color);
            }
        }

        if let Some(device) = outline.transform(frame) {
            self.paint(&device, style.color_mode.foreground());
        }

        placement
    }

    pub fn finish(self) -> OutputSurface {
        self.surface
    }

    /// Outline scaled to `size`, em box top-left at the origin.
    fn glyph_outline(&mut self, ch: char, size: u32) -> Option<Path> {
        if size == 0 {
            return None;
        }

        let typeface = &self.typeface;
        let unit = self.outlines.entry(ch).or_insert_with(|| typeface.unit_outline(ch));
        let scale = size as f32;
        unit.clone()?.transform(Transform::from_scale(scale, scale))
    }

    /// Fills a device-space shape, casting the pass shadow beneath it first.
    fn paint(&mut self, device: &Path, color: Rgb) {
        self.cast_shadow(device);

        let Some(pixmap) = self.surface.pixmap_mut() else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color.to_skia(self.style.opacity));
        paint.anti_alias = true;
        pixmap.fill_path(device, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn cast_shadow(&mut self, device: &Path) {
        let Some(shadow) = self.style.shadow else {
            return;
        };
        let opacity = self.style.opacity;
        let Some(pixmap) = self.surface.pixmap_mut() else {
            return;
        };

        let sigma = shadow.blur / 2.0;
        let margin = (sigma * 3.0).ceil() + 1.0;
        let bounds = device.bounds();
        let left = (bounds.left() - margin).floor();
        let top = (bounds.top() - margin).floor();
        let width = ((bounds.right() + margin).ceil() - left) as u32;
        let height = ((bounds.bottom() + margin).ceil() - top) as u32;

        let Some(mut mask) = Mask::new(width, height) else {
            return;
        };
        mask.fill_path(device, FillRule::Winding, true, Transform::from_translate(-left, -top));

        let Some(coverage) = GrayImage::from_raw(width, height, mask.data().to_vec()) else {
            return;
        };
        let blurred = image::imageops::blur(&coverage, sigma);
        let Some(layer) = tint(&blurred, shadow.color) else {
            return;
        };

        let paint = PixmapPaint { opacity, ..PixmapPaint::default() };
        pixmap.draw_pixmap(
            (left + shadow.offset_x).round() as i32,
            (top + shadow.offset_y).round() as i32,
            layer.as_ref(),
            &paint,
            Transform::identity(),
            None,
        );
    }
}

/// Premultiplied layer of `color` using `coverage` as alpha.
fn tint(coverage: &GrayImage, color: Rgb) -> Option<Pixmap> {
    let premultiply = |channel: u8, alpha: u8| {
        ((u16::from(channel) * u16::from(alpha) + 127) / 255) as u8
    };

    let mut data = Vec::with_capacity(coverage.as_raw().len() * 4);
    for &alpha in coverage.as_raw() {
        data.extend_from_slice(&[
            premultiply(color.r, alpha),
            premultiply(color.g, alpha),
            premultiply(color.b, alpha),
            alpha,
        ]);
    }

    let size = IntSize::from_wh(coverage.width(), coverage.height())?;
    Pixmap::from_vec(data, size)
}
