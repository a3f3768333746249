mod config;
mod glyph;
mod image_pipeline;
mod jitter;
mod render;

use std::path::Path;

use log::debug;

pub use config::{ConfigError, HalftoneConfig};
pub use glyph::{
    alphabet::{Alphabet, GlyphPreset},
    cell::{Cell, GlyphDecision, Placement, SkipReason},
    mapping::GlyphMapper,
    style::{GlyphStyle, ShadowStyle, StrokeStyle},
};
pub use image_pipeline::{
    adjust::{tone_field, tone_value, AdjustmentParameters, ToneField},
    grid::GridSpec,
    loader::SourceImage,
    sampler::{sample_grid, sample_point},
};
pub use jitter::{RandomSource, SequenceSource, UniformSource};
pub use render::{
    color::{ColorMode, Rgb},
    compositor::Compositor,
    fonts::{font_name_from_path, Font, FontBook, Typeface},
    surface::OutputSurface,
    transform::glyph_frame,
};

#[derive(Debug, thiserror::Error)]
pub enum HalftoneError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("failed to load image: {0}")]
    ImageLoad(#[from] image::ImageError),
    #[error("failed to register font {name:?}: {reason}")]
    FontRegistration { name: String, reason: String },
    #[error("failed to export surface: {0}")]
    Export(#[source] image::ImageError),
    #[error("cannot export an empty surface")]
    EmptySurface,
    #[error("cannot allocate a {width}x{height} surface")]
    SurfaceAllocation { width: u32, height: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct RenderOutput {
    pub surface: OutputSurface,
    pub grid: GridSpec,
    /// Every cell in scan order, drawn or skipped.
    pub cells: Vec<Cell>,
    pub tone: ToneField,
}

impl RenderOutput {
    pub fn drawn(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|cell| cell.decision.is_drawn())
    }
}

/// Runs tone adjustment, sampling, glyph mapping and compositing in one
/// synchronous pass per call.
#[derive(Debug, Default)]
pub struct HalftoneRenderer {
    fonts: FontBook,
}

impl HalftoneRenderer {
    pub fn new(fonts: FontBook) -> Self {
        Self { fonts }
    }

    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    pub fn fonts_mut(&mut self) -> &mut FontBook {
        &mut self.fonts
    }

    pub fn render_path<P: AsRef<Path>>(
        &self,
        path: P,
        config: &HalftoneConfig,
    ) -> Result<RenderOutput, HalftoneError> {
        config.validate()?;
        let image = SourceImage::open(path)?;
        self.render_image(&image, config)
    }

    /// Renders with jitter drawn from `config.seed`, or from entropy if unset.
    pub fn render_image(
        &self,
        image: &SourceImage,
        config: &HalftoneConfig,
    ) -> Result<RenderOutput, HalftoneError> {
        let mut rng = RandomSource::from_seed_option(config.seed);
        self.render_with(image, config, &mut rng)
    }

    pub fn render_with(
        &self,
        image: &SourceImage,
        config: &HalftoneConfig,
        rng: &mut dyn UniformSource,
    ) -> Result<RenderOutput, HalftoneError> {
        let style = config.glyph_style()?;

        let (width, height) = image.dimensions();
        let grid = GridSpec::derive(width, height, config.tile_size, config.letter_spacing)
            .ok_or(ConfigError::OutOfRange {
                field: "tile_size",
                value: f64::from(config.tile_size),
                min: 5.0,
                max: 100.0,
            })?;

        let tone = tone_field(image.pixels(), &config.adjustments());
        let samples = sample_grid(&tone, &grid);

        let mut mapper = GlyphMapper::new(&style, grid.tile_size);
        let mut compositor = Compositor::new(&style, &grid, self.fonts.resolve(&style.font_name))?;

        let mut cells = Vec::with_capacity(samples.len());
        for ((x, y), sample) in grid.scan().zip(samples) {
            let decision = mapper.map_sample(sample, rng);
            let placement =
                decision.glyph().map(|(ch, size)| compositor.draw_glyph(x, y, ch, size, rng));
            cells.push(Cell { x, y, sample, decision, placement });
        }

        let surface = compositor.finish();
        debug!(
            "rendered {}x{} grid onto {}x{} surface, {} of {} cells drawn",
            grid.columns,
            grid.rows,
            surface.width(),
            surface.height(),
            cells.iter().filter(|cell| cell.decision.is_drawn()).count(),
            cells.len(),
        );

        Ok(RenderOutput { surface, grid, cells, tone })
    }
}
