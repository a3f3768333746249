use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use halftone_render::{GlyphPreset, HalftoneConfig, HalftoneRenderer, Rgb, SourceImage};
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use walkdir::WalkDir;

const DEFAULT_OUTPUT: &str = "halftone-glyph-output.png";

#[derive(Parser, Debug)]
#[command(author, version, about = "Render images as halftone glyph composites")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render one image to a PNG file
    Render(RenderArgs),
    /// Render every image below a directory
    Batch(BatchArgs),
    /// List the built-in glyph presets
    Presets,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Input image path
    input: PathBuf,
    /// Output PNG path
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
    /// Also write the adjusted grayscale tone field to this path
    #[arg(long)]
    tone_preview: Option<PathBuf>,
    #[command(flatten)]
    fonts: FontArgs,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Parser, Debug)]
struct BatchArgs {
    /// Directory of input images
    input: PathBuf,
    /// Output directory for rendered PNG files
    #[arg(short, long)]
    out_dir: PathBuf,
    #[command(flatten)]
    fonts: FontArgs,
    #[command(flatten)]
    settings: RenderSettings,
}

#[derive(Args, Debug, Clone)]
struct FontArgs {
    /// Font file to register (repeatable)
    #[arg(long = "font")]
    font_files: Vec<PathBuf>,
    /// Directory searched recursively for font files
    #[arg(long)]
    font_dir: Option<PathBuf>,
}

/// Overrides applied on top of the defaults or the `--config` file.
#[derive(Args, Debug, Clone)]
struct RenderSettings {
    /// TOML file with generation parameters
    #[arg(long)]
    config: Option<PathBuf>,
    /// Glyph alphabet, cycled in scan order
    #[arg(long)]
    glyphs: Option<String>,
    /// Named glyph alphabet, replaces --glyphs
    #[arg(long, value_enum)]
    preset: Option<PresetChoice>,
    /// Tile size in pixels (5-100)
    #[arg(long)]
    tile_size: Option<u32>,
    /// Font family name
    #[arg(long)]
    font_name: Option<String>,
    /// Color scheme
    #[arg(long, value_enum)]
    mode: Option<ModeChoice>,
    /// Use --text-color and --background-color instead of --mode
    #[arg(long)]
    custom_colors: bool,
    /// Custom glyph color, enables custom colors
    #[arg(long)]
    text_color: Option<Rgb>,
    /// Custom background color, enables custom colors
    #[arg(long)]
    background_color: Option<Rgb>,
    /// Contrast in percent (0-200)
    #[arg(long)]
    contrast: Option<f32>,
    /// Brightness in percent (0-200)
    #[arg(long)]
    brightness: Option<f32>,
    /// Saturation in percent (0-200)
    #[arg(long)]
    saturation: Option<f32>,
    /// Invert the image before sampling
    #[arg(long)]
    invert: bool,
    /// Letter spacing in percent of the tile (0-100)
    #[arg(long)]
    letter_spacing: Option<f64>,
    /// Rotation in degrees (0-360)
    #[arg(long)]
    rotation: Option<f32>,
    /// Stroke width in pixels (0-5)
    #[arg(long)]
    text_stroke: Option<f32>,
    #[arg(long)]
    stroke_color: Option<Rgb>,
    /// Glyph opacity in percent (0-100)
    #[arg(long)]
    opacity: Option<f32>,
    /// Glyphs smaller than this are skipped (0-20)
    #[arg(long)]
    min_glyph_size: Option<f32>,
    /// Pick glyphs at random instead of in sequence
    #[arg(long)]
    randomize_glyphs: bool,
    /// Size jitter in percent (0-100)
    #[arg(long)]
    size_randomness: Option<f32>,
    /// Brightness threshold in percent (0-100)
    #[arg(long)]
    threshold: Option<f32>,
    /// Shadow blur in pixels (0-20), enables the shadow
    #[arg(long)]
    shadow_blur: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    shadow_offset_x: Option<f32>,
    #[arg(long, allow_hyphen_values = true)]
    shadow_offset_y: Option<f32>,
    #[arg(long)]
    shadow_color: Option<Rgb>,
    /// Horizontal skew in degrees (-45-45)
    #[arg(long, allow_hyphen_values = true)]
    skew_x: Option<f32>,
    /// Rotation jitter in degrees (0-180)
    #[arg(long)]
    rotation_randomness: Option<f32>,
    /// Position jitter in pixels (0-20)
    #[arg(long)]
    position_noise: Option<f32>,
    /// Seed for reproducible jitter
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum PresetChoice {
    Circles,
    Squares,
    Lines,
    Numbers,
    Letters,
    Symbols,
    Dots,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ModeChoice {
    WhiteOnBlack,
    BlackOnWhite,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => render(args),
        Commands::Batch(args) => batch(args),
        Commands::Presets => {
            presets();
            Ok(())
        },
    }
}

fn render(args: RenderArgs) -> Result<()> {
    let config = args.settings.to_config()?;
    let renderer = HalftoneRenderer::new(args.fonts.load());

    let output = renderer
        .render_path(&args.input, &config)
        .with_context(|| format!("failed to render {:?}", args.input))?;

    if let Some(path) = &args.tone_preview {
        output
            .tone
            .to_rgba()
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("failed to write tone preview {:?}", path))?;
    }

    output
        .surface
        .save_png(&args.output)
        .with_context(|| format!("failed to write {:?}", args.output))?;

    info!(
        "wrote {:?} ({}x{}, {} glyphs)",
        args.output,
        output.surface.width(),
        output.surface.height(),
        output.drawn().count()
    );
    Ok(())
}

fn batch(args: BatchArgs) -> Result<()> {
    let config = args.settings.to_config()?;
    let renderer = HalftoneRenderer::new(args.fonts.load());
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("failed to create output directory {:?}", args.out_dir))?;

    let inputs = collect_images(&args.input)?;
    let progress = ProgressBar::new(inputs.len() as u64);
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} images",
        )?
        .progress_chars("=> "),
    );

    let mut failed = 0;
    for input in &inputs {
        progress.inc(1);
        let image = match SourceImage::open(input) {
            Ok(image) => image,
            Err(err) => {
                progress.suspend(|| warn!("skipping {}: {err}", input.display()));
                failed += 1;
                continue;
            },
        };

        let output = renderer
            .render_image(&image, &config)
            .with_context(|| format!("failed to render {:?}", input))?;
        if output.surface.is_empty() {
            progress.suspend(|| warn!("skipping {}: smaller than one tile", input.display()));
            failed += 1;
            continue;
        }

        let out_path = output_path(&args.input, input, &args.out_dir);
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {:?}", parent))?;
        }
        output.surface.save_png(&out_path).with_context(|| format!("failed to write {:?}", out_path))?;
    }

    progress.finish_with_message(format!(
        "{} of {} images written to {:?}",
        inputs.len() - failed,
        inputs.len(),
        args.out_dir
    ));
    Ok(())
}

fn presets() {
    for preset in GlyphPreset::ALL {
        println!("{:<8} {}", preset.name(), preset.glyphs());
    }
}

fn collect_images(path: &Path) -> Result<Vec<PathBuf>> {
    let mut entries: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| ImageFormat::from_path(entry.path()).is_ok())
        .map(|entry| entry.path().to_path_buf())
        .collect();
    entries.sort();
    if entries.is_empty() {
        anyhow::bail!("no image files found in {:?}", path);
    }
    Ok(entries)
}

/// Mirrors `input`'s position below `root` into `out_dir`, as a PNG.
fn output_path(root: &Path, input: &Path, out_dir: &Path) -> PathBuf {
    let relative = input.strip_prefix(root).unwrap_or(input);
    let relative = match relative.file_name() {
        Some(_) => relative.to_path_buf(),
        None => PathBuf::from("output"),
    };
    out_dir.join(relative).with_extension("png")
}

impl FontArgs {
    fn load(&self) -> halftone_render::FontBook {
        let mut fonts = halftone_render::FontBook::new();
        if let Some(dir) = &self.font_dir {
            let count = fonts.register_dir(dir);
            info!("registered {count} fonts from {}", dir.display());
        }
        for path in &self.font_files {
            if let Err(err) = fonts.register_file(path) {
                warn!("{err}");
            }
        }
        fonts
    }
}

impl RenderSettings {
    fn to_config(&self) -> Result<HalftoneConfig> {
        let mut config = match &self.config {
            Some(path) => HalftoneConfig::load(path)
                .with_context(|| format!("failed to load configuration {:?}", path))?,
            None => HalftoneConfig::default(),
        };

        if let Some(glyphs) = &self.glyphs {
            config.glyphs = glyphs.clone();
        }
        if let Some(preset) = self.preset {
            config.glyphs = preset.to_preset().glyphs().to_string();
        }
        if let Some(font_name) = &self.font_name {
            config.font_name = font_name.clone();
        }
        if let Some(mode) = self.mode {
            config.white_on_black = matches!(mode, ModeChoice::WhiteOnBlack);
        }
        if let Some(color) = self.text_color {
            config.text_color = color;
            config.custom_colors = true;
        }
        if let Some(color) = self.background_color {
            config.background_color = color;
            config.custom_colors = true;
        }
        if let Some(color) = self.stroke_color {
            config.stroke_color = color;
        }
        if let Some(color) = self.shadow_color {
            config.shadow_color = color;
        }
        config.custom_colors |= self.custom_colors;
        config.invert_image |= self.invert;
        config.randomize_glyphs |= self.randomize_glyphs;
        config.tile_size = self.tile_size.unwrap_or(config.tile_size);
        config.letter_spacing = self.letter_spacing.unwrap_or(config.letter_spacing);
        config.seed = self.seed.or(config.seed);

        let overrides = [
            (&mut config.contrast, self.contrast),
            (&mut config.brightness, self.brightness),
            (&mut config.saturation, self.saturation),
            (&mut config.rotation, self.rotation),
            (&mut config.text_stroke, self.text_stroke),
            (&mut config.opacity, self.opacity),
            (&mut config.min_glyph_size, self.min_glyph_size),
            (&mut config.size_randomness, self.size_randomness),
            (&mut config.threshold, self.threshold),
            (&mut config.shadow_blur, self.shadow_blur),
            (&mut config.shadow_offset_x, self.shadow_offset_x),
            (&mut config.shadow_offset_y, self.shadow_offset_y),
            (&mut config.skew_x, self.skew_x),
            (&mut config.rotation_randomness, self.rotation_randomness),
            (&mut config.position_noise, self.position_noise),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }

        config.validate().context("invalid render settings")?;
        Ok(config)
    }
}

impl PresetChoice {
    fn to_preset(self) -> GlyphPreset {
        match self {
            PresetChoice::Circles => GlyphPreset::Circles,
            PresetChoice::Squares => GlyphPreset::Squares,
            PresetChoice::Lines => GlyphPreset::Lines,
            PresetChoice::Numbers => GlyphPreset::Numbers,
            PresetChoice::Letters => GlyphPreset::Letters,
            PresetChoice::Symbols => GlyphPreset::Symbols,
            PresetChoice::Dots => GlyphPreset::Dots,
        }
    }
}
