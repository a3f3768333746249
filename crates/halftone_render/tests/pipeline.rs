use halftone_render::{
    ConfigError, FontBook, GlyphDecision, HalftoneConfig, HalftoneError, HalftoneRenderer, Rgb,
    SequenceSource, SkipReason, SourceImage,
};
use image::{Rgba, RgbaImage};

fn gradient_image(width: u32, height: u32) -> SourceImage {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        let v = ((x * 255) / width.max(1)) as u8;
        let w = ((y * 97) % 256) as u8;
        Rgba([v, w, v / 2, 255])
    });
    SourceImage::from_rgba(image)
}

fn two_cell_image(left: u8, right: u8) -> SourceImage {
    let image = RgbaImage::from_fn(20, 10, |x, _| {
        let v = if x < 10 { left } else { right };
        Rgba([v, v, v, 255])
    });
    SourceImage::from_rgba(image)
}

const DEJAVU_SANS: &[u8] = include_bytes!("fixtures/DejaVuSans.ttf");

fn dejavu_renderer() -> HalftoneRenderer {
    let mut fonts = FontBook::new();
    fonts.register("DejaVuSans", DEJAVU_SANS.to_vec()).unwrap();
    HalftoneRenderer::new(fonts)
}

/// Bounding box `(min_x, min_y, max_x, max_y)` of non-background pixels.
fn ink_bounds(surface: &halftone_render::OutputSurface) -> Option<(u32, u32, u32, u32)> {
    let image = surface.to_rgba_image();
    image
        .enumerate_pixels()
        .filter(|(_, _, pixel)| pixel.0 != [0, 0, 0, 255])
        .fold(None, |bounds, (x, y, _)| match bounds {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

fn config(glyphs: &str, tile_size: u32) -> HalftoneConfig {
    HalftoneConfig { glyphs: glyphs.to_string(), tile_size, saturation: 100.0, ..Default::default() }
}

#[test]
fn deterministic_settings_give_identical_surfaces() {
    let renderer = HalftoneRenderer::default();
    let image = gradient_image(97, 61);
    let config = HalftoneConfig {
        rotation: 30.0,
        skew_x: -12.0,
        text_stroke: 1.0,
        shadow_blur: 3.0,
        shadow_offset_x: 2.0,
        letter_spacing: 25.0,
        ..config("abc", 7)
    };

    let first = renderer.render_image(&image, &config).unwrap();
    let second = renderer.render_image(&image, &config).unwrap();
    assert_eq!(first.surface.to_rgba_image(), second.surface.to_rgba_image());
    assert_eq!(first.surface.encode_png().unwrap(), second.surface.encode_png().unwrap());
}

#[test]
fn seeded_jitter_is_reproducible() {
    let renderer = HalftoneRenderer::default();
    let image = gradient_image(60, 40);
    let config = HalftoneConfig {
        randomize_glyphs: true,
        size_randomness: 40.0,
        rotation_randomness: 90.0,
        position_noise: 5.0,
        seed: Some(1234),
        ..config("xyz", 10)
    };

    let first = renderer.render_image(&image, &config).unwrap();
    let second = renderer.render_image(&image, &config).unwrap();
    assert_eq!(first.cells, second.cells);
    assert_eq!(first.surface.to_rgba_image(), second.surface.to_rgba_image());
}

#[test]
fn output_dimensions_follow_grid() {
    let renderer = HalftoneRenderer::default();
    let image = gradient_image(107, 49);
    let config = HalftoneConfig { letter_spacing: 50.0, ..config("#", 10) };
    let output = renderer.render_image(&image, &config).unwrap();
    assert_eq!((output.grid.columns, output.grid.rows), (10, 4));
    assert_eq!(output.surface.dimensions(), (150, 60));
    assert_eq!(output.cells.len(), 40);
    assert_eq!(output.tone.width(), 107);
}

#[test]
fn bright_and_black_cells_both_draw_in_sequence() {
    let renderer = HalftoneRenderer::default();
    let output = renderer.render_image(&two_cell_image(255, 0), &config("AB", 10)).unwrap();

    let decisions: Vec<_> = output.cells.iter().map(|cell| cell.decision).collect();
    assert_eq!(decisions, vec![
        GlyphDecision::Draw { ch: 'A', size: 10 },
        GlyphDecision::Draw { ch: 'B', size: 0 },
    ]);
    assert_eq!(output.cells[0].sample, 255);
    assert_eq!(output.cells[1].sample, 0);

    // The fallback block for 'A' is visible; the zero-size 'B' leaves no ink.
    assert_eq!(output.surface.pixel(5, 5), Some([255, 255, 255, 255]));
    assert_eq!(output.surface.pixel(15, 5), Some([0, 0, 0, 255]));
}

#[test]
fn thresholded_cell_still_consumes_a_character() {
    let renderer = HalftoneRenderer::default();
    let image = SourceImage::from_rgba(RgbaImage::from_fn(30, 10, |x, _| {
        let v = if x < 10 { 102 } else { 255 };
        Rgba([v, v, v, 255])
    }));
    let config = HalftoneConfig { threshold: 50.0, ..config("ABC", 10) };
    let output = renderer.render_image(&image, &config).unwrap();

    assert_eq!(output.cells[0].decision, GlyphDecision::Skip(SkipReason::Threshold));
    assert!(output.cells[0].placement.is_none());
    assert_eq!(output.cells[1].decision.glyph(), Some(('B', 10)));
    assert_eq!(output.cells[2].decision.glyph(), Some(('C', 10)));
    assert_eq!(output.drawn().count(), 2);
}

#[test]
fn sequential_assignment_matches_scan_index() {
    let renderer = HalftoneRenderer::default();
    let image = gradient_image(90, 50);
    let config = HalftoneConfig { threshold: 30.0, min_glyph_size: 4.0, ..config("hello", 10) };
    let output = renderer.render_image(&image, &config).unwrap();

    let alphabet: Vec<char> = "hello".chars().collect();
    for (i, cell) in output.cells.iter().enumerate() {
        if let Some((ch, _)) = cell.decision.glyph() {
            assert_eq!(ch, alphabet[i % alphabet.len()], "cell {i}");
        }
    }
}

#[test]
fn injected_source_drives_jitter() {
    let renderer = HalftoneRenderer::default();
    let config = HalftoneConfig { position_noise: 10.0, ..config("A", 10) };
    let mut rng = SequenceSource::new(vec![1.0, 0.5]);
    let output = renderer.render_with(&two_cell_image(255, 255), &config, &mut rng).unwrap();

    let placements: Vec<_> = output.cells.iter().map(|c| c.placement.unwrap()).collect();
    assert_eq!((placements[0].x, placements[0].y), (10.0, 0.0));
    assert_eq!((placements[1].x, placements[1].y), (20.0, 0.0));
    assert_eq!(rng.draws(), 4);
}

#[test]
fn image_smaller_than_a_tile_gives_empty_surface() {
    let renderer = HalftoneRenderer::default();
    let output = renderer.render_image(&gradient_image(8, 30), &config("A", 10)).unwrap();
    assert!(output.surface.is_empty());
    assert_eq!(output.surface.dimensions(), (0, 30));
    assert!(output.cells.is_empty());
    assert!(matches!(output.surface.encode_png(), Err(HalftoneError::EmptySurface)));
}

#[test]
fn invalid_configuration_is_rejected_before_rendering() {
    let renderer = HalftoneRenderer::default();
    let image = gradient_image(20, 20);

    let err = renderer.render_image(&image, &config("", 10)).unwrap_err();
    assert!(matches!(err, HalftoneError::InvalidConfiguration(ConfigError::EmptyAlphabet)));

    let err = renderer.render_image(&image, &config("A", 101)).unwrap_err();
    assert!(matches!(err, HalftoneError::InvalidConfiguration(ConfigError::OutOfRange { .. })));
}

#[test]
fn invalid_configuration_wins_over_missing_image() {
    let renderer = HalftoneRenderer::default();
    let err = renderer.render_path("/nonexistent/input.png", &config("", 10)).unwrap_err();
    assert!(matches!(err, HalftoneError::InvalidConfiguration(_)));

    let err = renderer.render_path("/nonexistent/input.png", &config("A", 10)).unwrap_err();
    assert!(matches!(err, HalftoneError::ImageLoad(_)));
}

#[test]
fn black_on_white_draws_dark_regions_large() {
    let renderer = HalftoneRenderer::default();
    let config = HalftoneConfig { white_on_black: false, ..config("A", 10) };
    let output = renderer.render_image(&two_cell_image(0, 255), &config).unwrap();

    assert_eq!(output.cells[0].decision.glyph(), Some(('A', 10)));
    assert_eq!(output.cells[1].decision.glyph(), Some(('A', 0)));
    assert_eq!(output.surface.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(output.surface.pixel(15, 5), Some([255, 255, 255, 255]));
}

#[test]
fn custom_colors_paint_both_layers() {
    let renderer = HalftoneRenderer::default();
    let config = HalftoneConfig {
        custom_colors: true,
        text_color: Rgb::new(250, 10, 10),
        background_color: Rgb::new(0, 0, 90),
        ..config("A", 10)
    };
    let output = renderer.render_image(&two_cell_image(255, 0), &config).unwrap();
    assert_eq!(output.surface.pixel(5, 5), Some([250, 10, 10, 255]));
    assert_eq!(output.surface.pixel(15, 5), Some([0, 0, 90, 255]));
}

#[test]
fn exported_png_decodes_to_the_same_pixels() {
    let renderer = HalftoneRenderer::default();
    let config = HalftoneConfig { opacity: 60.0, shadow_blur: 2.0, ..config("AB", 6) };
    let output = renderer.render_image(&gradient_image(48, 30), &config).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("halftone-glyph-output.png");
    output.surface.save_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().into_rgba8();
    assert_eq!(decoded, output.surface.to_rgba_image());
}

#[test]
fn images_load_from_encoded_bytes() {
    let source = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255]));
    let mut bytes = Vec::new();
    source
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .unwrap();

    let image = SourceImage::from_bytes(&bytes).unwrap();
    let output = HalftoneRenderer::default().render_image(&image, &config("A", 10)).unwrap();
    assert_eq!(output.drawn().count(), 4);
}

#[test]
fn font_glyphs_hang_below_the_cell_anchor() {
    let renderer = dejavu_renderer();
    let image = SourceImage::from_rgba(RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255])));
    let config = HalftoneConfig { font_name: String::from("DejaVuSans"), ..config("A", 40) };
    let output = renderer.render_image(&image, &config).unwrap();

    assert_eq!(output.cells[0].decision.glyph(), Some(('A', 40)));
    let (x0, y0, x1, y1) = ink_bounds(&output.surface).unwrap();
    // Cap height starts a fifth of the em below the top; the baseline sits near 37.
    assert!((6..=10).contains(&y0), "top {y0}");
    assert!((34..=38).contains(&y1), "bottom {y1}");
    assert!(x0 <= 2 && (24..=28).contains(&x1), "x {x0}..{x1}");
    // The counter of the 'A' is not a solid block.
    assert_ne!(output.surface.pixel(x1 / 2, y0 + 1), output.surface.pixel(x1 / 2, 30));
}

#[test]
fn characters_missing_from_the_font_draw_blocks() {
    let renderer = dejavu_renderer();
    let image = SourceImage::from_rgba(RgbaImage::from_pixel(40, 40, Rgba([255, 255, 255, 255])));
    let config = HalftoneConfig { font_name: String::from("DejaVuSans"), ..config("漢", 40) };
    let output = renderer.render_image(&image, &config).unwrap();

    assert_eq!(ink_bounds(&output.surface), Some((4, 4, 35, 35)));
    assert_eq!(output.surface.pixel(20, 20), Some([255, 255, 255, 255]));
}
