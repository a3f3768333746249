use std::fs;
use std::path::Path;
use std::sync::Arc;

use log::{debug, warn};
use rustybuzz::ttf_parser::OutlineBuilder;
use rustybuzz::Face;
use tiny_skia::{Path as SkPath, PathBuilder, Rect};
use walkdir::WalkDir;

use crate::HalftoneError;

const FONT_EXTENSIONS: [&str; 4] = ["ttf", "otf", "woff", "woff2"];
const DEFAULT_FONT_NAME: &str = "CustomFont";

/// A parsed TrueType/OpenType font registered under a name.
pub struct Font {
    name: String,
    data: Arc<[u8]>,
    units_per_em: f32,
    ascender: f32,
}

impl Font {
    pub fn from_bytes(name: impl Into<String>, data: Vec<u8>) -> Result<Self, HalftoneError> {
        let name = name.into();
        let (units_per_em, ascender) = match Face::from_slice(&data, 0) {
            Some(face) => {
                let tables = face.as_ref();
                (f32::from(tables.units_per_em()), f32::from(tables.ascender()))
            },
            None => {
                return Err(HalftoneError::FontRegistration {
                    name,
                    reason: String::from("unrecognized font data"),
                })
            },
        };

        if units_per_em <= 0.0 {
            return Err(HalftoneError::FontRegistration {
                name,
                reason: String::from("font reports zero units per em"),
            });
        }

        Ok(Self { name, data: data.into(), units_per_em, ascender })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outline at one pixel per em with the em box top-left at the origin.
    /// `None` if the font has no glyph for `ch`.
    fn unit_outline(&self, ch: char) -> Option<Option<SkPath>> {
        let face = Face::from_slice(&self.data, 0)?;
        let glyph = face.glyph_index(ch)?;

        let scale = 1.0 / self.units_per_em;
        let mut sink = PathSink { builder: PathBuilder::new(), scale, ascender: self.ascender };
        if face.outline_glyph(glyph, &mut sink).is_none() {
            return Some(None);
        }
        Some(sink.builder.finish())
    }
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.name)
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

/// Flips font units (y up, baseline origin) into pixel space (y down, em-box
/// top origin).
struct PathSink {
    builder: PathBuilder,
    scale: f32,
    ascender: f32,
}

impl PathSink {
    fn x(&self, x: f32) -> f32 {
        x * self.scale
    }

    fn y(&self, y: f32) -> f32 {
        (self.ascender - y) * self.scale
    }
}

impl OutlineBuilder for PathSink {
    fn move_to(&mut self, x: f32, y: f32) {
        self.builder.move_to(self.x(x), self.y(y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.builder.line_to(self.x(x), self.y(y));
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        self.builder.quad_to(self.x(x1), self.y(y1), self.x(x), self.y(y));
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        self.builder.cubic_to(
            self.x(x1),
            self.y(y1),
            self.x(x2),
            self.y(y2),
            self.x(x),
            self.y(y),
        );
    }

    fn close(&mut self) {
        self.builder.close();
    }
}

/// Face used to draw glyphs. Resolution never fails: unknown names fall back
/// to another registered font or to solid blocks.
#[derive(Clone, Debug)]
pub enum Typeface {
    Outline(Arc<Font>),
    Fallback,
}

impl Typeface {
    pub fn name(&self) -> &str {
        match self {
            Typeface::Outline(font) => font.name(),
            Typeface::Fallback => "fallback",
        }
    }

    /// Unit-size outline for `ch`; `None` when the glyph leaves no ink.
    pub fn unit_outline(&self, ch: char) -> Option<SkPath> {
        if ch.is_whitespace() {
            return None;
        }

        match self {
            Typeface::Outline(font) => match font.unit_outline(ch) {
                Some(outline) => outline,
                None => block_outline(),
            },
            Typeface::Fallback => block_outline(),
        }
    }
}

fn block_outline() -> Option<SkPath> {
    Rect::from_xywh(0.1, 0.1, 0.8, 0.8).map(PathBuilder::from_rect)
}

/// Named fonts available to the compositor.
#[derive(Debug, Default)]
pub struct FontBook {
    fonts: Vec<Arc<Font>>,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fonts.iter().map(|font| font.name())
    }

    /// Registers font data under `name`, replacing any font with that name.
    pub fn register(&mut self, name: impl Into<String>, data: Vec<u8>) -> Result<(), HalftoneError> {
        let font = Arc::new(Font::from_bytes(name, data)?);
        self.fonts.retain(|existing| existing.name() != font.name());
        debug!("registered font {:?}", font.name());
        self.fonts.push(font);
        Ok(())
    }

    /// Registers a font file under its inferred name and returns that name.
    pub fn register_file<P: AsRef<Path>>(&mut self, path: P) -> Result<String, HalftoneError> {
        let path = path.as_ref();
        let name = font_name_from_path(path);
        let data = fs::read(path).map_err(|err| HalftoneError::FontRegistration {
            name: name.clone(),
            reason: err.to_string(),
        })?;
        self.register(name.clone(), data)?;
        Ok(name)
    }

    /// Registers every font file below `dir`. Failures are logged and skipped.
    pub fn register_dir<P: AsRef<Path>>(&mut self, dir: P) -> usize {
        let mut entries: Vec<_> = WalkDir::new(dir.as_ref())
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file() && has_font_extension(entry.path()))
            .map(|entry| entry.into_path())
            .collect();
        entries.sort();

        let mut registered = 0;
        for path in entries {
            match self.register_file(&path) {
                Ok(_) => registered += 1,
                Err(err) => warn!("skipping font {}: {err}", path.display()),
            }
        }
        registered
    }

    pub fn resolve(&self, name: &str) -> Typeface {
        let found = self
            .fonts
            .iter()
            .find(|font| font.name() == name)
            .or_else(|| self.fonts.iter().find(|font| font.name().eq_ignore_ascii_case(name)));

        if let Some(font) = found {
            return Typeface::Outline(font.clone());
        }

        match self.fonts.first() {
            Some(font) => {
                warn!("font {name:?} is not registered, using {:?}", font.name());
                Typeface::Outline(font.clone())
            },
            None => {
                debug!("no fonts registered, drawing {name:?} with block glyphs");
                Typeface::Fallback
            },
        }
    }
}

fn has_font_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| FONT_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
        .unwrap_or(false)
}

/// File name without a known font extension.
pub fn font_name_from_path(path: &Path) -> String {
    let file_name = path.file_name().and_then(|name| name.to_str()).unwrap_or_default();
    let name = if has_font_extension(path) {
        path.file_stem().and_then(|stem| stem.to_str()).unwrap_or_default()
    } else {
        file_name
    };

    if name.is_empty() {
        String::from(DEFAULT_FONT_NAME)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEJAVU_SANS: &[u8] = include_bytes!("../../tests/fixtures/DejaVuSans.ttf");

    #[test]
    fn outlines_hang_below_the_em_box_top() {
        let font = Font::from_bytes("DejaVuSans", DEJAVU_SANS.to_vec()).unwrap();
        let bounds = font.unit_outline('A').unwrap().unwrap().bounds();

        // Cap height sits under the ascender; the baseline is near the em bottom.
        assert!(bounds.top() > 0.15 && bounds.top() < 0.25, "{bounds:?}");
        assert!(bounds.bottom() > 0.9 && bounds.bottom() < 0.95, "{bounds:?}");
        assert!(bounds.left() >= 0.0 && bounds.right() < 0.75, "{bounds:?}");
    }

    #[test]
    fn unmapped_characters_draw_blocks() {
        let font = Font::from_bytes("DejaVuSans", DEJAVU_SANS.to_vec()).unwrap();
        assert!(font.unit_outline('漢').is_none());

        let face = Typeface::Outline(Arc::new(font));
        let bounds = face.unit_outline('漢').unwrap().bounds();
        assert!((bounds.top() - 0.1).abs() < 1e-6);
        assert!((bounds.right() - 0.9).abs() < 1e-6);
        assert!(face.unit_outline(' ').is_none());
    }

    #[test]
    fn registered_names_resolve_case_insensitively() {
        let mut book = FontBook::new();
        book.register("DejaVuSans", DEJAVU_SANS.to_vec()).unwrap();
        assert_eq!(book.resolve("dejavusans").name(), "DejaVuSans");
        assert_eq!(book.resolve("Arial").name(), "DejaVuSans");
    }

    #[test]
    fn directory_registration_picks_up_fonts() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/DejaVuSans.ttf"), DEJAVU_SANS).unwrap();

        let mut book = FontBook::new();
        assert_eq!(book.register_dir(dir.path()), 1);
        assert_eq!(book.names().collect::<Vec<_>>(), vec!["DejaVuSans"]);
    }

    #[test]
    fn corrupt_font_is_rejected() {
        let mut book = FontBook::new();
        let err = book.register("Broken", b"not a font at all".to_vec()).unwrap_err();
        assert!(matches!(err, HalftoneError::FontRegistration { ref name, .. } if name == "Broken"));
        assert!(book.is_empty());
    }

    #[test]
    fn missing_fonts_resolve_to_fallback() {
        let book = FontBook::new();
        let face = book.resolve("Arial");
        assert!(matches!(face, Typeface::Fallback));
        assert_eq!(face.name(), "fallback");
    }

    #[test]
    fn fallback_draws_blocks_but_not_spaces() {
        let face = Typeface::Fallback;
        let bounds = face.unit_outline('A').unwrap().bounds();
        assert!((bounds.left() - 0.1).abs() < 1e-6);
        assert!((bounds.bottom() - 0.9).abs() < 1e-6);
        assert!(face.unit_outline(' ').is_none());
        assert!(face.unit_outline('\t').is_none());
    }

    #[test]
    fn infers_names_from_files() {
        assert_eq!(font_name_from_path(Path::new("/fonts/Inter-Bold.ttf")), "Inter-Bold");
        assert_eq!(font_name_from_path(Path::new("Mono.WOFF2")), "Mono");
        assert_eq!(font_name_from_path(Path::new("collection.ttc")), "collection.ttc");
        assert_eq!(font_name_from_path(Path::new(".otf")), ".otf");
        assert_eq!(font_name_from_path(Path::new("")), "CustomFont");
    }

    #[test]
    fn directory_registration_skips_bad_assets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.ttf"), b"garbage").unwrap();
        fs::write(dir.path().join("notes.txt"), b"not a font").unwrap();

        let mut book = FontBook::new();
        assert_eq!(book.register_dir(dir.path()), 0);
        assert!(book.is_empty());
    }

    #[test]
    fn unreadable_file_reports_inferred_name() {
        let mut book = FontBook::new();
        let err = book.register_file("/nonexistent/Display.otf").unwrap_err();
        assert!(matches!(err, HalftoneError::FontRegistration { ref name, .. } if name == "Display"));
    }
}
