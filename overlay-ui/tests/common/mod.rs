//! Shared fixtures: a font face that needs no font files and a renderer that
//! records what it was asked to draw.
//!
//! Every visible glyph advances 10px; line spacing is 18px.

#![allow(dead_code)]

use std::path::Path;
use std::sync::{Arc, Mutex};

use overlay_font::{
    AtlasRegion, AtlasSink, Face, FaceLoader, FontCache, FontError, FontId, GlyphBitmap,
    LineMetrics, VariationAxis,
};
use overlay_ui::{
    Color, ElementRef, Fonts, KeyEvent, Modifiers, MouseButton, MouseEvent, Point, Projection,
    Rect, Renderer, TexturedQuad, UiConfig, UiContext,
};

pub const ADVANCE: i32 = 10;
pub const LINE_SPACING: i32 = 18;

struct FakeFace;

impl Face for FakeFace {
    fn line_metrics(&self) -> LineMetrics {
        LineMetrics { ascender: 12.0, descender: -4.0, line_height: LINE_SPACING as f32 }
    }

    fn cell_size(&self) -> u32 {
        16
    }

    fn glyph_index(&self, codepoint: u32) -> u16 {
        (codepoint % 0xFFFF) as u16 + 1
    }

    fn rasterize(&mut self, codepoint: u32) -> GlyphBitmap {
        let blank = char::from_u32(codepoint).is_some_and(char::is_whitespace);
        let (width, height) = if blank { (0, 0) } else { (8, 10) };
        GlyphBitmap {
            glyph_index: self.glyph_index(codepoint),
            width,
            height,
            bearing_x: 1,
            bearing_y: 10,
            advance: ADVANCE as f32,
            coverage: vec![255; (width * height) as usize],
        }
    }

    fn has_kerning(&self) -> bool {
        false
    }

    fn kerning(&self, _left: u16, _right: u16) -> f32 {
        0.0
    }

    fn variation_axes(&self) -> Vec<VariationAxis> {
        Vec::new()
    }

    fn set_variation(&mut self, _coords: &[(String, f32)]) {}
}

struct FakeLoader;

impl FaceLoader for FakeLoader {
    fn load(&self, _path: &Path, _pixel_size: u32) -> Result<Box<dyn Face>, FontError> {
        Ok(Box::new(FakeFace))
    }
}

pub fn ui() -> UiContext {
    ui_with(UiConfig::default())
}

pub fn ui_with(config: UiConfig) -> UiContext {
    let cache = Arc::new(FontCache::new(FakeLoader, config.font_gamma));
    let fonts = Fonts::load(cache, &config).unwrap();
    UiContext::new(config, fonts)
}

/// Everything a frame asked the renderer for.
#[derive(Default)]
pub struct RecordingRenderer {
    pub rects: Vec<(Rect, Color)>,
    pub quads: Vec<TexturedQuad>,
    pub scissor_depth: i32,
    pub atlases: Vec<FontId>,
}

impl RecordingRenderer {
    pub fn has_rect(&self, rect: Rect) -> bool {
        self.rects.iter().any(|(r, _)| *r == rect)
    }

    pub fn rects_of(&self, color: Color) -> Vec<Rect> {
        self.rects.iter().filter(|(_, c)| *c == color).map(|(r, _)| *r).collect()
    }
}

impl AtlasSink for RecordingRenderer {
    fn create_atlas(&mut self, font: FontId, _size: u32, _layers: u32) {
        self.atlases.push(font);
    }

    fn grow_atlas(&mut self, _font: FontId, _layers: u32, _copy_layers: u32) {}

    fn write_atlas(&mut self, _font: FontId, _region: AtlasRegion<'_>) {}
}

impl Renderer for RecordingRenderer {
    fn draw_rect(&mut self, rect: Rect, color: Color, _projection: &Projection) {
        self.rects.push((rect, color));
    }

    fn draw_textured_quad(&mut self, quad: &TexturedQuad, _projection: &Projection) {
        self.quads.push(*quad);
    }

    fn push_scissor(&mut self, _rect: Rect) {
        self.scissor_depth += 1;
    }

    fn pop_scissor(&mut self) {
        self.scissor_depth -= 1;
    }
}

/// Draw one frame and return what was drawn.
pub fn frame(ui: &UiContext) -> RecordingRenderer {
    let mut renderer = RecordingRenderer::default();
    ui.draw(&mut renderer, Projection::orthographic(1280.0, 720.0));
    assert_eq!(renderer.scissor_depth, 0, "unbalanced clip stack");
    renderer
}

/// Collect the names of events emitted to `element`.
pub fn record(element: &ElementRef) -> Arc<Mutex<Vec<String>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    element.add_event_handler(move |name| sink.lock().unwrap().push(name.to_string()));
    log
}

pub fn events(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub fn take(log: &Arc<Mutex<Vec<String>>>) -> Vec<String> {
    std::mem::take(&mut *log.lock().unwrap())
}

pub fn move_to(ui: &UiContext, x: i32, y: i32) -> bool {
    ui.process_mouse_event(&MouseEvent::CursorMoved { position: Point::new(x, y) })
}

pub fn press(ui: &UiContext, x: i32, y: i32) -> bool {
    ui.process_mouse_event(&MouseEvent::ButtonPressed {
        button: MouseButton::Left,
        position: Point::new(x, y),
    })
}

pub fn release(ui: &UiContext, x: i32, y: i32) -> bool {
    ui.process_mouse_event(&MouseEvent::ButtonReleased {
        button: MouseButton::Left,
        position: Point::new(x, y),
    })
}

pub fn click(ui: &UiContext, x: i32, y: i32) {
    press(ui, x, y);
    release(ui, x, y);
}

pub fn type_text(ui: &UiContext, text: &str) {
    for c in text.chars() {
        ui.process_keyboard_event(&KeyEvent::Pressed {
            key: overlay_ui::Key::character(c.to_string()),
            modifiers: Modifiers::NONE,
            text: Some(c.to_string()),
        });
    }
}

pub fn key(ui: &UiContext, key: overlay_ui::NamedKey, modifiers: Modifiers) -> bool {
    ui.process_keyboard_event(&KeyEvent::Pressed {
        key: overlay_ui::Key::named(key),
        modifiers,
        text: None,
    })
}
