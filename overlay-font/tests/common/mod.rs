//! A deterministic face for exercising the glyph cache without font files.
//!
//! Every visible glyph is 8×10 with a 10px advance; whitespace has no pixels.
//! The pair `A`,`V` kerns by -2.

#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use overlay_font::{
    AtlasRegion, AtlasSink, Face, FaceLoader, FontError, FontId, GlyphBitmap, GlyphQuad,
    GlyphSink, LineMetrics, VariationAxis,
};

pub const ADVANCE: f32 = 10.0;
pub const ASCENDER: f32 = 12.0;
pub const DESCENDER: f32 = -4.0;
pub const LINE_HEIGHT: f32 = 18.0;

#[derive(Default)]
pub struct Stats {
    pub rasterized: AtomicUsize,
    pub kern_lookups: AtomicUsize,
    pub loads: AtomicUsize,
    pub variations: Mutex<Vec<(String, f32)>>,
}

impl Stats {
    pub fn rasterized(&self) -> usize {
        self.rasterized.load(Ordering::SeqCst)
    }

    pub fn kern_lookups(&self) -> usize {
        self.kern_lookups.load(Ordering::SeqCst)
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

pub struct FakeFace {
    cell: u32,
    axes: Vec<VariationAxis>,
    stats: Arc<Stats>,
}

impl FakeFace {
    pub fn new(cell: u32, stats: Arc<Stats>) -> Self {
        Self { cell, axes: Vec::new(), stats }
    }
}

fn index_of(codepoint: u32) -> u16 {
    (codepoint % 0xFFFF) as u16 + 1
}

impl Face for FakeFace {
    fn line_metrics(&self) -> LineMetrics {
        LineMetrics { ascender: ASCENDER, descender: DESCENDER, line_height: LINE_HEIGHT }
    }

    fn cell_size(&self) -> u32 {
        self.cell
    }

    fn glyph_index(&self, codepoint: u32) -> u16 {
        index_of(codepoint)
    }

    fn rasterize(&mut self, codepoint: u32) -> GlyphBitmap {
        self.stats.rasterized.fetch_add(1, Ordering::SeqCst);
        let blank = char::from_u32(codepoint).is_some_and(char::is_whitespace);
        let (width, height) = if blank { (0, 0) } else { (8, 10) };
        GlyphBitmap {
            glyph_index: index_of(codepoint),
            width,
            height,
            bearing_x: 1,
            bearing_y: 10,
            advance: ADVANCE,
            coverage: vec![255; (width * height) as usize],
        }
    }

    fn has_kerning(&self) -> bool {
        true
    }

    fn kerning(&self, left: u16, right: u16) -> f32 {
        self.stats.kern_lookups.fetch_add(1, Ordering::SeqCst);
        if left == index_of('A' as u32) && right == index_of('V' as u32) {
            -2.0
        } else {
            0.0
        }
    }

    fn variation_axes(&self) -> Vec<VariationAxis> {
        self.axes.clone()
    }

    fn set_variation(&mut self, coords: &[(String, f32)]) {
        let mut seen = self.stats.variations.lock().unwrap();
        seen.extend_from_slice(coords);
    }
}

/// Loads [`FakeFace`]s for any path except `missing.ttf`.
#[derive(Clone)]
pub struct FakeLoader {
    pub cell: u32,
    pub axes: Vec<VariationAxis>,
    pub stats: Arc<Stats>,
}

impl FakeLoader {
    pub fn new(cell: u32) -> Self {
        Self { cell, axes: Vec::new(), stats: Arc::new(Stats::default()) }
    }

    pub fn variable(cell: u32) -> Self {
        let mut loader = Self::new(cell);
        loader.axes = vec![
            VariationAxis { name: "Weight".into(), min: 100.0, default: 400.0, max: 900.0 },
            VariationAxis { name: "Width".into(), min: 75.0, default: 100.0, max: 125.0 },
        ];
        loader
    }
}

impl FaceLoader for FakeLoader {
    fn load(&self, path: &Path, _pixel_size: u32) -> Result<Box<dyn Face>, FontError> {
        if path.ends_with("missing.ttf") {
            return Err(FontError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        self.stats.loads.fetch_add(1, Ordering::SeqCst);
        let mut face = FakeFace::new(self.cell, self.stats.clone());
        face.axes = self.axes.clone();
        Ok(Box::new(face))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkCall {
    Create { layers: u32 },
    Grow { layers: u32, copy: u32 },
    Write { layer: u32, x: u32, y: u32, width: u32, height: u32 },
    Quad(GlyphQuad),
}

#[derive(Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
}

impl RecordingSink {
    pub fn quads(&self) -> Vec<GlyphQuad> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                SinkCall::Quad(q) => Some(*q),
                _ => None,
            })
            .collect()
    }
}

impl AtlasSink for RecordingSink {
    fn create_atlas(&mut self, _font: FontId, _size: u32, layers: u32) {
        self.calls.push(SinkCall::Create { layers });
    }

    fn grow_atlas(&mut self, _font: FontId, layers: u32, copy_layers: u32) {
        self.calls.push(SinkCall::Grow { layers, copy: copy_layers });
    }

    fn write_atlas(&mut self, _font: FontId, region: AtlasRegion<'_>) {
        assert_eq!(region.pixels.len(), (region.width * region.height) as usize);
        self.calls.push(SinkCall::Write {
            layer: region.layer,
            x: region.x,
            y: region.y,
            width: region.width,
            height: region.height,
        });
    }
}

impl GlyphSink for RecordingSink {
    fn glyph_quad(&mut self, quad: &GlyphQuad) {
        self.calls.push(SinkCall::Quad(*quad));
    }
}
