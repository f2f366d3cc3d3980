//! A font at one size: glyph table, kerning cache, metrics and text queries.
//!
//! Glyphs are rasterized on first use. Every text operation walks the string
//! with the same decode/kerning/advance loop, so measured widths always match
//! what [`Font::draw_text`] emits.

use std::ops::{ControlFlow, Range};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::atlas::{AtlasSink, AtlasSlot, GlyphAtlas};
use crate::cache::FontKey;
use crate::face::{Face, LineMetrics};
use crate::probe_map::ProbeMap;
use crate::utf8::{self, Decoded};

/// Characters rasterized as soon as a font is created (a-z and A-Z follow).
pub const PRELOAD_CHARS: &str = " ~!@#$%^&*()_+`1234567890,.;:'\"-=\\|/?><[]{}";

const GLYPH_TABLE_CAPACITY: usize = 256;
const GLYPH_TABLE_GROW: usize = 128;
const KERNING_TABLE_CAPACITY: usize = 64;
const KERNING_TABLE_GROW: usize = 64;

/// Identifies a font's atlas texture to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontId(pub u32);

/// A rasterized glyph and its place in the atlas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedGlyph {
    pub glyph_index: u16,
    pub width: u32,
    pub height: u32,
    pub bearing_x: i32,
    pub bearing_y: i32,
    pub advance: f32,
    pub slot: AtlasSlot,
}

impl CachedGlyph {
    /// Whitespace and other glyphs with no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// One textured quad for a glyph, in screen pixels and atlas texels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphQuad {
    pub font: FontId,
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub tex_left: f32,
    pub tex_top: f32,
    pub tex_right: f32,
    pub tex_bottom: f32,
    pub layer: u32,
    /// 0xRRGGBBAA
    pub color: u32,
}

/// Receives a font's atlas uploads and glyph quads.
pub trait GlyphSink: AtlasSink {
    fn glyph_quad(&mut self, quad: &GlyphQuad);
}

struct GlyphStep {
    decoded: Decoded,
    glyph: CachedGlyph,
    /// Pen position after kerning, before this glyph's advance.
    pen: f32,
}

struct FontInner {
    face: Box<dyn Face>,
    glyphs: ProbeMap<u32, CachedGlyph>,
    kerning: ProbeMap<(u16, u16), f32>,
    atlas: GlyphAtlas,
    metrics: LineMetrics,
    has_kerning: bool,
}

impl FontInner {
    fn glyph(&mut self, codepoint: u32) -> CachedGlyph {
        loop {
            if let Some(glyph) = self.glyphs.get(&codepoint) {
                return *glyph;
            }
            self.render_glyph(codepoint);
        }
    }

    fn render_glyph(&mut self, codepoint: u32) {
        let bitmap = self.face.rasterize(codepoint);
        let slot = self.atlas.insert(&bitmap);
        let cell = self.atlas.cell_size();
        self.glyphs.insert(
            codepoint,
            CachedGlyph {
                glyph_index: bitmap.glyph_index,
                width: bitmap.width.min(cell),
                height: bitmap.height.min(cell),
                bearing_x: bitmap.bearing_x,
                bearing_y: bitmap.bearing_y,
                advance: bitmap.advance,
                slot,
            },
        );
    }

    fn kern(&mut self, prev: u16, next: u16) -> f32 {
        if !self.has_kerning || prev == 0 || next == 0 {
            return 0.0;
        }
        if let Some(k) = self.kerning.get(&(prev, next)) {
            return *k;
        }
        let k = self.face.kerning(prev, next);
        self.kerning.insert((prev, next), k);
        k
    }

    /// Walk `bytes` glyph by glyph, returning the final pen position.
    fn walk(
        &mut self,
        bytes: &[u8],
        mut visit: impl FnMut(&GlyphStep) -> ControlFlow<()>,
    ) -> f32 {
        let mut pen = 0.0;
        let mut prev = 0u16;
        for decoded in utf8::decode(bytes) {
            let glyph = self.glyph(decoded.codepoint);
            pen += self.kern(prev, glyph.glyph_index);
            if visit(&GlyphStep { decoded, glyph, pen }).is_break() {
                break;
            }
            pen += glyph.advance;
            prev = glyph.glyph_index;
        }
        pen
    }

    fn wrap_paragraph(&mut self, bytes: &[u8], mut start: usize, end: usize, max: f32, out: &mut Vec<Range<usize>>) {
        if start == end {
            out.push(start..end);
            return;
        }

        while start < end {
            let mut last_space: Option<(usize, usize)> = None;
            let mut overflow: Option<usize> = None;

            self.walk(&bytes[start..end], |step| {
                let d = step.decoded;
                let ws = is_wrap_space(d.codepoint);
                if step.pen + step.glyph.advance > max && d.offset > 0 {
                    if ws {
                        last_space = Some((d.offset, d.len));
                    }
                    overflow = Some(d.offset);
                    return ControlFlow::Break(());
                }
                if ws {
                    last_space = Some((d.offset, d.len));
                }
                ControlFlow::Continue(())
            });

            match (overflow, last_space) {
                (None, _) => {
                    out.push(start..end);
                    break;
                }
                (Some(_), Some((at, len))) if at > 0 => {
                    out.push(start..start + at);
                    start += at + len;
                }
                (Some(at), _) => {
                    out.push(start..start + at);
                    start += at;
                }
            }
        }
    }
}

fn is_wrap_space(codepoint: u32) -> bool {
    char::from_u32(codepoint).is_some_and(char::is_whitespace)
}

/// A font face at one pixel size with its glyph cache.
pub struct Font {
    id: FontId,
    key: FontKey,
    inner: Mutex<FontInner>,
}

impl std::fmt::Debug for Font {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Font")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl Font {
    /// Wrap an opened face and preload the common ASCII glyphs.
    pub fn new(id: FontId, key: FontKey, face: Box<dyn Face>, gamma: f32) -> Self {
        let metrics = face.line_metrics();
        let has_kerning = face.has_kerning();
        let atlas = GlyphAtlas::new(face.cell_size(), gamma);

        debug!(
            path = ?key.path,
            size = key.size,
            cell = atlas.cell_size(),
            per_page = atlas.page_capacity(),
            "new font"
        );

        let font = Self {
            id,
            key,
            inner: Mutex::new(FontInner {
                face,
                glyphs: ProbeMap::new(GLYPH_TABLE_CAPACITY, GLYPH_TABLE_GROW),
                kerning: ProbeMap::new(KERNING_TABLE_CAPACITY, KERNING_TABLE_GROW),
                atlas,
                metrics,
                has_kerning,
            }),
        };

        {
            let mut inner = font.lock();
            let preload = PRELOAD_CHARS.chars().chain('a'..='z').chain('A'..='Z');
            for c in preload {
                inner.glyph(c as u32);
            }
        }

        font
    }

    fn lock(&self) -> MutexGuard<'_, FontInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn id(&self) -> FontId {
        self.id
    }

    pub fn key(&self) -> &FontKey {
        &self.key
    }

    pub fn size(&self) -> u32 {
        self.key.size
    }

    /// Look up a glyph, rasterizing it on a miss.
    pub fn glyph(&self, codepoint: u32) -> CachedGlyph {
        self.lock().glyph(codepoint)
    }

    pub fn glyph_count(&self) -> u32 {
        self.lock().atlas.glyph_count()
    }

    pub fn atlas_layers(&self) -> u32 {
        self.lock().atlas.layer_count()
    }

    pub fn cell_size(&self) -> u32 {
        self.lock().atlas.cell_size()
    }

    pub fn page_capacity(&self) -> u32 {
        self.lock().atlas.page_capacity()
    }

    /// Baseline-to-baseline distance.
    pub fn line_spacing(&self) -> i32 {
        self.lock().metrics.line_height as i32
    }

    /// Ascender minus descender.
    pub fn text_height(&self) -> i32 {
        let m = self.lock().metrics;
        (m.ascender - m.descender) as i32
    }

    pub fn ascender(&self) -> f32 {
        self.lock().metrics.ascender
    }

    /// Width of `text` in pixels, rounded up.
    pub fn text_width(&self, text: &str) -> i32 {
        self.lock()
            .walk(text.as_bytes(), |_| ControlFlow::Continue(()))
            .ceil() as i32
    }

    /// Byte offset of the first character that ends past `width`, or
    /// `text.len()` if the whole string fits.
    pub fn index_of_width(&self, text: &str, width: i32) -> usize {
        let mut index = text.len();
        self.lock().walk(text.as_bytes(), |step| {
            if step.pen + step.glyph.advance > width as f32 {
                index = step.decoded.offset;
                return ControlFlow::Break(());
            }
            ControlFlow::Continue(())
        });
        index
    }

    /// Break `text` into lines no wider than `width`.
    ///
    /// `\n` always ends a line. An overflowing line breaks at its last
    /// whitespace (which is dropped), otherwise right before the character
    /// that overflows. Every line holds at least one character.
    pub fn wrap(&self, text: &str, width: i32) -> Vec<Range<usize>> {
        let bytes = text.as_bytes();
        let mut inner = self.lock();
        let mut lines = Vec::new();
        let mut start = 0;
        for paragraph in text.split('\n') {
            let end = start + paragraph.len();
            inner.wrap_paragraph(bytes, start, end, width as f32, &mut lines);
            start = end + 1;
        }
        lines
    }

    /// Emit one quad per visible glyph of `text` with its top-left at `(x, y)`.
    ///
    /// Atlas changes, including glyphs rasterized for this call, are flushed
    /// to the sink before any quad.
    pub fn draw_text(&self, sink: &mut dyn GlyphSink, x: f32, y: f32, text: &str, color: u32) {
        let mut inner = self.lock();
        let baseline = y + inner.metrics.ascender;
        let id = self.id;

        let mut quads = Vec::new();
        inner.walk(text.as_bytes(), |step| {
            let g = &step.glyph;
            if !g.is_empty() {
                let left = x + step.pen + g.bearing_x as f32;
                let top = baseline - g.bearing_y as f32;
                quads.push(GlyphQuad {
                    font: id,
                    left,
                    top,
                    right: left + g.width as f32,
                    bottom: top + g.height as f32,
                    tex_left: g.slot.x as f32,
                    tex_top: g.slot.y as f32,
                    tex_right: (g.slot.x + g.width) as f32,
                    tex_bottom: (g.slot.y + g.height) as f32,
                    layer: g.slot.layer,
                    color,
                });
            }
            ControlFlow::Continue(())
        });

        inner.atlas.flush(id, &mut *sink);
        drop(inner);

        for quad in &quads {
            sink.glyph_quad(quad);
        }
    }
}
