//! Primitive draw interface.
//!
//! The toolkit decides what to draw and where; a [`Renderer`] supplied by
//! the host turns solid rectangles and textured quads into pixels. Glyph
//! atlas uploads reach the renderer through the [`AtlasSink`] supertrait.

use overlay_font::{AtlasRegion, AtlasSink, Font, FontId, GlyphQuad, GlyphSink, GLYPH_TEX_SIZE};

use crate::primitives::{Color, Point, Rect};

/// Orthographic screen projection, laid out for direct upload as a uniform.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct Projection {
    pub matrix: [[f32; 4]; 4],
}

impl Projection {
    /// Map `(0, 0)..(width, height)` with y down to clip space.
    pub fn orthographic(width: f32, height: f32) -> Self {
        let (left, right, top, bottom) = (0.0, width, 0.0, height);
        let (near, far) = (-1.0, 1.0);

        let sx = 2.0 / (right - left);
        let sy = 2.0 / (top - bottom);
        let sz = 2.0 / (far - near);
        let tx = -(right + left) / (right - left);
        let ty = -(top + bottom) / (top - bottom);
        let tz = -(far + near) / (far - near);

        Self {
            matrix: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [tx, ty, tz, 1.0],
            ],
        }
    }

    /// Transform a screen point to clip space.
    pub fn apply(&self, x: f32, y: f32) -> [f32; 2] {
        let m = &self.matrix;
        [
            m[0][0] * x + m[1][0] * y + m[3][0],
            m[0][1] * x + m[1][1] * y + m[3][1],
        ]
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Handle to an image texture owned by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u64);

/// The texture a quad samples from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureRef {
    /// A font's layered glyph atlas.
    FontAtlas(FontId),
    Image(TextureId),
}

/// A textured quad in screen pixels with normalized UVs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexturedQuad {
    pub texture: TextureRef,
    pub layer: u32,
    /// left, top, right, bottom
    pub rect: [f32; 4],
    /// left, top, right, bottom in 0.0-1.0
    pub uv: [f32; 4],
    pub color: Color,
}

/// The host's rendering backend.
pub trait Renderer: AtlasSink {
    fn draw_rect(&mut self, rect: Rect, color: Color, projection: &Projection);

    fn draw_textured_quad(&mut self, quad: &TexturedQuad, projection: &Projection);

    /// Restrict drawing to `rect` until the matching [`Renderer::pop_scissor`].
    fn push_scissor(&mut self, rect: Rect);

    fn pop_scissor(&mut self);
}

/// Adapts a renderer to the glyph cache's output interface.
struct TextSink<'a> {
    renderer: &'a mut dyn Renderer,
    projection: &'a Projection,
}

impl AtlasSink for TextSink<'_> {
    fn create_atlas(&mut self, font: FontId, size: u32, layers: u32) {
        self.renderer.create_atlas(font, size, layers);
    }

    fn grow_atlas(&mut self, font: FontId, layers: u32, copy_layers: u32) {
        self.renderer.grow_atlas(font, layers, copy_layers);
    }

    fn write_atlas(&mut self, font: FontId, region: AtlasRegion<'_>) {
        self.renderer.write_atlas(font, region);
    }
}

impl GlyphSink for TextSink<'_> {
    fn glyph_quad(&mut self, quad: &GlyphQuad) {
        let tex = GLYPH_TEX_SIZE as f32;
        let textured = TexturedQuad {
            texture: TextureRef::FontAtlas(quad.font),
            layer: quad.layer,
            rect: [quad.left, quad.top, quad.right, quad.bottom],
            uv: [
                quad.tex_left / tex,
                quad.tex_top / tex,
                quad.tex_right / tex,
                quad.tex_bottom / tex,
            ],
            color: Color(quad.color),
        };
        self.renderer.draw_textured_quad(&textured, self.projection);
    }
}

/// Per-frame drawing state: the renderer, projection and clip stack.
pub struct DrawContext<'a> {
    renderer: &'a mut dyn Renderer,
    projection: Projection,
    clips: Vec<Rect>,
}

impl<'a> DrawContext<'a> {
    pub fn new(renderer: &'a mut dyn Renderer, projection: Projection) -> Self {
        Self {
            renderer,
            projection,
            clips: Vec::new(),
        }
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// The innermost clip rectangle, if any.
    pub fn clip(&self) -> Option<Rect> {
        self.clips.last().copied()
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        if !color.is_visible() || rect.is_empty() {
            return;
        }
        self.renderer.draw_rect(rect, color, &self.projection);
    }

    /// A 1px outline just inside `rect`.
    pub fn stroke_rect(&mut self, rect: Rect, color: Color) {
        if !color.is_visible() || rect.is_empty() {
            return;
        }
        let (x, y, w, h) = (rect.x, rect.y, rect.width, rect.height);
        self.fill_rect(Rect::new(x, y, w, 1), color);
        self.fill_rect(Rect::new(x, y + h - 1, w, 1), color);
        self.fill_rect(Rect::new(x, y + 1, 1, h - 2), color);
        self.fill_rect(Rect::new(x + w - 1, y + 1, 1, h - 2), color);
    }

    pub fn textured_quad(&mut self, quad: &TexturedQuad) {
        self.renderer.draw_textured_quad(quad, &self.projection);
    }

    /// Draw one line of text with its top-left at `at`.
    pub fn text(&mut self, font: &Font, at: Point, text: &str, color: Color) {
        let mut sink = TextSink {
            renderer: &mut *self.renderer,
            projection: &self.projection,
        };
        font.draw_text(&mut sink, at.x as f32, at.y as f32, text, color.0);
    }

    /// Clip to `rect` intersected with the current clip.
    pub fn push_clip(&mut self, rect: Rect) {
        let clip = match self.clip() {
            Some(outer) => outer.intersection(&rect).unwrap_or(Rect::new(rect.x, rect.y, 0, 0)),
            None => rect,
        };
        self.clips.push(clip);
        self.renderer.push_scissor(clip);
    }

    pub fn pop_clip(&mut self) {
        if self.clips.pop().is_some() {
            self.renderer.pop_scissor();
        }
    }
}
