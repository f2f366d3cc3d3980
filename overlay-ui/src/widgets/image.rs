//! Image element.

use crate::element::{ElementBase, Widget};
use crate::input::Frame;
use crate::primitives::{Color, Point, Size};
use crate::render::{TextureId, TextureRef, TexturedQuad};

/// A renderer-owned texture drawn over the element's rect.
#[derive(Debug, Clone)]
pub struct Image {
    texture: TextureId,
    image_size: Size,
    /// Normalized source rect: left, top, right, bottom.
    uv: [f32; 4],
    tint: Color,
}

impl Image {
    pub fn new(texture: TextureId, image_size: Size) -> Self {
        Self {
            texture,
            image_size,
            uv: [0.0, 0.0, 1.0, 1.0],
            tint: Color::WHITE,
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn image_size(&self) -> Size {
        self.image_size
    }

    pub fn set_image(&mut self, texture: TextureId, image_size: Size) {
        self.texture = texture;
        self.image_size = image_size;
    }

    pub fn uv(&self) -> [f32; 4] {
        self.uv
    }

    pub fn set_uv(&mut self, uv: [f32; 4]) {
        self.uv = uv;
    }

    pub fn set_tint(&mut self, tint: Color) {
        self.tint = tint;
    }
}

impl Widget for Image {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        if base.size.width <= 0 || base.size.height <= 0 {
            return;
        }
        let quad = TexturedQuad {
            texture: TextureRef::Image(self.texture),
            layer: 0,
            rect: [
                origin.x as f32,
                origin.y as f32,
                (origin.x + base.size.width) as f32,
                (origin.y + base.size.height) as f32,
            ],
            uv: self.uv,
            color: self.tint,
        };
        frame.draw.textured_quad(&quad);
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(self.image_size)
    }
}
