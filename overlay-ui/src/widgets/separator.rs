//! Separator line.

use crate::element::{ElementBase, Widget};
use crate::input::Frame;
use crate::layout::Orientation;
use crate::primitives::{Color, Point, Rect, Size};

/// A thin line with one pixel of padding on each side of it.
#[derive(Debug, Clone)]
pub struct Separator {
    orientation: Orientation,
    color: Color,
    thickness: i32,
}

impl Separator {
    pub fn new(orientation: Orientation, color: Color) -> Self {
        Self {
            orientation,
            color,
            thickness: 1,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn thickness(&self) -> i32 {
        self.thickness
    }

    pub fn set_thickness(&mut self, thickness: i32) {
        self.thickness = thickness.max(1);
    }
}

impl Widget for Separator {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let Size { width, height } = base.size;
        if width == 0 || height == 0 {
            return;
        }
        // The line runs along the orientation, inset by the padding across it.
        let line = match self.orientation {
            Orientation::Horizontal => Rect::new(origin.x, origin.y + 1, width, height - 2),
            Orientation::Vertical => Rect::new(origin.x + 1, origin.y, width - 2, height),
        };
        frame.draw.fill_rect(line, self.color);
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        let across = self.thickness + 2;
        Some(match self.orientation {
            Orientation::Horizontal => Size::new(0, across),
            Orientation::Vertical => Size::new(across, 0),
        })
    }
}
