//! Polyline element.

use crate::element::{ElementBase, Widget};
use crate::input::Frame;
use crate::primitives::{Color, Point, Rect, Size};

/// Connected line segments through a list of points local to the element.
#[derive(Debug, Clone)]
pub struct Polyline {
    points: Vec<Point>,
    color: Color,
    width: i32,
}

impl Default for Polyline {
    fn default() -> Self {
        Self::new()
    }
}

impl Polyline {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            color: Color::WHITE,
            width: 1,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn add_point(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn clear_points(&mut self) {
        self.points.clear();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn set_width(&mut self, width: i32) {
        self.width = width.max(1);
    }
}

/// Rectangles covering the segment `a`-`b` drawn `width` pixels thick.
///
/// Axis-aligned segments are a single rect; anything else is stamped one
/// square per step along the major axis.
pub(crate) fn segment_rects(a: Point, b: Point, width: i32) -> Vec<Rect> {
    let half = width / 2;
    let (dx, dy) = (b.x - a.x, b.y - a.y);

    if dy == 0 {
        let left = a.x.min(b.x);
        return vec![Rect::new(left - half, a.y - half, dx.abs() + width, width)];
    }
    if dx == 0 {
        let top = a.y.min(b.y);
        return vec![Rect::new(a.x - half, top - half, width, dy.abs() + width)];
    }

    let steps = dx.abs().max(dy.abs());
    (0..=steps)
        .map(|i| {
            let x = a.x + (dx as f32 * i as f32 / steps as f32).round() as i32;
            let y = a.y + (dy as f32 * i as f32 / steps as f32).round() as i32;
            Rect::new(x - half, y - half, width, width)
        })
        .collect()
}

impl Widget for Polyline {
    fn draw(&mut self, _base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        if self.points.len() < 2 {
            return;
        }
        for pair in self.points.windows(2) {
            for rect in segment_rects(pair[0] + origin, pair[1] + origin, self.width) {
                frame.draw.fill_rect(rect, self.color);
            }
        }
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        let right = self.points.iter().map(|p| p.x).max()?;
        let bottom = self.points.iter().map(|p| p.y).max()?;
        Some(Size::new(right + self.width, bottom + self.width))
    }
}
