//! Scrollable viewport over a single child.

use crate::element::{ElementBase, ElementRef, Widget};
use crate::event::{EventResult, MouseButton, MouseEvent};
use crate::input::{EventContext, Frame};
use crate::primitives::{Color, Point, Rect, Size};
use crate::theme::{Theme, UiConfig};

/// Geometry of one scrollbar thumb along its track.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub(crate) struct Thumb {
    pub(crate) pos: i32,
    pub(crate) size: i32,
    /// Content pixels per thumb pixel.
    pub(crate) factor: f64,
}

impl Thumb {
    /// `None` when the content fits in the viewport.
    pub(crate) fn compute(viewport: i32, content: i32, offset: i32) -> Option<Self> {
        if content <= viewport || viewport <= 0 {
            return None;
        }
        let size = (viewport as f64 * viewport as f64 / content as f64) as i32;
        let track = viewport - size;
        let max = content - viewport;
        let pos = (offset as f64 / max as f64 * track as f64) as i32;
        let factor = if track > 0 { max as f64 / track as f64 } else { 0.0 };
        Some(Self { pos, size, factor })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Shows part of its child, with scrollbars along the right and bottom.
///
/// The scrollbar gutters are always reserved, so the viewport is the element
/// size less the gutter in each direction.
#[derive(Debug)]
pub struct ScrollView {
    child: Option<ElementRef>,
    offset: Point,
    viewport: Size,
    content: Size,
    gutter: i32,
    step: i32,
    bg: Color,
    thumb: Color,
    thumb_highlight: Color,
    vert: Option<Thumb>,
    horiz: Option<Thumb>,
    hover: Option<Axis>,
    drag: Option<Axis>,
    last_drag: Point,
}

impl ScrollView {
    pub fn new(config: &UiConfig) -> Self {
        let theme: &Theme = &config.theme;
        Self {
            child: None,
            offset: Point::ORIGIN,
            viewport: Size::ZERO,
            content: Size::ZERO,
            gutter: config.scrollbar_size,
            step: config.scroll_step,
            bg: theme.scroll_bg,
            thumb: theme.scroll_thumb,
            thumb_highlight: theme.scroll_thumb_highlight,
            vert: None,
            horiz: None,
            hover: None,
            drag: None,
            last_drag: Point::ORIGIN,
        }
    }

    pub fn child(&self) -> Option<&ElementRef> {
        self.child.as_ref()
    }

    pub fn set_child(&mut self, child: Option<ElementRef>) {
        self.child = child;
        self.offset = Point::ORIGIN;
        self.drag = None;
        self.hover = None;
        self.refresh();
    }

    pub fn scroll_x(&self) -> i32 {
        self.offset.x
    }

    pub fn scroll_y(&self) -> i32 {
        self.offset.y
    }

    pub fn set_scroll_x(&mut self, x: i32) {
        self.offset.x = x;
        self.refresh();
    }

    pub fn set_scroll_y(&mut self, y: i32) {
        self.offset.y = y;
        self.refresh();
    }

    /// Largest valid horizontal offset.
    pub fn scroll_max_x(&self) -> i32 {
        (self.content.width - self.viewport.width).max(0)
    }

    /// Largest valid vertical offset.
    pub fn scroll_max_y(&self) -> i32 {
        (self.content.height - self.viewport.height).max(0)
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Re-measure the child and clamp the offsets.
    fn refresh(&mut self) {
        self.content = self
            .child
            .as_ref()
            .map_or(Size::ZERO, |child| child.layout_size());
        self.offset.x = self.offset.x.clamp(0, self.scroll_max_x());
        self.offset.y = self.offset.y.clamp(0, self.scroll_max_y());
        self.vert = Thumb::compute(self.viewport.height, self.content.height, self.offset.y);
        self.horiz = Thumb::compute(self.viewport.width, self.content.width, self.offset.x);
    }

    fn set_viewport(&mut self, size: Size) {
        self.viewport = Size::new(
            (size.width - self.gutter).max(0),
            (size.height - self.gutter).max(0),
        );
    }

    fn thumb_rect(&self, axis: Axis) -> Option<Rect> {
        match axis {
            Axis::Vertical => self
                .vert
                .map(|t| Rect::new(self.viewport.width, t.pos, self.gutter, t.size)),
            Axis::Horizontal => self
                .horiz
                .map(|t| Rect::new(t.pos, self.viewport.height, t.size, self.gutter)),
        }
    }

    fn hit_thumb(&self, position: Point) -> Option<Axis> {
        [Axis::Vertical, Axis::Horizontal]
            .into_iter()
            .find(|axis| self.thumb_rect(*axis).is_some_and(|r| r.contains(position)))
    }

    fn thumb_color(&self, axis: Axis) -> Color {
        if self.drag == Some(axis) || self.hover == Some(axis) {
            self.thumb_highlight
        } else {
            self.thumb
        }
    }

    fn drag_to(&mut self, position: Point) {
        let delta = position - self.last_drag;
        self.last_drag = position;
        match self.drag {
            Some(Axis::Vertical) => {
                let factor = self.vert.map_or(0.0, |t| t.factor);
                self.offset.y += (delta.y as f64 * factor) as i32;
            }
            Some(Axis::Horizontal) => {
                let factor = self.horiz.map_or(0.0, |t| t.factor);
                self.offset.x += (delta.x as f64 * factor) as i32;
            }
            None => return,
        }
        self.refresh();
    }
}

impl Widget for ScrollView {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let Some(child) = self.child.clone() else {
            return;
        };

        self.set_viewport(base.size);
        self.refresh();
        child.set_size(self.content);

        frame
            .draw
            .push_clip(Rect::from_origin_size(origin, self.viewport));
        child.set_pos(Point::new(-self.offset.x, -self.offset.y));
        child.draw(frame, origin);
        frame.draw.pop_clip();

        let (vw, vh, g) = (self.viewport.width, self.viewport.height, self.gutter);
        frame
            .draw
            .fill_rect(Rect::new(origin.x + vw, origin.y, g, vh), self.bg);
        frame
            .draw
            .fill_rect(Rect::new(origin.x, origin.y + vh, vw, g), self.bg);

        for axis in [Axis::Vertical, Axis::Horizontal] {
            if let Some(rect) = self.thumb_rect(axis) {
                frame
                    .draw
                    .fill_rect(rect.translate(origin), self.thumb_color(axis));
            }
        }
    }

    fn mouse_event(
        &mut self,
        _base: &mut ElementBase,
        event: &MouseEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        if self.child.is_none() {
            return EventResult::Ignored;
        }
        match event {
            MouseEvent::WheelScrolled { delta, .. } => {
                let (dx, dy) = delta.offset_delta(self.step);
                self.offset = self.offset + Point::new(dx, dy);
                self.refresh();
            }
            MouseEvent::CursorMoved { position } => {
                if self.drag.is_some() {
                    self.drag_to(*position);
                } else {
                    self.hover = self.hit_thumb(*position);
                }
            }
            MouseEvent::ButtonPressed {
                button: MouseButton::Left,
                position,
            } if self.drag.is_none() => {
                let Some(axis) = self.hit_thumb(*position) else {
                    return EventResult::Ignored;
                };
                self.drag = Some(axis);
                self.last_drag = *position;
                cx.capture_mouse();
            }
            MouseEvent::ButtonReleased {
                button: MouseButton::Left,
                position,
            } if self.drag.is_some() => {
                self.drag = None;
                self.hover = self.hit_thumb(*position);
                cx.release_mouse();
            }
            MouseEvent::Leave { .. } => {
                if self.drag.is_none() {
                    self.hover = None;
                }
            }
            _ => return EventResult::Ignored,
        }
        EventResult::Handled
    }

    fn size_changed(&mut self, base: &ElementBase) {
        self.set_viewport(base.size);
        self.refresh();
    }

    fn accepts_input(&self) -> bool {
        self.child.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumb_is_hidden_when_content_fits() {
        assert_eq!(Thumb::compute(100, 100, 0), None);
        assert_eq!(Thumb::compute(100, 40, 0), None);
    }

    #[test]
    fn thumb_geometry() {
        let top = Thumb::compute(100, 500, 0).unwrap();
        assert_eq!(top.size, 20);
        assert_eq!(top.pos, 0);
        assert!((top.factor - 5.0).abs() < 1e-9);

        let bottom = Thumb::compute(100, 500, 400).unwrap();
        assert_eq!(bottom.pos, 80);

        let middle = Thumb::compute(100, 500, 200).unwrap();
        assert_eq!(middle.pos, 40);
    }

    #[test]
    fn offsets_clamp_without_child() {
        let mut view = ScrollView::new(&UiConfig::default());
        view.set_scroll_y(450);
        view.set_scroll_x(-5);
        assert_eq!(view.scroll_y(), 0);
        assert_eq!(view.scroll_x(), 0);
        assert_eq!(view.scroll_max_y(), 0);
    }
}
