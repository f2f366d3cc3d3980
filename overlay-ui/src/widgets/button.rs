//! Push buttons and checkboxes.

use crate::element::{ElementBase, ElementRef, Widget};
use crate::event::{EventResult, MouseButton, MouseEvent};
use crate::input::{EventContext, Frame};
use crate::primitives::{Color, Point, Rect, Size};
use crate::theme::Theme;

/// A clickable frame around an optional child.
///
/// Emits `enter`, `leave` and `click-<button>`; a checkbox also toggles its
/// state and emits `toggle-on` or `toggle-off`.
#[derive(Debug)]
pub struct Button {
    child: Option<ElementRef>,
    checkbox: Option<i32>,
    toggled: bool,
    bg: Color,
    bg_hover: Color,
    bg_highlight: Color,
    border: Color,
    border_width: i32,
    hover: bool,
    /// The button that started the current press.
    held: Option<MouseButton>,
}

impl Button {
    pub fn new(theme: &Theme) -> Self {
        Self {
            child: None,
            checkbox: None,
            toggled: false,
            bg: theme.button_bg,
            bg_hover: theme.button_bg_hover,
            bg_highlight: theme.button_bg_highlight,
            border: theme.button_border,
            border_width: 1,
            hover: false,
            held: None,
        }
    }

    /// A toggle button with a fixed square preferred size.
    pub fn checkbox(theme: &Theme, size: i32) -> Self {
        Self {
            checkbox: Some(size),
            ..Self::new(theme)
        }
    }

    pub fn child(&self) -> Option<&ElementRef> {
        self.child.as_ref()
    }

    pub fn set_child(&mut self, child: Option<ElementRef>) {
        self.child = child;
    }

    pub fn is_checkbox(&self) -> bool {
        self.checkbox.is_some()
    }

    pub fn toggled(&self) -> bool {
        self.toggled
    }

    pub fn set_toggled(&mut self, toggled: bool) {
        self.toggled = toggled;
    }

    pub fn set_bg(&mut self, bg: Color) {
        self.bg = bg;
    }

    pub fn set_border_width(&mut self, width: i32) {
        self.border_width = width.max(0);
    }

    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    pub fn is_highlighted(&self) -> bool {
        self.held.is_some()
    }

    fn background(&self) -> Color {
        if self.held.is_some() {
            self.bg_highlight
        } else if self.hover {
            self.bg_hover
        } else if self.toggled {
            self.border
        } else {
            self.bg
        }
    }
}

impl Widget for Button {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let b = self.border_width;
        let Size { width, height } = base.size;
        let inner = Rect::new(origin.x + b, origin.y + b, width - 2 * b, height - 2 * b);

        if b > 0 {
            frame.draw.fill_rect(Rect::new(origin.x, origin.y, width, b), self.border);
            frame
                .draw
                .fill_rect(Rect::new(origin.x, origin.y + height - b, width, b), self.border);
            frame.draw.fill_rect(Rect::new(origin.x, origin.y, b, height), self.border);
            frame
                .draw
                .fill_rect(Rect::new(origin.x + width - b, origin.y, b, height), self.border);
        }
        frame.draw.fill_rect(inner, self.background());

        if let Some(child) = &self.child {
            child.set_size(inner.size());
            child.set_pos(Point::new(b, b));
            child.draw(frame, origin);
        }
    }

    fn mouse_event(
        &mut self,
        base: &mut ElementBase,
        event: &MouseEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        match event {
            MouseEvent::Enter { .. } => {
                self.hover = true;
                cx.emit("enter");
            }
            MouseEvent::Leave { .. } => {
                self.hover = false;
                cx.emit("leave");
            }
            MouseEvent::ButtonPressed { button, .. } => {
                if self.held.is_none() {
                    self.held = Some(*button);
                    cx.capture_mouse();
                }
            }
            MouseEvent::ButtonReleased { button, position } => {
                if self.held != Some(*button) {
                    return EventResult::Handled;
                }
                self.held = None;
                cx.release_mouse();
                if base.local_rect().contains(*position) {
                    cx.emit(&format!("click-{}", button.name()));
                    if self.checkbox.is_some() {
                        self.toggled = !self.toggled;
                        cx.emit(if self.toggled { "toggle-on" } else { "toggle-off" });
                    }
                }
            }
            MouseEvent::CursorMoved { .. } | MouseEvent::WheelScrolled { .. } => {
                return EventResult::Ignored;
            }
        }
        EventResult::Handled
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        if let Some(size) = self.checkbox {
            return Some(Size::new(size, size));
        }
        let child = self.child.as_ref()?.layout_size();
        Some(Size::new(
            child.width + 2 * self.border_width,
            child.height + 2 * self.border_width,
        ))
    }

    fn accepts_input(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn background_priority() {
        let theme = Theme::default();
        let mut button = Button::checkbox(&theme, 16);
        assert_eq!(button.background(), theme.button_bg);
        button.set_toggled(true);
        assert_eq!(button.background(), theme.button_border);
        button.hover = true;
        assert_eq!(button.background(), theme.button_bg_hover);
        button.held = Some(MouseButton::Left);
        assert_eq!(button.background(), theme.button_bg_highlight);
    }

    #[test]
    fn checkbox_is_square() {
        let button = Button::checkbox(&Theme::default(), 16);
        assert!(button.is_checkbox());
        assert_eq!(
            button.preferred_size(&ElementBase::default()),
            Some(Size::new(16, 16))
        );
        assert_eq!(Button::new(&Theme::default()).preferred_size(&ElementBase::default()), None);
    }
}
