//! Single-line text entry.

use std::sync::Arc;

use overlay_font::Font;

use crate::element::{generic_mouse_event, ElementBase, Widget};
use crate::event::{EventResult, Key, KeyEvent, MouseButton, MouseEvent, NamedKey};
use crate::input::{EventContext, Frame};
use crate::primitives::{Color, Point, Rect, Size};
use crate::theme::Theme;

/// Editable text with a caret.
///
/// The caret is a byte offset that always sits on a character boundary.
/// Every key event is also emitted to handlers by name (`a-down`,
/// `ctrl-enter-up`, ...); Enter additionally emits `submit`.
pub struct TextEntry {
    font: Arc<Font>,
    text: String,
    caret: usize,
    hint: Option<String>,
    readonly: bool,
    pref_width: i32,
    fg: Color,
    bg: Color,
    hint_color: Color,
    border: Color,
    border_focus: Color,
}

impl std::fmt::Debug for TextEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEntry")
            .field("text", &self.text)
            .field("caret", &self.caret)
            .finish_non_exhaustive()
    }
}

impl TextEntry {
    pub fn new(font: Arc<Font>, theme: &Theme) -> Self {
        Self {
            font,
            text: String::new(),
            caret: 0,
            hint: None,
            readonly: false,
            pref_width: 50,
            fg: theme.text,
            bg: theme.entry_bg,
            hint_color: theme.entry_hint,
            border: theme.window_border,
            border_focus: theme.window_border_highlight,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and move the caret to its end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.caret = self.text.len();
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn set_hint(&mut self, hint: Option<&str>) {
        self.hint = hint.map(str::to_string);
    }

    pub fn readonly(&self) -> bool {
        self.readonly
    }

    pub fn set_readonly(&mut self, readonly: bool) {
        self.readonly = readonly;
    }

    pub fn pref_width(&self) -> i32 {
        self.pref_width
    }

    pub fn set_pref_width(&mut self, width: i32) {
        self.pref_width = width;
    }

    pub fn set_color(&mut self, color: Color) {
        self.fg = color;
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.caret]
            .char_indices()
            .next_back()
            .map_or(0, |(i, _)| i)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.caret..]
            .chars()
            .next()
            .map_or(self.caret, |c| self.caret + c.len_utf8())
    }

    fn insert(&mut self, text: &str) {
        let printable: String = text.chars().filter(|c| !c.is_control()).collect();
        self.text.insert_str(self.caret, &printable);
        self.caret += printable.len();
    }

    fn backspace(&mut self) {
        if self.caret > 0 {
            let start = self.prev_boundary();
            self.text.replace_range(start..self.caret, "");
            self.caret = start;
        }
    }

    fn delete(&mut self) {
        let end = self.next_boundary();
        self.text.replace_range(self.caret..end, "");
    }

    /// Apply one key press. Returns true if it was Enter.
    fn edit(&mut self, key: &Key, alt: bool, ctrl: bool, text: Option<&str>) -> bool {
        match key {
            Key::Named(NamedKey::Backspace) if !alt => self.backspace(),
            Key::Named(NamedKey::Delete) if !alt => self.delete(),
            Key::Named(NamedKey::ArrowLeft) => self.caret = self.prev_boundary(),
            Key::Named(NamedKey::ArrowRight) => self.caret = self.next_boundary(),
            Key::Named(NamedKey::Home) => self.caret = 0,
            Key::Named(NamedKey::End) => self.caret = self.text.len(),
            Key::Named(NamedKey::Enter) => return true,
            _ => {
                if let (Some(text), false) = (text, ctrl || alt) {
                    self.insert(text);
                }
            }
        }
        false
    }
}

impl Widget for TextEntry {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let focused = frame.is_focus(base.id());
        let Size { width: w, height: h } = base.size;

        let border = if focused { self.border_focus } else { self.border };
        let outer = Rect::from_origin_size(origin, base.size);
        frame.draw.stroke_rect(outer, border);
        frame.draw.fill_rect(outer.inset(1), self.bg);

        let text_area = Rect::new(origin.x + 2, origin.y + 3, w - 4, h - 6);
        frame.draw.push_clip(Rect::new(
            text_area.x,
            text_area.y,
            text_area.width + 1,
            text_area.height + 1,
        ));
        if !self.text.is_empty() {
            frame
                .draw
                .text(&self.font, text_area.origin(), &self.text, self.fg);
        } else if let Some(hint) = &self.hint {
            frame
                .draw
                .text(&self.font, text_area.origin(), hint, self.hint_color);
        }
        frame.draw.pop_clip();

        if focused && !self.readonly {
            let caret_x = self.font.text_width(&self.text[..self.caret]);
            frame.draw.fill_rect(
                Rect::new(text_area.x + caret_x, text_area.y, 2, text_area.height),
                self.fg,
            );
        }
    }

    fn mouse_event(
        &mut self,
        base: &mut ElementBase,
        event: &MouseEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        if let MouseEvent::ButtonPressed { button: MouseButton::Left, .. } = event {
            if !self.readonly {
                cx.set_focus();
            }
        }
        generic_mouse_event(base, event, cx)
    }

    fn key_event(
        &mut self,
        _base: &mut ElementBase,
        event: &KeyEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        if let (KeyEvent::Pressed { key, modifiers, text }, false) = (event, self.readonly) {
            if self.edit(key, modifiers.alt, modifiers.ctrl, text.as_deref()) {
                cx.emit("submit");
            }
        }
        cx.emit(&event.event_name());
        EventResult::Handled
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(Size::new(self.pref_width, self.font.line_spacing() + 6))
    }

    fn accepts_input(&self) -> bool {
        true
    }
}
