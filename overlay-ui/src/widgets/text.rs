//! Static text.

use std::ops::Range;
use std::sync::Arc;

use overlay_font::Font;

use crate::element::{ElementBase, Widget};
use crate::input::Frame;
use crate::primitives::{Color, Point, Rect, Size};

const TAB: &str = "    ";

/// One or more lines of text in a single font and color.
pub struct Text {
    font: Arc<Font>,
    text: String,
    color: Color,
    wrap_width: Option<i32>,
    lines: Vec<Range<usize>>,
    measured: Size,
}

impl std::fmt::Debug for Text {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Text")
            .field("text", &self.text)
            .field("lines", &self.lines)
            .finish_non_exhaustive()
    }
}

impl Text {
    pub fn new(font: Arc<Font>, text: &str, color: Color) -> Self {
        let mut widget = Self {
            font,
            text: String::new(),
            color,
            wrap_width: None,
            lines: Vec::new(),
            measured: Size::ZERO,
        };
        widget.set_text(text);
        widget
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text. Tabs are expanded to four spaces.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.replace('\t', TAB);
        self.relayout();
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn font(&self) -> &Arc<Font> {
        &self.font
    }

    pub fn set_font(&mut self, font: Arc<Font>) {
        self.font = font;
        self.relayout();
    }

    pub fn wrap_width(&self) -> Option<i32> {
        self.wrap_width
    }

    /// Re-break lines to fit `width`, or only at `\n` with `None`.
    pub fn set_wrap_width(&mut self, width: Option<i32>) {
        self.wrap_width = width;
        self.relayout();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|r| &self.text[r.clone()])
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn relayout(&mut self) {
        self.lines = match self.wrap_width {
            Some(width) => self.font.wrap(&self.text, width),
            None => split_lines(&self.text),
        };
        if self.lines.is_empty() {
            self.lines.push(0..0);
        }

        let width = self
            .lines
            .iter()
            .map(|r| self.font.text_width(&self.text[r.clone()]))
            .max()
            .unwrap_or(0);
        let height = self.font.line_spacing() * self.lines.len() as i32 + 2;
        self.measured = Size::new(width, height);
    }
}

fn split_lines(text: &str) -> Vec<Range<usize>> {
    let mut start = 0;
    text.split('\n')
        .map(|line| {
            let range = start..start + line.len();
            start = range.end + 1;
            range
        })
        .collect()
}

impl Widget for Text {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let line_height = self.font.line_spacing();
        frame
            .draw
            .push_clip(Rect::from_origin_size(origin, base.size));
        for (index, range) in self.lines.iter().enumerate() {
            let at = Point::new(origin.x, origin.y + index as i32 * line_height);
            frame
                .draw
                .text(&self.font, at, &self.text[range.clone()], self.color);
        }
        frame.draw.pop_clip();
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(self.measured)
    }
}
