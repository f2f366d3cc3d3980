//! Top-level windows with an optional titlebar.

use std::sync::Arc;

use overlay_font::Font;
use tracing::{debug, warn};

use crate::element::{ElementBase, ElementKind, ElementRef, Widget};
use crate::event::{EventResult, MouseButton, MouseEvent};
use crate::input::{EventContext, Frame};
use crate::primitives::{Color, Point, Rect, Size};
use crate::settings::SettingsStore;
use crate::theme::UiConfig;

/// Which window edges the pointer is over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Edges {
    titlebar: bool,
    left: bool,
    right: bool,
    bottom: bool,
}

impl Edges {
    fn any_resize(&self) -> bool {
        self.left || self.right || self.bottom
    }
}

/// A movable frame around one child.
///
/// Dragging the titlebar moves the window; dragging the left, right or
/// bottom edge resizes a resizable one. A window that is not resizable
/// follows its child's preferred size.
pub struct Window {
    title: Option<String>,
    font: Arc<Font>,
    child: Option<ElementRef>,
    resizable: bool,
    border: Color,
    border_highlight: Color,
    title_color: Color,
    min_size: i32,
    resize_margin: i32,
    hover: Edges,
    moving: bool,
    resizing: bool,
    last_mouse: Point,
    settings: Option<(Arc<SettingsStore>, String)>,
    resized: bool,
}

impl std::fmt::Debug for Window {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Window")
            .field("title", &self.title)
            .field("resizable", &self.resizable)
            .field("moving", &self.moving)
            .field("resizing", &self.resizing)
            .finish_non_exhaustive()
    }
}

impl Window {
    pub fn new(title: Option<&str>, font: Arc<Font>, config: &UiConfig) -> Self {
        Self {
            title: title.map(str::to_string),
            font,
            child: None,
            resizable: false,
            border: config.theme.window_border,
            border_highlight: config.theme.window_border_highlight,
            title_color: config.theme.text,
            min_size: config.window_min_size,
            resize_margin: config.window_resize_margin,
            hover: Edges::default(),
            moving: false,
            resizing: false,
            last_mouse: Point::ORIGIN,
            settings: None,
            resized: false,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: Option<&str>) {
        self.title = title.map(str::to_string);
    }

    pub fn child(&self) -> Option<&ElementRef> {
        self.child.as_ref()
    }

    pub fn set_child(&mut self, child: Option<ElementRef>) {
        self.child = child;
    }

    pub fn resizable(&self) -> bool {
        self.resizable
    }

    pub fn set_resizable(&mut self, resizable: bool) {
        self.resizable = resizable;
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    pub fn is_resizing(&self) -> bool {
        self.resizing
    }

    pub fn titlebar_height(&self) -> i32 {
        if self.title.is_some() {
            self.font.line_spacing() + 2
        } else {
            0
        }
    }

    /// Persist geometry under `path` (`<path>.x`, `.y`, `.width`, `.height`),
    /// loading whatever is already stored. Returns false if `element` is
    /// not a window.
    pub fn bind_settings(element: &ElementRef, settings: Arc<SettingsStore>, path: &str) -> bool {
        element.with_state(|base, kind| {
            let ElementKind::Window(window) = kind else {
                return false;
            };
            let get = |field: &str| {
                settings
                    .get_i64(&format!("{path}.{field}"))
                    .and_then(|v| i32::try_from(v).ok())
            };
            if let Some(x) = get("x") {
                base.pos.x = x;
            }
            if let Some(y) = get("y") {
                base.pos.y = y;
            }
            if let Some(width) = get("width") {
                base.size.width = width;
            }
            if let Some(height) = get("height") {
                base.size.height = height;
            }
            debug!(path, pos = ?base.pos, size = ?base.size, "window settings bound");
            window.settings = Some((settings.clone(), path.to_string()));
            true
        })
    }

    /// Copy the geometry into the bound store without writing it. Returns
    /// the store when anything changed.
    fn stage_geometry(&self, base: &ElementBase) -> Option<Arc<SettingsStore>> {
        let (settings, path) = self.settings.as_ref()?;
        let fields = [
            ("x", base.pos.x),
            ("y", base.pos.y),
            ("width", base.size.width),
            ("height", base.size.height),
        ];
        let mut changed = false;
        for (field, value) in fields {
            match settings.stage(&format!("{path}.{field}"), value) {
                Ok(staged) => changed |= staged,
                Err(err) => {
                    warn!(path, %err, "failed to store window geometry");
                    return None;
                }
            }
        }
        changed.then(|| settings.clone())
    }

    fn update_hover(&mut self, size: Size, p: Point) {
        let (w, h, m) = (size.width, size.height, self.resize_margin);
        let within_height = p.y >= 0 && p.y <= h;

        let titlebar = self.title.is_some()
            && Rect::new(0, 0, w + 1, self.titlebar_height() + 1).contains(p);
        if titlebar || !self.moving {
            self.hover.titlebar = titlebar;
        }

        let right = !self.hover.titlebar && self.resizable && p.x >= w - m && p.x <= w && within_height;
        let left = !self.hover.titlebar && self.resizable && p.x >= 0 && p.x <= m && within_height;
        let bottom = self.resizable && p.x >= 0 && p.x < w && p.y >= h - m && p.y <= h;
        if right || !self.resizing {
            self.hover.right = right;
        }
        if left || !self.resizing {
            self.hover.left = left;
        }
        if bottom || !self.resizing {
            self.hover.bottom = bottom;
        }
    }

    fn drag(&mut self, base: &mut ElementBase, delta: Point) {
        if self.moving {
            base.pos = base.pos + delta;
        } else if self.resizing {
            if self.hover.left {
                base.pos.x += delta.x;
                base.size.width -= delta.x;
            }
            if self.hover.right {
                base.size.width += delta.x;
            }
            if self.hover.bottom {
                base.size.height += delta.y;
            }
            base.size.width = base.size.width.max(self.min_size);
            base.size.height = base.size.height.max(self.min_size);
        }
    }

    fn edge_color(&self, hovered: bool) -> Color {
        if hovered {
            self.border_highlight
        } else {
            self.border
        }
    }

    fn draw_decorations(&self, frame: &mut Frame<'_>, origin: Point, size: Size) {
        let Size { width: w, height: h } = size;
        let (x, y) = (origin.x, origin.y);
        let edge = |hovered: bool| if hovered { 3 } else { 1 };

        let left = edge(self.hover.left);
        let right = edge(self.hover.right);
        let bottom = edge(self.hover.bottom);
        frame
            .draw
            .fill_rect(Rect::new(x, y, left, h), self.edge_color(self.hover.left));
        frame.draw.fill_rect(
            Rect::new(x, y + h - bottom, w, bottom),
            self.edge_color(self.hover.bottom),
        );
        frame.draw.fill_rect(
            Rect::new(x + w - right, y, right, h),
            self.edge_color(self.hover.right),
        );

        let title_color = self.edge_color(self.hover.titlebar);
        let Some(title) = &self.title else {
            frame.draw.fill_rect(Rect::new(x, y, w, 1), title_color);
            return;
        };

        let bar = self.titlebar_height();
        frame.draw.fill_rect(Rect::new(x, y, w, bar), title_color);

        let caption = Rect::new(x + 3, y + 1, w - 6, bar);
        let text_y = caption.y + bar / 2 - self.font.line_spacing() / 2;
        frame.draw.push_clip(caption);
        frame
            .draw
            .text(&self.font, Point::new(caption.x, text_y), title, self.title_color);
        frame.draw.pop_clip();
    }
}

impl Widget for Window {
    fn fit(&mut self, base: &mut ElementBase) {
        let before = base.size;
        if let (false, Some(child)) = (self.resizable, &self.child) {
            let preferred = child.layout_size();
            let chrome = if self.title.is_some() {
                self.titlebar_height() + 3
            } else {
                4
            };
            base.size = Size::new(preferred.width + 4, preferred.height + chrome);
        }
        base.size = base.constrain(base.size);
        self.resized |= base.size != before;
    }

    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        if std::mem::take(&mut self.resized) {
            if let Some(settings) = self.stage_geometry(base) {
                frame.save_later(&settings);
            }
        }

        let bar = self.titlebar_height();
        self.draw_decorations(frame, origin, base.size);

        if let Some(child) = &self.child {
            let (top, chrome) = if self.title.is_some() { (bar, bar + 3) } else { (2, 4) };
            let size = Size::new(base.size.width - 4, base.size.height - chrome);
            child.set_size(size);
            child.set_pos(Point::new(2, top));

            frame
                .draw
                .push_clip(Rect::from_origin_size(origin + Point::new(2, top), size));
            child.draw(frame, origin);
            frame.draw.pop_clip();
        }
    }

    fn mouse_event(
        &mut self,
        base: &mut ElementBase,
        event: &MouseEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        let pointer = cx.last_mouse();
        match event {
            MouseEvent::CursorMoved { position } => {
                self.update_hover(base.size, *position);
                let delta = pointer - self.last_mouse;
                self.drag(base, delta);
                self.last_mouse = pointer;
            }
            MouseEvent::Leave { .. } => {
                if !self.moving {
                    self.hover.titlebar = false;
                }
                if !self.resizing {
                    self.hover.left = false;
                    self.hover.right = false;
                    self.hover.bottom = false;
                }
            }
            MouseEvent::ButtonPressed { button, .. } => {
                cx.move_to_top();
                if *button == MouseButton::Left && !self.moving && !self.resizing {
                    if self.hover.titlebar {
                        self.moving = true;
                    } else if self.hover.any_resize() {
                        self.resizing = true;
                    }
                    if self.moving || self.resizing {
                        self.last_mouse = pointer;
                        cx.capture_mouse();
                    }
                }
            }
            MouseEvent::ButtonReleased {
                button: MouseButton::Left,
                ..
            } if self.moving || self.resizing => {
                self.moving = false;
                self.resizing = false;
                cx.release_mouse();
                if let Some(settings) = self.stage_geometry(base) {
                    cx.save_later(&settings);
                }
            }
            _ => {}
        }
        EventResult::Handled
    }

    fn accepts_input(&self) -> bool {
        true
    }
}
