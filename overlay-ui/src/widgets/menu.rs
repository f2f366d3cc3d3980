//! Popup menus.
//!
//! A [`Menu`] is a vertical list of [`MenuItem`]s. A root menu is shown as a
//! top-level element holding the mouse capture, which lets it see presses
//! anywhere on screen and hide itself when one lands outside the menu chain.
//! Submenus are drawn by their parent menu at an absolute position set when
//! the owning item is hovered.

use std::sync::{Arc, Weak};

use overlay_font::Font;
use tracing::warn;

use crate::context::UiContext;
use crate::element::{Element, ElementBase, ElementRef, Widget};
use crate::event::{EventResult, MouseButton, MouseEvent};
use crate::input::{EventContext, Frame};
use crate::layout::{Align, BoxLayout, Orientation};
use crate::primitives::{Color, Point, Rect, Size};
use crate::theme::Theme;

/// Icon name drawn at the end of items that open a submenu.
pub const SUBMENU_ICON: &str = "chevron_right";

#[derive(Debug)]
pub struct Menu {
    items: BoxLayout,
    bg: Color,
    border: Color,
    submenu: bool,
    open_submenu: Option<ElementRef>,
    last_rect: Rect,
}

impl Menu {
    pub fn new(theme: &Theme) -> Self {
        Self {
            items: BoxLayout::new(Orientation::Vertical),
            bg: theme.menu_bg,
            border: theme.menu_border,
            submenu: false,
            open_submenu: None,
            last_rect: Rect::default(),
        }
    }

    pub fn item_count(&self) -> usize {
        self.items.item_count()
    }

    pub fn items(&self) -> impl Iterator<Item = &ElementRef> {
        self.items.items().map(|i| &i.element)
    }

    pub fn is_submenu(&self) -> bool {
        self.submenu
    }

    pub fn open_submenu(&self) -> Option<&ElementRef> {
        self.open_submenu.as_ref()
    }

    /// Close the open submenu and everything it has open.
    pub fn close_submenus(&mut self) {
        if let Some(sub) = self.open_submenu.take() {
            sub.with_menu(Menu::close_submenus);
        }
    }

    /// Whether `point` (screen space) lies in this menu or any open submenu,
    /// as of the last drawn frame.
    pub fn contains_point(&self, point: Point) -> bool {
        self.last_rect.contains(point)
            || self
                .open_submenu
                .as_ref()
                .and_then(|sub| sub.with_menu(|m| m.contains_point(point)))
                .unwrap_or(false)
    }

    fn measure(&self) -> Size {
        let items = self.items.measure();
        Size::new(items.width + 2, items.height + 2)
    }

    /// Append `item` to `menu`. Returns false unless `menu` is a menu and
    /// `item` a menu item.
    pub fn add_item(menu: &ElementRef, item: &ElementRef) -> bool {
        let parent = Arc::downgrade(menu);
        if item.with_menu_item(|mi| mi.parent_menu = parent).is_none() {
            warn!(kind = item.kind_name(), "only menu items can be added to a menu");
            return false;
        }
        menu.with_menu(|m| m.items.push_back(item, Align::Fill, false))
            .is_some()
    }

    /// Append a horizontal separator line, wrapped in a disabled item.
    pub fn add_separator(menu: &ElementRef, ui: &UiContext) -> ElementRef {
        let line = ui.separator(Orientation::Horizontal);
        let item = ui.menu_item(Some(&line), None);
        item.with_menu_item(|mi| mi.set_enabled(false));
        Menu::add_item(menu, &item);
        item
    }

    /// Show `menu` at screen position (`x`, `y`) as a top-level element that
    /// holds the mouse capture.
    pub fn show(menu: &ElementRef, ui: &UiContext, x: i32, y: i32) {
        let at = Point::new(x, y);
        menu.set_pos(at);
        menu.with_menu(|m| {
            m.submenu = false;
            m.close_submenus();
        });
        menu.set_size(menu.layout_size());
        ui.add_top_level(menu);
        ui.capture_mouse_at(menu, at);
    }

    /// Close submenus, release the capture and stop drawing `menu`.
    pub fn hide(menu: &ElementRef, ui: &UiContext) {
        menu.with_menu(Menu::close_submenus);
        ui.release_mouse(menu);
        ui.remove_top_level(menu);
    }
}

impl Widget for Menu {
    fn fit(&mut self, base: &mut ElementBase) {
        base.size = base.constrain(self.measure());
    }

    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let size = base.size;
        let rect = Rect::from_origin_size(origin, size);
        self.last_rect = rect;
        frame.draw.fill_rect(rect, self.bg);
        frame.draw.stroke_rect(rect, self.border);

        let mut inner = ElementBase::default();
        inner.size = Size::new(size.width - 2, size.height - 2);
        self.items.draw(&mut inner, frame, origin + Point::new(1, 1));

        if let Some(sub) = &self.open_submenu {
            sub.draw(frame, Point::ORIGIN);
        }
    }

    fn mouse_event(
        &mut self,
        _base: &mut ElementBase,
        event: &MouseEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        if event.is_press() && !self.contains_point(cx.last_mouse()) {
            self.close_submenus();
            cx.release_mouse();
            if let Some(element) = cx.element() {
                cx.remove_top_level(&element);
            }
            cx.emit("hide");
        }
        EventResult::Ignored
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(self.measure())
    }

    fn accepts_input(&self) -> bool {
        !self.submenu
    }
}

/// One row of a menu: an optional icon glyph, a label element and an
/// optional submenu arrow.
pub struct MenuItem {
    child: Option<ElementRef>,
    icon: Option<String>,
    icon_font: Arc<Font>,
    icon_color: Color,
    icon_size: i32,
    post_size: i32,
    submenu: Option<ElementRef>,
    arrow: Option<String>,
    parent_menu: Weak<Element>,
    hover: bool,
    pressed: Vec<MouseButton>,
    enabled: bool,
    hover_color: Color,
    highlight_color: Color,
}

impl std::fmt::Debug for MenuItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuItem")
            .field("icon", &self.icon)
            .field("enabled", &self.enabled)
            .field("hover", &self.hover)
            .finish_non_exhaustive()
    }
}

impl MenuItem {
    pub fn new(child: Option<ElementRef>, icon_font: Arc<Font>, theme: &Theme) -> Self {
        let icon_size = icon_font.line_spacing();
        Self {
            child,
            icon: None,
            icon_font,
            icon_color: theme.text,
            icon_size,
            post_size: 20,
            submenu: None,
            arrow: None,
            parent_menu: Weak::new(),
            hover: false,
            pressed: Vec::new(),
            enabled: true,
            hover_color: theme.menu_item_hover,
            highlight_color: theme.menu_item_highlight,
        }
    }

    pub fn child(&self) -> Option<&ElementRef> {
        self.child.as_ref()
    }

    pub fn set_child(&mut self, child: Option<ElementRef>) {
        self.child = child;
    }

    /// Glyph drawn when the item has a submenu.
    pub fn arrow(&self) -> Option<&str> {
        self.arrow.as_deref()
    }

    pub fn set_arrow(&mut self, arrow: Option<&str>) {
        self.arrow = arrow.map(str::to_string);
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_deref()
    }

    /// Icon text, drawn with the icon font.
    pub fn set_icon(&mut self, icon: Option<&str>) {
        self.icon = icon.map(str::to_string);
    }

    pub fn set_icon_color(&mut self, color: Color) {
        self.icon_color = color;
    }

    pub fn submenu(&self) -> Option<&ElementRef> {
        self.submenu.as_ref()
    }

    pub fn set_submenu(&mut self, submenu: Option<ElementRef>) {
        self.submenu = submenu;
    }

    pub fn parent_menu(&self) -> Option<ElementRef> {
        self.parent_menu.upgrade()
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.hover = false;
            self.pressed.clear();
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.hover
    }

    fn measure(&self) -> Size {
        let icon = self.icon_size;
        let Some(child) = &self.child else {
            return Size::new(10 + icon + self.post_size, icon + 4);
        };
        let size = child.layout_size();
        let is_separator = child.with_separator(|_| ()).is_some();
        let height = size.height + 4;
        let height = if height > icon || is_separator {
            height
        } else {
            icon + 4
        };
        Size::new(size.width + 10 + icon + self.post_size, height)
    }

    /// Open this item's submenu beside it, or close the parent's open
    /// submenu if it has none.
    fn open_submenu(&self, cx: &mut EventContext<'_>, width: i32) {
        let parent = self.parent_menu.clone();
        let submenu = self.submenu.clone();
        let at = cx.offset() + Point::new(width - 10, 0);
        cx.defer(move |_| {
            let Some(parent) = parent.upgrade() else {
                return;
            };
            if let Some(sub) = &submenu {
                sub.set_pos(at);
                sub.with_menu(|m| {
                    m.submenu = true;
                    m.close_submenus();
                });
            }
            parent.with_menu(|m| {
                let same = match (&m.open_submenu, &submenu) {
                    (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                    _ => false,
                };
                if !same {
                    m.close_submenus();
                }
                m.open_submenu = submenu;
            });
        });
    }
}

impl Widget for MenuItem {
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point) {
        let Size { width: w, height: h } = base.size;
        let rect = Rect::from_origin_size(origin, base.size);

        if !self.pressed.is_empty() {
            frame.draw.fill_rect(rect, self.highlight_color);
        } else if self.hover {
            frame.draw.fill_rect(rect, self.hover_color);
        }

        frame.draw.push_clip(rect);
        if let Some(icon) = &self.icon {
            frame.draw.text(
                &self.icon_font,
                origin + Point::new(5, 2),
                icon,
                self.icon_color,
            );
        }
        if let Some(child) = &self.child {
            let size = child.layout_size();
            child.set_size(Size::new(
                (w - 10 - self.icon_size - self.post_size).max(0),
                size.height,
            ));
            child.set_pos(Point::new(5 + self.icon_size, h / 2 - size.height / 2));
            child.draw(frame, origin);
        }
        if let (Some(_), Some(arrow)) = (&self.submenu, &self.arrow) {
            frame.draw.text(
                &self.icon_font,
                origin + Point::new(w - self.post_size, 2),
                arrow,
                self.icon_color,
            );
        }
        frame.draw.pop_clip();
    }

    fn mouse_event(
        &mut self,
        base: &mut ElementBase,
        event: &MouseEvent,
        cx: &mut EventContext<'_>,
    ) -> EventResult {
        if !self.enabled {
            return EventResult::Handled;
        }
        match event {
            MouseEvent::Enter { .. } => {
                self.hover = true;
                cx.emit("enter");
                self.open_submenu(cx, base.size.width);
            }
            MouseEvent::Leave { .. } => {
                self.hover = false;
                self.pressed.clear();
                cx.emit("leave");
            }
            MouseEvent::ButtonPressed { button, .. } => {
                if !self.pressed.contains(button) {
                    self.pressed.push(*button);
                }
            }
            MouseEvent::ButtonReleased { button, position } => {
                let was_pressed = self.pressed.contains(button);
                self.pressed.retain(|b| b != button);
                if was_pressed && base.local_rect().contains(*position) {
                    cx.emit(&format!("click-{}", button.name()));
                }
            }
            MouseEvent::CursorMoved { .. } | MouseEvent::WheelScrolled { .. } => {}
        }
        EventResult::Handled
    }

    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        Some(self.measure())
    }

    fn accepts_input(&self) -> bool {
        true
    }
}
