//! Element model.
//!
//! Every node in the UI tree is an [`Element`]: shared geometry and colors in
//! an [`ElementBase`] plus one [`ElementKind`] variant that supplies drawing,
//! input handling, preferred size and teardown through the [`Widget`] trait.
//!
//! Elements are shared as [`ElementRef`] (`Arc<Element>`). Containers own their
//! children; the input router only ever holds weak references. When the last
//! strong reference goes away the element's id is pushed to a retire queue so
//! the router drops any hover, capture, focus or hit-test entry for it before
//! the next dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use crate::event::{EventResult, KeyEvent, MouseButton, MouseEvent};
use crate::input::{EventContext, Frame};
use crate::layout::{BoxLayout, Grid};
use crate::primitives::{Color, Point, Rect, Size};
use crate::widgets::{
    Button, Image, Menu, MenuItem, Polyline, ScrollView, Separator, Text, TextEntry, Window,
};

/// Shared handle to an element.
pub type ElementRef = Arc<Element>;

/// An event handler, invoked with the event name.
pub type EventHandler = Arc<dyn Fn(&str) + Send + Sync>;

static ELEMENT_ID_COUNTER: AtomicU64 = AtomicU64::new(1);
static HANDLER_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u64);

impl ElementId {
    /// Create a new unique element ID.
    pub fn new() -> Self {
        Self(ELEMENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifies a registered event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(pub u64);

impl HandlerId {
    fn next() -> Self {
        Self(HANDLER_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Ids of elements that have been dropped since the router last looked.
#[derive(Debug, Default)]
pub(crate) struct RetireQueue {
    ids: Mutex<Vec<ElementId>>,
}

impl RetireQueue {
    fn push(&self, id: ElementId) {
        self.ids.lock().unwrap_or_else(PoisonError::into_inner).push(id);
    }

    pub(crate) fn drain(&self) -> Vec<ElementId> {
        std::mem::take(&mut *self.ids.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Geometry and colors common to every element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBase {
    id: ElementId,
    /// Position relative to the parent's origin.
    pub pos: Point,
    pub size: Size,
    pub min_size: Size,
    /// Zero in either dimension means unbounded.
    pub max_size: Size,
    pub bg_color: Color,
    pub border_color: Color,
    /// Register for hit testing and emit the generic pointer events.
    pub events: bool,
    pub(crate) pressed: Vec<MouseButton>,
}

impl Default for ElementBase {
    fn default() -> Self {
        Self {
            id: ElementId(0),
            pos: Point::ORIGIN,
            size: Size::ZERO,
            min_size: Size::ZERO,
            max_size: Size::ZERO,
            bg_color: Color::TRANSPARENT,
            border_color: Color::TRANSPARENT,
            events: false,
            pressed: Vec::new(),
        }
    }
}

impl ElementBase {
    /// Id of the owning element.
    pub fn id(&self) -> ElementId {
        self.id
    }

    /// Bounds in the parent's coordinate space.
    pub fn rect(&self) -> Rect {
        Rect::from_origin_size(self.pos, self.size)
    }

    /// Bounds in local coordinates.
    pub fn local_rect(&self) -> Rect {
        Rect::from_origin_size(Point::ORIGIN, self.size)
    }

    /// Clamp `size` to the min/max bounds.
    pub fn constrain(&self, size: Size) -> Size {
        let mut width = size.width.max(self.min_size.width);
        let mut height = size.height.max(self.min_size.height);
        if self.max_size.width > 0 {
            width = width.min(self.max_size.width);
        }
        if self.max_size.height > 0 {
            height = height.min(self.max_size.height);
        }
        Size::new(width, height)
    }
}

/// Behavior supplied by an element variant.
///
/// Positions in mouse events are local to the element's top-left corner.
pub trait Widget: Send {
    /// Paint the variant. Background, border and hit registration are
    /// already done by [`Element::draw`].
    fn draw(&mut self, base: &mut ElementBase, frame: &mut Frame<'_>, origin: Point);

    fn mouse_event(
        &mut self,
        _base: &mut ElementBase,
        _event: &MouseEvent,
        _cx: &mut EventContext<'_>,
    ) -> EventResult {
        EventResult::Ignored
    }

    fn key_event(
        &mut self,
        _base: &mut ElementBase,
        _event: &KeyEvent,
        _cx: &mut EventContext<'_>,
    ) -> EventResult {
        EventResult::Ignored
    }

    /// `None` when the variant has no opinion; callers then use the size
    /// they impose.
    fn preferred_size(&self, _base: &ElementBase) -> Option<Size> {
        None
    }

    fn size_changed(&mut self, _base: &ElementBase) {}

    /// Runs at the start of every draw, before the background and hit
    /// registration. Self-sizing variants settle `base.size` here.
    fn fit(&mut self, _base: &mut ElementBase) {}

    /// Whether the variant handles pointer input itself.
    fn accepts_input(&self) -> bool {
        false
    }

    /// Runs once, when the element is dropped.
    fn teardown(&mut self) {}
}

/// The concrete element variants.
pub enum ElementKind {
    Window(Window),
    Box(BoxLayout),
    Grid(Grid),
    ScrollView(ScrollView),
    Button(Button),
    Text(Text),
    Entry(TextEntry),
    Menu(Menu),
    MenuItem(MenuItem),
    Separator(Separator),
    Image(Image),
    Polyline(Polyline),
}

macro_rules! kind_dispatch {
    ($kind:expr, $w:ident => $body:expr) => {
        match $kind {
            ElementKind::Window($w) => $body,
            ElementKind::Box($w) => $body,
            ElementKind::Grid($w) => $body,
            ElementKind::ScrollView($w) => $body,
            ElementKind::Button($w) => $body,
            ElementKind::Text($w) => $body,
            ElementKind::Entry($w) => $body,
            ElementKind::Menu($w) => $body,
            ElementKind::MenuItem($w) => $body,
            ElementKind::Separator($w) => $body,
            ElementKind::Image($w) => $body,
            ElementKind::Polyline($w) => $body,
        }
    };
}

impl ElementKind {
    pub fn widget(&self) -> &dyn Widget {
        kind_dispatch!(self, w => w as &dyn Widget)
    }

    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        kind_dispatch!(self, w => w as &mut dyn Widget)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Window(_) => "window",
            ElementKind::Box(_) => "box",
            ElementKind::Grid(_) => "grid",
            ElementKind::ScrollView(_) => "scrollview",
            ElementKind::Button(_) => "button",
            ElementKind::Text(_) => "text",
            ElementKind::Entry(_) => "entry",
            ElementKind::Menu(_) => "menu",
            ElementKind::MenuItem(_) => "menuitem",
            ElementKind::Separator(_) => "separator",
            ElementKind::Image(_) => "image",
            ElementKind::Polyline(_) => "polyline",
        }
    }
}

/// Lock-protected element contents.
pub struct ElementState {
    pub base: ElementBase,
    pub kind: ElementKind,
}

/// A node in the UI tree.
pub struct Element {
    id: ElementId,
    state: Mutex<ElementState>,
    handlers: Mutex<IndexMap<HandlerId, EventHandler>>,
    retired: Arc<RetireQueue>,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element").field("id", &self.id).finish_non_exhaustive()
    }
}

macro_rules! typed_access {
    ($(#[$doc:meta])* $name:ident, $variant:ident, $ty:ty) => {
        $(#[$doc])*
        pub fn $name<R>(&self, f: impl FnOnce(&mut $ty) -> R) -> Option<R> {
            match &mut self.lock().kind {
                ElementKind::$variant(w) => Some(f(w)),
                _ => None,
            }
        }
    };
}

impl Element {
    pub(crate) fn new(mut base: ElementBase, kind: ElementKind, retired: Arc<RetireQueue>) -> ElementRef {
        let id = ElementId::new();
        base.id = id;
        Arc::new(Self {
            id,
            state: Mutex::new(ElementState { base, kind }),
            handlers: Mutex::new(IndexMap::new()),
            retired,
        })
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    fn lock(&self) -> MutexGuard<'_, ElementState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn handlers(&self) -> MutexGuard<'_, IndexMap<HandlerId, EventHandler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` with the element's base and variant.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut ElementBase, &mut ElementKind) -> R) -> R {
        let mut state = self.lock();
        let ElementState { base, kind } = &mut *state;
        f(base, kind)
    }

    pub fn kind_name(&self) -> &'static str {
        self.lock().kind.name()
    }

    // =====================================================================
    // Geometry and colors
    // =====================================================================

    pub fn pos(&self) -> Point {
        self.lock().base.pos
    }

    pub fn set_pos(&self, pos: Point) {
        self.lock().base.pos = pos;
    }

    pub fn size(&self) -> Size {
        self.lock().base.size
    }

    /// Set the size, notifying the variant if it changed.
    pub fn set_size(&self, size: Size) {
        let mut state = self.lock();
        if state.base.size == size {
            return;
        }
        state.base.size = size;
        let ElementState { base, kind } = &mut *state;
        kind.widget_mut().size_changed(base);
    }

    pub fn set_width(&self, width: i32) {
        let height = self.size().height;
        self.set_size(Size::new(width, height));
    }

    pub fn set_height(&self, height: i32) {
        let width = self.size().width;
        self.set_size(Size::new(width, height));
    }

    pub fn min_size(&self) -> Size {
        self.lock().base.min_size
    }

    pub fn set_min_size(&self, size: Size) {
        self.lock().base.min_size = size;
    }

    pub fn max_size(&self) -> Size {
        self.lock().base.max_size
    }

    pub fn set_max_size(&self, size: Size) {
        self.lock().base.max_size = size;
    }

    pub fn bg_color(&self) -> Color {
        self.lock().base.bg_color
    }

    pub fn set_bg_color(&self, color: Color) {
        self.lock().base.bg_color = color;
    }

    pub fn border_color(&self) -> Color {
        self.lock().base.border_color
    }

    pub fn set_border_color(&self, color: Color) {
        self.lock().base.border_color = color;
    }

    pub fn events(&self) -> bool {
        self.lock().base.events
    }

    pub fn set_events(&self, events: bool) {
        self.lock().base.events = events;
    }

    /// The variant's preferred size, if it has an opinion.
    pub fn preferred_size(&self) -> Option<Size> {
        let state = self.lock();
        state.kind.widget().preferred_size(&state.base)
    }

    /// Size a container lays this element out at: its preferred size, or its
    /// minimum size when it has no preference.
    pub fn layout_size(&self) -> Size {
        let state = self.lock();
        state
            .kind
            .widget()
            .preferred_size(&state.base)
            .unwrap_or(state.base.min_size)
    }

    // =====================================================================
    // Event handlers
    // =====================================================================

    pub fn add_event_handler(&self, handler: impl Fn(&str) + Send + Sync + 'static) -> HandlerId {
        let id = HandlerId::next();
        self.handlers().insert(id, Arc::new(handler));
        id
    }

    /// Returns false if `id` was not registered on this element.
    pub fn remove_event_handler(&self, id: HandlerId) -> bool {
        self.handlers().shift_remove(&id).is_some()
    }

    pub fn handler_count(&self) -> usize {
        self.handlers().len()
    }

    /// Invoke every handler, in registration order, with `name`.
    pub fn emit(&self, name: &str) {
        let handlers: Vec<EventHandler> = self.handlers().values().cloned().collect();
        for handler in handlers {
            handler(name);
        }
    }

    // =====================================================================
    // Frame and input entry points
    // =====================================================================

    /// Draw at `parent_origin + pos`: background, border, hit registration,
    /// then the variant.
    pub fn draw(self: &Arc<Self>, frame: &mut Frame<'_>, parent_origin: Point) {
        let mut state = self.lock();
        let ElementState { base, kind } = &mut *state;
        let widget = kind.widget_mut();
        widget.fit(base);

        let origin = parent_origin + base.pos;
        let rect = Rect::from_origin_size(origin, base.size);

        frame.draw.fill_rect(rect, base.bg_color);
        frame.draw.stroke_rect(rect, base.border_color);

        if widget.accepts_input() || base.events {
            frame.register(self, origin, rect);
        }

        widget.draw(base, frame, origin);
    }

    pub(crate) fn mouse_event(&self, event: &MouseEvent, cx: &mut EventContext<'_>) -> EventResult {
        let mut state = self.lock();
        let ElementState { base, kind } = &mut *state;

        let widget = kind.widget_mut();
        if widget.accepts_input() {
            widget.mouse_event(base, event, cx)
        } else if base.events {
            generic_mouse_event(base, event, cx)
        } else {
            EventResult::Ignored
        }
    }

    pub(crate) fn key_event(&self, event: &KeyEvent, cx: &mut EventContext<'_>) -> EventResult {
        let mut state = self.lock();
        let ElementState { base, kind } = &mut *state;
        kind.widget_mut().key_event(base, event, cx)
    }

    // =====================================================================
    // Typed access
    // =====================================================================

    typed_access!(with_window, Window, Window);
    typed_access!(with_box, Box, BoxLayout);
    typed_access!(with_grid, Grid, Grid);
    typed_access!(with_scroll_view, ScrollView, ScrollView);
    typed_access!(with_button, Button, Button);
    typed_access!(with_text, Text, Text);
    typed_access!(with_entry, Entry, TextEntry);
    typed_access!(with_menu, Menu, Menu);
    typed_access!(with_menu_item, MenuItem, MenuItem);
    typed_access!(with_separator, Separator, Separator);
    typed_access!(with_image, Image, Image);
    typed_access!(with_polyline, Polyline, Polyline);
}

impl Drop for Element {
    fn drop(&mut self) {
        self.retired.push(self.id);
        self.handlers
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .kind
            .widget_mut()
            .teardown();
    }
}

/// Pointer events shared by every element that registers for input:
/// `enter`, `leave`, `click-<button>` and `wheel-<direction>`.
///
/// A click needs a press and a release of the same button with the pointer
/// still over the element.
pub(crate) fn generic_mouse_event(
    base: &mut ElementBase,
    event: &MouseEvent,
    cx: &mut EventContext<'_>,
) -> EventResult {
    match event {
        MouseEvent::Enter { .. } => cx.emit("enter"),
        MouseEvent::Leave { .. } => {
            base.pressed.clear();
            cx.emit("leave");
        }
        MouseEvent::ButtonPressed { button, .. } => {
            if !base.pressed.contains(button) {
                base.pressed.push(*button);
            }
        }
        MouseEvent::ButtonReleased { button, position } => {
            let was_pressed = base.pressed.contains(button);
            base.pressed.retain(|b| b != button);
            if was_pressed && base.local_rect().contains(*position) {
                cx.emit(&format!("click-{}", button.name()));
            }
        }
        MouseEvent::WheelScrolled { delta, .. } => {
            for name in delta.event_names() {
                cx.emit(name);
            }
        }
        MouseEvent::CursorMoved { .. } => return EventResult::Ignored,
    }
    EventResult::Handled
}
