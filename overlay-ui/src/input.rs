//! Input router.
//!
//! Owns the per-frame hit-test registry and the input session: the hover
//! element, the capture element and the focus element. Every frame's draw
//! rebuilds the registry; mouse events are matched against it newest entry
//! first, so whatever was drawn last (topmost) wins.
//!
//! The router state lives behind one mutex held for the whole draw or
//! dispatch. Handlers queued with [`EventContext::emit`] run only after it is
//! released, so they may freely call back into the UI.
//!
//! Settings stores touched during a draw or dispatch are queued the same
//! way and written once the lock is released.
//!
//! Only weak references are kept here. Dropped elements are reaped through
//! the retire queue before every draw and dispatch.

use std::sync::{Arc, Weak};

use tracing::{debug, warn};

use crate::element::{Element, ElementId, ElementRef};
use crate::event::{EventResult, KeyEvent, MouseEvent};
use crate::primitives::{Point, Rect};
use crate::render::DrawContext;
use crate::settings::SettingsStore;

/// An event waiting for its handlers to run.
pub(crate) type Emission = (ElementRef, String);

type Deferred = Box<dyn FnOnce(&mut EventContext<'_>)>;

/// An element together with the screen offset its events are relative to.
#[derive(Debug, Clone)]
pub(crate) struct Target {
    pub(crate) id: ElementId,
    pub(crate) element: Weak<Element>,
    pub(crate) offset: Point,
}

impl Target {
    pub(crate) fn new(element: &ElementRef, offset: Point) -> Self {
        Self {
            id: element.id(),
            element: Arc::downgrade(element),
            offset,
        }
    }
}

/// One hit-test registry entry.
#[derive(Debug, Clone)]
struct HitEntry {
    target: Target,
    bounds: Rect,
    clip: Option<Rect>,
}

impl HitEntry {
    fn hit(&self, point: Point) -> bool {
        self.bounds.contains(point) && self.clip.is_none_or(|c| c.contains(point))
    }
}

/// Registry, z-order and input session state.
#[derive(Debug, Default)]
pub(crate) struct RouterState {
    registry: Vec<HitEntry>,
    top_level: Vec<ElementRef>,
    hover: Option<Target>,
    capture: Option<Target>,
    focus: Option<Target>,
    last_mouse: Point,
    focus_claimed: bool,
    unsaved: Vec<Arc<SettingsStore>>,
}

impl RouterState {
    /// Forget everything that refers to a dropped element.
    pub(crate) fn reap(&mut self, retired: &[ElementId]) {
        let gone = |t: &Target| retired.contains(&t.id) || t.element.strong_count() == 0;

        self.registry.retain(|e| !gone(&e.target));
        if self.hover.as_ref().is_some_and(gone) {
            self.hover = None;
        }
        if self.capture.as_ref().is_some_and(gone) {
            debug!("capture holder dropped");
            self.capture = None;
        }
        if self.focus.as_ref().is_some_and(gone) {
            debug!("focus holder dropped");
            self.focus = None;
        }
    }

    fn save_later(&mut self, settings: &Arc<SettingsStore>) {
        if !self.unsaved.iter().any(|s| Arc::ptr_eq(s, settings)) {
            self.unsaved.push(settings.clone());
        }
    }

    /// Stores to write once the lock is released.
    pub(crate) fn take_unsaved(&mut self) -> Vec<Arc<SettingsStore>> {
        std::mem::take(&mut self.unsaved)
    }

    pub(crate) fn begin_frame(&mut self) {
        self.registry.clear();
    }

    pub(crate) fn top_level(&self) -> &[ElementRef] {
        &self.top_level
    }

    pub(crate) fn last_mouse(&self) -> Point {
        self.last_mouse
    }

    pub(crate) fn capture_id(&self) -> Option<ElementId> {
        self.capture.as_ref().map(|t| t.id)
    }

    pub(crate) fn focus_id(&self) -> Option<ElementId> {
        self.focus.as_ref().map(|t| t.id)
    }

    pub(crate) fn hover_id(&self) -> Option<ElementId> {
        self.hover.as_ref().map(|t| t.id)
    }

    pub(crate) fn registry_len(&self) -> usize {
        self.registry.len()
    }

    /// Screen offset the element was last registered at.
    pub(crate) fn offset_of(&self, id: ElementId) -> Option<Point> {
        self.registry
            .iter()
            .rev()
            .find(|e| e.target.id == id)
            .map(|e| e.target.offset)
    }

    /// Target for an element outside of dispatch: its last registered offset,
    /// or its own position for an element that has not been drawn.
    pub(crate) fn target_for(&self, element: &ElementRef) -> Target {
        let offset = self
            .offset_of(element.id())
            .unwrap_or_else(|| element.pos());
        Target::new(element, offset)
    }

    fn hits(&self, point: Point) -> Vec<Target> {
        self.registry
            .iter()
            .rev()
            .filter(|e| e.hit(point))
            .map(|e| e.target.clone())
            .collect()
    }

    fn topmost(&self, point: Point) -> Option<Target> {
        self.registry
            .iter()
            .rev()
            .find(|e| e.hit(point))
            .map(|e| e.target.clone())
    }

    pub(crate) fn add_top_level(&mut self, element: &ElementRef) -> bool {
        if self.top_level.iter().any(|e| Arc::ptr_eq(e, element)) {
            warn!(id = element.id().0, "element is already top level");
            return false;
        }
        self.top_level.push(element.clone());
        true
    }

    pub(crate) fn remove_top_level(&mut self, element: &ElementRef) -> bool {
        let before = self.top_level.len();
        self.top_level.retain(|e| !Arc::ptr_eq(e, element));
        self.top_level.len() != before
    }

    /// Move to the end of the paint order, adding it if it is not top level.
    pub(crate) fn move_to_top(&mut self, element: &ElementRef) {
        self.top_level.retain(|e| !Arc::ptr_eq(e, element));
        self.top_level.push(element.clone());
    }

    /// Exclusive: ignored while another element holds the capture.
    pub(crate) fn capture(&mut self, target: Target) -> bool {
        match &self.capture {
            Some(held) if held.id == target.id => true,
            Some(held) => {
                debug!(holder = held.id.0, requester = target.id.0, "capture request ignored");
                false
            }
            None => {
                debug!(id = target.id.0, "mouse captured");
                self.capture = Some(target);
                true
            }
        }
    }

    /// Only the holder may release.
    pub(crate) fn release(&mut self, id: ElementId) -> bool {
        if self.capture_id() == Some(id) {
            debug!(id = id.0, "mouse released");
            self.capture = None;
            true
        } else {
            false
        }
    }

    fn set_focus(&mut self, target: Option<Target>, out: &mut Vec<Emission>) {
        if self.focus_id() == target.as_ref().map(|t| t.id) {
            return;
        }
        if let Some(old) = self.focus.take() {
            debug!(id = old.id.0, "focus lost");
            if let Some(el) = old.element.upgrade() {
                out.push((el, "unfocus".to_string()));
            }
        }
        if let Some(new) = &target {
            debug!(id = new.id.0, "focus gained");
            if let Some(el) = new.element.upgrade() {
                out.push((el, "focus".to_string()));
            }
        }
        self.focus = target;
    }

    /// Set or clear focus outside of dispatch.
    pub(crate) fn focus(&mut self, target: Option<Target>) -> Vec<Emission> {
        let mut out = Vec::new();
        self.set_focus(target, &mut out);
        out
    }

    /// Route one mouse event. Returns whether any element handled it and the
    /// events to emit once the lock is released.
    pub(crate) fn process_mouse(&mut self, event: &MouseEvent) -> (bool, Vec<Emission>) {
        let position = event.position();
        let press = event.is_press();
        self.last_mouse = position;
        if press {
            self.focus_claimed = false;
        }

        let top = self.topmost(position);
        let mut cx = EventContext::new(self);

        if top.as_ref().map(|t| t.id) != cx.router.hover_id() {
            if let Some(old) = cx.router.hover.take() {
                cx.deliver_mouse(&old, &MouseEvent::Leave { position });
            }
            if let Some(new) = &top {
                cx.deliver_mouse(new, &MouseEvent::Enter { position });
            }
            cx.router.hover = top;
        }

        let mut handled = false;
        let captured = cx.router.capture.clone();
        if let Some(holder) = &captured {
            handled = cx.deliver_mouse(holder, event).is_handled();
        }

        if !handled {
            for target in cx.router.hits(position) {
                if captured.as_ref().is_some_and(|c| c.id == target.id) {
                    continue;
                }
                if cx.deliver_mouse(&target, event).is_handled() {
                    handled = true;
                    break;
                }
            }
        }

        if press && !cx.router.focus_claimed && cx.router.focus.is_some() {
            cx.router.set_focus(None, &mut cx.emitted);
        }

        cx.run_deferred();
        (handled, cx.emitted)
    }

    /// Deliver a key event to the focus element, if any.
    pub(crate) fn process_key(&mut self, event: &KeyEvent) -> (bool, Vec<Emission>) {
        let Some(focus) = self.focus.clone() else {
            return (false, Vec::new());
        };

        let mut cx = EventContext::new(self);
        let handled = cx.deliver_key(&focus, event).is_handled();
        cx.run_deferred();
        (handled, cx.emitted)
    }
}

/// Run queued handlers. Must be called without the router lock held.
pub(crate) fn run_emissions(emitted: Vec<Emission>) {
    for (element, name) in emitted {
        element.emit(&name);
    }
}

/// Write queued settings stores. Must be called without the router lock held.
pub(crate) fn run_saves(unsaved: Vec<Arc<SettingsStore>>) {
    for settings in unsaved {
        if let Err(err) = settings.save() {
            warn!(path = ?settings.path(), %err, "failed to save settings");
        }
    }
}

/// What an element may do to the input session while handling an event.
pub struct EventContext<'a> {
    router: &'a mut RouterState,
    current: Option<Target>,
    emitted: Vec<Emission>,
    deferred: Vec<Deferred>,
}

impl<'a> EventContext<'a> {
    fn new(router: &'a mut RouterState) -> Self {
        Self {
            router,
            current: None,
            emitted: Vec::new(),
            deferred: Vec::new(),
        }
    }

    fn deliver_mouse(&mut self, target: &Target, event: &MouseEvent) -> EventResult {
        let Some(element) = target.element.upgrade() else {
            return EventResult::Ignored;
        };
        let prev = self.current.replace(target.clone());
        let result = element.mouse_event(&event.relative_to(target.offset), self);
        self.current = prev;
        result
    }

    fn deliver_key(&mut self, target: &Target, event: &KeyEvent) -> EventResult {
        let Some(element) = target.element.upgrade() else {
            return EventResult::Ignored;
        };
        let prev = self.current.replace(target.clone());
        let result = element.key_event(event, self);
        self.current = prev;
        result
    }

    fn run_deferred(&mut self) {
        while !self.deferred.is_empty() {
            for f in std::mem::take(&mut self.deferred) {
                f(self);
            }
        }
    }

    /// The element receiving the event.
    pub fn element(&self) -> Option<ElementRef> {
        self.current.as_ref().and_then(|t| t.element.upgrade())
    }

    /// Screen position of the receiving element's local origin.
    pub fn offset(&self) -> Point {
        self.current.as_ref().map_or(Point::ORIGIN, |t| t.offset)
    }

    pub fn last_mouse(&self) -> Point {
        self.router.last_mouse
    }

    /// Capture the mouse for the receiving element. Returns false if another
    /// element already holds it.
    pub fn capture_mouse(&mut self) -> bool {
        match self.current.clone() {
            Some(target) => self.router.capture(target),
            None => false,
        }
    }

    /// Capture for another element, with events relative to `offset`.
    pub fn capture_element(&mut self, element: &ElementRef, offset: Point) -> bool {
        self.router.capture(Target::new(element, offset))
    }

    /// Release the capture if the receiving element holds it.
    pub fn release_mouse(&mut self) -> bool {
        match self.current.as_ref().map(|t| t.id) {
            Some(id) => self.router.release(id),
            None => false,
        }
    }

    pub fn release_element(&mut self, element: &ElementRef) -> bool {
        self.router.release(element.id())
    }

    pub fn has_capture(&self) -> bool {
        self.current.is_some() && self.router.capture_id() == self.current.as_ref().map(|t| t.id)
    }

    /// Give keyboard focus to the receiving element.
    pub fn set_focus(&mut self) {
        self.router.focus_claimed = true;
        let target = self.current.clone();
        self.router.set_focus(target, &mut self.emitted);
    }

    pub fn is_focus(&self) -> bool {
        self.current.is_some() && self.router.focus_id() == self.current.as_ref().map(|t| t.id)
    }

    pub fn clear_focus(&mut self) {
        self.router.set_focus(None, &mut self.emitted);
    }

    /// Raise the receiving element to the top of the paint order.
    pub fn move_to_top(&mut self) {
        if let Some(element) = self.element() {
            if self.router.top_level.iter().any(|e| Arc::ptr_eq(e, &element)) {
                self.router.move_to_top(&element);
            }
        }
    }

    pub fn add_top_level(&mut self, element: &ElementRef) -> bool {
        self.router.add_top_level(element)
    }

    pub fn remove_top_level(&mut self, element: &ElementRef) -> bool {
        self.router.remove_top_level(element)
    }

    /// Queue `name` for the receiving element's handlers.
    pub fn emit(&mut self, name: &str) {
        if let Some(element) = self.element() {
            self.emitted.push((element, name.to_string()));
        }
    }

    pub fn emit_to(&mut self, element: &ElementRef, name: &str) {
        self.emitted.push((element.clone(), name.to_string()));
    }

    /// Write `settings` to disk after the dispatch finishes.
    pub fn save_later(&mut self, settings: &Arc<SettingsStore>) {
        self.router.save_later(settings);
    }

    /// Run `f` after the receiving element is unlocked, still within this
    /// dispatch. Use it to touch other elements, such as a parent.
    pub fn defer(&mut self, f: impl FnOnce(&mut EventContext<'_>) + 'static) {
        self.deferred.push(Box::new(f));
    }
}

/// Per-frame drawing state: the renderer plus the registry being rebuilt.
pub struct Frame<'f> {
    pub draw: DrawContext<'f>,
    router: &'f mut RouterState,
}

impl<'f> Frame<'f> {
    pub(crate) fn new(draw: DrawContext<'f>, router: &'f mut RouterState) -> Self {
        Self { draw, router }
    }

    /// Add a hit-test entry, clipped to the current clip rectangle.
    pub(crate) fn register(&mut self, element: &ElementRef, origin: Point, bounds: Rect) {
        let clip = self.draw.clip();
        self.router.registry.push(HitEntry {
            target: Target::new(element, origin),
            bounds,
            clip,
        });
    }

    pub fn is_focus(&self, id: ElementId) -> bool {
        self.router.focus_id() == Some(id)
    }

    pub fn is_hovered(&self, id: ElementId) -> bool {
        self.router.hover_id() == Some(id)
    }

    pub fn has_capture(&self, id: ElementId) -> bool {
        self.router.capture_id() == Some(id)
    }

    /// Write `settings` to disk after the frame is drawn.
    pub fn save_later(&mut self, settings: &Arc<SettingsStore>) {
        self.router.save_later(settings);
    }
}
