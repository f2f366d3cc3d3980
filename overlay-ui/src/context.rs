//! The UI context.
//!
//! [`UiContext`] owns everything that used to be process-global: the input
//! router, the retire queue elements report their drops to, the engine
//! configuration and the loaded fonts. Hosts create one, build elements with
//! its constructors, and feed it frames and input events.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use overlay_font::{Font, FontCache};
use tracing::{info, warn};

use crate::element::{Element, ElementBase, ElementId, ElementKind, ElementRef, RetireQueue};
use crate::error::{Result, UiError};
use crate::event::{KeyEvent, MouseEvent};
use crate::input::{run_emissions, run_saves, Emission, Frame, RouterState, Target};
use crate::layout::{BoxLayout, Grid, Orientation};
use crate::primitives::{Color, Point, Size};
use crate::render::{DrawContext, Projection, Renderer, TextureId};
use crate::theme::{Theme, UiConfig};
use crate::widgets::{
    Button, Image, Menu, MenuItem, Polyline, ScrollView, Separator, Text, TextEntry, Window,
    SUBMENU_ICON,
};

/// The three fonts the built-in widgets draw with.
#[derive(Clone)]
pub struct Fonts {
    pub cache: Arc<FontCache>,
    pub regular: Arc<Font>,
    pub mono: Arc<Font>,
    pub icon: Arc<Font>,
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts")
            .field("regular", &self.regular)
            .field("mono", &self.mono)
            .field("icon", &self.icon)
            .finish_non_exhaustive()
    }
}

impl Fonts {
    /// Load the regular, mono and icon fonts named by `config`.
    pub fn load(cache: Arc<FontCache>, config: &UiConfig) -> Result<Self> {
        let regular = cache.get(&config.regular_font.key())?;
        let mono = cache.get(&config.mono_font.key())?;
        let icon = cache.get(&config.icon_font.key())?;
        info!(
            regular = ?config.regular_font.path,
            mono = ?config.mono_font.path,
            icon = ?config.icon_font.path,
            "ui fonts loaded"
        );
        Ok(Self {
            cache,
            regular,
            mono,
            icon,
        })
    }
}

pub struct UiContext {
    router: Mutex<RouterState>,
    retired: Arc<RetireQueue>,
    config: UiConfig,
    fonts: Fonts,
    icons: Mutex<HashMap<String, String>>,
    submenu_arrow: OnceLock<Option<String>>,
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl UiContext {
    pub fn new(config: UiConfig, fonts: Fonts) -> Self {
        Self {
            router: Mutex::new(RouterState::default()),
            retired: Arc::new(RetireQueue::default()),
            config,
            fonts,
            icons: Mutex::new(HashMap::new()),
            submenu_arrow: OnceLock::new(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.config.theme
    }

    pub fn fonts(&self) -> &Fonts {
        &self.fonts
    }

    /// The icon font glyph for `name`, looked up in the codepoints file
    /// named by [`UiConfig::icon_codepoints`]. Found names are cached.
    pub fn icon_codepoint(&self, name: &str) -> Result<String> {
        if let Some(glyph) = self.icons().get(name) {
            return Ok(glyph.clone());
        }

        let path = &self.config.icon_codepoints;
        let read_error = |source: std::io::Error| UiError::IconCodepoints {
            path: path.clone(),
            source,
        };
        let file = File::open(path).map_err(read_error)?;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(read_error)?;
            let mut parts = line.split_whitespace();
            if parts.next() != Some(name) {
                continue;
            }
            let value = parts.next().unwrap_or_default();
            let glyph = u32::from_str_radix(value, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| UiError::InvalidCodepoint {
                    name: name.to_string(),
                    value: value.to_string(),
                })?
                .to_string();
            self.icons().insert(name.to_string(), glyph.clone());
            return Ok(glyph);
        }
        Err(UiError::UnknownIcon(name.to_string()))
    }

    fn submenu_arrow(&self) -> Option<String> {
        self.submenu_arrow
            .get_or_init(|| match self.icon_codepoint(SUBMENU_ICON) {
                Ok(glyph) => Some(glyph),
                Err(err) => {
                    warn!(%err, "menu items will have no submenu arrow");
                    None
                }
            })
            .clone()
    }

    fn icons(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.icons.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn router(&self) -> MutexGuard<'_, RouterState> {
        self.router.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Lock the router with every dropped element already forgotten.
    fn reaped_router(&self) -> MutexGuard<'_, RouterState> {
        let mut router = self.router();
        let retired = self.retired.drain();
        if !retired.is_empty() {
            router.reap(&retired);
        }
        router
    }

    // =====================================================================
    // Top-level elements
    // =====================================================================

    /// Draw `element` every frame, above everything added before it.
    /// Returns false if it is already top level.
    pub fn add_top_level(&self, element: &ElementRef) -> bool {
        self.router().add_top_level(element)
    }

    pub fn remove_top_level(&self, element: &ElementRef) -> bool {
        self.router().remove_top_level(element)
    }

    /// Raise `element` above every other top-level element.
    pub fn move_to_top(&self, element: &ElementRef) {
        self.router().move_to_top(element);
    }

    pub fn top_level_count(&self) -> usize {
        self.router().top_level().len()
    }

    // =====================================================================
    // Frame and input
    // =====================================================================

    /// Draw every top-level element in order and rebuild the hit-test
    /// registry.
    pub fn draw(&self, renderer: &mut dyn Renderer, projection: Projection) {
        let unsaved = {
            let mut router = self.reaped_router();
            router.begin_frame();
            let top: Vec<ElementRef> = router.top_level().to_vec();

            {
                let mut frame = Frame::new(DrawContext::new(renderer, projection), &mut router);
                for element in &top {
                    element.draw(&mut frame, Point::ORIGIN);
                }
            }
            router.take_unsaved()
        };
        run_saves(unsaved);
    }

    /// Run `route` under the router lock, then the saves and handlers it
    /// queued.
    fn dispatch(&self, route: impl FnOnce(&mut RouterState) -> (bool, Vec<Emission>)) -> bool {
        let (handled, emitted, unsaved) = {
            let mut router = self.reaped_router();
            let (handled, emitted) = route(&mut router);
            (handled, emitted, router.take_unsaved())
        };
        run_saves(unsaved);
        run_emissions(emitted);
        handled
    }

    /// Route a mouse event. Returns whether any element handled it.
    pub fn process_mouse_event(&self, event: &MouseEvent) -> bool {
        self.dispatch(|router| router.process_mouse(event))
    }

    /// Deliver a key event to the focus element. Returns false when nothing
    /// has focus or the element ignored it.
    pub fn process_keyboard_event(&self, event: &KeyEvent) -> bool {
        self.dispatch(|router| router.process_key(event))
    }

    /// Capture the mouse for `element`, with events relative to where it was
    /// last drawn. Returns false if another element holds the capture.
    pub fn capture_mouse(&self, element: &ElementRef) -> bool {
        let mut router = self.reaped_router();
        let target = router.target_for(element);
        router.capture(target)
    }

    /// Capture with events relative to the screen point `offset`.
    pub fn capture_mouse_at(&self, element: &ElementRef, offset: Point) -> bool {
        self.reaped_router().capture(Target::new(element, offset))
    }

    /// Returns false unless `element` held the capture.
    pub fn release_mouse(&self, element: &ElementRef) -> bool {
        self.router().release(element.id())
    }

    /// Move keyboard focus, emitting `unfocus` and `focus` as it changes.
    pub fn focus(&self, element: Option<&ElementRef>) {
        let emitted = {
            let mut router = self.reaped_router();
            let target = element.map(|e| router.target_for(e));
            router.focus(target)
        };
        run_emissions(emitted);
    }

    pub fn last_mouse_position(&self) -> Point {
        self.router().last_mouse()
    }

    pub fn capture_id(&self) -> Option<ElementId> {
        self.reaped_router().capture_id()
    }

    pub fn focus_id(&self) -> Option<ElementId> {
        self.reaped_router().focus_id()
    }

    pub fn hover_id(&self) -> Option<ElementId> {
        self.reaped_router().hover_id()
    }

    /// Hit-test entries registered by the last draw.
    pub fn hit_region_count(&self) -> usize {
        self.router().registry_len()
    }

    // =====================================================================
    // Element constructors
    // =====================================================================

    fn element(&self, base: ElementBase, kind: ElementKind) -> ElementRef {
        Element::new(base, kind, self.retired.clone())
    }

    fn plain(&self, kind: ElementKind) -> ElementRef {
        self.element(ElementBase::default(), kind)
    }

    pub fn window(&self, title: Option<&str>) -> ElementRef {
        let mut base = ElementBase::default();
        base.bg_color = self.theme().window_bg;
        let window = Window::new(title, self.fonts.regular.clone(), &self.config);
        self.element(base, ElementKind::Window(window))
    }

    pub fn box_layout(&self, orientation: Orientation) -> ElementRef {
        self.plain(ElementKind::Box(BoxLayout::new(orientation)))
    }

    pub fn vbox(&self) -> ElementRef {
        self.box_layout(Orientation::Vertical)
    }

    pub fn hbox(&self) -> ElementRef {
        self.box_layout(Orientation::Horizontal)
    }

    pub fn grid(&self, rows: usize, cols: usize) -> ElementRef {
        self.plain(ElementKind::Grid(Grid::new(rows, cols)))
    }

    pub fn scroll_view(&self) -> ElementRef {
        self.plain(ElementKind::ScrollView(ScrollView::new(&self.config)))
    }

    pub fn button(&self, child: Option<&ElementRef>) -> ElementRef {
        let mut button = Button::new(self.theme());
        button.set_child(child.cloned());
        self.plain(ElementKind::Button(button))
    }

    pub fn checkbox(&self, size: i32) -> ElementRef {
        self.plain(ElementKind::Button(Button::checkbox(self.theme(), size)))
    }

    /// Text in the regular font and the theme's text color.
    pub fn text(&self, text: &str) -> ElementRef {
        self.text_with(self.fonts.regular.clone(), text, self.theme().text)
    }

    pub fn text_with(&self, font: Arc<Font>, text: &str, color: Color) -> ElementRef {
        self.plain(ElementKind::Text(Text::new(font, text, color)))
    }

    pub fn entry(&self) -> ElementRef {
        let entry = TextEntry::new(self.fonts.regular.clone(), self.theme());
        self.plain(ElementKind::Entry(entry))
    }

    pub fn menu(&self) -> ElementRef {
        self.plain(ElementKind::Menu(Menu::new(self.theme())))
    }

    pub fn menu_item(&self, child: Option<&ElementRef>, icon: Option<&str>) -> ElementRef {
        let mut item = MenuItem::new(child.cloned(), self.fonts.icon.clone(), self.theme());
        item.set_icon(icon);
        item.set_arrow(self.submenu_arrow().as_deref());
        self.plain(ElementKind::MenuItem(item))
    }

    pub fn separator(&self, orientation: Orientation) -> ElementRef {
        let separator = Separator::new(orientation, self.theme().window_border);
        self.plain(ElementKind::Separator(separator))
    }

    pub fn image(&self, texture: TextureId, size: Size) -> ElementRef {
        self.plain(ElementKind::Image(Image::new(texture, size)))
    }

    pub fn polyline(&self) -> ElementRef {
        self.plain(ElementKind::Polyline(Polyline::new()))
    }
}
