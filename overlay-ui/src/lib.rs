//! Overlay UI: retained-mode element engine for in-game overlays
//!
//! Elements form a tree of windows, boxes, grids, scroll views and widgets.
//! Each frame the host calls [`UiContext::draw`] with its [`Renderer`]; the
//! draw both paints the tree and rebuilds the hit-test registry that
//! [`UiContext::process_mouse_event`] routes against. Keyboard input goes to
//! the focused element.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use overlay_font::FontCache;
//! use overlay_ui::{Fonts, UiConfig, UiContext};
//!
//! let config = UiConfig::default();
//! let cache = Arc::new(FontCache::with_fontdue(config.font_gamma));
//! let fonts = Fonts::load(cache, &config)?;
//! let ui = UiContext::new(config, fonts);
//!
//! let window = ui.window(Some("Stats"));
//! let label = ui.text("fps: 144");
//! window.with_window(|w| w.set_child(Some(label.clone())));
//! ui.add_top_level(&window);
//!
//! // per frame
//! ui.draw(&mut renderer, projection);
//! ```

// Core primitives
pub mod primitives;
pub mod event;
pub mod render;
pub mod error;

// Element tree and input routing
pub mod element;
pub mod input;
pub mod context;

// Containers and widgets
pub mod layout;
pub mod widgets;

// Configuration
pub mod theme;
pub mod settings;
pub mod logging;

pub use context::{Fonts, UiContext};
pub use element::{Element, ElementBase, ElementId, ElementKind, ElementRef, HandlerId, Widget};
pub use error::{Result, UiError};
pub use event::{
    EventResult, Key, KeyEvent, Modifiers, MouseButton, MouseEvent, NamedKey, ScrollDelta,
};
pub use input::{EventContext, Frame};
pub use layout::{Align, BoxItem, BoxLayout, Grid, GridItem, Orientation, Padding};
pub use primitives::{Color, Point, Rect, Size};
pub use render::{DrawContext, Projection, Renderer, TextureId, TextureRef, TexturedQuad};
pub use settings::SettingsStore;
pub use theme::{FontSpec, Theme, UiConfig};
pub use widgets::{
    Button, Image, Menu, MenuItem, Polyline, ScrollView, Separator, Text, TextEntry, Window,
    SUBMENU_ICON,
};
