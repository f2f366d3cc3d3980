//! Input event types.
//!
//! Mouse and keyboard events as they arrive from the OS input source, plus
//! the names under which elements report them to registered handlers.

use crate::primitives::Point;

/// Mouse button types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

impl MouseButton {
    /// Name used in `click-<button>` style events.
    pub fn name(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Right => "right",
            MouseButton::Middle => "middle",
            MouseButton::Back => "x1",
            MouseButton::Forward => "x2",
            MouseButton::Other(_) => "other",
        }
    }
}

/// Scroll delta types.
///
/// Positive `y` scrolls up, positive `x` scrolls right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollDelta {
    /// Scroll by lines (discrete, e.g., mouse wheel notches).
    Lines { x: f32, y: f32 },

    /// Scroll by pixels (smooth, e.g., trackpad).
    Pixels { x: f32, y: f32 },
}

impl ScrollDelta {
    /// Content offset change in pixels for a wheel `step` per line.
    ///
    /// Scrolling up moves content back toward offset zero.
    pub fn offset_delta(&self, step: i32) -> (i32, i32) {
        match *self {
            ScrollDelta::Lines { x, y } => {
                ((x * step as f32).round() as i32, (-y * step as f32).round() as i32)
            }
            ScrollDelta::Pixels { x, y } => (x.round() as i32, (-y).round() as i32),
        }
    }

    /// Event names for this delta: `wheel-up`, `wheel-down`, `wheel-left`, `wheel-right`.
    pub fn event_names(&self) -> Vec<&'static str> {
        let (x, y) = match *self {
            ScrollDelta::Lines { x, y } | ScrollDelta::Pixels { x, y } => (x, y),
        };
        let mut names = Vec::with_capacity(2);
        if y > 0.0 {
            names.push("wheel-up");
        } else if y < 0.0 {
            names.push("wheel-down");
        }
        if x < 0.0 {
            names.push("wheel-left");
        } else if x > 0.0 {
            names.push("wheel-right");
        }
        names
    }
}

/// Mouse event types.
#[derive(Debug, Clone, PartialEq)]
pub enum MouseEvent {
    /// Mouse button pressed.
    ButtonPressed { button: MouseButton, position: Point },

    /// Mouse button released.
    ButtonReleased { button: MouseButton, position: Point },

    /// Mouse cursor moved.
    CursorMoved { position: Point },

    /// Mouse wheel scrolled.
    WheelScrolled { delta: ScrollDelta, position: Point },

    /// Cursor entered this element. Synthesized by the router.
    Enter { position: Point },

    /// Cursor left this element. Synthesized by the router.
    Leave { position: Point },
}

impl MouseEvent {
    pub fn position(&self) -> Point {
        match *self {
            MouseEvent::ButtonPressed { position, .. }
            | MouseEvent::ButtonReleased { position, .. }
            | MouseEvent::CursorMoved { position }
            | MouseEvent::WheelScrolled { position, .. }
            | MouseEvent::Enter { position }
            | MouseEvent::Leave { position } => position,
        }
    }

    /// The same event with its position shifted by `-offset`.
    pub fn relative_to(&self, offset: Point) -> Self {
        let mut event = self.clone();
        match &mut event {
            MouseEvent::ButtonPressed { position, .. }
            | MouseEvent::ButtonReleased { position, .. }
            | MouseEvent::CursorMoved { position }
            | MouseEvent::WheelScrolled { position, .. }
            | MouseEvent::Enter { position }
            | MouseEvent::Leave { position } => *position = *position - offset,
        }
        event
    }

    pub fn is_press(&self) -> bool {
        matches!(self, MouseEvent::ButtonPressed { .. })
    }
}

/// Keyboard modifier keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };

    /// Check if any modifier is pressed.
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt
    }

    /// `ctrl-alt-shift-` style prefix in that fixed order.
    fn prefix(&self) -> String {
        let mut prefix = String::new();
        if self.ctrl {
            prefix.push_str("ctrl-");
        }
        if self.alt {
            prefix.push_str("alt-");
        }
        if self.shift {
            prefix.push_str("shift-");
        }
        prefix
    }
}

/// Named keys (non-character keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Backspace,
    Delete,
    Insert,
    Enter,
    Tab,

    // Modifiers
    Shift,
    Control,
    Alt,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    Escape,
    Space,
    Unknown,
}

impl NamedKey {
    pub fn name(&self) -> &'static str {
        match self {
            NamedKey::ArrowUp => "up",
            NamedKey::ArrowDown => "down",
            NamedKey::ArrowLeft => "left",
            NamedKey::ArrowRight => "right",
            NamedKey::Home => "home",
            NamedKey::End => "end",
            NamedKey::PageUp => "pageup",
            NamedKey::PageDown => "pagedown",
            NamedKey::Backspace => "backspace",
            NamedKey::Delete => "delete",
            NamedKey::Insert => "insert",
            NamedKey::Enter => "enter",
            NamedKey::Tab => "tab",
            NamedKey::Shift => "shift",
            NamedKey::Control => "ctrl",
            NamedKey::Alt => "alt",
            NamedKey::F1 => "f1",
            NamedKey::F2 => "f2",
            NamedKey::F3 => "f3",
            NamedKey::F4 => "f4",
            NamedKey::F5 => "f5",
            NamedKey::F6 => "f6",
            NamedKey::F7 => "f7",
            NamedKey::F8 => "f8",
            NamedKey::F9 => "f9",
            NamedKey::F10 => "f10",
            NamedKey::F11 => "f11",
            NamedKey::F12 => "f12",
            NamedKey::Escape => "escape",
            NamedKey::Space => "space",
            NamedKey::Unknown => "unknown",
        }
    }
}

/// A keyboard key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// A named (special) key.
    Named(NamedKey),

    /// A character key.
    Character(String),
}

impl Key {
    pub fn named(key: NamedKey) -> Self {
        Self::Named(key)
    }

    pub fn character(c: impl Into<String>) -> Self {
        Self::Character(c.into())
    }

    pub fn name(&self) -> String {
        match self {
            Key::Named(named) => named.name().to_string(),
            Key::Character(c) => c.to_lowercase(),
        }
    }
}

/// A key event (pressed or released).
#[derive(Debug, Clone, PartialEq)]
pub enum KeyEvent {
    /// A key was pressed.
    Pressed {
        key: Key,
        modifiers: Modifiers,
        /// The text produced by the key press.
        text: Option<String>,
    },

    /// A key was released.
    Released { key: Key, modifiers: Modifiers },
}

impl KeyEvent {
    pub fn key(&self) -> &Key {
        match self {
            KeyEvent::Pressed { key, .. } | KeyEvent::Released { key, .. } => key,
        }
    }

    pub fn modifiers(&self) -> Modifiers {
        match self {
            KeyEvent::Pressed { modifiers, .. } | KeyEvent::Released { modifiers, .. } => {
                *modifiers
            }
        }
    }

    /// Handler event name, e.g. `ctrl-shift-a-down` or `enter-up`.
    pub fn event_name(&self) -> String {
        let phase = match self {
            KeyEvent::Pressed { .. } => "down",
            KeyEvent::Released { .. } => "up",
        };
        format!("{}{}-{}", self.modifiers().prefix(), self.key().name(), phase)
    }
}

/// Result of offering an event to an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event was ignored, offer it to the next element.
    Ignored,

    /// Event was handled, stop routing.
    Handled,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }
}

impl From<bool> for EventResult {
    fn from(handled: bool) -> Self {
        if handled {
            EventResult::Handled
        } else {
            EventResult::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_event_names() {
        let press = KeyEvent::Pressed {
            key: Key::character("A"),
            modifiers: Modifiers { shift: true, ctrl: true, alt: false },
            text: None,
        };
        assert_eq!(press.event_name(), "ctrl-shift-a-down");

        let release = KeyEvent::Released {
            key: Key::named(NamedKey::Enter),
            modifiers: Modifiers::NONE,
        };
        assert_eq!(release.event_name(), "enter-up");

        let alt = KeyEvent::Pressed {
            key: Key::named(NamedKey::F4),
            modifiers: Modifiers::ALT,
            text: None,
        };
        assert_eq!(alt.event_name(), "alt-f4-down");
    }

    #[test]
    fn wheel_names_and_offsets() {
        let up = ScrollDelta::Lines { x: 0.0, y: 1.0 };
        assert_eq!(up.event_names(), vec!["wheel-up"]);
        assert_eq!(up.offset_delta(20), (0, -20));

        let right = ScrollDelta::Pixels { x: 7.0, y: -3.0 };
        assert_eq!(right.event_names(), vec!["wheel-down", "wheel-right"]);
        assert_eq!(right.offset_delta(20), (7, 3));
    }

    #[test]
    fn relative_positions() {
        let ev = MouseEvent::ButtonPressed {
            button: MouseButton::Left,
            position: Point::new(30, 40),
        };
        assert_eq!(ev.relative_to(Point::new(10, 15)).position(), Point::new(20, 25));
        assert!(ev.is_press());
    }

    #[test]
    fn event_result_from_bool() {
        assert!(EventResult::from(true).is_handled());
        assert!(!EventResult::from(false).is_handled());
    }
}
