//! Theme colors and engine configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::primitives::Color;

/// Every color the built-in widgets paint with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Theme {
    #[serde(rename = "windowBG")]
    pub window_bg: Color,
    pub window_border: Color,
    pub window_border_highlight: Color,
    pub text: Color,
    pub accent_text: Color,
    #[serde(rename = "entryBG")]
    pub entry_bg: Color,
    pub entry_hint: Color,
    #[serde(rename = "buttonBG")]
    pub button_bg: Color,
    #[serde(rename = "buttonBGHover")]
    pub button_bg_hover: Color,
    #[serde(rename = "buttonBGHighlight")]
    pub button_bg_highlight: Color,
    pub button_border: Color,
    pub scroll_thumb: Color,
    pub scroll_thumb_highlight: Color,
    #[serde(rename = "scrollBG")]
    pub scroll_bg: Color,
    #[serde(rename = "menuBG")]
    pub menu_bg: Color,
    pub menu_border: Color,
    pub menu_item_hover: Color,
    pub menu_item_highlight: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            window_bg: Color(0x000000bb),
            window_border: Color(0x3D4478FF),
            window_border_highlight: Color(0x3d5a78ff),
            text: Color(0xFFFFFFFF),
            accent_text: Color(0xFCBA03FF),
            entry_bg: Color(0x262626FF),
            entry_hint: Color(0x707070FF),
            button_bg: Color(0x1F253BDD),
            button_bg_hover: Color(0x2E3859FF),
            button_bg_highlight: Color(0x3a4670FF),
            button_border: Color(0x3D4478FF),
            scroll_thumb: Color(0x3D4478FF),
            scroll_thumb_highlight: Color(0x3d5a78ff),
            scroll_bg: Color(0x1E202ECC),
            menu_bg: Color(0x161a26DD),
            menu_border: Color(0x3D4478FF),
            menu_item_hover: Color(0x2E3859FF),
            menu_item_highlight: Color(0x3a4670FF),
        }
    }
}

/// A font file plus size and optional variation axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub path: PathBuf,
    pub size: u32,
    #[serde(default)]
    pub weight: Option<i32>,
    #[serde(default)]
    pub slant: Option<i32>,
    #[serde(default)]
    pub width: Option<i32>,
}

impl FontSpec {
    pub fn new(path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            path: path.into(),
            size,
            weight: None,
            slant: None,
            width: None,
        }
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn key(&self) -> overlay_font::FontKey {
        let mut key = overlay_font::FontKey::new(self.path.clone(), self.size);
        if let Some(weight) = self.weight {
            key = key.weight(weight);
        }
        if let Some(slant) = self.slant {
            key = key.slant(slant);
        }
        if let Some(width) = self.width {
            key = key.width(width);
        }
        key
    }
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub theme: Theme,
    pub font_gamma: f32,
    pub regular_font: FontSpec,
    pub mono_font: FontSpec,
    pub icon_font: FontSpec,
    /// `<name> <hex codepoint>` per line, naming the icon font's glyphs.
    pub icon_codepoints: PathBuf,
    /// Pixels per wheel line.
    pub scroll_step: i32,
    pub scrollbar_size: i32,
    pub window_min_size: i32,
    pub window_resize_margin: i32,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            font_gamma: 2.2,
            regular_font: FontSpec::new("fonts/Inter.ttf", 12).weight(400),
            mono_font: FontSpec::new("fonts/CascadiaCode.ttf", 12),
            icon_font: FontSpec::new("fonts/MaterialSymbolsOutlined.ttf", 12),
            icon_codepoints: PathBuf::from("fonts/MaterialSymbolsOutlined.codepoints"),
            scroll_step: 20,
            scrollbar_size: 10,
            window_min_size: 10,
            window_resize_margin: 4,
        }
    }
}
