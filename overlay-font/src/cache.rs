//! Process-wide font cache.
//!
//! Fonts are keyed by file, pixel size and variation axis values. The cache
//! holds at most [`CACHE_MAX_SIZE`] fonts; asking for one more is treated as a
//! resource leak in the caller and aborts via panic.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{error, info, warn};

use crate::error::FontError;
use crate::face::{Face, FaceLoader, FontdueLoader};
use crate::font::{Font, FontId};
use crate::probe_map::{fnv1a, ProbeHash, ProbeMap};

/// Maximum number of distinct fonts.
pub const CACHE_MAX_SIZE: usize = 50;

/// Axis value meaning "use the font's default".
pub const UNSPECIFIED: i32 = i32::MIN;

const FONT_TABLE_CAPACITY: usize = 10;
const FONT_TABLE_GROW: usize = 10;

/// Identifies one cached font.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontKey {
    pub path: PathBuf,
    pub size: u32,
    pub weight: i32,
    pub slant: i32,
    pub width: i32,
}

impl FontKey {
    /// A key with every variation axis unspecified.
    pub fn new(path: impl Into<PathBuf>, size: u32) -> Self {
        Self {
            path: path.into(),
            size,
            weight: UNSPECIFIED,
            slant: UNSPECIFIED,
            width: UNSPECIFIED,
        }
    }

    pub fn weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    pub fn slant(mut self, slant: i32) -> Self {
        self.slant = slant;
        self
    }

    pub fn width(mut self, width: i32) -> Self {
        self.width = width;
        self
    }

    pub fn with_size(&self, size: u32) -> Self {
        Self { size, ..self.clone() }
    }

    fn requested_axes(&self) -> Vec<(&'static str, i32)> {
        [("Weight", self.weight), ("Slant", self.slant), ("Width", self.width)]
            .into_iter()
            .filter(|&(_, v)| v != UNSPECIFIED)
            .collect()
    }
}

impl ProbeHash for FontKey {
    fn probe_hash(&self) -> u64 {
        let mut bytes = self.path.as_os_str().as_encoded_bytes().to_vec();
        for v in [self.size as i32, self.weight, self.slant, self.width] {
            bytes.extend_from_slice(&v.to_le_bytes());
        }
        fnv1a(&bytes)
    }
}

/// Match requested axis values against the face's axes, clamping each to
/// the axis range.
pub fn resolve_axes(key: &FontKey, face: &dyn Face) -> Vec<(String, f32)> {
    let requested = key.requested_axes();
    if requested.is_empty() {
        return Vec::new();
    }

    let axes = face.variation_axes();
    if axes.is_empty() {
        warn!(path = ?key.path, "not a variable font; weight, slant and width are ignored");
        return Vec::new();
    }

    let mut coords = Vec::with_capacity(requested.len());
    for (name, value) in requested {
        let Some(axis) = axes.iter().find(|a| a.name.eq_ignore_ascii_case(name)) else {
            warn!(path = ?key.path, axis = name, "font has no such variation axis");
            continue;
        };

        let mut v = value as f32;
        if v < axis.min {
            warn!(path = ?key.path, axis = name, value, min = axis.min, "axis value below minimum; clamped");
            v = axis.min;
        } else if v > axis.max {
            warn!(path = ?key.path, axis = name, value, max = axis.max, "axis value above maximum; clamped");
            v = axis.max;
        }
        coords.push((axis.name.clone(), v));
    }
    coords
}

/// Loads fonts on demand and keeps them for the life of the cache.
pub struct FontCache {
    loader: Box<dyn FaceLoader>,
    gamma: f32,
    fonts: Mutex<ProbeMap<FontKey, Arc<Font>>>,
    next_id: AtomicU32,
}

impl FontCache {
    pub fn new(loader: impl FaceLoader + 'static, gamma: f32) -> Self {
        Self {
            loader: Box::new(loader),
            gamma,
            fonts: Mutex::new(ProbeMap::new(FONT_TABLE_CAPACITY, FONT_TABLE_GROW)),
            next_id: AtomicU32::new(1),
        }
    }

    /// A cache that rasterizes with fontdue.
    pub fn with_fontdue(gamma: f32) -> Self {
        Self::new(FontdueLoader, gamma)
    }

    fn lock(&self) -> MutexGuard<'_, ProbeMap<FontKey, Arc<Font>>> {
        self.fonts.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Get the font for `key`, loading it on first use.
    ///
    /// # Panics
    ///
    /// When loading would exceed [`CACHE_MAX_SIZE`] fonts.
    pub fn get(&self, key: &FontKey) -> Result<Arc<Font>, FontError> {
        let mut fonts = self.lock();
        if let Some(font) = fonts.get(key) {
            return Ok(font.clone());
        }

        if fonts.len() >= CACHE_MAX_SIZE {
            error!(path = ?key.path, size = key.size, "font cache is full");
            panic!("font cache exhausted: more than {CACHE_MAX_SIZE} distinct fonts requested");
        }

        let mut face = self.loader.load(&key.path, key.size)?;
        let coords = resolve_axes(key, face.as_ref());
        if !coords.is_empty() {
            face.set_variation(&coords);
        }

        let id = FontId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let font = Arc::new(Font::new(id, key.clone(), face, self.gamma));
        info!(path = ?key.path, size = key.size, "loaded font");

        fonts.insert(key.clone(), font.clone());
        Ok(font)
    }

    /// The same file and axes as `base` at another pixel size.
    pub fn font_with_size(&self, base: &Font, size: u32) -> Result<Arc<Font>, FontError> {
        self.get(&base.key().with_size(size))
    }

    /// `base` scaled by `factor`, rounding the pixel size down.
    pub fn font_with_size_factor(&self, base: &Font, factor: f64) -> Result<Arc<Font>, FontError> {
        let size = (base.size() as f64 * factor).floor() as u32;
        self.font_with_size(base, size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unspecified_axes_are_not_requested() {
        let key = FontKey::new("a.ttf", 12).slant(-10);
        assert_eq!(key.requested_axes(), vec![("Slant", -10)]);
    }

    #[test]
    fn keys_differ_in_hash_by_size_and_axes() {
        let a = FontKey::new("a.ttf", 12);
        assert_ne!(a.probe_hash(), a.with_size(13).probe_hash());
        assert_ne!(a.probe_hash(), a.clone().weight(400).probe_hash());
        assert_eq!(a.probe_hash(), FontKey::new("a.ttf", 12).probe_hash());
    }

    #[test]
    fn with_size_keeps_axes() {
        let key = FontKey::new("a.ttf", 12).weight(600).width(90);
        let resized = key.with_size(20);
        assert_eq!(resized.size, 20);
        assert_eq!(resized.weight, 600);
        assert_eq!(resized.width, 90);
        assert_eq!(resized.slant, UNSPECIFIED);
    }
}
