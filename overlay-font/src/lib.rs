//! Overlay Font: glyph atlas text cache
//!
//! Opens font files through a pluggable rasterizer, caches rendered glyphs in
//! a paged atlas per font and answers the text queries a UI needs: width,
//! hit offset, wrapping and quad emission.
//!
//! # Usage
//!
//! ```ignore
//! use overlay_font::{FontCache, FontKey};
//!
//! let cache = FontCache::with_fontdue(2.2);
//! let font = cache.get(&FontKey::new("/usr/share/fonts/DejaVuSans.ttf", 14))?;
//! let w = font.text_width("hello");
//! ```

pub mod error;
pub mod probe_map;
pub mod utf8;

// Rasterizer boundary
pub mod face;

// Glyph storage
pub mod atlas;
pub mod font;
pub mod cache;

pub use atlas::{AtlasRegion, AtlasSink, AtlasSlot, GLYPH_TEX_SIZE};
pub use cache::{FontCache, FontKey, CACHE_MAX_SIZE, UNSPECIFIED};
pub use error::FontError;
pub use face::{Face, FaceLoader, FontdueLoader, GlyphBitmap, LineMetrics, VariationAxis};
pub use font::{CachedGlyph, Font, FontId, GlyphQuad, GlyphSink, PRELOAD_CHARS};
