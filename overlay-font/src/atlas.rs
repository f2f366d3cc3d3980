//! Paged glyph atlas.
//!
//! Each font owns a layered texture of `GLYPH_TEX_SIZE`² pages divided into
//! square cells. Glyphs take the next cell in insertion order and never move.
//! When the glyph count outgrows the current layers a new layer is appended
//! and the renderer copies the old layers forward.
//!
//! Pixel data is kept CPU-side and uploaded lazily: every write expands a
//! per-layer dirty rectangle that [`GlyphAtlas::flush`] hands to an
//! [`AtlasSink`] before the font's quads are drawn.

use tracing::debug;

use crate::face::GlyphBitmap;
use crate::font::FontId;

/// Side length of one atlas layer, in pixels.
pub const GLYPH_TEX_SIZE: u32 = 512;

/// Where a glyph lives in its font's atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AtlasSlot {
    pub layer: u32,
    pub x: u32,
    pub y: u32,
}

/// A rectangle of single-channel pixels to upload into one layer.
#[derive(Debug, Clone, Copy)]
pub struct AtlasRegion<'a> {
    pub layer: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Row-major, `width * height` bytes.
    pub pixels: &'a [u8],
}

/// Texture primitives the renderer provides for glyph atlases.
pub trait AtlasSink {
    /// Create a layered R8 texture of `size`×`size`×`layers` for `font`.
    fn create_atlas(&mut self, font: FontId, size: u32, layers: u32);

    /// Replace the texture with one of `layers` layers, copying the first
    /// `copy_layers` from the old texture.
    fn grow_atlas(&mut self, font: FontId, layers: u32, copy_layers: u32);

    fn write_atlas(&mut self, font: FontId, region: AtlasRegion<'_>);
}

/// Dirty region tracking for partial texture uploads.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirtyRect {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
    pub is_dirty: bool,
}

impl DirtyRect {
    /// Expand dirty rect to include a new region.
    pub fn expand(&mut self, x: u32, y: u32, width: u32, height: u32) {
        if !self.is_dirty {
            self.min_x = x;
            self.min_y = y;
            self.max_x = x + width;
            self.max_y = y + height;
            self.is_dirty = true;
        } else {
            self.min_x = self.min_x.min(x);
            self.min_y = self.min_y.min(y);
            self.max_x = self.max_x.max(x + width);
            self.max_y = self.max_y.max(y + height);
        }
    }

    /// Reset after upload.
    pub fn clear(&mut self) {
        self.is_dirty = false;
    }
}

/// Lookup table for `ceil((raw / 255)^(1 / gamma) * 255)`.
#[derive(Clone)]
pub struct GammaTable([u8; 256]);

impl GammaTable {
    pub fn new(gamma: f32) -> Self {
        let exponent = 1.0 / gamma as f64;
        let mut table = [0u8; 256];
        for (raw, out) in table.iter_mut().enumerate() {
            let corrected = (raw as f64 / 255.0).powf(exponent) * 255.0;
            *out = corrected.ceil().min(255.0) as u8;
        }
        Self(table)
    }

    #[inline]
    pub fn apply(&self, raw: u8) -> u8 {
        self.0[raw as usize]
    }
}

impl std::fmt::Debug for GammaTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("GammaTable").finish_non_exhaustive()
    }
}

/// The CPU side of one font's layered glyph texture.
#[derive(Debug)]
pub struct GlyphAtlas {
    cell: u32,
    per_row: u32,
    page_capacity: u32,
    glyph_count: u32,
    layers: Vec<Vec<u8>>,
    dirty: Vec<DirtyRect>,
    /// Layers the sink currently holds; 0 until the first flush.
    synced_layers: u32,
    gamma: GammaTable,
}

impl GlyphAtlas {
    pub fn new(cell_size: u32, gamma: f32) -> Self {
        let cell = cell_size.clamp(1, GLYPH_TEX_SIZE);
        let per_row = GLYPH_TEX_SIZE / cell;
        Self {
            cell,
            per_row,
            page_capacity: per_row * per_row,
            glyph_count: 0,
            layers: vec![Self::blank_layer()],
            dirty: vec![DirtyRect::default()],
            synced_layers: 0,
            gamma: GammaTable::new(gamma),
        }
    }

    fn blank_layer() -> Vec<u8> {
        vec![0u8; (GLYPH_TEX_SIZE * GLYPH_TEX_SIZE) as usize]
    }

    pub fn cell_size(&self) -> u32 {
        self.cell
    }

    /// Glyphs that fit in one layer.
    pub fn page_capacity(&self) -> u32 {
        self.page_capacity
    }

    pub fn glyph_count(&self) -> u32 {
        self.glyph_count
    }

    pub fn layer_count(&self) -> u32 {
        self.layers.len() as u32
    }

    /// CPU copy of a layer.
    pub fn layer_pixels(&self, layer: u32) -> Option<&[u8]> {
        self.layers.get(layer as usize).map(Vec::as_slice)
    }

    /// Assign the next cell to `bitmap` and copy its gamma-corrected coverage in.
    pub fn insert(&mut self, bitmap: &GlyphBitmap) -> AtlasSlot {
        let index = self.glyph_count;
        self.glyph_count += 1;

        if self.glyph_count > self.page_capacity * self.layer_count() {
            self.layers.push(Self::blank_layer());
            self.dirty.push(DirtyRect::default());
            debug!(layers = self.layers.len(), "glyph atlas grew a layer");
        }

        let slot = AtlasSlot {
            layer: self.layer_count() - 1,
            x: (index % self.per_row) * self.cell,
            y: ((index % self.page_capacity) / self.per_row) * self.cell,
        };

        let w = bitmap.width.min(self.cell);
        let h = bitmap.height.min(self.cell);
        if w > 0 && h > 0 {
            let layer = &mut self.layers[slot.layer as usize];
            for row in 0..h {
                let src = (row * bitmap.width) as usize;
                let dst = ((slot.y + row) * GLYPH_TEX_SIZE + slot.x) as usize;
                for col in 0..w as usize {
                    let raw = bitmap.coverage.get(src + col).copied().unwrap_or(0);
                    layer[dst + col] = self.gamma.apply(raw);
                }
            }
            self.dirty[slot.layer as usize].expand(slot.x, slot.y, w, h);
        }

        slot
    }

    /// Push texture changes since the last flush to `sink`.
    pub fn flush<S: AtlasSink + ?Sized>(&mut self, font: FontId, sink: &mut S) {
        let layers = self.layer_count();
        if self.synced_layers == 0 {
            sink.create_atlas(font, GLYPH_TEX_SIZE, layers);
        } else if layers > self.synced_layers {
            sink.grow_atlas(font, layers, self.synced_layers);
        }
        self.synced_layers = layers;

        for (layer, dirty) in self.dirty.iter_mut().enumerate() {
            if !dirty.is_dirty {
                continue;
            }
            let width = dirty.max_x - dirty.min_x;
            let height = dirty.max_y - dirty.min_y;
            let mut pixels = Vec::with_capacity((width * height) as usize);
            for y in dirty.min_y..dirty.max_y {
                let start = (y * GLYPH_TEX_SIZE + dirty.min_x) as usize;
                pixels.extend_from_slice(&self.layers[layer][start..start + width as usize]);
            }
            sink.write_atlas(
                font,
                AtlasRegion {
                    layer: layer as u32,
                    x: dirty.min_x,
                    y: dirty.min_y,
                    width,
                    height,
                    pixels: &pixels,
                },
            );
            dirty.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bitmap(width: u32, height: u32, value: u8) -> GlyphBitmap {
        GlyphBitmap {
            width,
            height,
            coverage: vec![value; (width * height) as usize],
            advance: width as f32,
            ..GlyphBitmap::default()
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        created: Vec<(u32, u32)>,
        grown: Vec<(u32, u32)>,
        writes: Vec<(u32, u32, u32, u32, u32)>,
    }

    impl AtlasSink for RecordingSink {
        fn create_atlas(&mut self, _font: FontId, size: u32, layers: u32) {
            self.created.push((size, layers));
        }

        fn grow_atlas(&mut self, _font: FontId, layers: u32, copy_layers: u32) {
            self.grown.push((layers, copy_layers));
        }

        fn write_atlas(&mut self, _font: FontId, region: AtlasRegion<'_>) {
            assert_eq!(region.pixels.len(), (region.width * region.height) as usize);
            self.writes
                .push((region.layer, region.x, region.y, region.width, region.height));
        }
    }

    #[test]
    fn gamma_table_endpoints_and_curve() {
        let table = GammaTable::new(2.2);
        assert_eq!(table.apply(0), 0);
        assert_eq!(table.apply(255), 255);
        let expected = ((128.0f64 / 255.0).powf(1.0 / 2.2) * 255.0).ceil() as u8;
        assert_eq!(table.apply(128), expected);
        assert!(table.apply(64) > 64);
    }

    #[test]
    fn slots_fill_rows_then_pages() {
        // 128px cells: 4 per row, 16 per layer
        let mut atlas = GlyphAtlas::new(128, 2.2);
        assert_eq!(atlas.page_capacity(), 16);

        let slots: Vec<AtlasSlot> = (0..17).map(|_| atlas.insert(&bitmap(4, 4, 255))).collect();
        assert_eq!(slots[0], AtlasSlot { layer: 0, x: 0, y: 0 });
        assert_eq!(slots[3], AtlasSlot { layer: 0, x: 384, y: 0 });
        assert_eq!(slots[4], AtlasSlot { layer: 0, x: 0, y: 128 });
        assert_eq!(slots[15], AtlasSlot { layer: 0, x: 384, y: 384 });
        assert_eq!(slots[16], AtlasSlot { layer: 1, x: 0, y: 0 });
        assert_eq!(atlas.layer_count(), 2);
    }

    #[test]
    fn oversized_bitmaps_are_clipped_to_the_cell() {
        let mut atlas = GlyphAtlas::new(256, 1.0);
        atlas.insert(&bitmap(4, 4, 1));
        let slot = atlas.insert(&bitmap(300, 300, 255));
        assert_eq!(slot, AtlasSlot { layer: 0, x: 256, y: 0 });

        let pixels = atlas.layer_pixels(0).unwrap_or_default();
        assert_eq!(pixels[(255 * GLYPH_TEX_SIZE + 511) as usize], 255);
        assert_eq!(pixels[(256 * GLYPH_TEX_SIZE + 256) as usize], 0);
    }

    #[test]
    fn flush_creates_then_grows_and_writes_dirty_regions() {
        let mut atlas = GlyphAtlas::new(256, 2.2);
        let mut sink = RecordingSink::default();

        atlas.insert(&bitmap(10, 12, 255));
        atlas.insert(&bitmap(0, 0, 0));
        atlas.flush(FontId(1), &mut sink);
        assert_eq!(sink.created, vec![(GLYPH_TEX_SIZE, 1)]);
        assert_eq!(sink.writes, vec![(0, 0, 0, 10, 12)]);

        // nothing new: no uploads
        atlas.flush(FontId(1), &mut sink);
        assert_eq!(sink.writes.len(), 1);

        // 4 cells per layer at 256px; the fifth glyph opens layer 1
        for _ in 0..3 {
            atlas.insert(&bitmap(3, 3, 255));
        }
        atlas.flush(FontId(1), &mut sink);
        assert_eq!(sink.grown, vec![(2, 1)]);
        assert_eq!(sink.writes.len(), 3);
        assert_eq!(sink.writes[1], (0, 0, 256, 259, 3));
        assert_eq!(sink.writes[2], (1, 0, 0, 3, 3));
    }
}
