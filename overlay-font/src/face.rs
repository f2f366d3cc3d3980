//! Rasterizer boundary.
//!
//! A [`Face`] is one font file opened at one pixel size. The glyph cache only
//! talks to this trait; [`FontdueLoader`] is the production backend.

use std::path::Path;

use fontdue::{Font as FontdueFont, FontSettings};

use crate::error::FontError;

/// Vertical metrics of a face at its pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LineMetrics {
    /// Distance from the baseline to the top of the tallest glyph.
    pub ascender: f32,
    /// Distance from the baseline to the bottom of the lowest glyph (negative).
    pub descender: f32,
    /// Baseline-to-baseline distance.
    pub line_height: f32,
}

/// An 8-bit coverage bitmap and the metrics needed to place it.
#[derive(Debug, Clone, Default)]
pub struct GlyphBitmap {
    pub glyph_index: u16,
    pub width: u32,
    pub height: u32,
    /// Horizontal offset from the pen position to the left of the bitmap.
    pub bearing_x: i32,
    /// Vertical offset from the baseline up to the top of the bitmap.
    pub bearing_y: i32,
    pub advance: f32,
    /// Row-major coverage, `width * height` bytes.
    pub coverage: Vec<u8>,
}

/// A variation axis reported by a variable font.
#[derive(Debug, Clone, PartialEq)]
pub struct VariationAxis {
    pub name: String,
    pub min: f32,
    pub default: f32,
    pub max: f32,
}

/// A font face opened at a fixed pixel size.
pub trait Face: Send {
    fn line_metrics(&self) -> LineMetrics;

    /// Side length of the square atlas cell that fits any glyph of this face.
    fn cell_size(&self) -> u32;

    fn glyph_index(&self, codepoint: u32) -> u16;

    fn rasterize(&mut self, codepoint: u32) -> GlyphBitmap;

    fn has_kerning(&self) -> bool;

    /// Horizontal kerning between two glyph indices, in pixels.
    fn kerning(&self, left: u16, right: u16) -> f32;

    /// Variation axes, empty for a non-variable face.
    fn variation_axes(&self) -> Vec<VariationAxis> {
        Vec::new()
    }

    /// Apply axis coordinates, already clamped to the reported ranges.
    fn set_variation(&mut self, _coords: &[(String, f32)]) {}
}

/// Opens faces from font files.
pub trait FaceLoader: Send + Sync {
    fn load(&self, path: &Path, pixel_size: u32) -> Result<Box<dyn Face>, FontError>;
}

// =========================================================================
// fontdue backend
// =========================================================================

/// Loads faces with fontdue.
///
/// fontdue does not expose variation tables, so faces it loads report no
/// axes and requested weight/slant/width values are ignored with a warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct FontdueLoader;

impl FaceLoader for FontdueLoader {
    fn load(&self, path: &Path, pixel_size: u32) -> Result<Box<dyn Face>, FontError> {
        if pixel_size == 0 {
            return Err(FontError::UnsupportedSize(pixel_size));
        }

        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let px = pixel_size as f32;
        let settings = FontSettings {
            scale: px,
            ..FontSettings::default()
        };
        let font = FontdueFont::from_bytes(bytes, settings).map_err(|reason| FontError::Parse {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        })?;

        let metrics = match font.horizontal_line_metrics(px) {
            Some(m) => LineMetrics {
                ascender: m.ascent,
                descender: m.descent,
                line_height: m.new_line_size,
            },
            None => {
                return Err(FontError::Parse {
                    path: path.to_path_buf(),
                    reason: "no horizontal line metrics".into(),
                });
            }
        };

        Ok(Box::new(FontdueFace { font, px, metrics }))
    }
}

struct FontdueFace {
    font: FontdueFont,
    px: f32,
    metrics: LineMetrics,
}

impl Face for FontdueFace {
    fn line_metrics(&self) -> LineMetrics {
        self.metrics
    }

    fn cell_size(&self) -> u32 {
        let extent = (self.metrics.ascender - self.metrics.descender).ceil() as u32;
        extent.max(self.px.ceil() as u32)
    }

    fn glyph_index(&self, codepoint: u32) -> u16 {
        char::from_u32(codepoint)
            .map(|c| self.font.lookup_glyph_index(c))
            .unwrap_or(0)
    }

    fn rasterize(&mut self, codepoint: u32) -> GlyphBitmap {
        let glyph_index = self.glyph_index(codepoint);
        let (m, coverage) = self.font.rasterize_indexed(glyph_index, self.px);
        GlyphBitmap {
            glyph_index,
            width: m.width as u32,
            height: m.height as u32,
            bearing_x: m.xmin,
            bearing_y: m.ymin + m.height as i32,
            advance: m.advance_width,
            coverage,
        }
    }

    fn has_kerning(&self) -> bool {
        true
    }

    fn kerning(&self, left: u16, right: u16) -> f32 {
        self.font
            .horizontal_kern_indexed(left, right, self.px)
            .unwrap_or(0.0)
    }
}
