//! Glyph cache behavior against a deterministic face.

mod common;

use std::sync::Arc;

use common::{FakeFace, RecordingSink, SinkCall, Stats, ADVANCE, LINE_HEIGHT};
use overlay_font::{Font, FontId, FontKey, PRELOAD_CHARS};

fn font_with_cell(cell: u32) -> (Font, Arc<Stats>) {
    let stats = Arc::new(Stats::default());
    let face = FakeFace::new(cell, stats.clone());
    let font = Font::new(FontId(1), FontKey::new("fake.ttf", 14), Box::new(face), 1.0);
    (font, stats)
}

fn font() -> (Font, Arc<Stats>) {
    font_with_cell(16)
}

const PRELOADED: usize = PRELOAD_CHARS.len() + 52;

#[test]
fn creation_preloads_ascii() {
    let (font, stats) = font();
    assert_eq!(stats.rasterized(), PRELOADED);
    assert_eq!(font.glyph_count() as usize, PRELOADED);
}

#[test]
fn glyph_lookup_is_idempotent() {
    let (font, stats) = font();
    let first = font.glyph('x' as u32);
    let second = font.glyph('x' as u32);
    assert_eq!(first, second);
    assert_eq!(stats.rasterized(), PRELOADED);

    let e1 = font.glyph('é' as u32);
    let e2 = font.glyph('é' as u32);
    assert_eq!(e1, e2);
    assert_eq!(stats.rasterized(), PRELOADED + 1);
}

#[test]
fn multibyte_character_is_one_glyph() {
    let (font, _) = font();
    assert_eq!(font.text_width("é"), ADVANCE as i32);
    assert_eq!(font.text_width("aéb"), 3 * ADVANCE as i32);
    assert_eq!(font.glyph_count() as usize, PRELOADED + 1);
}

#[test]
fn metrics_come_from_the_face() {
    let (font, _) = font();
    assert_eq!(font.line_spacing(), LINE_HEIGHT as i32);
    assert_eq!(font.text_height(), 16);
    assert_eq!(font.text_width(""), 0);
}

#[test]
fn kerning_is_applied_and_cached() {
    let (font, stats) = font();
    assert_eq!(font.text_width("AV"), 18);
    assert_eq!(font.text_width("AV"), 18);
    assert_eq!(stats.kern_lookups(), 1);
    assert_eq!(font.text_width("VA"), 20);
}

#[test]
fn atlas_pages_fill_in_order() {
    let (font, _) = font_with_cell(128);
    assert_eq!(font.page_capacity(), 16);
    // 95 preloaded glyphs across 16-glyph layers.
    assert_eq!(font.atlas_layers(), 6);

    let g = font.glyph('a' as u32);
    // 'a' is glyph 43: layer 2, slot 11.
    assert_eq!(g.slot.layer, 2);
    assert_eq!(g.slot.x, 3 * 128);
    assert_eq!(g.slot.y, 2 * 128);
}

#[test]
fn index_of_width_finds_first_overflowing_char() {
    let (font, _) = font();
    assert_eq!(font.index_of_width("abcd", 25), 2);
    assert_eq!(font.index_of_width("abcd", 40), 4);
    assert_eq!(font.index_of_width("abcd", 100), 4);
    assert_eq!(font.index_of_width("", 10), 0);
    assert_eq!(font.index_of_width("éé", 15), 2);
}

#[test]
fn wrap_breaks_at_last_space() {
    let (font, _) = font();
    assert_eq!(font.wrap("aaa bbb", 50), vec![0..3, 4..7]);
    assert_eq!(font.wrap("aaaa bb", 40), vec![0..4, 5..7]);
}

#[test]
fn wrap_hard_breaks_long_words() {
    let (font, _) = font();
    assert_eq!(font.wrap("aaaaaaa", 35), vec![0..3, 3..6, 6..7]);
    assert_eq!(font.wrap("abc", 5), vec![0..1, 1..2, 2..3]);
}

#[test]
fn wrap_keeps_empty_paragraphs() {
    let (font, _) = font();
    assert_eq!(font.wrap("ab\n\ncd", 100), vec![0..2, 3..3, 4..6]);
    assert_eq!(font.wrap("", 100), vec![0..0]);
}

#[test]
fn first_draw_uploads_atlas_before_quads() {
    let (font, _) = font();
    let mut sink = RecordingSink::default();
    font.draw_text(&mut sink, 5.0, 0.0, "a b", 0xFFFFFFFF);

    assert_eq!(sink.calls[0], SinkCall::Create { layers: 1 });
    assert!(matches!(sink.calls[1], SinkCall::Write { layer: 0, .. }));

    let quads = sink.quads();
    assert_eq!(quads.len(), 2, "space has no quad");

    let a = quads[0];
    assert_eq!((a.left, a.top, a.right, a.bottom), (6.0, 2.0, 14.0, 12.0));
    // 'a' is glyph 43 in 16px cells, 32 per row.
    assert_eq!((a.tex_left, a.tex_top), (176.0, 16.0));
    assert_eq!((a.tex_right, a.tex_bottom), (184.0, 26.0));
    assert_eq!(a.color, 0xFFFFFFFF);

    let b = quads[1];
    assert_eq!(b.left, 5.0 + 2.0 * ADVANCE + 1.0);
}

#[test]
fn redraw_only_emits_quads() {
    let (font, _) = font();
    let mut sink = RecordingSink::default();
    font.draw_text(&mut sink, 0.0, 0.0, "ab", 0xFF0000FF);

    let mut again = RecordingSink::default();
    font.draw_text(&mut again, 0.0, 0.0, "ab", 0xFF0000FF);
    assert_eq!(again.calls.len(), 2);
    assert!(again.calls.iter().all(|c| matches!(c, SinkCall::Quad(_))));
}

#[test]
fn new_glyph_is_written_before_its_quad() {
    let (font, _) = font();
    font.draw_text(&mut RecordingSink::default(), 0.0, 0.0, "a", 0);

    let mut sink = RecordingSink::default();
    font.draw_text(&mut sink, 0.0, 0.0, "é", 0);
    assert!(matches!(sink.calls[0], SinkCall::Write { layer: 0, width: 8, height: 10, .. }));
    assert!(matches!(sink.calls[1], SinkCall::Quad(_)));
}

#[test]
fn atlas_growth_is_reported_as_grow() {
    let (font, _) = font_with_cell(128);
    font.draw_text(&mut RecordingSink::default(), 0.0, 0.0, "a", 0);

    // Glyph 96 fills the sixth layer; glyph 97 needs a seventh.
    let mut sink = RecordingSink::default();
    font.draw_text(&mut sink, 0.0, 0.0, "é", 0);
    assert!(!sink.calls.iter().any(|c| matches!(c, SinkCall::Grow { .. })));

    let mut sink = RecordingSink::default();
    font.draw_text(&mut sink, 0.0, 0.0, "ü", 0);
    assert_eq!(sink.calls[0], SinkCall::Grow { layers: 7, copy: 6 });
    assert_eq!(font.atlas_layers(), 7);
}
