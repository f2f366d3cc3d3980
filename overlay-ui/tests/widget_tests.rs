//! Window, menu, text and image behavior.

mod common;

use std::sync::Arc;

use common::{click, events, frame, move_to, press, record, release, ui, ADVANCE, LINE_SPACING};
use overlay_ui::{
    Color, Menu, Point, Projection, SettingsStore, Size, TextureId, TextureRef, UiError, Window,
};

fn image_window(ui: &overlay_ui::UiContext, title: Option<&str>) -> overlay_ui::ElementRef {
    let window = ui.window(title);
    let content = ui.image(TextureId(1), Size::new(40, 30));
    window.with_window(|w| w.set_child(Some(content)));
    window
}

#[test]
fn window_follows_child_size() {
    let ui = ui();
    let titled = image_window(&ui, Some("Stats"));
    let bare = image_window(&ui, None);
    bare.set_pos(Point::new(200, 0));
    ui.add_top_level(&titled);
    ui.add_top_level(&bare);

    frame(&ui);
    let bar = LINE_SPACING + 2;
    assert_eq!(titled.with_window(|w| w.titlebar_height()), Some(bar));
    assert_eq!(titled.size(), Size::new(44, 30 + bar + 3));
    assert_eq!(bare.size(), Size::new(44, 34));

    let child = titled.with_window(|w| w.child().cloned()).flatten().unwrap();
    assert_eq!(child.pos(), Point::new(2, bar));
    assert_eq!(child.size(), Size::new(40, 30));
}

#[test]
fn titlebar_drag_moves_the_window() {
    let ui = ui();
    let window = image_window(&ui, Some("Stats"));
    window.set_pos(Point::new(100, 100));
    ui.add_top_level(&window);
    frame(&ui);

    move_to(&ui, 110, 105);
    press(&ui, 110, 105);
    assert_eq!(window.with_window(|w| w.is_moving()), Some(true));
    assert_eq!(ui.capture_id(), Some(window.id()));

    move_to(&ui, 130, 125);
    assert_eq!(window.pos(), Point::new(120, 120));

    release(&ui, 130, 125);
    assert_eq!(window.with_window(|w| w.is_moving()), Some(false));
    assert_eq!(ui.capture_id(), None);
}

#[test]
fn edge_drag_resizes_and_respects_min_size() {
    let ui = ui();
    let window = ui.window(Some("Log"));
    window.with_window(|w| w.set_resizable(true));
    window.set_size(Size::new(100, 80));
    ui.add_top_level(&window);
    frame(&ui);

    move_to(&ui, 98, 40);
    press(&ui, 98, 40);
    assert_eq!(window.with_window(|w| w.is_resizing()), Some(true));
    move_to(&ui, 118, 40);
    assert_eq!(window.size(), Size::new(120, 80));

    move_to(&ui, -300, 40);
    assert_eq!(window.size().width, ui.config().window_min_size);
    release(&ui, -300, 40);
    assert_eq!(ui.capture_id(), None);
}

#[test]
fn pressing_a_window_raises_it() {
    let ui = ui();
    let first = image_window(&ui, None);
    let second = image_window(&ui, None);
    second.set_pos(Point::new(30, 0));
    ui.add_top_level(&first);
    ui.add_top_level(&second);
    frame(&ui);

    move_to(&ui, 35, 20);
    assert_eq!(ui.hover_id(), Some(second.id()));

    press(&ui, 5, 20);
    release(&ui, 5, 20);
    frame(&ui);
    move_to(&ui, 36, 20);
    assert_eq!(ui.hover_id(), Some(first.id()));
}

#[test]
fn window_geometry_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.json");
    let settings = Arc::new(SettingsStore::open(path.clone()).unwrap());
    settings.set("windows.stats.x", 300).unwrap();
    settings.set("windows.stats.y", 200).unwrap();

    let ui = ui();
    let window = image_window(&ui, None);
    assert!(Window::bind_settings(&window, settings.clone(), "windows.stats"));
    assert_eq!(window.pos(), Point::new(300, 200));
    assert!(!Window::bind_settings(&ui.text("x"), settings.clone(), "nope"));

    ui.add_top_level(&window);
    frame(&ui);

    let reloaded = SettingsStore::open(path).unwrap();
    assert_eq!(reloaded.get_i64("windows.stats.x"), Some(300));
    assert_eq!(reloaded.get_i64("windows.stats.width"), Some(44));
    assert_eq!(reloaded.get_i64("windows.stats.height"), Some(34));
}

/// Notes whether the settings file exists each time the frame paints.
struct FileWatcher {
    path: std::path::PathBuf,
    seen: Vec<bool>,
}

impl overlay_font::AtlasSink for FileWatcher {
    fn create_atlas(&mut self, _font: overlay_font::FontId, _size: u32, _layers: u32) {}

    fn grow_atlas(&mut self, _font: overlay_font::FontId, _layers: u32, _copy_layers: u32) {}

    fn write_atlas(&mut self, _font: overlay_font::FontId, _region: overlay_font::AtlasRegion<'_>) {}
}

impl overlay_ui::Renderer for FileWatcher {
    fn draw_rect(&mut self, _rect: overlay_ui::Rect, _color: Color, _projection: &Projection) {
        self.seen.push(self.path.exists());
    }

    fn draw_textured_quad(&mut self, _quad: &overlay_ui::TexturedQuad, _projection: &Projection) {}

    fn push_scissor(&mut self, _rect: overlay_ui::Rect) {}

    fn pop_scissor(&mut self) {}
}

#[test]
fn window_geometry_is_written_after_the_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("overlay.json");
    let settings = Arc::new(SettingsStore::open(path.clone()).unwrap());

    let ui = ui();
    let window = image_window(&ui, None);
    assert!(Window::bind_settings(&window, settings.clone(), "win"));
    ui.add_top_level(&window);

    let draw = |ui: &overlay_ui::UiContext| {
        let mut watcher = FileWatcher { path: path.clone(), seen: Vec::new() };
        ui.draw(&mut watcher, Projection::orthographic(1280.0, 720.0));
        watcher.seen
    };

    std::fs::remove_file(&path).unwrap();
    let seen = draw(&ui);
    assert!(!seen.is_empty());
    assert!(seen.iter().all(|exists| !exists));
    assert!(path.exists());
    assert_eq!(SettingsStore::open(path.clone()).unwrap().get_i64("win.width"), Some(44));

    // same geometry: nothing to write
    std::fs::remove_file(&path).unwrap();
    draw(&ui);
    assert!(!path.exists());

    // child grew: written once the frame is done
    let child = window.with_window(|w| w.child().cloned()).flatten().unwrap();
    child.with_image(|i| i.set_image(TextureId(1), Size::new(60, 30)));
    let seen = draw(&ui);
    assert!(seen.iter().all(|exists| !exists));
    assert_eq!(SettingsStore::open(path).unwrap().get_i64("win.width"), Some(64));
}

fn labeled_item(ui: &overlay_ui::UiContext, label: &str) -> overlay_ui::ElementRef {
    ui.menu_item(Some(&ui.text(label)), None)
}

#[test]
fn menu_sizes_to_its_items_and_routes_clicks() {
    let ui = ui();
    let menu = ui.menu();
    let open = labeled_item(&ui, "Open");
    let save = labeled_item(&ui, "Save");
    assert!(Menu::add_item(&menu, &open));
    assert!(Menu::add_item(&menu, &save));
    assert!(!Menu::add_item(&menu, &ui.text("not an item")));

    // label 40x20, icon column 18, arrow column 20, 5px each side
    assert_eq!(open.preferred_size(), Some(Size::new(88, 24)));
    let open_log = record(&open);
    let menu_log = record(&menu);

    Menu::show(&menu, &ui, 100, 100);
    assert_eq!(menu.size(), Size::new(90, 50));
    assert_eq!(ui.capture_id(), Some(menu.id()));
    frame(&ui);
    assert_eq!(save.pos(), Point::new(0, 24));
    assert_eq!(save.size(), Size::new(88, 24));

    click(&ui, 110, 110);
    assert_eq!(events(&open_log), vec!["enter", "click-left"]);
    assert_eq!(ui.top_level_count(), 1);

    press(&ui, 10, 10);
    assert_eq!(events(&menu_log), vec!["hide"]);
    assert_eq!(ui.top_level_count(), 0);
    assert_eq!(ui.capture_id(), None);
}

#[test]
fn menu_item_ignores_a_drag_that_started_elsewhere() {
    let ui = ui();
    let menu = ui.menu();
    let open = labeled_item(&ui, "Open");
    let save = labeled_item(&ui, "Save");
    Menu::add_item(&menu, &open);
    Menu::add_item(&menu, &save);
    let open_log = record(&open);
    let save_log = record(&save);

    Menu::show(&menu, &ui, 100, 100);
    frame(&ui);

    press(&ui, 110, 135);
    move_to(&ui, 110, 110);
    release(&ui, 110, 110);
    assert_eq!(events(&save_log), vec!["enter", "leave"]);
    assert_eq!(events(&open_log), vec!["enter"]);
}

#[test]
fn hovering_an_item_opens_its_submenu() {
    let ui = ui();
    let menu = ui.menu();
    let file = labeled_item(&ui, "File");
    let recent = labeled_item(&ui, "Last");
    Menu::add_item(&menu, &file);
    Menu::add_item(&menu, &recent);

    let sub = ui.menu();
    let deep = labeled_item(&ui, "Deep");
    Menu::add_item(&sub, &deep);
    recent.with_menu_item(|mi| mi.set_submenu(Some(sub.clone())));

    Menu::show(&menu, &ui, 100, 100);
    frame(&ui);

    move_to(&ui, 110, 130);
    let open = menu.with_menu(|m| m.open_submenu().map(|s| s.id())).flatten();
    assert_eq!(open, Some(sub.id()));
    assert_eq!(sub.pos(), Point::new(179, 125));
    assert_eq!(sub.with_menu(|m| m.is_submenu()), Some(true));

    frame(&ui);
    assert_eq!(sub.size(), Size::new(90, 26));

    // Inside the submenu: the menu chain stays open.
    press(&ui, 200, 130);
    release(&ui, 200, 130);
    assert_eq!(ui.top_level_count(), 1);

    // Hovering an item without a submenu closes it.
    move_to(&ui, 110, 110);
    assert_eq!(menu.with_menu(|m| m.open_submenu().is_none()), Some(true));

    Menu::hide(&menu, &ui);
    assert_eq!(ui.top_level_count(), 0);
    assert_eq!(ui.capture_id(), None);
}

#[test]
fn menu_separator_is_a_disabled_item() {
    let ui = ui();
    let menu = ui.menu();
    Menu::add_item(&menu, &labeled_item(&ui, "Open"));
    let separator = Menu::add_separator(&menu, &ui);

    assert_eq!(menu.with_menu(|m| m.item_count()), Some(2));
    assert_eq!(separator.with_menu_item(|mi| mi.enabled()), Some(false));
    assert_eq!(separator.preferred_size().map(|s| s.height), Some(7));
}

#[test]
fn text_measures_lines_and_expands_tabs() {
    let ui = ui();
    let tabbed = ui.text("a\tb");
    assert_eq!(tabbed.with_text(|t| t.text().to_string()).as_deref(), Some("a    b"));
    assert_eq!(tabbed.preferred_size(), Some(Size::new(6 * ADVANCE, LINE_SPACING + 2)));

    let lines = ui.text("ab\ncde");
    assert_eq!(lines.with_text(|t| t.line_count()), Some(2));
    assert_eq!(
        lines.preferred_size(),
        Some(Size::new(3 * ADVANCE, 2 * LINE_SPACING + 2))
    );
}

#[test]
fn text_draws_one_quad_per_visible_glyph() {
    let ui = ui();
    let label = ui.text("a b");
    label.set_pos(Point::new(10, 10));
    label.set_size(Size::new(100, 20));
    ui.add_top_level(&label);

    let drawn = frame(&ui);
    assert_eq!(drawn.quads.len(), 2);
    assert!(drawn.quads.iter().all(|q| q.color == ui.theme().text));
    assert!(drawn.quads.iter().all(|q| matches!(q.texture, TextureRef::FontAtlas(_))));
    assert_eq!(drawn.atlases.len(), 1);
}

#[test]
fn empty_entry_shows_its_hint() {
    let ui = ui();
    let entry = ui.entry();
    entry.with_entry(|e| e.set_hint(Some("find")));
    assert_eq!(entry.preferred_size(), Some(Size::new(50, LINE_SPACING + 6)));
    entry.set_size(Size::new(100, 24));
    ui.add_top_level(&entry);

    let drawn = frame(&ui);
    let hint: Vec<_> = drawn
        .quads
        .iter()
        .filter(|q| q.color == ui.theme().entry_hint)
        .collect();
    assert_eq!(hint.len(), 4);
}

#[test]
fn image_draws_a_textured_quad() {
    let ui = ui();
    let image = ui.image(TextureId(7), Size::new(16, 16));
    image.set_pos(Point::new(5, 5));
    image.set_size(Size::new(10, 10));
    image.set_bg_color(Color(0xff0000ff));
    ui.add_top_level(&image);

    let drawn = frame(&ui);
    assert_eq!(drawn.quads.len(), 1);
    assert_eq!(drawn.quads[0].texture, TextureRef::Image(TextureId(7)));
    assert_eq!(drawn.quads[0].rect, [5.0, 5.0, 15.0, 15.0]);
    assert_eq!(drawn.rects_of(Color(0xff0000ff)), vec![overlay_ui::Rect::new(5, 5, 10, 10)]);
}

#[test]
fn icon_codepoints_come_from_the_configured_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("icons.codepoints");
    std::fs::write(&path, "home e88a\nchevron_right e5cc\nbroken zzzz\n").unwrap();
    let mut config = overlay_ui::UiConfig::default();
    config.icon_codepoints = path.clone();
    let ui = common::ui_with(config);

    assert_eq!(ui.icon_codepoint("home").unwrap(), "\u{e88a}");
    assert!(matches!(ui.icon_codepoint("settings"), Err(UiError::UnknownIcon(name)) if name == "settings"));
    assert!(matches!(ui.icon_codepoint("broken"), Err(UiError::InvalidCodepoint { .. })));

    let item = ui.menu_item(None, None);
    assert_eq!(item.with_menu_item(|mi| mi.arrow().map(str::to_string)).flatten().as_deref(), Some("\u{e5cc}"));

    // found names are served from memory
    std::fs::remove_file(&path).unwrap();
    assert_eq!(ui.icon_codepoint("home").unwrap(), "\u{e88a}");
    assert!(matches!(ui.icon_codepoint("add"), Err(UiError::IconCodepoints { .. })));
}

#[test]
fn missing_codepoints_leave_submenus_without_an_arrow() {
    let mut config = overlay_ui::UiConfig::default();
    config.icon_codepoints = "does/not/exist.codepoints".into();
    let ui = common::ui_with(config);
    let item = ui.menu_item(None, None);
    assert_eq!(item.with_menu_item(|mi| mi.arrow().is_none()), Some(true));
}
