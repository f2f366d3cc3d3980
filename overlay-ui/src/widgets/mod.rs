//! Built-in element variants.

mod button;
mod entry;
mod image;
mod menu;
mod polyline;
mod scroll_view;
mod separator;
mod text;
mod window;

pub use button::Button;
pub use entry::TextEntry;
pub use image::Image;
pub use menu::{Menu, MenuItem, SUBMENU_ICON};
pub use polyline::Polyline;
pub use scroll_view::ScrollView;
pub use separator::Separator;
pub use text::Text;
pub use window::Window;
