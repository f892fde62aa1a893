pub mod anim;
pub mod icons;
pub mod view;

pub use anim::{Animator, Look};
pub use icons::IconCache;
pub use view::draw;

pub const ICON_SIZE: i32 = 128;
pub const ICON_FRACTION: f64 = 0.16; // icon edge relative to the popup size
pub const GLYPH_FRACTION: f64 = 0.075; // glyph font size relative to the popup size
pub const TITLE_FRACTION: f64 = 0.05;
pub const CENTER_GLYPH_FRACTION: f64 = 0.1;
pub const INDICATOR_RADIUS: f64 = 3.0;
pub const BORDER_WIDTH: f64 = 1.0;
