//! UI styling and visual constants.
//!
//! - `colors`: RGB565 color constants and the normal/alert palettes
//! - `styles`: Fonts and the anchored text style
//! - `icons`: Status icons drawn from primitives

mod colors;
mod icons;
mod styles;

pub use colors::{ALERT_PALETTE, BLACK, GREEN, NORMAL_PALETTE, Palette, RED, WHITE, palette, status_color};
pub use icons::draw_icon;
pub use styles::{ANCHORED_LEFT, HEADLINE_FONT, SIDE_FONT, VALUE_FONT, font_for};
