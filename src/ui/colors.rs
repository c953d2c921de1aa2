//! Color constants for the monitor.
//!
//! The panel is driven in Rgb565 (5 bits red, 6 bits green, 5 bits blue), so the
//! built-in `RgbColor` constants are used where they exist.

use embedded_graphics::pixelcolor::{Rgb565, RgbColor};

// =============================================================================
// Standard Colors (from RgbColor trait)
// =============================================================================

/// Pure black (0, 0, 0). Normal background, alert-mode text.
pub const BLACK: Rgb565 = Rgb565::BLACK;

/// Pure white (31, 63, 31). Normal text, alert-mode background.
pub const WHITE: Rgb565 = Rgb565::WHITE;

/// Pure red (31, 0, 0). Alert icon and high VOC label.
pub const RED: Rgb565 = Rgb565::RED;

/// Pure green (0, 63, 0). OK icon and normal VOC label.
pub const GREEN: Rgb565 = Rgb565::GREEN;

// =============================================================================
// Palettes
// =============================================================================

/// Background and text colors applied together.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Palette {
    pub background: Rgb565,
    pub foreground: Rgb565,
}

/// Black background, white text.
pub const NORMAL_PALETTE: Palette = Palette {
    background: BLACK,
    foreground: WHITE,
};

/// White background, black text. Used while CO2 is high.
pub const ALERT_PALETTE: Palette = Palette {
    background: WHITE,
    foreground: BLACK,
};

/// Palette for the current CO2 classification.
#[inline]
pub const fn palette(is_high: bool) -> Palette { if is_high { ALERT_PALETTE } else { NORMAL_PALETTE } }

/// Status color: green when fine, red when over threshold.
#[inline]
pub const fn status_color(high: bool) -> Rgb565 { if high { RED } else { GREEN } }
