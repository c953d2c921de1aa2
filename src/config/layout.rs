//! Display and layout configuration constants.
//!
//! The panel is a 1.44" ST7735R (128x128). Every element has a fixed anchor;
//! text is drawn with a baseline-relative anchor so a value can be erased by
//! its own bounding box without touching its neighbours.

use embedded_graphics::prelude::Point;

// =============================================================================
// Display Configuration
// =============================================================================

/// Display width in pixels.
pub const SCREEN_WIDTH: u32 = 128;

/// Display height in pixels.
pub const SCREEN_HEIGHT: u32 = 128;

/// Panel RAM column offset of the 1.44" ST7735R module.
pub const PANEL_COLUMN_OFFSET: u16 = 2;

/// Panel RAM row offset of the 1.44" ST7735R module.
pub const PANEL_ROW_OFFSET: u16 = 1;

// =============================================================================
// Element Anchors
// =============================================================================

/// Left margin shared by the left-column elements.
pub const HORIZONTAL_START: i32 = 8;

/// Global vertical shift applied to every element.
pub const VERTICAL_MOVE: i32 = 8;

/// Left edge of the right-column elements (temperature / VOC).
pub const RIGHT_COLUMN_X: i32 = 67;

/// "CO2: good" / "CO2: HIGH" headline.
pub const HEADLINE_POS: Point = Point::new(HORIZONTAL_START, 5 + VERTICAL_MOVE);

/// Large CO2 value.
pub const CO2_VALUE_POS: Point = Point::new(HORIZONTAL_START, 37 + VERTICAL_MOVE);

/// Temperature (SCD4x) or "VOC:" label (SGP30).
pub const SECONDARY_POS: Point = Point::new(RIGHT_COLUMN_X, 76 + VERTICAL_MOVE);

/// Humidity (SCD4x) or VOC value (SGP30).
pub const TERTIARY_POS: Point = Point::new(RIGHT_COLUMN_X, 100 + VERTICAL_MOVE);

/// Top-left corner of the status icon.
pub const ICON_POS: Point = Point::new(HORIZONTAL_START, 89 + VERTICAL_MOVE - 14);

/// Status icon edge length in pixels.
pub const ICON_SIZE: u32 = 28;

const _: () = assert!(RIGHT_COLUMN_X > HORIZONTAL_START + ICON_SIZE as i32);
const _: () = assert!((TERTIARY_POS.y as u32) < SCREEN_HEIGHT);
