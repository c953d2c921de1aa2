//! Fonts and text styles for the 128x128 layout.
//!
//! Colors change at runtime (palette flips), so only fonts and the alignment
//! style are constants; callers build `MonoTextStyle::new(FONT, color)`.

use embedded_graphics::mono_font::{MonoFont, ascii, iso_8859_1};
use embedded_graphics::text::{Alignment, Baseline, TextStyle, TextStyleBuilder};
use profont::PROFONT_24_POINT;

use crate::surface::Element;

// =============================================================================
// Text Alignment
// =============================================================================

/// Left-aligned, vertically centred on the anchor point.
pub const ANCHORED_LEFT: TextStyle = TextStyleBuilder::new()
    .alignment(Alignment::Left)
    .baseline(Baseline::Middle)
    .build();

// =============================================================================
// Fonts
// =============================================================================

/// Headline font ("CO2: good", "Loading |").
pub const HEADLINE_FONT: &MonoFont = &ascii::FONT_10X20;

/// Large CO2 value (`ProFont` 24pt).
pub const VALUE_FONT: &MonoFont = &PROFONT_24_POINT;

/// Right-column font. Latin-1 for the degree sign.
pub const SIDE_FONT: &MonoFont = &iso_8859_1::FONT_10X20;

/// Font used for a text element.
#[inline]
pub const fn font_for(element: Element) -> &'static MonoFont<'static> {
    match element {
        Element::Headline => HEADLINE_FONT,
        Element::Co2Value => VALUE_FONT,
        Element::Secondary | Element::Tertiary | Element::Icon => SIDE_FONT,
    }
}
