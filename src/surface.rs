//! Persistent on-screen scene.
//!
//! The screen holds a fixed set of elements that keep their content between
//! frames. Callers change one property at a time; only the affected element is
//! erased and redrawn, never the whole screen (except for a background change).

use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::Text;
use heapless::String;

use crate::config::layout::{CO2_VALUE_POS, HEADLINE_POS, ICON_POS, ICON_SIZE, SECONDARY_POS, TERTIARY_POS};
use crate::ui::{ANCHORED_LEFT, BLACK, GREEN, WHITE, draw_icon, font_for};

/// Maximum characters per text element.
pub const TEXT_LEN: usize = 16;

// =============================================================================
// Scene Model
// =============================================================================

/// A named on-screen element.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Element {
    /// "CO2: good" / "CO2: HIGH" / "Loading |".
    Headline,
    /// Large CO2 ppm value.
    Co2Value,
    /// Temperature (SCD4x) or "VOC:" label (SGP30).
    Secondary,
    /// Humidity (SCD4x) or VOC ppb (SGP30).
    Tertiary,
    /// Status icon.
    Icon,
}

/// Status glyph shown in the icon slot.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Icon {
    None,
    Ok,
    Alert,
}

/// Retained-mode display the renderer mutates property by property.
pub trait Surface {
    /// Change the screen background.
    fn set_background(
        &mut self,
        color: Rgb565,
    );

    /// Change the text of an element. Ignored for [`Element::Icon`].
    fn set_text(
        &mut self,
        element: Element,
        text: &str,
    );

    /// Change the foreground color of an element.
    fn set_color(
        &mut self,
        element: Element,
        color: Rgb565,
    );

    /// Change the status icon and its color.
    fn set_icon(
        &mut self,
        icon: Icon,
        color: Rgb565,
    );
}

// =============================================================================
// embedded-graphics implementation
// =============================================================================

/// One text element's retained state.
struct TextSlot {
    anchor: Point,
    element: Element,
    text: String<TEXT_LEN>,
    color: Rgb565,
    drawn: Option<Rectangle>,
}

impl TextSlot {
    const fn new(
        element: Element,
        anchor: Point,
    ) -> Self {
        Self {
            anchor,
            element,
            text: String::new(),
            color: WHITE,
            drawn: None,
        }
    }
}

/// [`Surface`] over any Rgb565 `DrawTarget` (the ST7735R in firmware).
pub struct GraphicsSurface<D> {
    display: D,
    background: Rgb565,
    slots: [TextSlot; 4],
    icon: Icon,
    icon_color: Rgb565,
}

impl<D> GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Take over the display and clear it to black.
    pub fn new(display: D) -> Self {
        let mut surface = Self {
            display,
            background: BLACK,
            slots: [
                TextSlot::new(Element::Headline, HEADLINE_POS),
                TextSlot::new(Element::Co2Value, CO2_VALUE_POS),
                TextSlot::new(Element::Secondary, SECONDARY_POS),
                TextSlot::new(Element::Tertiary, TERTIARY_POS),
            ],
            icon: Icon::None,
            icon_color: GREEN,
        };
        surface.display.clear(surface.background).ok();
        surface
    }

    /// Borrow the underlying display.
    pub fn display(&self) -> &D { &self.display }

    /// Current text of an element (empty for the icon).
    pub fn text(
        &self,
        element: Element,
    ) -> &str {
        slot_index(element).map_or("", |i| self.slots[i].text.as_str())
    }

    fn icon_area() -> Rectangle { Rectangle::new(ICON_POS, Size::new(ICON_SIZE, ICON_SIZE)) }

    fn erase(
        &mut self,
        area: Rectangle,
    ) {
        self.display.fill_solid(&area, self.background).ok();
    }

    fn draw_slot(
        &mut self,
        index: usize,
    ) {
        let slot = &self.slots[index];
        if slot.text.is_empty() {
            self.slots[index].drawn = None;
            return;
        }

        let style = MonoTextStyle::new(font_for(slot.element), slot.color);
        let text = Text::with_text_style(slot.text.as_str(), slot.anchor, style, ANCHORED_LEFT);
        let area = text.bounding_box();
        text.draw(&mut self.display).ok();
        self.slots[index].drawn = Some(area);
    }

    fn redraw_slot(
        &mut self,
        index: usize,
    ) {
        if let Some(area) = self.slots[index].drawn.take() {
            self.erase(area);
        }
        self.draw_slot(index);
    }

    fn redraw_icon(&mut self) {
        self.erase(Self::icon_area());
        draw_icon(&mut self.display, self.icon, ICON_POS, ICON_SIZE, self.icon_color);
    }
}

impl<D> Surface for GraphicsSurface<D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn set_background(
        &mut self,
        color: Rgb565,
    ) {
        self.background = color;
        self.display.clear(color).ok();
        for index in 0..self.slots.len() {
            self.draw_slot(index);
        }
        draw_icon(&mut self.display, self.icon, ICON_POS, ICON_SIZE, self.icon_color);
    }

    fn set_text(
        &mut self,
        element: Element,
        text: &str,
    ) {
        let Some(index) = slot_index(element) else {
            return;
        };
        if self.slots[index].text.as_str() == text {
            return;
        }

        let slot = &mut self.slots[index];
        slot.text.clear();
        for c in text.chars() {
            if slot.text.push(c).is_err() {
                break;
            }
        }
        self.redraw_slot(index);
    }

    fn set_color(
        &mut self,
        element: Element,
        color: Rgb565,
    ) {
        match slot_index(element) {
            Some(index) => {
                if self.slots[index].color != color {
                    self.slots[index].color = color;
                    self.redraw_slot(index);
                }
            }
            None => {
                if self.icon_color != color {
                    self.icon_color = color;
                    self.redraw_icon();
                }
            }
        }
    }

    fn set_icon(
        &mut self,
        icon: Icon,
        color: Rgb565,
    ) {
        if self.icon != icon || self.icon_color != color {
            self.icon = icon;
            self.icon_color = color;
            self.redraw_icon();
        }
    }
}

#[inline]
const fn slot_index(element: Element) -> Option<usize> {
    match element {
        Element::Headline => Some(0),
        Element::Co2Value => Some(1),
        Element::Secondary => Some(2),
        Element::Tertiary => Some(3),
        Element::Icon => None,
    }
}

// =============================================================================
// Test display
// =============================================================================

#[cfg(test)]
pub mod testing {
    use std::vec::Vec;

    use embedded_graphics::pixelcolor::Rgb565;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::Rectangle;

    use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};

    /// In-memory framebuffer that counts every pixel written.
    pub struct FrameBuffer {
        pixels: Vec<Rgb565>,
        pub writes: usize,
    }

    impl FrameBuffer {
        pub fn new() -> Self {
            Self {
                pixels: vec![Rgb565::BLACK; (SCREEN_WIDTH * SCREEN_HEIGHT) as usize],
                writes: 0,
            }
        }

        pub fn pixel(
            &self,
            p: Point,
        ) -> Rgb565 {
            self.pixels[(p.y as u32 * SCREEN_WIDTH + p.x as u32) as usize]
        }

        /// Number of pixels of `color` inside `area`.
        pub fn count_in(
            &self,
            area: &Rectangle,
            color: Rgb565,
        ) -> usize {
            area.points()
                .filter(|p| self.bounding_box().contains(*p))
                .filter(|p| self.pixel(*p) == color)
                .count()
        }

        /// Number of pixels of `color` on the whole screen.
        pub fn count(
            &self,
            color: Rgb565,
        ) -> usize {
            self.pixels.iter().filter(|&&c| c == color).count()
        }
    }

    impl OriginDimensions for FrameBuffer {
        fn size(&self) -> Size { Size::new(SCREEN_WIDTH, SCREEN_HEIGHT) }
    }

    impl DrawTarget for FrameBuffer {
        type Color = Rgb565;
        type Error = core::convert::Infallible;

        fn draw_iter<I>(
            &mut self,
            pixels: I,
        ) -> Result<(), Self::Error>
        where
            I: IntoIterator<Item = Pixel<Self::Color>>,
        {
            for Pixel(p, color) in pixels {
                if self.bounding_box().contains(p) {
                    let index = (p.y as u32 * SCREEN_WIDTH + p.x as u32) as usize;
                    self.pixels[index] = color;
                    self.writes += 1;
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FrameBuffer;
    use super::*;
    use crate::ui::RED;

    fn surface() -> GraphicsSurface<FrameBuffer> { GraphicsSurface::new(FrameBuffer::new()) }

    #[test]
    fn test_set_text_draws_in_foreground() {
        let mut s = surface();
        s.set_text(Element::Co2Value, "812");

        assert_eq!(s.text(Element::Co2Value), "812");
        assert!(s.display().count(WHITE) > 0);
    }

    #[test]
    fn test_same_text_does_not_redraw() {
        let mut s = surface();
        s.set_text(Element::Headline, "CO2: good");
        let writes = s.display().writes;

        s.set_text(Element::Headline, "CO2: good");
        assert_eq!(s.display().writes, writes);
    }

    #[test]
    fn test_shorter_text_erases_previous_glyphs() {
        let mut s = surface();
        s.set_text(Element::Co2Value, "1200");
        let wide = s.slots[1].drawn.unwrap();

        s.set_text(Element::Co2Value, "8");
        let narrow = s.slots[1].drawn.unwrap();
        assert!(narrow.size.width < wide.size.width);

        // Everything right of the new glyph is background again
        let right = Rectangle::new(
            Point::new(narrow.top_left.x + narrow.size.width as i32, wide.top_left.y),
            Size::new(wide.size.width - narrow.size.width, wide.size.height),
        );
        assert_eq!(s.display().count_in(&right, WHITE), 0);
    }

    #[test]
    fn test_text_change_leaves_other_elements_alone() {
        let mut s = surface();
        s.set_text(Element::Headline, "CO2: good");
        s.set_text(Element::Tertiary, "44%");
        let headline = s.slots[0].drawn.unwrap();
        let before = s.display().count_in(&headline, WHITE);

        s.set_text(Element::Tertiary, "45%");
        assert_eq!(s.display().count_in(&headline, WHITE), before);
    }

    #[test]
    fn test_background_change_repaints_text_in_new_colors() {
        let mut s = surface();
        s.set_text(Element::Headline, "CO2: HIGH");
        s.set_background(WHITE);
        s.set_color(Element::Headline, BLACK);

        let area = s.slots[0].drawn.unwrap();
        assert!(s.display().count_in(&area, BLACK) > 0);
        assert!(s.display().count(WHITE) > s.display().count(BLACK));
    }

    #[test]
    fn test_icon_drawn_in_its_square() {
        let mut s = surface();
        s.set_icon(Icon::Alert, RED);

        let square = Rectangle::new(ICON_POS, Size::new(ICON_SIZE, ICON_SIZE));
        let red = s.display().count_in(&square, RED);
        assert!(red > 0);
        assert_eq!(s.display().count(RED), red);

        s.set_icon(Icon::None, RED);
        assert_eq!(s.display().count(RED), 0);
    }

    #[test]
    fn test_text_truncated_to_capacity() {
        let mut s = surface();
        s.set_text(Element::Headline, "this headline is far too long");
        assert_eq!(s.text(Element::Headline).len(), TEXT_LEN);
    }
}
