//! Dirty-field rendering of sensor readings.
//!
//! This module provides:
//! - [`PreviousFrameCache`] - What is currently on screen, field by field
//! - [`Renderer`] - Diffs a [`Reading`] against the cache and writes only what changed
//!
//! # Update Strategy
//!
//! | Element | Written when | Content |
//! |---------|--------------|---------|
//! | Background + text colors + icon | `is_high` changed | normal or alert palette |
//! | VOC label color | VOC classification changed | green / red |
//! | Headline | `is_high` changed | "CO2: good" / "CO2: HIGH" |
//! | CO2 value | `co2_ppm` changed | "812" |
//! | Secondary | temperature changed, or first VOC reading | "72°F" or "VOC:" |
//! | Tertiary | humidity or VOC changed | "44%" or "123" |
//!
//! Colors are only ever touched by the color step. The cache is updated
//! after every render, so rendering the same reading twice writes nothing.

use core::fmt::Write;

use heapless::String;

use crate::sensor::{Reading, Secondary, SensorKind};
use crate::surface::{Element, Icon, Surface, TEXT_LEN};
use crate::ui::{GREEN, palette, status_color};

/// Headline while CO2 is below the threshold.
pub const HEADLINE_GOOD: &str = "CO2: good";

/// Headline while CO2 is at or above the threshold.
pub const HEADLINE_HIGH: &str = "CO2: HIGH";

/// Static label shown above the VOC value.
pub const VOC_LABEL: &str = "VOC:";

// =============================================================================
// Previous Frame Cache
// =============================================================================

/// Last rendered value of every field. `None` means never rendered.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct PreviousFrameCache {
    pub co2_ppm: Option<u16>,
    pub secondary: Option<Secondary>,
    pub humidity: Option<u8>,
    pub is_high: Option<bool>,
    pub secondary_high: Option<bool>,
}

impl PreviousFrameCache {
    pub const fn new() -> Self {
        Self {
            co2_ppm: None,
            secondary: None,
            humidity: None,
            is_high: None,
            secondary_high: None,
        }
    }

    /// True until the first reading has been rendered.
    #[inline]
    pub const fn is_empty(&self) -> bool { self.co2_ppm.is_none() }

    fn update(
        &mut self,
        reading: &Reading,
    ) {
        self.co2_ppm = Some(reading.co2_ppm);
        self.secondary = Some(reading.secondary);
        self.humidity = reading.humidity;
        self.is_high = Some(reading.is_high);
        self.secondary_high = Some(reading.secondary_high());
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Writes readings and loading frames to a [`Surface`].
#[derive(Default)]
pub struct Renderer {
    scratch: String<TEXT_LEN>,
}

impl Renderer {
    pub const fn new() -> Self { Self { scratch: String::new() } }

    /// Render `reading`, writing only fields that differ from `cache`, then
    /// update `cache` to match the screen.
    pub fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        reading: &Reading,
        cache: &mut PreviousFrameCache,
    ) {
        self.color_step(surface, reading, cache);
        self.field_step(surface, reading, cache);
        cache.update(reading);
    }

    /// Static loading screen shown before the first frame of the spinner.
    pub fn show_loading<S: Surface>(
        &mut self,
        surface: &mut S,
    ) {
        surface.set_text(Element::Headline, "Loading...");
        surface.set_text(Element::Co2Value, "");
        surface.set_text(Element::Secondary, "...");
        surface.set_text(Element::Tertiary, "...");
        surface.set_icon(Icon::None, GREEN);
    }

    /// One spinner frame: "Loading |" plus the glyph in the value slots.
    ///
    /// The SGP30 layout keeps its "VOC:" slot out of the animation; only the
    /// VOC value spins.
    pub fn show_spinner_frame<S: Surface>(
        &mut self,
        surface: &mut S,
        kind: SensorKind,
        glyph: char,
    ) {
        self.format(format_args!("Loading {glyph}"));
        surface.set_text(Element::Headline, &self.scratch);

        let mut buf = [0u8; 4];
        let glyph = glyph.encode_utf8(&mut buf);
        if kind == SensorKind::Scd4x {
            surface.set_text(Element::Secondary, glyph);
        }
        surface.set_text(Element::Tertiary, glyph);
    }

    fn color_step<S: Surface>(
        &mut self,
        surface: &mut S,
        reading: &Reading,
        cache: &PreviousFrameCache,
    ) {
        let is_high = reading.is_high;
        let secondary_high = reading.secondary_high();
        let is_voc = matches!(reading.secondary, Secondary::Voc(_));

        if cache.is_high != Some(is_high) {
            let palette = palette(is_high);
            surface.set_background(palette.background);
            surface.set_color(Element::Headline, palette.foreground);
            surface.set_color(Element::Co2Value, palette.foreground);
            if !is_voc {
                surface.set_color(Element::Secondary, palette.foreground);
            }
            surface.set_color(Element::Tertiary, palette.foreground);

            let icon = if is_high { Icon::Alert } else { Icon::Ok };
            surface.set_icon(icon, status_color(is_high));
        }

        if is_voc && cache.secondary_high != Some(secondary_high) {
            surface.set_color(Element::Secondary, status_color(secondary_high));
        }
    }

    fn field_step<S: Surface>(
        &mut self,
        surface: &mut S,
        reading: &Reading,
        cache: &PreviousFrameCache,
    ) {
        if cache.is_high != Some(reading.is_high) {
            let headline = if reading.is_high { HEADLINE_HIGH } else { HEADLINE_GOOD };
            surface.set_text(Element::Headline, headline);
        }

        if cache.co2_ppm != Some(reading.co2_ppm) {
            self.format(format_args!("{}", reading.co2_ppm));
            surface.set_text(Element::Co2Value, &self.scratch);
        }

        if cache.secondary != Some(reading.secondary) {
            match reading.secondary {
                Secondary::Temperature(fahrenheit) => {
                    self.format(format_args!("{fahrenheit}°F"));
                    surface.set_text(Element::Secondary, &self.scratch);
                }
                Secondary::Voc(ppb) => {
                    if !matches!(cache.secondary, Some(Secondary::Voc(_))) {
                        surface.set_text(Element::Secondary, VOC_LABEL);
                    }
                    self.format(format_args!("{ppb}"));
                    surface.set_text(Element::Tertiary, &self.scratch);
                }
            }
        }

        if let Some(humidity) = reading.humidity
            && cache.humidity != Some(humidity)
        {
            self.format(format_args!("{humidity}%"));
            surface.set_text(Element::Tertiary, &self.scratch);
        }
    }

    fn format(
        &mut self,
        args: core::fmt::Arguments<'_>,
    ) {
        self.scratch.clear();
        let _ = self.scratch.write_fmt(args);
    }
}

// =============================================================================
// Recording surface for tests
// =============================================================================


#[cfg(test)]
mod tests {
    use super::recording::{Op, RecordingSurface};
    use super::*;
    use crate::ui::{BLACK, RED, WHITE};

    fn scd(co2: u16) -> Reading { Reading::new(co2, Secondary::Temperature(72), Some(44)) }

    fn sgp(
        co2: u16,
        voc: u16,
    ) -> Reading {
        Reading::new(co2, Secondary::Voc(voc), None)
    }

    fn has_color_op(ops: &[Op]) -> bool {
        ops.iter()
            .any(|op| matches!(op, Op::Background(_) | Op::Color(..) | Op::Icon(..)))
    }

    #[test]
    fn test_first_render_writes_everything() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        renderer.render(&mut surface, &scd(812), &mut cache);

        assert!(surface.ops.contains(&Op::Background(BLACK)));
        assert!(surface.ops.contains(&Op::Icon(Icon::Ok, GREEN)));
        assert_eq!(surface.texts(Element::Headline), ["CO2: good"]);
        assert_eq!(surface.texts(Element::Co2Value), ["812"]);
        assert_eq!(surface.texts(Element::Secondary), ["72°F"]);
        assert_eq!(surface.texts(Element::Tertiary), ["44%"]);
        assert_eq!(cache.co2_ppm, Some(812));
        assert_eq!(cache.humidity, Some(44));
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        renderer.render(&mut surface, &scd(812), &mut cache);
        let after_first = cache;
        surface.drain();

        renderer.render(&mut surface, &scd(812), &mut cache);
        assert!(surface.ops.is_empty());
        assert_eq!(cache, after_first);
    }

    #[test]
    fn test_threshold_crossing_scenario() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        // 800: normal palette, "good"
        renderer.render(&mut surface, &scd(800), &mut cache);
        assert!(surface.ops.contains(&Op::Background(BLACK)));
        assert!(surface.ops.contains(&Op::Color(Element::Co2Value, WHITE)));
        surface.drain();

        // 1200: palette flips, headline and value change
        renderer.render(&mut surface, &scd(1200), &mut cache);
        let ops = surface.drain();
        assert!(ops.contains(&Op::Background(WHITE)));
        assert!(ops.contains(&Op::Color(Element::Headline, BLACK)));
        assert!(ops.contains(&Op::Icon(Icon::Alert, RED)));
        assert!(ops.contains(&Op::Text(Element::Headline, "CO2: HIGH".into())));
        assert!(ops.contains(&Op::Text(Element::Co2Value, "1200".into())));
        // Unchanged temperature and humidity are not rewritten
        assert!(!ops.iter().any(|op| matches!(op, Op::Text(Element::Secondary | Element::Tertiary, _))));

        // 1200 again: nothing
        renderer.render(&mut surface, &scd(1200), &mut cache);
        assert!(surface.ops.is_empty());
    }

    #[test]
    fn test_value_change_within_band_skips_color_step() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        renderer.render(&mut surface, &scd(800), &mut cache);
        surface.drain();
        renderer.render(&mut surface, &scd(850), &mut cache);

        let ops = surface.drain();
        assert!(!has_color_op(&ops));
        assert_eq!(ops, [Op::Text(Element::Co2Value, "850".into())]);
    }

    #[test]
    fn test_voc_label_color_follows_voc_threshold() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        renderer.render(&mut surface, &sgp(500, 100), &mut cache);
        assert!(surface.ops.contains(&Op::Color(Element::Secondary, GREEN)));
        assert_eq!(surface.texts(Element::Secondary), ["VOC:"]);
        assert_eq!(surface.texts(Element::Tertiary), ["100"]);
        surface.drain();

        // VOC crosses its threshold while CO2 stays good: only the label recolors
        renderer.render(&mut surface, &sgp(500, 300), &mut cache);
        let ops = surface.drain();
        assert!(ops.contains(&Op::Color(Element::Secondary, RED)));
        assert!(!ops.iter().any(|op| matches!(op, Op::Background(_))));
        assert!(ops.contains(&Op::Text(Element::Tertiary, "300".into())));
    }

    #[test]
    fn test_voc_change_rewrites_only_the_value() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        renderer.render(&mut surface, &sgp(500, 100), &mut cache);
        surface.drain();
        renderer.render(&mut surface, &sgp(500, 120), &mut cache);

        assert_eq!(surface.drain(), [Op::Text(Element::Tertiary, "120".into())]);
    }

    #[test]
    fn test_sgp30_spinner_leaves_voc_label_slot() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();

        renderer.show_spinner_frame(&mut surface, SensorKind::Sgp30, '-');

        assert_eq!(surface.texts(Element::Headline), ["Loading -"]);
        assert!(surface.texts(Element::Secondary).is_empty());
        assert_eq!(surface.texts(Element::Tertiary), ["-"]);
    }

    #[test]
    fn test_palette_flip_keeps_voc_label_color() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();
        let mut cache = PreviousFrameCache::new();

        renderer.render(&mut surface, &sgp(500, 100), &mut cache);
        surface.drain();
        renderer.render(&mut surface, &sgp(1500, 100), &mut cache);

        let ops = surface.drain();
        assert!(ops.contains(&Op::Background(WHITE)));
        assert!(!ops.iter().any(|op| matches!(op, Op::Color(Element::Secondary, _))));
    }

    #[test]
    fn test_loading_and_spinner_frames() {
        let mut renderer = Renderer::new();
        let mut surface = RecordingSurface::new();

        renderer.show_loading(&mut surface);
        renderer.show_spinner_frame(&mut surface, SensorKind::Scd4x, '/');

        assert_eq!(surface.texts(Element::Headline), ["Loading...", "Loading /"]);
        assert_eq!(surface.texts(Element::Co2Value), [""]);
        assert_eq!(surface.texts(Element::Secondary), ["...", "/"]);
        assert_eq!(surface.texts(Element::Tertiary), ["...", "/"]);
        assert!(surface.ops.contains(&Op::Icon(Icon::None, GREEN)));
    }
}
