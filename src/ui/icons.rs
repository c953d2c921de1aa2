//! Status icons drawn from primitives.
//!
//! Both icons fit a `size` x `size` square anchored at its top-left corner.
//! Strokes scale with the icon and outlines are inset by one stroke width so
//! erasing the square removes the whole icon.

use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Circle, Line, PrimitiveStyle, Rectangle, Triangle};

use crate::surface::Icon;

/// Draw `icon` into the square at `top_left`. [`Icon::None`] draws nothing.
pub fn draw_icon<D>(
    display: &mut D,
    icon: Icon,
    top_left: Point,
    size: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    match icon {
        Icon::None => {}
        Icon::Ok => draw_check(display, top_left, size, color),
        Icon::Alert => draw_warning(display, top_left, size, color),
    }
}

/// Check mark in a circle.
fn draw_check<D>(
    display: &mut D,
    top_left: Point,
    size: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let stroke_width = (size / 10).max(1);
    let stroke = PrimitiveStyle::with_stroke(color, stroke_width);
    let s = size as i32;
    let inset = stroke_width as i32;

    Circle::new(top_left + Point::new(inset, inset), size - 2 * stroke_width)
        .into_styled(stroke)
        .draw(display)
        .ok();

    let short_start = top_left + Point::new(s * 2 / 7, s / 2);
    let corner = top_left + Point::new(s * 3 / 7, s * 9 / 14);
    let long_end = top_left + Point::new(s * 5 / 7, s * 5 / 14);
    Line::new(short_start, corner)
        .into_styled(stroke)
        .draw(display)
        .ok();
    Line::new(corner, long_end)
        .into_styled(stroke)
        .draw(display)
        .ok();
}

/// Exclamation mark in a triangle.
fn draw_warning<D>(
    display: &mut D,
    top_left: Point,
    size: u32,
    color: Rgb565,
) where
    D: DrawTarget<Color = Rgb565>,
{
    let stroke_width = (size / 10).max(1);
    let s = size as i32;
    let inset = stroke_width as i32;

    Triangle::new(
        top_left + Point::new(s / 2, inset),
        top_left + Point::new(inset, s - 1 - inset),
        top_left + Point::new(s - 1 - inset, s - 1 - inset),
    )
    .into_styled(PrimitiveStyle::with_stroke(color, stroke_width))
    .draw(display)
    .ok();

    let fill = PrimitiveStyle::with_fill(color);
    let bar_x = top_left.x + s / 2 - stroke_width as i32 / 2;
    Rectangle::new(Point::new(bar_x, top_left.y + s * 5 / 14), Size::new(stroke_width, size * 5 / 14))
        .into_styled(fill)
        .draw(display)
        .ok();
    Rectangle::new(Point::new(bar_x, top_left.y + s * 11 / 14), Size::new(stroke_width, stroke_width))
        .into_styled(fill)
        .draw(display)
        .ok();
}
