//! `embedded-graphics` adapter
//!
//! Renders the toolkit's primitives onto any `DrawTarget<Color = Rgb565>`
//! using a monospaced font for text.

use embedded_graphics::mono_font::{MonoFont, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle, RoundedRectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::backend::{DisplayError, Surface};
use crate::geom::Rect;

/// Surface backed by an `embedded-graphics` draw target
pub struct GraphicsSurface<'f, D> {
    target: D,
    font: &'f MonoFont<'f>,
}

impl<'f, D> GraphicsSurface<'f, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    /// Wrap a draw target, rendering text with `font`
    pub fn new(target: D, font: &'f MonoFont<'f>) -> Self {
        Self { target, font }
    }

    /// Get the wrapped draw target
    pub fn target(&mut self) -> &mut D {
        &mut self.target
    }

    /// Consume the adapter and return the draw target
    pub fn release(self) -> D {
        self.target
    }

    /// Glyph cell size of the configured font as (width, height)
    pub fn cell_size(&self) -> (u32, u32) {
        let size = self.font.character_size;
        (size.width, size.height)
    }
}

fn to_rectangle(rect: Rect) -> Rectangle {
    Rectangle::new(Point::new(rect.x, rect.y), Size::new(rect.w, rect.h))
}

impl<'f, D> Surface for GraphicsSurface<'f, D>
where
    D: DrawTarget<Color = Rgb565>,
{
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        self.target
            .fill_solid(&to_rectangle(rect), color)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        to_rectangle(rect)
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn fill_round_rect(
        &mut self,
        rect: Rect,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        RoundedRectangle::with_equal_corners(to_rectangle(rect), Size::new(radius, radius))
            .into_styled(PrimitiveStyle::with_fill(color))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_round_rect(
        &mut self,
        rect: Rect,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        RoundedRectangle::with_equal_corners(to_rectangle(rect), Size::new(radius, radius))
            .into_styled(PrimitiveStyle::with_stroke(color, 1))
            .draw(&mut self.target)
            .map_err(|_| DisplayError::Communication)
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgb565,
        bg: Option<Rgb565>,
    ) -> Result<(), DisplayError> {
        let mut style = MonoTextStyleBuilder::new().font(self.font).text_color(fg);
        if let Some(bg) = bg {
            style = style.background_color(bg);
        }

        Text::with_baseline(text, Point::new(x, y), style.build(), Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| DisplayError::Communication)
    }

    fn dimensions(&self) -> (u32, u32) {
        let size = self.target.bounding_box().size;
        (size.width, size.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::mono_font::ascii::FONT_6X10;

    #[test]
    fn test_fill_rect_paints_pixels() {
        let display: MockDisplay<Rgb565> = MockDisplay::new();
        let mut surface = GraphicsSurface::new(display, &FONT_6X10);

        surface
            .fill_rect(Rect::new(2, 3, 4, 2), Rgb565::RED)
            .unwrap();

        let display = surface.release();
        assert_eq!(display.get_pixel(Point::new(2, 3)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(5, 4)), Some(Rgb565::RED));
        assert_eq!(display.get_pixel(Point::new(6, 4)), None);
        assert_eq!(display.get_pixel(Point::new(2, 5)), None);
    }

    #[test]
    fn test_text_background_fills_cell() {
        let display: MockDisplay<Rgb565> = MockDisplay::new();
        let mut surface = GraphicsSurface::new(display, &FONT_6X10);

        surface
            .draw_text(0, 0, "A", Rgb565::WHITE, Some(Rgb565::BLACK))
            .unwrap();

        let display = surface.release();
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(Rgb565::BLACK));
    }

    #[test]
    fn test_dimensions_and_cell_size() {
        let display: MockDisplay<Rgb565> = MockDisplay::new();
        let surface = GraphicsSurface::new(display, &FONT_6X10);

        assert_eq!(surface.dimensions(), (64, 64));
        assert_eq!(surface.cell_size(), (6, 10));
    }
}
