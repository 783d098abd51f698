//! Rendering surface trait
//!
//! Defines the drawing primitives the widget toolkit consumes. Coordinates
//! are pixels in a fixed top-left-origin space.

use embedded_graphics::pixelcolor::Rgb565;

use crate::geom::Rect;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Communication error with display
    Communication,
    /// Invalid coordinates or dimensions
    InvalidCoordinates,
    /// Display not initialized
    NotInitialized,
    /// Buffer overflow
    BufferOverflow,
}

/// Rendering surface
///
/// Provides a hardware-agnostic set of pixel primitives. Implementations
/// clip to their own bounds; out-of-range geometry is not an error.
pub trait Surface {
    /// Fill a rectangle with a solid color
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError>;

    /// Draw a one-pixel rectangle outline
    fn draw_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError>;

    /// Fill a rectangle with rounded corners
    fn fill_round_rect(&mut self, rect: Rect, radius: u32, color: Rgb565)
        -> Result<(), DisplayError>;

    /// Draw a one-pixel rounded rectangle outline
    fn draw_round_rect(&mut self, rect: Rect, radius: u32, color: Rgb565)
        -> Result<(), DisplayError>;

    /// Draw text with its top-left corner at (`x`, `y`)
    ///
    /// - `fg`: glyph color
    /// - `bg`: cell background, or `None` to leave the background untouched
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgb565,
        bg: Option<Rgb565>,
    ) -> Result<(), DisplayError>;

    /// Get the surface dimensions in pixels as (width, height)
    fn dimensions(&self) -> (u32, u32);
}

impl<S: Surface + ?Sized> Surface for &mut S {
    fn fill_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        (**self).fill_rect(rect, color)
    }

    fn draw_rect(&mut self, rect: Rect, color: Rgb565) -> Result<(), DisplayError> {
        (**self).draw_rect(rect, color)
    }

    fn fill_round_rect(
        &mut self,
        rect: Rect,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        (**self).fill_round_rect(rect, radius, color)
    }

    fn draw_round_rect(
        &mut self,
        rect: Rect,
        radius: u32,
        color: Rgb565,
    ) -> Result<(), DisplayError> {
        (**self).draw_round_rect(rect, radius, color)
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        text: &str,
        fg: Rgb565,
        bg: Option<Rgb565>,
    ) -> Result<(), DisplayError> {
        (**self).draw_text(x, y, text, fg, bg)
    }

    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }
}
