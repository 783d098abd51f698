//! Shared render context
//!
//! One instance per application, owned by the [`Controller`](crate::Controller)
//! and lent to widgets while they draw or react to presses. Holds the font
//! cell, the colors, the accumulated dirty box, the redraw-request flag and
//! the clipboard. Only the render loop touches it, so none of this state is
//! locked.

use heapless::String;
use tapui_display::{DisplayError, Rect, Surface};

use crate::config::{FontMetrics, ScreenSize, Theme, UiConfig, CLIPBOARD_CAPACITY};
use crate::text_edit::EditBuffer;

/// Per-application drawing and invalidation state
#[derive(Debug, Clone)]
pub struct RenderContext {
    font: FontMetrics,
    screen: ScreenSize,
    theme: Theme,
    /// Union of every rectangle drawn since the last flush, `None` when empty
    dirty: Option<Rect>,
    redraw_requested: bool,
    clipboard: String<CLIPBOARD_CAPACITY>,
}

impl RenderContext {
    /// Create a context from the toolkit configuration
    pub fn new(config: &UiConfig) -> Self {
        Self {
            font: config.font,
            screen: config.screen,
            theme: config.theme,
            dirty: None,
            redraw_requested: false,
            clipboard: String::new(),
        }
    }

    /// Font cell metrics
    pub fn font(&self) -> FontMetrics {
        self.font
    }

    /// Screen size
    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Widget colors
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Extend the dirty box to cover `rect`
    ///
    /// A zero-size rectangle still enables tracking.
    pub fn set_bounding_box(&mut self, rect: Rect) {
        self.dirty = Some(match self.dirty {
            Some(current) => current.union(&rect),
            None => rect,
        });
    }

    /// Current dirty box, `None` when nothing was drawn since the last flush
    pub fn bounding_box(&self) -> Option<Rect> {
        self.dirty
    }

    /// Clear the dirty box on `surface` and reset it
    ///
    /// Issues exactly one fill when the box is enabled and nothing otherwise.
    pub fn clear_and_flush<S: Surface + ?Sized>(
        &mut self,
        surface: &mut S,
    ) -> Result<(), DisplayError> {
        if let Some(rect) = self.dirty {
            surface.fill_rect(rect, self.theme.background)?;
            self.dirty = None;
        }
        Ok(())
    }

    /// Record that some widget became dirty
    pub fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }

    /// Check if any widget became dirty since the last draw pass
    pub fn redraw_requested(&self) -> bool {
        self.redraw_requested
    }

    pub(crate) fn clear_redraw_request(&mut self) {
        self.redraw_requested = false;
    }

    /// Replace the clipboard with `chars`
    ///
    /// Characters beyond the clipboard capacity are dropped.
    pub fn copy<I: IntoIterator<Item = char>>(&mut self, chars: I) {
        self.clipboard.clear();
        for ch in chars {
            if self.clipboard.push(ch).is_err() {
                break;
            }
        }
    }

    /// Clipboard contents
    pub fn clipboard(&self) -> &str {
        self.clipboard.as_str()
    }

    /// Insert the clipboard at the cursor of `target`
    ///
    /// Stops once `target` is full. Returns the number of characters
    /// inserted.
    pub fn paste<const N: usize>(&self, target: &mut EditBuffer<N>) -> usize {
        target.insert_str(self.clipboard.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{Op, RecordingSurface};

    fn context() -> RenderContext {
        RenderContext::new(&UiConfig::default())
    }

    #[test]
    fn test_bounding_box_accumulates_union() {
        let mut ctx = context();
        assert_eq!(ctx.bounding_box(), None);

        ctx.set_bounding_box(Rect::new(10, 10, 20, 20));
        ctx.set_bounding_box(Rect::new(50, 5, 10, 10));

        assert_eq!(ctx.bounding_box(), Some(Rect::new(10, 5, 50, 25)));
    }

    #[test]
    fn test_zero_size_rect_enables_tracking() {
        let mut ctx = context();
        ctx.set_bounding_box(Rect::new(7, 8, 0, 0));
        assert_eq!(ctx.bounding_box(), Some(Rect::new(7, 8, 0, 0)));
    }

    #[test]
    fn test_clear_issues_single_fill_and_resets() {
        let mut ctx = context();
        let mut surface = RecordingSurface::new();

        ctx.set_bounding_box(Rect::new(0, 0, 10, 10));
        ctx.set_bounding_box(Rect::new(20, 20, 10, 10));
        ctx.clear_and_flush(&mut surface).unwrap();

        assert_eq!(
            surface.ops,
            [Op::Fill(Rect::new(0, 0, 30, 30), ctx.theme().background)]
        );
        assert_eq!(ctx.bounding_box(), None);

        ctx.clear_and_flush(&mut surface).unwrap();
        assert_eq!(surface.ops.len(), 1);
    }

    #[test]
    fn test_copy_replaces_wholesale() {
        let mut ctx = context();
        ctx.copy("first".chars());
        ctx.copy("2nd".chars());
        assert_eq!(ctx.clipboard(), "2nd");
    }

    #[test]
    fn test_copy_truncates_to_capacity() {
        let mut ctx = context();
        ctx.copy(core::iter::repeat('x').take(CLIPBOARD_CAPACITY + 10));
        assert_eq!(ctx.clipboard().len(), CLIPBOARD_CAPACITY);
    }

    #[test]
    fn test_paste_stops_at_capacity() {
        let mut ctx = context();
        ctx.copy("hello".chars());

        let mut buffer: EditBuffer<8> = EditBuffer::new(3);
        assert_eq!(ctx.paste(&mut buffer), 3);
        assert_eq!(buffer.as_string::<8>().as_str(), "hel");
    }
}
