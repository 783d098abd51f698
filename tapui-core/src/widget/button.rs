//! Text push button

use heapless::String;
use tapui_display::{DisplayError, Surface};

use super::{Control, WidgetBase, WidgetEvent};
use crate::config::MAX_CAPTION_LEN;
use crate::context::RenderContext;
use crate::text::{display_width, truncate_to};

/// Horizontal caption margin
const MARGIN_X: u32 = 12;
/// Vertical caption margin
const MARGIN_Y: u32 = 10;
/// Corner radius
const RADIUS: u32 = 8;

/// Rounded button showing a caption; reports [`WidgetEvent::Pressed`]
#[derive(Debug, Clone, Default)]
pub struct Button {
    base: WidgetBase,
    caption: String<MAX_CAPTION_LEN>,
}

impl Button {
    pub const fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            caption: String::new(),
        }
    }

    pub fn caption(&self) -> &str {
        self.caption.as_str()
    }
}

impl Control for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn draw<S: Surface + ?Sized>(
        &mut self,
        ctx: &RenderContext,
        surface: &mut S,
        _full: bool,
    ) -> Result<(), DisplayError> {
        let theme = ctx.theme();
        let rect = self.base.rect();
        let text_x = rect.x + MARGIN_X as i32;
        let text_y = rect.y + MARGIN_Y as i32;

        if self.base.is_focused() {
            surface.fill_round_rect(rect, RADIUS, theme.accent)?;
            surface.draw_text(text_x, text_y, &self.caption, theme.accent_text, None)?;
        } else {
            surface.fill_round_rect(rect, RADIUS, theme.surface)?;
            surface.draw_text(text_x, text_y, &self.caption, theme.text, None)?;
            surface.draw_round_rect(rect, RADIUS, theme.accent)?;
        }
        Ok(())
    }

    fn handle_press(
        &mut self,
        _ctx: &mut RenderContext,
        _local_x: i32,
        _local_y: i32,
    ) -> Option<WidgetEvent> {
        Some(WidgetEvent::Pressed)
    }

    fn set_caption(&mut self, ctx: &mut RenderContext, caption: &str) {
        self.caption = truncate_to(caption);

        let font = ctx.font();
        let width = font.columns(display_width(&self.caption)) + MARGIN_X * 2;
        let height = font.height + MARGIN_Y * 2;
        self.base.grow(width, height);
        self.base.mark_dirty(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::testutil::{Op, RecordingSurface};
    use tapui_display::Rect;

    fn context() -> RenderContext {
        RenderContext::new(&UiConfig::default())
    }

    #[test]
    fn test_caption_sizes_button() {
        let mut ctx = context();
        let mut button = Button::new();

        button.set_caption(&mut ctx, "Wifi設定");

        // 8 columns * 12px + 2 * 12px margin, 24px line + 2 * 10px margin
        assert_eq!(button.base().rect(), Rect::new(0, 0, 120, 44));
        assert!(button.base().is_dirty());
    }

    #[test]
    fn test_shorter_caption_keeps_size() {
        let mut ctx = context();
        let mut button = Button::new();

        button.set_caption(&mut ctx, "Long caption");
        let wide = button.base().rect().w;
        button.set_caption(&mut ctx, "OK");

        assert_eq!(button.base().rect().w, wide);
        assert_eq!(button.caption(), "OK");
    }

    #[test]
    fn test_press_reports_pressed() {
        let mut ctx = context();
        let mut button = Button::new();
        assert_eq!(button.handle_press(&mut ctx, 1, 1), Some(WidgetEvent::Pressed));
    }

    #[test]
    fn test_focus_changes_colors() {
        let ctx = context();
        let mut button = Button::new();
        let mut surface = RecordingSurface::new();

        button.draw(&ctx, &mut surface, false).unwrap();
        assert!(matches!(surface.ops[0], Op::FillRound(_, c) if c == ctx.theme().surface));

        surface.clear();
        button.base_mut().set_focused(true);
        button.draw(&ctx, &mut surface, false).unwrap();
        assert!(matches!(surface.ops[0], Op::FillRound(_, c) if c == ctx.theme().accent));
        assert_eq!(surface.ops.len(), 2);
    }
}
