//! Check box with caption

use heapless::String;
use tapui_display::{DisplayError, Rect, Surface};

use super::{Control, WidgetBase, WidgetEvent};
use crate::config::MAX_CAPTION_LEN;
use crate::context::RenderContext;
use crate::text::{display_width, truncate_to};

const MARGIN_X: u32 = 10;
const MARGIN_Y: u32 = 10;
/// Check box edge length
const BOX_SIZE: u32 = 18;
const RADIUS: u32 = 8;
/// Gap between box and caption
const BOX_MARGIN: u32 = 10;

/// Toggles on press; reports [`WidgetEvent::Toggled`]
#[derive(Debug, Clone, Default)]
pub struct CheckBox {
    base: WidgetBase,
    caption: String<MAX_CAPTION_LEN>,
    checked: bool,
}

impl CheckBox {
    pub const fn new() -> Self {
        Self {
            base: WidgetBase::new(),
            caption: String::new(),
            checked: false,
        }
    }

    pub fn caption(&self) -> &str {
        self.caption.as_str()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn set_checked(&mut self, ctx: &mut RenderContext, checked: bool) {
        if self.checked != checked {
            self.checked = checked;
            self.base.mark_dirty(ctx);
        }
    }
}

impl Control for CheckBox {
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
        const BOX_OFFSET: u32 = 1;
        const CHECK_OFFSET: u32 = 2;
        const BASE_FILL: u32 = BOX_SIZE + BOX_OFFSET * 2;
        const CHECK_SIZE: u32 = BOX_SIZE - CHECK_OFFSET * 2;
        const TEXT_X: u32 = BOX_SIZE + MARGIN_X + BOX_MARGIN;

        let theme = ctx.theme();
        let rect = self.base.rect();
        let focused = self.base.is_focused();
        let box_x = rect.x + MARGIN_X as i32;
        let box_y = rect.y + (rect.h.saturating_sub(BASE_FILL) / 2) as i32;

        let fill = if focused { theme.accent } else { theme.surface };
        surface.fill_round_rect(rect, RADIUS, fill)?;
        surface.fill_rect(Rect::new(box_x, box_y, BASE_FILL, BASE_FILL), theme.surface)?;
        let frame = Rect::new(
            box_x + BOX_OFFSET as i32,
            box_y + BOX_OFFSET as i32,
            BOX_SIZE,
            BOX_SIZE,
        );
        surface.draw_rect(frame, theme.accent)?;
        if self.checked {
            let offset = (CHECK_OFFSET + BOX_OFFSET) as i32;
            let mark = Rect::new(box_x + offset, box_y + offset, CHECK_SIZE, CHECK_SIZE);
            surface.fill_rect(mark, theme.accent)?;
        }

        let fg = if focused { theme.accent_text } else { theme.text };
        surface.draw_text(
            rect.x + TEXT_X as i32,
            rect.y + MARGIN_Y as i32,
            &self.caption,
            fg,
            None,
        )
    }

    fn handle_press(
        &mut self,
        ctx: &mut RenderContext,
        _local_x: i32,
        _local_y: i32,
    ) -> Option<WidgetEvent> {
        self.checked = !self.checked;
        self.base.mark_dirty(ctx);
        Some(WidgetEvent::Toggled(self.checked))
    }

    fn set_caption(&mut self, ctx: &mut RenderContext, caption: &str) {
        self.caption = truncate_to(caption);

        let font = ctx.font();
        let width =
            font.columns(display_width(&self.caption)) + MARGIN_X * 2 + BOX_SIZE + BOX_MARGIN;
        let height = font.height + MARGIN_Y * 2;
        self.base.grow(width, height);
        self.base.mark_dirty(ctx);
    }
}
