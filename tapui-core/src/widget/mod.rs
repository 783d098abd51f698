//! Widget contract
//!
//! Every on-screen control shares a [`WidgetBase`] (rectangle, focus flag,
//! dirty flag) and implements [`Control`]. The closed set of variants is
//! the [`Widget`] enum, which the layers store and the controller
//! dispatches over.

mod button;
mod check_box;
mod list;

pub use button::Button;
pub use check_box::CheckBox;
pub use list::{List, ListModel};

pub use crate::text_edit::TextEdit;

use heapless::String;
use tapui_display::{DisplayError, Rect, Surface};

use crate::config::LIST_ENTRY_LEN;
use crate::context::RenderContext;

/// State common to every widget
#[derive(Debug, Clone, Default)]
pub struct WidgetBase {
    rect: Rect,
    focused: bool,
    dirty: bool,
}

impl WidgetBase {
    /// Create an unplaced, unsized, unfocused base
    pub const fn new() -> Self {
        Self {
            rect: Rect::new(0, 0, 0, 0),
            focused: false,
            dirty: false,
        }
    }

    /// Screen-space rectangle
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Check if the widget holds focus in its layer
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Check if the widget changed since it was last drawn
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flag the widget for redraw on the next draw pass
    pub fn mark_dirty(&mut self, ctx: &mut RenderContext) {
        self.dirty = true;
        ctx.request_redraw();
    }

    /// Read and reset the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        core::mem::replace(&mut self.dirty, false)
    }

    /// Move the widget, and resize it when a non-zero size is given
    ///
    /// Passing `0` for `w` or `h` keeps the current (possibly measured)
    /// dimension.
    pub fn set_geometry(&mut self, ctx: &mut RenderContext, x: i32, y: i32, w: u32, h: u32) {
        self.rect.x = x;
        self.rect.y = y;
        if w != 0 {
            self.rect.w = w;
        }
        if h != 0 {
            self.rect.h = h;
        }
        self.mark_dirty(ctx);
    }

    /// Grow the rectangle to at least `w` x `h`; never shrinks
    pub(crate) fn grow(&mut self, w: u32, h: u32) {
        self.rect.w = self.rect.w.max(w);
        self.rect.h = self.rect.h.max(h);
    }

    /// Force the height, used by widgets whose height follows their content
    pub(crate) fn set_height(&mut self, h: u32) {
        self.rect.h = h;
    }

    pub(crate) fn set_width(&mut self, w: u32) {
        self.rect.w = w;
    }

    pub(crate) fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }
}

/// Widget address: layer slot and position in that layer's chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WidgetId {
    pub layer: u8,
    pub index: u8,
}

/// What a confirmed press did to a widget
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WidgetEvent {
    /// Button activated
    Pressed,
    /// Check box flipped to the contained state
    Toggled(bool),
    /// Already-selected list row pressed again
    Selected {
        index: usize,
        text: String<LIST_ENTRY_LEN>,
    },
    /// Text-edit contents changed
    Edited,
}

/// A widget event addressed to the application
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UiEvent {
    pub widget: WidgetId,
    pub kind: WidgetEvent,
}

/// Capability set shared by all widget variants
pub trait Control {
    /// Shared widget state
    fn base(&self) -> &WidgetBase;

    /// Shared widget state, mutably
    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Render the widget inside its own rectangle
    ///
    /// Called only when the widget is dirty or `full` is set because the
    /// whole layer is being repainted.
    fn draw<S: Surface + ?Sized>(
        &mut self,
        ctx: &RenderContext,
        surface: &mut S,
        full: bool,
    ) -> Result<(), DisplayError>;

    /// Check if a screen point lies strictly inside the widget
    fn hit_test(&self, x: i32, y: i32) -> bool {
        self.base().rect().contains(x, y)
    }

    /// React to a confirmed press at widget-local coordinates
    fn handle_press(
        &mut self,
        ctx: &mut RenderContext,
        local_x: i32,
        local_y: i32,
    ) -> Option<WidgetEvent>;

    /// Replace the caption, growing the widget to fit it
    fn set_caption(&mut self, _ctx: &mut RenderContext, _caption: &str) {}

    /// Read and reset whether the widget needs drawing
    fn take_dirty(&mut self, _ctx: &RenderContext) -> bool {
        self.base_mut().take_dirty()
    }
}

/// The closed set of widget variants
#[derive(Debug)]
pub enum Widget<'a> {
    Button(Button),
    CheckBox(CheckBox),
    List(List<'a>),
    TextEdit(TextEdit),
}

macro_rules! dispatch {
    ($self:expr, $w:ident => $body:expr) => {
        match $self {
            Widget::Button($w) => $body,
            Widget::CheckBox($w) => $body,
            Widget::List($w) => $body,
            Widget::TextEdit($w) => $body,
        }
    };
}

impl Control for Widget<'_> {
    fn base(&self) -> &WidgetBase {
        dispatch!(self, w => w.base())
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        dispatch!(self, w => w.base_mut())
    }

    fn draw<S: Surface + ?Sized>(
        &mut self,
        ctx: &RenderContext,
        surface: &mut S,
        full: bool,
    ) -> Result<(), DisplayError> {
        dispatch!(self, w => w.draw(ctx, surface, full))
    }

    fn hit_test(&self, x: i32, y: i32) -> bool {
        dispatch!(self, w => w.hit_test(x, y))
    }

    fn handle_press(
        &mut self,
        ctx: &mut RenderContext,
        local_x: i32,
        local_y: i32,
    ) -> Option<WidgetEvent> {
        dispatch!(self, w => w.handle_press(ctx, local_x, local_y))
    }

    fn set_caption(&mut self, ctx: &mut RenderContext, caption: &str) {
        dispatch!(self, w => w.set_caption(ctx, caption))
    }

    fn take_dirty(&mut self, ctx: &RenderContext) -> bool {
        dispatch!(self, w => w.take_dirty(ctx))
    }
}

impl<'a> Widget<'a> {
    /// Check if the widget holds focus in its layer
    pub fn is_focused(&self) -> bool {
        self.base().is_focused()
    }

    /// Screen-space rectangle
    pub fn rect(&self) -> Rect {
        self.base().rect()
    }

    pub fn as_button_mut(&mut self) -> Option<&mut Button> {
        match self {
            Widget::Button(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_check_box_mut(&mut self) -> Option<&mut CheckBox> {
        match self {
            Widget::CheckBox(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_list_mut(&mut self) -> Option<&mut List<'a>> {
        match self {
            Widget::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_text_edit_mut(&mut self) -> Option<&mut TextEdit> {
        match self {
            Widget::TextEdit(t) => Some(t),
            _ => None,
        }
    }

    /// Peek whether the widget has pending changes without consuming them
    pub(crate) fn has_pending_changes(&self) -> bool {
        match self {
            Widget::List(l) => l.base().is_dirty() || l.model().is_changed(),
            other => other.base().is_dirty(),
        }
    }
}

impl From<Button> for Widget<'_> {
    fn from(button: Button) -> Self {
        Widget::Button(button)
    }
}

impl From<CheckBox> for Widget<'_> {
    fn from(check_box: CheckBox) -> Self {
        Widget::CheckBox(check_box)
    }
}

impl<'a> From<List<'a>> for Widget<'a> {
    fn from(list: List<'a>) -> Self {
        Widget::List(list)
    }
}

impl From<TextEdit> for Widget<'_> {
    fn from(text_edit: TextEdit) -> Self {
        Widget::TextEdit(text_edit)
    }
}
