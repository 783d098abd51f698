//! Text entry with an on-screen keyboard
//!
//! The widget is a one-line edit field with a keyboard below it:
//!
//! ```text
//! ┌──────────────────────────────┐  ─┐
//! │ text or placeholder|         │   │ field: font height + 2 * padding
//! └──────────────────────────────┘  ─┘
//!                                      gap
//! ┌──┬──┬──┬──┬──┬──┬──┬──┬──┬──┐   ─┐
//! │1 │2 │3 │4 │5 │6 │7 │8 │9 │0 │    │
//! ├──┴──┼──┼──┼──┴──┴──┴──┼──┴──┤    │ KEYMAP_ROWS * KEY_ROW_HEIGHT
//! │ ... │  │  │  space    │ Del │    │
//! └─────┴──┴──┴───────────┴─────┘   ─┘
//! ```
//!
//! Tapping the field moves the cursor; tapping a key applies its
//! [`KeyAction`]. Any change to the contents reports
//! [`WidgetEvent::Edited`].

mod buffer;
pub mod keymap;

pub use buffer::EditBuffer;
pub use keymap::{Key, KeyAction, Keymap, KEYMAPS};

use heapless::String;
use tapui_display::{DisplayError, Rect, Surface};

use self::keymap::{
    key_at, KEYMAP_COLUMNS, KEYMAP_COUNT, KEYMAP_ROWS, KEY_COLUMN_WIDTH, KEY_ROW_HEIGHT,
};
use crate::config::{MAX_CAPTION_LEN, MAX_EDIT_LEN};
use crate::context::RenderContext;
use crate::text::{char_width, display_width, truncate_to};
use crate::traits::{StoreError, StringStore};
use crate::widget::{Control, WidgetBase, WidgetEvent};

/// Padding around the text inside the edit field
const FIELD_PADDING: u32 = 6;
/// Gap between the edit field and the keymap
const KEYMAP_GAP: u32 = 4;
/// Glyph shown for every character in password mode
const MASK: char = '*';
/// Worst-case UTF-8 size of a full buffer
const TEXT_BYTES: usize = MAX_EDIT_LEN * 4;

/// Edit-field contents as UTF-8
pub type EditText = String<TEXT_BYTES>;

/// Single-line text editor with a virtual keyboard
#[derive(Debug, Clone)]
pub struct TextEdit {
    base: WidgetBase,
    buffer: EditBuffer<MAX_EDIT_LEN>,
    keymap: u8,
    password: bool,
    placeholder: String<MAX_CAPTION_LEN>,
    /// Row and first column of the key under the last press
    pressed_key: Option<(u8, u8)>,
    /// Widget rectangle the keymap was last drawn for, `None` to force a redraw
    keymap_drawn: Option<Rect>,
}

impl TextEdit {
    /// Create an empty editor holding at most `capacity` characters
    ///
    /// The capacity is clamped to [`MAX_EDIT_LEN`].
    pub const fn new(capacity: usize) -> Self {
        Self {
            base: WidgetBase::new(),
            buffer: EditBuffer::new(capacity),
            keymap: 0,
            password: false,
            placeholder: String::new(),
            pressed_key: None,
            keymap_drawn: None,
        }
    }

    pub fn buffer(&self) -> &EditBuffer<MAX_EDIT_LEN> {
        &self.buffer
    }

    /// Contents as a string
    pub fn text(&self) -> EditText {
        self.buffer.as_string()
    }

    /// Replace the contents, cursor at the end
    pub fn set_text(&mut self, ctx: &mut RenderContext, text: &str) {
        self.buffer.set_text(text);
        self.base.mark_dirty(ctx);
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn is_password(&self) -> bool {
        self.password
    }

    /// Mask the displayed contents; stored text is unaffected
    pub fn set_password(&mut self, ctx: &mut RenderContext, password: bool) {
        if self.password != password {
            self.password = password;
            self.base.mark_dirty(ctx);
        }
    }

    /// Active keymap index
    pub fn keymap(&self) -> u8 {
        self.keymap
    }

    /// Show keymap `index`; out-of-range indices are ignored
    pub fn set_keymap(&mut self, ctx: &mut RenderContext, index: u8) {
        if (index as usize) < KEYMAP_COUNT && index != self.keymap {
            self.keymap = index;
            self.pressed_key = None;
            self.keymap_drawn = None;
            self.base.mark_dirty(ctx);
        }
    }

    /// Size that fits the field and the full keymap
    pub fn preferred_size(ctx: &RenderContext) -> (u32, u32) {
        let width = KEYMAP_COLUMNS as u32 * KEY_COLUMN_WIDTH;
        let height = Self::keymap_top(ctx) + KEYMAP_ROWS as u32 * KEY_ROW_HEIGHT;
        (width, height)
    }

    /// Pre-populate from the string stored under `id`
    ///
    /// A missing string leaves the field empty and returns `Ok(false)`.
    /// Invalid UTF-8 is cut at the first bad sequence.
    pub fn load_from<S: StringStore + ?Sized>(
        &mut self,
        ctx: &mut RenderContext,
        store: &mut S,
        id: u8,
    ) -> Result<bool, StoreError> {
        let mut bytes = [0u8; TEXT_BYTES];
        let loaded = match store.load_string(id, &mut bytes) {
            Ok(len) => {
                let text = match core::str::from_utf8(&bytes[..len]) {
                    Ok(text) => text,
                    Err(e) => core::str::from_utf8(&bytes[..e.valid_up_to()]).unwrap_or_default(),
                };
                self.buffer.set_text(text);
                true
            }
            Err(StoreError::NotFound) => {
                self.buffer.clear();
                false
            }
            Err(e) => return Err(e),
        };
        self.base.mark_dirty(ctx);
        Ok(loaded)
    }

    /// Persist the contents, returning the new id
    pub fn save_to<S: StringStore + ?Sized>(&self, store: &mut S) -> Result<u8, StoreError> {
        store.store_string(&self.text())
    }

    fn field_height(ctx: &RenderContext) -> u32 {
        ctx.font().height + FIELD_PADDING * 2
    }

    fn keymap_top(ctx: &RenderContext) -> u32 {
        Self::field_height(ctx) + KEYMAP_GAP
    }

    /// Apply a key; returns whether the contents changed
    fn apply(&mut self, ctx: &mut RenderContext, action: KeyAction) -> bool {
        match action {
            KeyAction::Char(ch) => self.buffer.insert(ch),
            KeyAction::Space => self.buffer.insert(' '),
            KeyAction::SwitchKeymap(index) => {
                self.set_keymap(ctx, index);
                false
            }
            KeyAction::Left => {
                self.buffer.move_left();
                false
            }
            KeyAction::Right => {
                self.buffer.move_right();
                false
            }
            KeyAction::Home => {
                self.buffer.home();
                false
            }
            KeyAction::End => {
                self.buffer.end();
                false
            }
            KeyAction::Backspace => self.buffer.backspace(),
            KeyAction::Delete => self.buffer.delete(),
            KeyAction::Clear => {
                let changed = !self.buffer.is_empty();
                self.buffer.clear();
                changed
            }
            KeyAction::Copy => {
                ctx.copy(self.buffer.chars().iter().copied());
                false
            }
            KeyAction::Paste => ctx.paste(&mut self.buffer) > 0,
            KeyAction::TogglePassword => {
                self.password = !self.password;
                false
            }
        }
    }

    fn glyph(&self, ch: char) -> char {
        if self.password {
            MASK
        } else {
            ch
        }
    }

    /// Display columns hidden to the left so the caret fits in `columns`
    fn scroll_columns(&self, columns: usize) -> usize {
        let mut caret = self.caret_column();
        let mut skipped = 0;
        for &ch in self.buffer.chars() {
            if caret < columns {
                break;
            }
            let width = char_width(self.glyph(ch));
            skipped += width;
            caret -= width;
        }
        skipped
    }

    /// Display column of the cursor within the whole text
    fn caret_column(&self) -> usize {
        self.buffer.chars()[..self.buffer.cursor()]
            .iter()
            .map(|&ch| char_width(self.glyph(ch)))
            .sum()
    }

    fn field_columns(&self, ctx: &RenderContext) -> usize {
        let inner = self.base.rect().w.saturating_sub(FIELD_PADDING * 2);
        ((inner / ctx.font().width) as usize).max(1)
    }

    /// Cursor position for a tap on visible column `column`
    fn position_for_tap(&self, ctx: &RenderContext, column: usize) -> usize {
        let column = column + self.scroll_columns(self.field_columns(ctx));
        if self.password {
            column.min(self.buffer.len())
        } else {
            self.buffer.position_at_column(column)
        }
    }

    fn draw_field<S: Surface + ?Sized>(
        &self,
        ctx: &RenderContext,
        surface: &mut S,
    ) -> Result<(), DisplayError> {
        let theme = ctx.theme();
        let font = ctx.font();
        let rect = self.base.rect();
        let field = Rect::new(rect.x, rect.y, rect.w, Self::field_height(ctx));
        let text_x = rect.x + FIELD_PADDING as i32;
        let text_y = rect.y + FIELD_PADDING as i32;

        surface.fill_rect(field, theme.surface)?;
        let outline = if self.base.is_focused() {
            theme.accent
        } else {
            theme.foreground
        };
        surface.draw_rect(field, outline)?;

        if self.buffer.is_empty() {
            surface.draw_text(text_x, text_y, &self.placeholder, theme.placeholder, None)?;
            if self.base.is_focused() {
                surface.fill_rect(Rect::new(text_x, text_y, 2, font.height), theme.text)?;
            }
            return Ok(());
        }

        let columns = self.field_columns(ctx);
        let skipped = self.scroll_columns(columns);
        let mut text = EditText::new();
        let mut column = 0;
        for &ch in self.buffer.chars() {
            let glyph = self.glyph(ch);
            let width = char_width(glyph);
            if column + width > skipped + columns {
                break;
            }
            if column >= skipped && text.push(glyph).is_err() {
                break;
            }
            column += width;
        }
        surface.draw_text(text_x, text_y, &text, theme.text, None)?;

        if self.base.is_focused() {
            let caret_x = text_x + font.columns(self.caret_column() - skipped) as i32;
            surface.fill_rect(Rect::new(caret_x, text_y, 2, font.height), theme.text)?;
        }
        Ok(())
    }

    fn draw_keymap<S: Surface + ?Sized>(
        &self,
        ctx: &RenderContext,
        surface: &mut S,
    ) -> Result<(), DisplayError> {
        let theme = ctx.theme();
        let font = ctx.font();
        let rect = self.base.rect();
        let top = rect.y + Self::keymap_top(ctx) as i32;
        let area = Rect::new(
            rect.x,
            top,
            rect.w,
            KEYMAP_ROWS as u32 * KEY_ROW_HEIGHT,
        );
        surface.fill_rect(area, theme.background)?;

        let map = KEYMAPS[self.keymap as usize];
        for (row, keys) in map.iter().enumerate() {
            let y = top + (row as u32 * KEY_ROW_HEIGHT) as i32;
            let mut column = 0u32;
            for key in keys.iter() {
                let x = rect.x + (column * KEY_COLUMN_WIDTH) as i32;
                let cap = Rect::new(x, y, key.span as u32 * KEY_COLUMN_WIDTH, KEY_ROW_HEIGHT)
                    .inset(1, 1);
                let pressed = self.pressed_key == Some((row as u8, column as u8));
                let (fg, bg) = if pressed {
                    (theme.selection_text, theme.selection)
                } else {
                    (theme.text, theme.surface)
                };
                surface.fill_rect(cap, bg)?;

                let label_w = font.columns(display_width(key.label));
                let label_x = cap.x + (cap.w.saturating_sub(label_w) / 2) as i32;
                let label_y = cap.y + (cap.h.saturating_sub(font.height) / 2) as i32;
                surface.draw_text(label_x, label_y, key.label, fg, Some(bg))?;

                column += key.span as u32;
            }
        }
        Ok(())
    }
}

impl Default for TextEdit {
    fn default() -> Self {
        Self::new(MAX_EDIT_LEN)
    }
}

impl Control for TextEdit {
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
        full: bool,
    ) -> Result<(), DisplayError> {
        self.draw_field(ctx, surface)?;
        let rect = self.base.rect();
        if full || self.keymap_drawn != Some(rect) {
            self.draw_keymap(ctx, surface)?;
            self.keymap_drawn = Some(rect);
        }
        Ok(())
    }

    fn handle_press(
        &mut self,
        ctx: &mut RenderContext,
        local_x: i32,
        local_y: i32,
    ) -> Option<WidgetEvent> {
        if local_x < 0 || local_y < 0 {
            return None;
        }
        let (x, y) = (local_x as u32, local_y as u32);

        if y < Self::field_height(ctx) {
            let column = x.saturating_sub(FIELD_PADDING) / ctx.font().width;
            let position = self.position_for_tap(ctx, column as usize);
            self.buffer.set_cursor(position);
            self.base.mark_dirty(ctx);
            return None;
        }

        let top = Self::keymap_top(ctx);
        if y < top {
            return None;
        }
        let row = ((y - top) / KEY_ROW_HEIGHT) as usize;
        let column = (x / KEY_COLUMN_WIDTH) as usize;
        let (key, start) = key_at(self.keymap as usize, row, column)?;

        self.pressed_key = Some((row as u8, start as u8));
        self.keymap_drawn = None;
        let changed = self.apply(ctx, key.action);
        self.base.mark_dirty(ctx);

        changed.then_some(WidgetEvent::Edited)
    }

    fn set_caption(&mut self, ctx: &mut RenderContext, caption: &str) {
        self.placeholder = truncate_to(caption);
        let (w, h) = Self::preferred_size(ctx);
        self.base.grow(w, h);
        self.base.mark_dirty(ctx);
    }
}
