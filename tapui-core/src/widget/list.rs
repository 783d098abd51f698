//! Selectable list
//!
//! The entries live in a [`ListModel`] that can be shared with a
//! background job (for example a network scan appending names while the
//! render loop draws). Each model operation takes a short critical section
//! of its own; nothing is locked across a frame. The background side never
//! touches render state: it raises the model's change flag and the list
//! picks that up on the next draw pass.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use heapless::{String, Vec};
use portable_atomic::{AtomicBool, Ordering};
use tapui_display::{DisplayError, Rect, Surface};

use super::{Control, WidgetBase, WidgetEvent};
use crate::config::{LIST_ENTRY_LEN, MAX_LIST_ENTRIES};
use crate::context::RenderContext;
use crate::text::{display_width, truncate_to};

const MARGIN_X: u32 = 5;
const MARGIN_Y: u32 = 5;

/// A single list entry
pub type Entry = String<LIST_ENTRY_LEN>;

struct Entries {
    items: Vec<Entry, MAX_LIST_ENTRIES>,
    capacity: usize,
    selected: Option<usize>,
    /// Display columns of the widest entry appended so far
    widest: usize,
}

/// Bounded, lock-protected list entries with a single selection
pub struct ListModel {
    entries: Mutex<CriticalSectionRawMutex, RefCell<Entries>>,
    changed: AtomicBool,
}

impl ListModel {
    /// Create an empty model at full capacity
    pub const fn new() -> Self {
        Self {
            entries: Mutex::new(RefCell::new(Entries {
                items: Vec::new(),
                capacity: MAX_LIST_ENTRIES,
                selected: None,
                widest: 0,
            })),
            changed: AtomicBool::new(false),
        }
    }

    /// Drop all entries and fix the capacity
    ///
    /// Capacity is clamped to [`MAX_LIST_ENTRIES`].
    pub fn set_capacity(&self, capacity: usize) {
        self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            entries.items.clear();
            entries.capacity = capacity.min(MAX_LIST_ENTRIES);
            entries.selected = None;
            entries.widest = 0;
        });
        self.changed.store(true, Ordering::Release);
    }

    /// Append an entry, truncated to [`LIST_ENTRY_LEN`] bytes
    ///
    /// Returns `false` without mutating anything once the model is full.
    pub fn append(&self, text: &str) -> bool {
        let accepted = self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            if entries.items.len() >= entries.capacity {
                return false;
            }
            let entry: Entry = truncate_to(text);
            entries.widest = entries.widest.max(display_width(&entry));
            entries.items.push(entry).is_ok()
        });

        if accepted {
            self.changed.store(true, Ordering::Release);
        } else {
            debug!("list full, dropped entry");
        }
        accepted
    }

    /// Remove the entry at `index`, shifting later entries down
    ///
    /// Out-of-range indices are ignored.
    pub fn erase(&self, index: usize) -> bool {
        let erased = self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            if index >= entries.items.len() {
                return false;
            }
            entries.items.remove(index);
            entries.selected = match entries.selected {
                Some(sel) if sel == index => None,
                Some(sel) if sel > index => Some(sel - 1),
                other => other,
            };
            true
        });

        if erased {
            self.changed.store(true, Ordering::Release);
        }
        erased
    }

    /// Remove every entry, keeping the capacity
    pub fn clear(&self) {
        self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            entries.items.clear();
            entries.selected = None;
            entries.widest = 0;
        });
        self.changed.store(true, Ordering::Release);
    }

    pub fn len(&self) -> usize {
        self.entries.lock(|cell| cell.borrow().items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock(|cell| cell.borrow().capacity)
    }

    /// Copy of the entry at `index`
    pub fn get(&self, index: usize) -> Option<Entry> {
        self.entries
            .lock(|cell| cell.borrow().items.get(index).cloned())
    }

    pub fn selected(&self) -> Option<usize> {
        self.entries.lock(|cell| cell.borrow().selected)
    }

    /// Select `index`, or clear the selection with `None`
    ///
    /// Out-of-range indices are ignored.
    pub fn select(&self, index: Option<usize>) {
        let moved = self.entries.lock(|cell| {
            let mut entries = cell.borrow_mut();
            match index {
                Some(i) if i >= entries.items.len() => false,
                _ if entries.selected == index => false,
                _ => {
                    entries.selected = index;
                    true
                }
            }
        });
        if moved {
            self.changed.store(true, Ordering::Release);
        }
    }

    /// Display columns of the widest entry
    pub fn widest(&self) -> usize {
        self.entries.lock(|cell| cell.borrow().widest)
    }

    /// Check if the entries changed since the list last drew them
    pub fn is_changed(&self) -> bool {
        self.changed.load(Ordering::Acquire)
    }

    pub(crate) fn take_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    /// Copy up to `rows` entries starting at `first`, with the selection
    fn window(&self, first: usize, rows: usize) -> (Vec<Entry, MAX_LIST_ENTRIES>, Option<usize>) {
        self.entries.lock(|cell| {
            let entries = cell.borrow();
            let visible = entries.items.iter().skip(first).take(rows).cloned().collect();
            (visible, entries.selected)
        })
    }
}

impl Default for ListModel {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for ListModel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ListModel")
            .field("len", &self.len())
            .field("selected", &self.selected())
            .finish()
    }
}

/// Scrollable list of text rows backed by a shared [`ListModel`]
///
/// The first press on a row selects it; pressing the selected row again
/// reports [`WidgetEvent::Selected`].
#[derive(Debug)]
pub struct List<'a> {
    base: WidgetBase,
    model: &'a ListModel,
    /// First visible row
    scroll: usize,
}

impl<'a> List<'a> {
    pub fn new(model: &'a ListModel) -> Self {
        Self {
            base: WidgetBase::new(),
            model,
            scroll: 0,
        }
    }

    pub fn model(&self) -> &'a ListModel {
        self.model
    }

    /// Size the list for `rows` entries
    ///
    /// Empties the model, sets its capacity to `rows` and fits the height to
    /// that many rows. A non-zero `width` fixes the width.
    pub fn init(&mut self, ctx: &mut RenderContext, rows: usize, width: u32) {
        let rows = rows.min(MAX_LIST_ENTRIES);
        self.model.set_capacity(rows);
        self.scroll = 0;
        self.base
            .set_height(Self::row_height(ctx) * rows as u32 + MARGIN_Y);
        if width != 0 {
            self.base.set_width(width);
        }
        self.base.mark_dirty(ctx);
    }

    /// Scroll by `delta` rows, keeping the first visible row in range
    pub fn scroll_by(&mut self, ctx: &mut RenderContext, delta: isize) {
        let last = self.model.len().saturating_sub(1);
        let target = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        }
        .min(last);

        if target != self.scroll {
            self.scroll = target;
            self.base.mark_dirty(ctx);
        }
    }

    /// First visible row
    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn row_height(ctx: &RenderContext) -> u32 {
        ctx.font().height + MARGIN_Y
    }

    fn visible_rows(&self, ctx: &RenderContext) -> usize {
        (self.base.rect().h.saturating_sub(MARGIN_Y) / Self::row_height(ctx)) as usize
    }
}

impl Control for List<'_> {
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
        let font_h = ctx.font().height;
        let row_h = Self::row_height(ctx);

        surface.draw_rect(rect, theme.foreground)?;
        let interior = rect.inset(1, 1);
        if !interior.is_empty() {
            surface.fill_rect(interior, theme.background)?;
        }

        let (rows, selected) = self.model.window(self.scroll, self.visible_rows(ctx));
        let row_w = rect.w.saturating_sub(MARGIN_X * 2);
        let x = rect.x + MARGIN_X as i32;
        let mut y = rect.y + MARGIN_Y as i32;
        for (offset, entry) in rows.iter().enumerate() {
            let (fg, bg) = if selected == Some(self.scroll + offset) {
                (theme.selection_text, theme.selection)
            } else {
                (theme.foreground, theme.background)
            };
            surface.fill_rect(Rect::new(x, y, row_w, font_h), bg)?;
            surface.draw_text(x, y, entry, fg, Some(bg))?;
            y += row_h as i32;
        }
        Ok(())
    }

    fn handle_press(
        &mut self,
        ctx: &mut RenderContext,
        _local_x: i32,
        local_y: i32,
    ) -> Option<WidgetEvent> {
        if local_y < 0 {
            return None;
        }
        let row = local_y as usize / Self::row_height(ctx) as usize;
        if row >= self.visible_rows(ctx) {
            return None;
        }
        let index = row + self.scroll;
        let text = self.model.get(index)?;

        if self.model.selected() == Some(index) {
            Some(WidgetEvent::Selected { index, text })
        } else {
            self.model.select(Some(index));
            self.base.mark_dirty(ctx);
            None
        }
    }

    fn take_dirty(&mut self, ctx: &RenderContext) -> bool {
        let changed = self.model.take_changed();
        if changed {
            let width = ctx.font().columns(self.model.widest()) + MARGIN_X * 2;
            self.base.grow(width, 0);
            self.scroll = self.scroll.min(self.model.len().saturating_sub(1));
        }
        self.base.take_dirty() || changed
    }
}
