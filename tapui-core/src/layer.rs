//! Per-screen widget collection and circular focus chain
//!
//! Widgets live in an indexed pool; `next`/`prev` are indices into that
//! pool. Appending keeps the chain closed: following `next` from any
//! widget returns to it after exactly `len()` steps.

use heapless::Vec;

use crate::config::MAX_WIDGETS_PER_LAYER;
use crate::context::RenderContext;
use crate::widget::{Control, Widget};

/// Errors from building a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LayerError {
    /// Widget pool exhausted
    Full,
    /// Layer was already drawn; its membership is frozen
    Sealed,
    /// Layer index outside the controller's pool
    InvalidLayer,
}

#[derive(Debug)]
struct Slot<'a> {
    widget: Widget<'a>,
    next: Option<usize>,
    prev: Option<usize>,
}

/// One screen's widgets and focus state
#[derive(Debug, Default)]
pub struct Layer<'a> {
    slots: Vec<Slot<'a>, MAX_WIDGETS_PER_LAYER>,
    focused: Option<usize>,
    sealed: bool,
}

impl<'a> Layer<'a> {
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            focused: None,
            sealed: false,
        }
    }

    /// Link `widget` at the end of the chain, returning its index
    ///
    /// The first widget of a layer receives focus.
    pub fn append(
        &mut self,
        ctx: &mut RenderContext,
        widget: Widget<'a>,
    ) -> Result<usize, LayerError> {
        if self.sealed {
            return Err(LayerError::Sealed);
        }
        let index = self.slots.len();
        let slot = if index == 0 {
            Slot {
                widget,
                next: Some(0),
                prev: Some(0),
            }
        } else {
            Slot {
                widget,
                next: Some(0),
                prev: Some(index - 1),
            }
        };
        self.slots.push(slot).map_err(|_| LayerError::Full)?;

        if index > 0 {
            self.slots[index - 1].next = Some(index);
            self.slots[0].prev = Some(index);
        }
        debug_assert!(self.chain_is_closed());

        if index == 0 {
            self.set_focus(ctx, 0, true);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Widget<'a>> {
        self.slots.get(index).map(|slot| &slot.widget)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Widget<'a>> {
        self.slots.get_mut(index).map(|slot| &mut slot.widget)
    }

    /// Index of the focused widget
    pub fn focused(&self) -> Option<usize> {
        self.focused
    }

    /// Freeze membership; done by the first draw
    pub fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    /// Chain order, starting at the first appended widget
    pub fn chain(&self) -> Vec<usize, MAX_WIDGETS_PER_LAYER> {
        let mut order = Vec::new();
        if self.slots.is_empty() {
            return order;
        }
        let mut current = 0;
        loop {
            if order.push(current).is_err() {
                break;
            }
            match self.slots[current].next {
                Some(next) if next != 0 && order.len() < self.slots.len() => current = next,
                _ => break,
            }
        }
        order
    }

    /// Check that walking `next` from every widget returns to it after
    /// exactly `len()` steps, and that `prev` mirrors `next`
    pub fn chain_is_closed(&self) -> bool {
        let len = self.slots.len();
        (0..len).all(|start| {
            let mut current = start;
            for step in 1..=len {
                let Some(next) = self.slots[current].next else {
                    return false;
                };
                if next >= len || self.slots[next].prev != Some(current) {
                    return false;
                }
                current = next;
                if current == start {
                    return step == len;
                }
            }
            false
        })
    }

    /// Give or take focus from the widget at `index`
    ///
    /// Focusing the current holder is a no-op. Otherwise the previous
    /// holder loses focus and is redrawn, and the target is redrawn if its
    /// state changed. Unfocusing a widget that does not hold focus only
    /// clears its flag. Out-of-range indices are ignored.
    pub fn set_focus(&mut self, ctx: &mut RenderContext, index: usize, focused: bool) {
        if index >= self.slots.len() {
            return;
        }
        if focused {
            if self.focused == Some(index) {
                return;
            }
            if let Some(previous) = self.focused.take() {
                let base = self.slots[previous].widget.base_mut();
                base.set_focused(false);
                base.mark_dirty(ctx);
            }
            self.focused = Some(index);
        } else if self.focused == Some(index) {
            self.focused = None;
        }

        let base = self.slots[index].widget.base_mut();
        if base.is_focused() != focused {
            base.set_focused(focused);
            base.mark_dirty(ctx);
        }
        trace!("focus {=usize} -> {=bool}", index, focused);
    }

    /// Move focus from `index` to the next widget in the chain
    ///
    /// Only effective while `index` holds focus; a no-op on single-widget
    /// layers.
    pub fn next_focus(&mut self, ctx: &mut RenderContext, index: usize) {
        let next = self.slots.get(index).and_then(|slot| slot.next);
        self.move_focus(ctx, index, next);
    }

    /// Move focus from `index` to the previous widget in the chain
    pub fn prev_focus(&mut self, ctx: &mut RenderContext, index: usize) {
        let prev = self.slots.get(index).and_then(|slot| slot.prev);
        self.move_focus(ctx, index, prev);
    }

    fn move_focus(&mut self, ctx: &mut RenderContext, from: usize, to: Option<usize>) {
        if self.focused != Some(from) {
            return;
        }
        if let Some(to) = to.filter(|&to| to != from) {
            self.set_focus(ctx, to, true);
        }
    }

    /// Peek whether any widget waits to be drawn
    pub fn has_pending_changes(&self) -> bool {
        self.slots.iter().any(|slot| slot.widget.has_pending_changes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::widget::{Button, CheckBox};
    use proptest::prelude::*;

    fn context() -> RenderContext {
        RenderContext::new(&UiConfig::default())
    }

    fn layer_with(ctx: &mut RenderContext, n: usize) -> Layer<'static> {
        let mut layer = Layer::new();
        for _ in 0..n {
            layer.append(ctx, Button::new().into()).unwrap();
        }
        layer
    }

    fn focused_count(layer: &Layer<'_>) -> usize {
        (0..layer.len())
            .filter(|&i| layer.get(i).is_some_and(|w| w.is_focused()))
            .count()
    }

    #[test]
    fn test_first_widget_takes_focus() {
        let mut ctx = context();
        let layer = layer_with(&mut ctx, 3);
        assert_eq!(layer.focused(), Some(0));
        assert!(layer.get(0).unwrap().is_focused());
        assert_eq!(focused_count(&layer), 1);
        assert_eq!(layer.chain().as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn test_append_after_seal_rejected() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 1);
        layer.seal();
        assert_eq!(
            layer.append(&mut ctx, CheckBox::new().into()),
            Err(LayerError::Sealed)
        );
        assert_eq!(layer.len(), 1);
    }

    #[test]
    fn test_append_when_full() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, MAX_WIDGETS_PER_LAYER);
        assert_eq!(
            layer.append(&mut ctx, Button::new().into()),
            Err(LayerError::Full)
        );
        assert!(layer.chain_is_closed());
    }

    #[test]
    fn test_set_focus_moves_and_dirties() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 3);
        for i in 0..3 {
            layer.get_mut(i).unwrap().base_mut().take_dirty();
        }

        layer.set_focus(&mut ctx, 2, true);

        assert_eq!(layer.focused(), Some(2));
        assert!(!layer.get(0).unwrap().is_focused());
        assert!(layer.get_mut(0).unwrap().base_mut().take_dirty());
        assert!(!layer.get_mut(1).unwrap().base_mut().take_dirty());
        assert!(layer.get_mut(2).unwrap().base_mut().take_dirty());
    }

    #[test]
    fn test_refocus_is_noop() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 2);
        layer.get_mut(0).unwrap().base_mut().take_dirty();

        layer.set_focus(&mut ctx, 0, true);
        assert!(!layer.get_mut(0).unwrap().base_mut().take_dirty());
    }

    #[test]
    fn test_out_of_range_focus_ignored() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 2);
        layer.set_focus(&mut ctx, 7, true);
        layer.next_focus(&mut ctx, 7);
        assert_eq!(layer.focused(), Some(0));
    }

    #[test]
    fn test_next_prev_wrap_around() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 3);

        layer.prev_focus(&mut ctx, 0);
        assert_eq!(layer.focused(), Some(2));
        layer.next_focus(&mut ctx, 2);
        assert_eq!(layer.focused(), Some(0));
        layer.next_focus(&mut ctx, 0);
        assert_eq!(layer.focused(), Some(1));
    }

    #[test]
    fn test_navigation_from_unfocused_widget_ignored() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 3);
        layer.next_focus(&mut ctx, 1);
        assert_eq!(layer.focused(), Some(0));
    }

    #[test]
    fn test_single_widget_navigation_is_noop() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 1);
        layer.get_mut(0).unwrap().base_mut().take_dirty();

        layer.next_focus(&mut ctx, 0);
        layer.prev_focus(&mut ctx, 0);

        assert_eq!(layer.focused(), Some(0));
        assert!(layer.get(0).unwrap().is_focused());
        assert!(!layer.get_mut(0).unwrap().base_mut().take_dirty());
    }

    #[test]
    fn test_unfocus_holder() {
        let mut ctx = context();
        let mut layer = layer_with(&mut ctx, 2);
        layer.set_focus(&mut ctx, 0, false);
        assert_eq!(layer.focused(), None);
        assert_eq!(focused_count(&layer), 0);
    }

    #[derive(Debug, Clone)]
    enum FocusOp {
        Set(usize, bool),
        Next(usize),
        Prev(usize),
    }

    fn focus_op() -> impl Strategy<Value = FocusOp> {
        prop_oneof![
            (0usize..20, any::<bool>()).prop_map(|(i, f)| FocusOp::Set(i, f)),
            (0usize..20).prop_map(FocusOp::Next),
            (0usize..20).prop_map(FocusOp::Prev),
        ]
    }

    proptest! {
        #[test]
        fn prop_chain_is_closed(n in 1usize..=MAX_WIDGETS_PER_LAYER) {
            let mut ctx = context();
            let layer = layer_with(&mut ctx, n);

            prop_assert!(layer.chain_is_closed());
            prop_assert_eq!(layer.chain().len(), n);
        }

        #[test]
        fn prop_at_most_one_focused(
            n in 1usize..=MAX_WIDGETS_PER_LAYER,
            ops in proptest::collection::vec(focus_op(), 0..40),
        ) {
            let mut ctx = context();
            let mut layer = layer_with(&mut ctx, n);

            for op in ops {
                match op {
                    FocusOp::Set(i, focused) => {
                        layer.set_focus(&mut ctx, i, focused);
                        if focused && i < n {
                            prop_assert!(layer.get(i).unwrap().is_focused());
                        }
                    }
                    FocusOp::Next(i) => layer.next_focus(&mut ctx, i),
                    FocusOp::Prev(i) => layer.prev_focus(&mut ctx, i),
                }
                prop_assert!(focused_count(&layer) <= 1);
                if let Some(holder) = layer.focused() {
                    prop_assert!(layer.get(holder).unwrap().is_focused());
                }
            }
        }
    }
}
