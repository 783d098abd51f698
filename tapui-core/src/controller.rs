//! Layer pool and frame cycle
//!
//! The controller owns the [`RenderContext`] and a fixed pool of
//! [`Layer`]s, one of which is active. Each frame the render loop calls
//! [`Controller::touch_dispatch`] with at most one touch sample, then
//! [`Controller::draw_pass`].
//!
//! # Layer switching
//!
//! ```text
//!            switch_layer(L')
//!   ┌──────────┐ ───────────────► ┌───────────────────┐
//!   │ Idle(L)  │                  │ Idle(L'), pending │
//!   └──────────┘ ◄─────────────── └───────────────────┘
//!                  draw_pass():
//!                  clear dirty box, draw every widget
//! ```

use tapui_display::{DisplayError, Surface};

use crate::config::{ConfigError, UiConfig, LAYER_POOL_SIZE};
use crate::context::RenderContext;
use crate::layer::{Layer, LayerError};
use crate::widget::{Control, UiEvent, Widget, WidgetId};

/// Top-level widget engine
#[derive(Debug)]
pub struct Controller<'a> {
    ctx: RenderContext,
    layers: [Layer<'a>; LAYER_POOL_SIZE],
    active: usize,
    /// Next draw pass repaints the whole active layer
    switch_pending: bool,
}

impl<'a> Controller<'a> {
    /// Create a controller with empty layers; layer 0 is active
    pub fn new(config: &UiConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            ctx: RenderContext::new(config),
            layers: core::array::from_fn(|_| Layer::new()),
            active: 0,
            switch_pending: true,
        })
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut RenderContext {
        &mut self.ctx
    }

    pub fn active_layer(&self) -> usize {
        self.active
    }

    pub fn layer(&self, index: usize) -> Option<&Layer<'a>> {
        self.layers.get(index)
    }

    /// Make `layer` active
    ///
    /// The next draw pass clears the accumulated dirty box and draws
    /// every widget of the new layer.
    pub fn switch_layer(&mut self, layer: usize) -> Result<(), LayerError> {
        if layer >= LAYER_POOL_SIZE {
            return Err(LayerError::InvalidLayer);
        }
        info!("switch layer {=usize} -> {=usize}", self.active, layer);
        self.active = layer;
        self.switch_pending = true;
        Ok(())
    }

    /// Add a widget to `layer`
    pub fn append(
        &mut self,
        layer: usize,
        widget: impl Into<Widget<'a>>,
    ) -> Result<WidgetId, LayerError> {
        let target = self
            .layers
            .get_mut(layer)
            .ok_or(LayerError::InvalidLayer)?;
        let index = target.append(&mut self.ctx, widget.into())?;
        debug!("layer {=usize}: appended widget {=usize}", layer, index);
        Ok(WidgetId {
            layer: layer as u8,
            index: index as u8,
        })
    }

    pub fn widget(&self, id: WidgetId) -> Option<&Widget<'a>> {
        self.layers.get(id.layer as usize)?.get(id.index as usize)
    }

    /// Mutable access to a widget together with the render context
    pub fn widget_mut(&mut self, id: WidgetId) -> Option<WidgetMut<'_, 'a>> {
        let widget = self
            .layers
            .get_mut(id.layer as usize)?
            .get_mut(id.index as usize)?;
        Some(WidgetMut {
            widget,
            ctx: &mut self.ctx,
        })
    }

    /// Focused widget of the active layer
    pub fn current_focus(&self) -> Option<WidgetId> {
        self.layers[self.active].focused().map(|index| WidgetId {
            layer: self.active as u8,
            index: index as u8,
        })
    }

    pub fn set_focus(&mut self, id: WidgetId, focused: bool) {
        if let Some(layer) = self.layers.get_mut(id.layer as usize) {
            layer.set_focus(&mut self.ctx, id.index as usize, focused);
        }
    }

    pub fn next_focus(&mut self, id: WidgetId) {
        if let Some(layer) = self.layers.get_mut(id.layer as usize) {
            layer.next_focus(&mut self.ctx, id.index as usize);
        }
    }

    pub fn prev_focus(&mut self, id: WidgetId) {
        if let Some(layer) = self.layers.get_mut(id.layer as usize) {
            layer.prev_focus(&mut self.ctx, id.index as usize);
        }
    }

    /// Check if the next draw pass would draw anything
    pub fn needs_draw(&self) -> bool {
        self.switch_pending
            || self.ctx.redraw_requested()
            || self.layers[self.active].has_pending_changes()
    }

    /// Draw the active layer
    ///
    /// After a layer switch the accumulated dirty box is cleared first and
    /// every widget is drawn; otherwise only dirty widgets are. Each drawn
    /// widget extends the dirty box. The active layer is sealed.
    pub fn draw_pass<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), DisplayError> {
        let forced = self.switch_pending;
        if forced {
            self.ctx.clear_and_flush(surface)?;
        }

        let layer = &mut self.layers[self.active];
        layer.seal();
        for index in layer.chain() {
            let Some(widget) = layer.get_mut(index) else {
                continue;
            };
            if widget.take_dirty(&self.ctx) || forced {
                widget.draw(&self.ctx, surface, forced)?;
                self.ctx.set_bounding_box(widget.rect());
            }
        }

        self.switch_pending = false;
        self.ctx.clear_redraw_request();
        Ok(())
    }

    /// Route a touch sample to the active layer
    ///
    /// The first widget in chain order whose rectangle contains the point
    /// is hit. A fresh press on the focused widget reaches its
    /// `handle_press` in widget-local coordinates; any other hit only moves
    /// focus to the widget. Misses do nothing.
    pub fn touch_dispatch(&mut self, x: i32, y: i32, fresh: bool) -> Option<UiEvent> {
        let active = self.active;
        let layer = &mut self.layers[active];

        let index = layer
            .chain()
            .into_iter()
            .find(|&index| layer.get(index).is_some_and(|w| w.hit_test(x, y)))?;

        let widget = layer.get_mut(index)?;
        if fresh && widget.is_focused() {
            let rect = widget.rect();
            let kind = widget.handle_press(&mut self.ctx, x - rect.x, y - rect.y)?;
            let event = UiEvent {
                widget: WidgetId {
                    layer: active as u8,
                    index: index as u8,
                },
                kind,
            };
            debug!("event {}", event);
            Some(event)
        } else {
            layer.set_focus(&mut self.ctx, index, true);
            None
        }
    }

    /// Dispatch a touch sample and hand any resulting event to `handler`
    ///
    /// `handler` receives the application state, the controller (to switch
    /// layers or update widgets) and the event.
    pub fn dispatch_with<St, R, F>(
        &mut self,
        x: i32,
        y: i32,
        fresh: bool,
        state: &mut St,
        handler: F,
    ) -> Option<R>
    where
        St: ?Sized,
        F: FnOnce(&mut St, &mut Self, UiEvent) -> R,
    {
        let event = self.touch_dispatch(x, y, fresh)?;
        Some(handler(state, self, event))
    }
}

/// A widget borrowed together with the render context
///
/// Widget setters need the context to size themselves and to request a
/// redraw.
pub struct WidgetMut<'c, 'a> {
    widget: &'c mut Widget<'a>,
    ctx: &'c mut RenderContext,
}

impl<'c, 'a> WidgetMut<'c, 'a> {
    /// Move the widget; zero sizes keep the current dimension
    pub fn set_geometry(&mut self, x: i32, y: i32, w: u32, h: u32) -> &mut Self {
        self.widget.base_mut().set_geometry(self.ctx, x, y, w, h);
        self
    }

    pub fn set_caption(&mut self, caption: &str) -> &mut Self {
        self.widget.set_caption(self.ctx, caption);
        self
    }

    pub fn widget(&self) -> &Widget<'a> {
        &*self.widget
    }

    /// Split into the widget and the context for variant-specific setters
    pub fn split(&mut self) -> (&mut Widget<'a>, &mut RenderContext) {
        (&mut *self.widget, &mut *self.ctx)
    }
}
