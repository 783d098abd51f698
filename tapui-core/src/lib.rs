//! Retained-mode widget engine for small touchscreen devices
//!
//! This crate contains everything that does not depend on a specific
//! board:
//!
//! - Render context: font cell, dirty-box accumulation, clipboard
//! - Widget contract and the button, check box, list and text-edit variants
//! - Layers (screens) with a circular focus chain
//! - The controller driving the per-frame touch dispatch and draw pass
//! - Touch edge tracking and the cooperative frame loop
//! - Configuration type definitions
//! - Traits for the collaborators the engine consumes (string store)

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod context;
pub mod controller;
pub mod input;
pub mod layer;
pub mod runloop;
pub mod text;
pub mod text_edit;
pub mod traits;
pub mod widget;

#[cfg(test)]
mod testutil;

pub use config::UiConfig;
pub use context::RenderContext;
pub use controller::{Controller, WidgetMut};
pub use layer::{Layer, LayerError};
pub use runloop::{Frame, FrameError, FrameLoop, FrameTick};
pub use text_edit::{EditBuffer, TextEdit};
pub use widget::{
    Button, CheckBox, Control, List, ListModel, UiEvent, Widget, WidgetEvent, WidgetId,
};
