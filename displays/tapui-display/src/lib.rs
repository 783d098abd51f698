//! Rendering surface traits and shared geometry for tapui
//!
//! This crate provides:
//! - `Surface` trait: the primitive drawing operations widgets consume
//! - `Rect` geometry with the toolkit's strict hit-test semantics
//! - `GraphicsSurface`: an adapter rendering onto any `embedded-graphics`
//!   `DrawTarget<Color = Rgb565>`
//!
//! # Architecture
//!
//! Widgets never talk to a display driver directly. The core hands each
//! widget a `&mut impl Surface` during the draw pass. Boards with an
//! `embedded-graphics` driver (ILI9341, ST7789, ...) wrap it in
//! `GraphicsSurface`; host tests use a recording surface instead.

#![no_std]
#![deny(unsafe_code)]

pub mod backend;
pub mod geom;
pub mod graphics;

// Re-export key types
pub use backend::{DisplayError, Surface};
pub use embedded_graphics::pixelcolor::Rgb565;
pub use geom::Rect;
pub use graphics::GraphicsSurface;
