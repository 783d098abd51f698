//! tapui Hardware Abstraction Layer
//!
//! Traits for the hardware collaborators the widget toolkit consumes but
//! does not own. Board support crates implement these for their
//! EEPROM/flash emulation and touch controller.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (screens, wiring)          │
//! └─────────────────────────────────────────┘
//!            │                   │
//!            ▼                   ▼
//! ┌──────────────────┐  ┌──────────────────┐
//! │   tapui-core     │  │  tapui-drivers   │
//! └──────────────────┘  └──────────────────┘
//!            │                   │
//!            └─────────┬─────────┘
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │  tapui-hal (this crate - traits)        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`nvm::Nvm`] - Byte-addressable non-volatile memory
//! - [`touch::TouchPanel`] - Single-point touch sampling

#![no_std]
#![deny(unsafe_code)]

pub mod nvm;
pub mod touch;

pub use nvm::{Nvm, NvmError};
pub use touch::{TouchPanel, TouchPoint};
