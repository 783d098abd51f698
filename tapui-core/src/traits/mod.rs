//! Collaborator traits
//!
//! Interfaces the widget engine consumes but does not implement. Board
//! and driver crates provide the implementations.

pub mod store;

pub use store::{StoreError, StringStore};
