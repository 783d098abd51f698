//! Collaborator implementations
//!
//! This crate provides concrete implementations of the interfaces the
//! widget engine in tapui-core relies on:
//!
//! - Tagged string store on byte-addressable non-volatile memory
//! - RAM-backed non-volatile memory for hosts and tests
//! - Single-worker bounded job queue with cooperative cancellation

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod store;
pub mod worker;

pub use store::{NvmStringStore, RamNvm};
pub use worker::{CancelToken, JobError, JobQueue, JobTicket};
