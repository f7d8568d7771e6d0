//! Core domain + application logic for the YouTube → Telegram notifier.
//!
//! This crate is framework-agnostic. The YouTube Data API and the Telegram Bot
//! API live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod ports;
pub mod responder;
pub mod scheduler;
pub mod seen_store;
pub mod sync;

#[cfg(test)]
mod testing;

pub use errors::{Error, Result};
