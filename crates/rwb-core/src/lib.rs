//! Core domain + application logic for the ruble/weather Telegram bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the secondary
//! HTTP APIs live behind ports (traits) implemented in adapter crates.

pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod errors;
pub mod features;
pub mod formatting;
pub mod logging;
pub mod messaging;
pub mod poller;
pub mod ports;
pub mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use errors::{Error, Result};
