//! caretaker-cli library surface
//!
//! Exposes the package loader and command handlers to integration tests.

pub mod cli;
pub mod commands;
pub mod error;
pub mod loader;
pub mod logging;
pub mod output;
