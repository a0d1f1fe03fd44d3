//! Application lifecycle and execution modes
//!
//! - `lifetime`: startup wiring and graceful shutdown
//! - `modes`: HTTP server and one-shot CLI commands

pub mod lifetime;
pub mod modes;

pub use lifetime::startup::StartupContext;
