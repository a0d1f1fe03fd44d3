//! Configuration
//!
//! `AppConfig` is loaded once at startup and handed to each component
//! explicitly. Nothing in the crate reads configuration from a global.

mod structs;

pub use structs::*;
