//! Process-level plumbing: logging setup

pub mod logging;

pub use logging::init_logging;
