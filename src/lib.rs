//! linkshelf - product click tracking and image delivery for a storefront
//!
//! This library provides the core functionality for the linkshelf service:
//! recording product clicks, resolving image references into render plans,
//! and relaying image uploads to the hosting provider.
//!
//! # Architecture
//! - `storage`: SeaORM backends, migrations and the atomic click write path
//! - `services`: business logic between handlers and storage
//! - `media`: image reference classification, CDN URLs, rendering, uploads
//! - `api`: HTTP handlers and routes
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod i18n;
pub mod media;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
