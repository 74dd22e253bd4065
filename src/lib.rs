// This file makes the crate a library and declares modules for use
// by the binary (main.rs) and integration tests.

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod origin;
pub mod settings;

pub use client::{ApiClient, SharedClient};
pub use config::{BaseUrlSource, ClientConfig, DEFAULT_TIMEOUT_MS};
pub use error::ConfigError;
