//! Configuration Module
//!
//! Configuration loading for the stock market server.

mod settings;

pub use settings::{ConfigError, MarketSettings, ServerConfig, ServerSettings, StorageSettings};
