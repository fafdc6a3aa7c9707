//! Server Configuration Settings
//!
//! Configuration types for the stock market server, loaded from environment
//! variables.

use std::path::PathBuf;

use chrono::NaiveTime;

use crate::domain::market_hours::MarketHours;

/// Server port settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    /// gRPC server port.
    pub grpc_port: u16,
    /// Health check HTTP port.
    pub health_port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            grpc_port: 5251,
            health_port: 8081,
        }
    }
}

/// Durable price log settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageSettings {
    /// Path of the append-only price log.
    pub price_log_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            price_log_path: PathBuf::from("stockprices.txt"),
        }
    }
}

/// Market policy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketSettings {
    /// Whether the trading window is enforced.
    pub hours_enforced: bool,
    /// Opening time, UTC.
    pub open: NaiveTime,
    /// Closing time, UTC.
    pub close: NaiveTime,
    /// Whether the fault-injection cycle is active.
    pub fault_injection: bool,
}

impl Default for MarketSettings {
    fn default() -> Self {
        Self {
            hours_enforced: false,
            open: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or(NaiveTime::MIN),
            close: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or(NaiveTime::MIN),
            fault_injection: false,
        }
    }
}

impl MarketSettings {
    /// Market-hours policy implied by these settings.
    #[must_use]
    pub const fn market_hours(&self) -> MarketHours {
        if self.hours_enforced {
            MarketHours::Window {
                open: self.open,
                close: self.close,
            }
        } else {
            MarketHours::AlwaysOpen
        }
    }
}

/// Complete server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Server port settings.
    pub server: ServerSettings,
    /// Durable price log settings.
    pub storage: StorageSettings,
    /// Market policy settings.
    pub market: MarketSettings,
}

impl ServerConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a time value is malformed or the price log path
    /// is set but empty.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    ///
    /// Malformed numbers and flags fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a time value is malformed, the trading window is
    /// empty, or the price log path is set but empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerSettings::default();
        let server = ServerSettings {
            grpc_port: parse_u16(&lookup, "STOCK_MARKET_GRPC_PORT", server_defaults.grpc_port),
            health_port: parse_u16(
                &lookup,
                "STOCK_MARKET_HEALTH_PORT",
                server_defaults.health_port,
            ),
        };

        let storage = match lookup("STOCK_MARKET_PRICE_LOG") {
            Some(path) if path.trim().is_empty() => {
                return Err(ConfigError::EmptyValue("STOCK_MARKET_PRICE_LOG".to_string()));
            }
            Some(path) => StorageSettings {
                price_log_path: PathBuf::from(path),
            },
            None => StorageSettings::default(),
        };

        let market_defaults = MarketSettings::default();
        let market = MarketSettings {
            hours_enforced: parse_bool(
                &lookup,
                "STOCK_MARKET_HOURS_ENFORCED",
                market_defaults.hours_enforced,
            ),
            open: parse_time(&lookup, "STOCK_MARKET_OPEN", market_defaults.open)?,
            close: parse_time(&lookup, "STOCK_MARKET_CLOSE", market_defaults.close)?,
            fault_injection: parse_bool(
                &lookup,
                "STOCK_MARKET_FAULT_INJECTION",
                market_defaults.fault_injection,
            ),
        };

        if market.open >= market.close {
            return Err(ConfigError::EmptyWindow {
                open: market.open,
                close: market.close,
            });
        }

        Ok(Self {
            server,
            storage,
            market,
        })
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Environment variable has empty value.
    #[error("environment variable {0} cannot be empty")]
    EmptyValue(String),
    /// Environment variable could not be parsed.
    #[error("environment variable {key} has invalid value {value:?}: expected {expected}")]
    InvalidValue {
        /// Variable name.
        key: String,
        /// Rejected value.
        value: String,
        /// Accepted format.
        expected: &'static str,
    },
    /// Opening time is not before closing time.
    #[error("market opens at {open} but closes at {close}")]
    EmptyWindow {
        /// Configured opening time.
        open: NaiveTime,
        /// Configured closing time.
        close: NaiveTime,
    },
}

fn parse_u16<F>(lookup: &F, key: &str, default: u16) -> u16
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool<F>(lookup: &F, key: &str, default: bool) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).map_or(default, |v| {
        match v.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => true,
            "false" | "0" | "no" | "off" => false,
            _ => default,
        }
    })
}

fn parse_time<F>(lookup: &F, key: &str, default: NaiveTime) -> Result<NaiveTime, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = lookup(key) else {
        return Ok(default);
    };

    NaiveTime::parse_from_str(value.trim(), "%H:%M").map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        expected: "HH:MM",
    })
}
