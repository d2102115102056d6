//! Application configuration loaded from environment variables.

use std::str::FromStr;

use domain::{OperationalSettings, RestaurantConfig};
use projections::DEFAULT_ACTIVITY_CAPACITY;
use store::SimulatedLatency;
use thiserror::Error;

/// A variable was set to a value that does not parse.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid value {value:?} for {key}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(()),
        }
    }
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST`: bind address (default: `"0.0.0.0"`)
/// - `PORT`: listen port (default: `3000`)
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT`: `pretty` or `json` (default: `pretty`)
/// - `READ_LATENCY_MS` / `WRITE_LATENCY_MS`: simulated store delays (default: `0`)
/// - `MAX_PARTY_SIZE`: largest party accepted (default: `12`)
/// - `SEED_DATA`: load the bundled floor and bookings at startup (default: `true`)
/// - `ACTIVITY_CAPACITY`: activity feed length (default: `50`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub read_latency_ms: u64,
    pub write_latency_ms: u64,
    pub max_party_size: u32,
    pub seed_data: bool,
    pub activity_capacity: usize,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults for unset ones.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse(&lookup, "PORT", defaults.port)?,
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: parse(&lookup, "LOG_FORMAT", defaults.log_format)?,
            read_latency_ms: parse(&lookup, "READ_LATENCY_MS", defaults.read_latency_ms)?,
            write_latency_ms: parse(&lookup, "WRITE_LATENCY_MS", defaults.write_latency_ms)?,
            max_party_size: parse(&lookup, "MAX_PARTY_SIZE", defaults.max_party_size)?,
            seed_data: parse_flag(&lookup, "SEED_DATA", defaults.seed_data)?,
            activity_capacity: parse(&lookup, "ACTIVITY_CAPACITY", defaults.activity_capacity)?,
        })
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Settings for assembling the restaurant services.
    pub fn restaurant(&self) -> RestaurantConfig {
        RestaurantConfig {
            settings: OperationalSettings {
                max_party_size: self.max_party_size,
            },
            latency: SimulatedLatency::from_millis(self.read_latency_ms, self.write_latency_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            read_latency_ms: 0,
            write_latency_ms: 0,
            max_party_size: OperationalSettings::default().max_party_size,
            seed_data: true,
            activity_capacity: DEFAULT_ACTIVITY_CAPACITY,
        }
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError { key, value }),
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(key) {
        None => Ok(default),
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError { key, value }),
        },
    }
}
