//! Configuration management for the WhatsApp transport.
//!
//! This module handles loading and validating configuration from environment variables.
//! Every value has a default that matches the provider integration as deployed, except
//! TLS verification, which stays on unless explicitly disabled.

use crate::error::{ConfigError, ConfigResult};
use std::env;
use std::time::Duration;

/// Provider endpoint used when `WHATSAPP_API_URL` is unset.
pub const DEFAULT_API_URL: &str = "http://116.203.191.58/api/send_message";

/// Region assumed for numbers written without a country code.
pub const DEFAULT_REGION: &str = "IN";

/// Overall HTTP request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 360;

/// Configuration for the WhatsApp transport.
#[derive(Debug, Clone)]
pub struct Config {
    /// Provider `send_message` endpoint URL
    pub api_url: String,

    /// ISO-3166 alpha-2 region used when a number has no country code (default: "IN")
    pub default_region: String,

    /// HTTP request timeout in seconds (default: 360)
    /// Connection establishment is bounded by the same value
    pub request_timeout: u64,

    /// Accept invalid TLS certificates and host names (default: false)
    pub accept_invalid_certs: bool,

    /// Log level (default: "error")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `WHATSAPP_API_URL`: Provider endpoint (default: the production endpoint)
    /// - `WHATSAPP_DEFAULT_REGION`: Region for numbers without country code (default: "IN")
    /// - `WHATSAPP_REQUEST_TIMEOUT`: HTTP timeout in seconds (default: 360)
    /// - `WHATSAPP_ACCEPT_INVALID_CERTS`: Disable TLS verification (default: false)
    /// - `LOG_LEVEL`: Logging level (default: "error")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let api_url = env::var("WHATSAPP_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue {
                var: "WHATSAPP_API_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let default_region = env::var("WHATSAPP_DEFAULT_REGION")
            .map(|r| r.trim().to_ascii_uppercase())
            .unwrap_or_else(|_| DEFAULT_REGION.to_string());

        if default_region.parse::<phonenumber::country::Id>().is_err() {
            return Err(ConfigError::InvalidValue {
                var: "WHATSAPP_DEFAULT_REGION".to_string(),
                reason: format!("Unknown region code: {}", default_region),
            });
        }

        let request_timeout =
            Self::parse_env_u64("WHATSAPP_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if request_timeout == 0 {
            return Err(ConfigError::InvalidValue {
                var: "WHATSAPP_REQUEST_TIMEOUT".to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }

        let accept_invalid_certs = Self::parse_env_bool("WHATSAPP_ACCEPT_INVALID_CERTS", false)?;

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        Ok(Config {
            api_url,
            default_region,
            request_timeout,
            accept_invalid_certs,
            log_level,
        })
    }

    /// Request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse an environment variable as bool with a default value.
    fn parse_env_bool(var_name: &str, default: bool) -> ConfigResult<bool> {
        match env::var(var_name) {
            Ok(val) => parse_bool(&val).ok_or_else(|| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be true or false, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }
}

/// Parse the usual spellings of a boolean flag.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            default_region: DEFAULT_REGION.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT_SECS,
            accept_invalid_certs: false,
            log_level: "error".to_string(),
        }
    }
}
