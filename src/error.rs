//! Error types for the WhatsApp transport.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! None of these escape [`crate::dispatch::Dispatcher::dispatch`]; they are folded into a
//! [`crate::dispatch::DispatchOutcome`] at that boundary.

use thiserror::Error;

/// Errors that can occur while normalizing a phone number.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    /// Empty input; callers must reject this before normalizing
    #[error("Phone number is empty")]
    Empty,

    /// The default region is not a known ISO-3166 alpha-2 code
    #[error("Unknown default region: {0}")]
    Region(String),

    /// The parser rejected the input
    #[error("Invalid number format: {0}")]
    Parse(String),

    /// The input parsed but is not a valid number for its country
    #[error("Invalid number: {0}")]
    Invalid(String),
}

/// Errors that can occur while talking to the provider endpoint.
///
/// Only network-level faults live here. A completed HTTP exchange is never an
/// error, whatever its status code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The remote end refused or dropped the connection attempt
    #[error("connection refused")]
    ConnectionRefused,

    /// Request did not complete within the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Host name could not be resolved
    #[error("dns lookup failed: {0}")]
    Dns(String),

    /// TLS setup or handshake failed
    #[error("tls failure: {0}")]
    Tls(String),

    /// I/O failure while sending the request or reading the response
    #[error("i/o error: {0}")]
    Io(String),

    /// Payload could not be encoded
    #[error("payload encoding failed: {0}")]
    Encode(String),

    /// Anything else reported by the HTTP client
    #[error("{0}")]
    Other(String),
}

/// Errors that can occur while resolving the provider connection.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    /// Integration missing, disabled, or without an API key
    #[error("Whatsapp MSG is not configured properly.")]
    NotConfigured,
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with TransportError
pub type TransportResult<T> = Result<T, TransportError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
