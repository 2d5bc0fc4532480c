//! WhatsApp Transport - send templated WhatsApp messages to contacts through an HTTP provider.
//!
//! This library turns a contact record and a message template into one provider
//! request: it normalizes the contact's phone number, resolves the provider
//! credential from a host-supplied lookup, substitutes contact placeholders, and
//! POSTs the result. Every attempt ends in a typed [`DispatchOutcome`].
//!
//! # Architecture
//!
//! - **domain**: Phone number normalization to E.164
//! - **models**: The contact record supplied by the caller
//! - **template**: `{contact_<field>}` placeholder substitution
//! - **connection**: Credential lookup and the positive-only credential cache
//! - **client**: Provider payload and the blocking HTTP transport
//! - **dispatch**: The orchestrator and its async wrapper
//! - **integration**: Host-facing descriptor and transport traits
//! - **config**: Configuration management from environment variables
//! - **error**: Custom error types for precise error handling
//! - **metrics**: Outcome counters and request timing

pub mod client;
pub mod config;
pub mod connection;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod integration;
pub mod metrics;
pub mod models;
pub mod template;

pub use client::{HttpResponse, HttpTransport, ProviderClient, ProviderResponse, UreqTransport};
pub use config::Config;
pub use connection::{
    CredentialCache, EnvProviderLookup, IntegrationSettings, ProviderCredential, ProviderLookup,
    StaticProviderLookup,
};
pub use dispatch::{AsyncDispatcher, DispatchOutcome, Dispatcher, FailureReason};
pub use domain::{normalize, NormalizedNumber};
pub use error::{ConfigError, ConnectionError, NormalizeError, TransportError};
pub use integration::{
    AsyncSmsTransport, IntegrationDescriptor, SmsTransport, WhatsappIntegration, INTEGRATION_NAME,
};
pub use metrics::{HttpTimer, Metrics, MetricsSummary};
pub use models::ContactRecord;
