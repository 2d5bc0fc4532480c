//! Outbound message dispatch.
//!
//! [`Dispatcher::dispatch`] is the public entry point. It runs, in order:
//!
//! 1. reject contacts without a phone number
//! 2. normalize the number to E.164
//! 3. resolve the provider credential
//! 4. render the template against the contact
//! 5. send one request to the provider
//!
//! The first failing step decides the outcome. Nothing escapes as an error or a
//! panic: every attempt yields exactly one [`DispatchOutcome`].

mod async_wrapper;
pub use async_wrapper::AsyncDispatcher;

use crate::client::{HttpTransport, ProviderClient, ProviderResponse, UreqTransport};
use crate::config::Config;
use crate::connection::{CredentialCache, ProviderLookup};
use crate::domain::{mask_phone_number, normalize};
use crate::error::TransportResult;
use crate::integration::SmsTransport;
use crate::metrics::{HttpTimer, Metrics};
use crate::models::ContactRecord;
use crate::template::render;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use thiserror::Error;

/// Why a dispatch attempt did not reach the provider, or failed on the way.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum FailureReason {
    #[error("Contact has no phone number.")]
    EmptyNumber,

    /// Carries the parser's diagnostic
    #[error("Invalid number format. {0}")]
    InvalidNumber(String),

    #[error("Whatsapp MSG is not configured properly.")]
    NotConfigured,

    #[error("Message content is Empty.")]
    EmptyContent,

    /// Network-level fault, or an unexpected fault inside the send path
    #[error("Whatsapp MSG request failed: {0}")]
    TransportError(String),
}

impl FailureReason {
    /// Stable machine-readable tag.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::EmptyNumber => "empty_number",
            Self::InvalidNumber(_) => "invalid_number",
            Self::NotConfigured => "not_configured",
            Self::EmptyContent => "empty_content",
            Self::TransportError(_) => "transport_error",
        }
    }
}

/// Result of one dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    /// The provider answered; its response is forwarded as-is
    Sent { response: ProviderResponse },

    Failed { reason: FailureReason },
}

impl DispatchOutcome {
    pub fn failed(reason: FailureReason) -> Self {
        Self::Failed { reason }
    }

    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }

    /// The failure reason, if the attempt failed.
    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            Self::Sent { .. } => None,
            Self::Failed { reason } => Some(reason),
        }
    }

    /// The provider response, if the attempt was sent.
    pub fn response(&self) -> Option<&ProviderResponse> {
        match self {
            Self::Sent { response } => Some(response),
            Self::Failed { .. } => None,
        }
    }
}

/// Sends templated WhatsApp messages to contacts.
///
/// A dispatcher owns its credential cache: once a credential resolves it is reused
/// for the dispatcher's lifetime, while a missing or disabled integration is
/// re-checked on every attempt. Safe to share across threads.
pub struct Dispatcher {
    lookup: Arc<dyn ProviderLookup>,
    transport: Arc<dyn HttpTransport>,
    client: ProviderClient,
    default_region: String,
    credentials: CredentialCache,
    metrics: Metrics,
}

impl Dispatcher {
    /// Create a dispatcher with an explicit HTTP transport.
    pub fn new(
        config: &Config,
        lookup: Arc<dyn ProviderLookup>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            lookup,
            transport,
            client: ProviderClient::new(config),
            default_region: config.default_region.clone(),
            credentials: CredentialCache::new(),
            metrics: Metrics::new(),
        }
    }

    /// Create a dispatcher backed by a `ureq` transport built from `config`.
    pub fn from_config(config: &Config, lookup: Arc<dyn ProviderLookup>) -> TransportResult<Self> {
        let transport = Arc::new(UreqTransport::new(config)?) as Arc<dyn HttpTransport>;
        Ok(Self::new(config, lookup, transport))
    }

    /// Get a reference to the metrics collector.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Forget the cached credential; call when the host reports a credential change.
    pub fn invalidate_credentials(&self) {
        self.credentials.invalidate();
    }

    /// Send `template`, rendered for `contact`, to the contact's phone number.
    pub fn dispatch(&self, contact: &ContactRecord, template: &str) -> DispatchOutcome {
        self.metrics.record_attempt();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(contact, template)))
            .unwrap_or_else(|payload| {
                let detail = panic_detail(payload.as_ref());
                tracing::error!(error = %detail, "Whatsapp MSG request failed.");
                DispatchOutcome::failed(FailureReason::TransportError(detail))
            });

        self.metrics.record_outcome(&outcome);
        outcome
    }

    fn run(&self, contact: &ContactRecord, template: &str) -> DispatchOutcome {
        if !contact.has_phone_number() {
            tracing::error!(
                exception = %FailureReason::EmptyNumber,
                "Whatsapp MSG request failed."
            );
            return DispatchOutcome::failed(FailureReason::EmptyNumber);
        }

        let raw = contact.phone_number();
        let number = match normalize(raw, &self.default_region) {
            Ok(number) => number,
            Err(e) => {
                tracing::info!(
                    phone = %mask_phone_number(raw),
                    exception = %e,
                    "Invalid number format."
                );
                return DispatchOutcome::failed(FailureReason::InvalidNumber(e.to_string()));
            }
        };
        tracing::info!(phone = %mask_phone_number(number.as_str()), "Phone number normalized");

        let credential = match self.credentials.get_or_resolve(self.lookup.as_ref()) {
            Ok(credential) => credential,
            Err(e) => {
                tracing::error!(exception = %e, "Whatsapp MSG request failed.");
                return DispatchOutcome::failed(FailureReason::NotConfigured);
            }
        };
        tracing::info!("Whatsapp provider connection resolved");

        let content = render(template, contact);
        if content.is_empty() {
            tracing::error!(
                exception = %FailureReason::EmptyContent,
                "Whatsapp MSG request failed."
            );
            return DispatchOutcome::failed(FailureReason::EmptyContent);
        }
        tracing::info!(length = content.chars().count(), "Message content rendered");

        let timer = HttpTimer::new(self.metrics.clone());
        match self.client.send(
            number.without_plus(),
            &content,
            &credential,
            self.transport.as_ref(),
        ) {
            Ok(response) => {
                timer.complete();
                tracing::info!(
                    status = response.status,
                    response = %response.body,
                    "Whatsapp MSG request succeeded."
                );
                DispatchOutcome::Sent { response }
            }
            Err(e) => {
                timer.complete_with_error();
                tracing::error!(
                    url = %self.client.endpoint(),
                    exception = %e,
                    "Whatsapp MSG request failed."
                );
                DispatchOutcome::failed(FailureReason::TransportError(e.to_string()))
            }
        }
    }
}

impl SmsTransport for Dispatcher {
    fn send(&self, contact: &ContactRecord, content: &str) -> DispatchOutcome {
        self.dispatch(contact, content)
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("unexpected fault: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("unexpected fault: {}", message)
    } else {
        "unexpected fault".to_string()
    }
}
