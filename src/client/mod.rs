//! HTTP client for the WhatsApp provider's `send_message` endpoint.
//!
//! The wire format is a single JSON POST with the key in the body. Whatever the
//! provider answers is handed back verbatim: a completed exchange is a success no
//! matter the status code, and only network-level faults become errors.

use crate::config::Config;
use crate::connection::ProviderCredential;
use crate::error::{TransportError, TransportResult};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// A completed HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Blocking HTTP capability used by [`ProviderClient`].
///
/// Implementations return `Ok` for every completed exchange, including 4xx/5xx.
pub trait HttpTransport: Send + Sync {
    /// POST `body` as `application/json` to `url`.
    fn post_json(&self, url: &str, body: &str) -> TransportResult<HttpResponse>;
}

/// [`HttpTransport`] backed by a shared `ureq` agent.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Arc<ureq::Agent>,
}

impl UreqTransport {
    /// Build an agent from configuration.
    ///
    /// Connection establishment shares the overall request timeout. Certificate and
    /// host name verification are only disabled when `accept_invalid_certs` is set.
    pub fn new(config: &Config) -> TransportResult<Self> {
        let mut builder = ureq::AgentBuilder::new()
            .timeout(config.timeout())
            .timeout_connect(config.timeout());

        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate and host name verification disabled for provider endpoint");
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()
                .map_err(|e| TransportError::Tls(e.to_string()))?;
            builder = builder.tls_connector(Arc::new(connector));
        }

        Ok(Self {
            agent: Arc::new(builder.build()),
        })
    }

    /// Create a transport with a custom timeout (useful for testing).
    #[doc(hidden)]
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(timeout)
            .build();

        Self {
            agent: Arc::new(agent),
        }
    }

    /// Map a ureq error to a completed response or a TransportError.
    ///
    /// ureq reports every failed connect and every failed TLS handshake as
    /// `ConnectionFailed`, so the underlying `io::Error` decides the variant.
    fn map_error(error: ureq::Error) -> TransportResult<HttpResponse> {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response
                    .into_string()
                    .map_err(|e| TransportError::Io(e.to_string()))?;
                Ok(HttpResponse { status, body })
            }
            ureq::Error::Transport(transport) => Err(map_transport(&transport)),
        }
    }
}

fn map_transport(transport: &ureq::Transport) -> TransportError {
    let detail = transport.to_string();
    let io_kind = io_error_kind(transport);

    if matches!(io_kind, Some(io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)) {
        return TransportError::Timeout;
    }

    match transport.kind() {
        ureq::ErrorKind::Dns => TransportError::Dns(detail),
        ureq::ErrorKind::ConnectionFailed => match io_kind {
            Some(io::ErrorKind::ConnectionRefused) => TransportError::ConnectionRefused,
            // rustls reports a failed handshake as InvalidData
            Some(io::ErrorKind::InvalidData) => TransportError::Tls(detail),
            _ if mentions_tls(&detail) => TransportError::Tls(detail),
            _ => TransportError::Other(detail),
        },
        ureq::ErrorKind::Io => TransportError::Io(detail),
        _ if mentions_tls(&detail) => TransportError::Tls(detail),
        _ => TransportError::Other(detail),
    }
}

/// Kind of the `io::Error` ureq wrapped, if the source is one.
fn io_error_kind(transport: &ureq::Transport) -> Option<io::ErrorKind> {
    StdError::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map(io::Error::kind)
}

fn mentions_tls(detail: &str) -> bool {
    let detail = detail.to_ascii_lowercase();
    ["tls", "ssl", "certificate", "handshake"]
        .iter()
        .any(|needle| detail.contains(needle))
}

impl HttpTransport for UreqTransport {
    fn post_json(&self, url: &str, body: &str) -> TransportResult<HttpResponse> {
        let result = self
            .agent
            .post(url)
            .set("Content-Type", "application/json")
            .send_string(body);

        match result {
            Ok(response) => {
                let status = response.status();
                let body = response
                    .into_string()
                    .map_err(|e| TransportError::Io(e.to_string()))?;
                Ok(HttpResponse { status, body })
            }
            Err(e) => Self::map_error(e),
        }
    }
}

/// JSON body of a `send_message` call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessagePayload {
    /// E.164 number including the leading `+`
    pub phone_no: String,

    /// Provider API key
    pub key: String,

    /// Rendered message text
    pub message: String,

    /// Ask the provider not to snapshot links in the message; always `true`
    pub skip_link: bool,
}

/// What the provider answered, forwarded without interpretation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProviderResponse {
    /// HTTP status code; not used to decide success
    pub status: u16,

    /// Raw response body
    pub body: String,
}

/// Builds and sends provider requests.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    /// Full `send_message` endpoint URL
    endpoint: String,
}

impl ProviderClient {
    /// Create a ProviderClient from configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.api_url.clone(),
        }
    }

    /// Create a ProviderClient with a custom endpoint (useful for testing).
    #[doc(hidden)]
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the request payload. `number` is the E.164 number without its `+`.
    pub fn build_payload(
        &self,
        number: &str,
        content: &str,
        credential: &ProviderCredential,
    ) -> SendMessagePayload {
        SendMessagePayload {
            phone_no: format!("+{}", number),
            key: credential.api_key().to_string(),
            message: content.to_string(),
            skip_link: true,
        }
    }

    /// Send one message. Exactly one POST is made; nothing is retried.
    ///
    /// # Errors
    ///
    /// Returns a `TransportError` only for network-level faults.
    pub fn send(
        &self,
        number: &str,
        content: &str,
        credential: &ProviderCredential,
        transport: &dyn HttpTransport,
    ) -> TransportResult<ProviderResponse> {
        let payload = self.build_payload(number, content, credential);
        let body =
            serde_json::to_string(&payload).map_err(|e| TransportError::Encode(e.to_string()))?;

        tracing::debug!("POST {}", self.endpoint);
        let response = transport.post_json(&self.endpoint, &body)?;
        tracing::debug!(
            "POST {} - completed (status: {})",
            self.endpoint,
            response.status
        );

        Ok(ProviderResponse {
            status: response.status,
            body: response.body,
        })
    }
}
