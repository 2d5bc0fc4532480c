//! Async wrapper around the blocking Dispatcher.
//!
//! Dispatch blocks for up to the HTTP timeout, so it runs on tokio's blocking pool
//! via `tokio::task::spawn_blocking`. An optional deadline bounds how long the caller
//! waits; the blocking request itself is not interrupted when it expires.

use super::{DispatchOutcome, Dispatcher, FailureReason};
use crate::integration::AsyncSmsTransport;
use crate::models::ContactRecord;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Async wrapper around a shared [`Dispatcher`].
#[derive(Clone)]
pub struct AsyncDispatcher {
    dispatcher: Arc<Dispatcher>,
    deadline: Option<Duration>,
}

impl AsyncDispatcher {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self::from_shared(Arc::new(dispatcher))
    }

    /// Wrap a dispatcher that is also used elsewhere.
    pub fn from_shared(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            dispatcher,
            deadline: None,
        }
    }

    /// Stop waiting after `deadline` and report a transport timeout.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }
}

#[async_trait]
impl AsyncSmsTransport for AsyncDispatcher {
    async fn send(&self, contact: &ContactRecord, content: &str) -> DispatchOutcome {
        let dispatcher = self.dispatcher.clone();
        let contact = contact.clone();
        let content = content.to_string();

        let task = tokio::task::spawn_blocking(move || dispatcher.dispatch(&contact, &content));

        let joined = match self.deadline {
            Some(deadline) => match tokio::time::timeout(deadline, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    tracing::error!(
                        deadline_ms = deadline.as_millis() as u64,
                        "Whatsapp MSG request failed: caller deadline exceeded"
                    );
                    return DispatchOutcome::failed(FailureReason::TransportError(format!(
                        "deadline of {}ms exceeded",
                        deadline.as_millis()
                    )));
                }
            },
            None => task.await,
        };

        joined.unwrap_or_else(|e| {
            DispatchOutcome::failed(FailureReason::TransportError(format!(
                "Task join error: {}",
                e
            )))
        })
    }
}
