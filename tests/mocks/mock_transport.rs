use std::sync::{Arc, Mutex};
use std::time::Duration;
use whatsapp_transport::error::{TransportError, TransportResult};
use whatsapp_transport::{HttpResponse, HttpTransport};

/// A request captured by [`MockHttpTransport`].
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub body: String,
}

#[allow(dead_code)]
impl RecordedRequest {
    /// The request body parsed as JSON.
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone)]
enum Script {
    Respond(u16, String),
    Fail(TransportError),
    Panic(String),
}

/// Mock HTTP transport for testing.
///
/// Replies with a scripted response or fault and records every request it receives.
#[allow(dead_code)]
#[derive(Clone)]
pub struct MockHttpTransport {
    script: Arc<Mutex<Script>>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

#[allow(dead_code)]
impl MockHttpTransport {
    /// Transport that completes every request with `status` and `body`.
    pub fn responding(status: u16, body: &str) -> Self {
        Self::with_script(Script::Respond(status, body.to_string()))
    }

    /// Transport that fails every request with `error`.
    pub fn failing(error: TransportError) -> Self {
        Self::with_script(Script::Fail(error))
    }

    /// Transport that panics inside the send path.
    pub fn panicking(message: &str) -> Self {
        Self::with_script(Script::Panic(message.to_string()))
    }

    fn with_script(script: Script) -> Self {
        Self {
            script: Arc::new(Mutex::new(script)),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Block for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of requests received.
    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// All requests received, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl HttpTransport for MockHttpTransport {
    fn post_json(&self, url: &str, body: &str) -> TransportResult<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            body: body.to_string(),
        });

        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let script = self.script.lock().unwrap().clone();
        match script {
            Script::Respond(status, body) => Ok(HttpResponse { status, body }),
            Script::Fail(error) => Err(error),
            Script::Panic(message) => panic!("{}", message),
        }
    }
}
