use std::sync::{Arc, Mutex};
use whatsapp_transport::{IntegrationSettings, ProviderLookup};

/// Mock credential lookup for testing.
///
/// Holds at most one integration, which can be swapped between calls, and counts
/// how often the dispatcher asked for it.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockProviderLookup {
    settings: Arc<Mutex<Option<IntegrationSettings>>>,
    requested_names: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl MockProviderLookup {
    /// Lookup with no integration configured.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lookup returning an enabled integration with `api_key`.
    pub fn configured(api_key: &str) -> Self {
        let lookup = Self::default();
        lookup.set(Some(IntegrationSettings::with_api_key(api_key)));
        lookup
    }

    /// Lookup returning a disabled integration that still has a key.
    pub fn disabled(api_key: &str) -> Self {
        let lookup = Self::default();
        lookup.set(Some(IntegrationSettings::with_api_key(api_key).enabled(false)));
        lookup
    }

    /// Replace the integration returned from now on.
    pub fn set(&self, settings: Option<IntegrationSettings>) {
        *self.settings.lock().unwrap() = settings;
    }

    /// Get the number of lookups performed.
    pub fn call_count(&self) -> usize {
        self.requested_names.lock().unwrap().len()
    }

    /// Names the dispatcher asked for, in order.
    pub fn requested_names(&self) -> Vec<String> {
        self.requested_names.lock().unwrap().clone()
    }
}

impl ProviderLookup for MockProviderLookup {
    fn get_integration(&self, name: &str) -> Option<IntegrationSettings> {
        self.requested_names.lock().unwrap().push(name.to_string());
        self.settings.lock().unwrap().clone()
    }
}
