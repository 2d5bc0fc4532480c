//! Provider connection resolution.
//!
//! Credentials live in a host-owned integration store. This module asks that store
//! for the WhatsApp integration on every attempt and turns the answer into a
//! [`ProviderCredential`] or [`ConnectionError::NotConfigured`].

use crate::config::parse_bool;
use crate::error::ConnectionError;
use crate::integration::INTEGRATION_NAME;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::sync::RwLock;

/// Key under which the integration stores the provider API key.
pub const API_KEY_FIELD: &str = "api_key";

/// Integration settings as returned by the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrationSettings {
    /// Whether the integration is published/enabled
    pub is_enabled: bool,

    /// Decrypted credential fields, keyed by field name
    pub decrypted_keys: HashMap<String, String>,
}

impl IntegrationSettings {
    /// Enabled settings holding just an API key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        let mut decrypted_keys = HashMap::new();
        decrypted_keys.insert(API_KEY_FIELD.to_string(), api_key.into());
        Self {
            is_enabled: true,
            decrypted_keys,
        }
    }

    /// Same settings with a different enabled flag.
    pub fn enabled(mut self, is_enabled: bool) -> Self {
        self.is_enabled = is_enabled;
        self
    }
}

/// Credential lookup supplied by the host.
///
/// Implementations must be safe to call from several dispatches at once.
pub trait ProviderLookup: Send + Sync {
    /// Look up an integration by name; `None` when it does not exist.
    fn get_integration(&self, name: &str) -> Option<IntegrationSettings>;
}

/// A usable provider credential.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderCredential {
    api_key: String,
    is_enabled: bool,
}

impl ProviderCredential {
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// A credential is only usable while enabled and non-empty.
    pub fn is_valid(&self) -> bool {
        self.is_enabled && !self.api_key.trim().is_empty()
    }
}

// Never print the key
impl fmt::Debug for ProviderCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredential")
            .field("api_key", &"<redacted>")
            .field("is_enabled", &self.is_enabled)
            .finish()
    }
}

/// Resolve the WhatsApp integration into a credential.
pub fn resolve(lookup: &dyn ProviderLookup) -> Result<ProviderCredential, ConnectionError> {
    resolve_named(lookup, INTEGRATION_NAME)
}

/// Resolve a named integration into a credential.
///
/// Missing integration, disabled integration, and missing or blank `api_key` all
/// yield `NotConfigured`.
pub fn resolve_named(
    lookup: &dyn ProviderLookup,
    name: &str,
) -> Result<ProviderCredential, ConnectionError> {
    let settings = lookup
        .get_integration(name)
        .ok_or(ConnectionError::NotConfigured)?;

    if !settings.is_enabled {
        tracing::debug!(integration = %name, "Integration is disabled");
        return Err(ConnectionError::NotConfigured);
    }

    let api_key = settings
        .decrypted_keys
        .get(API_KEY_FIELD)
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .ok_or(ConnectionError::NotConfigured)?;

    Ok(ProviderCredential {
        api_key: api_key.to_string(),
        is_enabled: true,
    })
}

/// Positive-only credential cache owned by one dispatcher.
///
/// A successful resolution is kept for the lifetime of the cache; failures are
/// never stored, so an integration configured later is picked up on the next
/// attempt. Only [`CredentialCache::invalidate`] moves it back to empty.
#[derive(Debug, Default)]
pub struct CredentialCache {
    cached: RwLock<Option<ProviderCredential>>,
}

impl CredentialCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached credential, resolving through `lookup` when empty.
    pub fn get_or_resolve(
        &self,
        lookup: &dyn ProviderLookup,
    ) -> Result<ProviderCredential, ConnectionError> {
        if let Some(credential) = self.cached() {
            return Ok(credential);
        }

        let credential = resolve(lookup)?;
        if let Ok(mut slot) = self.cached.write() {
            *slot = Some(credential.clone());
        }
        Ok(credential)
    }

    /// Currently cached credential, if any.
    pub fn cached(&self) -> Option<ProviderCredential> {
        self.cached.read().ok().and_then(|slot| slot.clone())
    }

    /// Drop the cached credential after the host reports a credential change.
    pub fn invalidate(&self) {
        if let Ok(mut slot) = self.cached.write() {
            *slot = None;
        }
    }
}

/// In-memory lookup holding a fixed set of integrations.
#[derive(Debug, Clone, Default)]
pub struct StaticProviderLookup {
    integrations: HashMap<String, IntegrationSettings>,
}

impl StaticProviderLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an integration.
    pub fn with_integration(mut self, name: impl Into<String>, settings: IntegrationSettings) -> Self {
        self.integrations.insert(name.into(), settings);
        self
    }
}

impl ProviderLookup for StaticProviderLookup {
    fn get_integration(&self, name: &str) -> Option<IntegrationSettings> {
        self.integrations.get(name).cloned()
    }
}

/// Lookup backed by environment variables, for running outside a host.
///
/// - `WHATSAPP_API_KEY`: the provider key
/// - `WHATSAPP_ENABLED`: enabled flag (default: true when a key is set)
///
/// Variables are read on every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvProviderLookup;

impl ProviderLookup for EnvProviderLookup {
    fn get_integration(&self, name: &str) -> Option<IntegrationSettings> {
        if name != INTEGRATION_NAME {
            return None;
        }

        let api_key = env::var("WHATSAPP_API_KEY").ok();
        let enabled = env::var("WHATSAPP_ENABLED").ok();
        if api_key.is_none() && enabled.is_none() {
            return None;
        }

        let mut decrypted_keys = HashMap::new();
        if let Some(key) = api_key {
            decrypted_keys.insert(API_KEY_FIELD.to_string(), key);
        }

        Some(IntegrationSettings {
            is_enabled: enabled.as_deref().and_then(parse_bool).unwrap_or(true),
            decrypted_keys,
        })
    }
}
