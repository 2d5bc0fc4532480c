//! Host-facing capability traits and the WhatsApp integration descriptor.
//!
//! A host registers two things: a descriptor telling it how to present and store the
//! integration's credentials, and a transport it can hand contacts and message bodies
//! to. Neither requires inheriting from host types.

use crate::dispatch::DispatchOutcome;
use crate::models::ContactRecord;
use async_trait::async_trait;
use serde::Serialize;

/// Name the integration is registered and looked up under.
pub const INTEGRATION_NAME: &str = "Whatsapp";

/// Alias the transport is registered under.
pub const TRANSPORT_ALIAS: &str = "whatsapp";

/// Form behavior for the integration's settings page.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct FormSettings {
    pub requires_callback: bool,
    pub requires_authorization: bool,
}

/// How a host should present and store an integration.
pub trait IntegrationDescriptor: Send + Sync {
    /// Registration name, also used for credential lookup.
    fn name(&self) -> &str;

    /// Alias the host registers the message transport under.
    fn transport_alias(&self) -> &str;

    /// Icon path relative to the host's asset root.
    fn icon(&self) -> &str;

    /// Authentication scheme; "none" when the key is simply stored.
    fn auth_type(&self) -> &str;

    /// Credential fields the settings form must collect, as (field, label key).
    fn required_key_fields(&self) -> Vec<(&'static str, &'static str)>;

    /// Fields that must be stored encrypted and never echoed back.
    fn secret_keys(&self) -> Vec<&'static str> {
        Vec::new()
    }

    fn form_settings(&self) -> FormSettings {
        FormSettings {
            requires_callback: false,
            requires_authorization: false,
        }
    }
}

/// Blocking message transport.
pub trait SmsTransport: Send + Sync {
    /// Send `content` (a template) to `contact`. Never panics or errors; every
    /// attempt ends in exactly one outcome.
    fn send(&self, contact: &ContactRecord, content: &str) -> DispatchOutcome;
}

/// Async message transport, for callers running inside a runtime.
#[async_trait]
pub trait AsyncSmsTransport: Send + Sync {
    async fn send(&self, contact: &ContactRecord, content: &str) -> DispatchOutcome;
}

/// Descriptor for the WhatsApp provider integration.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatsappIntegration;

impl IntegrationDescriptor for WhatsappIntegration {
    fn name(&self) -> &str {
        INTEGRATION_NAME
    }

    fn transport_alias(&self) -> &str {
        TRANSPORT_ALIAS
    }

    fn icon(&self) -> &str {
        "plugins/MauticWhatsappBundle/Assets/img/whatsapp.png"
    }

    fn auth_type(&self) -> &str {
        "none"
    }

    fn required_key_fields(&self) -> Vec<(&'static str, &'static str)> {
        vec![(
            crate::connection::API_KEY_FIELD,
            "mautic.plugin.whatsapp.api_key",
        )]
    }
}
