//! Contact record the transport sends to.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Read-only view of a message recipient.
///
/// Every field is optional; a missing value renders as an empty string in
/// templates. The dispatcher never mutates a contact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ContactRecord {
    /// Phone number as entered, possibly without country code or malformed
    #[serde(alias = "phone", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    /// Salutation, e.g. "Dr"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// First name
    #[serde(alias = "firstname", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// Last name
    #[serde(alias = "lastname", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// Display name; computed from first/last name when absent
    #[serde(alias = "name", skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Company/organization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Address line 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address1: Option<String>,

    /// Address line 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address2: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,

    /// Free-form location string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl ContactRecord {
    /// Create a contact with just a phone number.
    pub fn with_phone(phone_number: impl Into<String>) -> Self {
        Self {
            phone_number: Some(phone_number.into()),
            ..Default::default()
        }
    }

    /// Raw phone number, or "" when absent.
    pub fn phone_number(&self) -> &str {
        field(&self.phone_number)
    }

    /// Whether the contact has a phone number worth normalizing.
    pub fn has_phone_number(&self) -> bool {
        !self.phone_number().trim().is_empty()
    }

    /// Display name, falling back to "first last" when no explicit one is set.
    pub fn display_name(&self) -> Cow<'_, str> {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.is_empty()) {
            return Cow::Borrowed(name);
        }

        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => Cow::Owned(format!("{} {}", first, last).trim().to_string()),
            (Some(first), None) => Cow::Borrowed(first),
            (None, Some(last)) => Cow::Borrowed(last),
            (None, None) => Cow::Borrowed(""),
        }
    }
}

/// Borrow an optional field, treating `None` as empty.
pub(crate) fn field(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}
