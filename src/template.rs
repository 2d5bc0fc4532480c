//! Contact placeholder substitution for message bodies.
//!
//! Templates carry `{contact_<field>}` tokens. Substitution is a single left-to-right
//! pass, so a contact value that itself looks like a token is never expanded again.
//! Tokens outside [`CONTACT_TOKENS`] are left exactly as written.

use crate::models::contact::{field, ContactRecord};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::borrow::Cow;

type FieldAccessor = for<'a> fn(&'a ContactRecord) -> Cow<'a, str>;

/// Supported tokens and the contact field each one resolves to.
///
/// `{contact_lastname}` resolves to the display name, not the surname. Existing
/// templates depend on that, so it is kept.
pub const CONTACT_TOKENS: &[(&str, FieldAccessor)] = &[
    ("{contact_title}", |c| Cow::Borrowed(field(&c.title))),
    ("{contact_firstname}", |c| Cow::Borrowed(field(&c.first_name))),
    ("{contact_lastname}", |c| c.display_name()),
    ("{contact_company}", |c| Cow::Borrowed(field(&c.company))),
    ("{contact_email}", |c| Cow::Borrowed(field(&c.email))),
    ("{contact_address1}", |c| Cow::Borrowed(field(&c.address1))),
    ("{contact_address2}", |c| Cow::Borrowed(field(&c.address2))),
    ("{contact_city}", |c| Cow::Borrowed(field(&c.city))),
    ("{contact_state}", |c| Cow::Borrowed(field(&c.state))),
    ("{contact_country}", |c| Cow::Borrowed(field(&c.country))),
    ("{contact_zipcode}", |c| Cow::Borrowed(field(&c.zipcode))),
    ("{contact_location}", |c| Cow::Borrowed(field(&c.location))),
    ("{contact_phone}", |c| Cow::Borrowed(c.phone_number())),
];

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{contact_[A-Za-z0-9_]+\}").expect("Failed to compile contact token regex")
});

/// Substitute every known contact token in `template` with the contact's value.
///
/// Missing fields substitute to "". The result is not validated; callers decide
/// what an empty body means.
///
/// # Example
///
/// ```
/// use whatsapp_transport::{template::render, ContactRecord};
///
/// let contact = ContactRecord {
///     first_name: Some("Asha".to_string()),
///     ..Default::default()
/// };
/// assert_eq!(render("Hi {contact_firstname} {unknown}", &contact), "Hi Asha {unknown}");
/// ```
pub fn render(template: &str, contact: &ContactRecord) -> String {
    TOKEN_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            let token = &caps[0];
            CONTACT_TOKENS
                .iter()
                .find(|(name, _)| *name == token)
                .map(|(_, accessor)| accessor(contact).into_owned())
                .unwrap_or_else(|| token.to_string())
        })
        .into_owned()
}

/// Names of the supported tokens, in table order.
pub fn supported_tokens() -> impl Iterator<Item = &'static str> {
    CONTACT_TOKENS.iter().map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_contact() -> ContactRecord {
        ContactRecord {
            phone_number: Some("98765 43210".to_string()),
            title: Some("Dr".to_string()),
            first_name: Some("Asha".to_string()),
            last_name: Some("Rao".to_string()),
            display_name: Some("Asha K. Rao".to_string()),
            company: Some("Acme".to_string()),
            email: Some("asha@example.com".to_string()),
            address1: Some("12 MG Road".to_string()),
            address2: Some("Flat 4".to_string()),
            city: Some("Pune".to_string()),
            state: Some("MH".to_string()),
            country: Some("India".to_string()),
            zipcode: Some("411001".to_string()),
            location: Some("Pune, MH".to_string()),
        }
    }

    #[test]
    fn test_render_all_tokens() {
        let template = supported_tokens().collect::<Vec<_>>().join("|");
        let rendered = render(&template, &full_contact());
        assert_eq!(
            rendered,
            "Dr|Asha|Asha K. Rao|Acme|asha@example.com|12 MG Road|Flat 4|Pune|MH|India|411001|Pune, MH|98765 43210"
        );
    }

    #[test]
    fn test_lastname_token_uses_display_name() {
        let rendered = render("Dear {contact_lastname}", &full_contact());
        assert_eq!(rendered, "Dear Asha K. Rao");
    }

    #[test]
    fn test_unknown_tokens_untouched() {
        let rendered = render("{unknown_token} {contact_nickname} {contact_firstname}", &full_contact());
        assert_eq!(rendered, "{unknown_token} {contact_nickname} Asha");
    }

    #[test]
    fn test_missing_fields_render_empty() {
        let contact = ContactRecord::with_phone("9876543210");
        assert_eq!(render("[{contact_company}]", &contact), "[]");
        assert_eq!(render("{contact_title}{contact_city}", &contact), "");
    }

    #[test]
    fn test_values_are_not_reexpanded() {
        let contact = ContactRecord {
            first_name: Some("{contact_email}".to_string()),
            email: Some("asha@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(render("{contact_firstname}", &contact), "{contact_email}");
    }

    #[test]
    fn test_repeated_tokens() {
        let rendered = render("{contact_firstname}/{contact_firstname}", &full_contact());
        assert_eq!(rendered, "Asha/Asha");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(render("No placeholders here", &ContactRecord::default()), "No placeholders here");
        assert_eq!(render("", &ContactRecord::default()), "");
    }
}
