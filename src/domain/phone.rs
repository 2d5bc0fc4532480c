//! Phone number normalization to E.164.

use crate::error::NormalizeError;
use phonenumber::{country, Mode};
use serde::{Serialize, Serializer};
use std::fmt;

/// A phone number in E.164 form: `+`, country code, subscriber number, nothing else.
///
/// Only [`normalize`] produces values of this type, so holding one means the number
/// was parsed and validated for its country.
///
/// # Example
///
/// ```
/// use whatsapp_transport::domain::normalize;
///
/// let number = normalize("098765 43210", "IN").unwrap();
/// assert_eq!(number.as_str(), "+919876543210");
/// assert_eq!(number.without_plus(), "919876543210");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedNumber(String);

impl NormalizedNumber {
    /// Get the number as a string slice, including the leading `+`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The digits after the leading `+`.
    pub fn without_plus(&self) -> &str {
        self.0.strip_prefix('+').unwrap_or(&self.0)
    }
}

impl Serialize for NormalizedNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl fmt::Display for NormalizedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parse `raw` under international dialing rules and format it as E.164.
///
/// `default_region` is the ISO-3166 alpha-2 code applied when `raw` carries no
/// country code of its own. Numbers that parse but are not valid for their
/// country (too short, unassigned ranges) are rejected as well.
///
/// # Errors
///
/// - `NormalizeError::Empty` for blank input
/// - `NormalizeError::Region` for an unknown `default_region`
/// - `NormalizeError::Parse` / `NormalizeError::Invalid` with the parser's diagnostic
pub fn normalize(raw: &str, default_region: &str) -> Result<NormalizedNumber, NormalizeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let region = default_region
        .trim()
        .to_ascii_uppercase()
        .parse::<country::Id>()
        .map_err(|_| NormalizeError::Region(default_region.to_string()))?;

    let parsed = phonenumber::parse(Some(region), raw)
        .map_err(|e| NormalizeError::Parse(e.to_string()))?;

    if !phonenumber::is_valid(&parsed) {
        return Err(NormalizeError::Invalid(format!(
            "{} is not a valid number for region {}",
            mask_phone_number(raw),
            default_region
        )));
    }

    Ok(NormalizedNumber(
        parsed.format().mode(Mode::E164).to_string(),
    ))
}

/// Mask all but the leading `+`/country prefix and the last four digits, for logs.
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }

    let prefix = if chars[0] == '+' { 3 } else { 0 };
    let visible_prefix = prefix.min(chars.len() - 4);
    let masked_count = chars.len() - 4 - visible_prefix;

    let mut masked = String::with_capacity(chars.len());
    masked.extend(&chars[..visible_prefix]);
    masked.push_str(&"*".repeat(masked_count));
    masked.extend(&chars[chars.len() - 4..]);
    masked
}
