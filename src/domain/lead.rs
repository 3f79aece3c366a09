//! Lead records: contact-form submissions and newsletter subscribers.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::SiteError;

/// Longest accepted contact message, in characters.
pub const MAX_MESSAGE_CHARS: usize = 5_000;

/// Follow-up state of a contact submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    /// Not yet handled.
    New,
    /// Someone reached out to the lead.
    Contacted,
    /// Lead is done (won, lost, or spam).
    Closed,
}

impl ContactStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Closed => "closed",
        }
    }
}

impl FromStr for ContactStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "contacted" => Ok(Self::Contacted),
            "closed" => Ok(Self::Closed),
            other => Err(SiteError::InvalidRequest(format!(
                "unknown contact status: {other}"
            ))),
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `contacts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Contact {
    /// Row identifier.
    pub id: Uuid,
    /// Submitter's name.
    pub name: String,
    /// Submitter's e-mail address.
    pub email: String,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Service the lead asked about (e.g. `"custom-sauna-builds"`).
    pub service_interest: Option<String>,
    /// Free-form message.
    pub message: String,
    /// Follow-up state.
    pub status: ContactStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// Contact-form payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewContact {
    /// Submitter's name.
    pub name: String,
    /// Submitter's e-mail address.
    pub email: String,
    /// Optional phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Service the lead asked about.
    #[serde(default)]
    pub service_interest: Option<String>,
    /// Free-form message.
    pub message: String,
}

impl NewContact {
    /// Checks required fields and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] naming the first offending field.
    pub fn validate(self) -> Result<Self, SiteError> {
        let name = required("name", &self.name)?;
        let email = normalize_email(&self.email)?;
        let message = required("message", &self.message)?;
        if message.chars().count() > MAX_MESSAGE_CHARS {
            return Err(SiteError::Validation(format!(
                "message must be at most {MAX_MESSAGE_CHARS} characters"
            )));
        }
        Ok(Self {
            name,
            email,
            phone: optional(self.phone),
            service_interest: optional(self.service_interest),
            message,
        })
    }
}

/// A row from the `newsletter_subscribers` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Subscriber {
    /// Row identifier.
    pub id: Uuid,
    /// Lower-cased, unique e-mail address.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
    /// Whether the subscriber currently receives mail.
    pub is_active: bool,
    /// Where the sign-up came from (e.g. `"footer"`).
    pub source: Option<String>,
    /// First (or latest re-) subscription time.
    pub subscribed_at: DateTime<Utc>,
    /// Set when the subscriber opted out.
    pub unsubscribed_at: Option<DateTime<Utc>>,
}

impl Subscriber {
    /// `"active"` or `"unsubscribed"`, as shown in exports.
    #[must_use]
    pub const fn status_label(&self) -> &'static str {
        if self.is_active { "active" } else { "unsubscribed" }
    }
}

/// Newsletter sign-up payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewSubscriber {
    /// E-mail address to subscribe.
    pub email: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Where the sign-up form lives.
    #[serde(default)]
    pub source: Option<String>,
}

impl NewSubscriber {
    /// Normalizes the e-mail and trims optional fields.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for an invalid address.
    pub fn validate(self) -> Result<Self, SiteError> {
        Ok(Self {
            email: normalize_email(&self.email)?,
            name: optional(self.name),
            source: optional(self.source),
        })
    }
}

/// Trims and lower-cases an address, rejecting anything that does not look
/// like `local@domain.tld`.
///
/// # Errors
///
/// Returns [`SiteError::Validation`] when the address is malformed.
pub fn normalize_email(raw: &str) -> Result<String, SiteError> {
    let email = raw.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(email)
    } else {
        Err(SiteError::Validation(format!(
            "email is not a valid address: {}",
            raw.trim()
        )))
    }
}

/// Returns the trimmed value or a validation error naming `field`.
pub(crate) fn required(field: &str, value: &str) -> Result<String, SiteError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SiteError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trims an optional field, mapping blank strings to `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str, message: &str) -> NewContact {
        NewContact {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            service_interest: Some(" outdoor-saunas ".to_string()),
            message: message.to_string(),
        }
    }

    #[test]
    fn valid_contact_is_trimmed() {
        let Ok(c) = contact(" Aino ", "Aino@Example.COM ", " Hi! ").validate() else {
            panic!("contact should validate");
        };
        assert_eq!(c.name, "Aino");
        assert_eq!(c.email, "aino@example.com");
        assert_eq!(c.message, "Hi!");
        assert_eq!(c.phone, None);
        assert_eq!(c.service_interest.as_deref(), Some("outdoor-saunas"));
    }

    #[test]
    fn blank_name_is_rejected() {
        let result = contact("   ", "a@b.fi", "hello").validate();
        assert!(matches!(result, Err(SiteError::Validation(msg)) if msg.contains("name")));
    }

    #[test]
    fn overlong_message_is_rejected() {
        let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
        assert!(contact("A", "a@b.fi", &long).validate().is_err());
    }

    #[test]
    fn email_shapes() {
        assert!(normalize_email("someone@sauna.fi").is_ok());
        assert!(normalize_email("someone@localhost").is_err());
        assert!(normalize_email("@sauna.fi").is_err());
        assert!(normalize_email("a@@sauna.fi").is_err());
        assert!(normalize_email("a b@sauna.fi").is_err());
        assert!(normalize_email("a@sauna.").is_err());
    }

    #[test]
    fn contact_status_parses_wire_names() {
        for status in [ContactStatus::New, ContactStatus::Contacted, ContactStatus::Closed] {
            assert_eq!(status.as_str().parse::<ContactStatus>().ok(), Some(status));
        }
        assert!("archived".parse::<ContactStatus>().is_err());
    }
}
