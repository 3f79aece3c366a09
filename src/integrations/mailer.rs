//! Contact-notification e-mail via SMTP.

use std::fmt;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{IntegrationError, Mailer};
use crate::config::SmtpConfig;
use crate::domain::Contact;

/// Sends plain-text mail through a STARTTLS relay.
pub struct SmtpMailer {
    config: SmtpConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .field("from", &self.config.from_address)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Builds the relay transport once; connections are opened per send.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Smtp`] if the relay cannot be set up.
    pub fn new(config: SmtpConfig) -> Result<Self, IntegrationError> {
        let mut builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?.port(config.port);
        if let (Some(user), Some(pass)) = (&config.user, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            config,
        })
    }

    fn owner_notification(&self, contact: &Contact) -> Result<Message, IntegrationError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .reply_to(contact.email.parse()?)
            .to(self.config.notify_address.parse()?)
            .subject(format!("New contact request from {}", contact.name))
            .header(ContentType::TEXT_PLAIN)
            .body(owner_body(contact))
            .map_err(|e| IntegrationError::Build(e.to_string()))
    }

    fn acknowledgement(&self, contact: &Contact) -> Result<Message, IntegrationError> {
        Message::builder()
            .from(self.config.from_address.parse()?)
            .to(contact.email.parse()?)
            .subject("Thanks for getting in touch")
            .header(ContentType::TEXT_PLAIN)
            .body(acknowledgement_body(contact))
            .map_err(|e| IntegrationError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_contact_notification(&self, contact: &Contact) -> Result<(), IntegrationError> {
        self.transport.send(self.owner_notification(contact)?).await?;
        self.transport.send(self.acknowledgement(contact)?).await?;
        tracing::info!(contact_id = %contact.id, "contact notification e-mails sent");
        Ok(())
    }
}

/// Logs the notification instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_contact_notification(&self, contact: &Contact) -> Result<(), IntegrationError> {
        tracing::info!(
            contact_id = %contact.id,
            email = %contact.email,
            "SMTP disabled, skipping contact notification"
        );
        Ok(())
    }
}

fn owner_body(contact: &Contact) -> String {
    format!(
        "Name: {}\nEmail: {}\nPhone: {}\nService: {}\nReceived: {}\n\n{}",
        contact.name,
        contact.email,
        contact.phone.as_deref().unwrap_or("-"),
        contact.service_interest.as_deref().unwrap_or("-"),
        contact.created_at.to_rfc3339(),
        contact.message,
    )
}

fn acknowledgement_body(contact: &Contact) -> String {
    format!(
        "Hi {},\n\nThank you for contacting us. We received your message and will \
         get back to you within two business days.\n\nYour message:\n{}\n",
        contact.name, contact.message,
    )
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::ContactStatus;

    fn contact() -> Contact {
        Contact {
            id: Uuid::new_v4(),
            name: "Aino".to_string(),
            email: "aino@example.fi".to_string(),
            phone: None,
            service_interest: Some("outdoor-saunas".to_string()),
            message: "Barrel sauna for the cabin?".to_string(),
            status: ContactStatus::New,
            created_at: Utc::now(),
        }
    }

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.fi".to_string(),
            port: 587,
            user: None,
            password: None,
            from_address: "site@example.fi".to_string(),
            notify_address: "owner@example.fi".to_string(),
        }
    }

    #[test]
    fn owner_body_lists_fields() {
        let body = owner_body(&contact());
        assert!(body.contains("Phone: -"));
        assert!(body.contains("Service: outdoor-saunas"));
        assert!(body.ends_with("Barrel sauna for the cabin?"));
    }

    #[tokio::test]
    async fn messages_build_for_valid_addresses() {
        let Ok(mailer) = SmtpMailer::new(config()) else {
            return;
        };
        assert!(mailer.owner_notification(&contact()).is_ok());
        assert!(mailer.acknowledgement(&contact()).is_ok());

        let mut bad = contact();
        bad.email = "not-an-address".to_string();
        assert!(matches!(
            mailer.acknowledgement(&bad),
            Err(IntegrationError::Address(_))
        ));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        assert!(LogMailer.send_contact_notification(&contact()).await.is_ok());
    }
}
