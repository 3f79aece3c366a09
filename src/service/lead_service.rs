//! Lead service: contact-form submissions and newsletter subscriptions.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::lead::normalize_email;
use crate::domain::{
    Contact, ContactStatus, EventBus, NewContact, NewSubscriber, SiteEvent, Subscriber,
};
use crate::error::SiteError;
use crate::integrations::Mailer;
use crate::persistence::{ContactFilter, SiteStore, SubscriberFilter};

/// Orchestrates lead capture.
///
/// Every successful write publishes a [`SiteEvent`]. The contact
/// notification e-mail is best effort: a failing mailer never fails the
/// submission.
#[derive(Debug, Clone)]
pub struct LeadService {
    store: Arc<dyn SiteStore>,
    mailer: Arc<dyn Mailer>,
    event_bus: EventBus,
}

impl LeadService {
    /// Creates a new `LeadService`.
    #[must_use]
    pub fn new(store: Arc<dyn SiteStore>, mailer: Arc<dyn Mailer>, event_bus: EventBus) -> Self {
        Self {
            store,
            mailer,
            event_bus,
        }
    }

    /// Validates and stores a contact submission, then notifies by e-mail.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for bad input or a storage error
    /// if the row cannot be written. Mailer failures are logged only.
    pub async fn submit_contact(&self, input: NewContact) -> Result<Contact, SiteError> {
        let input = input.validate()?;
        let contact = Contact {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            phone: input.phone,
            service_interest: input.service_interest,
            message: input.message,
            status: ContactStatus::New,
            created_at: Utc::now(),
        };
        self.store.insert_contact(&contact).await?;
        tracing::info!(contact_id = %contact.id, "contact submission stored");

        let _ = self.event_bus.publish(SiteEvent::ContactReceived {
            contact_id: contact.id,
            name: contact.name.clone(),
            service_interest: contact.service_interest.clone(),
            timestamp: contact.created_at,
        });

        if let Err(e) = self.mailer.send_contact_notification(&contact).await {
            tracing::warn!(contact_id = %contact.id, error = %e, "contact notification failed");
        }
        Ok(contact)
    }

    /// Lists contacts matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, SiteError> {
        self.store.list_contacts(filter).await
    }

    /// Sets a contact's follow-up state.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Contact, SiteError> {
        let contact = self.store.update_contact_status(id, status).await?;
        tracing::info!(contact_id = %id, status = %status, "contact status updated");
        Ok(contact)
    }

    /// Deletes a contact.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn delete_contact(&self, id: Uuid) -> Result<(), SiteError> {
        self.store.delete_contact(id).await?;
        tracing::info!(contact_id = %id, "contact deleted");
        Ok(())
    }

    /// Subscribes an address to the newsletter.
    ///
    /// A new address is inserted as active; a previously unsubscribed one
    /// is reactivated with a fresh `subscribed_at`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a bad address and
    /// [`SiteError::Conflict`] if the address is already active.
    pub async fn subscribe(&self, input: NewSubscriber) -> Result<Subscriber, SiteError> {
        let input = input.validate()?;
        let now = Utc::now();

        let subscriber = match self.store.find_subscriber_by_email(&input.email).await? {
            Some(existing) if existing.is_active => {
                return Err(SiteError::Conflict(format!(
                    "{} is already subscribed",
                    existing.email
                )));
            }
            Some(existing) => {
                let reactivated = Subscriber {
                    name: input.name.or(existing.name),
                    source: input.source.or(existing.source),
                    is_active: true,
                    subscribed_at: now,
                    unsubscribed_at: None,
                    ..existing
                };
                self.store.update_subscriber(&reactivated).await?;
                tracing::info!(subscriber_id = %reactivated.id, "subscriber reactivated");
                reactivated
            }
            None => {
                let created = Subscriber {
                    id: Uuid::new_v4(),
                    email: input.email,
                    name: input.name,
                    is_active: true,
                    source: input.source,
                    subscribed_at: now,
                    unsubscribed_at: None,
                };
                self.store.insert_subscriber(&created).await?;
                tracing::info!(subscriber_id = %created.id, "subscriber added");
                created
            }
        };

        let _ = self.event_bus.publish(SiteEvent::SubscriberAdded {
            subscriber_id: subscriber.id,
            email: subscriber.email.clone(),
            timestamp: now,
        });
        Ok(subscriber)
    }

    /// Marks an address as unsubscribed. Unsubscribing twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] if the address never subscribed.
    pub async fn unsubscribe(&self, email: &str) -> Result<Subscriber, SiteError> {
        let email = normalize_email(email)?;
        let existing = self
            .store
            .find_subscriber_by_email(&email)
            .await?
            .ok_or_else(|| SiteError::not_found("subscriber", &email))?;
        if !existing.is_active {
            return Ok(existing);
        }
        let updated = Subscriber {
            is_active: false,
            unsubscribed_at: Some(Utc::now()),
            ..existing
        };
        self.store.update_subscriber(&updated).await?;
        tracing::info!(subscriber_id = %updated.id, "subscriber unsubscribed");
        Ok(updated)
    }

    /// Lists subscribers matching `filter`, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list_subscribers(
        &self,
        filter: &SubscriberFilter,
    ) -> Result<Vec<Subscriber>, SiteError> {
        self.store.list_subscribers(filter).await
    }

    /// Deletes a subscriber.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn delete_subscriber(&self, id: Uuid) -> Result<(), SiteError> {
        self.store.delete_subscriber(id).await?;
        tracing::info!(subscriber_id = %id, "subscriber deleted");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::integrations::IntegrationError;
    use crate::persistence::MemoryStore;

    #[derive(Debug, Default)]
    struct CountingMailer {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Mailer for CountingMailer {
        async fn send_contact_notification(&self, _: &Contact) -> Result<(), IntegrationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(IntegrationError::Build("smtp down".to_string()));
            }
            Ok(())
        }
    }

    fn service(fail: bool) -> (LeadService, Arc<CountingMailer>, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(CountingMailer {
            calls: AtomicUsize::new(0),
            fail,
        });
        let svc = LeadService::new(
            Arc::clone(&store) as Arc<dyn SiteStore>,
            Arc::clone(&mailer) as Arc<dyn Mailer>,
            EventBus::new(16),
        );
        (svc, mailer, store)
    }

    fn contact_form() -> NewContact {
        NewContact {
            name: "Aino".to_string(),
            email: "aino@example.fi".to_string(),
            phone: None,
            service_interest: Some("outdoor-saunas".to_string()),
            message: "Quote for a barrel sauna?".to_string(),
        }
    }

    fn signup(email: &str) -> NewSubscriber {
        NewSubscriber {
            email: email.to_string(),
            name: None,
            source: Some("footer".to_string()),
        }
    }

    #[tokio::test]
    async fn contact_persists_once_and_mails_once() {
        let (svc, mailer, store) = service(false);
        let Ok(contact) = svc.submit_contact(contact_form()).await else {
            panic!("submission failed");
        };
        assert_eq!(contact.status, ContactStatus::New);
        let rows = store.list_contacts(&ContactFilter::default()).await;
        assert_eq!(rows.map(|r| r.len()).ok(), Some(1));
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn mailer_failure_does_not_fail_submission() {
        let (svc, mailer, store) = service(true);
        assert!(svc.submit_contact(contact_form()).await.is_ok());
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
        let rows = store.list_contacts(&ContactFilter::default()).await;
        assert_eq!(rows.map(|r| r.len()).ok(), Some(1));
    }

    #[tokio::test]
    async fn invalid_contact_is_not_stored_or_mailed() {
        let (svc, mailer, store) = service(false);
        let mut form = contact_form();
        form.email = "nope".to_string();
        assert!(matches!(
            svc.submit_contact(form).await,
            Err(SiteError::Validation(_))
        ));
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 0);
        let rows = store.list_contacts(&ContactFilter::default()).await;
        assert_eq!(rows.map(|r| r.len()).ok(), Some(0));
    }

    #[tokio::test]
    async fn contact_event_is_published() {
        let (svc, _, _) = service(false);
        let mut rx = svc.event_bus.subscribe();
        assert!(svc.submit_contact(contact_form()).await.is_ok());
        assert!(matches!(rx.recv().await, Ok(SiteEvent::ContactReceived { .. })));
    }

    #[tokio::test]
    async fn duplicate_active_subscription_conflicts() {
        let (svc, _, _) = service(false);
        assert!(svc.subscribe(signup("Sauna@Example.fi")).await.is_ok());
        assert!(matches!(
            svc.subscribe(signup("sauna@example.fi ")).await,
            Err(SiteError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn unsubscribed_address_can_resubscribe() {
        let (svc, _, store) = service(false);
        let Ok(first) = svc.subscribe(signup("a@b.fi")).await else {
            panic!("subscribe failed");
        };
        let Ok(gone) = svc.unsubscribe("A@B.fi").await else {
            panic!("unsubscribe failed");
        };
        assert!(!gone.is_active);
        assert!(gone.unsubscribed_at.is_some());

        let Ok(back) = svc.subscribe(signup("a@b.fi")).await else {
            panic!("resubscribe failed");
        };
        assert_eq!(back.id, first.id);
        assert!(back.is_active);
        assert_eq!(back.unsubscribed_at, None);
        assert_eq!(store.count_active_subscribers().await.ok(), Some(1));
    }

    #[tokio::test]
    async fn unsubscribing_unknown_address_is_not_found() {
        let (svc, _, _) = service(false);
        assert!(matches!(
            svc.unsubscribe("ghost@example.fi").await,
            Err(SiteError::NotFound { .. })
        ));
    }
}
