//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::auth::SessionVerifier;
use crate::config::SiteConfig;
use crate::domain::EventBus;
use crate::integrations::Integrations;
use crate::persistence::SiteStore;
use crate::service::{
    AnalyticsService, BlogService, IndexingService, LeadService, ShowcaseService,
};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Runtime configuration.
    pub config: Arc<SiteConfig>,
    /// Backing store, also used for admin role checks.
    pub store: Arc<dyn SiteStore>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Verifies admin session tokens.
    pub sessions: SessionVerifier,
    /// Contacts and newsletter.
    pub leads: Arc<LeadService>,
    /// Gallery, reviews and owner profile.
    pub showcase: Arc<ShowcaseService>,
    /// Blog posts and generation.
    pub blog: Arc<BlogService>,
    /// Site-content index and search-engine submission.
    pub indexing: Arc<IndexingService>,
    /// Admin dashboard.
    pub analytics: Arc<AnalyticsService>,
}

impl AppState {
    /// Wires every service around `store` and `integrations`.
    #[must_use]
    pub fn new(config: SiteConfig, store: Arc<dyn SiteStore>, integrations: Integrations) -> Self {
        let event_bus = EventBus::new(config.event_bus_capacity);
        let sessions = SessionVerifier::new(&config.jwt_secret);

        let indexing = IndexingService::new(
            Arc::clone(&store),
            Arc::clone(&integrations.generator),
            Arc::clone(&integrations.submitter),
            event_bus.clone(),
            config.base_url.clone(),
        );
        let blog = BlogService::new(
            Arc::clone(&store),
            Arc::clone(&integrations.generator),
            indexing.clone(),
            event_bus.clone(),
        );
        let leads = LeadService::new(
            Arc::clone(&store),
            Arc::clone(&integrations.mailer),
            event_bus.clone(),
        );
        let showcase = ShowcaseService::new(Arc::clone(&store), event_bus.clone());
        let analytics = AnalyticsService::new(Arc::clone(&store));

        Self {
            config: Arc::new(config),
            store,
            event_bus,
            sessions,
            leads: Arc::new(leads),
            showcase: Arc::new(showcase),
            blog: Arc::new(blog),
            indexing: Arc::new(indexing),
            analytics: Arc::new(analytics),
        }
    }
}
