//! Service layer: business logic orchestration.
//!
//! Each service owns a handle to the [`crate::persistence::SiteStore`], the
//! integrations it needs, and the [`super::domain::EventBus`]. Handlers
//! never talk to the store directly.

pub mod analytics_service;
pub mod blog_service;
pub mod export;
pub mod indexing_service;
pub mod lead_service;
pub mod showcase_service;

pub use analytics_service::{AnalyticsQuery, AnalyticsService, Dashboard};
pub use blog_service::{BlogService, GenerateRequest};
pub use indexing_service::{IndexReport, IndexingService, LinkSuggestion};
pub use lead_service::LeadService;
pub use showcase_service::ShowcaseService;
