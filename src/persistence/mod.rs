//! Persistence layer: the [`SiteStore`] trait and its implementations.
//!
//! Services build complete records (ids, timestamps) and hand them to the
//! store, which only enforces the table constraints: unique subscriber
//! e-mails, unique blog slugs, unique site-content paths. [`PgStore`] talks
//! to PostgreSQL through `sqlx::PgPool`; [`MemoryStore`] keeps everything
//! behind a `tokio::sync::RwLock` and backs local runs and tests.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::domain::{
    AppRole, BlogPost, Contact, ContactStatus, ContentRelationship,
    GalleryImage, GenerationLog, GeneratorSettings, OwnerProfile, PostStatus, Review,
    ReviewStatus, SiteContent, Subscriber, WritingContext,
};
use crate::error::SiteError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Inclusive `created_at` window shared by the list filters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    /// Lower bound, inclusive.
    pub from: Option<DateTime<Utc>>,
    /// Upper bound, inclusive.
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Whether `at` falls inside the window.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.from.is_none_or(|from| at >= from) && self.to.is_none_or(|to| at <= to)
    }
}

/// Filter for contact listings and exports.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ContactFilter {
    /// Only contacts in this state.
    #[serde(default)]
    pub status: Option<ContactStatus>,
    /// Case-insensitive match on name, e-mail or message.
    #[serde(default)]
    pub search: Option<String>,
    /// Earliest submission time.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest submission time.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl ContactFilter {
    /// Date window of this filter.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }

    /// In-process evaluation, used by [`MemoryStore`].
    #[must_use]
    pub fn matches(&self, contact: &Contact) -> bool {
        self.status.is_none_or(|s| contact.status == s)
            && self.range().contains(contact.created_at)
            && search_term(self.search.as_deref()).is_none_or(|term| {
                [&contact.name, &contact.email, &contact.message]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            })
    }
}

/// Filter for subscriber listings and exports.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriberFilter {
    /// Only active (`true`) or unsubscribed (`false`) rows.
    #[serde(default)]
    pub active: Option<bool>,
    /// Case-insensitive match on e-mail or name.
    #[serde(default)]
    pub search: Option<String>,
    /// Earliest subscription time.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest subscription time.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl SubscriberFilter {
    /// Date window of this filter.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }

    /// In-process evaluation, used by [`MemoryStore`].
    #[must_use]
    pub fn matches(&self, subscriber: &Subscriber) -> bool {
        self.active.is_none_or(|a| subscriber.is_active == a)
            && self.range().contains(subscriber.subscribed_at)
            && search_term(self.search.as_deref()).is_none_or(|term| {
                subscriber.email.contains(&term)
                    || subscriber
                        .name
                        .as_deref()
                        .is_some_and(|n| n.to_lowercase().contains(&term))
            })
    }
}

/// Filter for review listings and exports.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReviewFilter {
    /// Only reviews in this state.
    #[serde(default)]
    pub status: Option<ReviewStatus>,
    /// Earliest submission time.
    #[serde(default)]
    pub from: Option<DateTime<Utc>>,
    /// Latest submission time.
    #[serde(default)]
    pub to: Option<DateTime<Utc>>,
}

impl ReviewFilter {
    /// Date window of this filter.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange {
            from: self.from,
            to: self.to,
        }
    }

    /// In-process evaluation, used by [`MemoryStore`].
    #[must_use]
    pub fn matches(&self, review: &Review) -> bool {
        self.status.is_none_or(|s| review.status == s) && self.range().contains(review.submitted_at)
    }
}

/// Filter for blog post listings.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BlogPostFilter {
    /// Only posts in this state.
    #[serde(default)]
    pub status: Option<PostStatus>,
}

/// Lower-cased, trimmed search term; `None` when blank.
fn search_term(raw: Option<&str>) -> Option<String> {
    raw.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty())
}

/// Async persistence seam for every table the site uses.
///
/// Lists are newest first unless stated otherwise. Lookups by id that miss
/// return [`SiteError::NotFound`] for mutations and `Ok(None)` for reads.
#[async_trait]
pub trait SiteStore: fmt::Debug + Send + Sync {
    // ── contacts ────────────────────────────────────────────────────────

    /// Inserts a contact submission.
    async fn insert_contact(&self, contact: &Contact) -> Result<(), SiteError>;

    /// Lists contacts matching `filter`.
    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, SiteError>;

    /// Sets a contact's follow-up state.
    async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Contact, SiteError>;

    /// Deletes a contact.
    async fn delete_contact(&self, id: Uuid) -> Result<(), SiteError>;

    // ── newsletter ──────────────────────────────────────────────────────

    /// Finds a subscriber by (already normalized) e-mail.
    async fn find_subscriber_by_email(&self, email: &str)
    -> Result<Option<Subscriber>, SiteError>;

    /// Inserts a subscriber; a duplicate e-mail is a [`SiteError::Conflict`].
    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), SiteError>;

    /// Replaces the mutable fields (active flag, timestamps, name, source)
    /// of an existing subscriber.
    async fn update_subscriber(&self, subscriber: &Subscriber) -> Result<(), SiteError>;

    /// Lists subscribers matching `filter`.
    async fn list_subscribers(
        &self,
        filter: &SubscriberFilter,
    ) -> Result<Vec<Subscriber>, SiteError>;

    /// Counts currently active subscribers.
    async fn count_active_subscribers(&self) -> Result<i64, SiteError>;

    /// Deletes a subscriber.
    async fn delete_subscriber(&self, id: Uuid) -> Result<(), SiteError>;

    // ── gallery ─────────────────────────────────────────────────────────

    /// All gallery images, published or not, by display order.
    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, SiteError>;

    /// Finds a gallery image.
    async fn get_gallery_image(&self, id: Uuid) -> Result<Option<GalleryImage>, SiteError>;

    /// Inserts a gallery image.
    async fn insert_gallery_image(&self, image: &GalleryImage) -> Result<(), SiteError>;

    /// Replaces every editable field of an existing gallery image.
    async fn update_gallery_image(&self, image: &GalleryImage) -> Result<(), SiteError>;

    /// Deletes a gallery image.
    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), SiteError>;

    // ── reviews ─────────────────────────────────────────────────────────

    /// Inserts a review.
    async fn insert_review(&self, review: &Review) -> Result<(), SiteError>;

    /// Lists reviews matching `filter`.
    async fn list_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, SiteError>;

    /// Sets status and published timestamp together.
    async fn set_review_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Review, SiteError>;

    /// Deletes a review.
    async fn delete_review(&self, id: Uuid) -> Result<(), SiteError>;

    // ── owner profile ───────────────────────────────────────────────────

    /// The owner profile, if one was saved.
    async fn get_owner_profile(&self) -> Result<Option<OwnerProfile>, SiteError>;

    /// Upserts the owner profile by id.
    async fn save_owner_profile(&self, profile: &OwnerProfile) -> Result<(), SiteError>;

    // ── blog ────────────────────────────────────────────────────────────

    /// Inserts a post; a duplicate slug is a [`SiteError::Conflict`].
    async fn insert_blog_post(&self, post: &BlogPost) -> Result<(), SiteError>;

    /// Lists posts matching `filter`, newest first.
    async fn list_blog_posts(&self, filter: &BlogPostFilter) -> Result<Vec<BlogPost>, SiteError>;

    /// Finds a post by id.
    async fn get_blog_post(&self, id: Uuid) -> Result<Option<BlogPost>, SiteError>;

    /// Finds a post by slug.
    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, SiteError>;

    /// Replaces every editable field of an existing post.
    async fn update_blog_post(&self, post: &BlogPost) -> Result<(), SiteError>;

    /// Deletes a post together with its relationships.
    async fn delete_blog_post(&self, id: Uuid) -> Result<(), SiteError>;

    /// Generator settings, if saved.
    async fn get_generator_settings(&self) -> Result<Option<GeneratorSettings>, SiteError>;

    /// Upserts generator settings by id.
    async fn save_generator_settings(&self, settings: &GeneratorSettings)
    -> Result<(), SiteError>;

    /// Sets `last_run_at` on the settings row `id`, leaving every other
    /// column as it is.
    async fn stamp_generator_run(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), SiteError>;

    /// Appends a generation log row.
    async fn insert_generation_log(&self, log: &GenerationLog) -> Result<(), SiteError>;

    /// Most recent generation logs, newest first.
    async fn list_generation_logs(&self, limit: i64) -> Result<Vec<GenerationLog>, SiteError>;

    /// Number of generation logs ever written.
    async fn count_generation_logs(&self) -> Result<i64, SiteError>;

    /// Writing context, if saved.
    async fn get_writing_context(&self) -> Result<Option<WritingContext>, SiteError>;

    /// Upserts the writing context by id.
    async fn save_writing_context(&self, context: &WritingContext) -> Result<(), SiteError>;

    // ── content index ───────────────────────────────────────────────────

    /// Inserts or replaces the row for `content.url_path`.
    async fn upsert_site_content(&self, content: &SiteContent) -> Result<(), SiteError>;

    /// All indexed pages ordered by path.
    async fn list_site_content(&self) -> Result<Vec<SiteContent>, SiteError>;

    /// Stores internal-link suggestions for a post.
    async fn insert_content_relationships(
        &self,
        relationships: &[ContentRelationship],
    ) -> Result<(), SiteError>;

    /// Internal-link suggestions stored for a post, best score first.
    async fn list_content_relationships(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<ContentRelationship>, SiteError>;

    // ── roles ───────────────────────────────────────────────────────────

    /// Whether `user_id` holds `role`.
    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, SiteError>;

    /// Grants `role` to `user_id` (idempotent).
    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<(), SiteError>;
}
