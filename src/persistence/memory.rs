//! In-memory implementation of [`SiteStore`].
//!
//! Holds every table in one `tokio::sync::RwLock`. Used when persistence is
//! disabled and by the test suite; it enforces the same uniqueness rules as
//! the PostgreSQL schema.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{BlogPostFilter, ContactFilter, ReviewFilter, SiteStore, SubscriberFilter};
use crate::domain::{
    AppRole, BlogPost, Contact, ContactStatus, ContentRelationship, GalleryImage, GenerationLog,
    GeneratorSettings, OwnerProfile, Review, ReviewStatus, SiteContent, Subscriber,
    WritingContext,
};
use crate::error::SiteError;

#[derive(Debug, Default)]
struct Tables {
    contacts: Vec<Contact>,
    subscribers: Vec<Subscriber>,
    gallery: Vec<GalleryImage>,
    reviews: Vec<Review>,
    owner: Option<OwnerProfile>,
    posts: Vec<BlogPost>,
    settings: Option<GeneratorSettings>,
    logs: Vec<GenerationLog>,
    context: Option<WritingContext>,
    site_content: HashMap<String, SiteContent>,
    relationships: Vec<ContentRelationship>,
    roles: HashSet<(Uuid, AppRole)>,
}

/// Process-local store backed by a [`RwLock`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    #[cfg(test)]
    fail_log_writes: std::sync::atomic::AtomicBool,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later generation-log insert fail.
    #[cfg(test)]
    pub(crate) fn fail_generation_logs(&self) {
        self.fail_log_writes
            .store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> DateTime<Utc>) {
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
}

fn remove_by<T>(
    rows: &mut Vec<T>,
    entity: &'static str,
    id: Uuid,
    id_of: impl Fn(&T) -> Uuid,
) -> Result<(), SiteError> {
    let before = rows.len();
    rows.retain(|row| id_of(row) != id);
    if rows.len() == before {
        return Err(SiteError::not_found(entity, id));
    }
    Ok(())
}

#[async_trait]
impl SiteStore for MemoryStore {
    async fn insert_contact(&self, contact: &Contact) -> Result<(), SiteError> {
        self.tables.write().await.contacts.push(contact.clone());
        Ok(())
    }

    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Contact> = tables
            .contacts
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        newest_first(&mut rows, |c| c.created_at);
        Ok(rows)
    }

    async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Contact, SiteError> {
        let mut tables = self.tables.write().await;
        let contact = tables
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SiteError::not_found("contact", id))?;
        contact.status = status;
        Ok(contact.clone())
    }

    async fn delete_contact(&self, id: Uuid) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        remove_by(&mut tables.contacts, "contact", id, |c| c.id)
    }

    async fn find_subscriber_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Subscriber>, SiteError> {
        let tables = self.tables.read().await;
        Ok(tables.subscribers.iter().find(|s| s.email == email).cloned())
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        if tables.subscribers.iter().any(|s| s.email == subscriber.email) {
            return Err(SiteError::Conflict(format!(
                "subscriber already exists: {}",
                subscriber.email
            )));
        }
        tables.subscribers.push(subscriber.clone());
        Ok(())
    }

    async fn update_subscriber(&self, subscriber: &Subscriber) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .subscribers
            .iter_mut()
            .find(|s| s.id == subscriber.id)
            .ok_or_else(|| SiteError::not_found("subscriber", subscriber.id))?;
        row.name.clone_from(&subscriber.name);
        row.is_active = subscriber.is_active;
        row.source.clone_from(&subscriber.source);
        row.subscribed_at = subscriber.subscribed_at;
        row.unsubscribed_at = subscriber.unsubscribed_at;
        Ok(())
    }

    async fn list_subscribers(
        &self,
        filter: &SubscriberFilter,
    ) -> Result<Vec<Subscriber>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Subscriber> = tables
            .subscribers
            .iter()
            .filter(|s| filter.matches(s))
            .cloned()
            .collect();
        newest_first(&mut rows, |s| s.subscribed_at);
        Ok(rows)
    }

    async fn count_active_subscribers(&self) -> Result<i64, SiteError> {
        let tables = self.tables.read().await;
        let count = tables.subscribers.iter().filter(|s| s.is_active).count();
        Ok(i64::try_from(count).unwrap_or(i64::MAX))
    }

    async fn delete_subscriber(&self, id: Uuid) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        remove_by(&mut tables.subscribers, "subscriber", id, |s| s.id)
    }

    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows = tables.gallery.clone();
        rows.sort_by(|a, b| {
            a.display_order
                .cmp(&b.display_order)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }

    async fn get_gallery_image(&self, id: Uuid) -> Result<Option<GalleryImage>, SiteError> {
        let tables = self.tables.read().await;
        Ok(tables.gallery.iter().find(|img| img.id == id).cloned())
    }

    async fn insert_gallery_image(&self, image: &GalleryImage) -> Result<(), SiteError> {
        self.tables.write().await.gallery.push(image.clone());
        Ok(())
    }

    async fn update_gallery_image(&self, image: &GalleryImage) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .gallery
            .iter_mut()
            .find(|img| img.id == image.id)
            .ok_or_else(|| SiteError::not_found("gallery image", image.id))?;
        let created_at = row.created_at;
        *row = GalleryImage {
            created_at,
            ..image.clone()
        };
        Ok(())
    }

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        remove_by(&mut tables.gallery, "gallery image", id, |img| img.id)
    }

    async fn insert_review(&self, review: &Review) -> Result<(), SiteError> {
        self.tables.write().await.reviews.push(review.clone());
        Ok(())
    }

    async fn list_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Review> = tables
            .reviews
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        newest_first(&mut rows, |r| r.submitted_at);
        Ok(rows)
    }

    async fn set_review_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Review, SiteError> {
        let mut tables = self.tables.write().await;
        let review = tables
            .reviews
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| SiteError::not_found("review", id))?;
        review.status = status;
        review.published_at = published_at;
        Ok(review.clone())
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        remove_by(&mut tables.reviews, "review", id, |r| r.id)
    }

    async fn get_owner_profile(&self) -> Result<Option<OwnerProfile>, SiteError> {
        Ok(self.tables.read().await.owner.clone())
    }

    async fn save_owner_profile(&self, profile: &OwnerProfile) -> Result<(), SiteError> {
        self.tables.write().await.owner = Some(profile.clone());
        Ok(())
    }

    async fn insert_blog_post(&self, post: &BlogPost) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        if tables.posts.iter().any(|p| p.slug == post.slug) {
            return Err(SiteError::Conflict(format!(
                "blog post slug already exists: {}",
                post.slug
            )));
        }
        tables.posts.push(post.clone());
        Ok(())
    }

    async fn list_blog_posts(&self, filter: &BlogPostFilter) -> Result<Vec<BlogPost>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<BlogPost> = tables
            .posts
            .iter()
            .filter(|p| filter.status.is_none_or(|s| p.status == s))
            .cloned()
            .collect();
        newest_first(&mut rows, |p| p.published_at.unwrap_or(p.created_at));
        Ok(rows)
    }

    async fn get_blog_post(&self, id: Uuid) -> Result<Option<BlogPost>, SiteError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, SiteError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.iter().find(|p| p.slug == slug).cloned())
    }

    async fn update_blog_post(&self, post: &BlogPost) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        let row = tables
            .posts
            .iter_mut()
            .find(|p| p.id == post.id)
            .ok_or_else(|| SiteError::not_found("blog post", post.id))?;
        *row = BlogPost {
            slug: row.slug.clone(),
            ai_generated: row.ai_generated,
            created_at: row.created_at,
            ..post.clone()
        };
        Ok(())
    }

    async fn delete_blog_post(&self, id: Uuid) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        remove_by(&mut tables.posts, "blog post", id, |p| p.id)?;
        tables.relationships.retain(|r| r.source_post_id != id);
        for log in &mut tables.logs {
            if log.blog_post_id == Some(id) {
                log.blog_post_id = None;
            }
        }
        Ok(())
    }

    async fn get_generator_settings(&self) -> Result<Option<GeneratorSettings>, SiteError> {
        Ok(self.tables.read().await.settings.clone())
    }

    async fn save_generator_settings(
        &self,
        settings: &GeneratorSettings,
    ) -> Result<(), SiteError> {
        self.tables.write().await.settings = Some(settings.clone());
        Ok(())
    }

    async fn stamp_generator_run(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), SiteError> {
        if let Some(settings) = self.tables.write().await.settings.as_mut()
            && settings.id == id
        {
            settings.last_run_at = Some(at);
        }
        Ok(())
    }

    async fn insert_generation_log(&self, log: &GenerationLog) -> Result<(), SiteError> {
        #[cfg(test)]
        if self.fail_log_writes.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(SiteError::Storage("generation log table unavailable".to_string()));
        }
        self.tables.write().await.logs.push(log.clone());
        Ok(())
    }

    async fn list_generation_logs(&self, limit: i64) -> Result<Vec<GenerationLog>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows = tables.logs.clone();
        newest_first(&mut rows, |l| l.created_at);
        rows.truncate(usize::try_from(limit.max(0)).unwrap_or(usize::MAX));
        Ok(rows)
    }

    async fn count_generation_logs(&self) -> Result<i64, SiteError> {
        let tables = self.tables.read().await;
        Ok(i64::try_from(tables.logs.len()).unwrap_or(i64::MAX))
    }

    async fn get_writing_context(&self) -> Result<Option<WritingContext>, SiteError> {
        Ok(self.tables.read().await.context.clone())
    }

    async fn save_writing_context(&self, context: &WritingContext) -> Result<(), SiteError> {
        self.tables.write().await.context = Some(context.clone());
        Ok(())
    }

    async fn upsert_site_content(&self, content: &SiteContent) -> Result<(), SiteError> {
        let mut tables = self.tables.write().await;
        let id = tables
            .site_content
            .get(&content.url_path)
            .map_or(content.id, |existing| existing.id);
        tables.site_content.insert(
            content.url_path.clone(),
            SiteContent {
                id,
                ..content.clone()
            },
        );
        Ok(())
    }

    async fn list_site_content(&self) -> Result<Vec<SiteContent>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<SiteContent> = tables.site_content.values().cloned().collect();
        rows.sort_by(|a, b| a.url_path.cmp(&b.url_path));
        Ok(rows)
    }

    async fn insert_content_relationships(
        &self,
        relationships: &[ContentRelationship],
    ) -> Result<(), SiteError> {
        self.tables
            .write()
            .await
            .relationships
            .extend_from_slice(relationships);
        Ok(())
    }

    async fn list_content_relationships(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<ContentRelationship>, SiteError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ContentRelationship> = tables
            .relationships
            .iter()
            .filter(|r| r.source_post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| {
            b.relevance_score
                .cmp(&a.relevance_score)
                .then_with(|| a.target_path.cmp(&b.target_path))
        });
        Ok(rows)
    }

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, SiteError> {
        Ok(self.tables.read().await.roles.contains(&(user_id, role)))
    }

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<(), SiteError> {
        self.tables.write().await.roles.insert((user_id, role));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::domain::{GenerationStatus, PostStatus};

    fn subscriber(email: &str, active: bool) -> Subscriber {
        Subscriber {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: None,
            is_active: active,
            source: None,
            subscribed_at: Utc::now(),
            unsubscribed_at: None,
        }
    }

    fn post(slug: &str, status: PostStatus, created_at: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id: Uuid::new_v4(),
            title: slug.to_string(),
            slug: slug.to_string(),
            excerpt: None,
            content: "body".to_string(),
            category: None,
            tags: Vec::new(),
            meta_title: None,
            meta_description: None,
            featured_image_url: None,
            status,
            published_at: None,
            ai_generated: false,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn duplicate_subscriber_email_conflicts() {
        let store = MemoryStore::new();
        assert!(store.insert_subscriber(&subscriber("a@b.fi", true)).await.is_ok());
        let second = store.insert_subscriber(&subscriber("a@b.fi", true)).await;
        assert!(matches!(second, Err(SiteError::Conflict(_))));
    }

    #[tokio::test]
    async fn active_count_ignores_unsubscribed() {
        let store = MemoryStore::new();
        for (email, active) in [("a@b.fi", true), ("c@d.fi", false), ("e@f.fi", true)] {
            assert!(store.insert_subscriber(&subscriber(email, active)).await.is_ok());
        }
        assert_eq!(store.count_active_subscribers().await.ok(), Some(2));
    }

    #[tokio::test]
    async fn posts_list_newest_first_and_filter_by_status() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let old = post("old", PostStatus::Published, now - Duration::days(3));
        let new = post("new", PostStatus::Published, now);
        let draft = post("draft", PostStatus::Draft, now);
        for p in [&old, &new, &draft] {
            assert!(store.insert_blog_post(p).await.is_ok());
        }

        let filter = BlogPostFilter {
            status: Some(PostStatus::Published),
        };
        let Ok(listed) = store.list_blog_posts(&filter).await else {
            panic!("list failed");
        };
        let slugs: Vec<&str> = listed.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old"]);

        let dup = store.insert_blog_post(&post("new", PostStatus::Draft, now)).await;
        assert!(matches!(dup, Err(SiteError::Conflict(_))));
    }

    #[tokio::test]
    async fn deleting_post_drops_relationships_and_detaches_logs() {
        let store = MemoryStore::new();
        let p = post("p", PostStatus::Draft, Utc::now());
        assert!(store.insert_blog_post(&p).await.is_ok());
        let log = GenerationLog {
            id: Uuid::new_v4(),
            blog_post_id: Some(p.id),
            topic: "Steam rooms".to_string(),
            status: GenerationStatus::Success,
            error_message: None,
            created_at: Utc::now(),
        };
        assert!(store.insert_generation_log(&log).await.is_ok());
        let rel = ContentRelationship {
            id: Uuid::new_v4(),
            source_post_id: p.id,
            target_path: "/services".to_string(),
            anchor_text: "Services".to_string(),
            relevance_score: 2,
            created_at: Utc::now(),
        };
        assert!(store.insert_content_relationships(&[rel]).await.is_ok());
        assert!(store.delete_blog_post(p.id).await.is_ok());
        assert_eq!(
            store.list_content_relationships(p.id).await.map(|r| r.len()).ok(),
            Some(0)
        );
        let Ok(logs) = store.list_generation_logs(10).await else {
            panic!("log read failed");
        };
        assert_eq!(logs.len(), 1);
        assert_eq!(logs.first().and_then(|l| l.blog_post_id), None);
        assert!(matches!(
            store.delete_blog_post(p.id).await,
            Err(SiteError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn site_content_upsert_keeps_one_row_per_path() {
        let store = MemoryStore::new();
        let make = |summary: &str| SiteContent {
            id: Uuid::new_v4(),
            url_path: "/about".to_string(),
            title: "About".to_string(),
            summary: summary.to_string(),
            keywords: Vec::new(),
            content_type: "marketing".to_string(),
            last_indexed_at: Utc::now(),
        };
        let first = make("first");
        assert!(store.upsert_site_content(&first).await.is_ok());
        assert!(store.upsert_site_content(&make("second")).await.is_ok());

        let Ok(rows) = store.list_site_content().await else {
            panic!("list failed");
        };
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.id == first.id && r.summary == "second"));
    }

    #[tokio::test]
    async fn roles_are_granted_idempotently() {
        let store = MemoryStore::new();
        let user = Uuid::new_v4();
        assert_eq!(store.has_role(user, AppRole::Admin).await.ok(), Some(false));
        assert!(store.grant_role(user, AppRole::Admin).await.is_ok());
        assert!(store.grant_role(user, AppRole::Admin).await.is_ok());
        assert_eq!(store.has_role(user, AppRole::Admin).await.ok(), Some(true));
        assert_eq!(store.has_role(user, AppRole::User).await.ok(), Some(false));
    }
}
