//! PostgreSQL implementation of [`SiteStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::models::{BlogPostRow, ContactRow, GenerationLogRow, ReviewRow, convert_all};
use super::{BlogPostFilter, ContactFilter, ReviewFilter, SiteStore, SubscriberFilter};
use crate::domain::{
    AppRole, BlogPost, Contact, ContactStatus, ContentRelationship, GalleryImage, GenerationLog,
    GeneratorSettings, OwnerProfile, Review, ReviewStatus, SiteContent, Subscriber,
    WritingContext,
};
use crate::error::SiteError;

const CONTACT_COLUMNS: &str =
    "id, name, email, phone, service_interest, message, status, created_at";
const SUBSCRIBER_COLUMNS: &str =
    "id, email, name, is_active, source, subscribed_at, unsubscribed_at";
const GALLERY_COLUMNS: &str = "id, title, description, category, image_url, alt_text, \
     display_order, is_published, created_at";
const REVIEW_COLUMNS: &str = "id, customer_name, location, rating, content, service_type, \
     status, submitted_at, published_at";
const OWNER_COLUMNS: &str =
    "id, name, title, bio, photo_url, years_experience, certifications, updated_at";
const POST_COLUMNS: &str = "id, title, slug, excerpt, content, category, tags, meta_title, \
     meta_description, featured_image_url, status, published_at, ai_generated, created_at, \
     updated_at";
const SETTINGS_COLUMNS: &str =
    "id, is_enabled, posts_per_week, topics, tone, auto_publish, last_run_at, updated_at";
const LOG_COLUMNS: &str = "id, blog_post_id, topic, status, error_message, created_at";
const CONTEXT_COLUMNS: &str =
    "id, business_name, service_area, brand_voice, key_messages, updated_at";
const CONTENT_COLUMNS: &str =
    "id, url_path, title, summary, keywords, content_type, last_indexed_at";
const RELATIONSHIP_COLUMNS: &str =
    "id, source_post_id, target_path, anchor_text, relevance_score, created_at";

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new store on the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool (used for migrations and health checks).
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// `ILIKE` pattern for a free-text search, `None` when blank.
fn like_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.replace('%', "\\%").replace('_', "\\_")))
}

fn push_range(
    qb: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) {
    if let Some(from) = from {
        qb.push(format!(" AND {column} >= ")).push_bind(from);
    }
    if let Some(to) = to {
        qb.push(format!(" AND {column} <= ")).push_bind(to);
    }
}

fn ensure_affected(rows: u64, entity: &'static str, id: Uuid) -> Result<(), SiteError> {
    if rows == 0 {
        return Err(SiteError::not_found(entity, id));
    }
    Ok(())
}

#[async_trait]
impl SiteStore for PgStore {
    async fn insert_contact(&self, contact: &Contact) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO contacts (id, name, email, phone, service_interest, message, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(contact.id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(&contact.service_interest)
        .bind(&contact.message)
        .bind(contact.status.as_str())
        .bind(contact.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_contacts(&self, filter: &ContactFilter) -> Result<Vec<Contact>, SiteError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {CONTACT_COLUMNS} FROM contacts WHERE TRUE"
        ));
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            qb.push(" AND (name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR message ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        push_range(&mut qb, "created_at", filter.from, filter.to);
        qb.push(" ORDER BY created_at DESC");

        let rows: Vec<ContactRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn update_contact_status(
        &self,
        id: Uuid,
        status: ContactStatus,
    ) -> Result<Contact, SiteError> {
        let row = sqlx::query_as::<_, ContactRow>(&format!(
            "UPDATE contacts SET status = $2 WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| SiteError::not_found("contact", id))?;
        Contact::try_from(row)
    }

    async fn delete_contact(&self, id: Uuid) -> Result<(), SiteError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "contact", id)
    }

    async fn find_subscriber_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Subscriber>, SiteError> {
        let row = sqlx::query_as::<_, Subscriber>(&format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_subscriber(&self, subscriber: &Subscriber) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO newsletter_subscribers \
             (id, email, name, is_active, source, subscribed_at, unsubscribed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(subscriber.id)
        .bind(&subscriber.email)
        .bind(&subscriber.name)
        .bind(subscriber.is_active)
        .bind(&subscriber.source)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.unsubscribed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_subscriber(&self, subscriber: &Subscriber) -> Result<(), SiteError> {
        let result = sqlx::query(
            "UPDATE newsletter_subscribers \
             SET name = $2, is_active = $3, source = $4, subscribed_at = $5, unsubscribed_at = $6 \
             WHERE id = $1",
        )
        .bind(subscriber.id)
        .bind(&subscriber.name)
        .bind(subscriber.is_active)
        .bind(&subscriber.source)
        .bind(subscriber.subscribed_at)
        .bind(subscriber.unsubscribed_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "subscriber", subscriber.id)
    }

    async fn list_subscribers(
        &self,
        filter: &SubscriberFilter,
    ) -> Result<Vec<Subscriber>, SiteError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {SUBSCRIBER_COLUMNS} FROM newsletter_subscribers WHERE TRUE"
        ));
        if let Some(active) = filter.active {
            qb.push(" AND is_active = ").push_bind(active);
        }
        if let Some(pattern) = like_pattern(filter.search.as_deref()) {
            qb.push(" AND (email ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR name ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        push_range(&mut qb, "subscribed_at", filter.from, filter.to);
        qb.push(" ORDER BY subscribed_at DESC");

        Ok(qb.build_query_as().fetch_all(&self.pool).await?)
    }

    async fn count_active_subscribers(&self) -> Result<i64, SiteError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM newsletter_subscribers WHERE is_active",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn delete_subscriber(&self, id: Uuid) -> Result<(), SiteError> {
        let result = sqlx::query("DELETE FROM newsletter_subscribers WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "subscriber", id)
    }

    async fn list_gallery_images(&self) -> Result<Vec<GalleryImage>, SiteError> {
        let rows = sqlx::query_as::<_, GalleryImage>(&format!(
            "SELECT {GALLERY_COLUMNS} FROM gallery_images ORDER BY display_order, created_at"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn get_gallery_image(&self, id: Uuid) -> Result<Option<GalleryImage>, SiteError> {
        let row = sqlx::query_as::<_, GalleryImage>(&format!(
            "SELECT {GALLERY_COLUMNS} FROM gallery_images WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_gallery_image(&self, image: &GalleryImage) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO gallery_images \
             (id, title, description, category, image_url, alt_text, display_order, is_published, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(image.id)
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.category)
        .bind(&image.image_url)
        .bind(&image.alt_text)
        .bind(image.display_order)
        .bind(image.is_published)
        .bind(image.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update_gallery_image(&self, image: &GalleryImage) -> Result<(), SiteError> {
        let result = sqlx::query(
            "UPDATE gallery_images SET title = $2, description = $3, category = $4, \
             image_url = $5, alt_text = $6, display_order = $7, is_published = $8 \
             WHERE id = $1",
        )
        .bind(image.id)
        .bind(&image.title)
        .bind(&image.description)
        .bind(&image.category)
        .bind(&image.image_url)
        .bind(&image.alt_text)
        .bind(image.display_order)
        .bind(image.is_published)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "gallery image", image.id)
    }

    async fn delete_gallery_image(&self, id: Uuid) -> Result<(), SiteError> {
        let result = sqlx::query("DELETE FROM gallery_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "gallery image", id)
    }

    async fn insert_review(&self, review: &Review) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO reviews \
             (id, customer_name, location, rating, content, service_type, status, submitted_at, published_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(review.id)
        .bind(&review.customer_name)
        .bind(&review.location)
        .bind(review.rating)
        .bind(&review.content)
        .bind(&review.service_type)
        .bind(review.status.as_str())
        .bind(review.submitted_at)
        .bind(review.published_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_reviews(&self, filter: &ReviewFilter) -> Result<Vec<Review>, SiteError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE TRUE"
        ));
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        push_range(&mut qb, "submitted_at", filter.from, filter.to);
        qb.push(" ORDER BY submitted_at DESC");

        let rows: Vec<ReviewRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn set_review_status(
        &self,
        id: Uuid,
        status: ReviewStatus,
        published_at: Option<DateTime<Utc>>,
    ) -> Result<Review, SiteError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "UPDATE reviews SET status = $2, published_at = $3 WHERE id = $1 \
             RETURNING {REVIEW_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .bind(published_at)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| SiteError::not_found("review", id))?;
        Review::try_from(row)
    }

    async fn delete_review(&self, id: Uuid) -> Result<(), SiteError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        ensure_affected(result.rows_affected(), "review", id)
    }

    async fn get_owner_profile(&self) -> Result<Option<OwnerProfile>, SiteError> {
        let row = sqlx::query_as::<_, OwnerProfile>(&format!(
            "SELECT {OWNER_COLUMNS} FROM owner_profile ORDER BY updated_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_owner_profile(&self, profile: &OwnerProfile) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO owner_profile \
             (id, name, title, bio, photo_url, years_experience, certifications, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, title = EXCLUDED.title, \
             bio = EXCLUDED.bio, photo_url = EXCLUDED.photo_url, \
             years_experience = EXCLUDED.years_experience, \
             certifications = EXCLUDED.certifications, updated_at = EXCLUDED.updated_at",
        )
        .bind(profile.id)
        .bind(&profile.name)
        .bind(&profile.title)
        .bind(&profile.bio)
        .bind(&profile.photo_url)
        .bind(profile.years_experience)
        .bind(&profile.certifications)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn insert_blog_post(&self, post: &BlogPost) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO blog_posts \
             (id, title, slug, excerpt, content, category, tags, meta_title, meta_description, \
              featured_image_url, status, published_at, ai_generated, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(&post.meta_title)
        .bind(&post.meta_description)
        .bind(&post.featured_image_url)
        .bind(post.status.as_str())
        .bind(post.published_at)
        .bind(post.ai_generated)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_blog_posts(&self, filter: &BlogPostFilter) -> Result<Vec<BlogPost>, SiteError> {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE TRUE"
        ));
        if let Some(status) = filter.status {
            qb.push(" AND status = ").push_bind(status.as_str());
        }
        qb.push(" ORDER BY COALESCE(published_at, created_at) DESC");

        let rows: Vec<BlogPostRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        convert_all(rows)
    }

    async fn get_blog_post(&self, id: Uuid) -> Result<Option<BlogPost>, SiteError> {
        sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(BlogPost::try_from)
        .transpose()
    }

    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<Option<BlogPost>, SiteError> {
        sqlx::query_as::<_, BlogPostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM blog_posts WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?
        .map(BlogPost::try_from)
        .transpose()
    }

    async fn update_blog_post(&self, post: &BlogPost) -> Result<(), SiteError> {
        let result = sqlx::query(
            "UPDATE blog_posts SET title = $2, excerpt = $3, content = $4, category = $5, \
             tags = $6, meta_title = $7, meta_description = $8, featured_image_url = $9, \
             status = $10, published_at = $11, updated_at = $12 WHERE id = $1",
        )
        .bind(post.id)
        .bind(&post.title)
        .bind(&post.excerpt)
        .bind(&post.content)
        .bind(&post.category)
        .bind(&post.tags)
        .bind(&post.meta_title)
        .bind(&post.meta_description)
        .bind(&post.featured_image_url)
        .bind(post.status.as_str())
        .bind(post.published_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;
        ensure_affected(result.rows_affected(), "blog post", post.id)
    }

    async fn delete_blog_post(&self, id: Uuid) -> Result<(), SiteError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM content_relationships WHERE source_post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        ensure_affected(result.rows_affected(), "blog post", id)?;
        tx.commit().await?;
        Ok(())
    }

    async fn get_generator_settings(&self) -> Result<Option<GeneratorSettings>, SiteError> {
        let row = sqlx::query_as::<_, GeneratorSettings>(&format!(
            "SELECT {SETTINGS_COLUMNS} FROM blog_generator_settings \
             ORDER BY updated_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_generator_settings(
        &self,
        settings: &GeneratorSettings,
    ) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO blog_generator_settings \
             (id, is_enabled, posts_per_week, topics, tone, auto_publish, last_run_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (id) DO UPDATE SET is_enabled = EXCLUDED.is_enabled, \
             posts_per_week = EXCLUDED.posts_per_week, topics = EXCLUDED.topics, \
             tone = EXCLUDED.tone, auto_publish = EXCLUDED.auto_publish, \
             last_run_at = EXCLUDED.last_run_at, updated_at = EXCLUDED.updated_at",
        )
        .bind(settings.id)
        .bind(settings.is_enabled)
        .bind(settings.posts_per_week)
        .bind(&settings.topics)
        .bind(&settings.tone)
        .bind(settings.auto_publish)
        .bind(settings.last_run_at)
        .bind(settings.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn stamp_generator_run(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), SiteError> {
        sqlx::query("UPDATE blog_generator_settings SET last_run_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_generation_log(&self, log: &GenerationLog) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO blog_generation_logs \
             (id, blog_post_id, topic, status, error_message, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(log.id)
        .bind(log.blog_post_id)
        .bind(&log.topic)
        .bind(log.status.as_str())
        .bind(&log.error_message)
        .bind(log.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_generation_logs(&self, limit: i64) -> Result<Vec<GenerationLog>, SiteError> {
        let rows = sqlx::query_as::<_, GenerationLogRow>(&format!(
            "SELECT {LOG_COLUMNS} FROM blog_generation_logs ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        convert_all(rows)
    }

    async fn count_generation_logs(&self) -> Result<i64, SiteError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM blog_generation_logs")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn get_writing_context(&self) -> Result<Option<WritingContext>, SiteError> {
        let row = sqlx::query_as::<_, WritingContext>(&format!(
            "SELECT {CONTEXT_COLUMNS} FROM blog_writing_context ORDER BY updated_at DESC LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn save_writing_context(&self, context: &WritingContext) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO blog_writing_context \
             (id, business_name, service_area, brand_voice, key_messages, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (id) DO UPDATE SET business_name = EXCLUDED.business_name, \
             service_area = EXCLUDED.service_area, brand_voice = EXCLUDED.brand_voice, \
             key_messages = EXCLUDED.key_messages, updated_at = EXCLUDED.updated_at",
        )
        .bind(context.id)
        .bind(&context.business_name)
        .bind(&context.service_area)
        .bind(&context.brand_voice)
        .bind(&context.key_messages)
        .bind(context.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn upsert_site_content(&self, content: &SiteContent) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO site_content \
             (id, url_path, title, summary, keywords, content_type, last_indexed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (url_path) DO UPDATE SET title = EXCLUDED.title, \
             summary = EXCLUDED.summary, keywords = EXCLUDED.keywords, \
             content_type = EXCLUDED.content_type, last_indexed_at = EXCLUDED.last_indexed_at",
        )
        .bind(content.id)
        .bind(&content.url_path)
        .bind(&content.title)
        .bind(&content.summary)
        .bind(&content.keywords)
        .bind(&content.content_type)
        .bind(content.last_indexed_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_site_content(&self) -> Result<Vec<SiteContent>, SiteError> {
        let rows = sqlx::query_as::<_, SiteContent>(&format!(
            "SELECT {CONTENT_COLUMNS} FROM site_content ORDER BY url_path"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn insert_content_relationships(
        &self,
        relationships: &[ContentRelationship],
    ) -> Result<(), SiteError> {
        if relationships.is_empty() {
            return Ok(());
        }
        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO content_relationships \
             (id, source_post_id, target_path, anchor_text, relevance_score, created_at) ",
        );
        qb.push_values(relationships, |mut row, rel| {
            row.push_bind(rel.id)
                .push_bind(rel.source_post_id)
                .push_bind(&rel.target_path)
                .push_bind(&rel.anchor_text)
                .push_bind(rel.relevance_score)
                .push_bind(rel.created_at);
        });
        qb.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn list_content_relationships(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<ContentRelationship>, SiteError> {
        let rows = sqlx::query_as::<_, ContentRelationship>(&format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM content_relationships \
             WHERE source_post_id = $1 ORDER BY relevance_score DESC, target_path"
        ))
        .bind(post_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn has_role(&self, user_id: Uuid, role: AppRole) -> Result<bool, SiteError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM user_roles WHERE user_id = $1 AND role = $2)",
        )
        .bind(user_id)
        .bind(role.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn grant_role(&self, user_id: Uuid, role: AppRole) -> Result<(), SiteError> {
        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, $2) \
             ON CONFLICT (user_id, role) DO NOTHING",
        )
        .bind(user_id)
        .bind(role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
