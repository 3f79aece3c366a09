//! Blog service: posts, generator settings, and the AI generation pipeline.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::indexing_service::{DEFAULT_SUGGESTION_LIMIT, IndexingService};
use crate::domain::blog::slugify;
use crate::domain::lead::{optional, required};
use crate::domain::{
    BlogPost, BlogPostUpdate, ContentRelationship, EventBus, GenerationLog, GenerationStatus,
    GeneratorSettings, GeneratorSettingsInput, PostStatus, SiteEvent, WritingContext,
    WritingContextInput,
};
use crate::error::SiteError;
use crate::integrations::{ContentGenerator, DraftRequest};
use crate::persistence::{BlogPostFilter, SiteStore};

/// Seconds in the scheduling week.
const WEEK_SECS: i64 = 7 * 24 * 60 * 60;

/// Manual generation request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GenerateRequest {
    /// Topic to write about; the next topic from the settings when absent.
    #[serde(default)]
    pub topic: Option<String>,
}

/// Orchestrates the blog.
#[derive(Debug, Clone)]
pub struct BlogService {
    store: Arc<dyn SiteStore>,
    generator: Arc<dyn ContentGenerator>,
    indexing: IndexingService,
    event_bus: EventBus,
}

impl BlogService {
    /// Creates a new `BlogService`.
    #[must_use]
    pub fn new(
        store: Arc<dyn SiteStore>,
        generator: Arc<dyn ContentGenerator>,
        indexing: IndexingService,
        event_bus: EventBus,
    ) -> Self {
        Self {
            store,
            generator,
            indexing,
            event_bus,
        }
    }

    // ── public ──────────────────────────────────────────────────────────

    /// Published posts, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn published_posts(&self) -> Result<Vec<BlogPost>, SiteError> {
        let filter = BlogPostFilter {
            status: Some(PostStatus::Published),
        };
        self.store.list_blog_posts(&filter).await
    }

    /// A published post by slug.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for unknown slugs and drafts.
    pub async fn post_by_slug(&self, slug: &str) -> Result<BlogPost, SiteError> {
        self.store
            .get_blog_post_by_slug(slug)
            .await?
            .filter(|p| p.status == PostStatus::Published)
            .ok_or_else(|| SiteError::not_found("blog post", slug))
    }

    // ── admin ───────────────────────────────────────────────────────────

    /// Lists posts matching `filter`.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn list_posts(&self, filter: &BlogPostFilter) -> Result<Vec<BlogPost>, SiteError> {
        self.store.list_blog_posts(filter).await
    }

    /// Applies a partial update to a post.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id and
    /// [`SiteError::Validation`] for blank title or content.
    pub async fn update_post(&self, id: Uuid, update: BlogPostUpdate) -> Result<BlogPost, SiteError> {
        let mut post = self
            .store
            .get_blog_post(id)
            .await?
            .ok_or_else(|| SiteError::not_found("blog post", id))?;
        post.apply(update, Utc::now())?;
        self.store.update_blog_post(&post).await?;
        tracing::info!(post_id = %id, status = %post.status, "blog post updated");
        Ok(post)
    }

    /// Deletes a post and its link suggestions.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] for an unknown id.
    pub async fn delete_post(&self, id: Uuid) -> Result<(), SiteError> {
        self.store.delete_blog_post(id).await?;
        tracing::info!(post_id = %id, "blog post deleted");
        Ok(())
    }

    /// Stored generator settings, or the defaults when none were saved.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn settings(&self) -> Result<GeneratorSettings, SiteError> {
        Ok(self
            .store
            .get_generator_settings()
            .await?
            .unwrap_or_else(|| GeneratorSettings::defaults(Utc::now())))
    }

    /// Saves generator settings, keeping the row id and last run time.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for an out-of-range cadence.
    pub async fn update_settings(
        &self,
        input: GeneratorSettingsInput,
    ) -> Result<GeneratorSettings, SiteError> {
        let input = input.validate()?;
        let current = self.settings().await?;
        let settings = GeneratorSettings {
            is_enabled: input.is_enabled,
            posts_per_week: input.posts_per_week,
            topics: input.topics,
            tone: input.tone.unwrap_or_else(|| current.tone.clone()),
            auto_publish: input.auto_publish,
            updated_at: Utc::now(),
            ..current
        };
        self.store.save_generator_settings(&settings).await?;
        tracing::info!(
            is_enabled = settings.is_enabled,
            posts_per_week = settings.posts_per_week,
            "generator settings updated"
        );
        Ok(settings)
    }

    /// The writing context.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::NotFound`] until one has been saved.
    pub async fn writing_context(&self) -> Result<WritingContext, SiteError> {
        self.store
            .get_writing_context()
            .await?
            .ok_or_else(|| SiteError::not_found("writing context", "singleton"))
    }

    /// Creates or replaces the writing context, keeping its id stable.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for a blank business name.
    pub async fn update_writing_context(
        &self,
        input: WritingContextInput,
    ) -> Result<WritingContext, SiteError> {
        let business_name = required("business_name", &input.business_name)?;
        let id = self
            .store
            .get_writing_context()
            .await?
            .map_or_else(Uuid::new_v4, |c| c.id);
        let context = WritingContext {
            id,
            business_name,
            service_area: optional(input.service_area),
            brand_voice: optional(input.brand_voice),
            key_messages: input
                .key_messages
                .into_iter()
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect(),
            updated_at: Utc::now(),
        };
        self.store.save_writing_context(&context).await?;
        tracing::info!("writing context updated");
        Ok(context)
    }

    /// Most recent generation logs.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn generation_logs(&self, limit: i64) -> Result<Vec<GenerationLog>, SiteError> {
        self.store.list_generation_logs(limit.clamp(1, 200)).await
    }

    /// Internal-link suggestions recorded for a post.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn relationships(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<ContentRelationship>, SiteError> {
        self.store.list_content_relationships(post_id).await
    }

    // ── generation ──────────────────────────────────────────────────────

    /// Generates one post.
    ///
    /// Every attempt that reaches the generator leaves a generation log,
    /// `success` or `failed`.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] when no topic is available and the
    /// generator's or the store's error when the attempt fails.
    pub async fn generate_post(&self, request: GenerateRequest) -> Result<BlogPost, SiteError> {
        let settings = self.settings().await?;
        let topic = match optional(request.topic) {
            Some(topic) => topic,
            None => {
                let runs = self.store.count_generation_logs().await?;
                next_topic(&settings.topics, runs).ok_or_else(|| {
                    SiteError::Validation("no topic given and none configured".to_string())
                })?
            }
        };

        match self.draft_and_store(&settings, &topic).await {
            Ok(post) => {
                if let Err(log_err) = self
                    .write_log(&topic, GenerationStatus::Success, Some(post.id), None)
                    .await
                {
                    tracing::error!(post_id = %post.id, error = %log_err, "could not record successful generation");
                }
                tracing::info!(post_id = %post.id, topic = %topic, status = %post.status, "blog post generated");
                let _ = self.event_bus.publish(SiteEvent::BlogPostGenerated {
                    post_id: post.id,
                    title: post.title.clone(),
                    published: post.status == PostStatus::Published,
                    timestamp: post.created_at,
                });
                Ok(post)
            }
            Err(e) => {
                tracing::warn!(topic = %topic, error = %e, "blog generation failed");
                if let Err(log_err) = self
                    .write_log(&topic, GenerationStatus::Failed, None, Some(e.to_string()))
                    .await
                {
                    tracing::error!(error = %log_err, "could not record failed generation");
                }
                Err(e)
            }
        }
    }

    /// Entry point for the external scheduler.
    ///
    /// Returns `Ok(None)` when generation is disabled or the previous run
    /// is more recent than `7 days / posts_per_week`.
    ///
    /// # Errors
    ///
    /// Propagates [`BlogService::generate_post`] failures.
    pub async fn run_scheduled(&self) -> Result<Option<BlogPost>, SiteError> {
        let settings = self.settings().await?;
        let now = Utc::now();
        if !is_due(&settings, now) {
            tracing::debug!(is_enabled = settings.is_enabled, "scheduled generation skipped");
            return Ok(None);
        }

        let post = self.generate_post(GenerateRequest::default()).await?;
        self.store.stamp_generator_run(settings.id, now).await?;
        Ok(Some(post))
    }

    async fn draft_and_store(
        &self,
        settings: &GeneratorSettings,
        topic: &str,
    ) -> Result<BlogPost, SiteError> {
        let request = DraftRequest {
            topic: topic.to_string(),
            tone: settings.tone.clone(),
            context: self.store.get_writing_context().await?,
        };
        let draft = self.generator.draft_blog_post(&request).await?;

        let now = Utc::now();
        let status = if settings.auto_publish {
            PostStatus::Published
        } else {
            PostStatus::Draft
        };
        let post = BlogPost {
            id: Uuid::new_v4(),
            slug: self.unique_slug(&draft.title).await?,
            title: draft.title.trim().to_string(),
            excerpt: optional(draft.excerpt),
            content: draft.content,
            category: optional(draft.category),
            tags: draft.tags,
            meta_title: optional(draft.meta_title),
            meta_description: optional(draft.meta_description),
            featured_image_url: None,
            status,
            published_at: (status == PostStatus::Published).then_some(now),
            ai_generated: true,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_blog_post(&post).await?;
        self.record_links(&post).await;
        Ok(post)
    }

    async fn unique_slug(&self, title: &str) -> Result<String, SiteError> {
        let base = slugify(title);
        let mut candidate = base.clone();
        let mut n = 2;
        while self.store.get_blog_post_by_slug(&candidate).await?.is_some() {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        Ok(candidate)
    }

    /// Stores link suggestions for a fresh post; failures are logged only.
    async fn record_links(&self, post: &BlogPost) {
        let suggestions = match self
            .indexing
            .suggest_links(&post.content, DEFAULT_SUGGESTION_LIMIT)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!(post_id = %post.id, error = %e, "link suggestion failed");
                return;
            }
        };
        let relationships: Vec<ContentRelationship> = suggestions
            .into_iter()
            .map(|s| ContentRelationship {
                id: Uuid::new_v4(),
                source_post_id: post.id,
                target_path: s.url_path,
                anchor_text: s.title,
                relevance_score: i32::try_from(s.score).unwrap_or(i32::MAX),
                created_at: post.created_at,
            })
            .collect();
        if let Err(e) = self.store.insert_content_relationships(&relationships).await {
            tracing::warn!(post_id = %post.id, error = %e, "storing link suggestions failed");
        }
    }

    async fn write_log(
        &self,
        topic: &str,
        status: GenerationStatus,
        blog_post_id: Option<Uuid>,
        error_message: Option<String>,
    ) -> Result<(), SiteError> {
        let log = GenerationLog {
            id: Uuid::new_v4(),
            blog_post_id,
            topic: topic.to_string(),
            status,
            error_message,
            created_at: Utc::now(),
        };
        self.store.insert_generation_log(&log).await
    }
}

/// Round-robin topic by number of previous runs.
fn next_topic(topics: &[String], runs: i64) -> Option<String> {
    if topics.is_empty() {
        return None;
    }
    let index = usize::try_from(runs.max(0)).unwrap_or(0) % topics.len();
    topics.get(index).cloned()
}

fn is_due(settings: &GeneratorSettings, now: DateTime<Utc>) -> bool {
    if !settings.is_enabled {
        return false;
    }
    let per_week = i64::from(settings.posts_per_week.max(1));
    let interval = Duration::seconds(WEEK_SECS / per_week);
    settings.last_run_at.is_none_or(|last| now - last >= interval)
}
