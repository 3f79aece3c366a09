//! Blog and content-index records: posts, generator settings, generation
//! logs, writing context, indexed site content, and internal links.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::lead::{optional, required};
use crate::error::SiteError;

/// Bounds for [`GeneratorSettings::posts_per_week`].
pub const POSTS_PER_WEEK_RANGE: std::ops::RangeInclusive<i32> = 1..=14;

/// Publication state of a blog post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    /// Only visible in the admin console.
    Draft,
    /// Visible on the public blog.
    Published,
}

impl PostStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

impl FromStr for PostStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            other => Err(SiteError::InvalidRequest(format!(
                "unknown post status: {other}"
            ))),
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `blog_posts` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    /// Row identifier.
    pub id: Uuid,
    /// Headline.
    pub title: String,
    /// Unique URL slug.
    pub slug: String,
    /// Teaser shown in listings.
    pub excerpt: Option<String>,
    /// Markdown body.
    pub content: String,
    /// Blog category.
    pub category: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// SEO `<title>` override.
    pub meta_title: Option<String>,
    /// SEO meta description.
    pub meta_description: Option<String>,
    /// Hero image URL.
    pub featured_image_url: Option<String>,
    /// Publication state.
    pub status: PostStatus,
    /// Set the first time the post is published.
    pub published_at: Option<DateTime<Utc>>,
    /// Whether the post came out of the generator.
    pub ai_generated: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

/// Partial update for a blog post; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct BlogPostUpdate {
    /// New headline.
    #[serde(default)]
    pub title: Option<String>,
    /// New teaser.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// New body.
    #[serde(default)]
    pub content: Option<String>,
    /// New category.
    #[serde(default)]
    pub category: Option<String>,
    /// Replacement tag list.
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    /// New SEO title.
    #[serde(default)]
    pub meta_title: Option<String>,
    /// New SEO description.
    #[serde(default)]
    pub meta_description: Option<String>,
    /// New hero image.
    #[serde(default)]
    pub featured_image_url: Option<String>,
    /// New publication state.
    #[serde(default)]
    pub status: Option<PostStatus>,
}

impl BlogPost {
    /// Applies `update` in place, stamping `published_at` on the first
    /// transition to [`PostStatus::Published`].
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] if the title or body would become
    /// blank.
    pub fn apply(&mut self, update: BlogPostUpdate, now: DateTime<Utc>) -> Result<(), SiteError> {
        if let Some(title) = update.title {
            self.title = required("title", &title)?;
        }
        if let Some(content) = update.content {
            self.content = required("content", &content)?;
        }
        if update.excerpt.is_some() {
            self.excerpt = optional(update.excerpt);
        }
        if update.category.is_some() {
            self.category = optional(update.category);
        }
        if let Some(tags) = update.tags {
            self.tags = tags
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect();
        }
        if update.meta_title.is_some() {
            self.meta_title = optional(update.meta_title);
        }
        if update.meta_description.is_some() {
            self.meta_description = optional(update.meta_description);
        }
        if update.featured_image_url.is_some() {
            self.featured_image_url = optional(update.featured_image_url);
        }
        if let Some(status) = update.status {
            if status == PostStatus::Published && self.published_at.is_none() {
                self.published_at = Some(now);
            }
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}

/// The single row of `blog_generator_settings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct GeneratorSettings {
    /// Row identifier.
    pub id: Uuid,
    /// Master switch for scheduled generation.
    pub is_enabled: bool,
    /// Target cadence, 1..=14.
    pub posts_per_week: i32,
    /// Topic rotation.
    pub topics: Vec<String>,
    /// Writing tone hint (e.g. `"friendly"`).
    pub tone: String,
    /// Publish generated posts immediately instead of as drafts.
    pub auto_publish: bool,
    /// Last scheduled run that produced a post.
    pub last_run_at: Option<DateTime<Utc>>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl GeneratorSettings {
    /// Settings used before an operator saves any.
    #[must_use]
    pub fn defaults(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            is_enabled: false,
            posts_per_week: 1,
            topics: Vec::new(),
            tone: "friendly".to_string(),
            auto_publish: false,
            last_run_at: None,
            updated_at: now,
        }
    }
}

/// Settings edit payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GeneratorSettingsInput {
    /// Master switch.
    pub is_enabled: bool,
    /// Target cadence, 1..=14.
    pub posts_per_week: i32,
    /// Topic rotation.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Writing tone hint.
    #[serde(default)]
    pub tone: Option<String>,
    /// Publish generated posts immediately.
    #[serde(default)]
    pub auto_publish: bool,
}

impl GeneratorSettingsInput {
    /// Checks the cadence bounds and cleans the topic list.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] for an out-of-range cadence.
    pub fn validate(self) -> Result<Self, SiteError> {
        if !POSTS_PER_WEEK_RANGE.contains(&self.posts_per_week) {
            return Err(SiteError::Validation(format!(
                "posts_per_week must be between {} and {}",
                POSTS_PER_WEEK_RANGE.start(),
                POSTS_PER_WEEK_RANGE.end()
            )));
        }
        Ok(Self {
            is_enabled: self.is_enabled,
            posts_per_week: self.posts_per_week,
            topics: self
                .topics
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
            tone: optional(self.tone),
            auto_publish: self.auto_publish,
        })
    }
}

/// Outcome of one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    /// A post was created.
    Success,
    /// The generator or storage failed.
    Failed,
}

impl GenerationStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for GenerationStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(Self::Success),
            "failed" => Ok(Self::Failed),
            other => Err(SiteError::InvalidRequest(format!(
                "unknown generation status: {other}"
            ))),
        }
    }
}

/// A row from `blog_generation_logs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenerationLog {
    /// Row identifier.
    pub id: Uuid,
    /// Post created by this run, if any.
    pub blog_post_id: Option<Uuid>,
    /// Topic the run wrote about.
    pub topic: String,
    /// Outcome.
    pub status: GenerationStatus,
    /// Failure reason.
    pub error_message: Option<String>,
    /// Run time.
    pub created_at: DateTime<Utc>,
}

/// The single row of `blog_writing_context`: brand facts fed to the
/// generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct WritingContext {
    /// Row identifier.
    pub id: Uuid,
    /// Business name used in copy.
    pub business_name: String,
    /// Region the business serves.
    pub service_area: Option<String>,
    /// Voice and style notes.
    pub brand_voice: Option<String>,
    /// Points every post should reinforce.
    pub key_messages: Vec<String>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

/// Writing-context edit payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WritingContextInput {
    /// Business name.
    pub business_name: String,
    /// Region served.
    #[serde(default)]
    pub service_area: Option<String>,
    /// Voice notes.
    #[serde(default)]
    pub brand_voice: Option<String>,
    /// Key messages.
    #[serde(default)]
    pub key_messages: Vec<String>,
}

/// A row from `site_content`: the AI-summarized index of one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct SiteContent {
    /// Row identifier.
    pub id: Uuid,
    /// Unique site path (e.g. `/services/custom-sauna-builds`).
    pub url_path: String,
    /// Page title.
    pub title: String,
    /// Short summary.
    pub summary: String,
    /// Lower-case keywords used for link suggestions.
    pub keywords: Vec<String>,
    /// Page kind (e.g. `"service"`).
    pub content_type: String,
    /// Last indexing time.
    pub last_indexed_at: DateTime<Utc>,
}

/// A row from `content_relationships`: a suggested internal link from a
/// blog post to a site page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct ContentRelationship {
    /// Row identifier.
    pub id: Uuid,
    /// Post the link appears in.
    pub source_post_id: Uuid,
    /// Site path the link points to.
    pub target_path: String,
    /// Suggested anchor text.
    pub anchor_text: String,
    /// Keyword-overlap score.
    pub relevance_score: i32,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// Kebab-case slug from a title: ASCII alphanumerics kept, Nordic letters
/// folded, everything else collapsed into single dashes.
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.to_lowercase().chars() {
        let mapped = match ch {
            'ä' | 'å' | 'á' | 'à' => Some('a'),
            'ö' | 'ø' | 'ó' | 'ò' => Some('o'),
            'ü' | 'ú' => Some('u'),
            'é' | 'è' => Some('e'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        };
        match mapped {
            Some(c) => slug.push(c),
            None if !slug.is_empty() && !slug.ends_with('-') => slug.push('-'),
            None => {}
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn draft() -> BlogPost {
        let now = Utc::now();
        BlogPost {
            id: Uuid::new_v4(),
            title: "Sauna 101".to_string(),
            slug: "sauna-101".to_string(),
            excerpt: None,
            content: "Body".to_string(),
            category: None,
            tags: Vec::new(),
            meta_title: None,
            meta_description: None,
            featured_image_url: None,
            status: PostStatus::Draft,
            published_at: None,
            ai_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn slugify_folds_and_collapses() {
        assert_eq!(slugify("Löyly & You: 5 Tips!"), "loyly-you-5-tips");
        assert_eq!(slugify("  --  "), "post");
        assert_eq!(slugify("Cold plunge"), "cold-plunge");
    }

    #[test]
    fn first_publish_stamps_timestamp_once() {
        let mut post = draft();
        let first = Utc::now();
        let publish = BlogPostUpdate {
            status: Some(PostStatus::Published),
            ..BlogPostUpdate::default()
        };
        assert!(post.apply(publish.clone(), first).is_ok());
        assert_eq!(post.published_at, Some(first));

        let later = first + chrono::Duration::days(1);
        assert!(post.apply(publish, later).is_ok());
        assert_eq!(post.published_at, Some(first));
        assert_eq!(post.updated_at, later);
    }

    #[test]
    fn blank_title_update_is_rejected() {
        let mut post = draft();
        let update = BlogPostUpdate {
            title: Some("   ".to_string()),
            ..BlogPostUpdate::default()
        };
        assert!(post.apply(update, Utc::now()).is_err());
    }

    #[test]
    fn cadence_bounds() {
        let input = |posts_per_week| GeneratorSettingsInput {
            is_enabled: true,
            posts_per_week,
            topics: vec![" cold plunges ".to_string(), String::new()],
            tone: None,
            auto_publish: false,
        };
        assert!(input(0).validate().is_err());
        assert!(input(15).validate().is_err());
        let Ok(valid) = input(3).validate() else {
            panic!("cadence 3 should validate");
        };
        assert_eq!(valid.topics, vec!["cold plunges"]);
    }
}
