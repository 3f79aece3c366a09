//! Database row models.
//!
//! Status columns are stored as `TEXT` with `CHECK` constraints, so every row
//! struct decodes them as `String` and converts into the domain enum through
//! `TryFrom`. A value the domain does not know is reported as
//! [`SiteError::Storage`]. Records without enum columns derive
//! `sqlx::FromRow` directly on the domain type.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    BlogPost, Contact, ContactStatus, GenerationLog, GenerationStatus, PostStatus, Review,
    ReviewStatus,
};
use crate::error::SiteError;

fn corrupt(table: &str, err: &SiteError) -> SiteError {
    SiteError::Storage(format!("unexpected value in {table}: {err}"))
}

/// Row of the `contacts` table.
#[derive(Debug, sqlx::FromRow)]
pub struct ContactRow {
    /// Row identifier.
    pub id: Uuid,
    /// Submitter name.
    pub name: String,
    /// Submitter e-mail.
    pub email: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Service asked about.
    pub service_interest: Option<String>,
    /// Message body.
    pub message: String,
    /// Status text.
    pub status: String,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ContactRow> for Contact {
    type Error = SiteError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let status: ContactStatus = row.status.parse().map_err(|e| corrupt("contacts", &e))?;
        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            phone: row.phone,
            service_interest: row.service_interest,
            message: row.message,
            status,
            created_at: row.created_at,
        })
    }
}

/// Row of the `reviews` table.
#[derive(Debug, sqlx::FromRow)]
pub struct ReviewRow {
    /// Row identifier.
    pub id: Uuid,
    /// Reviewer name.
    pub customer_name: String,
    /// Town or region.
    pub location: Option<String>,
    /// Star rating.
    pub rating: i32,
    /// Review text.
    pub content: String,
    /// Service reviewed.
    pub service_type: Option<String>,
    /// Status text.
    pub status: String,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Publication time.
    pub published_at: Option<DateTime<Utc>>,
}

impl TryFrom<ReviewRow> for Review {
    type Error = SiteError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let status: ReviewStatus = row.status.parse().map_err(|e| corrupt("reviews", &e))?;
        Ok(Self {
            id: row.id,
            customer_name: row.customer_name,
            location: row.location,
            rating: row.rating,
            content: row.content,
            service_type: row.service_type,
            status,
            submitted_at: row.submitted_at,
            published_at: row.published_at,
        })
    }
}

/// Row of the `blog_posts` table.
#[derive(Debug, sqlx::FromRow)]
pub struct BlogPostRow {
    /// Row identifier.
    pub id: Uuid,
    /// Headline.
    pub title: String,
    /// Unique slug.
    pub slug: String,
    /// Teaser.
    pub excerpt: Option<String>,
    /// Body.
    pub content: String,
    /// Category.
    pub category: Option<String>,
    /// Tags (`TEXT[]`).
    pub tags: Vec<String>,
    /// SEO title.
    pub meta_title: Option<String>,
    /// SEO description.
    pub meta_description: Option<String>,
    /// Hero image.
    pub featured_image_url: Option<String>,
    /// Status text.
    pub status: String,
    /// First publication time.
    pub published_at: Option<DateTime<Utc>>,
    /// Generator flag.
    pub ai_generated: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<BlogPostRow> for BlogPost {
    type Error = SiteError;

    fn try_from(row: BlogPostRow) -> Result<Self, Self::Error> {
        let status: PostStatus = row.status.parse().map_err(|e| corrupt("blog_posts", &e))?;
        Ok(Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            category: row.category,
            tags: row.tags,
            meta_title: row.meta_title,
            meta_description: row.meta_description,
            featured_image_url: row.featured_image_url,
            status,
            published_at: row.published_at,
            ai_generated: row.ai_generated,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row of the `blog_generation_logs` table.
#[derive(Debug, sqlx::FromRow)]
pub struct GenerationLogRow {
    /// Row identifier.
    pub id: Uuid,
    /// Post created by the run.
    pub blog_post_id: Option<Uuid>,
    /// Topic written about.
    pub topic: String,
    /// Status text.
    pub status: String,
    /// Failure reason.
    pub error_message: Option<String>,
    /// Run time.
    pub created_at: DateTime<Utc>,
}

impl TryFrom<GenerationLogRow> for GenerationLog {
    type Error = SiteError;

    fn try_from(row: GenerationLogRow) -> Result<Self, Self::Error> {
        let status: GenerationStatus = row
            .status
            .parse()
            .map_err(|e| corrupt("blog_generation_logs", &e))?;
        Ok(Self {
            id: row.id,
            blog_post_id: row.blog_post_id,
            topic: row.topic,
            status,
            error_message: row.error_message,
            created_at: row.created_at,
        })
    }
}

/// Converts a batch of rows, failing on the first corrupt one.
pub(crate) fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, SiteError>
where
    T: TryFrom<R, Error = SiteError>,
{
    rows.into_iter().map(T::try_from).collect()
}
