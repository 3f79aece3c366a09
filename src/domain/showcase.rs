//! Showcase records: gallery images, customer reviews, and the owner
//! profile, plus the gallery filtering rules used by the public site.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::lead::{optional, required};
use crate::error::SiteError;

/// Category value that selects every published image.
pub const ALL_CATEGORIES: &str = "all";

/// A row from the `gallery_images` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct GalleryImage {
    /// Row identifier.
    pub id: Uuid,
    /// Caption title.
    pub title: String,
    /// Optional longer caption.
    pub description: Option<String>,
    /// Category used by the gallery filter (e.g. `"indoor"`).
    pub category: String,
    /// Public image URL.
    pub image_url: String,
    /// Alternative text for accessibility.
    pub alt_text: Option<String>,
    /// Ascending sort key.
    pub display_order: i32,
    /// Only published images appear on the public site.
    pub is_published: bool,
    /// Upload time.
    pub created_at: DateTime<Utc>,
}

/// Create/update payload for a gallery image.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct GalleryImageInput {
    /// Caption title.
    pub title: String,
    /// Optional longer caption.
    #[serde(default)]
    pub description: Option<String>,
    /// Filter category.
    pub category: String,
    /// Public image URL.
    pub image_url: String,
    /// Alternative text.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Ascending sort key.
    #[serde(default)]
    pub display_order: i32,
    /// Published flag (defaults to `true`).
    #[serde(default = "default_true")]
    pub is_published: bool,
}

const fn default_true() -> bool {
    true
}

impl GalleryImageInput {
    /// Trims fields and checks that title, category and URL are present.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] naming the first missing field.
    pub fn validate(self) -> Result<Self, SiteError> {
        Ok(Self {
            title: required("title", &self.title)?,
            description: optional(self.description),
            category: required("category", &self.category)?.to_lowercase(),
            image_url: required("image_url", &self.image_url)?,
            alt_text: optional(self.alt_text),
            display_order: self.display_order,
            is_published: self.is_published,
        })
    }
}

/// Published images matching `category`, in display order.
///
/// `None` and `"all"` (any case) select every published image; any other
/// value keeps only images whose category equals it.
#[must_use]
pub fn filter_gallery(images: &[GalleryImage], category: Option<&str>) -> Vec<GalleryImage> {
    let selected = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES));

    let mut matched: Vec<GalleryImage> = images
        .iter()
        .filter(|img| img.is_published)
        .filter(|img| selected.is_none_or(|c| img.category == c))
        .cloned()
        .collect();
    matched.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then(a.created_at.cmp(&b.created_at))
    });
    matched
}

/// Distinct categories among published images, sorted.
#[must_use]
pub fn gallery_categories(images: &[GalleryImage]) -> Vec<String> {
    images
        .iter()
        .filter(|img| img.is_published)
        .map(|img| img.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Moderation state of a customer review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    /// Awaiting moderation.
    Pending,
    /// Visible on the public site.
    Approved,
    /// Hidden permanently.
    Rejected,
}

impl ReviewStatus {
    /// Database / wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

impl FromStr for ReviewStatus {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(SiteError::InvalidRequest(format!(
                "unknown review status: {other}"
            ))),
        }
    }
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row from the `reviews` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Review {
    /// Row identifier.
    pub id: Uuid,
    /// Reviewer's name as shown publicly.
    pub customer_name: String,
    /// Optional town or region.
    pub location: Option<String>,
    /// Star rating, 1..=5.
    pub rating: i32,
    /// Review text.
    pub content: String,
    /// Service the review is about.
    pub service_type: Option<String>,
    /// Moderation state.
    pub status: ReviewStatus,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Set only while approved.
    pub published_at: Option<DateTime<Utc>>,
}

/// Public review submission payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewReview {
    /// Reviewer's name.
    pub customer_name: String,
    /// Optional town or region.
    #[serde(default)]
    pub location: Option<String>,
    /// Star rating, 1..=5.
    pub rating: i32,
    /// Review text.
    pub content: String,
    /// Service the review is about.
    #[serde(default)]
    pub service_type: Option<String>,
}

impl NewReview {
    /// Checks required fields and the rating range.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] on a blank name or text, or a
    /// rating outside 1..=5.
    pub fn validate(self) -> Result<Self, SiteError> {
        if !(1..=5).contains(&self.rating) {
            return Err(SiteError::Validation(
                "rating must be between 1 and 5".to_string(),
            ));
        }
        Ok(Self {
            customer_name: required("customer_name", &self.customer_name)?,
            location: optional(self.location),
            rating: self.rating,
            content: required("content", &self.content)?,
            service_type: optional(self.service_type),
        })
    }
}

/// The single row of the `owner_profile` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct OwnerProfile {
    /// Row identifier (fixed after the first save).
    pub id: Uuid,
    /// Owner's full name.
    pub name: String,
    /// Job title (e.g. `"Master Sauna Builder"`).
    pub title: Option<String>,
    /// Biography shown on the about page.
    pub bio: String,
    /// Portrait URL.
    pub photo_url: Option<String>,
    /// Years in the trade.
    pub years_experience: Option<i32>,
    /// Certifications and memberships.
    pub certifications: Vec<String>,
    /// Last edit time.
    pub updated_at: DateTime<Utc>,
}

/// Owner-profile edit payload.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct OwnerProfileInput {
    /// Owner's full name.
    pub name: String,
    /// Job title.
    #[serde(default)]
    pub title: Option<String>,
    /// Biography.
    pub bio: String,
    /// Portrait URL.
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Years in the trade.
    #[serde(default)]
    pub years_experience: Option<i32>,
    /// Certifications and memberships.
    #[serde(default)]
    pub certifications: Vec<String>,
}

impl OwnerProfileInput {
    /// Trims fields and drops blank certifications.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Validation`] on a blank name or bio, or a
    /// negative experience value.
    pub fn validate(self) -> Result<Self, SiteError> {
        if self.years_experience.is_some_and(|y| y < 0) {
            return Err(SiteError::Validation(
                "years_experience must not be negative".to_string(),
            ));
        }
        Ok(Self {
            name: required("name", &self.name)?,
            title: optional(self.title),
            bio: required("bio", &self.bio)?,
            photo_url: optional(self.photo_url),
            years_experience: self.years_experience,
            certifications: self
                .certifications
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn image(title: &str, category: &str, order: i32, published: bool) -> GalleryImage {
        GalleryImage {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            category: category.to_string(),
            image_url: format!("https://cdn.example/{title}.jpg"),
            alt_text: None,
            display_order: order,
            is_published: published,
            created_at: Utc::now() + Duration::seconds(i64::from(order)),
        }
    }

    fn sample() -> Vec<GalleryImage> {
        vec![
            image("cedar", "indoor", 2, true),
            image("barrel", "outdoor", 1, true),
            image("draft", "outdoor", 0, false),
            image("steam", "indoor", 0, true),
        ]
    }

    #[test]
    fn category_filter_keeps_only_matching_published() {
        let images = sample();
        let outdoor = filter_gallery(&images, Some("outdoor"));
        assert_eq!(outdoor.len(), 1);
        assert!(outdoor.iter().all(|i| i.category == "outdoor" && i.is_published));
    }

    #[test]
    fn all_selects_every_published_image_in_order() {
        let images = sample();
        let all = filter_gallery(&images, Some("ALL"));
        let titles: Vec<&str> = all.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["steam", "barrel", "cedar"]);
        assert_eq!(filter_gallery(&images, None).len(), 3);
    }

    #[test]
    fn unknown_category_is_empty() {
        assert!(filter_gallery(&sample(), Some("infrared")).is_empty());
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        assert_eq!(gallery_categories(&sample()), vec!["indoor", "outdoor"]);
    }

    #[test]
    fn review_rating_range() {
        let review = |rating| NewReview {
            customer_name: "Mikko".to_string(),
            location: None,
            rating,
            content: "Great löyly".to_string(),
            service_type: None,
        };
        assert!(review(0).validate().is_err());
        assert!(review(6).validate().is_err());
        assert!(review(5).validate().is_ok());
    }

    #[test]
    fn gallery_input_lowercases_category() {
        let input = GalleryImageInput {
            title: " Lakeside ".to_string(),
            description: None,
            category: "Outdoor".to_string(),
            image_url: "https://cdn.example/lake.jpg".to_string(),
            alt_text: Some(String::new()),
            display_order: 3,
            is_published: true,
        };
        let Ok(valid) = input.validate() else {
            panic!("input should validate");
        };
        assert_eq!(valid.title, "Lakeside");
        assert_eq!(valid.category, "outdoor");
        assert_eq!(valid.alt_text, None);
    }
}
