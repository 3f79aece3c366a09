//! Shared request and query DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{BlogPost, ContactStatus};

/// `?q=` for site search.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Search text; blank returns no hits.
    #[serde(default)]
    pub q: String,
}

/// `?category=` for the public gallery.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GalleryParams {
    /// Category name, or `all`.
    #[serde(default)]
    pub category: Option<String>,
}

/// Newsletter opt-out body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UnsubscribeRequest {
    /// Address to unsubscribe.
    pub email: String,
}

/// Contact follow-up state change.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct ContactStatusUpdate {
    /// New state.
    pub status: ContactStatus,
}

/// Gallery visibility toggle.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PublishedUpdate {
    /// Whether the image is shown publicly.
    pub is_published: bool,
}

/// `?limit=` for log listings.
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitParams {
    /// Maximum rows, 1..=200. Defaults to 50.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            limit: default_limit(),
        }
    }
}

const fn default_limit() -> i64 {
    50
}

/// `?text=&limit=` for internal-link suggestions.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LinkSuggestionParams {
    /// Text to match against indexed page keywords.
    #[serde(default)]
    pub text: String,
    /// Maximum suggestions. Defaults to 5.
    #[serde(default)]
    pub limit: Option<usize>,
}

/// Search-engine submission body.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitUrlRequest {
    /// Site path (`/services/steam-rooms`) or absolute URL.
    pub url: String,
}

/// Result of a scheduler tick.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ScheduledRunResponse {
    /// Whether a post was generated.
    pub generated: bool,
    /// The generated post, if any.
    pub post: Option<BlogPost>,
}
