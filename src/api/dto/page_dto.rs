//! Page-surface document.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::PageKind;

/// What the page surface returns for a route: SEO metadata plus the data
/// the page renders.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PageView {
    /// Request path.
    pub path: String,
    /// SEO title.
    pub title: String,
    /// SEO meta description.
    pub description: String,
    /// Absolute canonical URL.
    pub canonical: String,
    /// Page kind.
    pub kind: PageKind,
    /// Page-specific payload; `null` for static pages.
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}
