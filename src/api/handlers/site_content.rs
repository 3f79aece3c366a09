//! Site-content index and search-engine submission (admin only).

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{LinkSuggestionParams, SubmitUrlRequest};
use crate::app_state::AppState;
use crate::auth::AdminSession;
use crate::domain::SiteContent;
use crate::error::{ErrorResponse, SiteError};
use crate::integrations::SubmissionReceipt;
use crate::service::indexing_service::DEFAULT_SUGGESTION_LIMIT;
use crate::service::{IndexReport, LinkSuggestion};

/// `GET /admin/site-content`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/site-content",
    tag = "Admin",
    summary = "List indexed pages",
    responses(
        (status = 200, description = "Index rows by path", body = Vec<SiteContent>),
    )
)]
pub async fn list_site_content(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<SiteContent>>, SiteError> {
    Ok(Json(state.indexing.site_content().await?))
}

/// `POST /admin/site-content/reindex`: summarizes every public page.
///
/// # Errors
///
/// Returns [`SiteError::Storage`] if an upsert fails.
#[utoipa::path(
    post,
    path = "/api/v1/admin/site-content/reindex",
    tag = "Admin",
    summary = "Rebuild the site-content index",
    description = "Pages the AI API cannot summarize fall back to their meta description and title keywords.",
    responses(
        (status = 200, description = "Index report", body = IndexReport),
    )
)]
pub async fn reindex(
    session: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<IndexReport>, SiteError> {
    tracing::info!(user_id = %session.user_id, "site reindex requested");
    Ok(Json(state.indexing.index_site_content().await?))
}

/// `GET /admin/site-content/link-suggestions?text=`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/site-content/link-suggestions",
    tag = "Admin",
    summary = "Suggest internal links for a text",
    params(LinkSuggestionParams),
    responses(
        (status = 200, description = "Suggestions, best first", body = Vec<LinkSuggestion>),
    )
)]
pub async fn link_suggestions(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<LinkSuggestionParams>,
) -> Result<Json<Vec<LinkSuggestion>>, SiteError> {
    let limit = params.limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT);
    Ok(Json(state.indexing.suggest_links(&params.text, limit).await?))
}

/// `POST /admin/search-engine/submit`
///
/// # Errors
///
/// Returns [`SiteError::NotConfigured`] without a service account and
/// [`SiteError::Integration`] when the search engine rejects the call.
#[utoipa::path(
    post,
    path = "/api/v1/admin/search-engine/submit",
    tag = "Admin",
    summary = "Ask the search engine to recrawl a URL",
    request_body = SubmitUrlRequest,
    responses(
        (status = 200, description = "Submission accepted", body = SubmissionReceipt),
        (status = 400, description = "Empty URL", body = ErrorResponse),
        (status = 502, description = "Search engine error", body = ErrorResponse),
        (status = 503, description = "Not configured", body = ErrorResponse),
    )
)]
pub async fn submit_url(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<SubmitUrlRequest>,
) -> Result<Json<SubmissionReceipt>, SiteError> {
    Ok(Json(state.indexing.submit_to_search_engine(&req.url).await?))
}

/// Admin indexing routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/site-content", get(list_site_content))
        .route("/site-content/reindex", post(reindex))
        .route("/site-content/link-suggestions", get(link_suggestions))
        .route("/search-engine/submit", post(submit_url))
}
