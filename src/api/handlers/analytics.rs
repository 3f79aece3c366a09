//! Admin analytics dashboard.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::app_state::AppState;
use crate::auth::AdminSession;
use crate::error::{ErrorResponse, SiteError};
use crate::service::{AnalyticsQuery, Dashboard};

/// `GET /admin/analytics?from=&to=`
///
/// # Errors
///
/// Returns [`SiteError::InvalidRequest`] for an inverted or overlong range.
#[utoipa::path(
    get,
    path = "/api/v1/admin/analytics",
    tag = "Admin",
    summary = "Dashboard aggregates",
    description = "Totals, daily buckets and contacts per service for a UTC date range. Defaults to the last 30 days.",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Dashboard", body = Dashboard),
        (status = 400, description = "Invalid range", body = ErrorResponse),
    )
)]
pub async fn dashboard(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<Dashboard>, SiteError> {
    Ok(Json(state.analytics.dashboard(query).await?))
}

/// Admin analytics routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/analytics", get(dashboard))
}
