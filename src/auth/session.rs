//! The [`AdminSession`] extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::token_from_headers;
use crate::app_state::AppState;
use crate::domain::AppRole;
use crate::error::SiteError;

/// A verified session whose user holds the `admin` role.
///
/// Use it as a handler argument to gate an endpoint:
///
/// ```ignore
/// async fn list_contacts(session: AdminSession, ...) -> Result<Json<_>, SiteError> {
///     tracing::debug!(user_id = %session.user_id, "listing contacts");
///     ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AdminSession {
    /// Identity-provider user id.
    pub user_id: Uuid,
    /// User e-mail, when present in the token.
    pub email: Option<String>,
    /// When the access token stops being valid.
    pub expires_at: DateTime<Utc>,
}

/// Verifies `token` and checks the admin role.
///
/// # Errors
///
/// Returns [`SiteError::Unauthorized`] when the token is missing or invalid,
/// [`SiteError::Forbidden`] when the user is not an admin, and
/// [`SiteError::Storage`] if the role lookup fails.
pub async fn authorize_admin(
    state: &AppState,
    token: Option<&str>,
) -> Result<AdminSession, SiteError> {
    let token =
        token.ok_or_else(|| SiteError::Unauthorized("missing access token".to_string()))?;
    let claims = state.sessions.verify(token)?;
    if !state.store.has_role(claims.sub, AppRole::Admin).await? {
        tracing::warn!(user_id = %claims.sub, "non-admin user denied console access");
        return Err(SiteError::Forbidden("admin role required".to_string()));
    }
    Ok(AdminSession {
        user_id: claims.sub,
        email: claims.email,
        expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC),
    })
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = SiteError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = token_from_headers(&parts.headers);
        authorize_admin(state, token.as_deref()).await
    }
}
