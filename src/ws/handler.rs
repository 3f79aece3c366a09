//! Axum WebSocket upgrade handler.

use axum::extract::ws::WebSocketUpgrade;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;

use super::connection::run_connection;
use crate::app_state::AppState;
use crate::auth::{authorize_admin, token_from_headers};
use crate::error::SiteError;

/// Browsers cannot set headers on a WebSocket handshake, so the token may
/// also travel in the query string.
#[derive(Debug, Default, Deserialize)]
pub struct WsAuthParams {
    /// Session access token.
    #[serde(default)]
    pub access_token: Option<String>,
}

/// `GET /ws`: upgrades an admin session to the live event feed.
///
/// # Errors
///
/// Returns [`SiteError::Unauthorized`] or [`SiteError::Forbidden`] before
/// the upgrade when the caller is not an admin.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsAuthParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Result<Response, SiteError> {
    let token = token_from_headers(&headers).or(params.access_token);
    let session = authorize_admin(&state, token.as_deref()).await?;
    let event_rx = state.event_bus.subscribe();
    Ok(ws.on_upgrade(move |socket| run_connection(socket, event_rx, session)))
}
