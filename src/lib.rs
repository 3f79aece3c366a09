//! # sauna-site
//!
//! HTTP back end for a sauna installation business: the public marketing
//! site's data and forms, and the session-gated admin console.
//!
//! ## Architecture
//!
//! ```text
//! Browser / admin console (HTTP, WebSocket)
//!     │
//!     ├── Page surface + REST handlers (api/)
//!     ├── Live admin feed (ws/)
//!     ├── AdminSession extractor (auth/)
//!     │
//!     ├── Services (service/)
//!     ├── EventBus + static catalog (domain/)
//!     │
//!     ├── SiteStore: PostgreSQL or in-memory (persistence/)
//!     └── Mailer, AI API, search-engine indexing (integrations/)
//! ```

pub mod api;
pub mod app_state;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod persistence;
pub mod service;
pub mod ws;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;

/// Builds the full application router: REST API, page surface, `/ws`, and
/// the tracing, CORS and timeout layers.
pub fn build_app(state: AppState) -> Router {
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    Router::new()
        .route("/ws", get(ws::handler::ws_handler))
        .merge(api::build_router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
