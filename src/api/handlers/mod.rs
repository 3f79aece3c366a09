//! REST endpoint handlers organized by resource.
//!
//! Every resource module exposes `routes()` for the public surface and,
//! where operators manage it, `admin_routes()` mounted under `/admin`.
//! Admin handlers take an [`crate::auth::AdminSession`] argument, so a
//! missing or non-admin session is rejected before the handler runs.

pub mod analytics;
pub mod blog;
pub mod catalog;
pub mod leads;
pub mod pages;
pub mod showcase;
pub mod site_content;
pub mod system;

use axum::Router;
use axum::http::header;
use axum::response::IntoResponse;
use chrono::Utc;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(catalog::routes())
        .merge(leads::routes())
        .merge(showcase::routes())
        .merge(blog::routes())
        .nest("/admin", admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .merge(leads::admin_routes())
        .merge(showcase::admin_routes())
        .merge(blog::admin_routes())
        .merge(site_content::admin_routes())
        .merge(analytics::admin_routes())
}

/// Wraps CSV text as a dated download named after `stem`.
pub(crate) fn csv_attachment(stem: &str, body: String) -> impl IntoResponse {
    let filename = format!("{stem}-{}.csv", Utc::now().format("%Y-%m-%d"));
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    )
}
