//! Static catalog endpoints: pages, services, health benefits, FAQ, search.

use axum::extract::Query;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::SearchParams;
use crate::app_state::AppState;
use crate::domain::catalog::{FaqEntry, HealthBenefit, SearchEntry, ServiceOffering};
use crate::domain::{PageDef, catalog};

/// `GET /pages`: every public route with its SEO metadata.
#[utoipa::path(
    get,
    path = "/api/v1/pages",
    tag = "Catalog",
    summary = "List public pages",
    responses(
        (status = 200, description = "Public pages", body = Vec<PageDef>),
    )
)]
pub async fn list_pages() -> Json<Vec<PageDef>> {
    Json(catalog().public_pages().cloned().collect())
}

/// `GET /services`
#[utoipa::path(
    get,
    path = "/api/v1/services",
    tag = "Catalog",
    summary = "List service offerings",
    responses(
        (status = 200, description = "Services in display order", body = Vec<ServiceOffering>),
    )
)]
pub async fn list_services() -> Json<Vec<ServiceOffering>> {
    Json(catalog().services().to_vec())
}

/// `GET /health-benefits`
#[utoipa::path(
    get,
    path = "/api/v1/health-benefits",
    tag = "Catalog",
    summary = "List health-benefit articles",
    responses(
        (status = 200, description = "Articles in display order", body = Vec<HealthBenefit>),
    )
)]
pub async fn list_health_benefits() -> Json<Vec<HealthBenefit>> {
    Json(catalog().health_benefits().to_vec())
}

/// `GET /faq`
#[utoipa::path(
    get,
    path = "/api/v1/faq",
    tag = "Catalog",
    summary = "List FAQ entries",
    responses(
        (status = 200, description = "FAQ", body = Vec<FaqEntry>),
    )
)]
pub async fn list_faq() -> Json<Vec<FaqEntry>> {
    Json(catalog().faq().to_vec())
}

/// `GET /search?q=`: site search over pages, services and articles.
#[utoipa::path(
    get,
    path = "/api/v1/search",
    tag = "Catalog",
    summary = "Search the site",
    description = "Case-insensitive match on title, description or category. At most six hits, in catalog order.",
    params(SearchParams),
    responses(
        (status = 200, description = "Search hits", body = Vec<SearchEntry>),
    )
)]
pub async fn search(Query(params): Query<SearchParams>) -> Json<Vec<SearchEntry>> {
    Json(catalog().search(&params.q))
}

/// Catalog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/pages", get(list_pages))
        .route("/services", get(list_services))
        .route("/health-benefits", get(list_health_benefits))
        .route("/faq", get(list_faq))
        .route("/search", get(search))
}
