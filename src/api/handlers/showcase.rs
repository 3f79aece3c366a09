//! Showcase handlers: gallery, reviews, owner profile.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post, put};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{GalleryParams, PublishedUpdate};
use crate::api::handlers::csv_attachment;
use crate::app_state::AppState;
use crate::auth::AdminSession;
use crate::domain::{
    GalleryImage, GalleryImageInput, NewReview, OwnerProfile, OwnerProfileInput, Review,
};
use crate::error::{ErrorResponse, SiteError};
use crate::persistence::ReviewFilter;
use crate::service::export;

// ── public ──────────────────────────────────────────────────────────────────

/// `GET /gallery?category=`: published images, optionally one category.
///
/// # Errors
///
/// Returns [`SiteError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/gallery",
    tag = "Showcase",
    summary = "List published gallery images",
    description = "`category=all` or no category returns every published image.",
    params(GalleryParams),
    responses(
        (status = 200, description = "Images in display order", body = Vec<GalleryImage>),
    )
)]
pub async fn public_gallery(
    State(state): State<AppState>,
    Query(params): Query<GalleryParams>,
) -> Result<Json<Vec<GalleryImage>>, SiteError> {
    Ok(Json(
        state
            .showcase
            .public_gallery(params.category.as_deref())
            .await?,
    ))
}

/// `GET /gallery/categories`
///
/// # Errors
///
/// Returns [`SiteError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/gallery/categories",
    tag = "Showcase",
    summary = "List gallery categories",
    responses(
        (status = 200, description = "Distinct categories of published images", body = Vec<String>),
    )
)]
pub async fn gallery_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, SiteError> {
    Ok(Json(state.showcase.gallery_categories().await?))
}

/// `GET /reviews`: approved reviews, newest first.
///
/// # Errors
///
/// Returns [`SiteError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "Showcase",
    summary = "List approved reviews",
    responses(
        (status = 200, description = "Approved reviews", body = Vec<Review>),
    )
)]
pub async fn approved_reviews(
    State(state): State<AppState>,
) -> Result<Json<Vec<Review>>, SiteError> {
    Ok(Json(state.showcase.approved_reviews().await?))
}

/// `POST /reviews`: queues a review for moderation.
///
/// # Errors
///
/// Returns [`SiteError::Validation`] for a bad rating or missing text.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "Showcase",
    summary = "Submit a review",
    request_body = NewReview,
    responses(
        (status = 201, description = "Review pending moderation", body = Review),
        (status = 422, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn submit_review(
    State(state): State<AppState>,
    Json(req): Json<NewReview>,
) -> Result<impl IntoResponse, SiteError> {
    let review = state.showcase.submit_review(req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// `GET /owner-profile`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] until a profile is saved.
#[utoipa::path(
    get,
    path = "/api/v1/owner-profile",
    tag = "Showcase",
    summary = "Get the owner profile",
    responses(
        (status = 200, description = "Owner profile", body = OwnerProfile),
        (status = 404, description = "Not set up yet", body = ErrorResponse),
    )
)]
pub async fn owner_profile(State(state): State<AppState>) -> Result<Json<OwnerProfile>, SiteError> {
    Ok(Json(state.showcase.owner_profile().await?))
}

// ── admin ───────────────────────────────────────────────────────────────────

/// `GET /admin/gallery`: every image, published or not.
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/gallery",
    tag = "Admin",
    summary = "List all gallery images",
    responses(
        (status = 200, description = "Images in display order", body = Vec<GalleryImage>),
    )
)]
pub async fn list_gallery_images(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<Vec<GalleryImage>>, SiteError> {
    Ok(Json(state.showcase.list_gallery_images().await?))
}

/// `POST /admin/gallery`
///
/// # Errors
///
/// Returns [`SiteError::Validation`] for incomplete input.
#[utoipa::path(
    post,
    path = "/api/v1/admin/gallery",
    tag = "Admin",
    summary = "Add a gallery image",
    request_body = GalleryImageInput,
    responses(
        (status = 201, description = "Image created", body = GalleryImage),
        (status = 422, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn create_gallery_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<GalleryImageInput>,
) -> Result<impl IntoResponse, SiteError> {
    let image = state.showcase.create_gallery_image(req).await?;
    Ok((StatusCode::CREATED, Json(image)))
}

/// `PUT /admin/gallery/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    put,
    path = "/api/v1/admin/gallery/{id}",
    tag = "Admin",
    summary = "Replace a gallery image",
    params(("id" = Uuid, Path, description = "Image id")),
    request_body = GalleryImageInput,
    responses(
        (status = 200, description = "Image updated", body = GalleryImage),
        (status = 404, description = "Unknown image", body = ErrorResponse),
    )
)]
pub async fn update_gallery_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<GalleryImageInput>,
) -> Result<Json<GalleryImage>, SiteError> {
    Ok(Json(state.showcase.update_gallery_image(id, req).await?))
}

/// `PATCH /admin/gallery/{id}/published`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/gallery/{id}/published",
    tag = "Admin",
    summary = "Show or hide a gallery image",
    params(("id" = Uuid, Path, description = "Image id")),
    request_body = PublishedUpdate,
    responses(
        (status = 200, description = "Image updated", body = GalleryImage),
        (status = 404, description = "Unknown image", body = ErrorResponse),
    )
)]
pub async fn set_gallery_image_published(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PublishedUpdate>,
) -> Result<Json<GalleryImage>, SiteError> {
    Ok(Json(
        state
            .showcase
            .set_gallery_image_published(id, req.is_published)
            .await?,
    ))
}

/// `DELETE /admin/gallery/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/gallery/{id}",
    tag = "Admin",
    summary = "Delete a gallery image",
    params(("id" = Uuid, Path, description = "Image id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown image", body = ErrorResponse),
    )
)]
pub async fn delete_gallery_image(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    state.showcase.delete_gallery_image(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/reviews`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/reviews",
    tag = "Admin",
    summary = "List reviews",
    params(ReviewFilter),
    responses(
        (status = 200, description = "Reviews, newest first", body = Vec<Review>),
    )
)]
pub async fn list_reviews(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Result<Json<Vec<Review>>, SiteError> {
    Ok(Json(state.showcase.list_reviews(&filter).await?))
}

/// `GET /admin/reviews/export`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/reviews/export",
    tag = "Admin",
    summary = "Export reviews as CSV",
    params(ReviewFilter),
    responses(
        (status = 200, description = "CSV download", content_type = "text/csv", body = String),
    )
)]
pub async fn export_reviews(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<ReviewFilter>,
) -> Result<impl IntoResponse, SiteError> {
    let reviews = state.showcase.list_reviews(&filter).await?;
    Ok(csv_attachment("reviews", export::reviews_csv(&reviews)))
}

/// `POST /admin/reviews/{id}/approve`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reviews/{id}/approve",
    tag = "Admin",
    summary = "Approve a review",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Approved, with a published timestamp", body = Review),
        (status = 404, description = "Unknown review", body = ErrorResponse),
    )
)]
pub async fn approve_review(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Review>, SiteError> {
    Ok(Json(state.showcase.approve_review(id).await?))
}

/// `POST /admin/reviews/{id}/reject`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    post,
    path = "/api/v1/admin/reviews/{id}/reject",
    tag = "Admin",
    summary = "Reject a review",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 200, description = "Rejected", body = Review),
        (status = 404, description = "Unknown review", body = ErrorResponse),
    )
)]
pub async fn reject_review(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Review>, SiteError> {
    Ok(Json(state.showcase.reject_review(id).await?))
}

/// `DELETE /admin/reviews/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/reviews/{id}",
    tag = "Admin",
    summary = "Delete a review",
    params(("id" = Uuid, Path, description = "Review id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown review", body = ErrorResponse),
    )
)]
pub async fn delete_review(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    state.showcase.delete_review(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /admin/owner-profile`
///
/// # Errors
///
/// Returns [`SiteError::Validation`] for incomplete input.
#[utoipa::path(
    put,
    path = "/api/v1/admin/owner-profile",
    tag = "Admin",
    summary = "Create or replace the owner profile",
    request_body = OwnerProfileInput,
    responses(
        (status = 200, description = "Saved profile", body = OwnerProfile),
        (status = 422, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn update_owner_profile(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<OwnerProfileInput>,
) -> Result<Json<OwnerProfile>, SiteError> {
    Ok(Json(state.showcase.update_owner_profile(req).await?))
}

/// Public showcase routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/gallery", get(public_gallery))
        .route("/gallery/categories", get(gallery_categories))
        .route("/reviews", get(approved_reviews).post(submit_review))
        .route("/owner-profile", get(owner_profile))
}

/// Admin showcase routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/gallery",
            get(list_gallery_images).post(create_gallery_image),
        )
        .route(
            "/gallery/{id}",
            put(update_gallery_image).delete(delete_gallery_image),
        )
        .route("/gallery/{id}/published", patch(set_gallery_image_published))
        .route("/reviews", get(list_reviews))
        .route("/reviews/export", get(export_reviews))
        .route("/reviews/{id}", delete(delete_review))
        .route("/reviews/{id}/approve", post(approve_review))
        .route("/reviews/{id}/reject", post(reject_review))
        .route("/owner-profile", put(update_owner_profile))
}
