//! Blog handlers: public posts and the admin generation console.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{LimitParams, ScheduledRunResponse};
use crate::app_state::AppState;
use crate::auth::AdminSession;
use crate::domain::{
    BlogPost, BlogPostUpdate, ContentRelationship, GenerationLog, GeneratorSettings,
    GeneratorSettingsInput, WritingContext, WritingContextInput,
};
use crate::error::{ErrorResponse, SiteError};
use crate::persistence::BlogPostFilter;
use crate::service::GenerateRequest;

/// `GET /blog`: published posts, newest first.
///
/// # Errors
///
/// Returns [`SiteError::Storage`] on database failure.
#[utoipa::path(
    get,
    path = "/api/v1/blog",
    tag = "Blog",
    summary = "List published posts",
    responses(
        (status = 200, description = "Published posts", body = Vec<BlogPost>),
    )
)]
pub async fn published_posts(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, SiteError> {
    Ok(Json(state.blog.published_posts().await?))
}

/// `GET /blog/{slug}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for unknown slugs and drafts.
#[utoipa::path(
    get,
    path = "/api/v1/blog/{slug}",
    tag = "Blog",
    summary = "Get a published post",
    params(("slug" = String, Path, description = "Post slug")),
    responses(
        (status = 200, description = "The post", body = BlogPost),
        (status = 404, description = "No such published post", body = ErrorResponse),
    )
)]
pub async fn post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<BlogPost>, SiteError> {
    Ok(Json(state.blog.post_by_slug(&slug).await?))
}

/// `GET /admin/blog/posts?status=`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/blog/posts",
    tag = "Admin",
    summary = "List posts, drafts included",
    params(BlogPostFilter),
    responses(
        (status = 200, description = "Posts", body = Vec<BlogPost>),
    )
)]
pub async fn list_posts(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<BlogPostFilter>,
) -> Result<Json<Vec<BlogPost>>, SiteError> {
    Ok(Json(state.blog.list_posts(&filter).await?))
}

/// `PATCH /admin/blog/posts/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/blog/posts/{id}",
    tag = "Admin",
    summary = "Edit or publish a post",
    description = "Absent fields are left unchanged. Setting `status` to `published` stamps `published_at` the first time.",
    params(("id" = Uuid, Path, description = "Post id")),
    request_body = BlogPostUpdate,
    responses(
        (status = 200, description = "Updated post", body = BlogPost),
        (status = 404, description = "Unknown post", body = ErrorResponse),
        (status = 422, description = "Blank title or content", body = ErrorResponse),
    )
)]
pub async fn update_post(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<BlogPostUpdate>,
) -> Result<Json<BlogPost>, SiteError> {
    Ok(Json(state.blog.update_post(id, req).await?))
}

/// `DELETE /admin/blog/posts/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/blog/posts/{id}",
    tag = "Admin",
    summary = "Delete a post",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown post", body = ErrorResponse),
    )
)]
pub async fn delete_post(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    state.blog.delete_post(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/blog/posts/{id}/relationships`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/blog/posts/{id}/relationships",
    tag = "Admin",
    summary = "Internal-link suggestions recorded for a post",
    params(("id" = Uuid, Path, description = "Post id")),
    responses(
        (status = 200, description = "Suggestions, best first", body = Vec<ContentRelationship>),
    )
)]
pub async fn post_relationships(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ContentRelationship>>, SiteError> {
    Ok(Json(state.blog.relationships(id).await?))
}

/// `GET /admin/blog/settings`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/blog/settings",
    tag = "Admin",
    summary = "Get generator settings",
    responses(
        (status = 200, description = "Saved settings, or the defaults", body = GeneratorSettings),
    )
)]
pub async fn get_settings(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<GeneratorSettings>, SiteError> {
    Ok(Json(state.blog.settings().await?))
}

/// `PUT /admin/blog/settings`
///
/// # Errors
///
/// Returns [`SiteError::Validation`] for an out-of-range cadence.
#[utoipa::path(
    put,
    path = "/api/v1/admin/blog/settings",
    tag = "Admin",
    summary = "Save generator settings",
    request_body = GeneratorSettingsInput,
    responses(
        (status = 200, description = "Saved settings", body = GeneratorSettings),
        (status = 422, description = "Invalid cadence", body = ErrorResponse),
    )
)]
pub async fn put_settings(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<GeneratorSettingsInput>,
) -> Result<Json<GeneratorSettings>, SiteError> {
    Ok(Json(state.blog.update_settings(req).await?))
}

/// `GET /admin/blog/writing-context`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] until one is saved.
#[utoipa::path(
    get,
    path = "/api/v1/admin/blog/writing-context",
    tag = "Admin",
    summary = "Get the writing context",
    responses(
        (status = 200, description = "Writing context", body = WritingContext),
        (status = 404, description = "Not set up yet", body = ErrorResponse),
    )
)]
pub async fn get_writing_context(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<WritingContext>, SiteError> {
    Ok(Json(state.blog.writing_context().await?))
}

/// `PUT /admin/blog/writing-context`
///
/// # Errors
///
/// Returns [`SiteError::Validation`] for a blank business name.
#[utoipa::path(
    put,
    path = "/api/v1/admin/blog/writing-context",
    tag = "Admin",
    summary = "Save the writing context",
    request_body = WritingContextInput,
    responses(
        (status = 200, description = "Saved context", body = WritingContext),
        (status = 422, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn put_writing_context(
    _admin: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<WritingContextInput>,
) -> Result<Json<WritingContext>, SiteError> {
    Ok(Json(state.blog.update_writing_context(req).await?))
}

/// `POST /admin/blog/generate`: generates one post now.
///
/// # Errors
///
/// Returns [`SiteError::NotConfigured`] without an AI API and
/// [`SiteError::Integration`] when generation fails.
#[utoipa::path(
    post,
    path = "/api/v1/admin/blog/generate",
    tag = "Admin",
    summary = "Generate a blog post",
    description = "Uses the given topic or the next one from the settings. Every attempt is logged.",
    request_body = GenerateRequest,
    responses(
        (status = 201, description = "Generated post", body = BlogPost),
        (status = 422, description = "No topic available", body = ErrorResponse),
        (status = 502, description = "AI API failure", body = ErrorResponse),
        (status = 503, description = "AI API not configured", body = ErrorResponse),
    )
)]
pub async fn generate_post(
    session: AdminSession,
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<impl IntoResponse, SiteError> {
    tracing::info!(user_id = %session.user_id, "manual blog generation requested");
    let post = state.blog.generate_post(req).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// `POST /admin/blog/run-scheduled`: scheduler tick.
///
/// # Errors
///
/// Returns the generation error when a due run fails.
#[utoipa::path(
    post,
    path = "/api/v1/admin/blog/run-scheduled",
    tag = "Admin",
    summary = "Run scheduled generation if due",
    responses(
        (status = 200, description = "Tick outcome", body = ScheduledRunResponse),
    )
)]
pub async fn run_scheduled(
    _admin: AdminSession,
    State(state): State<AppState>,
) -> Result<Json<ScheduledRunResponse>, SiteError> {
    let post = state.blog.run_scheduled().await?;
    Ok(Json(ScheduledRunResponse {
        generated: post.is_some(),
        post,
    }))
}

/// `GET /admin/blog/logs?limit=`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/blog/logs",
    tag = "Admin",
    summary = "Recent generation attempts",
    params(LimitParams),
    responses(
        (status = 200, description = "Logs, newest first", body = Vec<GenerationLog>),
    )
)]
pub async fn generation_logs(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> Result<Json<Vec<GenerationLog>>, SiteError> {
    Ok(Json(state.blog.generation_logs(params.limit).await?))
}

/// Public blog routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/blog", get(published_posts))
        .route("/blog/{slug}", get(post_by_slug))
}

/// Admin blog routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/blog/posts", get(list_posts))
        .route("/blog/posts/{id}", patch(update_post).delete(delete_post))
        .route("/blog/posts/{id}/relationships", get(post_relationships))
        .route("/blog/settings", get(get_settings).put(put_settings))
        .route(
            "/blog/writing-context",
            get(get_writing_context).put(put_writing_context),
        )
        .route("/blog/generate", post(generate_post))
        .route("/blog/run-scheduled", post(run_scheduled))
        .route("/blog/logs", get(generation_logs))
}
