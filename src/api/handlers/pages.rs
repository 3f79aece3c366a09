//! Page surface: resolves a site path to its SEO metadata and content.
//!
//! Mounted as the router fallback, so every path that is not an API route
//! lands here. Admin pages require an admin session; visitors without one
//! are redirected to the login screen.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, Method, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;
use serde_json::{Value, json};

use crate::api::dto::PageView;
use crate::app_state::AppState;
use crate::auth::{AdminSession, authorize_admin, token_from_headers};
use crate::domain::catalog::ADMIN_LOGIN_PATH;
use crate::domain::{BlogPost, PageDef, PageKind, catalog};
use crate::error::SiteError;

/// Approved reviews shown on the home page.
const HOME_REVIEW_COUNT: usize = 3;

enum Outcome {
    View(Box<PageView>),
    ToLogin,
}

/// `GET <any page path>`: the page document, a redirect to the admin
/// login, or 404.
pub async fn render_page(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return SiteError::not_found("route", format!("{method} {}", uri.path())).into_response();
    }
    match resolve(&state, uri.path(), &headers).await {
        Ok(Outcome::View(view)) => Json(view).into_response(),
        Ok(Outcome::ToLogin) => Redirect::to(ADMIN_LOGIN_PATH).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn resolve(state: &AppState, raw_path: &str, headers: &HeaderMap) -> Result<Outcome, SiteError> {
    let path = normalize(raw_path);

    let session = if is_protected(path) {
        let token = token_from_headers(headers);
        match authorize_admin(state, token.as_deref()).await {
            Ok(session) => Some(session),
            Err(SiteError::Unauthorized(_) | SiteError::Forbidden(_)) => {
                tracing::debug!(path, "admin page without admin session");
                return Ok(Outcome::ToLogin);
            }
            Err(e) => return Err(e),
        }
    } else {
        None
    };

    if let Some(page) = catalog().find_page(path) {
        let content = page_content(state, page, session.as_ref()).await?;
        return Ok(Outcome::View(Box::new(view(state, page, content))));
    }

    if let Some(slug) = path.strip_prefix("/blog/")
        && !slug.contains('/')
    {
        let post = state.blog.post_by_slug(slug).await?;
        return Ok(Outcome::View(Box::new(post_view(state, path, &post)?)));
    }

    Err(SiteError::not_found("page", path))
}

/// Strips a trailing slash; the empty path is home.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Every `/admin` path except the login screen.
fn is_protected(path: &str) -> bool {
    (path == "/admin" || path.starts_with("/admin/")) && path != ADMIN_LOGIN_PATH
}

fn canonical(state: &AppState, path: &str) -> String {
    format!("{}{path}", state.config.base_url)
}

fn view(state: &AppState, page: &PageDef, content: Value) -> PageView {
    PageView {
        path: page.path.clone(),
        title: page.title.clone(),
        description: page.description.clone(),
        canonical: canonical(state, &page.path),
        kind: page.kind,
        content,
    }
}

fn post_view(state: &AppState, path: &str, post: &BlogPost) -> Result<PageView, SiteError> {
    Ok(PageView {
        path: path.to_string(),
        title: post.meta_title.clone().unwrap_or_else(|| post.title.clone()),
        description: post
            .meta_description
            .clone()
            .or_else(|| post.excerpt.clone())
            .unwrap_or_default(),
        canonical: canonical(state, path),
        kind: PageKind::BlogPost,
        content: to_content(post)?,
    })
}

fn to_content<T: Serialize + ?Sized>(value: &T) -> Result<Value, SiteError> {
    serde_json::to_value(value).map_err(|e| SiteError::Internal(e.to_string()))
}

async fn page_content(
    state: &AppState,
    page: &PageDef,
    session: Option<&AdminSession>,
) -> Result<Value, SiteError> {
    let site = catalog();
    match page.path.as_str() {
        "/" => {
            let reviews = state.showcase.approved_reviews().await?;
            let latest: Vec<_> = reviews.into_iter().take(HOME_REVIEW_COUNT).collect();
            Ok(json!({
                "services": to_content(site.services())?,
                "reviews": to_content(&latest)?,
            }))
        }
        "/about" => match state.showcase.owner_profile().await {
            Ok(profile) => to_content(&profile),
            Err(SiteError::NotFound { .. }) => Ok(Value::Null),
            Err(e) => Err(e),
        },
        "/services" | "/contact" => to_content(site.services()),
        "/health-benefits" => to_content(site.health_benefits()),
        "/gallery" => Ok(json!({
            "images": to_content(&state.showcase.public_gallery(None).await?)?,
            "categories": to_content(&state.showcase.gallery_categories().await?)?,
        })),
        "/reviews" => to_content(&state.showcase.approved_reviews().await?),
        "/faq" => to_content(site.faq()),
        "/blog" => to_content(&state.blog.published_posts().await?),
        path => match page.kind {
            PageKind::Service => path
                .strip_prefix("/services/")
                .and_then(|slug| site.service(slug))
                .map_or(Ok(Value::Null), to_content),
            PageKind::HealthBenefit => path
                .strip_prefix("/health-benefits/")
                .and_then(|slug| site.health_benefit(slug))
                .map_or(Ok(Value::Null), to_content),
            PageKind::Admin => Ok(session.map_or(Value::Null, |s| {
                json!({ "user_id": s.user_id, "email": s.email })
            })),
            PageKind::Marketing | PageKind::Legal | PageKind::BlogPost => Ok(Value::Null),
        },
    }
}
