//! Lead handlers: contact form, newsletter, and their admin views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::api::dto::{ContactStatusUpdate, UnsubscribeRequest};
use crate::api::handlers::csv_attachment;
use crate::app_state::AppState;
use crate::auth::AdminSession;
use crate::domain::{Contact, NewContact, NewSubscriber, Subscriber};
use crate::error::{ErrorResponse, SiteError};
use crate::persistence::{ContactFilter, SubscriberFilter};
use crate::service::export;

/// `POST /contact`: stores a contact-form submission and notifies the
/// owner by e-mail.
///
/// # Errors
///
/// Returns [`SiteError::Validation`] for incomplete input.
#[utoipa::path(
    post,
    path = "/api/v1/contact",
    tag = "Leads",
    summary = "Submit the contact form",
    description = "Validates and stores the submission, then sends the owner notification. A failing mail server does not fail the request.",
    request_body = NewContact,
    responses(
        (status = 201, description = "Submission stored", body = Contact),
        (status = 422, description = "Invalid input", body = ErrorResponse),
    )
)]
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(req): Json<NewContact>,
) -> Result<impl IntoResponse, SiteError> {
    let contact = state.leads.submit_contact(req).await?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `POST /newsletter/subscribe`
///
/// # Errors
///
/// Returns [`SiteError::Conflict`] when the address is already active.
#[utoipa::path(
    post,
    path = "/api/v1/newsletter/subscribe",
    tag = "Leads",
    summary = "Join the newsletter",
    request_body = NewSubscriber,
    responses(
        (status = 201, description = "Subscribed", body = Subscriber),
        (status = 409, description = "Already subscribed", body = ErrorResponse),
        (status = 422, description = "Invalid address", body = ErrorResponse),
    )
)]
pub async fn subscribe(
    State(state): State<AppState>,
    Json(req): Json<NewSubscriber>,
) -> Result<impl IntoResponse, SiteError> {
    let subscriber = state.leads.subscribe(req).await?;
    Ok((StatusCode::CREATED, Json(subscriber)))
}

/// `POST /newsletter/unsubscribe`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an address that never subscribed.
#[utoipa::path(
    post,
    path = "/api/v1/newsletter/unsubscribe",
    tag = "Leads",
    summary = "Leave the newsletter",
    request_body = UnsubscribeRequest,
    responses(
        (status = 200, description = "Unsubscribed", body = Subscriber),
        (status = 404, description = "Unknown address", body = ErrorResponse),
    )
)]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Json(req): Json<UnsubscribeRequest>,
) -> Result<Json<Subscriber>, SiteError> {
    Ok(Json(state.leads.unsubscribe(&req.email).await?))
}

/// `GET /admin/contacts`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/contacts",
    tag = "Admin",
    summary = "List contact submissions",
    params(ContactFilter),
    responses(
        (status = 200, description = "Contacts, newest first", body = Vec<Contact>),
        (status = 401, description = "No session", body = ErrorResponse),
    )
)]
pub async fn list_contacts(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<ContactFilter>,
) -> Result<Json<Vec<Contact>>, SiteError> {
    Ok(Json(state.leads.list_contacts(&filter).await?))
}

/// `GET /admin/contacts/export`: the filtered list as CSV.
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/contacts/export",
    tag = "Admin",
    summary = "Export contacts as CSV",
    params(ContactFilter),
    responses(
        (status = 200, description = "CSV download", content_type = "text/csv", body = String),
    )
)]
pub async fn export_contacts(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<ContactFilter>,
) -> Result<impl IntoResponse, SiteError> {
    let contacts = state.leads.list_contacts(&filter).await?;
    Ok(csv_attachment("contacts", export::contacts_csv(&contacts)))
}

/// `PATCH /admin/contacts/{id}/status`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    patch,
    path = "/api/v1/admin/contacts/{id}/status",
    tag = "Admin",
    summary = "Set a contact's follow-up state",
    params(("id" = Uuid, Path, description = "Contact id")),
    request_body = ContactStatusUpdate,
    responses(
        (status = 200, description = "Updated contact", body = Contact),
        (status = 404, description = "Unknown contact", body = ErrorResponse),
    )
)]
pub async fn update_contact_status(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ContactStatusUpdate>,
) -> Result<Json<Contact>, SiteError> {
    Ok(Json(state.leads.update_contact_status(id, req.status).await?))
}

/// `DELETE /admin/contacts/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/contacts/{id}",
    tag = "Admin",
    summary = "Delete a contact",
    params(("id" = Uuid, Path, description = "Contact id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown contact", body = ErrorResponse),
    )
)]
pub async fn delete_contact(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    state.leads.delete_contact(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /admin/subscribers`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/subscribers",
    tag = "Admin",
    summary = "List newsletter subscribers",
    params(SubscriberFilter),
    responses(
        (status = 200, description = "Subscribers, newest first", body = Vec<Subscriber>),
    )
)]
pub async fn list_subscribers(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<SubscriberFilter>,
) -> Result<Json<Vec<Subscriber>>, SiteError> {
    Ok(Json(state.leads.list_subscribers(&filter).await?))
}

/// `GET /admin/subscribers/export`
///
/// # Errors
///
/// Returns [`SiteError`] on auth or storage failure.
#[utoipa::path(
    get,
    path = "/api/v1/admin/subscribers/export",
    tag = "Admin",
    summary = "Export subscribers as CSV",
    params(SubscriberFilter),
    responses(
        (status = 200, description = "CSV download", content_type = "text/csv", body = String),
    )
)]
pub async fn export_subscribers(
    _admin: AdminSession,
    State(state): State<AppState>,
    Query(filter): Query<SubscriberFilter>,
) -> Result<impl IntoResponse, SiteError> {
    let subscribers = state.leads.list_subscribers(&filter).await?;
    Ok(csv_attachment(
        "subscribers",
        export::subscribers_csv(&subscribers),
    ))
}

/// `DELETE /admin/subscribers/{id}`
///
/// # Errors
///
/// Returns [`SiteError::NotFound`] for an unknown id.
#[utoipa::path(
    delete,
    path = "/api/v1/admin/subscribers/{id}",
    tag = "Admin",
    summary = "Delete a subscriber",
    params(("id" = Uuid, Path, description = "Subscriber id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Unknown subscriber", body = ErrorResponse),
    )
)]
pub async fn delete_subscriber(
    _admin: AdminSession,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, SiteError> {
    state.leads.delete_subscriber(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Public lead routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/contact", post(submit_contact))
        .route("/newsletter/subscribe", post(subscribe))
        .route("/newsletter/unsubscribe", post(unsubscribe))
}

/// Admin lead routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/contacts", get(list_contacts))
        .route("/contacts/export", get(export_contacts))
        .route("/contacts/{id}", delete(delete_contact))
        .route("/contacts/{id}/status", patch(update_contact_status))
        .route("/subscribers", get(list_subscribers))
        .route("/subscribers/export", get(export_subscribers))
        .route("/subscribers/{id}", delete(delete_subscriber))
}
