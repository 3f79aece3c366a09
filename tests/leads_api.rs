//! Contact form and newsletter through the HTTP router.

#![allow(clippy::panic)]

mod common;

use std::sync::atomic::Ordering;

use axum::http::StatusCode;
use serde_json::json;

use common::TestApp;
use sauna_site::persistence::{ContactFilter, SiteStore};

fn contact_body() -> serde_json::Value {
    json!({
        "name": "  Aino Virtanen ",
        "email": "Aino@Example.com",
        "phone": "+358 40 123 4567",
        "service_interest": "outdoor-saunas",
        "message": "We would like a barrel sauna for our cabin."
    })
}

#[tokio::test]
async fn contact_is_stored_once_and_mailed_once() {
    let app = TestApp::new();

    let res = app.post("/api/v1/contact", None, contact_body()).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let body = res.json();
    assert_eq!(body["name"], "Aino Virtanen");
    assert_eq!(body["email"], "aino@example.com");
    assert_eq!(body["status"], "new");

    let Ok(stored) = app.store.list_contacts(&ContactFilter::default()).await else {
        panic!("store read failed");
    };
    assert_eq!(stored.len(), 1);
    assert_eq!(app.mailer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failing_mailer_does_not_fail_the_submission() {
    let app = TestApp::new();
    app.mailer.fail.store(true, Ordering::SeqCst);

    let res = app.post("/api/v1/contact", None, contact_body()).await;
    assert_eq!(res.status, StatusCode::CREATED);

    let Ok(stored) = app.store.list_contacts(&ContactFilter::default()).await else {
        panic!("store read failed");
    };
    assert_eq!(stored.len(), 1);
    assert_eq!(app.mailer.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn invalid_contact_is_rejected_without_side_effects() {
    let app = TestApp::new();

    let res = app
        .post(
            "/api/v1/contact",
            None,
            json!({ "name": "Aino", "email": "not-an-email", "message": "Hi" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(res.json()["error"]["message"].is_string());

    let res = app
        .post(
            "/api/v1/contact",
            None,
            json!({ "name": "   ", "email": "aino@example.com", "message": "Hi" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);

    let Ok(stored) = app.store.list_contacts(&ContactFilter::default()).await else {
        panic!("store read failed");
    };
    assert!(stored.is_empty());
    assert_eq!(app.mailer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn duplicate_subscription_conflicts() {
    let app = TestApp::new();
    let body = json!({ "email": "sauna.fan@example.com", "source": "footer" });

    let first = app.post("/api/v1/newsletter/subscribe", None, body.clone()).await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.json()["is_active"], true);

    let second = app
        .post(
            "/api/v1/newsletter/subscribe",
            None,
            json!({ "email": " SAUNA.FAN@example.com " }),
        )
        .await;
    assert_eq!(second.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn unsubscribe_then_resubscribe_reactivates() {
    let app = TestApp::new();
    let email = json!({ "email": "cold.plunge@example.com" });

    let res = app.post("/api/v1/newsletter/subscribe", None, email.clone()).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.json()["id"].clone();

    let res = app.post("/api/v1/newsletter/unsubscribe", None, email.clone()).await;
    assert_eq!(res.status, StatusCode::OK);
    let body = res.json();
    assert_eq!(body["is_active"], false);
    assert!(body["unsubscribed_at"].is_string());

    let res = app.post("/api/v1/newsletter/subscribe", None, email).await;
    assert_eq!(res.status, StatusCode::CREATED);
    let body = res.json();
    assert_eq!(body["id"], id);
    assert_eq!(body["is_active"], true);
}

#[tokio::test]
async fn unsubscribing_an_unknown_address_is_not_found() {
    let app = TestApp::new();
    let res = app
        .post(
            "/api/v1/newsletter/unsubscribe",
            None,
            json!({ "email": "nobody@example.com" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}
