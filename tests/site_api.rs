//! Public page surface, catalog search, blog publishing and analytics.

#![allow(clippy::panic)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn health_reports_healthy() {
    let app = TestApp::new();
    let res = app.get("/health", None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.json()["status"], "healthy");
}

#[tokio::test]
async fn search_is_capped_at_six_hits() {
    let app = TestApp::new();

    let hits = app.get("/api/v1/search?q=sauna", None).await.json();
    assert_eq!(hits.as_array().map(Vec::len), Some(6));

    let none = app.get("/api/v1/search?q=%20%20", None).await.json();
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn marketing_pages_carry_canonical_urls() {
    let app = TestApp::new();

    let res = app.get("/services/infrared-saunas/", None).await;
    assert_eq!(res.status, StatusCode::OK);
    let page = res.json();
    assert_eq!(page["kind"], "service");
    assert_eq!(
        page["canonical"],
        "https://example-sauna.com/services/infrared-saunas"
    );
    assert_eq!(page["content"]["slug"], "infrared-saunas");

    let about = app.get("/about", None).await;
    assert_eq!(about.status, StatusCode::OK);
    assert!(about.json()["content"].is_null());
}

#[tokio::test]
async fn unknown_paths_are_not_found() {
    let app = TestApp::new();

    assert_eq!(app.get("/no-such-page", None).await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        app.get("/blog/never-written", None).await.status,
        StatusCode::NOT_FOUND
    );
    let res = app
        .send(Method::POST, "/about", None, Some(json!({})))
        .await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generated_draft_is_hidden_until_published() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let res = app
        .post(
            "/api/v1/admin/blog/generate",
            Some(&admin),
            json!({ "topic": "Cold Plunge Recovery" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);
    let post = res.json();
    assert_eq!(post["status"], "draft");
    assert_eq!(post["ai_generated"], true);
    assert_eq!(post["slug"], "all-about-cold-plunge-recovery");
    let Some(id) = post["id"].as_str() else {
        panic!("post id missing");
    };

    let page = app.get("/blog/all-about-cold-plunge-recovery", None).await;
    assert_eq!(page.status, StatusCode::NOT_FOUND);

    let res = app
        .send(
            Method::PATCH,
            &format!("/api/v1/admin/blog/posts/{id}"),
            Some(&admin),
            Some(json!({ "status": "published" })),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert!(res.json()["published_at"].is_string());

    let page = app.get("/blog/all-about-cold-plunge-recovery", None).await;
    assert_eq!(page.status, StatusCode::OK);
    let view = page.json();
    assert_eq!(view["kind"], "blog_post");
    assert_eq!(view["title"], "All About Cold Plunge Recovery");
    assert_eq!(view["description"], "A short guide to Cold Plunge Recovery.");

    let listed = app.get("/api/v1/blog", None).await.json();
    assert_eq!(listed.as_array().map(Vec::len), Some(1));

    let logs = app.get("/api/v1/admin/blog/logs", Some(&admin)).await.json();
    assert_eq!(logs[0]["status"], "success");
    assert_eq!(logs[0]["topic"], "Cold Plunge Recovery");
}

#[tokio::test]
async fn generation_without_topics_is_rejected() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let res = app
        .post("/api/v1/admin/blog/generate", Some(&admin), json!({}))
        .await;
    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn reindex_feeds_link_suggestions() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let res = app
        .send(Method::POST, "/api/v1/admin/site-content/reindex", Some(&admin), None)
        .await;
    assert_eq!(res.status, StatusCode::OK);
    let report = res.json();
    assert!(report["indexed"].as_u64().is_some_and(|n| n > 0));
    assert_eq!(report["fallbacks"], 0);

    let suggestions = app
        .get(
            "/api/v1/admin/site-content/link-suggestions?text=is%20infrared%20heat%20right%20for%20us",
            Some(&admin),
        )
        .await
        .json();
    let Some(suggestions) = suggestions.as_array() else {
        panic!("suggestions should be an array");
    };
    assert!(
        suggestions
            .iter()
            .any(|s| s["url_path"] == "/services/infrared-saunas")
    );
}

#[tokio::test]
async fn search_engine_submission_resolves_paths() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let res = app
        .post(
            "/api/v1/admin/search-engine/submit",
            Some(&admin),
            json!({ "url": "/services/steam-rooms" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(
        res.json()["url"],
        "https://example-sauna.com/services/steam-rooms"
    );
}

#[tokio::test]
async fn analytics_counts_today_and_rejects_inverted_ranges() {
    let app = TestApp::new();
    let admin = app.admin_token().await;

    let res = app
        .post(
            "/api/v1/contact",
            None,
            json!({
                "name": "Eero",
                "email": "eero@example.com",
                "service_interest": "steam-rooms",
                "message": "Steam room for a spa."
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    let res = app.get("/api/v1/admin/analytics", Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK);
    let dashboard = res.json();
    assert_eq!(dashboard["totals"]["contacts"], 1);
    assert_eq!(dashboard["daily"].as_array().map(Vec::len), Some(30));
    assert_eq!(dashboard["contacts_by_service"][0]["service"], "steam-rooms");

    let res = app
        .get(
            "/api/v1/admin/analytics?from=2026-03-10&to=2026-03-01",
            Some(&admin),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
}
