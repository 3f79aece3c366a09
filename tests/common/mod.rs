//! Shared harness for the HTTP integration tests: an in-memory app with
//! recording fakes for every outbound integration.

#![allow(dead_code, clippy::panic)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header};
use tower::ServiceExt;
use uuid::Uuid;

use sauna_site::app_state::AppState;
use sauna_site::auth::Claims;
use sauna_site::build_app;
use sauna_site::config::SiteConfig;
use sauna_site::domain::{AppRole, Contact};
use sauna_site::integrations::{
    BlogDraft, ContentGenerator, DraftRequest, IntegrationError, Integrations, Mailer,
    PageSource, PageSummary, SubmissionReceipt, UrlSubmitter,
};
use sauna_site::persistence::{MemoryStore, SiteStore};

/// Counts notification calls; fails on demand.
#[derive(Debug, Default)]
pub struct RecordingMailer {
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_contact_notification(&self, _: &Contact) -> Result<(), IntegrationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(IntegrationError::Build("smtp unavailable".to_string()));
        }
        Ok(())
    }
}

/// Echoes the topic into a fixed draft.
#[derive(Debug, Default)]
pub struct EchoGenerator;

#[async_trait]
impl ContentGenerator for EchoGenerator {
    async fn summarize_page(&self, page: &PageSource) -> Result<PageSummary, IntegrationError> {
        Ok(PageSummary {
            summary: format!("About {}", page.title),
            keywords: page
                .title
                .split_whitespace()
                .map(str::to_lowercase)
                .collect(),
        })
    }

    async fn draft_blog_post(&self, request: &DraftRequest) -> Result<BlogDraft, IntegrationError> {
        Ok(BlogDraft {
            title: format!("All About {}", request.topic),
            excerpt: Some(format!("A short guide to {}.", request.topic)),
            content: format!("Everything about {} and steam rooms.", request.topic),
            category: Some("Guides".to_string()),
            tags: vec![request.topic.clone()],
            meta_title: None,
            meta_description: None,
        })
    }
}

/// Accepts every URL.
#[derive(Debug, Default)]
pub struct AcceptingSubmitter;

#[async_trait]
impl UrlSubmitter for AcceptingSubmitter {
    async fn submit_url(&self, url: &str) -> Result<SubmissionReceipt, IntegrationError> {
        Ok(SubmissionReceipt {
            url: url.to_string(),
            notify_time: Some("2026-03-01T09:30:00Z".to_string()),
        })
    }
}

/// A fully wired in-memory application.
#[derive(Debug)]
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn new() -> Self {
        let config = SiteConfig::in_memory();
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let integrations = Integrations {
            mailer: Arc::clone(&mailer) as Arc<dyn Mailer>,
            generator: Arc::new(EchoGenerator),
            submitter: Arc::new(AcceptingSubmitter),
        };
        let state = AppState::new(
            config,
            Arc::clone(&store) as Arc<dyn SiteStore>,
            integrations,
        );
        Self {
            app: build_app(state.clone()),
            state,
            store,
            mailer,
        }
    }

    /// Signs a token for a fresh user, granting `role` if given.
    pub async fn token(&self, role: Option<AppRole>) -> String {
        self.token_expiring_in(role, 3_600).await
    }

    /// Like [`TestApp::token`], valid for `secs` more seconds.
    pub async fn token_expiring_in(&self, role: Option<AppRole>, secs: i64) -> String {
        let user_id = Uuid::new_v4();
        if let Some(role) = role {
            let granted = self.store.grant_role(user_id, role).await;
            assert!(granted.is_ok());
        }
        let claims = Claims {
            sub: user_id,
            exp: Utc::now().timestamp() + secs,
            email: Some("owner@example-sauna.com".to_string()),
            role: Some("authenticated".to_string()),
        };
        let key = EncodingKey::from_secret(self.state.config.jwt_secret.as_bytes());
        let Ok(token) = jsonwebtoken::encode(&Header::default(), &claims, &key) else {
            panic!("could not sign test token");
        };
        token
    }

    pub async fn admin_token(&self) -> String {
        self.token(Some(AppRole::Admin)).await
    }

    /// Sends one request through the router.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let Ok(request) = builder.body(body) else {
            panic!("invalid test request");
        };
        let Ok(response) = self.app.clone().oneshot(request).await else {
            panic!("router failed");
        };
        let status = response.status();
        let headers = response.headers().clone();
        let Ok(collected) = response.into_body().collect().await else {
            panic!("could not read body");
        };
        TestResponse {
            status,
            headers,
            body: collected.to_bytes(),
        }
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> TestResponse {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: serde_json::Value) -> TestResponse {
        self.send(Method::POST, uri, token, Some(body)).await
    }
}

/// Status, headers and collected body.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        let Ok(value) = serde_json::from_slice(&self.body) else {
            panic!(
                "body is not JSON: {}",
                String::from_utf8_lossy(&self.body)
            );
        };
        value
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn header(&self, name: header::HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
