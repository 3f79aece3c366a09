//! Search-engine URL submission through the Google Indexing API.
//!
//! Authentication uses the service-account flow: an RS256-signed assertion
//! is exchanged for a short-lived OAuth access token, which then authorizes
//! a `URL_UPDATED` notification.

use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{IntegrationError, SubmissionReceipt, UrlSubmitter, check_status, http_client};
use crate::config::ServiceAccountConfig;

const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const PUBLISH_URL: &str = "https://indexing.googleapis.com/v3/urlNotifications:publish";
const INDEXING_SCOPE: &str = "https://www.googleapis.com/auth/indexing";
const ASSERTION_TTL_SECS: i64 = 3_600;

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PublishResponse {
    #[serde(default)]
    url_notification_metadata: Option<NotificationMetadata>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationMetadata {
    #[serde(default)]
    latest_update: Option<LatestUpdate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestUpdate {
    #[serde(default)]
    notify_time: Option<String>,
}

/// Indexing API client authenticated as a service account.
#[derive(Clone)]
pub struct GoogleIndexingClient {
    client: reqwest::Client,
    client_email: String,
    key: EncodingKey,
}

impl std::fmt::Debug for GoogleIndexingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleIndexingClient")
            .field("client_email", &self.client_email)
            .finish_non_exhaustive()
    }
}

impl GoogleIndexingClient {
    /// Parses the service-account key and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Signing`] for an unreadable PEM key and
    /// [`IntegrationError::Http`] if the TLS backend cannot start.
    pub fn new(account: ServiceAccountConfig) -> Result<Self, IntegrationError> {
        let key = EncodingKey::from_rsa_pem(account.private_key_pem.as_bytes())?;
        Ok(Self {
            client: http_client()?,
            client_email: account.client_email,
            key,
        })
    }

    fn assertion(&self, now: i64) -> Result<String, IntegrationError> {
        let claims = AssertionClaims {
            iss: &self.client_email,
            scope: INDEXING_SCOPE,
            aud: TOKEN_URL,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::RS256),
            &claims,
            &self.key,
        )?)
    }

    async fn access_token(&self) -> Result<String, IntegrationError> {
        let assertion = self.assertion(Utc::now().timestamp())?;
        let response = self
            .client
            .post(TOKEN_URL)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await?;
        let token: TokenResponse = check_status(response).await?.json().await?;
        Ok(token.access_token)
    }
}

#[async_trait]
impl UrlSubmitter for GoogleIndexingClient {
    async fn submit_url(&self, url: &str) -> Result<SubmissionReceipt, IntegrationError> {
        let token = self.access_token().await?;
        let response = self
            .client
            .post(PUBLISH_URL)
            .bearer_auth(token)
            .json(&json!({ "url": url, "type": "URL_UPDATED" }))
            .send()
            .await?;
        let published: PublishResponse = check_status(response).await?.json().await?;
        tracing::info!(url, "URL submitted to search engine");
        Ok(receipt(url, published))
    }
}

fn receipt(url: &str, published: PublishResponse) -> SubmissionReceipt {
    SubmissionReceipt {
        url: url.to_string(),
        notify_time: published
            .url_notification_metadata
            .and_then(|m| m.latest_update)
            .and_then(|u| u.notify_time),
    }
}

/// Submitter used when no service account is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledSubmitter;

#[async_trait]
impl UrlSubmitter for DisabledSubmitter {
    async fn submit_url(&self, _url: &str) -> Result<SubmissionReceipt, IntegrationError> {
        Err(IntegrationError::NotConfigured("search engine submission"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receipt_reads_notify_time() {
        let body = r#"{"urlNotificationMetadata":{"url":"https://x.fi/","latestUpdate":
            {"url":"https://x.fi/","type":"URL_UPDATED","notifyTime":"2026-01-02T03:04:05Z"}}}"#;
        let parsed: PublishResponse = serde_json::from_str(body).unwrap_or_default();
        let r = receipt("https://x.fi/", parsed);
        assert_eq!(r.notify_time.as_deref(), Some("2026-01-02T03:04:05Z"));
    }

    #[test]
    fn receipt_tolerates_empty_body() {
        let parsed: PublishResponse = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(receipt("https://x.fi/", parsed).notify_time, None);
    }

    #[test]
    fn invalid_pem_is_rejected() {
        let account = ServiceAccountConfig {
            client_email: "indexer@project.iam.gserviceaccount.com".to_string(),
            private_key_pem: "not a key".to_string(),
        };
        assert!(matches!(
            GoogleIndexingClient::new(account),
            Err(IntegrationError::Signing(_))
        ));
    }

    #[tokio::test]
    async fn disabled_submitter_reports_not_configured() {
        let result = DisabledSubmitter.submit_url("https://x.fi/").await;
        assert!(matches!(result, Err(IntegrationError::NotConfigured(_))));
    }
}
