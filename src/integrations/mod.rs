//! Outbound integrations: e-mail delivery, the generative-AI API, and
//! search-engine URL submission.
//!
//! Each integration is an async trait with a production client and a
//! disabled fallback, chosen by [`Integrations::from_config`] depending on
//! which settings are present.

pub mod generator;
pub mod indexing;
pub mod mailer;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::SiteConfig;
use crate::domain::{Contact, WritingContext};
use crate::error::SiteError;

pub use generator::{ChatCompletionsClient, DisabledGenerator};
pub use indexing::{DisabledSubmitter, GoogleIndexingClient};
pub use mailer::{LogMailer, SmtpMailer};

/// Request timeout for every outbound HTTP client.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of an outbound integration.
#[derive(Debug, thiserror::Error)]
pub enum IntegrationError {
    /// The integration has no credentials configured.
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    /// Transport-level HTTP failure (connect, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status.
    #[error("upstream returned {status}: {body}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// Upstream answered with something we could not interpret.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// SMTP transport failure.
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// A sender or recipient address could not be parsed.
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("email build error: {0}")]
    Build(String),

    /// Service-account assertion could not be signed.
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

impl From<IntegrationError> for SiteError {
    fn from(err: IntegrationError) -> Self {
        match err {
            IntegrationError::NotConfigured(name) => Self::NotConfigured(name),
            other => {
                tracing::error!(error = %other, "integration failure");
                Self::Integration(other.to_string())
            }
        }
    }
}

/// Sends transactional e-mail.
#[async_trait]
pub trait Mailer: fmt::Debug + Send + Sync {
    /// Notifies the owner about a new contact submission and acknowledges
    /// receipt to the submitter.
    async fn send_contact_notification(&self, contact: &Contact) -> Result<(), IntegrationError>;
}

/// A static page handed to the generator for summarizing.
#[derive(Debug, Clone, Serialize)]
pub struct PageSource {
    /// Site path.
    pub path: String,
    /// Page title.
    pub title: String,
    /// Meta description.
    pub description: String,
    /// Page kind (`marketing`, `service`, ...).
    pub kind: String,
}

/// Generator output for one page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PageSummary {
    /// Two-sentence summary.
    pub summary: String,
    /// Keywords for internal linking.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// Input for drafting a blog post.
#[derive(Debug, Clone)]
pub struct DraftRequest {
    /// Topic to write about.
    pub topic: String,
    /// Tone hint.
    pub tone: String,
    /// Brand facts, when the operator saved some.
    pub context: Option<WritingContext>,
}

/// Generator output for a blog post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct BlogDraft {
    /// Headline.
    pub title: String,
    /// Teaser.
    #[serde(default)]
    pub excerpt: Option<String>,
    /// Markdown body.
    pub content: String,
    /// Blog category.
    #[serde(default)]
    pub category: Option<String>,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// SEO title.
    #[serde(default)]
    pub meta_title: Option<String>,
    /// SEO description.
    #[serde(default)]
    pub meta_description: Option<String>,
}

/// Calls a generative-AI API.
#[async_trait]
pub trait ContentGenerator: fmt::Debug + Send + Sync {
    /// Summarizes a page and extracts keywords.
    async fn summarize_page(&self, page: &PageSource) -> Result<PageSummary, IntegrationError>;

    /// Drafts a blog post.
    async fn draft_blog_post(&self, request: &DraftRequest) -> Result<BlogDraft, IntegrationError>;
}

/// Acknowledgement of a URL submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct SubmissionReceipt {
    /// Absolute URL that was submitted.
    pub url: String,
    /// Notification time reported by the search engine.
    pub notify_time: Option<String>,
}

/// Notifies a search engine that a URL changed.
#[async_trait]
pub trait UrlSubmitter: fmt::Debug + Send + Sync {
    /// Submits an absolute URL.
    async fn submit_url(&self, url: &str) -> Result<SubmissionReceipt, IntegrationError>;
}

/// The integration clients the services use.
#[derive(Debug, Clone)]
pub struct Integrations {
    /// E-mail delivery.
    pub mailer: Arc<dyn Mailer>,
    /// Generative-AI API.
    pub generator: Arc<dyn ContentGenerator>,
    /// Search-engine submission.
    pub submitter: Arc<dyn UrlSubmitter>,
}

impl Integrations {
    /// Builds production clients for every configured integration and
    /// disabled fallbacks for the rest.
    ///
    /// # Errors
    ///
    /// Returns an [`IntegrationError`] if a configured client cannot be
    /// constructed (bad SMTP host, TLS backend failure).
    pub fn from_config(config: &SiteConfig) -> Result<Self, IntegrationError> {
        let mailer: Arc<dyn Mailer> = match &config.smtp {
            Some(smtp) => Arc::new(SmtpMailer::new(smtp.clone())?),
            None => {
                tracing::warn!("SMTP not configured, contact e-mails will only be logged");
                Arc::new(LogMailer)
            }
        };
        let generator: Arc<dyn ContentGenerator> = match &config.ai {
            Some(ai) => Arc::new(ChatCompletionsClient::new(ai.clone())?),
            None => {
                tracing::warn!("AI API not configured, generation and indexing will fall back");
                Arc::new(DisabledGenerator)
            }
        };
        let submitter: Arc<dyn UrlSubmitter> = match &config.search_console {
            Some(account) => Arc::new(GoogleIndexingClient::new(account.clone())?),
            None => Arc::new(DisabledSubmitter),
        };
        Ok(Self {
            mailer,
            generator,
            submitter,
        })
    }

    /// Every integration disabled; e-mail is logged.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            mailer: Arc::new(LogMailer),
            generator: Arc::new(DisabledGenerator),
            submitter: Arc::new(DisabledSubmitter),
        }
    }
}

/// Builds the shared HTTP client with the standard timeout.
pub(crate) fn http_client() -> Result<reqwest::Client, IntegrationError> {
    Ok(reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?)
}

/// Turns a non-success response into [`IntegrationError::Upstream`].
pub(crate) async fn check_status(
    response: reqwest::Response,
) -> Result<reqwest::Response, IntegrationError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body: String = response
        .text()
        .await
        .unwrap_or_default()
        .chars()
        .take(512)
        .collect();
    Err(IntegrationError::Upstream {
        status: status.as_u16(),
        body,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_configured_maps_to_503_variant() {
        let err: SiteError = IntegrationError::NotConfigured("AI API").into();
        assert!(matches!(err, SiteError::NotConfigured("AI API")));
        assert_eq!(err.error_code(), 3102);
    }

    #[test]
    fn upstream_failure_maps_to_integration_error() {
        let err: SiteError = IntegrationError::Upstream {
            status: 429,
            body: "slow down".to_string(),
        }
        .into();
        assert!(matches!(err, SiteError::Integration(msg) if msg.contains("429")));
    }

    #[test]
    fn draft_tolerates_missing_optional_fields() {
        let draft: Result<BlogDraft, _> =
            serde_json::from_str(r#"{"title":"Why löyly matters","content":"Body"}"#);
        assert!(matches!(draft, Ok(d) if d.tags.is_empty() && d.excerpt.is_none()));
    }
}
