//! Indexing service: summarizes static pages into `site_content`, suggests
//! internal links from that index, and submits URLs to the search engine.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{EventBus, PageDef, SiteContent, SiteEvent, catalog};
use crate::error::SiteError;
use crate::integrations::{ContentGenerator, PageSource, SubmissionReceipt, UrlSubmitter};
use crate::persistence::SiteStore;

/// Default number of link suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Outcome of a full reindex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct IndexReport {
    /// Pages written to `site_content`.
    pub indexed: usize,
    /// Pages that used the fallback summary because the generator failed.
    pub fallbacks: usize,
}

/// A suggested internal link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LinkSuggestion {
    /// Target path.
    pub url_path: String,
    /// Target page title, usable as anchor text.
    pub title: String,
    /// Number of the page's keywords found in the text.
    pub score: usize,
}

/// Orchestrates the content index.
#[derive(Debug, Clone)]
pub struct IndexingService {
    store: Arc<dyn SiteStore>,
    generator: Arc<dyn ContentGenerator>,
    submitter: Arc<dyn UrlSubmitter>,
    event_bus: EventBus,
    base_url: String,
}

impl IndexingService {
    /// Creates a new `IndexingService`. `base_url` must not end in `/`.
    #[must_use]
    pub fn new(
        store: Arc<dyn SiteStore>,
        generator: Arc<dyn ContentGenerator>,
        submitter: Arc<dyn UrlSubmitter>,
        event_bus: EventBus,
        base_url: String,
    ) -> Self {
        Self {
            store,
            generator,
            submitter,
            event_bus,
            base_url,
        }
    }

    /// Summarizes every public page and upserts it into `site_content`.
    ///
    /// Pages are processed one after another. A generator failure for one
    /// page falls back to its meta description and title keywords.
    ///
    /// # Errors
    ///
    /// Returns a storage error if an upsert fails; pages already written
    /// stay written.
    pub async fn index_site_content(&self) -> Result<IndexReport, SiteError> {
        let mut report = IndexReport {
            indexed: 0,
            fallbacks: 0,
        };
        for page in catalog().public_pages() {
            let source = PageSource {
                path: page.path.clone(),
                title: page.title.clone(),
                description: page.description.clone(),
                kind: page.kind.as_str().to_string(),
            };
            let (summary, keywords) = match self.generator.summarize_page(&source).await {
                Ok(summary) => (summary.summary, normalize_keywords(summary.keywords)),
                Err(e) => {
                    tracing::warn!(path = %page.path, error = %e, "page summary failed, using fallback");
                    report.fallbacks += 1;
                    fallback_summary(page)
                }
            };
            let content = SiteContent {
                id: Uuid::new_v4(),
                url_path: page.path.clone(),
                title: page.title.clone(),
                summary,
                keywords,
                content_type: page.kind.as_str().to_string(),
                last_indexed_at: Utc::now(),
            };
            self.store.upsert_site_content(&content).await?;
            report.indexed += 1;
        }

        tracing::info!(
            indexed = report.indexed,
            fallbacks = report.fallbacks,
            "site content indexed"
        );
        let _ = self.event_bus.publish(SiteEvent::SiteContentIndexed {
            indexed: report.indexed,
            fallbacks: report.fallbacks,
            timestamp: Utc::now(),
        });
        Ok(report)
    }

    /// Every indexed page, by path.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn site_content(&self) -> Result<Vec<SiteContent>, SiteError> {
        self.store.list_site_content().await
    }

    /// Pages whose keywords appear in `text`, best first, at most `limit`.
    ///
    /// # Errors
    ///
    /// Returns a storage error on database failure.
    pub async fn suggest_links(
        &self,
        text: &str,
        limit: usize,
    ) -> Result<Vec<LinkSuggestion>, SiteError> {
        let content = self.store.list_site_content().await?;
        Ok(rank_links(&content, text, limit))
    }

    /// Submits a path (resolved against the site base URL) or an absolute
    /// URL to the search engine.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::InvalidRequest`] for a blank target,
    /// [`SiteError::NotConfigured`] when no service account is set up and
    /// [`SiteError::Integration`] when the search engine rejects the call.
    pub async fn submit_to_search_engine(
        &self,
        path_or_url: &str,
    ) -> Result<SubmissionReceipt, SiteError> {
        let url = self.absolute_url(path_or_url)?;
        Ok(self.submitter.submit_url(&url).await?)
    }

    fn absolute_url(&self, path_or_url: &str) -> Result<String, SiteError> {
        let target = path_or_url.trim();
        if target.is_empty() {
            return Err(SiteError::InvalidRequest("url must not be empty".to_string()));
        }
        if target.starts_with("https://") || target.starts_with("http://") {
            return Ok(target.to_string());
        }
        let path = target.trim_start_matches('/');
        Ok(format!("{}/{path}", self.base_url))
    }
}

/// Meta description plus lower-cased title words longer than three
/// characters.
fn fallback_summary(page: &PageDef) -> (String, Vec<String>) {
    let keywords = page
        .title
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| w.chars().count() > 3)
        .map(str::to_lowercase)
        .collect();
    (page.description.clone(), normalize_keywords(keywords))
}

fn normalize_keywords(keywords: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(keywords.len());
    for keyword in keywords {
        let keyword = keyword.trim().to_lowercase();
        if !keyword.is_empty() && !out.contains(&keyword) {
            out.push(keyword);
        }
    }
    out
}

fn rank_links(content: &[SiteContent], text: &str, limit: usize) -> Vec<LinkSuggestion> {
    let haystack = text.to_lowercase();
    let mut scored: Vec<LinkSuggestion> = content
        .iter()
        .filter_map(|page| {
            let score = page
                .keywords
                .iter()
                .filter(|k| !k.is_empty() && haystack.contains(&k.to_lowercase()))
                .count();
            (score > 0).then(|| LinkSuggestion {
                url_path: page.url_path.clone(),
                title: page.title.clone(),
                score,
            })
        })
        .collect();
    // Stable sort keeps URL order among equal scores.
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(limit);
    scored
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::integrations::{
        BlogDraft, DisabledGenerator, DisabledSubmitter, DraftRequest, IntegrationError,
        PageSummary,
    };
    use crate::persistence::MemoryStore;

    /// Summarizes service pages; fails for everything else.
    #[derive(Debug)]
    struct ServicesOnly;

    #[async_trait]
    impl ContentGenerator for ServicesOnly {
        async fn summarize_page(&self, page: &PageSource) -> Result<PageSummary, IntegrationError> {
            if page.kind == "service" {
                Ok(PageSummary {
                    summary: format!("About {}", page.title),
                    keywords: vec!["Sauna".to_string(), "sauna".to_string(), "build".to_string()],
                })
            } else {
                Err(IntegrationError::Decode("nope".to_string()))
            }
        }

        async fn draft_blog_post(&self, _: &DraftRequest) -> Result<BlogDraft, IntegrationError> {
            Err(IntegrationError::NotConfigured("AI API"))
        }
    }

    fn service(generator: Arc<dyn ContentGenerator>) -> (IndexingService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let svc = IndexingService::new(
            Arc::clone(&store) as Arc<dyn SiteStore>,
            generator,
            Arc::new(DisabledSubmitter),
            EventBus::new(16),
            "https://example-sauna.com".to_string(),
        );
        (svc, store)
    }

    fn page(path: &str, keywords: &[&str]) -> SiteContent {
        SiteContent {
            id: Uuid::new_v4(),
            url_path: path.to_string(),
            title: path.to_string(),
            summary: String::new(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            content_type: "service".to_string(),
            last_indexed_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn every_page_falls_back_without_generator() {
        let (svc, store) = service(Arc::new(DisabledGenerator));
        let public = catalog().public_pages().count();
        let Ok(report) = svc.index_site_content().await else {
            panic!("indexing failed");
        };
        assert_eq!(report.indexed, public);
        assert_eq!(report.fallbacks, public);

        let Ok(rows) = store.list_site_content().await else {
            panic!("list failed");
        };
        assert_eq!(rows.len(), public);
        let Some(about) = catalog().find_page("/about") else {
            panic!("about page missing");
        };
        let Some(row) = rows.iter().find(|r| r.url_path == "/about") else {
            panic!("about not indexed");
        };
        assert_eq!(row.summary, about.description);
        assert!(row.keywords.iter().all(|k| k.chars().count() > 3));
    }

    #[tokio::test]
    async fn fallbacks_are_per_page() {
        let (svc, store) = service(Arc::new(ServicesOnly));
        let services = catalog().services().len();
        let public = catalog().public_pages().count();
        let Ok(report) = svc.index_site_content().await else {
            panic!("indexing failed");
        };
        assert_eq!(report.indexed, public);
        assert_eq!(report.fallbacks, public - services);

        let rows = store.list_site_content().await.unwrap_or_default();
        let Some(service_row) = rows.iter().find(|r| r.content_type == "service") else {
            panic!("no service row");
        };
        assert!(service_row.summary.starts_with("About "));
        assert_eq!(service_row.keywords, vec!["sauna", "build"]);
    }

    #[tokio::test]
    async fn reindexing_does_not_duplicate_rows() {
        let (svc, store) = service(Arc::new(DisabledGenerator));
        assert!(svc.index_site_content().await.is_ok());
        assert!(svc.index_site_content().await.is_ok());
        assert_eq!(
            store.list_site_content().await.map(|r| r.len()).ok(),
            Some(catalog().public_pages().count())
        );
    }

    #[test]
    fn fallback_keywords_come_from_long_title_words() {
        let page = PageDef {
            path: "/x".to_string(),
            title: "Why Sauna & Cold Plunge Go Together".to_string(),
            description: "desc".to_string(),
            kind: crate::domain::PageKind::Marketing,
            requires_admin: false,
        };
        let (summary, keywords) = fallback_summary(&page);
        assert_eq!(summary, "desc");
        assert_eq!(keywords, vec!["sauna", "cold", "plunge", "together"]);
    }

    #[test]
    fn ranking_drops_zero_scores_and_keeps_url_order_on_ties() {
        let content = vec![
            page("/a", &["cedar"]),
            page("/b", &["cedar", "heater"]),
            page("/c", &["infrared"]),
            page("/d", &["heater"]),
        ];
        let ranked = rank_links(&content, "A CEDAR bench near the heater", 5);
        let paths: Vec<&str> = ranked.iter().map(|r| r.url_path.as_str()).collect();
        assert_eq!(paths, vec!["/b", "/a", "/d"]);
        assert_eq!(ranked.first().map(|r| r.score), Some(2));

        assert_eq!(rank_links(&content, "cedar heater", 1).len(), 1);
        assert!(rank_links(&content, "nothing relevant", 5).is_empty());
    }

    #[test]
    fn relative_paths_resolve_against_base_url() {
        let (svc, _) = service(Arc::new(DisabledGenerator));
        assert_eq!(
            svc.absolute_url("/services/outdoor-saunas").ok().as_deref(),
            Some("https://example-sauna.com/services/outdoor-saunas")
        );
        assert_eq!(
            svc.absolute_url("https://other.fi/x").ok().as_deref(),
            Some("https://other.fi/x")
        );
        assert!(svc.absolute_url("  ").is_err());
    }

    #[tokio::test]
    async fn submission_without_account_is_not_configured() {
        let (svc, _) = service(Arc::new(DisabledGenerator));
        assert!(matches!(
            svc.submit_to_search_engine("/").await,
            Err(SiteError::NotConfigured(_))
        ));
    }
}
