//! Generative-AI client speaking the chat-completions wire format.

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::{
    BlogDraft, ContentGenerator, DraftRequest, IntegrationError, PageSource, PageSummary,
    check_status, http_client,
};
use crate::config::AiConfig;

const SUMMARY_INSTRUCTIONS: &str = "You index pages of a sauna installation company's website. \
     Reply with a JSON object {\"summary\": string, \"keywords\": string[]}: a two-sentence \
     summary and up to eight lower-case keywords useful for internal linking.";

const DRAFT_INSTRUCTIONS: &str = "You write blog posts for a sauna installation company. \
     Reply with a JSON object {\"title\", \"excerpt\", \"content\" (markdown), \"category\", \
     \"tags\" (string[]), \"meta_title\", \"meta_description\"}.";

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    config: AiConfig,
}

impl ChatCompletionsClient {
    /// Creates a client with the standard request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`IntegrationError::Http`] if the TLS backend cannot start.
    pub fn new(config: AiConfig) -> Result<Self, IntegrationError> {
        Ok(Self {
            client: http_client()?,
            config,
        })
    }

    async fn complete<T: DeserializeOwned>(
        &self,
        instructions: &str,
        prompt: String,
    ) -> Result<T, IntegrationError> {
        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": instructions },
                { "role": "user", "content": prompt },
            ],
            "response_format": { "type": "json_object" },
        });
        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let completion: CompletionResponse = check_status(response).await?.json().await?;
        parse_completion(completion)
    }
}

fn parse_completion<T: DeserializeOwned>(
    completion: CompletionResponse,
) -> Result<T, IntegrationError> {
    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| IntegrationError::Decode("completion has no content".to_string()))?;
    serde_json::from_str(strip_code_fence(&content))
        .map_err(|e| IntegrationError::Decode(format!("completion is not the expected JSON: {e}")))
}

/// Some models wrap JSON in a markdown fence even when asked not to.
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .map_or(trimmed, str::trim)
}

fn draft_prompt(request: &DraftRequest) -> String {
    let mut prompt = format!("Topic: {}\nTone: {}\n", request.topic, request.tone);
    if let Some(ctx) = &request.context {
        prompt.push_str(&format!("Business: {}\n", ctx.business_name));
        if let Some(area) = &ctx.service_area {
            prompt.push_str(&format!("Service area: {area}\n"));
        }
        if let Some(voice) = &ctx.brand_voice {
            prompt.push_str(&format!("Brand voice: {voice}\n"));
        }
        if !ctx.key_messages.is_empty() {
            prompt.push_str(&format!("Key messages: {}\n", ctx.key_messages.join("; ")));
        }
    }
    prompt
}

#[async_trait]
impl ContentGenerator for ChatCompletionsClient {
    async fn summarize_page(&self, page: &PageSource) -> Result<PageSummary, IntegrationError> {
        let prompt = format!(
            "Path: {}\nKind: {}\nTitle: {}\nDescription: {}",
            page.path, page.kind, page.title, page.description
        );
        self.complete(SUMMARY_INSTRUCTIONS, prompt).await
    }

    async fn draft_blog_post(&self, request: &DraftRequest) -> Result<BlogDraft, IntegrationError> {
        let draft: BlogDraft = self.complete(DRAFT_INSTRUCTIONS, draft_prompt(request)).await?;
        if draft.title.trim().is_empty() || draft.content.trim().is_empty() {
            return Err(IntegrationError::Decode(
                "draft is missing a title or content".to_string(),
            ));
        }
        Ok(draft)
    }
}

/// Generator used when no AI API is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGenerator;

#[async_trait]
impl ContentGenerator for DisabledGenerator {
    async fn summarize_page(&self, _page: &PageSource) -> Result<PageSummary, IntegrationError> {
        Err(IntegrationError::NotConfigured("AI API"))
    }

    async fn draft_blog_post(
        &self,
        _request: &DraftRequest,
    ) -> Result<BlogDraft, IntegrationError> {
        Err(IntegrationError::NotConfigured("AI API"))
    }
}
