use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Backend, BackendError, Connector};
use crate::consts::{DEFAULT_BASE_URL, DEFAULT_MODEL};

const QUOTA_STATUS: &str = "RESOURCE_EXHAUSTED";

/// Calls the Gemini `generateContent` endpoint.
pub struct GeminiBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiBackend {
    pub fn new(
        api_key: &str,
        model: Option<&str>,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: normalize_model(model.unwrap_or(DEFAULT_MODEL)).to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn build_body(prompt: &str) -> ApiRequest<'_> {
        ApiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
        }
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(resp: ApiResponse) -> Result<String, BackendError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or(BackendError::Empty)?;
        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();
        if text.is_empty() {
            return Err(BackendError::Empty);
        }
        Ok(text)
    }
}

/// Accept both `models/gemini-…` and bare `gemini-…`.
fn normalize_model(model: &str) -> &str {
    model.strip_prefix("models/").unwrap_or(model)
}

/// Map a non-success response to a [`BackendError`].
///
/// Quota exhaustion shows up either as HTTP 429 or as an error envelope
/// whose `status` is `RESOURCE_EXHAUSTED`.
pub fn classify_error(status: u16, body: &str) -> BackendError {
    let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let quota = status == 429
        || envelope
            .as_ref()
            .and_then(|e| e.error.status.as_deref())
            .is_some_and(|s| s == QUOTA_STATUS);

    if quota {
        BackendError::QuotaExhausted { message }
    } else {
        BackendError::Api { status, message }
    }
}

#[async_trait]
impl Backend for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&Self::build_body(prompt))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(classify_error(status.as_u16(), &text));
        }

        let api_resp: ApiResponse =
            serde_json::from_str(&text).map_err(|e| BackendError::Malformed(e.to_string()))?;

        if let Some(usage) = &api_resp.usage_metadata {
            tracing::debug!(
                input = usage.prompt_token_count,
                output = usage.candidates_token_count,
                "token usage"
            );
        }

        Self::extract_text(api_resp)
    }
}

/// Produces [`GeminiBackend`]s for a fixed model, endpoint and timeout.
pub struct GeminiConnector {
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Connector for GeminiConnector {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn Backend>> {
        let backend = GeminiBackend::new(
            api_key,
            Some(&self.model),
            Some(&self.base_url),
            self.timeout,
        )?;
        Ok(Arc::new(backend))
    }
}

// --- API types ---

#[derive(Serialize)]
struct ApiRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u64,
    #[serde(default)]
    candidates_token_count: u64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    status: Option<String>,
}
