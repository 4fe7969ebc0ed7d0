pub mod gemini;
pub mod mock;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

/// Errors a generative backend can report.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The caller's usage quota is used up.
    #[error("{message}")]
    QuotaExhausted { message: String },

    /// Any other non-success answer from the backend.
    #[error("backend error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("request failed: {}", error_chain(.0))]
    Network(#[from] reqwest::Error),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("backend returned no text")]
    Empty,
}

/// `err` followed by each of its sources, `: `-separated.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

impl BackendError {
    pub fn is_quota_exhausted(&self) -> bool {
        matches!(self, BackendError::QuotaExhausted { .. })
    }
}

/// Something that turns a prompt into text. Gemini in production,
/// a script in tests.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Single stateless exchange: nothing is carried between calls.
    async fn generate(&self, prompt: &str) -> Result<String, BackendError>;
}

/// Builds a backend authorized by a specific API key.
pub trait Connector: Send + Sync {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn Backend>>;
}
