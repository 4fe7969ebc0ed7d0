use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use super::{Backend, BackendError, Connector};

/// One scripted answer.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Quota(String),
    Api { status: u16, message: String },
    /// Sleep this long, then answer with the text.
    Delayed(Duration, String),
}

/// A scripted backend for tests. Returns pre-defined replies in order
/// and records every prompt it is given.
pub struct MockBackend {
    replies: Vec<MockReply>,
    index: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies,
            index: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Convenience for a backend that answers once with `text`.
    pub fn text(text: &str) -> Self {
        Self::new(vec![MockReply::Text(text.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.index.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn generate(&self, prompt: &str) -> Result<String, BackendError> {
        let i = self.index.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        let reply = self.replies.get(i).cloned().ok_or_else(|| {
            BackendError::Malformed(format!("MockBackend: no more replies (called {} times)", i + 1))
        })?;
        match reply {
            MockReply::Text(text) => Ok(text),
            MockReply::Quota(message) => Err(BackendError::QuotaExhausted { message }),
            MockReply::Api { status, message } => Err(BackendError::Api { status, message }),
            MockReply::Delayed(delay, text) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
        }
    }
}

/// Hands out one shared [`MockBackend`] and remembers which keys asked for it.
pub struct MockConnector {
    backend: Arc<MockBackend>,
    keys: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(backend: Arc<MockBackend>) -> Self {
        Self {
            backend,
            keys: Mutex::new(Vec::new()),
        }
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().map(|k| k.clone()).unwrap_or_default()
    }
}

impl Connector for MockConnector {
    fn connect(&self, api_key: &str) -> Result<Arc<dyn Backend>> {
        if let Ok(mut keys) = self.keys.lock() {
            keys.push(api_key.to_string());
        }
        let backend: Arc<dyn Backend> = self.backend.clone();
        Ok(backend)
    }
}
