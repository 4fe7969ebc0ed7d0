//! Runtime settings gathered from flags and environment.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::consts::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS, default_secrets_path};

/// Validated once at startup, then passed around explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub model: String,
    pub base_url: String,
    pub secrets_path: PathBuf,
    pub timeout: Duration,
    pub cache: bool,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            secrets_path: default_secrets_path(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            cache: true,
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            bail!("model cannot be empty");
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            bail!("base URL must start with http:// or https:// (got {})", self.base_url);
        }
        if self.timeout.is_zero() {
            bail!("timeout must be at least 1 second");
        }
        crate::logging::parse_level(&self.log_level)?;
        Ok(())
    }

    /// Secret store path as the string rusqlite expects.
    pub fn secrets_path_str(&self) -> Result<&str> {
        self.secrets_path.to_str().ok_or_else(|| {
            anyhow::anyhow!(
                "secret store path is not valid UTF-8: {}",
                self.secrets_path.display()
            )
        })
    }
}
