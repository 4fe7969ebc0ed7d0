//! Project-wide constants.

use std::path::PathBuf;

pub const AUTHOR: &str = env!("CARGO_PKG_AUTHORS");
pub const HOMEPAGE: &str = env!("CARGO_PKG_HOMEPAGE");
pub const REPO: &str = env!("CARGO_PKG_REPOSITORY");

/// Default Gemini model when none is specified.
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";

/// Public Generative Language API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variable that overrides the stored default API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Where guests can get a key of their own.
pub const API_KEY_URL: &str = "https://aistudio.google.com/app/apikey";

/// Upper bound on a single backend call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const MIN_DAYS: u32 = 1;
pub const MAX_DAYS: u32 = 99;
pub const DEFAULT_DAYS: u32 = 3;

/// Substituted when the traveler has no next destination in mind.
pub const UNKNOWN_NEXT_DESTINATION: &str = "I don't know yet";

/// Default secret store path: `~/.tripwise/secrets.db`.
pub fn default_secrets_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tripwise")
        .join("secrets.db")
}
