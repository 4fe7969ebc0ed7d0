//! Startup banner and the inline banners shown for each outcome.

use crate::auth::AuthError;
use crate::consts::{API_KEY_URL, AUTHOR, HOMEPAGE, REPO};
use crate::itinerary::{FailureKind, ItineraryResult};
use crate::session::SubmitError;

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub model: &'a str,
    pub role: &'a str,
    pub auth_status: &'a str,
    pub cache: bool,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║           T R I P W I S E             ║
   ║   tell it where, it tells you how     ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   repo      {}
   model     {}
   role      {}
   auth      {}
   memo      {}

   /owner or /guest to sign in, /plan to plan a trip, /help for more.
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        REPO,
        info.model,
        info.role,
        info.auth_status,
        if info.cache { "on" } else { "off" },
    );
}

/// Banner lines for a failed itinerary request.
pub fn failure_banner(kind: FailureKind, detail: &str) -> String {
    let headline = match kind {
        FailureKind::QuotaExceeded => {
            "Resource Exhausted: The request exceeded the available resources. Please try again later."
        }
        FailureKind::Unexpected => "An unexpected error occurred.",
    };
    format!("🚨 {headline}\n   Details: {detail}")
}

pub fn missing_key_banner() -> String {
    format!("✗ You must enter your Gemini API key! You can get your key from {API_KEY_URL}")
}

/// Banner for a submission that never reached the backend.
pub fn submit_error_banner(err: &SubmitError) -> String {
    match err {
        SubmitError::Validation(e) => format!("✗ {e}"),
        SubmitError::MissingCredential => missing_key_banner(),
        SubmitError::Connect(e) => failure_banner(FailureKind::Unexpected, &format!("{e:#}")),
    }
}

pub fn auth_error_banner(err: &AuthError) -> String {
    match err {
        AuthError::AuthenticationFailed => "✗ Invalid password".to_string(),
        AuthError::MissingCredential => missing_key_banner(),
        AuthError::Storage(e) => format!("✗ secret store unavailable: {e:#}"),
    }
}

/// Banner for the outer catch-all around a whole turn.
pub fn top_level_banner(detail: &str) -> String {
    format!("🚨 An unexpected error occurred in the main function.\n   Details: {detail}")
}

/// Success text goes to stdout as-is; failures go to stderr.
pub fn print_result(result: &ItineraryResult) {
    match result {
        ItineraryResult::Success { text } => println!("\n{text}"),
        ItineraryResult::Failure { kind, detail } => eprintln!("{}", failure_banner(*kind, detail)),
    }
}

/// Print the farewell.
pub fn print_goodbye() {
    println!("goodbye.");
}
