//! Non-interactive surfaces: `tripwise plan` and `tripwise secrets`.
//!
//! Unlike the REPL, every failure here is returned as an error carrying
//! the banner text, so the process exits non-zero.

use anyhow::{Result, bail};

use crate::auth::secrets::ensure_known;
use crate::auth::{Attempt, SecretStore};
use crate::banner::{auth_error_banner, failure_banner, submit_error_banner};
use crate::form::{Prompter, TripForm};
use crate::itinerary::ItineraryResult;
use crate::session::Session;
use crate::spinner::Spinner;

/// Sign in, submit one trip and return the itinerary text.
pub async fn plan(session: &mut Session, attempt: Attempt, form: &TripForm) -> Result<String> {
    if let Err(e) = session.sign_in(attempt) {
        bail!("{}", auth_error_banner(&e));
    }

    let spinner = Spinner::start("planning your trip");
    let outcome = session.submit(form).await;
    spinner.stop();

    match outcome {
        Ok(ItineraryResult::Success { text }) => Ok(text),
        Ok(ItineraryResult::Failure { kind, detail }) => bail!("{}", failure_banner(kind, &detail)),
        Err(e) => {
            tracing::error!("submission rejected: {e}");
            bail!("{}", submit_error_banner(&e))
        }
    }
}

/// Prompt for `name`'s value (masked) and store it. The name is checked
/// before anything is read.
pub fn set_secret(store: &SecretStore, prompter: &dyn Prompter, name: &str) -> Result<()> {
    ensure_known(name)?;
    let value = prompter.read_secret(&format!("{name}: "))?;
    if value.is_empty() {
        bail!("no value provided for {name}");
    }
    store.set(name, &value)?;
    tracing::info!(secret = %name, "secret stored");
    Ok(())
}

pub fn remove_secret(store: &SecretStore, name: &str) -> Result<()> {
    store.remove(name)?;
    tracing::info!(secret = %name, "secret removed");
    Ok(())
}
