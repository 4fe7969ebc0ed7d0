//! Per-session state and the submit path.
//!
//! [`SessionContext`] is everything one interactive session knows about
//! who is using it. [`Session`] bundles it with the collaborators a turn
//! needs, and is handed to every command explicitly.

use std::sync::Arc;

use thiserror::Error;

use crate::auth::{Attempt, AuthError, Credential, CredentialResolver, Role};
use crate::backend::Connector;
use crate::form::{Prompter, TripForm};
use crate::itinerary::{ItineraryResult, Requester, TripRequest, ValidationError};

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no API key available")]
    MissingCredential,

    /// The backend client could not be built for this key.
    #[error("failed to prepare backend: {0:#}")]
    Connect(anyhow::Error),
}

/// Role and resolved key for one session.
#[derive(Debug, Default)]
pub struct SessionContext {
    role: Option<Role>,
    credential: Option<Credential>,
}

impl SessionContext {
    pub fn role(&self) -> Option<Role> {
        self.role
    }

    pub fn credential(&self) -> Option<&Credential> {
        self.credential.as_ref()
    }

    /// Select a role. Any key resolved before is dropped right away,
    /// even when the role doesn't change.
    pub fn switch_role(&mut self, role: Role) {
        if self.role != Some(role) {
            tracing::info!(%role, "role switched");
        }
        self.role = Some(role);
        self.credential = None;
    }

    pub fn authenticate(&mut self, credential: Credential) {
        self.role = Some(credential.role);
        self.credential = Some(credential);
    }

    pub fn sign_out(&mut self) {
        self.role = None;
        self.credential = None;
    }

    pub fn api_key(&self) -> Option<&str> {
        self.credential
            .as_ref()
            .and_then(|c| c.api_key.as_deref())
            .filter(|k| !k.is_empty())
    }

    /// Short status for banners and `/whoami`.
    pub fn auth_status(&self) -> String {
        match (self.role, self.api_key()) {
            (None, _) => "no role selected".to_string(),
            (Some(Role::Owner), Some(_)) => "owner ✓".to_string(),
            (Some(Role::Guest), Some(_)) => "guest key ✓".to_string(),
            (Some(role), None) => format!("{role} (no key)"),
        }
    }
}

/// Everything a turn of the interactive session works with.
pub struct Session {
    pub context: SessionContext,
    pub resolver: CredentialResolver,
    pub requester: Requester,
    pub connector: Arc<dyn Connector>,
    pub prompter: Box<dyn Prompter>,
    pub model: String,
}

impl Session {
    /// Switch to the attempt's role and try to resolve its key.
    pub fn sign_in(&mut self, attempt: Attempt) -> Result<&Credential, AuthError> {
        self.context.switch_role(attempt.role());
        let credential = self.resolver.resolve(attempt)?;
        self.context.authenticate(credential);
        self.context
            .credential()
            .ok_or(AuthError::MissingCredential)
    }

    /// Validate the form and, only if it passes and a key is present,
    /// ask the backend for an itinerary.
    pub async fn submit(&self, form: &TripForm) -> Result<ItineraryResult, SubmitError> {
        let request = TripRequest::new(
            form.days,
            &form.destination,
            form.departure,
            &form.next_destination,
        )?;
        let api_key = self
            .context
            .api_key()
            .ok_or(SubmitError::MissingCredential)?;
        let backend = self
            .connector
            .connect(api_key)
            .map_err(SubmitError::Connect)?;
        Ok(self.requester.generate(backend.as_ref(), &request).await)
    }
}
