pub mod secrets;

pub use secrets::SecretStore;

use std::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};
use thiserror::Error;

use secrets::{DEFAULT_API_KEY, PASSWORD_REFERENCE};

/// Who is driving the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Role {
    /// The maintainer, authenticated against the stored reference password.
    Owner,
    /// Anyone else, bringing their own API key.
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Owner => write!(f, "owner"),
            Role::Guest => write!(f, "guest"),
        }
    }
}

/// What the user typed for a role.
#[derive(Clone)]
pub enum Attempt {
    Owner { password: String },
    Guest { api_key: String },
}

impl Attempt {
    pub fn role(&self) -> Role {
        match self {
            Attempt::Owner { .. } => Role::Owner,
            Attempt::Guest { .. } => Role::Guest,
        }
    }
}

/// A resolved role plus the key it authorizes, if any.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub role: Role,
    pub api_key: Option<String>,
}

// Keys stay out of logs and panics.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("role", &self.role)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid password")]
    AuthenticationFailed,

    #[error("no API key available")]
    MissingCredential,

    #[error("secret store unavailable: {0:#}")]
    Storage(anyhow::Error),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        AuthError::Storage(err)
    }
}

/// Turns a role attempt into a [`Credential`].
///
/// The environment override is captured once at construction, so the
/// resolver never touches process state while a session runs.
pub struct CredentialResolver {
    store: Arc<SecretStore>,
    env_override: Option<String>,
}

impl CredentialResolver {
    pub fn new(store: Arc<SecretStore>, env_override: Option<String>) -> Self {
        Self {
            store,
            env_override: env_override.filter(|k| !k.is_empty()),
        }
    }

    /// Read the override from `var`, if set and non-empty.
    pub fn from_env(store: Arc<SecretStore>, var: &str) -> Self {
        Self::new(store, std::env::var(var).ok())
    }

    /// Every failure is logged here; callers only have to show it.
    pub fn resolve(&self, attempt: Attempt) -> Result<Credential, AuthError> {
        let result = match attempt {
            Attempt::Owner { password } => self.resolve_owner(&password),
            Attempt::Guest { api_key } => {
                if api_key.is_empty() {
                    tracing::warn!(role = %Role::Guest, "guest signed in without an API key");
                } else {
                    tracing::info!(role = %Role::Guest, "guest key accepted");
                }
                Ok(Credential {
                    role: Role::Guest,
                    api_key: Some(api_key).filter(|k| !k.is_empty()),
                })
            }
        };
        if let Err(AuthError::Storage(e)) = &result {
            tracing::error!("secret store read failed: {e:#}");
        }
        result
    }

    fn resolve_owner(&self, password: &str) -> Result<Credential, AuthError> {
        let Some(reference) = self.store.get(PASSWORD_REFERENCE)? else {
            tracing::warn!("owner login attempted but {PASSWORD_REFERENCE} is not set");
            return Err(AuthError::AuthenticationFailed);
        };
        if password.is_empty() || !passwords_match(password, &reference) {
            tracing::warn!(role = %Role::Owner, "owner login rejected");
            return Err(AuthError::AuthenticationFailed);
        }

        let api_key = match &self.env_override {
            Some(key) => {
                tracing::debug!("using API key from environment");
                key.clone()
            }
            None => match self.store.get(DEFAULT_API_KEY)? {
                Some(key) => key,
                None => {
                    tracing::error!(
                        role = %Role::Owner,
                        "owner authenticated but no API key is configured ({DEFAULT_API_KEY} unset, no environment override)"
                    );
                    return Err(AuthError::MissingCredential);
                }
            },
        };

        tracing::info!(role = %Role::Owner, "owner logged in");
        Ok(Credential {
            role: Role::Owner,
            api_key: Some(api_key),
        })
    }
}

/// Compare via fixed-length digests so timing doesn't depend on where
/// the inputs first differ.
fn passwords_match(attempt: &str, reference: &str) -> bool {
    let a = Sha256::digest(attempt.as_bytes());
    let b = Sha256::digest(reference.as_bytes());
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(password: Option<&str>, key: Option<&str>) -> Arc<SecretStore> {
        let store = SecretStore::in_memory().unwrap();
        if let Some(pw) = password {
            store.set(PASSWORD_REFERENCE, pw).unwrap();
        }
        if let Some(k) = key {
            store.set(DEFAULT_API_KEY, k).unwrap();
        }
        Arc::new(store)
    }

    fn owner(password: &str) -> Attempt {
        Attempt::Owner {
            password: password.to_string(),
        }
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` under a subscriber that records to a string.
    fn logs_of(f: impl FnOnce()) -> String {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn owner_with_correct_password_gets_stored_key() {
        let resolver = CredentialResolver::new(store_with(Some("hunter2"), Some("stored")), None);
        let cred = resolver.resolve(owner("hunter2")).unwrap();
        assert_eq!(cred.role, Role::Owner);
        assert_eq!(cred.api_key.as_deref(), Some("stored"));
    }

    #[test]
    fn env_override_wins_over_stored_key() {
        let resolver = CredentialResolver::new(
            store_with(Some("hunter2"), Some("stored")),
            Some("from-env".to_string()),
        );
        let cred = resolver.resolve(owner("hunter2")).unwrap();
        assert_eq!(cred.api_key.as_deref(), Some("from-env"));
    }

    #[test]
    fn empty_env_override_is_ignored() {
        let resolver = CredentialResolver::new(
            store_with(Some("hunter2"), Some("stored")),
            Some(String::new()),
        );
        let cred = resolver.resolve(owner("hunter2")).unwrap();
        assert_eq!(cred.api_key.as_deref(), Some("stored"));
    }

    #[test]
    fn wrong_password_fails() {
        let resolver = CredentialResolver::new(store_with(Some("hunter2"), Some("k")), None);
        let err = resolver.resolve(owner("hunter3")).unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
        assert_eq!(err.to_string(), "Invalid password");
    }

    #[test]
    fn empty_password_fails() {
        let resolver = CredentialResolver::new(store_with(Some("hunter2"), Some("k")), None);
        assert!(matches!(
            resolver.resolve(owner("")),
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn missing_reference_password_fails_authentication() {
        let resolver = CredentialResolver::new(store_with(None, Some("k")), None);
        assert!(matches!(
            resolver.resolve(owner("anything")),
            Err(AuthError::AuthenticationFailed)
        ));
    }

    #[test]
    fn owner_without_any_key_is_missing_credential() {
        let resolver = CredentialResolver::new(store_with(Some("hunter2"), None), None);
        assert!(matches!(
            resolver.resolve(owner("hunter2")),
            Err(AuthError::MissingCredential)
        ));
    }

    #[test]
    fn missing_owner_key_is_logged_as_error() {
        let resolver = CredentialResolver::new(store_with(Some("hunter2"), None), None);
        let logs = logs_of(|| {
            assert!(resolver.resolve(owner("hunter2")).is_err());
        });
        assert!(logs.contains("ERROR"), "{logs}");
        assert!(logs.contains("no API key is configured"), "{logs}");
    }

    #[test]
    fn rejected_owner_login_is_logged() {
        let resolver = CredentialResolver::new(store_with(Some("hunter2"), Some("k")), None);
        let logs = logs_of(|| {
            assert!(resolver.resolve(owner("wrong")).is_err());
        });
        assert!(logs.contains("owner login rejected"), "{logs}");
        assert!(!logs.contains("wrong"), "password leaked into logs: {logs}");
    }

    #[test]
    fn empty_guest_key_is_logged() {
        let resolver = CredentialResolver::new(store_with(None, None), None);
        let logs = logs_of(|| {
            resolver
                .resolve(Attempt::Guest {
                    api_key: String::new(),
                })
                .unwrap();
        });
        assert!(logs.contains("guest signed in without an API key"), "{logs}");
    }

    #[test]
    fn guest_key_is_taken_verbatim_without_password_check() {
        // No reference password at all: a password check would fail.
        let resolver = CredentialResolver::new(store_with(None, None), None);
        let cred = resolver
            .resolve(Attempt::Guest {
                api_key: "abc123".to_string(),
            })
            .unwrap();
        assert_eq!(
            cred,
            Credential {
                role: Role::Guest,
                api_key: Some("abc123".to_string()),
            }
        );
    }

    #[test]
    fn guest_empty_key_resolves_without_key() {
        let resolver = CredentialResolver::new(store_with(None, None), None);
        let cred = resolver
            .resolve(Attempt::Guest {
                api_key: String::new(),
            })
            .unwrap();
        assert_eq!(cred.role, Role::Guest);
        assert!(cred.api_key.is_none());
    }

    #[test]
    fn debug_redacts_key() {
        let cred = Credential {
            role: Role::Guest,
            api_key: Some("super-secret".to_string()),
        };
        let shown = format!("{cred:?}");
        assert!(!shown.contains("super-secret"));
        assert!(shown.contains("<redacted>"));
    }

    #[test]
    fn passwords_match_is_exact() {
        assert!(passwords_match("abc", "abc"));
        assert!(!passwords_match("abc", "abcd"));
        assert!(!passwords_match("Abc", "abc"));
    }
}
