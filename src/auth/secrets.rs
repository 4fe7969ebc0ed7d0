//! Local secret store backed by SQLite.
//!
//! Holds the owner's reference password and the default API key. The
//! credential resolver only ever reads from it; `tripwise secrets`
//! is the only writer.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::Connection;

/// Reference password the owner must match.
pub const PASSWORD_REFERENCE: &str = "password.reference";

/// API key used by the owner when no environment override is set.
pub const DEFAULT_API_KEY: &str = "apiKeys.defaultKey";

/// Every name the store accepts.
pub const KNOWN_SECRETS: &[&str] = &[PASSWORD_REFERENCE, DEFAULT_API_KEY];

pub struct SecretStore {
    conn: Mutex<Connection>,
}

impl SecretStore {
    /// Open or create the secrets table at `path`.
    /// Use `":memory:"` for tests.
    pub fn open(path: &str) -> Result<Self> {
        if path != ":memory:"
            && let Some(parent) = Path::new(path).parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(path).context("failed to open secret store")?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS secrets (
                name  TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )
        .context("failed to create secrets table")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow!("secret store lock poisoned"))
    }

    /// Read a secret. Empty values count as absent.
    pub fn get(&self, name: &str) -> Result<Option<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT value FROM secrets WHERE name = ?1")?;
        let mut rows = stmt.query([name])?;
        match rows.next()? {
            Some(row) => {
                let value: String = row.get(0)?;
                Ok(Some(value).filter(|v| !v.is_empty()))
            }
            None => Ok(None),
        }
    }

    /// Store a secret (upsert). Unknown names are rejected.
    pub fn set(&self, name: &str, value: &str) -> Result<()> {
        ensure_known(name)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO secrets (name, value) VALUES (?1, ?2)
             ON CONFLICT(name) DO UPDATE SET value = excluded.value",
            [name, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, name: &str) -> Result<()> {
        ensure_known(name)?;
        let conn = self.lock()?;
        conn.execute("DELETE FROM secrets WHERE name = ?1", [name])?;
        Ok(())
    }

    /// Names of the secrets currently set, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT name FROM secrets ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(names)
    }
}

/// Reject names the store doesn't hold.
pub fn ensure_known(name: &str) -> Result<()> {
    if !KNOWN_SECRETS.contains(&name) {
        bail!(
            "unknown secret: {name} (expected one of: {})",
            KNOWN_SECRETS.join(", ")
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_store() -> SecretStore {
        SecretStore::in_memory().unwrap()
    }

    #[test]
    fn get_returns_none_for_missing_secret() {
        assert!(mem_store().get(PASSWORD_REFERENCE).unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let store = mem_store();
        store.set(DEFAULT_API_KEY, "AIza-test").unwrap();
        assert_eq!(store.get(DEFAULT_API_KEY).unwrap().unwrap(), "AIza-test");
    }

    #[test]
    fn set_overwrites_existing() {
        let store = mem_store();
        store.set(PASSWORD_REFERENCE, "old").unwrap();
        store.set(PASSWORD_REFERENCE, "new").unwrap();
        assert_eq!(store.get(PASSWORD_REFERENCE).unwrap().unwrap(), "new");
    }

    #[test]
    fn empty_value_reads_as_absent() {
        let store = mem_store();
        store.set(DEFAULT_API_KEY, "").unwrap();
        assert!(store.get(DEFAULT_API_KEY).unwrap().is_none());
    }

    #[test]
    fn unknown_names_are_rejected() {
        let store = mem_store();
        let err = store.set("api_keys.other", "x").unwrap_err();
        assert!(err.to_string().contains("unknown secret"));
        assert!(store.remove("nope").is_err());
    }

    #[test]
    fn remove_deletes_and_is_idempotent() {
        let store = mem_store();
        store.set(DEFAULT_API_KEY, "k").unwrap();
        store.remove(DEFAULT_API_KEY).unwrap();
        store.remove(DEFAULT_API_KEY).unwrap();
        assert!(store.get(DEFAULT_API_KEY).unwrap().is_none());
    }

    #[test]
    fn names_lists_only_set_secrets() {
        let store = mem_store();
        assert!(store.names().unwrap().is_empty());
        store.set(PASSWORD_REFERENCE, "pw").unwrap();
        store.set(DEFAULT_API_KEY, "k").unwrap();
        assert_eq!(
            store.names().unwrap(),
            vec![DEFAULT_API_KEY.to_string(), PASSWORD_REFERENCE.to_string()]
        );
    }

    #[test]
    fn persists_to_file_and_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("secrets.db");
        let path_str = path.to_str().unwrap();

        {
            let store = SecretStore::open(path_str).unwrap();
            store.set(PASSWORD_REFERENCE, "persisted").unwrap();
        }

        let store = SecretStore::open(path_str).unwrap();
        assert_eq!(store.get(PASSWORD_REFERENCE).unwrap().unwrap(), "persisted");
    }
}
