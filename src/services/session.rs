//! Session Store
//!
//! Single owner of the persisted login: bearer token, signed-in user and the
//! "remember me" email. Lifecycle: [`SessionStore::hydrate`] once at startup,
//! [`SessionStore::save`] after login or registration,
//! [`SessionStore::clear`] on logout.

use crate::domain::{Session, User};
use crate::error::Result;
use crate::helpers::{decrypt, encrypt, get_or_create_config_dir};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const SESSION_FILE: &str = "session.json";

/// On-disk shape. The token is encrypted.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    remembered_email: Option<String>,
}

#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
    remembered_email: Option<String>,
}

impl SessionStore {
    /// Store backed by `path`. Nothing is read until [`Self::hydrate`].
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            current: None,
            remembered_email: None,
        }
    }

    /// Store in the user's config directory
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(get_or_create_config_dir()?.join(SESSION_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load whatever was persisted.
    ///
    /// A missing file is an empty session. A token that cannot be decrypted,
    /// or a token without a user, drops the session but keeps the remembered
    /// email.
    pub fn hydrate(&mut self) -> Result<Option<&Session>> {
        self.current = None;
        self.remembered_email = None;

        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(None);
        }

        let stored: StoredSession = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Discarding unreadable session file");
                fs::remove_file(&self.path)?;
                return Ok(None);
            }
        };
        self.remembered_email = stored.remembered_email;

        match (stored.token, stored.user) {
            (Some(token), Some(user)) => match decrypt(&token) {
                Ok(token) => {
                    info!(user_id = user.id, "Session restored");
                    self.current = Some(Session { token, user });
                }
                Err(e) => {
                    warn!(error = %e, "Stored token is unreadable, signing out");
                    self.persist()?;
                }
            },
            (None, None) => {}
            _ => {
                warn!("Incomplete stored session, signing out");
                self.persist()?;
            }
        }

        Ok(self.current.as_ref())
    }

    pub fn session(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().map(|s| &s.user)
    }

    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn remembered_email(&self) -> Option<&str> {
        self.remembered_email.as_deref()
    }

    /// Persist a fresh session. `remember` stores the email for the next
    /// login form; `None` leaves the remembered email untouched.
    pub fn save(&mut self, session: Session, remember: Option<String>) -> Result<()> {
        if let Some(email) = remember {
            self.remembered_email = Some(email);
        }
        info!(user_id = session.user.id, "Session saved");
        self.current = Some(session);
        self.persist()
    }

    /// Sign out. The remembered email survives.
    pub fn clear(&mut self) -> Result<()> {
        self.current = None;
        info!("Session cleared");
        self.persist()
    }

    fn persist(&self) -> Result<()> {
        let stored = StoredSession {
            token: match &self.current {
                Some(session) => Some(encrypt(&session.token)?),
                None => None,
            },
            user: self.current.as_ref().map(|s| s.user.clone()),
            remembered_email: self.remembered_email.clone(),
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&stored)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            token: "jwt-token".into(),
            user: User {
                id: 3,
                name: "Ana".into(),
                email: "ana@example.com".into(),
                roles: vec!["USER".into()],
            },
        }
    }

    #[test]
    fn test_missing_file_is_empty_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.hydrate().expect("hydrate").is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_save_then_hydrate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let mut store = SessionStore::new(&path);
        store
            .save(session(), Some("ana@example.com".into()))
            .expect("save");

        let raw = fs::read_to_string(&path).expect("read");
        assert!(!raw.contains("jwt-token"), "token must be encrypted at rest");

        let mut restored = SessionStore::new(&path);
        let hydrated = restored.hydrate().expect("hydrate").cloned();
        assert_eq!(hydrated, Some(session()));
        assert_eq!(restored.remembered_email(), Some("ana@example.com"));
        assert_eq!(restored.token(), Some("jwt-token"));
    }

    #[test]
    fn test_clear_keeps_remembered_email() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");

        let mut store = SessionStore::new(&path);
        store
            .save(session(), Some("ana@example.com".into()))
            .expect("save");
        store.clear().expect("clear");
        assert!(store.session().is_none());

        let mut restored = SessionStore::new(&path);
        assert!(restored.hydrate().expect("hydrate").is_none());
        assert_eq!(restored.remembered_email(), Some("ana@example.com"));
    }

    #[test]
    fn test_corrupt_token_signs_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"token":"bm9wZQ==","user":{"id":1,"name":"X"},"remembered_email":"x@y.z"}"#,
        )
        .expect("write");

        let mut store = SessionStore::new(&path);
        assert!(store.hydrate().expect("hydrate").is_none());
        assert_eq!(store.remembered_email(), Some("x@y.z"));

        let raw = fs::read_to_string(&path).expect("read");
        assert!(!raw.contains("token"));
    }

    #[test]
    fn test_unreadable_file_is_discarded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").expect("write");

        let mut store = SessionStore::new(&path);
        assert!(store.hydrate().expect("hydrate").is_none());
        assert!(!path.exists());
    }
}
