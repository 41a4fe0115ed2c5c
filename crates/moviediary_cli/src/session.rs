//! Logged-in user session persisted as a small JSON file.
//!
//! A missing file means nobody is logged in.

use anyhow::{Context, Result};
use moviediary_core::{User, UserId};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    pub username: String,
    pub email: String,
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// File-backed session store.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Current session, `None` when logged out.
    pub fn load(&self) -> Result<Option<Session>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("reading session {}", self.path.display()))
            }
        };
        let session = serde_json::from_str(&raw)
            .with_context(|| format!("parsing session {}", self.path.display()))?;
        Ok(Some(session))
    }

    /// Starts a session after a successful login.
    pub fn create(&self, session: &Session) -> Result<()> {
        self.write(session)
    }

    /// Refreshes username/email after a profile edit. The user id is kept.
    pub fn update(&self, username: &str, email: &str) -> Result<Option<Session>> {
        let Some(mut session) = self.load()? else {
            return Ok(None);
        };
        session.username = username.to_string();
        session.email = email.to_string();
        self.write(&session)?;
        Ok(Some(session))
    }

    /// Ends the session. Returns whether one existed.
    pub fn clear(&self) -> Result<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
            Err(err) => {
                Err(err).with_context(|| format!("removing session {}", self.path.display()))
            }
        }
    }

    fn write(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("writing session {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Session, SessionStore};

    fn alice() -> Session {
        Session {
            user_id: 7,
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn missing_file_means_logged_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        assert_eq!(store.load().unwrap(), None);
        assert!(!store.clear().unwrap());
    }

    #[test]
    fn create_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        store.create(&alice()).unwrap();
        assert_eq!(store.load().unwrap(), Some(alice()));
    }

    #[test]
    fn update_keeps_user_id_and_clear_logs_out() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));
        store.create(&alice()).unwrap();

        let updated = store.update("alicia", "alicia@example.com").unwrap().unwrap();
        assert_eq!(updated.user_id, 7);
        assert_eq!(store.load().unwrap(), Some(updated));

        assert!(store.clear().unwrap());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn update_without_session_is_a_no_op() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::new(&path);
        assert_eq!(store.update("bob", "bob@example.com").unwrap(), None);
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(SessionStore::new(path).load().is_err());
    }
}
