//! # Session Persistence
//!
//! The logged-in user is a single JSON record (`~/.courier/session.json`).
//! Its presence is the whole proof of authentication: there is no token,
//! no expiry and no server-side validation.
//!
//! Writes use atomic rename (write `.tmp`, then `rename()`) for crash safety.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::api::User;

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    Parse(serde_json::Error),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(e) => write!(f, "session I/O error: {e}"),
            SessionError::Parse(e) => write!(f, "session parse error: {e}"),
        }
    }
}

impl std::error::Error for SessionError {}

/// File-backed store for the session record.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        Self::new(crate::core::config::default_session_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the stored record. Missing and malformed records both yield
    /// `None`; a malformed one is logged and left on disk.
    pub fn load(&self) -> Option<User> {
        match self.read() {
            Ok(user) => user,
            Err(e) => {
                warn!("Ignoring unreadable session at {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Like [`load`](Self::load) but distinguishes a malformed record from a missing one.
    pub fn read(&self) -> Result<Option<User>, SessionError> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SessionError::Io(e)),
        };
        let user: User = serde_json::from_str(&json).map_err(SessionError::Parse)?;
        debug!("Session loaded for user {}", user.id);
        Ok(Some(user))
    }

    pub fn save(&self, user: &User) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(SessionError::Io)?;
        }
        let json = serde_json::to_string_pretty(user).map_err(SessionError::Parse)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json).map_err(SessionError::Io)?;
        fs::rename(&tmp_path, &self.path).map_err(SessionError::Io)?;
        info!("Session saved for user {}", user.id);
        Ok(())
    }

    /// Removes the record. Clearing an absent session is not an error.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_user, temp_session_store};

    #[test]
    fn test_load_missing_returns_none() {
        let store = temp_session_store();
        assert!(store.load().is_none());
        assert!(matches!(store.read(), Ok(None)));
    }

    #[test]
    fn test_default_location_is_session_json() {
        let store = SessionStore::default_location();
        assert!(store.path().ends_with(".courier/session.json"));
    }

    #[test]
    fn test_save_then_load_returns_same_user() {
        let store = temp_session_store();
        let user = sample_user();
        store.save(&user).unwrap();
        assert_eq!(store.load(), Some(user));
        assert!(!store.path().with_extension("tmp").exists());
    }

    #[test]
    fn test_malformed_record_is_treated_as_absent() {
        let store = temp_session_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{ not json").unwrap();
        assert!(store.load().is_none());
        assert!(matches!(store.read(), Err(SessionError::Parse(_))));
    }

    #[test]
    fn test_record_missing_required_field_is_treated_as_absent() {
        let store = temp_session_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), r#"{"username":"anna"}"#).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_clear_removes_record_and_tolerates_absence() {
        let store = temp_session_store();
        store.save(&sample_user()).unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }
}
