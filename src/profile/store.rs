//! User Persistence
//!
//! Users are stored as one map keyed by username. `JsonFileStore` keeps it
//! in a single JSON object on disk; `MemoryStore` keeps it in memory.
//!
//! A missing file loads as an empty map. Records that no longer parse are
//! skipped; the rest load normally. A file that cannot be read or is not a
//! JSON object is an error, so a later save never overwrites it.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::profile::user::User;

/// Persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("Store IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing users failed.
    #[error("Store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Key-value store of users.
pub trait UserStore: Send {
    /// Load every user.
    fn load_all(&self) -> Result<BTreeMap<String, User>, StoreError>;

    /// Replace every user.
    fn save_all(&mut self, users: &BTreeMap<String, User>) -> Result<(), StoreError>;

    /// Load one user.
    fn load_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self.load_all()?.remove(username))
    }

    /// Insert or replace one user.
    fn save_user(&mut self, user: &User) -> Result<(), StoreError> {
        let mut users = self.load_all()?;
        users.insert(user.username.clone(), user.clone());
        self.save_all(&users)
    }
}

/// Users in a JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl UserStore for JsonFileStore {
    fn load_all(&self) -> Result<BTreeMap<String, User>, StoreError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No user file at {}", self.path.display());
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        let records: BTreeMap<String, serde_json::Value> = serde_json::from_str(&text)?;
        let mut users = BTreeMap::new();
        for (username, record) in records {
            match serde_json::from_value::<User>(record) {
                Ok(user) => {
                    users.insert(username, user);
                }
                Err(e) => warn!("Skipping malformed user {} in {}: {}", username, self.path.display(), e),
            }
        }
        Ok(users)
    }

    fn save_all(&mut self, users: &BTreeMap<String, User>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(users)?;
        std::fs::write(&self.path, text)?;
        debug!("Saved {} users to {}", users.len(), self.path.display());
        Ok(())
    }
}

/// Users in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    users: BTreeMap<String, User>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for MemoryStore {
    fn load_all(&self) -> Result<BTreeMap<String, User>, StoreError> {
        Ok(self.users.clone())
    }

    fn save_all(&mut self, users: &BTreeMap<String, User>) -> Result<(), StoreError> {
        self.users = users.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::user::DEFAULT_AVATAR;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("blast-grid-{}", Uuid::new_v4()))
            .join("users.json")
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.load_user("ada").unwrap().is_none());

        let mut user = User::new("ada", "Blue Avatar");
        user.highscore = 1234;
        store.save_user(&user).unwrap();
        assert_eq!(store.load_user("ada").unwrap(), Some(user));
    }

    #[test]
    fn test_json_store_missing_file_is_empty() {
        let store = JsonFileStore::new(temp_path());
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_json_store_persists() {
        let path = temp_path();
        let mut store = JsonFileStore::new(&path);
        store.save_user(&User::new("ada", "Red Avatar")).unwrap();
        store.save_user(&User::new("bob", "Black Avatar")).unwrap();

        let reopened = JsonFileStore::new(&path);
        let users = reopened.load_all().unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users["bob"].avatar, "Black Avatar");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_store_malformed_file_is_error() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json {").unwrap();

        let mut store = JsonFileStore::new(&path);
        assert!(matches!(store.load_all(), Err(StoreError::Json(_))));

        // A save must not clobber a file it could not read
        assert!(store.save_user(&User::new("cy", DEFAULT_AVATAR)).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "not json {");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_store_skips_bad_record_and_keeps_the_rest() {
        let path = temp_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut ada = User::new("ada", "Red Avatar");
        ada.level = 7;
        ada.highscore = 9_000;
        let text = serde_json::json!({
            "ada": ada,
            "bob": { "username": "bob", "level": "three" },
        });
        std::fs::write(&path, text.to_string()).unwrap();

        let mut store = JsonFileStore::new(&path);
        let users = store.load_all().unwrap();
        assert_eq!(users.keys().collect::<Vec<_>>(), vec!["ada"]);

        store.save_user(&User::new("cy", DEFAULT_AVATAR)).unwrap();
        let users = JsonFileStore::new(&path).load_all().unwrap();
        assert_eq!(users.keys().collect::<Vec<_>>(), vec!["ada", "cy"]);
        assert_eq!(users["ada"], ada);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_json_store_unreadable_path_is_error() {
        // A directory where the file should be
        let path = temp_path();
        std::fs::create_dir_all(&path).unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load_all(), Err(StoreError::Io(_))));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
