//! Persisted credential storage.
//!
//! The application keeps exactly one credential: the bearer token under the
//! key [`TOKEN_KEY`]. Everything that reads or writes it goes through
//! [`SessionStore`] so the backing storage can be swapped (memory for tests
//! and per-request gateway state, a JSON file for the CLI).

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde_json::{Map, Value};

use crate::error::StoreError;

/// Fixed storage key of the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Get/set/clear access to the persisted bearer token.
pub trait SessionStore: Send + Sync {
    /// Current token, if one is stored.
    fn get(&self) -> Option<String>;

    /// Persist a token, replacing any previous one.
    fn set(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the stored token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    token: RwLock<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-loaded with a token.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Option<String> {
        self.token.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self.token.write().unwrap_or_else(|p| p.into_inner());
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.token.write().unwrap_or_else(|p| p.into_inner());
        *guard = None;
        Ok(())
    }
}

/// JSON key/value document on disk, e.g. `{"token": "eyJ..."}`.
///
/// Other keys in the document are preserved on write, whatever their value
/// type. A missing file is an empty store. A document that cannot be parsed
/// reads as "no token" and is never overwritten.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Map<String, Value>, StoreError> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl SessionStore for FileStore {
    /// Unreadable or corrupt storage reads as "no token".
    fn get(&self) -> Option<String> {
        match self.load() {
            Ok(entries) => entries.get(TOKEN_KEY).and_then(Value::as_str).map(str::to_string),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to read credential storage");
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), StoreError> {
        let mut entries = self.load()?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(token.to_string()));
        self.save(&entries)?;
        tracing::debug!(path = %self.path.display(), "Stored token");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        let mut entries = self.load()?;
        if entries.remove(TOKEN_KEY).is_some() {
            self.save(&entries)?;
            tracing::debug!(path = %self.path.display(), "Cleared token");
        }
        Ok(())
    }
}
