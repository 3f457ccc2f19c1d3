//! services/catalogue/src/adapters/token_file.rs
//!
//! This module contains the file-backed implementation of the `TokenStorage` port.
//! The file is a small JSON object of string entries; the token lives under a fixed
//! key, serialized as a JSON string of its own.

use catalogue_core::ports::{PortError, PortResult, TokenStorage};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::debug;

/// Key of the token entry.
pub const TOKEN_KEY: &str = "jwt";

pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> PortResult<Map<String, Value>> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(PortError::Storage(e.to_string())),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(entries)) => Ok(entries),
            Ok(_) => Err(PortError::Storage(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
            Err(e) => Err(PortError::Storage(e.to_string())),
        }
    }

    fn write_entries(&self, entries: &Map<String, Value>) -> PortResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| PortError::Storage(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| PortError::Storage(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| PortError::Storage(e.to_string()))
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> PortResult<Option<String>> {
        let entries = self.read_entries()?;
        let Some(entry) = entries.get(TOKEN_KEY) else {
            return Ok(None);
        };
        let serialized = entry.as_str().ok_or_else(|| {
            PortError::Storage(format!("'{}' entry is not a string", TOKEN_KEY))
        })?;
        let token: String =
            serde_json::from_str(serialized).map_err(|e| PortError::Storage(e.to_string()))?;
        debug!(path = %self.path.display(), "Loaded persisted token");
        Ok(Some(token))
    }

    fn save(&self, token: &str) -> PortResult<()> {
        // An unreadable file is replaced rather than blocking the login.
        let mut entries = self.read_entries().unwrap_or_default();
        let serialized =
            serde_json::to_string(token).map_err(|e| PortError::Storage(e.to_string()))?;
        entries.insert(TOKEN_KEY.to_string(), Value::String(serialized));
        self.write_entries(&entries)
    }

    fn remove(&self) -> PortResult<()> {
        let mut entries = self.read_entries().unwrap_or_default();
        entries.remove(TOKEN_KEY);
        if entries.is_empty() {
            return match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(PortError::Storage(e.to_string())),
            };
        }
        self.write_entries(&entries)
    }
}
