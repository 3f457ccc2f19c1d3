//! crates/catalogue_core/src/session.rs
//!
//! The shared holder of the current auth token.

use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::ports::{PortResult, TokenStorage};

/// Process-wide session, injected into every view and adapter that needs it.
///
/// The token is opaque. Storage failures are logged and otherwise ignored, a broken
/// store simply means the client starts unauthenticated.
pub struct SessionStore {
    storage: Arc<dyn TokenStorage>,
    inner: Mutex<SessionInner>,
}

#[derive(Default)]
struct SessionInner {
    token: Option<String>,
    hydrated: bool,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        Self {
            storage,
            inner: Mutex::new(SessionInner::default()),
        }
    }

    /// A session backed by nothing but memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStorage::default()))
    }

    /// Returns the current token, hydrating from storage on first access.
    pub fn get(&self) -> Option<String> {
        let mut inner = self.lock();
        if inner.token.is_none() && !inner.hydrated {
            inner.hydrated = true;
            match self.storage.load() {
                Ok(token) => {
                    inner.token = token.filter(|t| !t.is_empty());
                    debug!(restored = inner.token.is_some(), "Session hydrated from storage");
                }
                Err(e) => warn!("Ignoring unreadable session storage: {}", e),
            }
        }
        inner.token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }

    /// Stores the token in memory and persists it.
    pub fn set(&self, token: impl Into<String>) {
        let token = token.into();
        let mut inner = self.lock();
        if let Err(e) = self.storage.save(&token) {
            warn!("Failed to persist session token: {}", e);
        }
        inner.token = Some(token);
        inner.hydrated = true;
    }

    /// Removes the token from memory and from storage.
    pub fn clear(&self) {
        let mut inner = self.lock();
        if let Err(e) = self.storage.remove() {
            warn!("Failed to remove persisted session token: {}", e);
        }
        inner.token = None;
        inner.hydrated = true;
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Token storage that lives and dies with the process.
#[derive(Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<String>> {
        self.token.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> PortResult<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> PortResult<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> PortResult<()> {
        *self.slot() = None;
        Ok(())
    }
}
