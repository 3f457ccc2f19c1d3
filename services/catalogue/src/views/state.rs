//! services/catalogue/src/views/state.rs
//!
//! Defines the application state shared by every view.

use crate::config::Config;
use catalogue_core::ports::CatalogueApi;
use catalogue_core::session::SessionStore;
use std::sync::Arc;

/// The shared application state, created once at startup and handed to every view.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<dyn CatalogueApi>,
    pub session: Arc<SessionStore>,
    pub config: Arc<Config>,
}
