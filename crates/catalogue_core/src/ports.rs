//! crates/catalogue_core/src/ports.rs
//!
//! Defines the service contracts (traits) the views depend on.
//! The catalogue backend and the client-side token storage sit behind these ports,
//! keeping the view logic independent of HTTP and of the filesystem.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{Credentials, FieldMap, Genre, Movie};
use crate::graphql::GraphqlQuery;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The request never produced a response.
    #[error("Network failure: {0}")]
    Network(String),
    /// The backend answered with a non-success status or an error payload.
    #[error("{message}")]
    Server {
        status: Option<u16>,
        message: String,
    },
    #[error("Unexpected response body: {0}")]
    Decode(String),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The error a non-200 reply turns into.
    pub fn status(status: u16) -> Self {
        PortError::Server {
            status: Some(status),
            message: format!("Invalid response code: {}", status),
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Replies
//=========================================================================================

/// A response from a read endpoint.
///
/// Non-200 replies are soft failures: the body is still parsed when possible and
/// handed back together with the status code.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply<T> {
    pub status: u16,
    pub body: Option<T>,
}

impl<T> Reply<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: 200,
            body: Some(body),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }

    /// Collapses the reply into the payload, or the error a view displays.
    pub fn into_data(self) -> PortResult<T> {
        if !self.is_success() {
            return Err(PortError::status(self.status));
        }
        self.body.ok_or_else(|| {
            PortError::Decode("response body did not match the expected shape".to_string())
        })
    }
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The catalogue backend, one operation per endpoint.
#[async_trait]
pub trait CatalogueApi: Send + Sync {
    // --- Public reads ---
    async fn list_movies(&self) -> PortResult<Reply<Vec<Movie>>>;

    async fn movies_by_genre(&self, genre_id: u32) -> PortResult<Reply<Vec<Movie>>>;

    async fn get_movie(&self, id: u32) -> PortResult<Reply<Movie>>;

    async fn list_genres(&self) -> PortResult<Reply<Vec<Genre>>>;

    /// Runs a GraphQL query and returns its `data` object.
    async fn graphql(&self, query: &GraphqlQuery) -> PortResult<Reply<Value>>;

    // --- Auth ---
    /// Exchanges credentials for a bearer token.
    /// A rejection carries the server-supplied message.
    async fn sign_in(&self, credentials: &Credentials) -> PortResult<String>;

    // --- Admin (bearer token attached) ---
    async fn save_movie(&self, fields: &FieldMap) -> PortResult<()>;

    async fn delete_movie(&self, id: u32) -> PortResult<()>;
}

/// Local client storage for the serialized auth token.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> PortResult<Option<String>>;

    fn save(&self, token: &str) -> PortResult<()>;

    fn remove(&self) -> PortResult<()>;
}
