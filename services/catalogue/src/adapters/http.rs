//! services/catalogue/src/adapters/http.rs
//!
//! This module contains the REST/GraphQL adapter for the catalogue backend.
//! It implements the `CatalogueApi` port from the `core` crate using `reqwest`.

use async_trait::async_trait;
use catalogue_core::domain::{Credentials, FieldMap, Genre, Movie};
use catalogue_core::graphql::GraphqlQuery;
use catalogue_core::ports::{CatalogueApi, PortError, PortResult, Reply};
use catalogue_core::session::SessionStore;
use reqwest::{header::CONTENT_TYPE, Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `CatalogueApi` port over HTTP.
///
/// Admin endpoints get the session's bearer token attached when there is one.
#[derive(Clone)]
pub struct HttpCatalogueClient {
    client: Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpCatalogueClient {
    /// Creates a new `HttpCatalogueClient`.
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionStore>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Sends the request and parses whatever JSON body comes back, whatever the status.
    async fn send(&self, request: RequestBuilder) -> PortResult<(u16, Option<Value>)> {
        let response = request
            .send()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PortError::Network(e.to_string()))?;
        let body = match serde_json::from_slice::<Value>(&bytes) {
            Ok(body) => Some(body),
            Err(e) => {
                debug!(status, "Response body is not JSON: {}", e);
                None
            }
        };
        Ok((status, body))
    }

    /// Fetches `path` and reads `field` of the response envelope.
    async fn fetch<T: DeserializeOwned>(&self, path: &str, field: &str) -> PortResult<Reply<T>> {
        let (status, body) = self.send(self.client.get(self.url(path))).await?;
        debug!(path, status, "GET");
        Ok(envelope(status, body, field))
    }

    /// Fetches a movie list, treating an absent or null list as empty.
    async fn fetch_movies(&self, path: &str) -> PortResult<Reply<Vec<Movie>>> {
        let (status, body) = self.send(self.client.get(self.url(path))).await?;
        debug!(path, status, "GET");
        let movies = body.map(|body| match body.get("movies") {
            None | Some(Value::Null) => Some(Vec::new()),
            Some(list) => decode(list.clone()),
        });
        Ok(Reply {
            status,
            body: movies.flatten(),
        })
    }

    /// Runs an admin command whose success carries no data.
    async fn command(&self, request: RequestBuilder) -> PortResult<()> {
        let (status, body) = self.send(self.authorize(request)).await?;
        if let Some(error) = body.as_ref().and_then(server_error) {
            return Err(PortError::Server {
                status: Some(status),
                message: error,
            });
        }
        if !(200..300).contains(&status) {
            return Err(PortError::status(status));
        }
        Ok(())
    }
}

//=========================================================================================
// Response helpers
//=========================================================================================

fn decode<T: DeserializeOwned>(value: Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            warn!("Failed to decode response payload: {}", e);
            None
        }
    }
}

fn envelope<T: DeserializeOwned>(status: u16, body: Option<Value>, field: &str) -> Reply<T> {
    let body = body
        .and_then(|mut body| body.get_mut(field).map(Value::take))
        .and_then(decode);
    Reply { status, body }
}

/// Extracts `error.message` from an error payload.
fn server_error(body: &Value) -> Option<String> {
    let error = body.get("error")?;
    if error.is_null() {
        return None;
    }
    Some(
        error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string()),
    )
}

/// Extracts the messages of a GraphQL `errors` array.
fn graphql_errors(body: &Value) -> Option<String> {
    let errors = body.get("errors")?.as_array()?;
    if errors.is_empty() {
        return None;
    }
    let messages: Vec<String> = errors
        .iter()
        .map(|e| {
            e.get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string())
        })
        .collect();
    Some(messages.join("; "))
}

/// A GraphQL error payload. Views display these, so a non-200 status stays visible.
fn graphql_failure(status: u16, message: String) -> PortError {
    let message = if status == 200 {
        message
    } else {
        format!("Invalid response code: {}: {}", status, message)
    };
    PortError::Server {
        status: Some(status),
        message,
    }
}

//=========================================================================================
// `CatalogueApi` Trait Implementation
//=========================================================================================

#[async_trait]
impl CatalogueApi for HttpCatalogueClient {
    async fn list_movies(&self) -> PortResult<Reply<Vec<Movie>>> {
        self.fetch_movies("/v1/movies").await
    }

    async fn movies_by_genre(&self, genre_id: u32) -> PortResult<Reply<Vec<Movie>>> {
        self.fetch_movies(&format!("/v1/movies/{}", genre_id)).await
    }

    async fn get_movie(&self, id: u32) -> PortResult<Reply<Movie>> {
        self.fetch(&format!("/v1/movie/{}", id), "movie").await
    }

    async fn list_genres(&self) -> PortResult<Reply<Vec<Genre>>> {
        self.fetch("/v1/genres", "genres").await
    }

    async fn graphql(&self, query: &GraphqlQuery) -> PortResult<Reply<Value>> {
        let request = self
            .client
            .post(self.url("/v1/graphql"))
            .header(CONTENT_TYPE, "application/json")
            .body(query.text());
        let (status, body) = self.send(request).await?;
        debug!(field = query.root_field(), status, "GraphQL");

        if let Some(body) = body.as_ref() {
            if let Some(message) = graphql_errors(body).or_else(|| server_error(body)) {
                return Err(graphql_failure(status, message));
            }
        }
        Ok(envelope(status, body, "data"))
    }

    async fn sign_in(&self, credentials: &Credentials) -> PortResult<String> {
        let request = self.client.post(self.url("/v1/signin")).json(credentials);
        let (status, body) = self.send(request).await?;
        if let Some(message) = body.as_ref().and_then(server_error) {
            return Err(PortError::Server {
                status: Some(status),
                message,
            });
        }
        if status != 200 {
            return Err(PortError::status(status));
        }
        let body = body
            .ok_or_else(|| PortError::Decode("sign-in response is not JSON".to_string()))?;
        // The token is the first value of the response object, whatever its key.
        body.as_object()
            .and_then(|fields| fields.values().next())
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| PortError::Decode("sign-in response carries no token".to_string()))
    }

    async fn save_movie(&self, fields: &FieldMap) -> PortResult<()> {
        self.command(self.client.post(self.url("/v1/admin/editmovie")).json(fields))
            .await
    }

    async fn delete_movie(&self, id: u32) -> PortResult<()> {
        self.command(
            self.client
                .get(self.url(&format!("/v1/admin/deletemovie/{}", id))),
        )
        .await
    }
}
