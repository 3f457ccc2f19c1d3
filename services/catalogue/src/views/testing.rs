//! In-memory `CatalogueApi` used by the view tests.

use crate::config::Config;
use crate::views::state::AppState;
use async_trait::async_trait;
use catalogue_core::domain::{Credentials, FieldMap, Genre, Movie};
use catalogue_core::graphql::GraphqlQuery;
use catalogue_core::ports::{CatalogueApi, PortResult, Reply};
use catalogue_core::session::{MemoryTokenStorage, SessionStore};
use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

#[derive(Default)]
pub struct Calls {
    counts: Mutex<BTreeMap<&'static str, usize>>,
}

impl Calls {
    fn record(&self, name: &'static str) {
        *self.counts.lock().unwrap().entry(name).or_default() += 1;
    }

    pub fn count(&self, name: &str) -> usize {
        self.counts.lock().unwrap().get(name).copied().unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.lock().unwrap().values().sum()
    }
}

pub struct FakeApi {
    pub calls: Arc<Calls>,
    pub movies: Vec<Movie>,
    pub genres: Vec<Genre>,
    pub by_genre: HashMap<u32, Vec<Movie>>,
    pub movies_reply: Option<Reply<Vec<Movie>>>,
    pub graphql_reply: Option<Reply<Value>>,
    pub sign_in_result: PortResult<String>,
    pub command_result: PortResult<()>,
    pub saved: Arc<Mutex<Vec<FieldMap>>>,
    pub deleted: Arc<Mutex<Vec<u32>>>,
    pub last_credentials: Arc<Mutex<Option<Credentials>>>,
    /// GraphQL queries (by text) that wait for a signal before answering.
    pub gates: Mutex<HashMap<String, oneshot::Receiver<()>>>,
}

impl Default for FakeApi {
    fn default() -> Self {
        Self {
            calls: Arc::new(Calls::default()),
            movies: Vec::new(),
            genres: Vec::new(),
            by_genre: HashMap::new(),
            movies_reply: None,
            graphql_reply: None,
            sign_in_result: Ok("test-token".to_string()),
            command_result: Ok(()),
            saved: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            last_credentials: Arc::new(Mutex::new(None)),
            gates: Mutex::new(HashMap::new()),
        }
    }
}

impl FakeApi {
    pub fn movie(id: u32, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            ..Movie::default()
        }
    }

    pub fn with_movies(mut self, movies: Vec<Movie>) -> Self {
        self.movies = movies;
        self
    }

    pub fn with_genres(mut self, genres: Vec<Genre>) -> Self {
        self.genres = genres;
        self
    }

    pub fn with_movies_reply(mut self, reply: Reply<Vec<Movie>>) -> Self {
        self.movies_reply = Some(reply);
        self
    }

    pub fn with_graphql_reply(mut self, reply: Reply<Value>) -> Self {
        self.graphql_reply = Some(reply);
        self
    }

    /// Holds back the answer to `query` until the returned sender fires.
    pub fn gate(&self, query: &GraphqlQuery) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(query.text(), rx);
        tx
    }

    fn movie_values(movies: &[Movie]) -> Value {
        serde_json::to_value(movies).unwrap_or(Value::Null)
    }
}

#[async_trait]
impl CatalogueApi for FakeApi {
    async fn list_movies(&self) -> PortResult<Reply<Vec<Movie>>> {
        self.calls.record("list_movies");
        Ok(self
            .movies_reply
            .clone()
            .unwrap_or_else(|| Reply::ok(self.movies.clone())))
    }

    async fn movies_by_genre(&self, genre_id: u32) -> PortResult<Reply<Vec<Movie>>> {
        self.calls.record("movies_by_genre");
        Ok(Reply::ok(self.by_genre.get(&genre_id).cloned().unwrap_or_default()))
    }

    async fn get_movie(&self, id: u32) -> PortResult<Reply<Movie>> {
        self.calls.record("get_movie");
        Ok(match self.movies.iter().find(|m| m.id == id) {
            Some(movie) => Reply::ok(movie.clone()),
            None => Reply {
                status: 404,
                body: None,
            },
        })
    }

    async fn list_genres(&self) -> PortResult<Reply<Vec<Genre>>> {
        self.calls.record("list_genres");
        Ok(Reply::ok(self.genres.clone()))
    }

    async fn graphql(&self, query: &GraphqlQuery) -> PortResult<Reply<Value>> {
        self.calls.record("graphql");
        let gate = self.gates.lock().unwrap().remove(&query.text());
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(reply) = &self.graphql_reply {
            return Ok(reply.clone());
        }
        let data = match query {
            GraphqlQuery::List => json!({ "list": Self::movie_values(&self.movies) }),
            GraphqlQuery::Search(term) => {
                let term = term.to_lowercase();
                let hits: Vec<Movie> = self
                    .movies
                    .iter()
                    .filter(|m| m.title.to_lowercase().contains(&term))
                    .cloned()
                    .collect();
                if hits.is_empty() {
                    json!({ "search": null })
                } else {
                    json!({ "search": Self::movie_values(&hits) })
                }
            }
            GraphqlQuery::Movie(id) => match self.movies.iter().find(|m| m.id == *id) {
                Some(movie) => json!({ "movie": movie }),
                None => json!({ "movie": null }),
            },
        };
        Ok(Reply::ok(data))
    }

    async fn sign_in(&self, credentials: &Credentials) -> PortResult<String> {
        self.calls.record("sign_in");
        *self.last_credentials.lock().unwrap() = Some(credentials.clone());
        self.sign_in_result.clone()
    }

    async fn save_movie(&self, fields: &FieldMap) -> PortResult<()> {
        self.calls.record("save_movie");
        self.saved.lock().unwrap().push(fields.clone());
        self.command_result.clone()
    }

    async fn delete_movie(&self, id: u32) -> PortResult<()> {
        self.calls.record("delete_movie");
        self.deleted.lock().unwrap().push(id);
        self.command_result.clone()
    }
}

fn build(api: FakeApi, session: SessionStore) -> Arc<AppState> {
    Arc::new(AppState {
        api: Arc::new(api),
        session: Arc::new(session),
        config: Arc::new(Config::from_lookup(|_| None).unwrap()),
    })
}

/// App state with nobody signed in.
pub fn app(api: FakeApi) -> Arc<AppState> {
    build(api, SessionStore::in_memory())
}

/// App state with a session token already persisted.
pub fn signed_in_app(api: FakeApi) -> Arc<AppState> {
    build(
        api,
        SessionStore::new(Arc::new(MemoryTokenStorage::with_token("test-token"))),
    )
}
