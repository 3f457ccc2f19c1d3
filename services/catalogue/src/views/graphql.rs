//! services/catalogue/src/views/graphql.rs
//!
//! Views backed by the GraphQL endpoint: a search box over the catalogue and a
//! movie detail page.

use crate::views::state::AppState;
use catalogue_core::domain::Movie;
use catalogue_core::graphql::GraphqlQuery;
use catalogue_core::loader::{DataLoader, LoadOutcome, ViewState};
use std::sync::Arc;

/// `/graphql`: lists every movie, or searches by title once the term is long enough.
///
/// The tracked parameter is the query the term maps to, so typing below the search
/// threshold does not refetch the full list.
#[derive(Clone)]
pub struct GraphqlSearchView {
    app: Arc<AppState>,
    loader: DataLoader<GraphqlQuery, Vec<Movie>>,
}

impl GraphqlSearchView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::new(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self) -> LoadOutcome {
        self.search("").await
    }

    /// Called on every change of the search box.
    pub async fn search(&self, term: &str) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load(GraphqlQuery::for_search_term(term), |query| async move {
                let data = api.graphql(&query).await?.into_data()?;
                query.movies(&data)
            })
            .await
    }

    pub async fn query(&self) -> Option<GraphqlQuery> {
        self.loader.params().await
    }

    pub async fn state(&self) -> ViewState<Vec<Movie>> {
        self.loader.state().await
    }
}

/// `/moviesgraphql/{id}`
pub struct GraphqlMovieView {
    app: Arc<AppState>,
    loader: DataLoader<u32, Movie>,
}

impl GraphqlMovieView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::new(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self, id: u32) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load(id, |id| async move {
                let query = GraphqlQuery::Movie(id);
                let data = api.graphql(&query).await?.into_data()?;
                query.movie(&data)
            })
            .await
    }

    pub async fn state(&self) -> ViewState<Movie> {
        self.loader.state().await
    }
}
