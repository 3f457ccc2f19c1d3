//! services/catalogue/src/views/movies.rs
//!
//! Movie list and movie detail views, plus the admin catalogue listing.

use crate::views::state::AppState;
use catalogue_core::domain::Movie;
use catalogue_core::loader::{DataLoader, LoadOutcome, ViewState};
use std::sync::Arc;

/// `/movies`: every movie, in server order.
pub struct MoviesView {
    app: Arc<AppState>,
    loader: DataLoader<(), Vec<Movie>>,
}

impl MoviesView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::new(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load((), |_| async move { api.list_movies().await?.into_data() })
            .await
    }

    pub async fn state(&self) -> ViewState<Vec<Movie>> {
        self.loader.state().await
    }
}

/// `/admin`: the same listing, linking to the edit form. Needs a session.
pub struct AdminView {
    app: Arc<AppState>,
    loader: DataLoader<(), Vec<Movie>>,
}

impl AdminView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::protected(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load((), |_| async move { api.list_movies().await?.into_data() })
            .await
    }

    pub async fn state(&self) -> ViewState<Vec<Movie>> {
        self.loader.state().await
    }
}

/// `/movies/{id}`: one movie with its genres.
pub struct MovieView {
    app: Arc<AppState>,
    loader: DataLoader<u32, Movie>,
}

impl MovieView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::new(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self, id: u32) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load(id, |id| async move { api.get_movie(id).await?.into_data() })
            .await
    }

    pub async fn state(&self) -> ViewState<Movie> {
        self.loader.state().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{app, signed_in_app, FakeApi};
    use catalogue_core::navigation::Route;
    use catalogue_core::ports::Reply;

    #[tokio::test]
    async fn movies_load_in_server_order() {
        let api = FakeApi::default().with_movies(vec![
            FakeApi::movie(3, "Casablanca"),
            FakeApi::movie(1, "Alien"),
        ]);
        let view = MoviesView::new(app(api));

        assert_eq!(view.mount().await, LoadOutcome::Committed);
        let titles: Vec<String> = match view.state().await {
            ViewState::Loaded(movies) => movies.into_iter().map(|m| m.title).collect(),
            other => panic!("expected loaded, got {:?}", other),
        };
        assert_eq!(titles, vec!["Casablanca", "Alien"]);
    }

    #[tokio::test]
    async fn non_200_fails_with_status() {
        let api = FakeApi::default().with_movies_reply(Reply {
            status: 502,
            body: None,
        });
        let view = MoviesView::new(app(api));
        view.mount().await;
        assert_eq!(
            view.state().await,
            ViewState::Failed("Invalid response code: 502".to_string())
        );
    }

    #[tokio::test]
    async fn admin_without_session_redirects_without_calls() {
        let api = FakeApi::default();
        let calls = api.calls.clone();
        let view = AdminView::new(app(api));

        assert_eq!(view.mount().await, LoadOutcome::Redirect(Route::Login));
        assert_eq!(calls.total(), 0);
        assert_eq!(view.state().await, ViewState::Idle);
    }

    #[tokio::test]
    async fn admin_with_session_lists_movies() {
        let api = FakeApi::default().with_movies(vec![FakeApi::movie(1, "Alien")]);
        let view = AdminView::new(signed_in_app(api));
        assert_eq!(view.mount().await, LoadOutcome::Committed);
        assert_eq!(view.state().await.loaded().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn movie_detail_fetches_requested_id() {
        let api = FakeApi::default().with_movies(vec![
            FakeApi::movie(1, "Alien"),
            FakeApi::movie(2, "Heat"),
        ]);
        let view = MovieView::new(app(api));
        view.mount(2).await;
        assert_eq!(view.state().await.loaded().map(|m| m.title.as_str()), Some("Heat"));
    }
}
