//! services/catalogue/src/views/genres.rs
//!
//! Genre listing and the movies of one genre.

use crate::views::state::AppState;
use catalogue_core::domain::{Genre, GenreMovies};
use catalogue_core::loader::{DataLoader, LoadOutcome, ViewState};
use catalogue_core::navigation::Route;
use catalogue_core::ports::PortError;
use std::sync::Arc;

/// `/genres`
pub struct GenresView {
    app: Arc<AppState>,
    loader: DataLoader<(), Vec<Genre>>,
}

impl GenresView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::new(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load((), |_| async move { api.list_genres().await?.into_data() })
            .await
    }

    pub async fn state(&self) -> ViewState<Vec<Genre>> {
        self.loader.state().await
    }

    /// The route of the genre with `id`, carrying its display name along.
    pub async fn link(&self, id: u32) -> Route {
        let name = self
            .state()
            .await
            .loaded()
            .and_then(|genres| genres.iter().find(|g| g.id == id))
            .map(|g| g.name.clone())
            .unwrap_or_default();
        Route::Genre { id, name }
    }
}

/// `/genres/{id}`: movies of one genre, titled with the name the listing passed on.
pub struct GenreView {
    app: Arc<AppState>,
    loader: DataLoader<u32, GenreMovies>,
}

impl GenreView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::new(app.session.clone());
        Self { app, loader }
    }

    pub async fn mount(&self, id: u32, name: String) -> LoadOutcome {
        let api = self.app.api.clone();
        self.loader
            .load(id, |id| async move {
                let movies = api.movies_by_genre(id).await?.into_data()?;
                Ok::<_, PortError>(GenreMovies { name, movies })
            })
            .await
    }

    pub async fn state(&self) -> ViewState<GenreMovies> {
        self.loader.state().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::testing::{app, FakeApi};

    fn genre(id: u32, name: &str) -> Genre {
        Genre {
            id,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn listing_passes_name_through_route() {
        let api = FakeApi::default().with_genres(vec![genre(1, "Drama"), genre(2, "Comedy")]);
        let view = GenresView::new(app(api));
        view.mount().await;

        assert_eq!(
            view.link(2).await,
            Route::Genre {
                id: 2,
                name: "Comedy".to_string()
            }
        );
    }

    #[tokio::test]
    async fn genre_view_uses_carried_name_without_refetching_genres() {
        let mut api = FakeApi::default();
        api.by_genre.insert(4, vec![FakeApi::movie(9, "Airplane!")]);
        let calls = api.calls.clone();
        let view = GenreView::new(app(api));

        view.mount(4, "Comedy".to_string()).await;

        let loaded = view.state().await;
        let data = loaded.loaded().expect("genre movies loaded");
        assert_eq!(data.name, "Comedy");
        assert_eq!(data.movies.len(), 1);
        assert_eq!(calls.count("list_genres"), 0);
    }

    #[tokio::test]
    async fn genre_without_movies_is_empty_not_failed() {
        let view = GenreView::new(app(FakeApi::default()));
        view.mount(7, "Western".to_string()).await;
        assert_eq!(
            view.state().await,
            ViewState::Loaded(GenreMovies {
                name: "Western".to_string(),
                movies: Vec::new()
            })
        );
    }
}
