pub mod edit_movie;
pub mod genres;
pub mod graphql;
pub mod login;
pub mod movies;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

// Re-export the views so the shell can mount them by route.
pub use edit_movie::EditMovieView;
pub use genres::{GenreView, GenresView};
pub use graphql::{GraphqlMovieView, GraphqlSearchView};
pub use login::LoginView;
pub use movies::{AdminView, MovieView, MoviesView};
pub use state::AppState;
