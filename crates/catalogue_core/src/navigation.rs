//! crates/catalogue_core/src/navigation.rs
//!
//! Navigation targets. Loaders and forms return these as side effects instead of
//! driving the shell themselves.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Movies,
    Movie(u32),
    Genres,
    /// The display name travels with the route, the genre view never re-fetches it.
    Genre { id: u32, name: String },
    Login,
    Logout,
    Admin,
    EditMovie(u32),
    Graphql,
    GraphqlMovie(u32),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Movies => "/movies".to_string(),
            Route::Movie(id) => format!("/movies/{}", id),
            Route::Genres => "/genres".to_string(),
            Route::Genre { id, .. } => format!("/genres/{}", id),
            Route::Login => "/login".to_string(),
            Route::Logout => "/logout".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::EditMovie(id) => format!("/admin/movie/{}", id),
            Route::Graphql => "/graphql".to_string(),
            Route::GraphqlMovie(id) => format!("/moviesgraphql/{}", id),
        }
    }

    /// Whether mounting this route needs a session token.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Admin | Route::EditMovie(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
