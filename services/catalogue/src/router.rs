//! services/catalogue/src/router.rs
//!
//! The route table: maps paths to routes and builds the navigation menu.

use catalogue_core::navigation::Route;

/// Resolves a path typed into the shell.
///
/// `/genres/{id}` resolves with an empty name; the shell fills it in from the genre
/// listing when the user came from there.
pub fn resolve(path: &str) -> Option<Route> {
    let path = path.trim();
    let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
    let segments: Vec<&str> = path
        .strip_prefix('/')?
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let route = match segments.as_slice() {
        [] => Route::Home,
        ["movies"] => Route::Movies,
        ["movies", id] => Route::Movie(id.parse().ok()?),
        ["genres"] => Route::Genres,
        ["genres", id] => Route::Genre {
            id: id.parse().ok()?,
            name: String::new(),
        },
        ["login"] => Route::Login,
        ["logout"] => Route::Logout,
        ["admin"] => Route::Admin,
        ["admin", "movie", id] => Route::EditMovie(id.parse().ok()?),
        ["graphql"] => Route::Graphql,
        ["moviesgraphql", id] => Route::GraphqlMovie(id.parse().ok()?),
        _ => return None,
    };
    Some(route)
}

/// Menu entries; admin entries only show with a session.
pub fn menu(authenticated: bool) -> Vec<(&'static str, Route)> {
    let mut entries = vec![
        ("Home", Route::Home),
        ("Movies", Route::Movies),
        ("Genres", Route::Genres),
    ];
    if authenticated {
        entries.push(("Add movie", Route::EditMovie(0)));
        entries.push(("Manage Catalogue", Route::Admin));
    }
    entries.push(("GraphQL", Route::Graphql));
    if authenticated {
        entries.push(("Logout", Route::Logout));
    } else {
        entries.push(("Login", Route::Login));
    }
    entries
}
