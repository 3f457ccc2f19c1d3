//! services/catalogue/src/render.rs
//!
//! Plain-text rendering of view state for the terminal shell.

use catalogue_core::domain::{FieldMap, Genre, GenreMovies, Movie, MpaaRating};
use catalogue_core::form::{FormState, NoticeKind};
use catalogue_core::loader::ViewState;
use catalogue_core::navigation::Route;
use std::fmt::Write;

/// Descriptions longer than this are cut in list views.
pub const PREVIEW_LEN: usize = 100;

pub fn preview(description: &str) -> String {
    if description.chars().count() > PREVIEW_LEN {
        let cut: String = description.chars().take(PREVIEW_LEN).collect();
        format!("{} ...", cut)
    } else {
        description.to_string()
    }
}

/// Renders the non-loaded states uniformly and delegates the loaded one.
pub fn view<T>(state: &ViewState<T>, loaded: impl FnOnce(&T) -> String) -> String {
    match state {
        ViewState::Idle | ViewState::Loading => "Loading ...".to_string(),
        ViewState::Failed(message) => format!("Error: {}", message),
        ViewState::Loaded(data) => loaded(data),
    }
}

fn link(out: &mut String, label: &str, route: &Route) {
    let _ = writeln!(out, "  {:<40} {}", label, route);
}

pub fn movie_list(heading: &str, movies: &[Movie], to: impl Fn(&Movie) -> Route) -> String {
    let mut out = format!("{}\n", heading);
    for movie in movies {
        link(&mut out, &movie.title, &to(movie));
    }
    out
}

pub fn genres(genres: &[Genre]) -> String {
    let mut out = "Genres\n".to_string();
    for genre in genres {
        link(
            &mut out,
            &genre.name,
            &Route::Genre {
                id: genre.id,
                name: genre.name.clone(),
            },
        );
    }
    out
}

pub fn genre(data: &GenreMovies) -> String {
    movie_list(&format!("Genre: {}", data.name), &data.movies, |m| {
        Route::Movie(m.id)
    })
}

pub fn movie(movie: &Movie) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Movie: {} ({})", movie.title, movie.year);
    let _ = writeln!(
        out,
        "Rating: {}",
        movie.mpaa_rating.map(|r| r.as_str()).unwrap_or("-")
    );
    if !movie.genres.is_empty() {
        let _ = writeln!(out, "Genres: {}", movie.genres.join(", "));
    }
    let _ = writeln!(out, "Title:       {}", movie.title);
    let _ = writeln!(out, "Description: {}", movie.description);
    let _ = writeln!(out, "Runtime:     {}", movie.runtime);
    out
}

/// GraphQL listing entries show year, runtime and a description preview.
pub fn graphql_movies(movies: &[Movie]) -> String {
    let mut out = "GraphQL\n".to_string();
    for movie in movies {
        link(&mut out, &movie.title, &Route::GraphqlMovie(movie.id));
        let _ = writeln!(out, "    ({} - {} minutes)", movie.year, movie.runtime);
        let _ = writeln!(out, "    {}", preview(&movie.description));
    }
    out
}

fn notice(out: &mut String, state: &FormState) {
    if let Some(notice) = &state.notice {
        let tag = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Error => "error",
        };
        let _ = writeln!(out, "[{}] {}", tag, notice.message);
    }
}

fn field(out: &mut String, state: &FormState, name: &str, label: &str, error: Option<&str>) {
    let value = state.fields.get(name).map(String::as_str).unwrap_or("");
    let invalid = state.validation_errors.contains(name);
    let _ = writeln!(
        out,
        "{} {:<14} {}",
        if invalid { "!" } else { " " },
        label,
        value
    );
    if let (true, Some(message)) = (invalid, error) {
        let _ = writeln!(out, "  {}", message);
    }
}

pub fn movie_form(state: &FormState) -> String {
    let mut out = "Add/Edit Movie\n".to_string();
    notice(&mut out, state);
    field(&mut out, state, "title", "Title", Some("Please enter a Title"));
    field(&mut out, state, "release_date", "Release date", None);
    field(&mut out, state, "runtime", "Runtime", None);
    field(
        &mut out,
        state,
        "mpaa_rating",
        "MPAA rating",
        Some("Please choose a rating"),
    );
    let options: Vec<&str> = MpaaRating::ALL.iter().map(|r| r.as_str()).collect();
    let _ = writeln!(out, "  {:<14} {}", "", options.join(" | "));
    field(&mut out, state, "rating", "Rating", None);
    field(&mut out, state, "description", "Description", None);
    out
}

pub fn login_form(state: &FormState) -> String {
    let mut out = "Login\n".to_string();
    notice(&mut out, state);
    let mut masked = FormState {
        fields: FieldMap::new(),
        ..state.clone()
    };
    masked.fields.insert(
        "email".to_string(),
        state.fields.get("email").cloned().unwrap_or_default(),
    );
    let password_len = state.fields.get("password").map_or(0, |p| p.chars().count());
    masked
        .fields
        .insert("password".to_string(), "*".repeat(password_len));
    field(
        &mut out,
        &masked,
        "email",
        "Email",
        Some("Please enter a valid email address"),
    );
    field(&mut out, &masked, "password", "Password", Some("Please enter a password"));
    out
}

pub fn menu(entries: &[(&'static str, Route)]) -> String {
    let mut out = String::new();
    for (label, route) in entries {
        link(&mut out, label, route);
    }
    out
}
