//! services/catalogue/src/views/edit_movie.rs
//!
//! The admin add/edit form for a movie. Movie id 0 is a new, unsaved movie.

use crate::views::state::AppState;
use async_trait::async_trait;
use catalogue_core::domain::{FieldMap, Movie, MpaaRating};
use catalogue_core::form::{missing_fields, FormAction, FormController};
use catalogue_core::loader::{DataLoader, LoadOutcome, ViewState};
use catalogue_core::navigation::Route;
use catalogue_core::normalize;
use catalogue_core::ports::{CatalogueApi, PortError, PortResult};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Fields of the movie form, in display order. All of them are sent on save.
pub const MOVIE_FIELDS: [&str; 7] = [
    "id",
    "title",
    "release_date",
    "runtime",
    "mpaa_rating",
    "rating",
    "description",
];

/// Form fields for an existing movie. The release date loses its time component.
pub fn movie_fields(movie: &Movie) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("id".to_string(), movie.id.to_string());
    fields.insert("title".to_string(), movie.title.clone());
    fields.insert(
        "release_date".to_string(),
        normalize::date_field(movie.release_date),
    );
    fields.insert("runtime".to_string(), movie.runtime.to_string());
    fields.insert(
        "mpaa_rating".to_string(),
        movie
            .mpaa_rating
            .map(|r| r.as_str().to_string())
            .unwrap_or_default(),
    );
    fields.insert("rating".to_string(), movie.rating.clone());
    fields.insert("description".to_string(), movie.description.clone());
    fields
}

/// Form fields for a movie that does not exist yet.
pub fn blank_movie_fields() -> FieldMap {
    MOVIE_FIELDS
        .iter()
        .map(|name| {
            let value = if *name == "id" { "0" } else { "" };
            (name.to_string(), value.to_string())
        })
        .collect()
}

/// A title is required; a rating, when chosen, must be one of the MPAA ratings.
pub fn validate_movie_fields(fields: &FieldMap) -> BTreeSet<String> {
    let mut errors = missing_fields(fields, &["title"]);
    if let Some(rating) = fields.get("mpaa_rating").filter(|r| !r.is_empty()) {
        if rating.parse::<MpaaRating>().is_err() {
            errors.insert("mpaa_rating".to_string());
        }
    }
    errors
}

fn movie_id(fields: &FieldMap) -> u32 {
    fields
        .get("id")
        .and_then(|id| id.trim().parse().ok())
        .unwrap_or(0)
}

/// Saves or deletes the movie behind the form.
pub struct SaveMovie {
    api: Arc<dyn CatalogueApi>,
}

impl SaveMovie {
    pub fn new(api: Arc<dyn CatalogueApi>) -> Self {
        Self { api }
    }
}

#[async_trait]
impl FormAction for SaveMovie {
    fn validate(&self, fields: &FieldMap) -> BTreeSet<String> {
        validate_movie_fields(fields)
    }

    async fn submit(&self, fields: &FieldMap) -> PortResult<Route> {
        self.api.save_movie(fields).await?;
        Ok(Route::Admin)
    }

    fn can_delete(&self, fields: &FieldMap) -> bool {
        movie_id(fields) > 0
    }

    async fn delete(&self, fields: &FieldMap) -> PortResult<Route> {
        self.api.delete_movie(movie_id(fields)).await?;
        Ok(Route::Admin)
    }
}

/// `/admin/movie/{id}`. Needs a session.
pub struct EditMovieView {
    app: Arc<AppState>,
    loader: DataLoader<u32, FieldMap>,
    form: Option<FormController<SaveMovie>>,
}

impl EditMovieView {
    pub fn new(app: Arc<AppState>) -> Self {
        let loader = DataLoader::protected(app.session.clone());
        Self {
            app,
            loader,
            form: None,
        }
    }

    /// Loads the movie into the form; a new movie starts blank without a fetch.
    pub async fn mount(&mut self, id: u32) -> LoadOutcome {
        let api = self.app.api.clone();
        let outcome = self
            .loader
            .load(id, |id| async move {
                if id == 0 {
                    return Ok::<_, PortError>(blank_movie_fields());
                }
                let movie = api.get_movie(id).await?.into_data()?;
                Ok::<_, PortError>(movie_fields(&movie))
            })
            .await;

        if outcome == LoadOutcome::Unchanged {
            return outcome;
        }
        // The form always belongs to the last requested id, or there is none.
        self.form = match self.loader.state().await {
            ViewState::Loaded(fields) if outcome == LoadOutcome::Committed => Some(
                FormController::new(SaveMovie::new(self.app.api.clone()), fields),
            ),
            _ => None,
        };
        outcome
    }

    pub async fn state(&self) -> ViewState<FieldMap> {
        self.loader.state().await
    }

    pub fn form(&self) -> Option<&FormController<SaveMovie>> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut FormController<SaveMovie>> {
        self.form.as_mut()
    }
}
