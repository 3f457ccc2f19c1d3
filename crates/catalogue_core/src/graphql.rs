//! crates/catalogue_core/src/graphql.rs
//!
//! The GraphQL queries the catalogue issues and the extraction of their results.

use serde_json::Value;

use crate::domain::Movie;
use crate::ports::{PortError, PortResult};

/// Search terms shorter than this list the whole catalogue instead.
pub const MIN_SEARCH_LEN: usize = 2;

const LIST_SELECTION: &str = "id title runtime year description";
const DETAIL_SELECTION: &str =
    "id title runtime year description release_date rating mpaa_rating";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphqlQuery {
    List,
    Search(String),
    Movie(u32),
}

impl GraphqlQuery {
    /// Picks between listing and searching for the given search-box contents.
    pub fn for_search_term(term: &str) -> Self {
        if term.chars().count() >= MIN_SEARCH_LEN {
            GraphqlQuery::Search(term.to_string())
        } else {
            GraphqlQuery::List
        }
    }

    /// The field of `data` that holds this query's result.
    pub fn root_field(&self) -> &'static str {
        match self {
            GraphqlQuery::List => "list",
            GraphqlQuery::Search(_) => "search",
            GraphqlQuery::Movie(_) => "movie",
        }
    }

    /// The query document sent as the request body.
    pub fn text(&self) -> String {
        match self {
            GraphqlQuery::List => format!("{{ list {{ {} }} }}", LIST_SELECTION),
            GraphqlQuery::Search(term) => format!(
                "{{ search(titleContains: {}) {{ {} }} }}",
                string_literal(term),
                LIST_SELECTION
            ),
            GraphqlQuery::Movie(id) => {
                format!("{{ movie(id: {}) {{ {} }} }}", id, DETAIL_SELECTION)
            }
        }
    }

    /// Reads the movie list out of a `list` or `search` result.
    ///
    /// A null result (the backend's answer to a search without hits) is an empty list.
    pub fn movies(&self, data: &Value) -> PortResult<Vec<Movie>> {
        let items: Vec<Value> = match data.get(self.root_field()) {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items.clone(),
            Some(Value::Object(map)) => map.values().cloned().collect(),
            Some(other) => {
                return Err(PortError::Decode(format!(
                    "expected a list under '{}', got {}",
                    self.root_field(),
                    other
                )))
            }
        };
        items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(|e| PortError::Decode(e.to_string())))
            .collect()
    }

    /// Reads a single movie out of a `movie` result.
    pub fn movie(&self, data: &Value) -> PortResult<Movie> {
        match data.get(self.root_field()) {
            None | Some(Value::Null) => Err(PortError::NotFound(self.describe())),
            Some(item) => {
                serde_json::from_value(item.clone()).map_err(|e| PortError::Decode(e.to_string()))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            GraphqlQuery::Movie(id) => format!("movie {}", id),
            other => other.root_field().to_string(),
        }
    }
}

/// Quotes user input as a GraphQL string literal. JSON string escaping is a valid
/// subset of GraphQL's.
fn string_literal(raw: &str) -> String {
    serde_json::to_string(raw).unwrap_or_else(|_| "\"\"".to_string())
}
