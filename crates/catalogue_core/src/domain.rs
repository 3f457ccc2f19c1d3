//! crates/catalogue_core/src/domain.rs
//!
//! Defines the core data structures of the catalogue client.
//! Wire-format quirks of the backend (keyed genre maps, timestamped release dates,
//! numeric ratings) are absorbed here so views only ever see the normalised shape.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::normalize;

/// Field name to raw input value, as held by a form.
pub type FieldMap = BTreeMap<String, String>;

/// MPAA rating of a movie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MpaaRating {
    #[serde(rename = "G")]
    G,
    #[serde(rename = "PG")]
    Pg,
    #[serde(rename = "PG-13")]
    Pg13,
    #[serde(rename = "R")]
    R,
    #[serde(rename = "NC17")]
    Nc17,
}

impl MpaaRating {
    /// Every rating, in the order the edit form offers them.
    pub const ALL: [MpaaRating; 5] = [
        MpaaRating::G,
        MpaaRating::Pg,
        MpaaRating::Pg13,
        MpaaRating::R,
        MpaaRating::Nc17,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MpaaRating::G => "G",
            MpaaRating::Pg => "PG",
            MpaaRating::Pg13 => "PG-13",
            MpaaRating::R => "R",
            MpaaRating::Nc17 => "NC17",
        }
    }
}

impl fmt::Display for MpaaRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown MPAA rating '{0}'")]
pub struct UnknownRating(pub String);

impl FromStr for MpaaRating {
    type Err = UnknownRating;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MpaaRating::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownRating(s.to_string()))
    }
}

/// A movie as presented by the catalogue.
///
/// Every field except `id` may be missing from a payload, GraphQL selections only
/// return the fields they ask for.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u32,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(
        default,
        deserialize_with = "release_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub year: u32,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub runtime: u32,
    #[serde(
        default,
        deserialize_with = "mpaa_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub mpaa_rating: Option<MpaaRating>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub rating: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: String,
    #[serde(default, deserialize_with = "genres")]
    pub genres: Vec<String>,
}

/// A genre entry of the genre listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u32,
    #[serde(rename = "genre_name", alias = "name", default)]
    pub name: String,
}

/// Movies of one genre, together with the display name carried over by navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreMovies {
    pub name: String,
    pub movies: Vec<Movie>,
}

/// Sign-in request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

//=========================================================================================
// Lenient field deserializers
//=========================================================================================

fn release_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(normalize::parse_release_date))
}

fn genres<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(normalize::genre_values(raw))
}

fn mpaa_rating<'de, D>(deserializer: D) -> Result<Option<MpaaRating>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|r| r.parse().ok()))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Number(n)) => {
            n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0)
        }
        Some(serde_json::Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}
