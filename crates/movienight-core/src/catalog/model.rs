//! Catalog records.
//!
//! These are passed through from the upstream response unmodified and are
//! never persisted, apart from the [`FavoriteEntry`](crate::favorite::FavoriteEntry)
//! projection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::MovieNightError;

/// Catalog movie identifier.
pub type MovieId = u64;

/// A movie as it appears in list and search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
}

/// Genre label attached to a movie detail record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreTag {
    pub id: u32,
    pub name: String,
}

/// Full detail record for one movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: MovieId,
    pub title: String,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<GenreTag>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    /// Every other upstream field, kept verbatim.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl MovieDetail {
    /// Comma-separated genre names, or `None` when the record lists none.
    pub fn genre_names(&self) -> Option<String> {
        if self.genres.is_empty() {
            return None;
        }
        Some(
            self.genres
                .iter()
                .map(|g| g.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}

/// One credited cast member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}

/// Genres shown as rows on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Horror,
    ScienceFiction,
    Comedy,
    Action,
}

impl Genre {
    pub const ALL: [Genre; 4] = [
        Genre::Horror,
        Genre::ScienceFiction,
        Genre::Comedy,
        Genre::Action,
    ];

    /// Catalog genre id.
    pub fn id(self) -> u32 {
        match self {
            Genre::Horror => 27,
            Genre::ScienceFiction => 878,
            Genre::Comedy => 35,
            Genre::Action => 28,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Genre::Horror => "Horror",
            Genre::ScienceFiction => "Sci-Fi",
            Genre::Comedy => "Comedy",
            Genre::Action => "Action",
        }
    }

    pub fn from_id(id: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.id() == id)
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Genre {
    type Err = MovieNightError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horror" => Ok(Genre::Horror),
            "sci-fi" | "scifi" | "science-fiction" | "science fiction" => {
                Ok(Genre::ScienceFiction)
            }
            "comedy" => Ok(Genre::Comedy),
            "action" => Ok(Genre::Action),
            other => Err(MovieNightError::validation(format!(
                "Unknown genre '{}' (expected horror, sci-fi, comedy or action)",
                other
            ))),
        }
    }
}
