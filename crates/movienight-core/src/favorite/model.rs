//! Favorite domain models.

use serde::{Deserialize, Serialize};

use crate::catalog::{MovieDetail, MovieId, MovieSummary};
use crate::storage::StorageChange;

/// The persisted projection of a favorited movie.
///
/// Serialized with the catalog's own field names, so collections written by
/// earlier front ends (which stored whole catalog objects) still parse: the
/// extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Catalog movie identifier. Unique within the collection.
    pub id: MovieId,
    /// Display name at the time of favoriting.
    pub title: String,
    /// Relative poster path on the catalog image host.
    #[serde(
        rename = "poster_path",
        alias = "posterPath",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub poster_path: Option<String>,
}

impl FavoriteEntry {
    pub fn new(id: MovieId, title: impl Into<String>, poster_path: Option<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path,
        }
    }
}

impl From<&MovieSummary> for FavoriteEntry {
    fn from(movie: &MovieSummary) -> Self {
        Self::new(movie.id, movie.title.clone(), movie.poster_path.clone())
    }
}

impl From<&MovieDetail> for FavoriteEntry {
    fn from(movie: &MovieDetail) -> Self {
        Self::new(movie.id, movie.title.clone(), movie.poster_path.clone())
    }
}

/// Change notification delivered to favorites watchers.
///
/// Watchers must not apply the payload. It only says that the collection may
/// have changed; the authoritative state is re-read from storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FavoritesEvent {
    /// An entry was appended in this tab.
    Added(MovieId),
    /// An entry was removed in this tab.
    Removed(MovieId),
    /// The value was rewritten in this tab without a single entry being
    /// added or removed, e.g. replaced wholesale.
    Rewritten,
    /// The durable value was changed through another storage handle.
    External,
}

impl FavoritesEvent {
    /// Classifies a same-tab write of the favorites key by comparing the ids
    /// before and after it.
    pub(crate) fn from_local_change(change: &StorageChange) -> Self {
        let ids = |raw: Option<&str>| -> Vec<MovieId> {
            raw.and_then(|raw| parse_collection(raw).ok())
                .unwrap_or_default()
                .iter()
                .map(|entry| entry.id)
                .collect()
        };
        let before = ids(change.old_value.as_deref());
        let after = ids(change.new_value.as_deref());

        let added: Vec<MovieId> = after.iter().copied().filter(|id| !before.contains(id)).collect();
        let removed: Vec<MovieId> = before.iter().copied().filter(|id| !after.contains(id)).collect();

        match (added.as_slice(), removed.as_slice()) {
            ([id], []) => FavoritesEvent::Added(*id),
            ([], [id]) => FavoritesEvent::Removed(*id),
            _ => FavoritesEvent::Rewritten,
        }
    }
}

/// Parses a persisted favorites value.
///
/// Fails when the value is not a JSON array of entries. The caller maps that
/// to an empty collection.
pub(crate) fn parse_collection(raw: &str) -> Result<Vec<FavoriteEntry>, serde_json::Error> {
    serde_json::from_str::<Vec<FavoriteEntry>>(raw)
}
