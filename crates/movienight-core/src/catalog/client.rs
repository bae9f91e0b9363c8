//! Catalog client trait.

use async_trait::async_trait;

use super::model::{CastMember, MovieDetail, MovieId, MovieSummary};
use crate::error::Result;

/// Maximum number of cast members returned by [`CatalogClient::fetch_cast`].
pub const MAX_CAST_MEMBERS: usize = 5;

/// Read-only access to the external movie catalog.
///
/// Implementations never retry. Non-success responses are transport errors,
/// except a missing movie record, which is `NotFound`.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// First page of popular movies.
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>>;

    /// First page of top-rated movies.
    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>>;

    /// First page of movies tagged with the catalog genre `genre_id`.
    async fn fetch_by_genre(&self, genre_id: u32) -> Result<Vec<MovieSummary>>;

    /// Free-text title search.
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>>;

    /// Detail record for one movie.
    async fn fetch_detail(&self, movie_id: MovieId) -> Result<MovieDetail>;

    /// Top billed cast, in upstream order, at most [`MAX_CAST_MEMBERS`].
    async fn fetch_cast(&self, movie_id: MovieId) -> Result<Vec<CastMember>>;
}
