//! Shared fixtures for the view scenarios.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use movienight_core::MovieNightError;
use movienight_core::catalog::{
    CastMember, CatalogClient, Genre, GenreTag, MovieDetail, MovieId, MovieSummary,
};
use movienight_core::error::Result;
use movienight_core::favorite::FavoritesStore;
use movienight_core::storage::InMemoryStorage;
use tokio::sync::Notify;

pub const INCEPTION: MovieId = 27205;

pub fn summary(id: MovieId, title: &str) -> MovieSummary {
    MovieSummary {
        id,
        title: title.to_string(),
        poster_path: Some(format!("/{id}.jpg")),
        backdrop_path: None,
        overview: None,
        release_date: None,
        vote_average: None,
        genre_ids: Vec::new(),
    }
}

pub fn detail(id: MovieId, title: &str) -> MovieDetail {
    MovieDetail {
        id,
        title: title.to_string(),
        tagline: Some("Your mind is the scene of the crime.".to_string()),
        overview: None,
        release_date: Some("2010-07-15".to_string()),
        vote_average: Some(8.4),
        genres: vec![GenreTag {
            id: 878,
            name: "Science Fiction".to_string(),
        }],
        runtime: Some(148),
        poster_path: Some("/abc.jpg".to_string()),
        backdrop_path: None,
        extra: Default::default(),
    }
}

pub fn cast_member(id: u64, name: &str) -> CastMember {
    CastMember {
        id,
        name: name.to_string(),
        character: None,
        profile_path: None,
        order: None,
    }
}

/// In-process catalog with switchable failures.
#[derive(Default)]
pub struct StubCatalog {
    pub fail_cast: bool,
    pub fail_detail: bool,
    pub fail_genre: Option<Genre>,
    /// When set, detail fetches wait for a notification before resolving.
    pub detail_gate: Option<Arc<Notify>>,
    pub requests: AtomicUsize,
}

impl StubCatalog {
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CatalogClient for StubCatalog {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>> {
        self.record();
        Ok(vec![summary(INCEPTION, "Inception"), summary(155, "The Dark Knight")])
    }

    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>> {
        self.record();
        Ok(vec![summary(238, "The Godfather")])
    }

    async fn fetch_by_genre(&self, genre_id: u32) -> Result<Vec<MovieSummary>> {
        self.record();
        if self.fail_genre.map(Genre::id) == Some(genre_id) {
            return Err(MovieNightError::transport(Some(500), "genre unavailable"));
        }
        Ok(vec![summary(u64::from(genre_id) * 1000, "Genre pick")])
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>> {
        self.record();
        Ok(vec![summary(1, query)])
    }

    async fn fetch_detail(&self, movie_id: MovieId) -> Result<MovieDetail> {
        self.record();
        if let Some(gate) = &self.detail_gate {
            gate.notified().await;
        }
        if self.fail_detail {
            return Err(MovieNightError::not_found("movie", movie_id.to_string()));
        }
        Ok(detail(movie_id, "Inception"))
    }

    async fn fetch_cast(&self, _movie_id: MovieId) -> Result<Vec<CastMember>> {
        self.record();
        if self.fail_cast {
            return Err(MovieNightError::transport(
                Some(503),
                "Failed to fetch movie credits",
            ));
        }
        Ok(vec![
            cast_member(6193, "Leonardo DiCaprio"),
            cast_member(24045, "Joseph Gordon-Levitt"),
        ])
    }
}

pub fn store_over(storage: &InMemoryStorage) -> Arc<FavoritesStore> {
    Arc::new(FavoritesStore::new(Arc::new(storage.clone())))
}
