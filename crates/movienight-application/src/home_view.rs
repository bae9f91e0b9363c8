//! Home page rows and search.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};
use movienight_core::catalog::{CatalogClient, Genre, MovieSummary};
use movienight_core::error::Result;

use crate::view_state::ViewState;

/// One titled row of movies.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRow {
    pub title: String,
    pub state: ViewState<Vec<MovieSummary>>,
}

impl MovieRow {
    fn from_result(title: String, result: Result<Vec<MovieSummary>>) -> Self {
        let state = match result {
            Ok(movies) => ViewState::Ready(movies),
            Err(e) => {
                tracing::warn!("[HomeView] Failed to load row '{}': {}", title, e);
                ViewState::Failed(format!("Failed to load {title}."))
            }
        };
        Self { title, state }
    }
}

/// The home page: popular, top-rated and one row per [`Genre`].
pub struct HomeView {
    catalog: Arc<dyn CatalogClient>,
}

impl HomeView {
    pub fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        Self { catalog }
    }

    /// Loads every row concurrently.
    ///
    /// Rows come back in display order. A failed row is `Failed` on its own
    /// and does not affect the others.
    pub async fn load_rows(&self) -> Vec<MovieRow> {
        let mut requests: Vec<(String, BoxFuture<'_, Result<Vec<MovieSummary>>>)> = vec![
            ("Popular".to_string(), self.catalog.fetch_popular().boxed()),
            ("Top Rated".to_string(), self.catalog.fetch_top_rated().boxed()),
        ];
        for genre in Genre::ALL {
            requests.push((
                genre.label().to_string(),
                self.catalog.fetch_by_genre(genre.id()).boxed(),
            ));
        }

        let (titles, futures): (Vec<_>, Vec<_>) = requests.into_iter().unzip();
        tracing::debug!("[HomeView] Loading {} rows", titles.len());
        let results = join_all(futures).await;

        titles
            .into_iter()
            .zip(results)
            .map(|(title, result)| MovieRow::from_result(title, result))
            .collect()
    }

    pub async fn load_popular(&self) -> MovieRow {
        let result = self.catalog.fetch_popular().await;
        MovieRow::from_result("Popular".to_string(), result)
    }

    pub async fn load_top_rated(&self) -> MovieRow {
        let result = self.catalog.fetch_top_rated().await;
        MovieRow::from_result("Top Rated".to_string(), result)
    }

    /// Loads the single row for `genre`.
    pub async fn load_genre(&self, genre: Genre) -> MovieRow {
        self.load_genre_id(genre.id()).await
    }

    /// Loads a row for any catalog genre id, including ones without a home row.
    pub async fn load_genre_id(&self, genre_id: u32) -> MovieRow {
        let title = match Genre::from_id(genre_id) {
            Some(genre) => genre.label().to_string(),
            None => format!("Genre {genre_id}"),
        };
        let result = self.catalog.fetch_by_genre(genre_id).await;
        MovieRow::from_result(title, result)
    }

    /// Searches the catalog.
    ///
    /// A blank query yields an empty ready row without issuing a request.
    pub async fn search(&self, query: &str) -> MovieRow {
        let query = query.trim();
        let title = format!("Results for \"{query}\"");
        if query.is_empty() {
            return MovieRow {
                title,
                state: ViewState::Ready(Vec::new()),
            };
        }

        let result = self.catalog.search(query).await;
        MovieRow::from_result(title, result)
    }
}
