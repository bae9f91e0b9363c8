//! TmdbCatalogClient - REST implementation of the catalog client for TMDB v3.
//!
//! Every request carries the API key and language as query parameters. List
//! endpoints always request the first page; nothing is cached or retried.

use std::time::Duration;

use async_trait::async_trait;
use movienight_core::MovieNightError;
use movienight_core::catalog::{
    CastMember, CatalogClient, MAX_CAST_MEMBERS, MovieDetail, MovieId, MovieSummary,
};
use movienight_core::config::CatalogConfig;
use movienight_core::error::Result;
use reqwest::{Client, Request, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Catalog client that talks to the TMDB HTTP API.
#[derive(Clone)]
pub struct TmdbCatalogClient {
    client: Client,
    api_key: String,
    base_url: String,
    language: String,
}

impl TmdbCatalogClient {
    /// Creates a client with the default base URL and language.
    pub fn new(api_key: impl Into<String>) -> Self {
        let defaults = CatalogConfig::default();
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: defaults.base_url,
            language: defaults.language,
        }
    }

    /// Creates a client from the `[catalog]` config section.
    ///
    /// Fails when no API key is configured.
    pub fn from_config(config: &CatalogConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(MovieNightError::config(
                "TMDB API key not found in config.toml or TMDB_API_KEY",
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| MovieNightError::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        })
    }

    /// Overrides the base URL after construction.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_request(&self, path: &str, params: &[(&str, String)]) -> Result<Request> {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .get(url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .query(&[("language", self.language.as_str())])
            .build()
            .map_err(|e| MovieNightError::internal(format!("Invalid catalog request: {e}")))
    }

    fn first_page(&self, path: &str, mut params: Vec<(&str, String)>) -> Result<Request> {
        params.push(("page", "1".to_string()));
        self.build_request(path, &params)
    }

    /// Sends `request` and decodes the JSON body.
    ///
    /// `missing` names the entity reported as `NotFound` on HTTP 404; without
    /// it a 404 is a transport error like any other non-success status.
    async fn send<T: DeserializeOwned>(
        &self,
        request: Request,
        missing: Option<(&'static str, String)>,
    ) -> Result<T> {
        tracing::debug!("Catalog request: GET {}", request.url().path());

        let response = self.client.execute(request).await.map_err(|err| {
            MovieNightError::transport(None, format!("Catalog request failed: {err}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                if let Some((entity_type, id)) = missing {
                    return Err(MovieNightError::not_found(entity_type, id));
                }
            }
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read catalog error body".to_string());
            return Err(map_http_error(status, body_text));
        }

        response.json::<T>().await.map_err(|err| {
            MovieNightError::transport(
                Some(status.as_u16()),
                format!("Failed to parse catalog response: {err}"),
            )
        })
    }

    async fn fetch_list(&self, request: Request) -> Result<Vec<MovieSummary>> {
        let page: ResultsPage = self.send(request, None).await?;
        Ok(page.results)
    }
}

#[async_trait]
impl CatalogClient for TmdbCatalogClient {
    async fn fetch_popular(&self) -> Result<Vec<MovieSummary>> {
        let request = self.first_page("/movie/popular", Vec::new())?;
        self.fetch_list(request).await
    }

    async fn fetch_top_rated(&self) -> Result<Vec<MovieSummary>> {
        let request = self.first_page("/movie/top_rated", Vec::new())?;
        self.fetch_list(request).await
    }

    async fn fetch_by_genre(&self, genre_id: u32) -> Result<Vec<MovieSummary>> {
        let request = self.first_page(
            "/discover/movie",
            vec![("with_genres", genre_id.to_string())],
        )?;
        self.fetch_list(request).await
    }

    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>> {
        let request = self.build_request("/search/movie", &[("query", query.to_string())])?;
        self.fetch_list(request).await
    }

    async fn fetch_detail(&self, movie_id: MovieId) -> Result<MovieDetail> {
        let request = self.build_request(&format!("/movie/{movie_id}"), &[])?;
        self.send(request, Some(("movie", movie_id.to_string())))
            .await
    }

    async fn fetch_cast(&self, movie_id: MovieId) -> Result<Vec<CastMember>> {
        let request = self.build_request(&format!("/movie/{movie_id}/credits"), &[])?;
        let credits: Credits = self.send(request, None).await.map_err(|e| match e {
            MovieNightError::Transport { status, message } => MovieNightError::transport(
                status,
                format!("Failed to fetch movie credits: {message}"),
            ),
            other => other,
        })?;
        Ok(top_cast(credits))
    }
}

#[derive(Deserialize)]
struct ResultsPage {
    #[serde(default)]
    results: Vec<MovieSummary>,
}

#[derive(Deserialize)]
struct Credits {
    #[serde(default)]
    cast: Vec<CastMember>,
}

fn top_cast(credits: Credits) -> Vec<CastMember> {
    let mut cast = credits.cast;
    cast.truncate(MAX_CAST_MEMBERS);
    cast
}

/// TMDB error bodies look like `{"status_code": 7, "status_message": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    status_message: Option<String>,
}

fn map_http_error(status: StatusCode, body: String) -> MovieNightError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.status_message)
        .unwrap_or(body);
    MovieNightError::transport(Some(status.as_u16()), message)
}
