pub mod account;
pub mod catalog;
pub mod favorites;
pub mod open;
pub mod render;
pub mod theme;

use std::sync::Arc;

use anyhow::{Context, Result};
use movienight_core::catalog::CatalogClient;
use movienight_core::config::RootConfig;
use movienight_core::favorite::FavoritesStore;
use movienight_core::theme::Theme;
use movienight_infrastructure::{ConfigService, JsonFileStorage, TmdbCatalogClient};

/// Everything a command needs: configuration, storage and the store on top.
pub struct AppContext {
    pub config: RootConfig,
    pub storage: Arc<JsonFileStorage>,
    pub favorites: Arc<FavoritesStore>,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let service = ConfigService::new()?;
        let config = service.get_config()?;
        let storage_dir = service.storage_dir()?;
        tracing::debug!("Using storage directory {:?}", storage_dir);

        let storage = Arc::new(JsonFileStorage::in_dir(&storage_dir));
        let favorites = Arc::new(FavoritesStore::new(storage.clone()));

        Ok(Self {
            config,
            storage,
            favorites,
        })
    }

    /// The catalog client. Fails when no API key is configured.
    pub fn catalog(&self) -> Result<Arc<dyn CatalogClient>> {
        let client = TmdbCatalogClient::from_config(&self.config.catalog)
            .context("Set catalog.api_key in config.toml or the TMDB_API_KEY variable")?;
        Ok(Arc::new(client))
    }

    pub fn theme(&self) -> Theme {
        Theme::from_storage(self.storage.as_ref())
    }

    pub fn image_base_url(&self) -> &str {
        &self.config.catalog.image_base_url
    }
}
