pub mod config_service;
pub mod paths;
pub mod storage;
pub mod tmdb_client;

pub use crate::config_service::ConfigService;
pub use crate::storage::{InMemoryStorage, JsonFileStorage};
pub use crate::tmdb_client::TmdbCatalogClient;
