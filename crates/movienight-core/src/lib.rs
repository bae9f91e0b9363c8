pub mod auth;
pub mod catalog;
pub mod config;
pub mod error;
pub mod favorite;
pub mod observer;
pub mod route;
pub mod storage;
pub mod theme;

// Re-export common error type
pub use error::MovieNightError;
