//! Storage backends.

mod json_file_storage;

pub use json_file_storage::JsonFileStorage;
pub use movienight_core::storage::InMemoryStorage;
