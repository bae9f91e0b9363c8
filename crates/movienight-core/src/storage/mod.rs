//! Durable key/value storage abstraction.
//!
//! Mirrors the browser's local storage: string keys, string values, and a
//! change notification for writes made through another handle (another tab).
//! Writes are also announced inside the writer's own tab, so every component
//! in that tab hears about them no matter which store instance wrote.

use std::sync::Arc;

use crate::error::Result;
use crate::observer::Subscription;

/// Key holding the serialized favorites collection.
pub const FAVORITES_KEY: &str = "favorites";

/// Key holding the display preference (`"light"` or anything else for dark).
pub const THEME_KEY: &str = "theme";

/// A mutation observed on the storage area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageChange {
    pub key: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
}

/// Callback for storage changes.
pub type StorageListener = Arc<dyn Fn(&StorageChange) + Send + Sync>;

/// String-valued durable storage with cross-handle change notification.
///
/// Access is synchronous from the caller's perspective. A handle's own writes
/// reach its [`subscribe_local`](Self::subscribe_local) listeners, never its
/// [`subscribe`](Self::subscribe) listeners. Only writes that change a value
/// are reported, and only after they succeeded.
pub trait KeyValueStorage: Send + Sync {
    /// Returns the value stored at `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` at `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Deletes `key`. Deleting an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Registers `listener` for changes made through other handles.
    fn subscribe(&self, listener: StorageListener) -> Subscription;

    /// Registers `listener` for changes made through this handle or any
    /// clone of it (the same tab).
    fn subscribe_local(&self, listener: StorageListener) -> Subscription;
}

mod memory;

pub use memory::InMemoryStorage;
