//! In-memory storage area shared by any number of tab handles.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{KeyValueStorage, StorageChange, StorageListener};
use crate::error::{MovieNightError, Result};
use crate::observer::{ObserverRegistry, Subscription};

struct TabEvent {
    origin: u64,
    change: StorageChange,
}

struct Area {
    values: Mutex<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    next_tab: AtomicU64,
    events: ObserverRegistry<TabEvent>,
}

/// One tab's handle onto a shared in-memory storage area.
///
/// Writes through a handle notify the `subscribe` listeners of every *other*
/// handle of the same area, like the browser `storage` event, and the
/// `subscribe_local` listeners of the writer's own tab. Clones share a tab;
/// [`open_tab`](Self::open_tab) makes a new one.
#[derive(Clone)]
pub struct InMemoryStorage {
    area: Arc<Area>,
    tab: u64,
}

impl InMemoryStorage {
    /// Creates a fresh, unbounded storage area and returns its first tab.
    pub fn new() -> Self {
        Self::with_area(None)
    }

    /// Creates a storage area whose keys and values may occupy at most
    /// `quota_bytes`. Writes beyond that fail with a retryable storage error.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self::with_area(Some(quota_bytes))
    }

    fn with_area(quota_bytes: Option<usize>) -> Self {
        Self {
            area: Arc::new(Area {
                values: Mutex::new(HashMap::new()),
                quota_bytes,
                next_tab: AtomicU64::new(1),
                events: ObserverRegistry::new(),
            }),
            tab: 0,
        }
    }

    /// Opens another tab on the same storage area.
    pub fn open_tab(&self) -> Self {
        Self {
            area: self.area.clone(),
            tab: self.area.next_tab.fetch_add(1, Ordering::Relaxed),
        }
    }

    fn values(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.area
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn subscribe_where(&self, same_tab: bool, listener: StorageListener) -> Subscription {
        let tab = self.tab;
        self.area.events.subscribe(Arc::new(move |event: &TabEvent| {
            if (event.origin == tab) == same_tab {
                listener(&event.change);
            }
        }))
    }

    fn broadcast(&self, change: StorageChange) {
        self.area.events.notify(&TabEvent {
            origin: self.tab,
            change,
        });
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let old_value = {
            let mut values = self.values();

            if let Some(quota) = self.area.quota_bytes {
                let used: usize = values
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                if used + key.len() + value.len() > quota {
                    return Err(MovieNightError::storage_write(format!(
                        "quota of {} bytes exceeded while writing '{}'",
                        quota, key
                    )));
                }
            }

            values.insert(key.to_string(), value.to_string())
        };

        if old_value.as_deref() != Some(value) {
            self.broadcast(StorageChange {
                key: key.to_string(),
                old_value,
                new_value: Some(value.to_string()),
            });
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let old_value = self.values().remove(key);
        if old_value.is_some() {
            self.broadcast(StorageChange {
                key: key.to_string(),
                old_value,
                new_value: None,
            });
        }
        Ok(())
    }

    fn subscribe(&self, listener: StorageListener) -> Subscription {
        self.subscribe_where(false, listener)
    }

    fn subscribe_local(&self, listener: StorageListener) -> Subscription {
        self.subscribe_where(true, listener)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder(storage: &InMemoryStorage) -> (Arc<Mutex<Vec<StorageChange>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = storage.subscribe(Arc::new(move |change: &StorageChange| {
            sink.lock().unwrap().push(change.clone());
        }));
        (seen, sub)
    }

    #[test]
    fn test_get_set_remove() {
        let storage = InMemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap(), Some("v".to_string()));

        storage.remove("k").unwrap();
        assert_eq!(storage.get("k").unwrap(), None);

        // Removing again is fine
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_tabs_share_values() {
        let first = InMemoryStorage::new();
        let second = first.open_tab();

        first.set("theme", "light").unwrap();
        assert_eq!(second.get("theme").unwrap(), Some("light".to_string()));
    }

    #[test]
    fn test_change_reaches_other_tabs_only() {
        let first = InMemoryStorage::new();
        let second = first.open_tab();

        let (first_seen, _s1) = recorder(&first);
        let (second_seen, _s2) = recorder(&second);

        first.set("favorites", "[]").unwrap();

        assert!(first_seen.lock().unwrap().is_empty());
        let seen = second_seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].key, "favorites");
        assert_eq!(seen[0].old_value, None);
        assert_eq!(seen[0].new_value.as_deref(), Some("[]"));
    }

    #[test]
    fn test_local_listeners_hear_their_own_tab() {
        let first = InMemoryStorage::new();
        let clone = first.clone();
        let second = first.open_tab();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = clone.subscribe_local(Arc::new(move |change: &StorageChange| {
            sink.lock().unwrap().push(change.key.clone());
        }));

        first.set("favorites", "[]").unwrap();
        second.set("theme", "light").unwrap();
        first.remove("favorites").unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["favorites", "favorites"]);
    }

    #[test]
    fn test_failed_write_is_not_broadcast() {
        let storage = InMemoryStorage::with_quota(4);
        let seen = Arc::new(Mutex::new(0));
        let sink = seen.clone();
        let _sub = storage.subscribe_local(Arc::new(move |_: &StorageChange| {
            *sink.lock().unwrap() += 1;
        }));

        assert!(storage.set("favorites", "[]").is_err());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_unchanged_value_is_not_broadcast() {
        let first = InMemoryStorage::new();
        let second = first.open_tab();
        let (seen, _sub) = recorder(&second);

        first.set("k", "v").unwrap();
        first.set("k", "v").unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_quota_exceeded_is_retryable_and_keeps_old_value() {
        let storage = InMemoryStorage::with_quota(16);
        storage.set("k", "short").unwrap();

        let err = storage.set("k", "this value is far too long").unwrap_err();
        assert!(err.is_storage());
        assert!(err.is_retryable());
        assert_eq!(storage.get("k").unwrap(), Some("short".to_string()));
    }
}
