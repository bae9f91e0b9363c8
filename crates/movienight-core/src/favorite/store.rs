//! The favorites store.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::model::{FavoriteEntry, FavoritesEvent, parse_collection};
use crate::catalog::MovieId;
use crate::error::Result;
use crate::observer::{Listener, Subscription};
use crate::storage::{FAVORITES_KEY, KeyValueStorage, StorageChange};

/// Single source of truth for the favorited-movie collection.
///
/// Every operation reads the durable value under [`FAVORITES_KEY`]; nothing is
/// cached in memory. Mutations are read-modify-write and persisted
/// immediately. Watchers hear about them through the storage handle's tab
/// channel, so every store built over the same tab sees every write.
///
/// Concurrent writers through different storage handles are last-write-wins:
/// two tabs mutating at the same time may lose one of the two changes.
pub struct FavoritesStore {
    storage: Arc<dyn KeyValueStorage>,
    watchers: Arc<AtomicUsize>,
}

impl FavoritesStore {
    /// Creates a store over the given storage handle.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            watchers: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Returns the persisted collection.
    ///
    /// An absent, unreadable or malformed value yields an empty collection.
    /// That is a recovery path, logged as a diagnostic, never an error.
    pub fn load_all(&self) -> Vec<FavoriteEntry> {
        let raw = match self.storage.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!("Failed to read favorites, treating as empty: {}", e);
                return Vec::new();
            }
        };

        match parse_collection(&raw) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(
                    "Persisted favorites are not a list of entries, resetting to empty: {}",
                    e
                );
                Vec::new()
            }
        }
    }

    /// True iff an entry with `id` is in the current durable collection.
    pub fn contains(&self, id: MovieId) -> bool {
        self.load_all().iter().any(|entry| entry.id == id)
    }

    /// Appends `entry` unless its id is already present.
    ///
    /// Watchers are notified only after the write succeeded. A failed write
    /// leaves the durable collection unchanged and is returned as a retryable
    /// storage error.
    pub fn add(&self, entry: FavoriteEntry) -> Result<()> {
        let mut entries = self.load_all();
        if entries.iter().any(|existing| existing.id == entry.id) {
            tracing::debug!("Movie {} already favorited", entry.id);
            return Ok(());
        }

        let id = entry.id;
        entries.push(entry);
        self.persist(&entries)?;

        tracing::debug!("Added movie {} to favorites", id);
        Ok(())
    }

    /// Removes the entry with `id`. Removing an absent id is a no-op.
    pub fn remove(&self, id: MovieId) -> Result<()> {
        let mut entries = self.load_all();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        if entries.len() == before {
            return Ok(());
        }

        self.persist(&entries)?;

        tracing::debug!("Removed movie {} from favorites", id);
        Ok(())
    }

    /// Removes the entry if present, adds it otherwise.
    ///
    /// Returns the favorited status after the write.
    pub fn toggle(&self, entry: FavoriteEntry) -> Result<bool> {
        if self.contains(entry.id) {
            self.remove(entry.id)?;
            Ok(false)
        } else {
            self.add(entry)?;
            Ok(true)
        }
    }

    /// Registers `listener` for changes to the favorites key: writes made in
    /// this tab (by any store over it) and writes made through other storage
    /// handles.
    ///
    /// Both registrations end when the returned guard is dropped.
    pub fn watch(&self, listener: Listener<FavoritesEvent>) -> FavoritesWatch {
        let local_listener = listener.clone();
        let local = self
            .storage
            .subscribe_local(Arc::new(move |change: &StorageChange| {
                if change.key == FAVORITES_KEY {
                    local_listener(&FavoritesEvent::from_local_change(change));
                }
            }));
        let external = self
            .storage
            .subscribe(Arc::new(move |change: &StorageChange| {
                if change.key == FAVORITES_KEY {
                    listener(&FavoritesEvent::External);
                }
            }));

        self.watchers.fetch_add(1, Ordering::SeqCst);
        let watchers = self.watchers.clone();
        let counted = Subscription::new(move || {
            watchers.fetch_sub(1, Ordering::SeqCst);
        });

        FavoritesWatch {
            _local: local,
            _external: external,
            _counted: counted,
        }
    }

    /// Number of active watchers registered through this store.
    pub fn watcher_count(&self) -> usize {
        self.watchers.load(Ordering::SeqCst)
    }

    fn persist(&self, entries: &[FavoriteEntry]) -> Result<()> {
        let serialized = serde_json::to_string(entries)?;
        self.storage.set(FAVORITES_KEY, &serialized).inspect_err(|e| {
            tracing::error!("Failed to persist favorites: {}", e);
        })
    }
}

/// Guard holding both notification registrations of one watcher.
#[derive(Debug)]
pub struct FavoritesWatch {
    _local: Subscription,
    _external: Subscription,
    _counted: Subscription,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStorage;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn inception() -> FavoriteEntry {
        FavoriteEntry::new(27205, "Inception", Some("/abc.jpg".to_string()))
    }

    fn store_with(storage: &InMemoryStorage) -> FavoritesStore {
        FavoritesStore::new(Arc::new(storage.clone()))
    }

    fn counting_watch(store: &FavoritesStore) -> (Arc<AtomicUsize>, FavoritesWatch) {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = hits.clone();
        let watch = store.watch(Arc::new(move |_: &FavoritesEvent| {
            h.fetch_add(1, Ordering::SeqCst);
        }));
        (hits, watch)
    }

    #[test]
    fn test_inception_scenario() {
        let store = store_with(&InMemoryStorage::new());
        assert!(store.load_all().is_empty());

        store.add(inception()).unwrap();
        assert!(store.contains(27205));

        let all = store.load_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, 27205);

        store.remove(27205).unwrap();
        assert!(store.load_all().is_empty());
        assert!(!store.contains(27205));
    }

    #[test]
    fn test_add_is_idempotent() {
        let store = store_with(&InMemoryStorage::new());
        store.add(inception()).unwrap();
        let once = store.load_all();

        store.add(inception()).unwrap();
        assert_eq!(store.load_all(), once);
    }

    #[test]
    fn test_ids_stay_unique_across_many_adds() {
        let store = store_with(&InMemoryStorage::new());
        for id in [1, 2, 1, 3, 2, 2, 4, 1] {
            store
                .add(FavoriteEntry::new(id, format!("Movie {id}"), None))
                .unwrap();
        }

        let ids: Vec<MovieId> = store.load_all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_remove_absent_id_is_noop() {
        let storage = InMemoryStorage::new();
        let store = store_with(&storage);
        store.add(inception()).unwrap();
        let before = storage.get(FAVORITES_KEY).unwrap();

        store.remove(603).unwrap();
        assert_eq!(storage.get(FAVORITES_KEY).unwrap(), before);
    }

    #[test]
    fn test_remove_keeps_insertion_order_of_others() {
        let store = store_with(&InMemoryStorage::new());
        for id in [10, 20, 30] {
            store.add(FavoriteEntry::new(id, "x", None)).unwrap();
        }
        store.remove(20).unwrap();

        let ids: Vec<MovieId> = store.load_all().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![10, 30]);
    }

    #[test]
    fn test_corrupted_values_load_as_empty() {
        let storage = InMemoryStorage::new();
        let store = store_with(&storage);

        for raw in ["not-json", r#"{"id":1,"title":"A"}"#, "null", "42", ""] {
            storage.set(FAVORITES_KEY, raw).unwrap();
            assert!(store.load_all().is_empty(), "value {raw:?} should load empty");
        }

        storage.remove(FAVORITES_KEY).unwrap();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_add_after_corruption_persists_single_entry() {
        let storage = InMemoryStorage::new();
        storage.set(FAVORITES_KEY, "not-json").unwrap();
        let store = store_with(&storage);

        assert!(store.load_all().is_empty());
        store.add(inception()).unwrap();

        let raw = storage.get(FAVORITES_KEY).unwrap().unwrap();
        let persisted: Vec<FavoriteEntry> = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, vec![inception()]);
    }

    #[test]
    fn test_mutations_notify_watchers_once() {
        let store = store_with(&InMemoryStorage::new());
        let (hits, _watch) = counting_watch(&store);

        store.add(inception()).unwrap();
        store.add(inception()).unwrap(); // no-op, no broadcast
        store.remove(27205).unwrap();
        store.remove(27205).unwrap(); // no-op, no broadcast

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_dropping_watch_unregisters() {
        let store = store_with(&InMemoryStorage::new());
        let (hits, watch) = counting_watch(&store);
        assert_eq!(store.watcher_count(), 1);

        drop(watch);
        store.add(inception()).unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(store.watcher_count(), 0);
    }

    #[test]
    fn test_failed_write_does_not_notify_or_change_collection() {
        let storage = InMemoryStorage::with_quota(64);
        let store = store_with(&storage);
        store.add(FavoriteEntry::new(1, "A", None)).unwrap();
        let (hits, _watch) = counting_watch(&store);

        let err = store
            .add(FavoriteEntry::new(2, "A title long enough to blow the quota", None))
            .unwrap_err();

        assert!(err.is_storage());
        assert!(err.is_retryable());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(store.load_all().len(), 1);
        assert!(!store.contains(2));
    }

    #[test]
    fn test_watcher_sees_fresh_state_when_notified() {
        let store = Arc::new(store_with(&InMemoryStorage::new()));
        let observed = Arc::new(Mutex::new(Vec::new()));

        let weak = Arc::downgrade(&store);
        let sink = observed.clone();
        let _watch = store.watch(Arc::new(move |_: &FavoritesEvent| {
            if let Some(store) = weak.upgrade() {
                sink.lock().unwrap().push(store.load_all().len());
            }
        }));

        store.add(FavoriteEntry::new(1, "A", None)).unwrap();
        store.add(FavoriteEntry::new(2, "B", None)).unwrap();
        store.remove(1).unwrap();

        assert_eq!(*observed.lock().unwrap(), vec![1, 2, 1]);
    }

    #[test]
    fn test_other_tab_mutation_reaches_watchers_as_external() {
        let first_tab = InMemoryStorage::new();
        let second_tab = first_tab.open_tab();
        let writer = store_with(&first_tab);
        let reader = store_with(&second_tab);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _watch = reader.watch(Arc::new(move |event: &FavoritesEvent| {
            sink.lock().unwrap().push(*event);
        }));
        let (writer_hits, _writer_watch) = counting_watch(&writer);

        writer.add(inception()).unwrap();
        // Unrelated keys are filtered out
        first_tab.set("theme", "light").unwrap();

        assert_eq!(*events.lock().unwrap(), vec![FavoritesEvent::External]);
        assert!(reader.contains(27205));
        // The writer's own watcher hears the in-process broadcast only
        assert_eq!(writer_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stores_sharing_a_tab_hear_each_others_writes() {
        let tab = InMemoryStorage::new();
        let writer = store_with(&tab);
        let reader = store_with(&tab);

        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let _watch = reader.watch(Arc::new(move |event: &FavoritesEvent| {
            sink.lock().unwrap().push(*event);
        }));

        writer.add(inception()).unwrap();
        writer.add(inception()).unwrap();
        writer.remove(27205).unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec![FavoritesEvent::Added(27205), FavoritesEvent::Removed(27205)]
        );
    }

    #[test]
    fn test_toggle_flips_status() {
        let store = store_with(&InMemoryStorage::new());
        assert!(store.toggle(inception()).unwrap());
        assert!(store.contains(27205));
        assert!(!store.toggle(inception()).unwrap());
        assert!(!store.contains(27205));
    }
}
