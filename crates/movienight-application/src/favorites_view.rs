//! FavoritesListView - the list of favorited movies.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use movienight_core::catalog::MovieId;
use movienight_core::error::Result;
use movienight_core::favorite::{FavoriteEntry, FavoritesEvent, FavoritesStore, FavoritesWatch};

use crate::view_state::ViewState;

/// Message shown when there are no favorites.
pub const EMPTY_FAVORITES_MESSAGE: &str =
    "No favorite movies yet. Add some from the movie details page!";

struct ListState {
    entries: ViewState<Vec<FavoriteEntry>>,
    reloads: usize,
}

fn lock(state: &Mutex<ListState>) -> MutexGuard<'_, ListState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Reloads the whole collection from the store. Event payloads are ignored.
fn reload(store: &FavoritesStore, state: &Mutex<ListState>) {
    let entries = store.load_all();
    let mut state = lock(state);
    state.entries = ViewState::Ready(entries);
    state.reloads += 1;
}

/// Lists every favorited movie and stays in sync with the store.
pub struct FavoritesListView {
    store: Arc<FavoritesStore>,
    state: Arc<Mutex<ListState>>,
    _watch: FavoritesWatch,
}

impl FavoritesListView {
    /// Loads the collection and starts watching it.
    pub fn mount(store: Arc<FavoritesStore>) -> Self {
        let state = Arc::new(Mutex::new(ListState {
            entries: ViewState::Loading,
            reloads: 0,
        }));

        let weak_state: Weak<Mutex<ListState>> = Arc::downgrade(&state);
        let weak_store = Arc::downgrade(&store);
        let watch = store.watch(Arc::new(move |event: &FavoritesEvent| {
            let (Some(state), Some(store)) = (weak_state.upgrade(), weak_store.upgrade()) else {
                return;
            };
            tracing::debug!("[FavoritesListView] Reloading after {:?}", event);
            reload(&store, &state);
        }));

        reload(&store, &state);

        Self {
            store,
            state,
            _watch: watch,
        }
    }

    pub fn state(&self) -> ViewState<Vec<FavoriteEntry>> {
        lock(&self.state).entries.clone()
    }

    /// Currently displayed entries, in insertion order.
    pub fn entries(&self) -> Vec<FavoriteEntry> {
        lock(&self.state)
            .entries
            .ready()
            .cloned()
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Number of times the list has been loaded, the initial load included.
    pub fn reload_count(&self) -> usize {
        lock(&self.state).reloads
    }

    /// Re-reads the collection without waiting for a notification.
    pub fn refresh(&self) {
        reload(&self.store, &self.state);
    }

    /// Removes `id` from the favorites.
    ///
    /// The list itself is refreshed by the resulting notification.
    pub fn remove(&self, id: MovieId) -> Result<()> {
        self.store.remove(id)
    }
}
