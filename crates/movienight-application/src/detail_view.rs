//! MovieDetailView - one movie's detail page and its favorite toggle.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use movienight_core::MovieNightError;
use movienight_core::catalog::{CastMember, CatalogClient, MovieDetail, MovieId};
use movienight_core::error::Result;
use movienight_core::favorite::{FavoriteEntry, FavoritesEvent, FavoritesStore, FavoritesWatch};
use tokio_util::sync::CancellationToken;

use crate::view_state::ViewState;

/// Message shown when either fetch of the detail page fails.
pub const DETAIL_ERROR_MESSAGE: &str = "Failed to load movie details. Please try again.";

/// Everything the detail page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetailPage {
    pub detail: MovieDetail,
    pub cast: Vec<CastMember>,
}

struct DetailState {
    page: ViewState<MovieDetailPage>,
    failure: Option<MovieNightError>,
    is_favorite: bool,
    disposed: bool,
}

fn lock(state: &Mutex<DetailState>) -> MutexGuard<'_, DetailState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Detail page for one movie.
///
/// The favorite indicator is always recomputed from the store, both after
/// this view's own toggles and on every favorites notification, so several
/// mounted views never disagree.
pub struct MovieDetailView {
    movie_id: MovieId,
    catalog: Arc<dyn CatalogClient>,
    favorites: Arc<FavoritesStore>,
    state: Arc<Mutex<DetailState>>,
    cancel: CancellationToken,
    _watch: FavoritesWatch,
}

impl MovieDetailView {
    /// Mounts the view for `movie_id` in the `Loading` state.
    ///
    /// Nothing is fetched until [`load`](Self::load) is awaited.
    pub fn mount(
        movie_id: MovieId,
        catalog: Arc<dyn CatalogClient>,
        favorites: Arc<FavoritesStore>,
    ) -> Self {
        let state = Arc::new(Mutex::new(DetailState {
            page: ViewState::Loading,
            failure: None,
            is_favorite: favorites.contains(movie_id),
            disposed: false,
        }));

        let weak_state = Arc::downgrade(&state);
        let weak_store = Arc::downgrade(&favorites);
        let watch = favorites.watch(Arc::new(move |_event: &FavoritesEvent| {
            let (Some(state), Some(store)) = (weak_state.upgrade(), weak_store.upgrade()) else {
                return;
            };
            let is_favorite = store.contains(movie_id);
            let mut state = lock(&state);
            if !state.disposed {
                state.is_favorite = is_favorite;
            }
        }));

        tracing::debug!("[MovieDetailView] Mounted movie {}", movie_id);

        Self {
            movie_id,
            catalog,
            favorites,
            state,
            cancel: CancellationToken::new(),
            _watch: watch,
        }
    }

    pub fn movie_id(&self) -> MovieId {
        self.movie_id
    }

    /// Fetches detail and cast concurrently and applies the outcome.
    ///
    /// The view becomes `Ready` only when both fetches succeed. If either
    /// fails the view becomes `Failed` and the other result is discarded.
    /// After [`unmount`](Self::unmount) the in-flight fetches are dropped and
    /// nothing is applied.
    ///
    /// Returns the state after the attempt.
    pub async fn load(&self) -> ViewState<MovieDetailPage> {
        {
            let mut state = lock(&self.state);
            if state.disposed {
                return state.page.clone();
            }
            state.page = ViewState::Loading;
            state.failure = None;
        }

        let fetch = async {
            tokio::try_join!(
                self.catalog.fetch_detail(self.movie_id),
                self.catalog.fetch_cast(self.movie_id)
            )
        };

        let outcome = tokio::select! {
            _ = self.cancel.cancelled() => {
                tracing::debug!("[MovieDetailView] Load of movie {} cancelled", self.movie_id);
                return self.state();
            }
            outcome = fetch => outcome,
        };

        let mut state = lock(&self.state);
        if state.disposed {
            tracing::debug!(
                "[MovieDetailView] Dropping late result for unmounted movie {}",
                self.movie_id
            );
            return state.page.clone();
        }

        match outcome {
            Ok((detail, cast)) => {
                state.page = ViewState::Ready(MovieDetailPage { detail, cast });
            }
            Err(e) => {
                tracing::warn!(
                    "[MovieDetailView] Failed to load movie {}: {}",
                    self.movie_id,
                    e
                );
                state.page = ViewState::Failed(DETAIL_ERROR_MESSAGE.to_string());
                state.failure = Some(e);
            }
        }
        state.page.clone()
    }

    pub fn state(&self) -> ViewState<MovieDetailPage> {
        lock(&self.state).page.clone()
    }

    /// The error behind a `Failed` state.
    pub fn failure(&self) -> Option<MovieNightError> {
        lock(&self.state).failure.clone()
    }

    /// Whether the movie is currently a favorite, as last read from the store.
    pub fn is_favorite(&self) -> bool {
        lock(&self.state).is_favorite
    }

    /// Adds or removes this movie from the favorites.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` unless the view is `Ready`, or the storage error
    /// when the write fails. On failure the indicator keeps showing the
    /// durable state.
    pub fn toggle_favorite(&self) -> Result<bool> {
        let entry = {
            let state = lock(&self.state);
            if state.disposed {
                return Err(MovieNightError::invalid_state("View is unmounted"));
            }
            match &state.page {
                ViewState::Ready(page) => FavoriteEntry::from(&page.detail),
                _ => {
                    return Err(MovieNightError::invalid_state(
                        "Movie details are not loaded",
                    ));
                }
            }
        };

        // The store notifies watchers synchronously, including this view's
        // own, so the state lock must not be held here.
        let result = self.favorites.toggle(entry);

        let is_favorite = self.favorites.contains(self.movie_id);
        lock(&self.state).is_favorite = is_favorite;
        result
    }

    /// Cancels any in-flight load and stops applying updates.
    pub fn unmount(&self) {
        lock(&self.state).disposed = true;
        self.cancel.cancel();
        tracing::debug!("[MovieDetailView] Unmounted movie {}", self.movie_id);
    }

    pub fn is_mounted(&self) -> bool {
        !lock(&self.state).disposed
    }
}

impl Drop for MovieDetailView {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
