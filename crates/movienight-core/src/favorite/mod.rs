//! Favorites: the persisted collection of favorited movies and the store
//! that keeps every mounted view in sync with it.

mod model;
mod store;

pub use model::{FavoriteEntry, FavoritesEvent};
pub use store::{FavoritesStore, FavoritesWatch};
