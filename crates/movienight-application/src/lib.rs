//! Application layer for MovieNight.
//!
//! Views mount against a [`CatalogClient`](movienight_core::catalog::CatalogClient)
//! and a [`FavoritesStore`](movienight_core::favorite::FavoritesStore). They
//! own their own state and keep it in sync with the store through watches.

pub mod detail_view;
pub mod favorites_view;
pub mod home_view;
pub mod view_state;

pub use detail_view::{DETAIL_ERROR_MESSAGE, MovieDetailPage, MovieDetailView};
pub use favorites_view::{EMPTY_FAVORITES_MESSAGE, FavoritesListView};
pub use home_view::{HomeView, MovieRow};
pub use view_state::ViewState;
