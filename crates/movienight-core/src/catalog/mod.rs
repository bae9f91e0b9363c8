//! Catalog domain models and the client trait.

mod client;
mod image;
mod model;

pub use client::{CatalogClient, MAX_CAST_MEMBERS};
pub use image::{ImageSize, PLACEHOLDER_POSTER_URL, image_url, poster_url};
pub use model::{CastMember, Genre, GenreTag, MovieDetail, MovieId, MovieSummary};
