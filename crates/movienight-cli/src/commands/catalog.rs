use std::str::FromStr;

use anyhow::Result;
use movienight_application::{DETAIL_ERROR_MESSAGE, HomeView, MovieDetailView, MovieRow};
use movienight_core::catalog::{Genre, MovieId};

use super::AppContext;
use super::render;

async fn show_row<F, Fut>(load: F) -> Result<()>
where
    F: FnOnce(HomeView) -> Fut,
    Fut: std::future::Future<Output = MovieRow>,
{
    let ctx = AppContext::load()?;
    let home = HomeView::new(ctx.catalog()?);
    let row = load(home).await;
    render::print_row(&row, ctx.theme(), ctx.image_base_url());
    Ok(())
}

pub async fn home() -> Result<()> {
    let ctx = AppContext::load()?;
    let home = HomeView::new(ctx.catalog()?);
    for row in home.load_rows().await {
        render::print_row(&row, ctx.theme(), ctx.image_base_url());
    }
    Ok(())
}

pub async fn popular() -> Result<()> {
    show_row(|home| async move { home.load_popular().await }).await
}

pub async fn top_rated() -> Result<()> {
    show_row(|home| async move { home.load_top_rated().await }).await
}

pub async fn genre(name: &str) -> Result<()> {
    let genre_id = match name.trim().parse::<u32>() {
        Ok(id) => id,
        Err(_) => Genre::from_str(name)?.id(),
    };
    show_row(|home| async move { home.load_genre_id(genre_id).await }).await
}

pub async fn search(query: &str) -> Result<()> {
    let query = query.to_string();
    show_row(|home| async move { home.search(&query).await }).await
}

pub async fn movie(id: MovieId) -> Result<()> {
    let ctx = AppContext::load()?;
    let view = MovieDetailView::mount(id, ctx.catalog()?, ctx.favorites.clone());
    let state = view.load().await;
    if let Some(err) = view.failure() {
        return Err(anyhow::Error::new(err).context(DETAIL_ERROR_MESSAGE));
    }

    render::print_detail(&state, view.is_favorite(), ctx.theme(), ctx.image_base_url());
    Ok(())
}
