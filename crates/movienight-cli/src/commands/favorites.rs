use anyhow::Result;
use colored::Colorize;
use movienight_application::{DETAIL_ERROR_MESSAGE, FavoritesListView, MovieDetailView};
use movienight_core::catalog::MovieId;

use super::AppContext;
use super::render;

pub fn list() -> Result<()> {
    let ctx = AppContext::load()?;
    let view = FavoritesListView::mount(ctx.favorites.clone());
    render::print_favorites(&view.entries(), ctx.theme(), ctx.image_base_url());
    Ok(())
}

/// Loads the detail page so the stored entry carries the current title and
/// poster.
async fn loaded_view(ctx: &AppContext, id: MovieId) -> Result<MovieDetailView> {
    let view = MovieDetailView::mount(id, ctx.catalog()?, ctx.favorites.clone());
    view.load().await;
    if let Some(err) = view.failure() {
        return Err(anyhow::Error::new(err).context(DETAIL_ERROR_MESSAGE));
    }
    Ok(view)
}

pub async fn add(id: MovieId) -> Result<()> {
    let ctx = AppContext::load()?;
    let view = loaded_view(&ctx, id).await?;

    if view.is_favorite() {
        println!("{}", format!("Movie {id} is already a favorite").dimmed());
        return Ok(());
    }
    view.toggle_favorite()?;
    println!("{}", format!("Added movie {id} to favorites").green());
    Ok(())
}

pub fn remove(id: MovieId) -> Result<()> {
    let ctx = AppContext::load()?;
    let view = FavoritesListView::mount(ctx.favorites.clone());

    if !view.entries().iter().any(|e| e.id == id) {
        println!("{}", format!("Movie {id} is not a favorite").dimmed());
        return Ok(());
    }
    view.remove(id)?;
    println!("{}", format!("Removed movie {id} from favorites").green());
    Ok(())
}

pub async fn toggle(id: MovieId) -> Result<()> {
    let ctx = AppContext::load()?;
    let view = loaded_view(&ctx, id).await?;

    if view.toggle_favorite()? {
        println!("{}", format!("Added movie {id} to favorites").green());
    } else {
        println!("{}", format!("Removed movie {id} from favorites").green());
    }
    Ok(())
}
