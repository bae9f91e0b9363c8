//! Terminal rendering for views.

use colored::{ColoredString, Colorize};
use movienight_application::{
    EMPTY_FAVORITES_MESSAGE, MovieDetailPage, MovieRow, ViewState,
};
use movienight_core::catalog::{ImageSize, MovieSummary, image_url, poster_url};
use movienight_core::favorite::FavoriteEntry;
use movienight_core::theme::Theme;

pub fn accent(theme: Theme, text: &str) -> ColoredString {
    if theme.is_dark() {
        text.bright_red().bold()
    } else {
        text.blue().bold()
    }
}

pub fn print_row(row: &MovieRow, theme: Theme, image_base: &str) {
    println!("{}", accent(theme, &row.title));
    match &row.state {
        ViewState::Loading => println!("  {}", "Loading...".dimmed()),
        ViewState::Failed(message) => println!("  {}", message.red()),
        ViewState::Ready(movies) if movies.is_empty() => {
            println!("  {}", "No movies found.".dimmed())
        }
        ViewState::Ready(movies) => {
            for movie in movies {
                print_summary(movie, image_base);
            }
        }
    }
    println!();
}

fn print_summary(movie: &MovieSummary, image_base: &str) {
    let rating = movie
        .vote_average
        .map(|v| format!("{v:.1}"))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "  {:>8}  {}  {}  {}",
        movie.id,
        movie.title.bold(),
        format!("[{rating}]").yellow(),
        poster_url(image_base, movie.poster_path.as_deref()).dimmed()
    );
}

pub fn print_detail(
    state: &ViewState<MovieDetailPage>,
    is_favorite: bool,
    theme: Theme,
    image_base: &str,
) {
    let page = match state {
        ViewState::Ready(page) => page,
        ViewState::Failed(message) => {
            eprintln!("{}", message.red());
            return;
        }
        ViewState::Loading => {
            println!("{}", "Loading...".dimmed());
            return;
        }
    };
    let detail = &page.detail;

    let marker = if is_favorite { "★ Favorite" } else { "☆ Not a favorite" };
    println!("{}  {}", accent(theme, &detail.title), marker.yellow());
    if let Some(tagline) = detail.tagline.as_deref().filter(|t| !t.is_empty()) {
        println!("{}", tagline.italic());
    }

    let mut facts = Vec::new();
    if let Some(date) = &detail.release_date {
        facts.push(date.clone());
    }
    if let Some(runtime) = detail.runtime {
        facts.push(format!("{runtime} min"));
    }
    if let Some(rating) = detail.vote_average {
        facts.push(format!("rating {rating:.1}"));
    }
    if let Some(genres) = detail.genre_names() {
        facts.push(genres);
    }
    if !facts.is_empty() {
        println!("{}", facts.join(" · ").dimmed());
    }

    if let Some(overview) = &detail.overview {
        println!("\n{overview}");
    }

    println!(
        "\nPoster:   {}",
        poster_url(image_base, detail.poster_path.as_deref())
    );
    if let Some(backdrop) = &detail.backdrop_path {
        println!(
            "Backdrop: {}",
            image_url(image_base, ImageSize::Original, backdrop)
        );
    }

    if !page.cast.is_empty() {
        println!("\n{}", "Cast".bold());
        for member in &page.cast {
            match &member.character {
                Some(character) => println!("  {} as {}", member.name, character.dimmed()),
                None => println!("  {}", member.name),
            }
        }
    }
}

pub fn print_favorites(entries: &[FavoriteEntry], theme: Theme, image_base: &str) {
    println!("{}", accent(theme, "Your Favorites"));
    if entries.is_empty() {
        println!("  {}", EMPTY_FAVORITES_MESSAGE.dimmed());
        return;
    }
    for entry in entries {
        println!(
            "  {:>8}  {}  {}",
            entry.id,
            entry.title.bold(),
            poster_url(image_base, entry.poster_path.as_deref()).dimmed()
        );
    }
}
