use anyhow::Result;
use clap::{Parser, Subcommand};
use movienight_core::catalog::MovieId;

mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "movienight")]
#[command(about = "MovieNight - browse movies and keep a list of favorites", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show every home page row
    Home,
    /// List popular movies
    Popular,
    /// List top-rated movies
    TopRated,
    /// List movies of one genre (horror, sci-fi, comedy, action or a catalog id)
    Genre { genre: String },
    /// Search movies by title
    Search { query: String },
    /// Show a movie's details and cast
    Movie { id: MovieId },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Open a page by path, e.g. `/movie/27205` or `/favorites`
    Open { path: String },
    /// Check the sign-in form locally (nothing is submitted)
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long)]
        remember_me: bool,
    },
    /// Check the sign-up form locally (nothing is submitted)
    Signup {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Show the display theme, or set it to `light` or `dark`
    Theme { value: Option<String> },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List favorites
    List,
    /// Add a movie to the favorites
    Add { id: MovieId },
    /// Remove a movie from the favorites
    Remove { id: MovieId },
    /// Add the movie if absent, remove it otherwise
    Toggle { id: MovieId },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Home => commands::catalog::home().await?,
        Commands::Popular => commands::catalog::popular().await?,
        Commands::TopRated => commands::catalog::top_rated().await?,
        Commands::Genre { genre } => commands::catalog::genre(&genre).await?,
        Commands::Search { query } => commands::catalog::search(&query).await?,
        Commands::Movie { id } => commands::catalog::movie(id).await?,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::favorites::list()?,
            FavoritesAction::Add { id } => commands::favorites::add(id).await?,
            FavoritesAction::Remove { id } => commands::favorites::remove(id)?,
            FavoritesAction::Toggle { id } => commands::favorites::toggle(id).await?,
        },
        Commands::Open { path } => commands::open::open(&path).await?,
        Commands::Login {
            email,
            password,
            remember_me,
        } => commands::account::login(email, password, remember_me)?,
        Commands::Signup { email, password } => commands::account::signup(email, password)?,
        Commands::Theme { value } => commands::theme::theme(value.as_deref())?,
    }

    Ok(())
}
