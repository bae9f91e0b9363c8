use anyhow::Result;
use colored::Colorize;
use movienight_core::route::Route;

pub async fn open(path: &str) -> Result<()> {
    let route: Route = path.parse()?;
    tracing::debug!("Opening {}", route);

    match route {
        Route::Home => super::catalog::home().await,
        Route::MovieDetail(id) => super::catalog::movie(id).await,
        Route::Favorites => super::favorites::list(),
        Route::Login | Route::Signup => {
            println!(
                "{}",
                format!("{route} is a form only. Use `movienight login` or `movienight signup` to check it locally.")
                    .dimmed()
            );
            Ok(())
        }
    }
}
