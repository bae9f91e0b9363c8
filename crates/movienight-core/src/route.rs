//! Navigation surface.

use std::fmt;
use std::str::FromStr;

use crate::catalog::MovieId;
use crate::error::MovieNightError;

/// A page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Home,
    /// `/login`
    Login,
    /// `/signup`
    Signup,
    /// `/movie/:movieId`
    MovieDetail(MovieId),
    /// `/favorites`
    Favorites,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Signup => "/signup".to_string(),
            Route::MovieDetail(id) => format!("/movie/{}", id),
            Route::Favorites => "/favorites".to_string(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

impl FromStr for Route {
    type Err = MovieNightError;

    fn from_str(path: &str) -> Result<Self, Self::Err> {
        let not_found = || MovieNightError::not_found("route", path);

        // Absolute paths only; one trailing slash is tolerated.
        let rest = path.trim().strip_prefix('/').ok_or_else(not_found)?;
        if rest.is_empty() {
            return Ok(Route::Home);
        }
        let rest = rest.strip_suffix('/').unwrap_or(rest);
        let segments: Vec<&str> = rest.split('/').collect();

        match segments.as_slice() {
            ["login"] => Ok(Route::Login),
            ["signup"] => Ok(Route::Signup),
            ["favorites"] => Ok(Route::Favorites),
            ["movie", id] => id
                .parse::<MovieId>()
                .map(Route::MovieDetail)
                .map_err(|_| not_found()),
            _ => Err(not_found()),
        }
    }
}
