//! Resolution of relative image paths against the catalog image host.

/// Shown when a movie has no poster.
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/300x450";

/// Rendition sizes served by the image host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSize {
    /// Posters and cards.
    W500,
    /// Full-size backdrops.
    Original,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageSize::W500 => "w500",
            ImageSize::Original => "original",
        }
    }
}

/// Joins `base` (e.g. `https://image.tmdb.org/t/p`), the size segment and a
/// relative `path` such as `/abc.jpg`.
pub fn image_url(base: &str, size: ImageSize, path: &str) -> String {
    let base = base.trim_end_matches('/');
    if path.starts_with('/') {
        format!("{}/{}{}", base, size.as_str(), path)
    } else {
        format!("{}/{}/{}", base, size.as_str(), path)
    }
}

/// Poster URL for an optional path, falling back to the placeholder.
pub fn poster_url(base: &str, path: Option<&str>) -> String {
    match path {
        Some(path) if !path.is_empty() => image_url(base, ImageSize::W500, path),
        _ => PLACEHOLDER_POSTER_URL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url_joins_segments() {
        assert_eq!(
            image_url("https://image.tmdb.org/t/p/", ImageSize::Original, "/bg.jpg"),
            "https://image.tmdb.org/t/p/original/bg.jpg"
        );
        assert_eq!(
            image_url("https://image.tmdb.org/t/p", ImageSize::W500, "abc.jpg"),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_missing_poster_uses_placeholder() {
        assert_eq!(poster_url("https://img", None), PLACEHOLDER_POSTER_URL);
        assert_eq!(poster_url("https://img", Some("")), PLACEHOLDER_POSTER_URL);
        assert_eq!(poster_url("https://img", Some("/p.jpg")), "https://img/w500/p.jpg");
    }
}
