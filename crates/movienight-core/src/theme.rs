//! Display preference stored under the `theme` key.

use crate::storage::{KeyValueStorage, THEME_KEY};

/// Light or dark display mode. Dark unless the stored value is `"light"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// Interprets a raw stored value.
    pub fn from_value(value: Option<&str>) -> Self {
        match value {
            Some("light") => Theme::Light,
            _ => Theme::Dark,
        }
    }

    /// Reads the preference. Read failures fall back to dark.
    pub fn from_storage(storage: &dyn KeyValueStorage) -> Self {
        match storage.get(THEME_KEY) {
            Ok(value) => Self::from_value(value.as_deref()),
            Err(e) => {
                tracing::debug!("Failed to read theme preference: {}", e);
                Theme::Dark
            }
        }
    }

    /// Value stored under the theme key.
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }
}
