use anyhow::{Result, bail};
use movienight_core::storage::{KeyValueStorage, THEME_KEY};
use movienight_core::theme::Theme;

use super::AppContext;
use super::render;

pub fn theme(value: Option<&str>) -> Result<()> {
    let ctx = AppContext::load()?;

    if let Some(value) = value {
        let theme = match value.trim() {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            other => bail!("Unknown theme '{other}' (expected light or dark)"),
        };
        ctx.storage.set(THEME_KEY, theme.as_str())?;
    }

    let theme = ctx.theme();
    println!("Theme: {}", render::accent(theme, theme.as_str()));
    Ok(())
}
