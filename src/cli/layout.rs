use anyhow::{Context, Result};
use std::path::PathBuf;

use seebeck_reduce::config::ChannelLayout;

use super::config::{Config, Overrides};

/// Print the resolved column layout as a `[layout]` table
pub fn run(config_path: Option<PathBuf>, overrides: Overrides) -> Result<()> {
    let config = Config::load(config_path.as_deref())?.resolve(&overrides);
    config
        .layout
        .validate()
        .context("Configured layout is invalid")?;

    println!("# {} layout", config.variant);
    print!("{}", render(&config.layout)?);
    Ok(())
}

#[derive(serde::Serialize)]
struct LayoutTable<'a> {
    layout: &'a ChannelLayout,
}

fn render(layout: &ChannelLayout) -> Result<String> {
    toml::to_string(&LayoutTable { layout }).context("Failed to serialize layout")
}
