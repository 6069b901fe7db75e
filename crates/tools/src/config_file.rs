//! Loading dungeon configs from TOML files.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dungeon_core::DungeonConfig;

pub fn load_config(path: &Path) -> Result<DungeonConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config file: {}", path.display()))
}

pub fn parse_config(content: &str) -> Result<DungeonConfig> {
    let config: DungeonConfig = toml::from_str(content).context("Failed to parse config TOML")?;
    config.validate()?;
    Ok(config)
}
