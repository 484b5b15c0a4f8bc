//! config command - Get, set, or list configuration values

use crate::core::config::{Config, Settings, KNOWN_KEYS};
use crate::engine::Context;
use anyhow::{Context as _, Result};

fn load_global() -> Result<Config> {
    Ok(Config::load(None).context("Failed to load config")?.config)
}

/// Get a configuration value.
pub fn get(_ctx: &Context, key: &str) -> Result<()> {
    let config = load_global()?;
    let value = config.value_of(key)?;
    println!("{}", value);
    Ok(())
}

/// Set a configuration value in the global config file.
pub fn set(ctx: &Context, key: &str, value: &str) -> Result<()> {
    let path = Config::global_config_path()?;
    let mut settings = if path.exists() {
        Config::load_from(Some(&path), None)
            .with_context(|| format!("Failed to read {}", path.display()))?
            .config
            .global
    } else {
        Settings::default()
    };

    settings.set_key(key, value)?;
    let written = Config::write_global(&settings).context("Failed to write config")?;

    if !ctx.quiet {
        println!("Set {} = {} in {}", key, value, written.display());
    }
    Ok(())
}

/// List all configuration values.
pub fn list(_ctx: &Context) -> Result<()> {
    let config = load_global()?;

    match config.global_config_loaded_from() {
        Some(path) => println!("# Global configuration ({})", path.display()),
        None => println!("# Global configuration (defaults)"),
    }
    for key in KNOWN_KEYS {
        println!("{} = {}", key, config.value_of(key)?);
    }
    Ok(())
}
