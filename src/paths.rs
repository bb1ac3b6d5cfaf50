//! Common paths for campusfeed data storage
//!
//! Everything lives under ~/.config/campusfeed/ on all platforms:
//! - config.toml - User configuration
//! - session.enc - Encrypted session (token + user id)

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the data directory (~/.config/campusfeed/), creating it if needed
pub fn data_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("campusfeed");
    fs::create_dir_all(&dir).context("Failed to create campusfeed directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/campusfeed/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("config.toml"))
}

/// Get the session file path (~/.config/campusfeed/session.enc)
pub fn session_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("session.enc"))
}
