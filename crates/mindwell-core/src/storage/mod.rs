mod config;
pub mod database;

pub use config::Config;
pub use database::{Database, SessionStats, TechniqueStats};

use std::path::PathBuf;

/// Returns `~/.config/mindwell[-dev]/` based on MINDWELL_ENV.
///
/// Set MINDWELL_ENV=dev to use a development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("MINDWELL_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("mindwell-dev")
    } else {
        base_dir.join("mindwell")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
