//! Filesystem helpers for storm.
//!
//! Resolves the data directory holding `config.toml`, `users.json`, and
//! `messages.json`, and writes documents atomically.

use std::path::{Path, PathBuf};

/// Resolve the data directory from environment or platform defaults.
///
/// Priority:
/// 1. `STORM_DATA_DIR` environment variable
/// 2. `~/.storm` in the user's home directory
/// 3. `.storm` in the current directory
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STORM_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".storm");
    }

    PathBuf::from(".storm")
}

/// Write `content` to `path` via a temporary sibling and a rename, so a
/// crash mid-write never leaves a truncated document behind.
pub async fn write_atomic(path: &Path, content: &str) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, content).await?;
    tokio::fs::rename(&tmp_path, path).await
}
