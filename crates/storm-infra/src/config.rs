//! Chat configuration loader for storm.
//!
//! Reads `config.toml` from the data directory (`~/.storm/` in production)
//! and deserializes it into [`ChatConfig`]. Falls back to sensible defaults
//! when the file is missing or malformed.

use std::path::Path;

use storm_types::config::ChatConfig;

/// Shortest nickname the server will generate. Keeps the generated name
/// space large enough for generate-until-unique to terminate quickly.
const MIN_NICK_LENGTH: usize = 4;

/// Shortest bearer token the server will issue.
const MIN_TOKEN_LENGTH: usize = 8;

/// Load chat configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`ChatConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
///
/// The result is passed through [`enforce_floors`] in every case.
pub async fn load_config(data_dir: &Path) -> ChatConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return ChatConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ChatConfig::default();
        }
    };

    match toml::from_str::<ChatConfig>(&content) {
        Ok(config) => enforce_floors(config),
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ChatConfig::default()
        }
    }
}

/// Raise undersized limits to their minimums.
///
/// A message cap below one is raised to one, nicknames to
/// `MIN_NICK_LENGTH`, tokens to `MIN_TOKEN_LENGTH`.
pub fn enforce_floors(mut config: ChatConfig) -> ChatConfig {
    if config.nick_length < MIN_NICK_LENGTH {
        tracing::warn!(
            configured = config.nick_length,
            "nick_length below minimum, using {MIN_NICK_LENGTH}"
        );
        config.nick_length = MIN_NICK_LENGTH;
    }
    config.token_length = config.token_length.max(MIN_TOKEN_LENGTH);
    config.messages_max = config.messages_max.max(1);
    config
}
