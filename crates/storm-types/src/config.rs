//! Server configuration types for storm.
//!
//! `ChatConfig` represents the `config.toml` in the data directory that
//! controls nickname and token sizes, message retention, the identity
//! mode, and persistence.

use serde::{Deserialize, Serialize};

use crate::user::IdentityMode;

/// Top-level configuration for the chat server.
///
/// Loaded from `~/.storm/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Maximum nickname length in characters; also the generated length.
    #[serde(default = "default_nick_length")]
    pub nick_length: usize,

    /// Length of issued bearer tokens.
    #[serde(default = "default_token_length")]
    pub token_length: usize,

    /// Maximum number of retained messages.
    #[serde(default = "default_messages_max")]
    pub messages_max: usize,

    /// Text encoding advertised to clients at registration.
    #[serde(default = "default_encoding")]
    pub encoding: String,

    #[serde(default)]
    pub identity_mode: IdentityMode,

    /// Disable persistence: state is lost on exit.
    #[serde(default = "default_amnesia")]
    pub amnesia: bool,

    /// File name of the persisted users document.
    #[serde(default = "default_users_file")]
    pub users_file: String,

    /// File name of the persisted messages document.
    #[serde(default = "default_messages_file")]
    pub messages_file: String,
}

fn default_nick_length() -> usize {
    8
}

fn default_token_length() -> usize {
    16
}

fn default_messages_max() -> usize {
    100
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

fn default_amnesia() -> bool {
    true
}

fn default_users_file() -> String {
    "users.json".to_string()
}

fn default_messages_file() -> String {
    "messages.json".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            nick_length: default_nick_length(),
            token_length: default_token_length(),
            messages_max: default_messages_max(),
            encoding: default_encoding(),
            identity_mode: IdentityMode::default(),
            amnesia: default_amnesia(),
            users_file: default_users_file(),
            messages_file: default_messages_file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_config_default_values() {
        let config = ChatConfig::default();
        assert_eq!(config.nick_length, 8);
        assert_eq!(config.token_length, 16);
        assert_eq!(config.messages_max, 100);
        assert_eq!(config.encoding, "utf-8");
        assert_eq!(config.identity_mode, IdentityMode::Token);
        assert!(config.amnesia);
    }

    #[test]
    fn test_chat_config_deserialize_with_defaults() {
        let config: ChatConfig = toml::from_str("").unwrap();
        assert_eq!(config, ChatConfig::default());
    }

    #[test]
    fn test_chat_config_deserialize_with_values() {
        let toml_str = r#"
nick_length = 12
messages_max = 500
identity_mode = "address"
amnesia = false
users_file = "people.json"
"#;
        let config: ChatConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.nick_length, 12);
        assert_eq!(config.messages_max, 500);
        assert_eq!(config.identity_mode, IdentityMode::Address);
        assert!(!config.amnesia);
        assert_eq!(config.users_file, "people.json");
        assert_eq!(config.messages_file, "messages.json");
        assert_eq!(config.token_length, 16);
    }
}
