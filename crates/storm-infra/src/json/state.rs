//! JSON file implementation of StateRepository.
//!
//! Users and messages are kept in two pretty-printed documents
//! (`users.json` and `messages.json` by default). State is only considered
//! saved when both documents exist.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use storm_core::repository::state::StateRepository;
use storm_types::config::ChatConfig;
use storm_types::error::RepositoryError;
use storm_types::record::{ChatSnapshot, MessageRecord, UserRecord};

use crate::filesystem::write_atomic;

pub struct JsonStateRepository {
    users_path: PathBuf,
    messages_path: PathBuf,
}

impl JsonStateRepository {
    pub fn new(users_path: PathBuf, messages_path: PathBuf) -> Self {
        Self {
            users_path,
            messages_path,
        }
    }

    /// Documents named by `config`, inside `data_dir`.
    pub fn from_config(data_dir: &Path, config: &ChatConfig) -> Self {
        Self::new(
            data_dir.join(&config.users_file),
            data_dir.join(&config.messages_file),
        )
    }

    pub fn users_path(&self) -> &Path {
        &self.users_path
    }

    pub fn messages_path(&self) -> &Path {
        &self.messages_path
    }
}

async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, RepositoryError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| RepositoryError::Io(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&content)
        .map_err(|e| RepositoryError::Serialization(format!("{}: {e}", path.display())))
}

async fn write_document<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), RepositoryError> {
    let content = serde_json::to_string_pretty(value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    write_atomic(path, &content)
        .await
        .map_err(|e| RepositoryError::Io(format!("{}: {e}", path.display())))
}

async fn exists(path: &Path) -> Result<bool, RepositoryError> {
    tokio::fs::try_exists(path)
        .await
        .map_err(|e| RepositoryError::Io(format!("{}: {e}", path.display())))
}

impl StateRepository for JsonStateRepository {
    async fn load(&self) -> Result<Option<ChatSnapshot>, RepositoryError> {
        let has_users = exists(&self.users_path).await?;
        let has_messages = exists(&self.messages_path).await?;

        match (has_users, has_messages) {
            (false, false) => return Ok(None),
            (true, true) => {}
            _ => {
                tracing::warn!(
                    users = %self.users_path.display(),
                    messages = %self.messages_path.display(),
                    "Only one state document present, ignoring saved state"
                );
                return Ok(None);
            }
        }

        let users: Vec<UserRecord> = read_document(&self.users_path).await?;
        let messages: Vec<MessageRecord> = read_document(&self.messages_path).await?;
        Ok(Some(ChatSnapshot { users, messages }))
    }

    async fn save(&self, snapshot: &ChatSnapshot) -> Result<(), RepositoryError> {
        // Users are never removed, so a newer users document still resolves
        // every author in an older messages document. Writing users first
        // keeps the pair loadable if the second write fails.
        write_document(&self.users_path, &snapshot.users).await?;
        write_document(&self.messages_path, &snapshot.messages).await?;
        tracing::debug!(
            users = %self.users_path.display(),
            messages = %self.messages_path.display(),
            "Wrote state documents"
        );
        Ok(())
    }
}
