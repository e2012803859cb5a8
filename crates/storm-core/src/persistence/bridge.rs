//! Persistence bridge between the live stores and a `StateRepository`.
//!
//! Loading happens once before the server accepts requests and saving once
//! after it stops. In amnesia mode both are skipped and the server starts
//! from empty stores.

use storm_types::config::ChatConfig;
use storm_types::error::PersistenceError;
use storm_types::record::{bare_host, AuthorRef, ChatSnapshot, MessageRecord, UserRecord};

use crate::identity::IdentityStore;
use crate::message::MessageLog;
use crate::repository::state::StateRepository;

pub struct PersistenceBridge<R: StateRepository> {
    repo: R,
    config: ChatConfig,
}

impl<R: StateRepository> PersistenceBridge<R> {
    pub fn new(repo: R, config: ChatConfig) -> Self {
        Self { repo, config }
    }

    /// Whether state survives restarts.
    pub fn is_enabled(&self) -> bool {
        !self.config.amnesia
    }

    /// Build the stores from the last save, or empty stores when there is
    /// none or persistence is disabled.
    pub async fn load(&self) -> Result<(IdentityStore, MessageLog), PersistenceError> {
        let mut identities = IdentityStore::from_config(&self.config);
        let mut messages = MessageLog::from_config(&self.config);

        if !self.is_enabled() {
            tracing::debug!("Amnesia mode, starting with empty state");
            return Ok((identities, messages));
        }

        let Some(snapshot) = self.repo.load().await? else {
            tracing::info!("No saved state found, starting with empty state");
            return Ok((identities, messages));
        };

        import(snapshot, &mut identities, &mut messages)?;
        tracing::info!(
            users = identities.len(),
            messages = messages.len(),
            "Restored saved chat state"
        );
        Ok((identities, messages))
    }

    /// Save both stores. A no-op in amnesia mode.
    pub async fn save(
        &self,
        identities: &IdentityStore,
        messages: &MessageLog,
    ) -> Result<(), PersistenceError> {
        if !self.is_enabled() {
            tracing::debug!("Amnesia mode, discarding chat state");
            return Ok(());
        }

        let snapshot = export(identities, messages);
        self.repo.save(&snapshot).await?;
        tracing::info!(
            users = snapshot.users.len(),
            messages = snapshot.messages.len(),
            "Saved chat state"
        );
        Ok(())
    }
}

/// Convert live stores to records.
pub fn export(identities: &IdentityStore, messages: &MessageLog) -> ChatSnapshot {
    let users = identities
        .iter()
        .map(|user| UserRecord {
            address: user.address.clone(),
            nickname: user.nickname.clone(),
            token: user.token.clone(),
        })
        .collect();

    let messages = messages
        .iter()
        .filter_map(|message| {
            let author = identities.get(message.author)?;
            Some(MessageRecord {
                author: AuthorRef {
                    token: Some(author.token.clone()),
                    address: author.address.clone(),
                },
                content: message.content.clone(),
                time: message.time.clone(),
            })
        })
        .collect();

    ChatSnapshot { users, messages }
}

/// Restore records into the given stores.
///
/// Users are restored first; each message's author is then resolved by
/// token, falling back to address.
pub fn import(
    snapshot: ChatSnapshot,
    identities: &mut IdentityStore,
    messages: &mut MessageLog,
) -> Result<(), PersistenceError> {
    for record in snapshot.users {
        identities.restore(record)?;
    }

    for record in snapshot.messages {
        let author = record
            .author
            .token
            .as_deref()
            .and_then(|token| identities.find_by_token(token))
            .or_else(|| identities.find_by_address(&bare_host(&record.author.address)))
            .map(|user| user.id)
            .ok_or_else(|| PersistenceError::DanglingAuthor {
                token: record.author.token.clone(),
                address: record.author.address.clone(),
            })?;
        messages.append(author, record.content, record.time);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use storm_types::error::RepositoryError;

    use crate::identity::RandomGenerator;

    /// In-memory repository for testing.
    #[derive(Default)]
    struct MemoryStateRepository {
        saved: Mutex<Option<ChatSnapshot>>,
    }

    impl StateRepository for MemoryStateRepository {
        async fn load(&self) -> Result<Option<ChatSnapshot>, RepositoryError> {
            Ok(self.saved.lock().unwrap().clone())
        }

        async fn save(&self, snapshot: &ChatSnapshot) -> Result<(), RepositoryError> {
            *self.saved.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }
    }

    fn persistent_config() -> ChatConfig {
        ChatConfig {
            amnesia: false,
            ..ChatConfig::default()
        }
    }

    fn populated(config: &ChatConfig) -> (IdentityStore, MessageLog) {
        let mut identities = IdentityStore::from_config(config);
        let mut messages = MessageLog::from_config(config);
        let a = identities.register("10.0.0.1", &RandomGenerator).unwrap().id;
        let b = identities.register("10.0.0.2", &RandomGenerator).unwrap().id;
        identities.rename(b, "bee").unwrap();
        messages.append(a, "hi".to_string(), "12:00".to_string());
        messages.append(b, "hello".to_string(), "12:01".to_string());
        (identities, messages)
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let config = persistent_config();
        let bridge = PersistenceBridge::new(MemoryStateRepository::default(), config.clone());
        let (identities, messages) = populated(&config);

        bridge.save(&identities, &messages).await.unwrap();
        let (restored_ids, restored_msgs) = bridge.load().await.unwrap();

        let pairs = |store: &IdentityStore| -> Vec<(String, String)> {
            store.iter().map(|u| (u.nickname.clone(), u.token.clone())).collect()
        };
        assert_eq!(pairs(&restored_ids), pairs(&identities));

        let original = messages.snapshot(&identities, false);
        let restored = restored_msgs.snapshot(&restored_ids, false);
        assert_eq!(restored, original);
        assert_eq!(restored[1].user.nickname, "bee");
    }

    #[tokio::test]
    async fn test_load_without_save_is_empty() {
        let bridge = PersistenceBridge::new(MemoryStateRepository::default(), persistent_config());
        let (identities, messages) = bridge.load().await.unwrap();
        assert!(identities.is_empty());
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_amnesia_skips_repository() {
        let config = ChatConfig::default();
        assert!(config.amnesia);
        let bridge = PersistenceBridge::new(MemoryStateRepository::default(), config.clone());
        let (identities, messages) = populated(&config);

        bridge.save(&identities, &messages).await.unwrap();
        assert!(bridge.repo.saved.lock().unwrap().is_none());

        let (loaded, _) = bridge.load().await.unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_import_falls_back_to_address() {
        let config = ChatConfig::default();
        let mut identities = IdentityStore::from_config(&config);
        let mut messages = MessageLog::from_config(&config);

        let snapshot = ChatSnapshot {
            users: vec![UserRecord {
                address: "10.0.0.5".to_string(),
                nickname: "abc".to_string(),
                token: "T1".to_string(),
            }],
            messages: vec![MessageRecord {
                author: AuthorRef {
                    token: None,
                    address: "10.0.0.5".to_string(),
                },
                content: "hi".to_string(),
                time: "08:00".to_string(),
            }],
        };

        import(snapshot, &mut identities, &mut messages).unwrap();
        let views = messages.snapshot(&identities, true);
        assert_eq!(views[0].user.nickname, "abc");
    }

    #[test]
    fn test_import_legacy_port_addresses() {
        let config = ChatConfig {
            identity_mode: storm_types::user::IdentityMode::Address,
            ..ChatConfig::default()
        };
        let mut identities = IdentityStore::from_config(&config);
        let mut messages = MessageLog::from_config(&config);

        let snapshot = ChatSnapshot {
            users: vec![UserRecord {
                address: "10.0.0.5:4242".to_string(),
                nickname: "abc".to_string(),
                token: "T1".to_string(),
            }],
            messages: vec![MessageRecord {
                author: AuthorRef {
                    token: None,
                    address: "10.0.0.5:5151".to_string(),
                },
                content: "hi".to_string(),
                time: "08:00".to_string(),
            }],
        };

        import(snapshot, &mut identities, &mut messages).unwrap();
        assert!(identities.find_by_address("10.0.0.5").is_some());
        assert_eq!(messages.snapshot(&identities, true)[0].user.nickname, "abc");
    }

    #[test]
    fn test_import_dangling_author_fails() {
        let config = ChatConfig::default();
        let mut identities = IdentityStore::from_config(&config);
        let mut messages = MessageLog::from_config(&config);

        let snapshot = ChatSnapshot {
            users: Vec::new(),
            messages: vec![MessageRecord {
                author: AuthorRef {
                    token: Some("ghost".to_string()),
                    address: "10.0.0.9".to_string(),
                },
                content: "boo".to_string(),
                time: "00:00".to_string(),
            }],
        };

        let err = import(snapshot, &mut identities, &mut messages).unwrap_err();
        assert!(matches!(err, PersistenceError::DanglingAuthor { .. }));
    }

    #[test]
    fn test_import_applies_cap() {
        let config = ChatConfig {
            messages_max: 1,
            ..ChatConfig::default()
        };
        let (identities, messages) = populated(&ChatConfig::default());
        let snapshot = export(&identities, &messages);

        let mut restored_ids = IdentityStore::from_config(&config);
        let mut restored_msgs = MessageLog::from_config(&config);
        import(snapshot, &mut restored_ids, &mut restored_msgs).unwrap();

        assert_eq!(restored_msgs.len(), 1);
        assert_eq!(restored_msgs.iter().next().unwrap().content, "hello");
    }
}
