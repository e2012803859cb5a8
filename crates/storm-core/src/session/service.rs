//! Session protocol service.
//!
//! Implements the three chat calls on top of the identity store and the
//! message log:
//!
//! - **retrieve**: known callers read the log (incrementally in address
//!   mode), unknown callers are refused.
//! - **submit**: unknown callers are registered; known callers post a
//!   message.
//! - **change nickname**: known callers rename themselves.
//!
//! Both stores sit behind a single async mutex, held for the whole of each
//! call. Registration generates the nickname inside that same critical
//! section, so concurrent registrations cannot race to one name.

use serde::Serialize;
use tokio::sync::Mutex;

use storm_types::config::ChatConfig;
use storm_types::error::{PersistenceError, SessionError};
use storm_types::message::MessageView;
use storm_types::user::{Identity, IdentityMode, UserId};

use crate::identity::{CredentialGenerator, IdentityStore, RandomGenerator};
use crate::message::MessageLog;
use crate::persistence::PersistenceBridge;
use crate::repository::state::StateRepository;

use super::request;

/// Who is calling, as seen by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// Bearer token header, if present.
    pub token: Option<String>,
    /// Peer address (IP) of the connection.
    pub address: String,
}

impl Caller {
    pub fn new(token: Option<String>, address: impl Into<String>) -> Self {
        Self {
            token,
            address: address.into(),
        }
    }

    /// The key this caller is looked up by under `mode`.
    ///
    /// `None` in token mode when no (or an empty) token was presented.
    pub fn identity(&self, mode: IdentityMode) -> Option<Identity> {
        match mode {
            IdentityMode::Token => self
                .token
                .as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| Identity::Token(t.to_string())),
            IdentityMode::Address => Some(Identity::Address(self.address.clone())),
        }
    }
}

/// Configuration handed to a newly registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    pub nick_length: usize,
    pub encoding: String,
    pub nickname: String,
    /// Issued bearer token (token mode only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// What a submit call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Registered(Registration),
    MessageCreated,
}

/// Store sizes, for status reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChatStats {
    pub users: usize,
    pub messages: usize,
    pub messages_max: usize,
}

struct ChatState {
    identities: IdentityStore,
    messages: MessageLog,
}

/// Request-level chat logic guarding the identity store and message log.
pub struct SessionService<G: CredentialGenerator = RandomGenerator> {
    config: ChatConfig,
    generator: G,
    state: Mutex<ChatState>,
}

impl SessionService<RandomGenerator> {
    /// Create a service over loaded (or empty) stores.
    pub fn new(config: ChatConfig, identities: IdentityStore, messages: MessageLog) -> Self {
        Self::with_generator(config, identities, messages, RandomGenerator)
    }

    /// Create a service with empty stores.
    pub fn empty(config: ChatConfig) -> Self {
        let identities = IdentityStore::from_config(&config);
        let messages = MessageLog::from_config(&config);
        Self::new(config, identities, messages)
    }
}

impl<G: CredentialGenerator> SessionService<G> {
    pub fn with_generator(
        config: ChatConfig,
        identities: IdentityStore,
        messages: MessageLog,
        generator: G,
    ) -> Self {
        Self {
            config,
            generator,
            state: Mutex::new(ChatState {
                identities,
                messages,
            }),
        }
    }

    /// Read the message log.
    ///
    /// Token mode returns every retained message; address mode returns
    /// only messages the caller has not yet received and advances the
    /// caller's cursor. Tokens are always redacted.
    pub async fn retrieve_messages(&self, caller: &Caller) -> Result<Vec<MessageView>, SessionError> {
        let mut state = self.state.lock().await;
        let id = self.resolve(&state, caller)?.ok_or(SessionError::NotRegistered)?;

        match self.config.identity_mode {
            IdentityMode::Token => Ok(state.messages.snapshot(&state.identities, true)),
            IdentityMode::Address => {
                let cursor = state.identities.get(id).map(|u| u.cursor).unwrap_or(0);
                let delivery = state.messages.snapshot_since(cursor, &state.identities, true);
                state.identities.advance_cursor(id, delivery.cursor);
                Ok(delivery.messages)
            }
        }
    }

    /// Register an unknown caller, or post a message for a known one.
    ///
    /// For a known caller the body must be a JSON object with a non-empty
    /// string `content`. The body is ignored for registration.
    pub async fn submit(&self, caller: &Caller, body: &[u8]) -> Result<SubmitOutcome, SessionError> {
        let mut state = self.state.lock().await;

        let Some(id) = self.resolve(&state, caller)? else {
            let user = state.identities.register(&caller.address, &self.generator)?;
            tracing::info!(user_id = %user.id, nickname = %user.nickname, "Registered new user");

            let token = match self.config.identity_mode {
                IdentityMode::Token => Some(user.token.clone()),
                IdentityMode::Address => None,
            };
            return Ok(SubmitOutcome::Registered(Registration {
                nick_length: self.config.nick_length,
                encoding: self.config.encoding.clone(),
                nickname: user.nickname.clone(),
                token,
            }));
        };

        let content = request::message_content(body)?;
        let evicted = state.messages.append(id, content, clock_time());
        tracing::debug!(user_id = %id, evicted, "Message created");
        Ok(SubmitOutcome::MessageCreated)
    }

    /// Rename a known caller. Returns the new nickname.
    pub async fn change_nickname(&self, caller: &Caller, body: &[u8]) -> Result<String, SessionError> {
        let mut state = self.state.lock().await;
        let id = self.resolve(&state, caller)?.ok_or(SessionError::NotRegistered)?;

        let nickname = request::requested_nickname(body)?;
        state.identities.rename(id, &nickname)?;
        tracing::info!(user_id = %id, nickname = %nickname, "Nickname changed");
        Ok(nickname)
    }

    pub async fn stats(&self) -> ChatStats {
        let state = self.state.lock().await;
        ChatStats {
            users: state.identities.len(),
            messages: state.messages.len(),
            messages_max: state.messages.cap(),
        }
    }

    /// Save the current state through `bridge`.
    ///
    /// Requests arriving while the save runs wait on the state lock.
    pub async fn persist<R: StateRepository>(
        &self,
        bridge: &PersistenceBridge<R>,
    ) -> Result<(), PersistenceError> {
        let state = self.state.lock().await;
        bridge.save(&state.identities, &state.messages).await
    }

    /// Map a caller onto a user.
    ///
    /// `Ok(None)` means the caller is unregistered and may register. In
    /// token mode a token that matches nobody is an error rather than an
    /// unregistered caller.
    fn resolve(&self, state: &ChatState, caller: &Caller) -> Result<Option<UserId>, SessionError> {
        let Some(identity) = caller.identity(self.config.identity_mode) else {
            return Ok(None);
        };

        let found = state.identities.find_by_identity(&identity).map(|user| user.id);
        match (found, identity) {
            (Some(id), _) => Ok(Some(id)),
            (None, Identity::Token(_)) => Err(SessionError::UnknownToken),
            (None, Identity::Address(_)) => Ok(None),
        }
    }
}

/// Local wall-clock time as `HH:MM`.
fn clock_time() -> String {
    chrono::Local::now().format("%H:%M").to_string()
}
