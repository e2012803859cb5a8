//! Identity store: users indexed by token, address, and nickname.

use std::collections::HashMap;

use storm_types::config::ChatConfig;
use storm_types::error::{IdentityError, NicknameError};
use storm_types::record::{bare_host, UserRecord};
use storm_types::user::{Identity, IdentityMode, User, UserId};

use super::generator::CredentialGenerator;

/// All users known to the server.
///
/// Users live in a `Vec` and are never removed, so a `UserId` is simply
/// the user's index. Three indexes keep lookups and the nickname
/// uniqueness check constant-time.
#[derive(Debug, Clone)]
pub struct IdentityStore {
    mode: IdentityMode,
    nick_length: usize,
    token_length: usize,
    users: Vec<User>,
    by_token: HashMap<String, UserId>,
    /// First user registered from each address.
    by_address: HashMap<String, UserId>,
    by_nickname: HashMap<String, UserId>,
}

impl IdentityStore {
    pub fn new(mode: IdentityMode, nick_length: usize, token_length: usize) -> Self {
        Self {
            mode,
            nick_length,
            token_length,
            users: Vec::new(),
            by_token: HashMap::new(),
            by_address: HashMap::new(),
            by_nickname: HashMap::new(),
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.identity_mode, config.nick_length, config.token_length)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &User> {
        self.users.iter()
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.get(id.0)
    }

    pub fn find_by_token(&self, token: &str) -> Option<&User> {
        self.by_token.get(token).and_then(|id| self.get(*id))
    }

    pub fn find_by_address(&self, address: &str) -> Option<&User> {
        self.by_address.get(address).and_then(|id| self.get(*id))
    }

    pub fn find_by_identity(&self, identity: &Identity) -> Option<&User> {
        match identity {
            Identity::Token(token) => self.find_by_token(token),
            Identity::Address(address) => self.find_by_address(address),
        }
    }

    /// Register a new user calling from `address`.
    ///
    /// The nickname and token are drawn from `generator` until they collide
    /// with nothing already issued. Termination is probabilistic: with the
    /// default 8-character alphanumeric nicknames the name space holds 62^8
    /// candidates, so a retry is already rare and an endless run has
    /// probability zero. A tiny `nick_length` can exhaust the space, which
    /// is why the configured length is floored.
    ///
    /// # Errors
    ///
    /// In address mode, returns `IdentityError::AlreadyRegistered` when the
    /// address already belongs to a user. The caller is expected to look the
    /// identity up first.
    pub fn register<G>(&mut self, address: &str, generator: &G) -> Result<&User, IdentityError>
    where
        G: CredentialGenerator + ?Sized,
    {
        if self.mode == IdentityMode::Address && self.by_address.contains_key(address) {
            return Err(IdentityError::AlreadyRegistered(address.to_string()));
        }

        let nickname = draw_unused(generator, self.nick_length, &self.by_nickname);
        let token = draw_unused(generator, self.token_length, &self.by_token);

        Ok(self.insert(address.to_string(), nickname, token))
    }

    /// Change a user's nickname.
    ///
    /// Renaming to the nickname the user already holds is accepted as a
    /// no-op. On any error the store is unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this store.
    pub fn rename(&mut self, id: UserId, new_nickname: &str) -> Result<(), NicknameError> {
        if new_nickname.is_empty() {
            return Err(NicknameError::Missing);
        }
        if new_nickname.chars().count() > self.nick_length {
            return Err(NicknameError::TooLong {
                max: self.nick_length,
            });
        }
        match self.by_nickname.get(new_nickname) {
            Some(holder) if *holder == id => return Ok(()),
            Some(_) => return Err(NicknameError::Taken(new_nickname.to_string())),
            None => {}
        }

        let user = &mut self.users[id.0];
        self.by_nickname.remove(&user.nickname);
        self.by_nickname.insert(new_nickname.to_string(), id);
        user.nickname = new_nickname.to_string();
        Ok(())
    }

    /// Record that `id` has been delivered everything before `cursor`.
    pub fn advance_cursor(&mut self, id: UserId, cursor: u64) {
        if let Some(user) = self.users.get_mut(id.0) {
            user.cursor = cursor;
        }
    }

    /// Re-insert a persisted user.
    ///
    /// Duplicate tokens or nicknames mean the saved document was edited or
    /// damaged; both are rejected rather than merged. Legacy `ip:port`
    /// addresses are stored as the bare IP so address mode matches them.
    pub fn restore(&mut self, record: UserRecord) -> Result<UserId, IdentityError> {
        if self.by_token.contains_key(&record.token) {
            return Err(IdentityError::Corrupt(format!(
                "duplicate token for user '{}'",
                record.nickname
            )));
        }
        if self.by_nickname.contains_key(&record.nickname) {
            return Err(IdentityError::Corrupt(format!(
                "duplicate nickname '{}'",
                record.nickname
            )));
        }
        Ok(self.insert(bare_host(&record.address), record.nickname, record.token).id)
    }

    fn insert(&mut self, address: String, nickname: String, token: String) -> &User {
        let id = UserId(self.users.len());
        self.by_token.insert(token.clone(), id);
        self.by_address.entry(address.clone()).or_insert(id);
        self.by_nickname.insert(nickname.clone(), id);
        self.users.push(User {
            id,
            address,
            nickname,
            token,
            cursor: 0,
        });
        &self.users[id.0]
    }
}

fn draw_unused<G>(generator: &G, len: usize, taken: &HashMap<String, UserId>) -> String
where
    G: CredentialGenerator + ?Sized,
{
    loop {
        let candidate = generator.generate(len);
        if !taken.contains_key(&candidate) {
            return candidate;
        }
    }
}
