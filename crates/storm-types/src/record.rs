//! Persisted record schema.
//!
//! Explicit per-entity records written to `users.json` and `messages.json`.
//! The older field names (`ip`, `user`) are accepted on load so documents
//! written by earlier servers still restore.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(alias = "ip")]
    pub address: String,
    pub nickname: String,
    pub token: String,
}

/// Reference from a persisted message to its author.
///
/// Resolved by token first, then by address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(alias = "ip")]
    pub address: String,
}

/// A persisted message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(alias = "user")]
    pub author: AuthorRef,
    pub content: String,
    pub time: String,
}

/// Everything the server saves at shutdown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatSnapshot {
    pub users: Vec<UserRecord>,
    pub messages: Vec<MessageRecord>,
}

/// The host part of a stored address.
///
/// Older documents recorded the peer as `ip:port`, while callers are keyed
/// on the bare IP. Anything that is not a socket address is kept as is.
pub fn bare_host(address: &str) -> String {
    match address.parse::<SocketAddr>() {
        Ok(addr) => addr.ip().to_string(),
        Err(_) => address.to_string(),
    }
}
