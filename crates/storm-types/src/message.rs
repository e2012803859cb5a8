//! Chat message types.

use serde::{Deserialize, Serialize};

use crate::user::{UserId, UserView};

/// A message stored in the log.
///
/// Immutable after creation. The author is a handle into the identity
/// store so that renders always show the author's current nickname.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub author: UserId,
    pub content: String,
    /// Local wall-clock time of creation, `HH:MM`.
    pub time: String,
}

/// A message as delivered to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    pub user: UserView,
    pub content: String,
    pub time: String,
}
