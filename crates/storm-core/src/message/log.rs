//! Append-only message log with a retention cap.
//!
//! Positions are tracked in absolute terms: the log remembers how many
//! messages it has evicted, so a delivery cursor (the absolute count of
//! messages a user has seen) stays meaningful after the front is dropped.

use std::collections::VecDeque;

use storm_types::config::ChatConfig;
use storm_types::message::{Message, MessageView};
use storm_types::user::UserId;

use crate::identity::IdentityStore;

/// Result of an incremental read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub messages: Vec<MessageView>,
    /// Cursor to store for the reader: everything appended so far.
    pub cursor: u64,
}

#[derive(Debug, Clone)]
pub struct MessageLog {
    messages: VecDeque<Message>,
    cap: usize,
    evicted: u64,
}

impl MessageLog {
    /// Create an empty log retaining at most `cap` messages (at least one).
    pub fn new(cap: usize) -> Self {
        Self {
            messages: VecDeque::new(),
            cap: cap.max(1),
            evicted: 0,
        }
    }

    pub fn from_config(config: &ChatConfig) -> Self {
        Self::new(config.messages_max)
    }

    pub fn cap(&self) -> usize {
        self.cap
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Total messages ever appended, evicted ones included.
    pub fn total(&self) -> u64 {
        self.evicted + self.messages.len() as u64
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Append a message, evicting from the front while over the cap.
    ///
    /// Returns the number of messages evicted.
    pub fn append(&mut self, author: UserId, content: String, time: String) -> usize {
        self.messages.push_back(Message {
            author,
            content,
            time,
        });

        let mut dropped = 0;
        while self.messages.len() > self.cap {
            self.messages.pop_front();
            dropped += 1;
        }
        self.evicted += dropped as u64;
        dropped
    }

    /// Every retained message in insertion order.
    pub fn snapshot(&self, identities: &IdentityStore, redact_tokens: bool) -> Vec<MessageView> {
        render(self.messages.iter(), identities, redact_tokens)
    }

    /// Messages whose absolute position is at or past `cursor`.
    ///
    /// A cursor pointing into the evicted range delivers everything still
    /// retained.
    pub fn snapshot_since(
        &self,
        cursor: u64,
        identities: &IdentityStore,
        redact_tokens: bool,
    ) -> Delivery {
        let skip = cursor.saturating_sub(self.evicted) as usize;
        Delivery {
            messages: render(self.messages.iter().skip(skip), identities, redact_tokens),
            cursor: self.total(),
        }
    }
}

fn render<'a>(
    messages: impl Iterator<Item = &'a Message>,
    identities: &IdentityStore,
    redact_tokens: bool,
) -> Vec<MessageView> {
    messages
        .filter_map(|message| {
            let Some(author) = identities.get(message.author) else {
                tracing::warn!(author = %message.author, "message author missing from identity store");
                return None;
            };
            Some(MessageView {
                user: author.view(redact_tokens),
                content: message.content.clone(),
                time: message.time.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::RandomGenerator;
    use storm_types::user::IdentityMode;

    fn store_with_user() -> (IdentityStore, UserId) {
        let mut store = IdentityStore::new(IdentityMode::Token, 8, 16);
        let id = store.register("10.0.0.1", &RandomGenerator).unwrap().id;
        (store, id)
    }

    #[test]
    fn test_append_below_cap_grows_by_one() {
        let mut log = MessageLog::new(3);
        let (_, id) = store_with_user();

        assert_eq!(log.append(id, "one".into(), "10:00".into()), 0);
        assert_eq!(log.len(), 1);
        assert_eq!(log.append(id, "two".into(), "10:01".into()), 0);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_append_at_cap_evicts_oldest() {
        let mut log = MessageLog::new(2);
        let (_, id) = store_with_user();
        log.append(id, "one".into(), "10:00".into());
        log.append(id, "two".into(), "10:01".into());

        assert_eq!(log.append(id, "three".into(), "10:02".into()), 1);
        assert_eq!(log.len(), 2);
        assert_eq!(log.total(), 3);

        let contents: Vec<&str> = log.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three"]);
    }

    #[test]
    fn test_zero_cap_is_floored() {
        let mut log = MessageLog::new(0);
        let (_, id) = store_with_user();
        log.append(id, "only".into(), "10:00".into());
        assert_eq!(log.cap(), 1);
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_redacted_snapshot_hides_tokens() {
        let mut log = MessageLog::new(10);
        let (store, id) = store_with_user();
        log.append(id, "hi".into(), "12:00".into());

        let views = log.snapshot(&store, true);
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].content, "hi");
        assert_eq!(views[0].user.nickname, store.get(id).unwrap().nickname);
        assert!(views[0].user.token.is_none());

        let raw = log.snapshot(&store, false);
        assert_eq!(raw[0].user.token.as_deref(), Some(store.get(id).unwrap().token.as_str()));
    }

    #[test]
    fn test_snapshot_shows_current_nickname() {
        let mut log = MessageLog::new(10);
        let (mut store, id) = store_with_user();
        log.append(id, "hi".into(), "12:00".into());
        store.rename(id, "bee").unwrap();

        assert_eq!(log.snapshot(&store, true)[0].user.nickname, "bee");
    }

    #[test]
    fn test_snapshot_since_delivers_only_new() {
        let mut log = MessageLog::new(10);
        let (store, id) = store_with_user();
        log.append(id, "one".into(), "10:00".into());
        log.append(id, "two".into(), "10:01".into());

        let first = log.snapshot_since(0, &store, true);
        assert_eq!(first.messages.len(), 2);
        assert_eq!(first.cursor, 2);

        let empty = log.snapshot_since(first.cursor, &store, true);
        assert!(empty.messages.is_empty());
        assert_eq!(empty.cursor, 2);

        log.append(id, "three".into(), "10:02".into());
        let next = log.snapshot_since(first.cursor, &store, true);
        assert_eq!(next.messages.len(), 1);
        assert_eq!(next.messages[0].content, "three");
        assert_eq!(next.cursor, 3);
    }

    #[test]
    fn test_snapshot_since_survives_eviction() {
        let mut log = MessageLog::new(2);
        let (store, id) = store_with_user();
        for (i, text) in ["a", "b", "c", "d"].iter().enumerate() {
            log.append(id, text.to_string(), format!("10:0{i}"));
        }

        // Reader saw "a" only; "b" has been evicted since.
        let delivery = log.snapshot_since(1, &store, true);
        let contents: Vec<&str> = delivery.messages.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["c", "d"]);
        assert_eq!(delivery.cursor, 4);

        // Reader saw "a".."c"; only "d" is new.
        let delivery = log.snapshot_since(3, &store, true);
        assert_eq!(delivery.messages.len(), 1);
        assert_eq!(delivery.messages[0].content, "d");
    }
}
