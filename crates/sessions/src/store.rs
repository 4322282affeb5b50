//! Storage abstraction for per-session message history.
use std::collections::HashMap;

use {
    async_trait::async_trait,
    tokio::sync::RwLock,
    tracing::{debug, warn},
};

use crate::{key::SessionId, message::MessageRecord};

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Append one record, creating the session on first use.
    async fn append(&self, session: &SessionId, record: MessageRecord);

    /// Append a visitor message and its reply as one unit. Readers never see
    /// the first without the second.
    async fn append_exchange(
        &self,
        session: &SessionId,
        user: MessageRecord,
        reply: MessageRecord,
    );

    /// Full ordered history for a session; empty when the session is unknown.
    async fn get(&self, session: &str) -> Vec<MessageRecord>;

    /// Number of sessions holding at least one record.
    async fn session_count(&self) -> usize;
}

// ── In-memory store ─────────────────────────────────────────────────────────

/// Smallest usable cap: one visitor message plus its reply.
pub const MIN_MESSAGES_PER_SESSION: usize = 2;

/// Process-lifetime store backed by a single `RwLock<HashMap>`.
#[derive(Default)]
pub struct InMemoryMessageStore {
    sessions: RwLock<HashMap<SessionId, Vec<MessageRecord>>>,
    max_messages_per_session: Option<usize>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cap each session at `max` records. Oldest records are dropped first.
    /// Caps below [`MIN_MESSAGES_PER_SESSION`] are raised to it.
    pub fn with_max_messages_per_session(mut self, max: Option<usize>) -> Self {
        self.max_messages_per_session = max.map(|n| {
            if n < MIN_MESSAGES_PER_SESSION {
                warn!(
                    requested = n,
                    applied = MIN_MESSAGES_PER_SESSION,
                    "max_messages_per_session too small, raising"
                );
                return MIN_MESSAGES_PER_SESSION;
            }
            n
        });
        self
    }

    pub fn max_messages_per_session(&self) -> Option<usize> {
        self.max_messages_per_session
    }

    /// Append `new` to a session and trim it. Sessions left empty are removed.
    fn push_records(
        &self,
        sessions: &mut HashMap<SessionId, Vec<MessageRecord>>,
        session: &SessionId,
        new: impl IntoIterator<Item = MessageRecord>,
    ) {
        let records = sessions.entry(session.clone()).or_default();
        records.extend(new);
        self.enforce_cap(session, records);
        if records.is_empty() {
            sessions.remove(session);
        }
    }

    fn enforce_cap(&self, session: &SessionId, records: &mut Vec<MessageRecord>) {
        let Some(max) = self.max_messages_per_session else {
            return;
        };
        if records.len() <= max {
            return;
        }
        let mut excess = records.len() - max;
        // Never leave a reply at the head without the message it answered.
        while records.get(excess).is_some_and(|r| !r.is_user) {
            excess += 1;
        }
        records.drain(..excess);
        debug!(session = %session, dropped = excess, "trimmed session history");
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn append(&self, session: &SessionId, record: MessageRecord) {
        let mut sessions = self.sessions.write().await;
        self.push_records(&mut sessions, session, [record]);
    }

    async fn append_exchange(
        &self,
        session: &SessionId,
        user: MessageRecord,
        reply: MessageRecord,
    ) {
        let mut sessions = self.sessions.write().await;
        self.push_records(&mut sessions, session, [user, reply]);
    }

    async fn get(&self, session: &str) -> Vec<MessageRecord> {
        self.sessions
            .read()
            .await
            .get(session)
            .cloned()
            .unwrap_or_default()
    }

    async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    fn sid(s: &str) -> SessionId {
        SessionId::new(s).unwrap()
    }

    #[tokio::test]
    async fn unknown_session_is_empty() {
        let store = InMemoryMessageStore::new();
        assert!(store.get("nobody").await.is_empty());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn append_creates_session_lazily() {
        let store = InMemoryMessageStore::new();
        store.append(&sid("s1"), MessageRecord::user("one")).await;
        store.append(&sid("s1"), MessageRecord::reply("two")).await;

        let history = store.get("s1").await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "one");
        assert_eq!(history[1].content, "two");
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn get_does_not_create_session() {
        let store = InMemoryMessageStore::new();
        let _ = store.get("ghost").await;
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let store = InMemoryMessageStore::new();
        store
            .append_exchange(&sid("a"), MessageRecord::user("hi"), MessageRecord::reply("hello"))
            .await;
        store
            .append_exchange(&sid("b"), MessageRecord::user("price"), MessageRecord::reply("sales"))
            .await;

        assert_eq!(store.get("a").await[0].content, "hi");
        assert_eq!(store.get("b").await[0].content, "price");
        assert_eq!(store.session_count().await, 2);
    }

    #[tokio::test]
    async fn exchange_keeps_user_then_reply_order() {
        let store = InMemoryMessageStore::new();
        for i in 0..3 {
            store
                .append_exchange(
                    &sid("s1"),
                    MessageRecord::user(format!("q{i}")),
                    MessageRecord::reply(format!("a{i}")),
                )
                .await;
        }

        let history = store.get("s1").await;
        assert_eq!(history.len(), 6);
        for pair in history.chunks(2) {
            assert!(pair[0].is_user);
            assert!(!pair[1].is_user);
            assert_eq!(pair[0].content[1..], pair[1].content[1..]);
        }
    }

    #[tokio::test]
    async fn cap_drops_oldest_exchanges() {
        let store = InMemoryMessageStore::new().with_max_messages_per_session(Some(4));
        for i in 0..3 {
            store
                .append_exchange(
                    &sid("s1"),
                    MessageRecord::user(format!("q{i}")),
                    MessageRecord::reply(format!("a{i}")),
                )
                .await;
        }

        let contents: Vec<String> = store
            .get("s1")
            .await
            .into_iter()
            .map(|r| r.content)
            .collect();
        assert_eq!(contents, ["q1", "a1", "q2", "a2"]);
    }

    #[tokio::test]
    async fn odd_cap_never_leaves_orphan_reply() {
        let store = InMemoryMessageStore::new().with_max_messages_per_session(Some(3));
        for i in 0..2 {
            store
                .append_exchange(
                    &sid("s1"),
                    MessageRecord::user(format!("q{i}")),
                    MessageRecord::reply(format!("a{i}")),
                )
                .await;
        }

        let history = store.get("s1").await;
        assert_eq!(history.len(), 2);
        assert!(history[0].is_user);
        assert_eq!(history[0].content, "q1");
    }

    #[tokio::test]
    async fn caps_below_two_keep_latest_exchange() {
        for cap in [0, 1] {
            let store = InMemoryMessageStore::new().with_max_messages_per_session(Some(cap));
            assert_eq!(store.max_messages_per_session(), Some(MIN_MESSAGES_PER_SESSION));

            store
                .append_exchange(
                    &sid("s1"),
                    MessageRecord::user("hi"),
                    MessageRecord::reply("hello"),
                )
                .await;

            let history = store.get("s1").await;
            assert_eq!(history.len(), 2, "cap {cap}");
            assert_eq!(history[0].content, "hi");
            assert_eq!(history[1].content, "hello");
            assert_eq!(store.session_count().await, 1);
        }
    }

    #[tokio::test]
    async fn trimmed_to_nothing_removes_session() {
        let store = InMemoryMessageStore::new().with_max_messages_per_session(Some(2));
        for text in ["a", "b", "c"] {
            store.append(&sid("replies"), MessageRecord::reply(text)).await;
        }

        // Only orphaned replies: trimming leaves nothing, so the session goes away.
        assert!(store.get("replies").await.is_empty());
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn concurrent_exchanges_stay_paired() {
        let store = Arc::new(InMemoryMessageStore::new());
        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .append_exchange(
                        &SessionId::new("shared").unwrap(),
                        MessageRecord::user(format!("q{i}")),
                        MessageRecord::reply(format!("a{i}")),
                    )
                    .await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let history = store.get("shared").await;
        assert_eq!(history.len(), 64);
        for pair in history.chunks(2) {
            assert!(pair[0].is_user && !pair[1].is_user);
            assert_eq!(pair[0].content[1..], pair[1].content[1..]);
        }
    }
}
