use std::{sync::Arc, time::Instant};

use {
    chatterbox_auto_reply::ReplySelector,
    chatterbox_config::ChatterboxConfig,
    chatterbox_sessions::{InMemoryMessageStore, MessageStore},
};

// ── Gateway state ────────────────────────────────────────────────────────────

/// Shared gateway runtime state, wrapped in Arc and handed to every handler.
pub struct GatewayState {
    /// Per-session message history.
    pub store: Arc<dyn MessageStore>,
    /// Keyword rules used to answer inbound messages.
    pub replies: ReplySelector,
    /// Server version string.
    pub version: String,
    pub started_at: Instant,
}

impl GatewayState {
    pub fn new(store: Arc<dyn MessageStore>, replies: ReplySelector) -> Arc<Self> {
        Arc::new(Self {
            store,
            replies,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: Instant::now(),
        })
    }

    /// Build state with an in-memory store and the configured reply rules.
    pub fn from_config(config: &ChatterboxConfig) -> Arc<Self> {
        let store = InMemoryMessageStore::new()
            .with_max_messages_per_session(config.sessions.max_messages_per_session);
        Self::new(
            Arc::new(store),
            ReplySelector::from_config(&config.auto_reply),
        )
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}
