//! Config schema types (server, sessions, auto_reply).
use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatterboxConfig {
    pub server: ServerConfig,
    pub sessions: SessionsConfig,
    pub auto_reply: AutoReplyConfig,
}

/// HTTP listener settings. Binds all interfaces by default so the widget can
/// reach the server from other hosts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".into(),
            port: 3000,
        }
    }
}

/// Message store settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionsConfig {
    /// Upper bound on stored records per session. Unset means unbounded;
    /// values below 2 are raised to 2 by the store.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_messages_per_session: Option<usize>,
}

/// Canned reply rules, evaluated in order. First match wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoReplyConfig {
    pub rules: Vec<ReplyRuleEntry>,
    /// Reply used when no rule matches.
    pub fallback: String,
}

/// A single keyword rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyRuleEntry {
    /// Any of these, found anywhere in the message (case-insensitive), selects `reply`.
    pub keywords: Vec<String>,
    pub reply: String,
}

impl ReplyRuleEntry {
    fn new(keywords: &[&str], reply: &str) -> Self {
        Self {
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            reply: reply.to_string(),
        }
    }
}

impl Default for AutoReplyConfig {
    fn default() -> Self {
        Self {
            rules: vec![
                ReplyRuleEntry::new(
                    &["hello", "hi"],
                    "Hello! Welcome to our chat. How can I assist you today?",
                ),
                ReplyRuleEntry::new(
                    &["help"],
                    "I'm here to help! What do you need assistance with?",
                ),
                ReplyRuleEntry::new(
                    &["price"],
                    "I'd be happy to help with pricing. Let me connect you with our sales team.",
                ),
            ],
            fallback: "Thanks for your message! How can I help you?".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let cfg: ChatterboxConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0");
        assert_eq!(cfg.server.port, 3000);
        assert!(cfg.sessions.max_messages_per_session.is_none());
        assert_eq!(cfg.auto_reply.rules.len(), 3);
        assert_eq!(cfg.auto_reply.rules[0].keywords, ["hello", "hi"]);
    }

    #[test]
    fn partial_auto_reply_keeps_default_rules() {
        let cfg: ChatterboxConfig = toml::from_str(
            r#"
            [auto_reply]
            fallback = "We'll get back to you."
            "#,
        )
        .unwrap();
        assert_eq!(cfg.auto_reply.fallback, "We'll get back to you.");
        assert_eq!(cfg.auto_reply.rules, AutoReplyConfig::default().rules);
    }

    #[test]
    fn rules_can_be_replaced() {
        let cfg: ChatterboxConfig = toml::from_str(
            r#"
            [[auto_reply.rules]]
            keywords = ["refund"]
            reply = "Refunds take 5 days."
            "#,
        )
        .unwrap();
        assert_eq!(cfg.auto_reply.rules.len(), 1);
        assert_eq!(cfg.auto_reply.rules[0].reply, "Refunds take 5 days.");
        // Fallback still comes from the defaults.
        assert_eq!(
            cfg.auto_reply.fallback,
            "Thanks for your message! How can I help you?"
        );
    }
}
