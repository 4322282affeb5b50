//! Canned replies chosen by keyword matching.
//!
//! A [`ReplySelector`] holds an ordered list of [`ReplyRule`]s. The first rule
//! with a keyword contained in the (lowercased) message wins; otherwise the
//! fallback reply is returned. Matching is plain substring containment, so
//! `"this"` matches the keyword `hi`.

use {chatterbox_config::AutoReplyConfig, tracing::warn};

/// One keyword rule. Keywords are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyRule {
    keywords: Vec<String>,
    reply: String,
}

impl ReplyRule {
    /// Build a rule. Empty keywords are discarded; returns `None` when none remain.
    pub fn new<I, S>(keywords: I, reply: impl Into<String>) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return None;
        }
        Some(Self {
            keywords,
            reply: reply.into(),
        })
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k.as_str()))
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn reply(&self) -> &str {
        &self.reply
    }
}

/// Ordered keyword rules with a fallback.
#[derive(Debug, Clone)]
pub struct ReplySelector {
    rules: Vec<ReplyRule>,
    fallback: String,
}

impl Default for ReplySelector {
    fn default() -> Self {
        Self::from_config(&AutoReplyConfig::default())
    }
}

impl ReplySelector {
    pub fn new(rules: Vec<ReplyRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Build from the `[auto_reply]` config section, skipping rules without
    /// usable keywords.
    pub fn from_config(config: &AutoReplyConfig) -> Self {
        let rules = config
            .rules
            .iter()
            .enumerate()
            .filter_map(|(idx, entry)| {
                let rule = ReplyRule::new(&entry.keywords, entry.reply.clone());
                if rule.is_none() {
                    warn!(rule = idx, "auto-reply rule has no keywords, skipping");
                }
                rule
            })
            .collect();
        Self::new(rules, config.fallback.clone())
    }

    /// Pick the reply for `message`. Never fails; unmatched input (including
    /// empty or whitespace-only text) gets the fallback.
    pub fn select_reply(&self, message: &str) -> &str {
        let lowered = message.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(self.fallback.as_str(), ReplyRule::reply)
    }

    pub fn rules(&self) -> &[ReplyRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }
}
