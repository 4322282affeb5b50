use {
    chrono::{SecondsFormat, Utc},
    serde::{Deserialize, Serialize},
};

/// One stored chat line, either sent by the visitor or generated as a reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    pub id: String,
    pub content: String,
    pub is_user: bool,
    /// ISO-8601 UTC with millisecond precision, e.g. `2026-10-18T09:30:00.000Z`.
    pub timestamp: String,
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl MessageRecord {
    fn new(content: impl Into<String>, is_user: bool) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            is_user,
            timestamp: now_iso(),
        }
    }

    /// A record for an inbound visitor message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, true)
    }

    /// A record for a generated reply.
    pub fn reply(content: impl Into<String>) -> Self {
        Self::new(content, false)
    }
}
