use std::{borrow::Borrow, fmt};

/// Opaque, client-generated session identifier.
///
/// The server never interprets it; the only rule is that it must be present
/// and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    /// Wrap a raw identifier. Returns `None` for an empty string.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return None;
        }
        Some(Self(raw))
    }

    /// Accept an optional identifier straight from a request body.
    pub fn from_request(raw: Option<String>) -> Option<Self> {
        raw.and_then(Self::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for SessionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}
