//! Chat message types produced at the transport boundary.
//!
//! The transport (IRC, WebSocket, whatever the host wires up) is expected to
//! call [`ChatMessage::from_transport`] with whatever fields it managed to
//! parse; missing or empty fields are normalized to safe defaults so the
//! pipeline never sees a malformed message. Self-originated messages are the
//! transport's responsibility to suppress before they reach the assistant.

use chrono::{DateTime, Utc};

/// Role flags attached to a chat author.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Badges {
    pub subscriber: bool,
    pub vip: bool,
    pub moderator: bool,
    pub broadcaster: bool,
}

impl Badges {
    /// Whether the author holds any elevated role.
    #[must_use]
    pub fn any_elevated(&self) -> bool {
        self.subscriber || self.vip || self.moderator || self.broadcaster
    }
}

/// A single inbound chat message, immutable once created.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    /// Unique message identifier.
    pub id: String,
    /// Display name of the author.
    pub author: String,
    /// Raw message text, trimmed.
    pub text: String,
    /// Wall-clock arrival time.
    pub timestamp: DateTime<Utc>,
    /// Author role flags.
    pub badges: Badges,
}

impl ChatMessage {
    /// Normalizing constructor for the transport boundary.
    ///
    /// A missing or empty id gets a generated UUID, a missing author becomes
    /// `"Unknown"`, and the text is trimmed.
    #[must_use]
    pub fn from_transport(
        id: Option<String>,
        author: Option<String>,
        text: &str,
        badges: Badges,
    ) -> Self {
        Self {
            id: id
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            author: author
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "Unknown".to_owned()),
            text: text.trim().to_owned(),
            timestamp: Utc::now(),
            badges,
        }
    }

    /// Convenience constructor for tests and simple transports.
    #[must_use]
    pub fn new(author: &str, text: &str) -> Self {
        Self::from_transport(None, Some(author.to_owned()), text, Badges::default())
    }

    /// Like [`ChatMessage::new`] but with explicit role flags.
    #[must_use]
    pub fn with_badges(author: &str, text: &str, badges: Badges) -> Self {
        Self::from_transport(None, Some(author.to_owned()), text, badges)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn missing_fields_are_normalized() {
        let message = ChatMessage::from_transport(None, None, "  hola  ", Badges::default());
        assert!(!message.id.is_empty());
        assert_eq!(message.author, "Unknown");
        assert_eq!(message.text, "hola");
    }

    #[test]
    fn empty_id_is_replaced() {
        let a = ChatMessage::from_transport(Some(String::new()), None, "x", Badges::default());
        let b = ChatMessage::from_transport(Some(String::new()), None, "x", Badges::default());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn provided_fields_are_kept() {
        let message = ChatMessage::from_transport(
            Some("abc123".into()),
            Some("viewer".into()),
            "hola",
            Badges {
                vip: true,
                ..Badges::default()
            },
        );
        assert_eq!(message.id, "abc123");
        assert_eq!(message.author, "viewer");
        assert!(message.badges.any_elevated());
    }

    #[test]
    fn default_badges_are_not_elevated() {
        assert!(!Badges::default().any_elevated());
    }
}
