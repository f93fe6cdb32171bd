//! Shared value types for the conversation log.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Timestamp
// =============================================================================

/// Milliseconds since the Unix epoch.
///
/// Compared by value. Two Timestamps with the same inner value are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(Utc::now().timestamp_millis())
    }
}

/// Format a local time the way a `en-US` clock reads it: `h:mm:ss AM`.
pub fn format_time_of_day(dt: &DateTime<Local>) -> String {
    dt.format("%-I:%M:%S %p").to_string()
}

// =============================================================================
// Message identity
// =============================================================================

/// Unique, generation-ordered message identifier.
///
/// Ids handed out by one [`MessageIdGenerator`] are strictly increasing, so
/// sorting by id reproduces append order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Monotonic source of [`MessageId`] values.
#[derive(Debug, Default)]
pub struct MessageIdGenerator {
    next: AtomicU64,
}

impl MessageIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> MessageId {
        MessageId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

// =============================================================================
// Messages
// =============================================================================

/// Who authored a message in the conversation log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
            MessageRole::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for MessageRole {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            "system" => Ok(MessageRole::System),
            _ => Err(format!("Unknown message role: {}", s)),
        }
    }
}

/// One immutable entry in the conversation log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: MessageRole,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ChatMessage {
    pub fn new(id: MessageId, role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id,
            role,
            text: text.into(),
            timestamp: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_format_time_of_day() {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 4)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();
        let dt = Local.from_local_datetime(&naive).single().unwrap();
        assert_eq!(format_time_of_day(&dt), "3:04:05 PM");
    }

    #[test]
    fn test_message_ids_are_strictly_increasing() {
        let ids = MessageIdGenerator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
        assert_eq!(a, MessageId(0));
    }

    #[test]
    fn test_message_id_display() {
        assert_eq!(MessageId(42).to_string(), "msg-42");
    }

    #[test]
    fn test_message_role_display_and_parse() {
        for role in [MessageRole::User, MessageRole::Assistant, MessageRole::System] {
            let parsed: MessageRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
        assert!("jarvis".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_chat_message_serializes_snake_case_role() {
        let msg = ChatMessage::new(MessageId(1), MessageRole::Assistant, "hello");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"assistant\""));
        let back: ChatMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back, msg);
    }
}
