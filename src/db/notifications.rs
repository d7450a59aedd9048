use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a message (and the notifications it produces) lives: exactly one
/// channel or one direct-message conversation, never both, never neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationTarget {
    Channel(String),
    Conversation(String),
}

impl NotificationTarget {
    /// The channel id, when the target is a channel. Preference evaluation
    /// uses this: channel overrides and mutes never apply to conversations.
    pub fn channel_id(&self) -> Option<&str> {
        match self {
            NotificationTarget::Channel(id) => Some(id),
            NotificationTarget::Conversation(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Mention,
    DirectMessage,
    AllMessages,
}

/// One persisted notification. Created unread by the dispatcher; the only
/// mutation afterwards is the read mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub recipient_user_id: String,
    pub source_message_id: String,
    pub workspace_id: String,
    #[serde(flatten)]
    pub target: NotificationTarget,
    pub category: Category,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_user_id: impl Into<String>,
        source_message_id: impl Into<String>,
        workspace_id: impl Into<String>,
        target: NotificationTarget,
        category: Category,
        created_at: DateTime<Utc>,
    ) -> Self {
        Notification {
            id: uuid::Uuid::new_v4().to_string(),
            recipient_user_id: recipient_user_id.into(),
            source_message_id: source_message_id.into(),
            workspace_id: workspace_id.into(),
            target,
            category,
            read: false,
            created_at,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn serializes_exactly_one_target_field() {
        let n = Notification::new(
            "u1",
            "m1",
            "w1",
            NotificationTarget::Channel("c1".into()),
            Category::Mention,
            Utc::now(),
        );
        let json = serde_json::to_value(&n).unwrap();
        assert_eq!(json["channel"], "c1");
        assert!(json.get("conversation").is_none());
        assert_eq!(json["category"], "mention");
        assert_eq!(json["read"], false);
    }
}
