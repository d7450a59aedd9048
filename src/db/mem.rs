//! In-memory store backend. Persistence engines are external to this core;
//! this backend gives tests and embedders a complete implementation of the
//! store traits with the contractual merge semantics.

use super::notifications::Notification;
use super::preferences::{
    ChannelPreference, ChannelPreferenceUpdate, GlobalPreferencesUpdate, PreferenceRecord,
};
use super::{NotificationStore, PreferenceStore};
use anyhow::{Result, bail};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct MemoryStore {
    notifications: Mutex<Vec<Notification>>,
    // Keyed by (user id, workspace id).
    preferences: Mutex<HashMap<(String, String), PreferenceRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl NotificationStore for MemoryStore {
    async fn insert_notification(&self, notification: Notification) -> Result<String> {
        let id = notification.id.clone();
        self.notifications.lock().unwrap().push(notification);
        Ok(id)
    }

    async fn list_notifications(&self, user_id: &str, limit: usize) -> Result<Vec<Notification>> {
        let notifications = self.notifications.lock().unwrap();
        let mut rows: Vec<_> = notifications
            .iter()
            .filter(|n| n.recipient_user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn count_unread_by_channel(
        &self,
        user_id: &str,
        workspace_id: &str,
    ) -> Result<HashMap<String, u64>> {
        let notifications = self.notifications.lock().unwrap();
        let mut counts = HashMap::new();
        for n in notifications.iter() {
            if n.read || n.recipient_user_id != user_id || n.workspace_id != workspace_id {
                continue;
            }
            if let Some(channel_id) = n.target.channel_id() {
                *counts.entry(channel_id.to_owned()).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn mark_read(&self, notification_id: &str) -> Result<()> {
        let mut notifications = self.notifications.lock().unwrap();
        match notifications.iter_mut().find(|n| n.id == notification_id) {
            Some(n) => {
                n.read = true;
                Ok(())
            }
            None => bail!("unknown notification {notification_id}"),
        }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for MemoryStore {
    async fn get_preferences(
        &self,
        user_id: &str,
        workspace_id: &str,
    ) -> Result<Option<PreferenceRecord>> {
        let preferences = self.preferences.lock().unwrap();
        Ok(preferences
            .get(&(user_id.to_owned(), workspace_id.to_owned()))
            .cloned())
    }

    async fn upsert_global_preferences(
        &self,
        user_id: &str,
        workspace_id: &str,
        update: GlobalPreferencesUpdate,
    ) -> Result<()> {
        let mut preferences = self.preferences.lock().unwrap();
        let record = preferences
            .entry((user_id.to_owned(), workspace_id.to_owned()))
            .or_default();
        update.apply(&mut record.global);
        Ok(())
    }

    async fn upsert_channel_preference(
        &self,
        user_id: &str,
        workspace_id: &str,
        channel_id: &str,
        update: ChannelPreferenceUpdate,
    ) -> Result<()> {
        let mut preferences = self.preferences.lock().unwrap();
        let record = preferences
            .entry((user_id.to_owned(), workspace_id.to_owned()))
            .or_default();
        let pref = match record
            .channels
            .iter_mut()
            .find(|c| c.channel_id == channel_id)
        {
            Some(existing) => existing,
            None => {
                record.channels.push(ChannelPreference::inherit(channel_id));
                record.channels.last_mut().unwrap()
            }
        };
        update.apply(pref);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::super::notifications::{Category, NotificationTarget};
    use super::super::preferences::Toggle;
    use super::*;
    use chrono::{TimeZone, Utc};

    fn channel_notification(user: &str, message: &str, minute: u32) -> Notification {
        Notification::new(
            user,
            message,
            "w1",
            NotificationTarget::Channel("c1".into()),
            Category::Mention,
            Utc.with_ymd_and_hms(2026, 3, 1, 12, minute, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_limited() {
        let store = MemoryStore::new();
        for minute in 0..5 {
            store
                .insert_notification(channel_notification("u1", &format!("m{minute}"), minute))
                .await
                .unwrap();
        }
        let rows = store.list_notifications("u1", 3).await.unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].source_message_id, "m4");
        assert_eq!(rows[2].source_message_id, "m2");
        assert!(store.list_notifications("u2", 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn mark_read_is_monotonic_and_counted() {
        let store = MemoryStore::new();
        let id = store
            .insert_notification(channel_notification("u1", "m1", 0))
            .await
            .unwrap();
        store
            .insert_notification(channel_notification("u1", "m2", 1))
            .await
            .unwrap();

        let counts = store.count_unread_by_channel("u1", "w1").await.unwrap();
        assert_eq!(counts.get("c1"), Some(&2));

        store.mark_read(&id).await.unwrap();
        // Marking twice changes nothing.
        store.mark_read(&id).await.unwrap();
        let counts = store.count_unread_by_channel("u1", "w1").await.unwrap();
        assert_eq!(counts.get("c1"), Some(&1));

        assert!(store.mark_read("nope").await.is_err());
    }

    #[tokio::test]
    async fn conversation_notifications_have_no_channel_count() {
        let store = MemoryStore::new();
        let n = Notification::new(
            "u1",
            "m1",
            "w1",
            NotificationTarget::Conversation("dm1".into()),
            Category::DirectMessage,
            Utc::now(),
        );
        store.insert_notification(n).await.unwrap();
        assert!(
            store
                .count_unread_by_channel("u1", "w1")
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn global_upsert_merges_fields() {
        let store = MemoryStore::new();
        assert_eq!(store.get_preferences("u1", "w1").await.unwrap(), None);

        store
            .upsert_global_preferences(
                "u1",
                "w1",
                GlobalPreferencesUpdate {
                    mentions: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .upsert_global_preferences(
                "u1",
                "w1",
                GlobalPreferencesUpdate {
                    direct_messages: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let record = store.get_preferences("u1", "w1").await.unwrap().unwrap();
        // The second write did not clobber the first.
        assert!(!record.global.mentions);
        assert!(!record.global.direct_messages);
    }

    #[tokio::test]
    async fn channel_upsert_is_keyed_by_channel_id() {
        let store = MemoryStore::new();
        store
            .upsert_channel_preference(
                "u1",
                "w1",
                "c1",
                ChannelPreferenceUpdate {
                    mentions: Some(Toggle::Disabled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .upsert_channel_preference(
                "u1",
                "w1",
                "c1",
                ChannelPreferenceUpdate {
                    all_messages: Some(Toggle::Enabled),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        store
            .upsert_channel_preference(
                "u1",
                "w1",
                "c2",
                ChannelPreferenceUpdate {
                    muted_until: Some(Some(Utc::now())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let record = store.get_preferences("u1", "w1").await.unwrap().unwrap();
        assert_eq!(record.channels.len(), 2);
        let c1 = record.channel("c1").unwrap();
        assert_eq!(c1.mentions, Toggle::Disabled);
        assert_eq!(c1.all_messages, Toggle::Enabled);
        assert!(record.channel("c2").unwrap().muted_until.is_some());
    }
}
