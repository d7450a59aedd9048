use anyhow::Result;
use std::collections::HashMap;

pub mod mem;
pub mod notifications;
pub mod preferences;

use notifications::Notification;
use preferences::{ChannelPreferenceUpdate, GlobalPreferencesUpdate, PreferenceRecord};

/// Persistence for notification records, an external collaborator. The
/// engine only ever inserts and marks read; deletion, if any, belongs to the
/// store's own lifecycle.
#[async_trait::async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persists one record and returns its id.
    async fn insert_notification(&self, notification: Notification) -> Result<String>;

    /// A user's notifications, newest first, at most `limit`.
    async fn list_notifications(&self, user_id: &str, limit: usize) -> Result<Vec<Notification>>;

    /// Unread counts per channel within one workspace. Conversation-targeted
    /// notifications are not included.
    async fn count_unread_by_channel(
        &self,
        user_id: &str,
        workspace_id: &str,
    ) -> Result<HashMap<String, u64>>;

    /// Sets `read = true`. Monotonic: a read notification never reverts, and
    /// marking it again is a no-op.
    async fn mark_read(&self, notification_id: &str) -> Result<()>;
}

/// Persistence for per-(user, workspace) notification preferences.
///
/// Records are created lazily on first write. Updates are field-level merges
/// so concurrent writes to unrelated fields cannot clobber each other; the
/// channel list is upserted keyed by channel id, keeping at most one entry
/// per channel.
#[async_trait::async_trait]
pub trait PreferenceStore: Send + Sync {
    /// `None` when the user has never written preferences in this workspace.
    /// Readers substitute [`PreferenceRecord::default`]; a read must never
    /// persist anything.
    async fn get_preferences(
        &self,
        user_id: &str,
        workspace_id: &str,
    ) -> Result<Option<PreferenceRecord>>;

    async fn upsert_global_preferences(
        &self,
        user_id: &str,
        workspace_id: &str,
        update: GlobalPreferencesUpdate,
    ) -> Result<()>;

    async fn upsert_channel_preference(
        &self,
        user_id: &str,
        workspace_id: &str,
        channel_id: &str,
        update: ChannelPreferenceUpdate,
    ) -> Result<()>;
}
