//! The preference evaluator: the per-recipient allow/deny decision behind
//! every notification. Pure over its inputs; loading the stored record is the
//! only store access and nothing is ever written back.

use crate::clock::Clock;
use crate::db::PreferenceStore;
use crate::db::notifications::Category;
use crate::db::preferences::{PreferenceRecord, QuietHours, Toggle};
use anyhow::{Context as _, Result};
use chrono::{DateTime, Utc};

/// Whether `user_id` may be notified for `category` right now, per their
/// stored preferences in `workspace_id`. A missing record means the default
/// record; it is substituted in memory, never persisted.
pub async fn should_notify(
    prefs: &dyn PreferenceStore,
    clock: &dyn Clock,
    user_id: &str,
    workspace_id: &str,
    channel_id: Option<&str>,
    category: Category,
) -> Result<bool> {
    let record = prefs
        .get_preferences(user_id, workspace_id)
        .await
        .context("loading notification preferences")?
        .unwrap_or_default();
    Ok(evaluate(&record, channel_id, category, clock.now()))
}

/// The pure decision over a concrete record and instant.
///
/// Order matters: quiet hours deny everything before any other check, then a
/// live channel mute denies, then the category rule runs. Only an explicit
/// channel `Enabled` override can allow against a global `false`.
pub fn evaluate(
    record: &PreferenceRecord,
    channel_id: Option<&str>,
    category: Category,
    now: DateTime<Utc>,
) -> bool {
    if record.global.quiet_hours.enabled && in_quiet_hours(&record.global.quiet_hours, now) {
        return false;
    }

    let channel = channel_id.and_then(|id| record.channel(id));

    if let Some(muted_until) = channel.and_then(|c| c.muted_until) {
        if muted_until > now {
            return false;
        }
    }

    match category {
        Category::Mention => match channel.map(|c| c.mentions).unwrap_or_default() {
            Toggle::Enabled => true,
            Toggle::Disabled => false,
            Toggle::Inherit => record.global.mentions,
        },
        // No channel concept applies to direct messages.
        Category::DirectMessage => record.global.direct_messages,
        // There is no global "all messages" switch; inheriting means off.
        Category::AllMessages => match channel.map(|c| c.all_messages).unwrap_or_default() {
            Toggle::Enabled => true,
            Toggle::Disabled => false,
            Toggle::Inherit => false,
        },
    }
}

/// `[start, end)` as wall-clock time in the record's timezone, wrapping
/// overnight when start > end. An equal start and end is an empty window.
fn in_quiet_hours(quiet: &QuietHours, now: DateTime<Utc>) -> bool {
    let local = now.with_timezone(&quiet.timezone).time();
    if quiet.start_time <= quiet.end_time {
        quiet.start_time <= local && local < quiet.end_time
    } else {
        local >= quiet.start_time || local < quiet.end_time
    }
}
