//! Fan-out for newly created messages: extract mentions, resolve them,
//! apply each recipient's preferences, and persist the allowed notifications.

use crate::clock::Clock;
use crate::db::notifications::{Category, Notification, NotificationTarget};
use crate::db::{NotificationStore, PreferenceStore};
use crate::directory::{Member, MembershipDirectory};
use crate::{prefs, resolver};
use anyhow::{Context as _, Result};
use std::sync::Arc;
use tracing as log;

/// The collaborators the dispatcher works against.
pub struct Context {
    pub directory: Arc<dyn MembershipDirectory>,
    pub prefs: Arc<dyn PreferenceStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub clock: Arc<dyn Clock>,
}

/// A newly created message, as handed over by the message source.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub body: Option<String>,
    pub workspace_id: String,
    /// The channel or conversation the message was posted to.
    pub target: NotificationTarget,
    pub author_user_id: String,
}

/// Invoked once per created message. Inserts one mention notification per
/// resolved recipient whose preferences allow it, excluding the author.
///
/// Messages without mentions (the overwhelmingly common case) return after a
/// single text scan, touching no store. Per-recipient failures are logged and
/// never abort the remaining recipients; only failures before the
/// per-recipient loop (membership lookup) fail the call.
pub async fn on_message_created(ctx: &Context, message: &Message) -> Result<()> {
    let body = message.body.as_deref().unwrap_or("");
    let usernames = mentions::extract_mentions(body);
    if usernames.is_empty() {
        return Ok(());
    }
    log::trace!("message {} mentions {:?}", message.id, usernames);

    let recipients = resolver::resolve_mentions(
        ctx.directory.as_ref(),
        &message.workspace_id,
        &usernames,
    )
    .await
    .context("resolving mentioned usernames")?;

    for recipient in recipients {
        if recipient.user_id == message.author_user_id {
            // Authors know what they wrote.
            continue;
        }
        if let Err(err) = notify_recipient(ctx, message, &recipient).await {
            log::error!(
                "failed to notify {} for message {}: {:?}",
                recipient.user_id,
                message.id,
                err
            );
        }
    }
    Ok(())
}

async fn notify_recipient(ctx: &Context, message: &Message, recipient: &Member) -> Result<()> {
    let allowed = prefs::should_notify(
        ctx.prefs.as_ref(),
        ctx.clock.as_ref(),
        &recipient.user_id,
        &message.workspace_id,
        message.target.channel_id(),
        Category::Mention,
    )
    .await?;
    if !allowed {
        return Ok(());
    }

    let notification = Notification::new(
        &recipient.user_id,
        &message.id,
        &message.workspace_id,
        message.target.clone(),
        Category::Mention,
        ctx.clock.now(),
    );
    ctx.notifications
        .insert_notification(notification)
        .await
        .context("inserting mention notification")?;
    Ok(())
}
