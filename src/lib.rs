//! Mention detection, notification fan-out, and preference enforcement for a
//! team-chat message pipeline.
//!
//! The engine consumes a newly created message's raw text plus the workspace
//! membership list, and produces notification records — one per mentioned
//! member whose layered preferences (global → channel override → mute window
//! → quiet hours) allow it. Storage, authentication, and delivery transport
//! are external collaborators, reached through the traits in [`db`] and
//! [`directory`].
//!
//! The `@username` grammar itself lives in the `mentions` crate and is
//! re-exported here for callers that only need text-level operations.

pub mod clock;
pub mod db;
pub mod directory;
pub mod dispatch;
pub mod logger;
pub mod prefs;
pub mod resolver;

pub use mentions::{
    CursorMention, extract_mentions, find_mention_at_cursor, is_valid_username, render_mentions,
};
