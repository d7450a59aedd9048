//! Turns extracted mention usernames into workspace members, and backs the
//! compose-time member autocomplete.

use crate::directory::{Member, MembershipDirectory};
use anyhow::{Context as _, Result};
use std::collections::HashSet;
use tracing as log;

pub const DEFAULT_SEARCH_LIMIT: usize = 10;

// Bounds autocomplete query cost: terms shorter than this return nothing
// instead of scanning the membership on every keystroke.
const MIN_SEARCH_TERM_LEN: usize = 2;

/// Resolves mention usernames to members of `workspace_id`.
///
/// A mention matches a member whose derived handle equals it,
/// case-insensitively (handles are ASCII by the mention grammar). When
/// several members share a handle the first in membership iteration order
/// wins; the collision is logged since it means someone else stays silent.
/// Unmatched usernames are skipped. Results are deduplicated by user id, so
/// two casings of one handle still yield one recipient. An unknown workspace
/// resolves to nothing rather than an error.
pub async fn resolve_mentions(
    directory: &dyn MembershipDirectory,
    workspace_id: &str,
    usernames: &[&str],
) -> Result<Vec<Member>> {
    if usernames.is_empty() {
        return Ok(Vec::new());
    }
    let members = directory
        .list_members(workspace_id)
        .await
        .context("listing workspace members")?;

    let mut seen = HashSet::new();
    let mut recipients = Vec::new();
    for username in usernames {
        let mut matches = members
            .iter()
            .filter(|m| m.handle.eq_ignore_ascii_case(username));
        let Some(member) = matches.next() else {
            continue;
        };
        if matches.next().is_some() {
            log::warn!(
                "handle {:?} is ambiguous in workspace {}; notifying the first match only",
                username,
                workspace_id
            );
        }
        if seen.insert(member.user_id.clone()) {
            recipients.push(member.clone());
        }
    }
    Ok(recipients)
}

/// Substring member search for the mention autocomplete dropdown.
///
/// Matches `term` (trimmed, case-insensitive) against display names and
/// handles, returning up to `limit` members (default 10) in iteration order.
/// Non-members and unknown workspaces get an empty list, not an error, so the
/// search leaks no membership information.
pub async fn search_members(
    directory: &dyn MembershipDirectory,
    caller_user_id: &str,
    workspace_id: &str,
    term: &str,
    limit: Option<usize>,
) -> Result<Vec<Member>> {
    let term = term.trim();
    if term.len() < MIN_SEARCH_TERM_LEN {
        return Ok(Vec::new());
    }
    if !directory
        .is_member(workspace_id, caller_user_id)
        .await
        .context("checking caller membership")?
    {
        return Ok(Vec::new());
    }

    let needle = term.to_lowercase();
    let limit = limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    let members = directory
        .list_members(workspace_id)
        .await
        .context("listing workspace members")?;
    Ok(members
        .into_iter()
        .filter(|m| {
            m.display_name.to_lowercase().contains(&needle)
                || m.handle.to_lowercase().contains(&needle)
        })
        .take(limit)
        .collect())
}
