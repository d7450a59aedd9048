//! The `@username` grammar shared by message dispatch and the compose-time
//! autocomplete UI.
//!
//! A candidate mention is an `@` that is not preceded by a word character,
//! followed by a run starting with an ASCII letter and continuing with
//! letters, digits, `.`, `_` or `-`. Trailing sentence punctuation is
//! stripped from the run before validation, so `@mike.` mentions `mike`.
//! Email addresses never produce candidates: the `@` in `user@host` is
//! preceded by a word character.

use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Cleaned usernames shorter than this are discarded, silently.
pub const MIN_USERNAME_LEN: usize = 2;
/// Cleaned usernames longer than this are discarded, silently.
pub const MAX_USERNAME_LEN: usize = 50;

static CANDIDATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@([A-Za-z][A-Za-z0-9._-]*)").unwrap());

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]{1,49}$").unwrap());

/// Valid mentions in `text`, deduplicated, first occurrence order.
///
/// Malformed candidates (too short, too long) are dropped without error;
/// free-form message text is full of them.
pub fn extract_mentions(text: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut usernames = Vec::new();
    for (_, username) in candidates(text) {
        if seen.insert(username) {
            usernames.push(username);
        }
    }
    log::trace!("extracted mentions: {:?}", usernames);
    usernames
}

/// Replaces every valid `@username` occurrence with `render(username)`,
/// leaving malformed candidates (and everything else) byte-for-byte intact.
/// Punctuation stripped from the mention stays in the output: `@mike.`
/// becomes `render("mike")` followed by `.`.
pub fn render_mentions(text: &str, render: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    let mut copied_to = 0;
    for (at, username) in candidates(text) {
        out.push_str(&text[copied_to..at]);
        out.push_str(&render(username));
        copied_to = at + 1 + username.len();
    }
    out.push_str(&text[copied_to..]);
    out
}

/// Whether `candidate` is a well-formed username on its own: leading ASCII
/// letter, charset `[A-Za-z0-9._-]`, length 2 through 50.
pub fn is_valid_username(candidate: &str) -> bool {
    USERNAME_RE.is_match(candidate)
}

/// An in-progress mention under the cursor, reported by
/// [`find_mention_at_cursor`]. `start` is the byte index of the `@`, `end`
/// the cursor position, `partial` the (possibly empty) text between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CursorMention<'a> {
    pub start: usize,
    pub end: usize,
    pub partial: &'a str,
}

/// Finds the mention being typed at `cursor`, if any: the nearest `@` to the
/// left of the cursor with no whitespace in between.
///
/// Deliberately looser than [`extract_mentions`]: the partial may be empty
/// (cursor right after the `@`) and no minimum length applies, because the
/// caller is watching text that is still being typed. Only the leading-letter
/// and charset rules are enforced. Out-of-range cursors (including positions
/// that are not character boundaries) yield `None`.
pub fn find_mention_at_cursor(text: &str, cursor: usize) -> Option<CursorMention<'_>> {
    if text.is_empty() {
        return None;
    }
    let head = text.get(..cursor)?;
    for (idx, ch) in head.char_indices().rev() {
        if ch == '@' {
            let partial = &head[idx + 1..];
            if !is_partial_username(partial) {
                return None;
            }
            return Some(CursorMention {
                start: idx,
                end: cursor,
                partial,
            });
        }
        if ch.is_whitespace() {
            return None;
        }
    }
    None
}

/// Valid candidate mentions as `(byte index of the '@', cleaned username)`.
///
/// The "not preceded by a word character" rule is checked by hand on the byte
/// before each match rather than in the pattern: consuming the preceding
/// character there would swallow the separator between back-to-back mentions
/// like `@john.@sarah` and hide the second one.
fn candidates(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    CANDIDATE_RE.captures_iter(text).filter_map(|caps| {
        let run = caps.get(1).unwrap();
        // '@' is a single byte, so the byte before it is a full character
        // whenever it is ASCII; anything non-ASCII is not a word character.
        let at = run.start() - 1;
        if at > 0 && is_word_byte(text.as_bytes()[at - 1]) {
            return None;
        }
        let username = run
            .as_str()
            .trim_end_matches(['.', ',', '!', '?', ';', ':']);
        if (MIN_USERNAME_LEN..=MAX_USERNAME_LEN).contains(&username.len()) {
            Some((at, username))
        } else {
            None
        }
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_partial_username(partial: &str) -> bool {
    let mut chars = partial.chars();
    match chars.next() {
        None => true,
        Some(first) if !first.is_ascii_alphabetic() => false,
        Some(_) => chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')),
    }
}
