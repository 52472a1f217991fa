//! Ordered text passes applied to one bullet line. Each pass assumes the ones
//! before it already ran; `super::clean_event_line` is the only place that
//! composes them.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::wiki::Month;

/// Cleaned text shorter than this is discarded as a fragment.
pub const MIN_EVENT_LEN: usize = 8;

const ELLIPSIS: &str = "...";

static DATE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    let months = Month::ALL.map(|m| m.name()).join("|");
    Regex::new(&format!(
        r"(?i)^(?:\[\[)?({months})\s+(\d{{1,2}})(?:\]\])?\s*[–—-]\s*"
    ))
    .unwrap()
});
static REF_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<ref[^>]*>.*?</ref>").unwrap());
static REF_SELF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<ref[^/>]*/>").unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static FILE_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\[\[(?:File|Image):[^\]]+\]\]").unwrap());
static TEMPLATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{[^}]+\}\}").unwrap());
static WIKI_LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());
static EMPHASIS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"''+").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Link namespaces that carry no readable text.
const HIDDEN_NAMESPACES: &[&str] = &["category:", "help:", "portal:", "special:"];

/// Pass 1: accept only `*` bullet lines, returning the text after the markers.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    if !trimmed.starts_with('*') {
        return None;
    }
    Some(trimmed.trim_start_matches('*').trim())
}

/// Pass 2: split a leading `[[January 5]] –` off the text.
///
/// Returns the display prefix (`"Jan 5 - "`) when one matched, and the rest of
/// the line with the matched text removed either way.
pub fn split_date_prefix(text: &str) -> (Option<String>, &str) {
    let Some(caps) = DATE_PREFIX_RE.captures(text) else {
        return (None, text);
    };
    let month = short_month(&caps[1]);
    let day = &caps[2];
    let rest = text[caps[0].len()..].trim();
    (Some(format!("{} {} - ", month, day)), rest)
}

/// "jANUARY" → "Jan"
fn short_month(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    first
        .to_uppercase()
        .chain(chars.flat_map(char::to_lowercase))
        .take(3)
        .collect()
}

/// Pass 3: drop references, comments, HTML, file embeds and templates.
pub fn strip_markup(text: &str) -> String {
    let text = REF_TAG_RE.replace_all(text, "");
    let text = REF_SELF_RE.replace_all(&text, "");
    let text = COMMENT_RE.replace_all(&text, "");
    let text = HTML_TAG_RE.replace_all(&text, "");
    let text = FILE_LINK_RE.replace_all(&text, "");
    TEMPLATE_RE.replace_all(&text, "").into_owned()
}

/// Pass 4: replace `[[target|label]]` with its label, `[[target]]` with its target.
pub fn resolve_links(text: &str) -> String {
    WIKI_LINK_RE
        .replace_all(text, |caps: &Captures| link_display_text(&caps[1]).to_string())
        .into_owned()
}

fn link_display_text(inner: &str) -> &str {
    let inner = inner.trim();
    let lowered = inner.to_lowercase();
    if HIDDEN_NAMESPACES.iter().any(|ns| lowered.starts_with(ns)) {
        return "";
    }
    match inner.rsplit_once('|') {
        Some((_, label)) => label.trim(),
        None => inner,
    }
}

/// Pass 5: remove `''italic''` / `'''bold'''` quote runs.
pub fn strip_emphasis(text: &str) -> String {
    EMPHASIS_RE.replace_all(text, "").into_owned()
}

/// Pass 6: plain hyphens, single spaces, no leading/trailing spaces or hyphens.
pub fn normalize_spacing(text: &str) -> String {
    let dashed = text.replace(['–', '—'], "-");
    WHITESPACE_RE
        .replace_all(&dashed, " ")
        .trim_matches(|c| c == ' ' || c == '-')
        .to_string()
}

/// Pass 7: reject empty and near-empty fragments.
pub fn is_substantial(text: &str) -> bool {
    text.chars().count() >= MIN_EVENT_LEN
}

/// Pass 8: re-attach the date prefix and cap the result at `max_len` chars.
pub fn attach_and_truncate(prefix: Option<&str>, body: &str, max_len: usize) -> String {
    let joined = format!("{}{}", prefix.unwrap_or(""), body);
    let joined = joined.trim();
    let max_len = max_len.max(MIN_EVENT_LEN);

    if joined.chars().count() <= max_len {
        return joined.to_string();
    }

    let keep = max_len - ELLIPSIS.len();
    let cut: String = joined.chars().take(keep).collect();
    format!("{}{}", cut.trim_end(), ELLIPSIS)
}

// ── Tests ──
