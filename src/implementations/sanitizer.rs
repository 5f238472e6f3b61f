//! Label sanitization for text embedded in Mermaid sources

use regex::Regex;
use std::sync::OnceLock;

/// Longest label emitted, ellipsis included
pub const MAX_LABEL_CHARS: usize = 30;

/// Appended when a label is cut short
pub const ELLIPSIS: &str = "...";

/// Used when nothing printable survives
pub const EMPTY_LABEL: &str = "condition";

fn disallowed_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s\-.]").expect("valid sanitizer pattern"))
}

fn whitespace_runs() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace pattern"))
}

/// Normalize a phrase for use as a node or edge label.
///
/// The result contains only word characters, single spaces, `-` and `.`,
/// is at most [`MAX_LABEL_CHARS`] long and is never empty. Applying it to
/// its own output returns the same string.
pub fn sanitize(text: &str) -> String {
    let text = text.replace('"', "'").replace(['\r', '\n'], " ");
    let text = disallowed_chars().replace_all(&text, "");
    let text = whitespace_runs().replace_all(&text, " ");
    let text = truncate(text.trim());

    if text.is_empty() {
        EMPTY_LABEL.to_string()
    } else {
        text
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_LABEL_CHARS {
        return text.to_string();
    }

    let keep = MAX_LABEL_CHARS - ELLIPSIS.chars().count();
    let head: String = text.chars().take(keep).collect();
    format!("{}{}", head.trim_end(), ELLIPSIS)
}

/// Upper-case the first letter of every alphabetic run, lower-case the rest
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
