use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences: `ESC [`, parameter bytes, intermediate bytes, one final byte.
static ANSI_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]").expect("valid regex"));

/// Remove every ANSI CSI escape sequence from `s`.
pub fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    ANSI_ESCAPE.replace_all(s, "")
}

/// Compute the visible length of a string by stripping ANSI escape sequences.
/// Counts Unicode characters (not bytes); combining marks count as one column.
pub fn visible_width(s: &str) -> usize {
    strip_ansi(s).chars().count()
}

/// Keep the last `keep` characters of `s`, prefixed with `...`, when `s` is
/// longer than `max`. Operates on plain (unstyled) text.
pub fn ellipsize_left(s: &str, max: usize, keep: usize) -> String {
    let len = s.chars().count();
    if len <= max {
        return s.to_string();
    }
    let tail: String = s.chars().skip(len.saturating_sub(keep)).collect();
    format!("...{tail}")
}
