use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// `[edit]`, `[12]` and `[citation needed]` residue left by pruned markup.
static MARKERS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[edit\]|\[\d+\]|\[citation needed\]").unwrap());

/// Collapse every whitespace run to a single space
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").into_owned()
}

/// Remove edit and citation markers, then trim
///
/// Repeats until stable: removing `[1]` from `[[1]2]` leaves a fresh `[2]`.
pub fn strip_markers(text: &str) -> String {
    let mut current = text.to_string();
    while let Cow::Owned(next) = MARKERS.replace_all(&current, "") {
        current = next;
    }
    current.trim().to_string()
}

/// Normalize a text-only run: collapse whitespace, strip markers, escape
///
/// Used for headings, quotes and definition terms, whose nested markup is
/// discarded.
pub fn clean_text(text: &str) -> String {
    let collapsed = collapse_whitespace(text);
    escape_text(&strip_markers(&collapsed))
}

/// Escape text for element content
pub fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

/// Escape text for a double-quoted attribute value
pub fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}
