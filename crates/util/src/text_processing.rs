//! Ordering-hint parsing for content-type labels.
//!
//! Display names may carry a bracketed integer prefix that forces an
//! explicit sort position, e.g. `"[2] Blog | Post"`. The normalizer
//! consumes the hint; the host label cleaner strips it from text the host
//! renders before normalization has taken effect. Both go through the one
//! pattern compiled here.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an optional leading `[<non-negative integer>]` followed by
/// whitespace.
static ORDER_HINT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[(\d+)\]\s+").expect("order-hint pattern must compile"));

/// Splits a label into its explicit ordering hint and the remaining text.
///
/// Returns `(Some(n), rest)` when the label starts with `[n] `, otherwise
/// `(None, label)` unchanged. The hint must be a non-negative integer; a
/// bracketed value that overflows `i64` is treated as absent rather than
/// an error.
pub fn parse_order_hint(label: &str) -> (Option<i64>, &str) {
    if let Some(captures) = ORDER_HINT_PATTERN.captures(label) {
        let digits = &captures[1];
        if let Ok(hint) = digits.parse::<i64>() {
            let rest = &label[captures.get(0).map(|m| m.end()).unwrap_or(0)..];
            return (Some(hint), rest);
        }
    }
    (None, label)
}

/// Removes a leading ordering hint, returning the label unchanged when no
/// hint is present. Borrows when nothing needs stripping.
pub fn strip_order_hint(label: &str) -> Cow<'_, str> {
    match parse_order_hint(label) {
        (Some(_), rest) => Cow::Owned(rest.to_string()),
        (None, _) => Cow::Borrowed(label),
    }
}
