//! Raw-record normalization.
//!
//! Converts listing records into [`ContentTypeDescriptor`]s: filters to
//! the user and plugin namespaces, extracts ordering hints, derives the
//! group from the configured delimiter, and synthesizes the host route.

use groupnav_types::{ContentKind, ContentTypeDescriptor, RawContentType, SORT_ORDER_SENTINEL_OFFSET};
use groupnav_util::parse_order_hint;
use tracing::debug;

/// Identifier namespaces retained by normalization. Everything else in
/// the listing (admin internals, core types) is dropped silently.
const RETAINED_NAMESPACES: &[&str] = &["api::", "plugin::"];

/// Normalizes a raw listing into descriptors.
///
/// `delimiter` is matched as an exact substring, not a pattern. Records
/// outside the retained namespaces are skipped; malformed records degrade
/// to best-effort defaults (identifier reused as the label, missing kind
/// treated as a collection). An empty listing yields an empty output.
pub fn normalize(delimiter: &str, raw: &[RawContentType]) -> Vec<ContentTypeDescriptor> {
    let retained: Vec<&RawContentType> = raw
        .iter()
        .filter(|record| {
            let keep = RETAINED_NAMESPACES.iter().any(|ns| record.uid.starts_with(ns));
            if !keep {
                debug!(uid = %record.uid, "skipping record outside user/plugin namespaces");
            }
            keep
        })
        .collect();

    // Sentinel is derived from the retained count so unhinted items sort
    // after every hinted one regardless of listing size.
    let sentinel = retained.len() as i64 + SORT_ORDER_SENTINEL_OFFSET;

    retained
        .into_iter()
        .map(|record| normalize_record(delimiter, record, sentinel))
        .collect()
}

fn normalize_record(delimiter: &str, record: &RawContentType, sentinel: i64) -> ContentTypeDescriptor {
    let name = record
        .api_id
        .clone()
        .unwrap_or_else(|| record.uid_tail().to_string());
    let raw_label = record
        .info
        .display_name
        .clone()
        .unwrap_or_else(|| name.clone());

    let (hint, working) = parse_order_hint(&raw_label);
    let sort_order = hint.unwrap_or(sentinel);

    let (group, display_name) = derive_group(delimiter, working);

    let kind = record.kind.unwrap_or(ContentKind::Collection);

    ContentTypeDescriptor {
        uid: record.uid.clone(),
        name,
        display_name,
        group,
        kind,
        href: format!("/content-manager/{}/{}", kind.route_segment(), record.uid),
        sort_order,
    }
}

/// Splits a hint-stripped label into `(group, display_name)`.
///
/// The first delimiter occurrence wins; its left segment, trimmed, is the
/// group. When removing the `"<group><delimiter>"` prefix leaves exactly
/// the remainder, the remainder becomes the display name; otherwise the
/// full label is kept (covers labels whose group segment needed
/// trimming). Without any delimiter the whole label doubles as the group,
/// forming a single-item group keyed by its own name.
fn derive_group(delimiter: &str, working: &str) -> (String, String) {
    match working.split_once(delimiter) {
        Some((left, rest)) => {
            let group = left.trim().to_string();
            let display_name = match working.strip_prefix(&format!("{group}{delimiter}")) {
                Some(stripped) if stripped == rest => rest.to_string(),
                _ => working.to_string(),
            };
            (group, display_name)
        }
        None => (working.to_string(), working.to_string()),
    }
}
